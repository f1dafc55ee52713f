pub mod config;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;
pub mod usecase;

pub use config::EngineConfig;
pub use model::{Dataset, Entry, Reading};
pub use repository::{DatasetRepository, InMemoryDatasetRepository};
pub use input::{expand_key, parse_reading_args, ParsedReading};
pub use time::{days_between, parse_date, year_month_key};
pub use service::allocator::{allocate, month_totals, MonthTotals};
pub use service::interpolator::{try_value_at, value_at};
pub use service::normalizer::{normalize, NormalizedYears, YearGroups};
pub use service::forecast::{forecast, ForecastResult};
pub use service::stats::{growth_stats, GrowthStats};
pub use service::dataset_service::{DatasetService, EntryField, MoveDirection};
pub use service::dto::DatasetView;
pub use usecase::dashboard::DashboardUseCase;
