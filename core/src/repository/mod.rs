pub mod exchange;
pub mod memory;
pub mod traits;

// Re-export
pub use exchange::{export_file_name, read_csv, read_entries, write_entries, CsvImport};
pub use memory::InMemoryDatasetRepository;
pub use traits::DatasetRepository;
