pub mod dataset;
pub mod reading;

pub use dataset::{Dataset, Entry};
pub use reading::{finite, Reading, Series};
