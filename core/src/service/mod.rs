pub mod allocator;
pub mod dataset_service;
pub mod dto;
pub mod forecast;
pub mod interpolator;
pub mod normalizer;
pub mod stats;
