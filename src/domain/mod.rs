pub mod app_config;
pub mod error;
pub mod workflow;

// Contact sheet records
pub mod records;
