pub mod reading_queries;
pub mod usage_queries;
