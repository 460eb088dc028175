// Match scoring: job posting records, the weighted scorer and its HTTP handlers.

pub mod handlers;
pub mod models;
pub mod scorer;
