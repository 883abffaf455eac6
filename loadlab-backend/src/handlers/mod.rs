pub mod admin;
pub mod dlq;
pub mod jobs;
pub mod queue;
pub mod workers;

pub mod utils;
