pub mod aggregate;
pub mod charts;
pub mod config;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod report;
