//! Data models: raw task input, canonical output, configuration.

pub mod config;
pub mod record;
pub mod task;
