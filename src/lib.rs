pub mod cli;
pub mod config;
pub mod error;
pub mod health;
pub mod jvm;
pub mod logging;
pub mod metrics;
