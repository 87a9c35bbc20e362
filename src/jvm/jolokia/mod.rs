pub mod connector;
pub mod types;
