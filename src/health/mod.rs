//! Garbage-collection health monitoring.
//!
//! [`GarbageCollectionMonitor`] resolves a [`RuntimeProfile`] for the target
//! JVM, keeps a sliding window of collection events per watched pool and
//! computes [`GarbageCollectionStats`](crate::metrics::stats::GarbageCollectionStats)
//! on demand.

pub mod monitor;
pub mod pools;
pub mod profile;
pub mod report;
pub mod scheduler;
pub mod strategy;

pub use monitor::GarbageCollectionMonitor;
pub use profile::RuntimeProfile;
pub use strategy::StrategyKind;
