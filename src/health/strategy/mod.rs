//! Event acquisition: push subscription or fixed-interval polling.

pub mod polling;
pub mod subscription;

use crate::config::MonitorConfig;
use crate::health::pools::PoolWindows;
use crate::health::profile::RuntimeProfile;
use crate::health::scheduler::Scheduler;
use crate::jvm::introspection::RuntimeIntrospection;
use polling::PollingStrategy;
use serde::Serialize;
use std::sync::Arc;
use strum::Display;
use subscription::SubscriptionStrategy;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum StrategyKind {
    #[strum(to_string = "notification subscription")]
    Subscription,
    #[strum(to_string = "polling")]
    Polling,
}

/// A running source of collection events feeding [`PoolWindows`].
pub trait AcquisitionStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Deregisters from the event source. Idempotent.
    fn stop(&self);

    fn is_active(&self) -> bool;
}

/// Picks and starts the strategy the profile calls for.
///
/// Returns `None` for profiles without pools, and when a subscription cannot
/// be registered. A notification-capable profile never falls back to polling.
pub fn activate(
    profile: RuntimeProfile,
    introspection: &Arc<dyn RuntimeIntrospection>,
    scheduler: &dyn Scheduler,
    windows: &Arc<PoolWindows>,
    config: &MonitorConfig,
) -> Option<Box<dyn AcquisitionStrategy>> {
    if windows.is_empty() {
        return None;
    }
    let collector = profile.garbage_collector_name()?;

    if profile.is_notification_supported() {
        let Some(emitter) = introspection.notification_emitter() else {
            warn!(
                "{} runtime supports GC notifications but the introspection backend has no emitter",
                profile
            );
            return None;
        };

        match SubscriptionStrategy::register(emitter, collector, Arc::clone(windows)) {
            Ok(strategy) => {
                info!("Registered GC notification listener for {}", collector);
                Some(Box::new(strategy))
            }
            Err(e) => {
                warn!("Failed to register GC notification listener: {}", e);
                None
            }
        }
    } else {
        info!(
            "Polling {} every {:?} for {} runtime",
            collector, config.poll_interval, profile
        );
        Some(Box::new(PollingStrategy::schedule(
            scheduler,
            Arc::clone(introspection),
            collector,
            Arc::clone(windows),
            config,
        )))
    }
}
