use crate::config::MonitorConfig;
use crate::health::pools::PoolWindows;
use crate::health::profile::RuntimeProfile;
use crate::health::scheduler::Scheduler;
use crate::health::strategy::{self, AcquisitionStrategy, StrategyKind};
use crate::jvm::introspection::RuntimeIntrospection;
use crate::jvm::watcher::WatchedIntrospection;
use crate::metrics::stats::GarbageCollectionStats;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Watches the tenured (and, where present, permanent) pool of one JVM and
/// exposes trend statistics over the most recent collections.
///
/// Exactly one acquisition strategy is active for the monitor's lifetime, or
/// none at all on unsupported runtimes. Dropping the monitor deregisters it.
pub struct GarbageCollectionMonitor {
    profile: RuntimeProfile,
    windows: Arc<PoolWindows>,
    strategy: Option<Box<dyn AcquisitionStrategy>>,
}

impl GarbageCollectionMonitor {
    pub const EVENT_WINDOW: usize = 20;

    /// Resolves the runtime profile from the introspection backend and starts
    /// acquisition. A runtime whose identity cannot be read is treated as
    /// unsupported.
    pub async fn start(
        introspection: Arc<dyn RuntimeIntrospection>,
        scheduler: &dyn Scheduler,
        config: &MonitorConfig,
    ) -> Self {
        let profile = Self::resolve_profile(introspection.as_ref()).await;
        Self::with_profile(profile, introspection, scheduler, config)
    }

    pub async fn resolve_profile(introspection: &dyn RuntimeIntrospection) -> RuntimeProfile {
        match introspection.runtime_identity().await {
            Ok(identity) => {
                let profile = RuntimeProfile::resolve(&identity);
                info!(
                    "Runtime {} {} resolved to {} profile",
                    identity.vendor, identity.version, profile
                );
                profile
            }
            Err(e) => {
                warn!("Cannot identify runtime, GC monitoring disabled: {}", e);
                RuntimeProfile::Unsupported
            }
        }
    }

    /// Wraps `backend` in a counter watcher when `profile` subscribes to
    /// notifications the backend cannot push itself. Polling and unsupported
    /// profiles, or a `None` interval, leave the backend untouched.
    ///
    /// Must be called inside a tokio runtime.
    pub fn event_source(
        profile: RuntimeProfile,
        backend: Arc<dyn RuntimeIntrospection>,
        watch_interval: Option<Duration>,
    ) -> (Arc<dyn RuntimeIntrospection>, Option<Arc<WatchedIntrospection>>) {
        let Some(watch_interval) = watch_interval else {
            return (backend, None);
        };
        if !profile.is_notification_supported() || backend.notification_emitter().is_some() {
            return (backend, None);
        }

        let watched = WatchedIntrospection::spawn(backend, watch_interval);
        (Arc::clone(&watched) as Arc<dyn RuntimeIntrospection>, Some(watched))
    }

    pub fn with_profile(
        profile: RuntimeProfile,
        introspection: Arc<dyn RuntimeIntrospection>,
        scheduler: &dyn Scheduler,
        config: &MonitorConfig,
    ) -> Self {
        let windows = Arc::new(PoolWindows::new(profile.pool_names(), config.event_window));
        let strategy = strategy::activate(profile, &introspection, scheduler, &windows, config);

        if strategy.is_none() && !windows.is_empty() {
            warn!("No GC event source active for {} profile", profile);
        }

        Self {
            profile,
            windows,
            strategy,
        }
    }

    pub fn profile(&self) -> RuntimeProfile {
        self.profile
    }

    pub fn active_strategy(&self) -> Option<StrategyKind> {
        self.strategy
            .as_ref()
            .filter(|strategy| strategy.is_active())
            .map(|strategy| strategy.kind())
    }

    /// Stats for the tenured pool; empty when nothing has been observed or the
    /// runtime is unsupported.
    pub fn tenured_stats(&self) -> GarbageCollectionStats {
        match self.profile.tenured_pool_name() {
            Some(pool) => self.windows.stats(pool),
            None => GarbageCollectionStats::empty(""),
        }
    }

    /// `None` when the runtime has no permanent generation.
    pub fn perm_gen_stats(&self) -> Option<GarbageCollectionStats> {
        self.profile
            .perm_gen_pool_name()
            .map(|pool| self.windows.stats(pool))
    }

    /// Deregisters the acquisition strategy. Stats remain readable.
    pub fn stop(&mut self) {
        if let Some(strategy) = self.strategy.take() {
            strategy.stop();
            info!("Stopped GC {}", strategy.kind());
        }
    }
}

impl Drop for GarbageCollectionMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}
