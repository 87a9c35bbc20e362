use crate::health::monitor::GarbageCollectionMonitor;
use crate::health::profile::RuntimeProfile;
use crate::health::strategy::StrategyKind;
use crate::metrics::event::GarbageCollectionEvent;
use crate::metrics::stats::GarbageCollectionStats;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;

/// Point-in-time view of a monitor, handed to whatever decides whether the
/// daemon is under memory pressure.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub timestamp: DateTime<Local>,
    pub profile: RuntimeProfile,
    pub strategy: Option<StrategyKind>,
    pub tenured: GarbageCollectionStats,
    pub perm_gen: Option<GarbageCollectionStats>,
}

impl HealthReport {
    pub fn capture(monitor: &GarbageCollectionMonitor) -> Self {
        Self {
            timestamp: Local::now(),
            profile: monitor.profile(),
            strategy: monitor.active_strategy(),
            tenured: monitor.tenured_stats(),
            perm_gen: monitor.perm_gen_stats(),
        }
    }
}

impl fmt::Display for HealthReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.timestamp.format("%H:%M:%S"))?;
        match self.strategy {
            Some(strategy) => write!(f, "{} via {}", self.profile, strategy)?,
            None => return write!(f, "{}: not monitored", self.profile),
        }
        write!(f, "\n  {}", self.tenured)?;
        if let Some(perm_gen) = &self.perm_gen {
            write!(f, "\n  {}", perm_gen)?;
        }
        Ok(())
    }
}

/// Multi-line summary used in debug logging of each recorded event.
pub fn format_current_stats(stats: &GarbageCollectionStats) -> String {
    format!(
        "\n  Current Stats:\n    Count: {}\n    Rate: {:.2}/s\n    Slope: {:.2}\n    Usage: {}%",
        stats.count(),
        stats.rate(),
        stats.slope(),
        stats.usage()
    )
}

pub fn format_event(event: &GarbageCollectionEvent) -> String {
    let mut out = format!("\n  Pool State: {}", event.usage());
    if let Some(reclaimed) = event.reclaimed() {
        out.push_str(&format!(
            "\n  Reclaimed: {}",
            crate::jvm::types::format_bytes(reclaimed)
        ));
    }
    if let Some(count) = event.collection_count() {
        out.push_str(&format!("\n  Collections: {}", count));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jvm::types::MemoryUsage;

    #[test]
    fn test_format_current_stats() {
        let events = [
            GarbageCollectionEvent::new(0, MemoryUsage::new(100, 200, Some(200))),
            GarbageCollectionEvent::new(2000, MemoryUsage::new(100, 200, Some(200))),
        ];
        let stats = GarbageCollectionStats::from_events("PS Old Gen", &events);

        assert_eq!(
            format_current_stats(&stats),
            "\n  Current Stats:\n    Count: 2\n    Rate: 1.00/s\n    Slope: 0.00\n    Usage: 50%"
        );
    }

    #[test]
    fn test_format_event() {
        let before = MemoryUsage::new(2048, 4096, Some(4096));
        let after = MemoryUsage::new(1024, 4096, Some(4096));
        let event = GarbageCollectionEvent::notified(0, Some(before), after);

        assert_eq!(
            format_event(&event),
            "\n  Pool State: used = 1.0K, committed = 4.0K, max = 4.0K\n  Reclaimed: 1.0K"
        );

        let sampled = GarbageCollectionEvent::sampled(0, after, 9);
        assert!(format_event(&sampled).ends_with("Collections: 9"));
    }

    #[test]
    fn test_health_report_for_dormant_monitor() {
        use crate::config::MonitorConfig;
        use crate::health::scheduler::testing::ManualScheduler;
        use crate::jvm::testing::FakeIntrospection;
        use std::sync::Arc;

        let monitor = GarbageCollectionMonitor::with_profile(
            RuntimeProfile::Unsupported,
            Arc::new(FakeIntrospection::new(None)),
            &ManualScheduler::default(),
            &MonitorConfig::default(),
        );

        let report = HealthReport::capture(&monitor);
        assert_eq!(report.strategy, None);
        assert!(report.perm_gen.is_none());
        assert!(report.to_string().ends_with("unsupported: not monitored"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["profile"], "Unsupported");
        assert_eq!(json["tenured"]["count"], 0);
        assert!(json["tenured"]["rate"].is_null());
    }
}
