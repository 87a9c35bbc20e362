//! Trend statistics over a window of collection events.
//!
//! Everything here is a pure function of a snapshot taken oldest first.
//! Rate and slope are `NaN` below two events; callers check
//! [`GarbageCollectionStats::count`] before trusting either.

use crate::jvm::types::format_bytes;
use crate::metrics::event::GarbageCollectionEvent;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GarbageCollectionStats {
    pool_name: String,
    count: usize,
    rate: f64,
    slope: f64,
    used: u64,
    max: u64,
}

impl GarbageCollectionStats {
    pub fn from_events(pool_name: impl Into<String>, events: &[GarbageCollectionEvent]) -> Self {
        Self {
            pool_name: pool_name.into(),
            count: events.len(),
            rate: calculate_rate(events),
            slope: calculate_slope(events),
            used: calculate_average_usage(events),
            max: calculate_max_size(events),
        }
    }

    /// Stats for a pool that has never been observed.
    pub fn empty(pool_name: impl Into<String>) -> Self {
        Self::from_events(pool_name, &[])
    }

    pub fn pool_name(&self) -> &str {
        &self.pool_name
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Collections per second.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Change of headroom per event; negative while the pool fills up.
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Mean used bytes across the window.
    pub fn used(&self) -> u64 {
        self.used
    }

    pub fn max(&self) -> u64 {
        self.max
    }

    /// Average usage as a whole percentage of `max`, 0 when `max` is unknown.
    pub fn usage(&self) -> u32 {
        percent_of(self.used, self.max)
    }

    /// Whether enough events were seen for rate and slope to be meaningful.
    pub fn has_trend(&self) -> bool {
        self.count >= 2
    }
}

impl fmt::Display for GarbageCollectionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: count={} rate={:.2}/s slope={:.2} usage={}% ({} of {})",
            self.pool_name,
            self.count,
            self.rate,
            self.slope,
            self.usage(),
            format_bytes(self.used),
            format_bytes(self.max)
        )
    }
}

pub fn calculate_rate(events: &[GarbageCollectionEvent]) -> f64 {
    let (Some(first), Some(last)) = (events.first(), events.last()) else {
        return f64::NAN;
    };
    if events.len() < 2 {
        return f64::NAN;
    }

    // Out-of-order timestamps give a negative rate; only a zero span is undefined.
    let elapsed = last.timestamp_ms() - first.timestamp_ms();
    if elapsed == 0 {
        return f64::NAN;
    }

    events.len() as f64 / elapsed as f64 * 1000.0
}

/// Least-squares trend of headroom (`max - used`) against arrival index.
///
/// `NaN` when fewer than two events are present or when any event reports an
/// unbounded pool, since headroom is undefined there.
pub fn calculate_slope(events: &[GarbageCollectionEvent]) -> f64 {
    if events.len() < 2 {
        return f64::NAN;
    }

    let headroom: Option<Vec<f64>> = events
        .iter()
        .map(|event| event.usage().headroom().map(|h| h as f64))
        .collect();
    let Some(headroom) = headroom else {
        return f64::NAN;
    };

    let n = headroom.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = headroom.iter().sum::<f64>() / n;

    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    for (index, remaining) in headroom.iter().enumerate() {
        let dx = index as f64 - mean_x;
        sum_xy += dx * (remaining - mean_y);
        sum_xx += dx * dx;
    }

    sum_xy / sum_xx
}

pub fn calculate_average_usage(events: &[GarbageCollectionEvent]) -> u64 {
    if events.is_empty() {
        return 0;
    }

    let total: u128 = events.iter().map(|e| e.usage().used as u128).sum();
    (total / events.len() as u128) as u64
}

/// Pool capacity is fixed for the life of the process, so the oldest event is
/// authoritative once the window holds at least two.
pub fn calculate_max_size(events: &[GarbageCollectionEvent]) -> u64 {
    if events.len() < 2 {
        return 0;
    }

    events[0].usage().max.unwrap_or(0)
}

pub fn percent_of(used: u64, max: u64) -> u32 {
    if max == 0 {
        return 0;
    }

    ((used as u128 * 100 / max as u128).min(100)) as u32
}
