use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Action label carried by notifications for a completed major collection.
pub const MAJOR_GC_END: &str = "end of major GC";

/// Action label carried by notifications for a completed minor collection.
pub const MINOR_GC_END: &str = "end of minor GC";

/// Vendor and version strings reported by the target runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeIdentity {
    pub vendor: String,
    pub version: String,
}

impl RuntimeIdentity {
    pub fn new(vendor: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            vendor: vendor.into(),
            version: version.into(),
        }
    }

    /// Feature release number: `1.7.0_80` is 7, `1.8` is 8, `11.0.2` is 11,
    /// `21-ea` is 21.
    pub fn major_version(&self) -> Option<u32> {
        let mut parts = self
            .version
            .trim()
            .split(|c: char| c == '.' || c == '_' || c == '-' || c == '+');

        let first = parse_leading_digits(parts.next()?)?;
        if first == 1 {
            parts.next().and_then(parse_leading_digits)
        } else {
            Some(first)
        }
    }
}

fn parse_leading_digits(s: &str) -> Option<u32> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s[..end].parse().ok()
}

/// Usage of one memory pool. `max` is `None` when the pool has no fixed
/// ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub used: u64,
    pub committed: u64,
    pub max: Option<u64>,
}

impl MemoryUsage {
    pub fn new(used: u64, committed: u64, max: Option<u64>) -> Self {
        Self {
            used,
            committed,
            max,
        }
    }

    /// Remaining room below the ceiling, `None` for unbounded pools.
    pub fn headroom(&self) -> Option<u64> {
        self.max.map(|max| max.saturating_sub(self.used))
    }
}

impl fmt::Display for MemoryUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "used = {}, committed = {}, max = ",
            format_bytes(self.used),
            format_bytes(self.committed)
        )?;
        match self.max {
            Some(max) => write!(f, "{}", format_bytes(max)),
            None => write!(f, "unbounded"),
        }
    }
}

pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1}G", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1}M", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1}K", bytes as f64 / KB as f64)
    } else {
        format!("{}B", bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryPoolUsage {
    pub name: String,
    pub pool_type: PoolType,
    pub usage: MemoryUsage,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PoolType {
    Eden,
    Survivor,
    Old,
    Permanent,
    Metaspace,
    CodeCache,
    Other,
}

/// Cumulative cycle counter of one collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorCount {
    pub name: String,
    pub collection_count: u64,
    pub is_major: bool,
}

/// One "collection completed" notification as delivered by an emitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GcNotification {
    pub collector_name: String,
    pub action: String,
    pub cause: Option<String>,
    pub timestamp_ms: i64,
    pub usage_before: HashMap<String, MemoryUsage>,
    pub usage_after: HashMap<String, MemoryUsage>,
}
