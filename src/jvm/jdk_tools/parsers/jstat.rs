use crate::health::profile::RuntimeProfile;
use crate::jvm::types::{CollectorCount, MemoryPoolUsage, MemoryUsage, PoolType};
use std::collections::HashMap;

/// Names under which jstat's generation columns are reported. jstat only
/// knows generations, so the names are taken from the runtime profile the
/// monitor watches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolNaming {
    pub old_pool: String,
    pub perm_pool: String,
    pub major_collector: String,
    pub minor_collector: String,
}

impl Default for PoolNaming {
    fn default() -> Self {
        Self {
            old_pool: "PS Old Gen".to_string(),
            perm_pool: "PS Perm Gen".to_string(),
            major_collector: "PS MarkSweep".to_string(),
            minor_collector: "PS Scavenge".to_string(),
        }
    }
}

impl PoolNaming {
    /// Labels matching the pools and major collector a monitor on `profile`
    /// watches. Unsupported profiles keep the parallel-collector defaults.
    pub fn for_profile(profile: RuntimeProfile) -> Self {
        let defaults = Self::default();
        Self {
            old_pool: profile
                .tenured_pool_name()
                .map_or(defaults.old_pool, str::to_string),
            perm_pool: profile
                .perm_gen_pool_name()
                .map_or(defaults.perm_pool, str::to_string),
            major_collector: profile
                .garbage_collector_name()
                .map_or(defaults.major_collector, str::to_string),
            minor_collector: defaults.minor_collector,
        }
    }
}

/// Zips jstat's header line with its first data line. Columns jstat prints as
/// `-` (unsupported on this VM) are left out.
pub fn parse_columns(output: &str) -> Result<HashMap<String, f64>, String> {
    let mut lines = output.lines().filter(|line| !line.trim().is_empty());
    let header = lines.next().ok_or("Invalid jstat output format")?;
    let data = lines.next().ok_or("Invalid jstat output format")?;

    let names: Vec<&str> = header.split_whitespace().collect();
    let values: Vec<&str> = data.split_whitespace().collect();

    if names.len() != values.len() {
        return Err(format!(
            "Expected {} values, got {}",
            names.len(),
            values.len()
        ));
    }

    Ok(names
        .into_iter()
        .zip(values)
        .filter_map(|(name, value)| value.parse::<f64>().ok().map(|v| (name.to_string(), v)))
        .collect())
}

fn kb(columns: &HashMap<String, f64>, name: &str) -> Option<u64> {
    columns.get(name).map(|v| (v * 1024.0) as u64)
}

/// Builds pool usage from `jstat -gc` and `jstat -gccapacity` output.
///
/// The old generation is always present; the permanent generation (JDK 7 and
/// earlier) and metaspace (JDK 8 and later) appear when their columns do.
pub fn parse_memory_pools(
    gc_output: &str,
    capacity_output: &str,
    naming: &PoolNaming,
) -> Result<Vec<MemoryPoolUsage>, String> {
    let gc = parse_columns(gc_output)?;
    let capacity = parse_columns(capacity_output)?;

    let pool = |name: &str, pool_type, used: &str, committed: &str, max: &str| {
        kb(&gc, used).map(|used| MemoryPoolUsage {
            name: name.to_string(),
            pool_type,
            usage: MemoryUsage::new(
                used,
                kb(&gc, committed).unwrap_or(0),
                kb(&capacity, max).filter(|max| *max > 0),
            ),
        })
    };

    let old = pool(&naming.old_pool, PoolType::Old, "OU", "OC", "OGCMX")
        .ok_or("Missing OU column in jstat -gc output")?;

    let mut pools = vec![old];
    pools.extend(pool(&naming.perm_pool, PoolType::Permanent, "PU", "PC", "PGCMX"));
    pools.extend(pool("Metaspace", PoolType::Metaspace, "MU", "MC", "MCMX"));
    Ok(pools)
}

pub fn parse_collector_counts(
    gc_output: &str,
    naming: &PoolNaming,
) -> Result<Vec<CollectorCount>, String> {
    let gc = parse_columns(gc_output)?;

    let count = |column: &str| {
        gc.get(column)
            .map(|v| *v as u64)
            .ok_or_else(|| format!("Missing {} column in jstat -gc output", column))
    };

    Ok(vec![
        CollectorCount {
            name: naming.minor_collector.clone(),
            collection_count: count("YGC")?,
            is_major: false,
        },
        CollectorCount {
            name: naming.major_collector.clone(),
            collection_count: count("FGC")?,
            is_major: true,
        },
    ])
}
