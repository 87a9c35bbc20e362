use crate::jvm::types::{CollectorCount, MemoryPoolUsage, MemoryUsage, PoolType};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Collectors whose cycles reclaim the old generation.
const MAJOR_COLLECTORS: &[&str] = &[
    "PS MarkSweep",
    "MarkSweepCompact",
    "ConcurrentMarkSweep",
    "G1 Old Generation",
    "global",
];

#[derive(Debug, Serialize)]
pub struct JolokiaRequest {
    #[serde(rename = "type")]
    pub request_type: String,
    pub mbean: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JolokiaResponse {
    pub status: u32,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub error: Option<String>,
}

impl JolokiaRequest {
    pub fn read(mbean: &str, attribute: &str) -> Self {
        Self {
            request_type: "read".to_string(),
            mbean: mbean.to_string(),
            attribute: Some(attribute.to_string()),
        }
    }
}

/// Extracts the `name` key property from an ObjectName such as
/// `java.lang:name=PS Old Gen,type=MemoryPool`.
pub fn object_name_property<'a>(object_name: &'a str, key: &str) -> Option<&'a str> {
    let (_, properties) = object_name.split_once(':')?;
    properties
        .split(',')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

pub fn classify_pool(name: &str) -> PoolType {
    let lower = name.to_ascii_lowercase();
    if lower.contains("old") || lower.contains("tenured") || lower == "java heap" {
        PoolType::Old
    } else if lower.contains("perm") {
        PoolType::Permanent
    } else if lower.contains("metaspace") || lower.contains("class space") {
        PoolType::Metaspace
    } else if lower.contains("eden") || lower.contains("nursery") {
        PoolType::Eden
    } else if lower.contains("survivor") {
        PoolType::Survivor
    } else if lower.contains("code") {
        PoolType::CodeCache
    } else {
        PoolType::Other
    }
}

/// A JMX `MemoryUsage` composite; `max` of -1 means undefined.
pub fn parse_memory_usage(value: &Value) -> Option<MemoryUsage> {
    let used = value.get("used")?.as_u64()?;
    let committed = value.get("committed").and_then(Value::as_u64).unwrap_or(0);
    let max = value
        .get("max")
        .and_then(Value::as_i64)
        .filter(|max| *max >= 0)
        .map(|max| max as u64);
    Some(MemoryUsage::new(used, committed, max))
}

/// Parses the value of a wildcard read of `CollectionUsage` over
/// `java.lang:type=MemoryPool,name=*`. Pools without collection usage are
/// skipped.
pub fn parse_collection_usages(value: &Value) -> Vec<MemoryPoolUsage> {
    let Some(beans) = value.as_object() else {
        return Vec::new();
    };

    beans
        .iter()
        .filter_map(|(object_name, attributes)| {
            let name = object_name_property(object_name, "name")?;
            let usage = parse_memory_usage(attributes.get("CollectionUsage")?)?;
            Some(MemoryPoolUsage {
                name: name.to_string(),
                pool_type: classify_pool(name),
                usage,
            })
        })
        .collect()
}

/// Parses the value of a wildcard read of `CollectionCount` over
/// `java.lang:type=GarbageCollector,name=*`.
pub fn parse_collection_counts(value: &Value) -> Vec<CollectorCount> {
    let Some(beans) = value.as_object() else {
        return Vec::new();
    };

    beans
        .iter()
        .filter_map(|(object_name, attributes)| {
            let name = object_name_property(object_name, "name")?;
            let collection_count = attributes.get("CollectionCount")?.as_u64()?;
            Some(CollectorCount {
                name: name.to_string(),
                collection_count,
                is_major: MAJOR_COLLECTORS.contains(&name),
            })
        })
        .collect()
}
