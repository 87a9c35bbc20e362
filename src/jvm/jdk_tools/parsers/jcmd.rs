use crate::jvm::types::RuntimeIdentity;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static PROPERTY_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*([^#=\s][^=]*?)\s*=(.*)$").unwrap());

/// Parses `jcmd <pid> VM.system_properties`, which prints a pid header, a
/// timestamp comment and then `key=value` lines in `.properties` escaping.
pub fn parse_system_properties(output: &str) -> HashMap<String, String> {
    output
        .lines()
        .filter_map(|line| PROPERTY_LINE.captures(line))
        .map(|caps| (unescape(&caps[1]), unescape(&caps[2])))
        .collect()
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

pub fn parse_runtime_identity(output: &str) -> Result<RuntimeIdentity, String> {
    let properties = parse_system_properties(output);

    let vendor = ["java.vm.vendor", "java.vendor"]
        .iter()
        .find_map(|key| properties.get(*key))
        .ok_or_else(|| "Missing java.vm.vendor property".to_string())?;

    let version = ["java.version", "java.specification.version"]
        .iter()
        .find_map(|key| properties.get(*key))
        .ok_or_else(|| "Missing java.version property".to_string())?;

    Ok(RuntimeIdentity::new(vendor.trim(), version.trim()))
}
