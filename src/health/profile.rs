//! Capability profiles for the runtimes the monitor understands.
//!
//! Vendor and version strings are looked at exactly once, in
//! [`RuntimeProfile::resolve`]. Everything downstream works from the
//! profile's pool and collector names.

use crate::jvm::types::RuntimeIdentity;
use serde::Serialize;
use strum::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
pub enum RuntimeProfile {
    #[strum(to_string = "IBM")]
    Ibm,
    #[strum(to_string = "HotSpot (JDK 7 or earlier)")]
    HotSpotJdk7OrEarlier,
    #[strum(to_string = "HotSpot (JDK 8 or later)")]
    HotSpotJdk8OrLater,
    #[strum(to_string = "unsupported")]
    Unsupported,
}

struct ProfileDetails {
    tenured_pool: Option<&'static str>,
    perm_gen_pool: Option<&'static str>,
    garbage_collector: Option<&'static str>,
    notification_supported: bool,
}

struct ResolutionRule {
    vendor: &'static str,
    min_version: u32,
    max_version: u32,
    profile: RuntimeProfile,
}

/// First matching row wins; no match means [`RuntimeProfile::Unsupported`].
const RESOLUTION_TABLE: &[ResolutionRule] = &[
    ResolutionRule {
        vendor: "IBM Corporation",
        min_version: 0,
        max_version: u32::MAX,
        profile: RuntimeProfile::Ibm,
    },
    ResolutionRule {
        vendor: "Sun Microsystems Inc.",
        min_version: 0,
        max_version: 7,
        profile: RuntimeProfile::HotSpotJdk7OrEarlier,
    },
    ResolutionRule {
        vendor: "Oracle Corporation",
        min_version: 0,
        max_version: 7,
        profile: RuntimeProfile::HotSpotJdk7OrEarlier,
    },
    ResolutionRule {
        vendor: "Oracle Corporation",
        min_version: 8,
        max_version: u32::MAX,
        profile: RuntimeProfile::HotSpotJdk8OrLater,
    },
];

impl RuntimeProfile {
    const fn details(self) -> ProfileDetails {
        match self {
            RuntimeProfile::Ibm => ProfileDetails {
                tenured_pool: Some("Java heap"),
                perm_gen_pool: None,
                garbage_collector: Some("MarkSweepCompact"),
                notification_supported: false,
            },
            RuntimeProfile::HotSpotJdk7OrEarlier => ProfileDetails {
                tenured_pool: Some("PS Old Gen"),
                perm_gen_pool: Some("PS Perm Gen"),
                garbage_collector: Some("PS MarkSweep"),
                notification_supported: true,
            },
            RuntimeProfile::HotSpotJdk8OrLater => ProfileDetails {
                tenured_pool: Some("PS Old Gen"),
                perm_gen_pool: None,
                garbage_collector: Some("PS MarkSweep"),
                notification_supported: true,
            },
            RuntimeProfile::Unsupported => ProfileDetails {
                tenured_pool: None,
                perm_gen_pool: None,
                garbage_collector: None,
                notification_supported: false,
            },
        }
    }

    pub fn resolve(identity: &RuntimeIdentity) -> Self {
        let vendor = identity.vendor.trim();
        // IBM rows accept any version, including unparseable ones.
        let version = identity.major_version();

        RESOLUTION_TABLE
            .iter()
            .find(|rule| {
                rule.vendor == vendor
                    && match version {
                        Some(v) => (rule.min_version..=rule.max_version).contains(&v),
                        None => rule.min_version == 0 && rule.max_version == u32::MAX,
                    }
            })
            .map(|rule| rule.profile)
            .unwrap_or(RuntimeProfile::Unsupported)
    }

    pub fn tenured_pool_name(self) -> Option<&'static str> {
        self.details().tenured_pool
    }

    /// Absent on runtimes whose class metadata lives in unbounded native
    /// memory.
    pub fn perm_gen_pool_name(self) -> Option<&'static str> {
        self.details().perm_gen_pool
    }

    pub fn garbage_collector_name(self) -> Option<&'static str> {
        self.details().garbage_collector
    }

    pub fn is_notification_supported(self) -> bool {
        self.details().notification_supported
    }

    /// Every pool this profile watches.
    pub fn pool_names(self) -> Vec<&'static str> {
        let details = self.details();
        details.perm_gen_pool.into_iter().chain(details.tenured_pool).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn resolve(vendor: &str, version: &str) -> RuntimeProfile {
        RuntimeProfile::resolve(&RuntimeIdentity::new(vendor, version))
    }

    #[test]
    fn test_resolution_table() {
        assert_eq!(resolve("IBM Corporation", "1.8.0"), RuntimeProfile::Ibm);
        assert_eq!(resolve("IBM Corporation", "garbage"), RuntimeProfile::Ibm);
        assert_eq!(
            resolve("Oracle Corporation", "1.7.0_80"),
            RuntimeProfile::HotSpotJdk7OrEarlier
        );
        assert_eq!(
            resolve("Sun Microsystems Inc.", "1.6.0_45"),
            RuntimeProfile::HotSpotJdk7OrEarlier
        );
        assert_eq!(
            resolve("Oracle Corporation", "1.8.0_402"),
            RuntimeProfile::HotSpotJdk8OrLater
        );
        assert_eq!(
            resolve("Oracle Corporation", "17.0.9"),
            RuntimeProfile::HotSpotJdk8OrLater
        );
    }

    #[test]
    fn test_unknown_runtime_is_unsupported() {
        assert_eq!(resolve("Acme JVM Works", "1.8"), RuntimeProfile::Unsupported);
        assert_eq!(resolve("", ""), RuntimeProfile::Unsupported);
        assert_eq!(resolve("Oracle Corporation", "n/a"), RuntimeProfile::Unsupported);
    }

    #[test]
    fn test_profile_fields() {
        let legacy = RuntimeProfile::HotSpotJdk7OrEarlier;
        assert_eq!(legacy.tenured_pool_name(), Some("PS Old Gen"));
        assert_eq!(legacy.perm_gen_pool_name(), Some("PS Perm Gen"));
        assert_eq!(legacy.garbage_collector_name(), Some("PS MarkSweep"));
        assert_eq!(legacy.pool_names(), vec!["PS Perm Gen", "PS Old Gen"]);

        let modern = RuntimeProfile::HotSpotJdk8OrLater;
        assert_eq!(modern.perm_gen_pool_name(), None);
        assert_eq!(modern.pool_names(), vec!["PS Old Gen"]);

        assert!(!RuntimeProfile::Ibm.is_notification_supported());
        assert_eq!(RuntimeProfile::Ibm.pool_names(), vec!["Java heap"]);
    }

    #[test]
    fn test_profiles_are_consistent() {
        for profile in RuntimeProfile::iter() {
            let watches_pools = !profile.pool_names().is_empty();
            assert_eq!(watches_pools, profile.garbage_collector_name().is_some(), "{}", profile);
            if !watches_pools {
                assert!(!profile.is_notification_supported(), "{}", profile);
            }
        }
    }

    #[test]
    fn test_unsupported_profile_is_empty() {
        let profile = RuntimeProfile::Unsupported;
        assert!(profile.pool_names().is_empty());
        assert_eq!(profile.tenured_pool_name(), None);
        assert_eq!(profile.garbage_collector_name(), None);
        assert!(!profile.is_notification_supported());
        assert_eq!(profile.to_string(), "unsupported");
    }
}
