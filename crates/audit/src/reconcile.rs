use std::collections::{HashMap, HashSet};
use std::fmt;

use downtime_audit_query::{DowntimeRecord, ScheduledDowntimeAttrs, ScheduledDowntimeRecord};

/// Names of every scheduled downtime claimed by a downtime's `config_owner`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct OwnershipSet(HashSet<String>);

impl OwnershipSet {
    /// Collects the config owners of `downtimes`. Duplicates collapse.
    #[must_use]
    pub fn from_downtimes(downtimes: &[DowntimeRecord]) -> Self {
        downtimes
            .iter()
            .map(|downtime| downtime.attrs.config_owner.clone())
            .collect()
    }

    /// Whether `name` is claimed by some downtime.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Number of distinct owner names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no downtime claimed anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<String> for OwnershipSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Identifies a checkable. An empty service denotes the host itself.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct CheckableKey {
    /// Host name.
    pub host: String,

    /// Service name, empty for host checkables.
    pub service: String,
}

impl CheckableKey {
    /// Creates a key for the given host and service.
    pub fn new(host: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            service: service.into(),
        }
    }

    /// Creates a key for a host checkable.
    pub fn host(host: impl Into<String>) -> Self {
        Self::new(host, String::new())
    }
}

impl From<&ScheduledDowntimeAttrs> for CheckableKey {
    fn from(attrs: &ScheduledDowntimeAttrs) -> Self {
        Self::new(attrs.host_name.clone(), attrs.service_name.clone())
    }
}

/// Formats as `host` or `host!service`.
impl fmt::Display for CheckableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.service.is_empty() {
            write!(f, "{}", self.host)
        } else {
            write!(f, "{}!{}", self.host, self.service)
        }
    }
}

/// Scheduled downtimes of one checkable.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Checkable {
    total: u64,
    missing: HashSet<String>,
}

impl Checkable {
    /// Number of scheduled downtimes seen.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Names of scheduled downtimes no downtime claims.
    #[must_use]
    pub const fn missing(&self) -> &HashSet<String> {
        &self.missing
    }
}

/// Checkables reported by one zone.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Zone {
    total: u64,
    missing: u64,
    checkables: HashMap<CheckableKey, Checkable>,
}

impl Zone {
    /// Number of scheduled downtimes seen.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Number of unclaimed scheduled downtimes over all checkables.
    #[must_use]
    pub const fn missing(&self) -> u64 {
        self.missing
    }

    /// Checkables of this zone by key.
    #[must_use]
    pub const fn checkables(&self) -> &HashMap<CheckableKey, Checkable> {
        &self.checkables
    }

    /// Looks up a checkable.
    #[must_use]
    pub fn checkable(&self, key: &CheckableKey) -> Option<&Checkable> {
        self.checkables.get(key)
    }
}

/// Scheduled downtimes grouped by zone and checkable, each classified as
/// claimed or missing against an ownership set.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Reconciliation {
    zones: HashMap<String, Zone>,
}

impl Reconciliation {
    /// Aggregates `records` in order, testing each name against `ownership`.
    #[must_use]
    pub fn build(records: &[ScheduledDowntimeRecord], ownership: &OwnershipSet) -> Self {
        let mut reconciliation = Self::default();

        for record in records {
            reconciliation.add(record, ownership);
        }

        reconciliation
    }

    fn add(&mut self, record: &ScheduledDowntimeRecord, ownership: &OwnershipSet) {
        let zone = self.zones.entry(record.attrs.zone.clone()).or_default();
        let checkable = zone
            .checkables
            .entry(CheckableKey::from(&record.attrs))
            .or_default();

        zone.total += 1;
        checkable.total += 1;

        // A name repeated within one checkable is only counted once.
        if !ownership.contains(&record.name) && checkable.missing.insert(record.name.clone()) {
            zone.missing += 1;
        }
    }

    /// Zones by name.
    #[must_use]
    pub const fn zones(&self) -> &HashMap<String, Zone> {
        &self.zones
    }

    /// Looks up a zone.
    #[must_use]
    pub fn zone(&self, name: &str) -> Option<&Zone> {
        self.zones.get(name)
    }

    /// Number of scheduled downtimes over all zones.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.zones.values().map(Zone::total).sum()
    }

    /// Number of unclaimed scheduled downtimes over all zones.
    #[must_use]
    pub fn missing(&self) -> u64 {
        self.zones.values().map(Zone::missing).sum()
    }
}
