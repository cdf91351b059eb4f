//! Normalization of the registrar's raw listing
//!
//! Both views only ever look at editable rows. Uniqueness and ordering come
//! from `BTreeSet`/`BTreeMap`, so the output is deterministic for a given
//! snapshot regardless of the order the registrar returned rows in.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain_filter::DomainFilter;
use crate::model::{Endpoint, RawRecord};

/// Distinct editable zones as `*.<zone>` patterns, sorted
pub fn domains_from_records(records: &[RawRecord]) -> Vec<String> {
    let zones: BTreeSet<&str> = records
        .iter()
        .filter(|r| r.editable)
        .map(|r| r.zone.as_str())
        .collect();

    zones.into_iter().map(|zone| format!("*.{}", zone)).collect()
}

/// Editable records grouped into one endpoint per `(name, type)`
///
/// Endpoints are ordered by `(dnsName, recordType)`; each endpoint's targets
/// are distinct and sorted.
pub fn endpoints_from_records(records: &[RawRecord], filter: &DomainFilter) -> Vec<Endpoint> {
    let mut groups: BTreeMap<(&str, &str), BTreeSet<&str>> = BTreeMap::new();

    for record in records
        .iter()
        .filter(|r| r.editable && filter.matches(&r.record))
    {
        groups
            .entry((record.record.as_str(), record.record_type.as_str()))
            .or_default()
            .insert(record.value.as_str());
    }

    groups
        .into_iter()
        .map(|((name, record_type), values)| {
            Endpoint::new(
                name,
                record_type,
                values.into_iter().map(str::to_string).collect(),
            )
        })
        .collect()
}
