use std::collections::HashSet;

use harvest_core::HeritageRecord;

/// Drop records whose `(country, site_name)` was already seen, keeping the
/// first occurrence and the relative order of the rest.
///
/// Returns the surviving records and how many were dropped.
pub fn dedup_records(records: Vec<HeritageRecord>) -> (Vec<HeritageRecord>, usize) {
    let before = records.len();
    let mut seen: HashSet<(String, String)> = HashSet::with_capacity(before);
    let kept: Vec<HeritageRecord> = records
        .into_iter()
        .filter(|r| seen.insert((r.country.clone(), r.site_name.clone())))
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}
