//! Selects the latest published version for a coordinate out of noisy
//! search results.

use std::cmp::Ordering;

use mvn_audit_core::CatalogCandidate;

use crate::version::compare_versions;

/// Returns the best "latest" candidate for `groupId:artifactId`, or `None`
/// when nothing in `candidates` matches the coordinate exactly.
///
/// The search feeding this is a fuzzy prefix lookup, so candidates with a
/// different group or artifact are discarded outright. Remaining candidates
/// are ordered newest-first by Maven version semantics; among canonically
/// equal maxima the lexicographically greatest literal wins, keeping the
/// pick deterministic.
pub fn find_latest(
    group_id: &str,
    artifact_id: &str,
    candidates: &[CatalogCandidate],
) -> Option<CatalogCandidate> {
    candidates
        .iter()
        .filter(|c| c.group_id == group_id && c.artifact_id == artifact_id)
        .max_by(|a, b| match compare_versions(&a.version, &b.version) {
            Ordering::Equal => a.version.cmp(&b.version),
            ord => ord,
        })
        .cloned()
}
