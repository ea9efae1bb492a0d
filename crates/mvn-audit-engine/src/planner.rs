//! Decides whether an update is warranted and synthesizes the edit plan.

use std::cmp::Ordering;

use tracing::debug;

use mvn_audit_core::{
    CatalogCandidate, DependencyDeclaration, EditPlan, ResolvedVersion, UpdateFinding,
};

use crate::version::compare_versions;

/// Builds an [`UpdateFinding`] for a declaration, or `None` when no update
/// should be reported.
///
/// No finding is emitted unless the catalog's latest is strictly greater
/// than the resolved version; canonically equal strings (`"1.2"` vs
/// `"1.2.0"`) and stale catalogs must never produce one. A finding is also
/// suppressed when the edit has nowhere safe to land: a direct declaration
/// without a version token, or an indirect one whose placeholder definition
/// site is unknown.
pub fn plan_update<H: Clone>(
    declaration: &DependencyDeclaration<H>,
    resolved: &ResolvedVersion<H>,
    latest: &CatalogCandidate,
) -> Option<UpdateFinding<H>> {
    if compare_versions(&latest.version, &resolved.literal) != Ordering::Greater {
        return None;
    }

    let edit_plan = match &resolved.binding {
        None => EditPlan::ReplaceLiteral {
            location: declaration.version_location.clone()?,
        },
        Some(binding) => {
            let Some(location) = binding.definition_location.clone() else {
                debug!(
                    coordinate = %declaration.coordinate(),
                    name = %binding.name,
                    "placeholder definition site unknown, suppressing finding"
                );
                return None;
            };
            EditPlan::ReplacePlaceholderDefinition { location }
        }
    };

    Some(UpdateFinding {
        declaration: declaration.clone(),
        current_version: resolved.literal.clone(),
        latest_version: latest.version.clone(),
        edit_plan,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mvn_audit_core::PlaceholderBinding;

    fn decl() -> DependencyDeclaration<u32> {
        DependencyDeclaration {
            group_id: "com.google.guava".into(),
            artifact_id: "guava".into(),
            raw_version: Some("32.0.0-jre".into()),
            declaration_location: 10,
            version_location: Some(11),
        }
    }

    fn direct(literal: &str) -> ResolvedVersion<u32> {
        ResolvedVersion {
            literal: literal.into(),
            binding: None,
        }
    }

    fn latest(version: &str) -> CatalogCandidate {
        CatalogCandidate {
            group_id: "com.google.guava".into(),
            artifact_id: "guava".into(),
            version: version.into(),
        }
    }

    #[test]
    fn test_direct_update_targets_version_token() {
        let finding = plan_update(&decl(), &direct("32.0.0-jre"), &latest("33.0.0-jre"))
            .expect("outdated");
        assert_eq!(finding.current_version, "32.0.0-jre");
        assert_eq!(finding.latest_version, "33.0.0-jre");
        assert_eq!(
            finding.edit_plan,
            EditPlan::ReplaceLiteral { location: 11 }
        );
    }

    #[test]
    fn test_indirect_update_targets_definition_site() {
        let resolved = ResolvedVersion {
            literal: "1.0.0".into(),
            binding: Some(PlaceholderBinding {
                name: "guava.version".into(),
                definition_location: Some(55_u32),
                value: "1.0.0".into(),
            }),
        };
        let finding = plan_update(&decl(), &resolved, &latest("2.0.0")).expect("outdated");
        assert_eq!(
            finding.edit_plan,
            EditPlan::ReplacePlaceholderDefinition { location: 55 }
        );
    }

    #[test]
    fn test_up_to_date_is_silent() {
        assert!(plan_update(&decl(), &direct("33.0.0-jre"), &latest("33.0.0-jre")).is_none());
    }

    #[test]
    fn test_older_latest_is_silent() {
        // A stale catalog must never be reported as an update.
        assert!(plan_update(&decl(), &direct("33.0.0-jre"), &latest("32.1.0-jre")).is_none());
    }

    #[test]
    fn test_canonically_equal_is_silent() {
        assert!(plan_update(&decl(), &direct("1.2.0"), &latest("1.2")).is_none());
        assert!(plan_update(&decl(), &direct("1.2"), &latest("1.2.0")).is_none());
    }

    #[test]
    fn test_missing_definition_site_suppresses_finding() {
        let resolved = ResolvedVersion {
            literal: "1.0.0".into(),
            binding: Some(PlaceholderBinding {
                name: "guava.version".into(),
                definition_location: None,
                value: "1.0.0".into(),
            }),
        };
        assert!(plan_update(&decl(), &resolved, &latest("2.0.0")).is_none());
    }

    #[test]
    fn test_missing_version_token_suppresses_finding() {
        let mut d = decl();
        d.version_location = None;
        assert!(plan_update(&d, &direct("1.0.0"), &latest("2.0.0")).is_none());
    }
}
