//! Coordinate resolution: from a declaration as written to its effective,
//! literal version.
//!
//! A version written as `${name}` is chased to the placeholder's definition
//! via the host's [`ReferenceResolver`]. Anything that cannot be brought to
//! a literal (unknown references, empty definitions, chained placeholder
//! expressions) makes the declaration unauditable and is skipped, never
//! reported.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use mvn_audit_core::{DependencyDeclaration, ReferenceResolver, ResolvedVersion};

use crate::audit::AuditConfig;

pub(crate) const PLACEHOLDER_START: &str = "${";

/// CI-friendly placeholders Maven >= 3.5 leaves intentionally unresolved.
/// These are stripped before testing for indirection so a mixed literal
/// like `1.0-${changelist}` still audits as the literal `1.0`.
fn reserved_placeholders() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{(revision|sha1|changelist)\}").expect("valid regex"))
}

fn placeholder_name(text: &str) -> Option<&str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid regex"));
    re.captures(text).map(|caps| caps.get(1).expect("group 1").as_str())
}

/// Resolves a declaration's effective version, or `None` when the
/// declaration cannot be audited.
pub fn resolve_declaration<R>(
    decl: &DependencyDeclaration<R::Handle>,
    references: &R,
    config: &AuditConfig,
) -> Option<ResolvedVersion<R::Handle>>
where
    R: ReferenceResolver,
{
    let raw = decl.raw_version.as_deref()?;

    let value_to_check = if config.strips_reserved_placeholders() {
        reserved_placeholders().replace_all(raw, "")
    } else {
        std::borrow::Cow::Borrowed(raw)
    };

    if !value_to_check.contains(PLACEHOLDER_START) {
        // Literal, possibly with reserved tokens stripped away; separator
        // debris left by stripping does not survive into the literal.
        let literal = value_to_check.trim_end_matches(['-', '.']).to_string();
        if literal.is_empty() {
            debug!(coordinate = %decl.coordinate(), "version is empty after stripping, skipping");
            return None;
        }
        return Some(ResolvedVersion {
            literal,
            binding: None,
        });
    }

    let name = placeholder_name(&value_to_check)?;
    let Some(binding) = references.resolve_placeholder(name) else {
        debug!(coordinate = %decl.coordinate(), name, "placeholder is unresolved, skipping");
        return None;
    };

    // A definition that is empty or itself still a placeholder expression
    // cannot be audited against the catalog.
    if binding.value.is_empty() || binding.value.contains(PLACEHOLDER_START) {
        debug!(
            coordinate = %decl.coordinate(),
            name,
            value = %binding.value,
            "placeholder does not resolve to a literal, skipping"
        );
        return None;
    }

    Some(ResolvedVersion {
        literal: binding.value.clone(),
        binding: Some(binding),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mvn_audit_core::PlaceholderBinding;
    use std::collections::HashMap;

    struct MapResolver {
        properties: HashMap<String, (String, Option<u32>)>,
    }

    impl MapResolver {
        fn new(entries: &[(&str, &str)]) -> Self {
            let properties = entries
                .iter()
                .enumerate()
                .map(|(i, (k, v))| (k.to_string(), (v.to_string(), Some(i as u32))))
                .collect();
            Self { properties }
        }
    }

    impl ReferenceResolver for MapResolver {
        type Handle = u32;

        fn resolve_placeholder(&self, name: &str) -> Option<PlaceholderBinding<u32>> {
            self.properties.get(name).map(|(value, loc)| PlaceholderBinding {
                name: name.to_string(),
                definition_location: *loc,
                value: value.clone(),
            })
        }
    }

    fn decl(raw_version: Option<&str>) -> DependencyDeclaration<u32> {
        DependencyDeclaration {
            group_id: "org.slf4j".into(),
            artifact_id: "slf4j-api".into(),
            raw_version: raw_version.map(str::to_string),
            declaration_location: 100,
            version_location: Some(101),
        }
    }

    fn maven(version: &str) -> AuditConfig {
        AuditConfig {
            build_tool_version: Some(version.into()),
            ..AuditConfig::default()
        }
    }

    #[test]
    fn test_literal_version() {
        let refs = MapResolver::new(&[]);
        let resolved = resolve_declaration(&decl(Some("2.0.9")), &refs, &AuditConfig::default())
            .expect("literal resolves");
        assert_eq!(resolved.literal, "2.0.9");
        assert!(!resolved.is_indirect());
    }

    #[test]
    fn test_missing_version_skipped() {
        let refs = MapResolver::new(&[]);
        assert!(resolve_declaration(&decl(None), &refs, &AuditConfig::default()).is_none());
    }

    #[test]
    fn test_placeholder_resolves_to_definition() {
        let refs = MapResolver::new(&[("slf4j.version", "2.0.9")]);
        let resolved =
            resolve_declaration(&decl(Some("${slf4j.version}")), &refs, &AuditConfig::default())
                .expect("placeholder resolves");
        assert_eq!(resolved.literal, "2.0.9");
        let binding = resolved.binding.expect("indirect");
        assert_eq!(binding.name, "slf4j.version");
        assert_eq!(binding.definition_location, Some(0));
    }

    #[test]
    fn test_unknown_placeholder_skipped() {
        let refs = MapResolver::new(&[]);
        assert!(
            resolve_declaration(&decl(Some("${missing.version}")), &refs, &AuditConfig::default())
                .is_none()
        );
    }

    #[test]
    fn test_chained_placeholder_skipped() {
        let refs = MapResolver::new(&[("outer.version", "${inner.version}")]);
        assert!(
            resolve_declaration(&decl(Some("${outer.version}")), &refs, &AuditConfig::default())
                .is_none()
        );
    }

    #[test]
    fn test_empty_definition_skipped() {
        let refs = MapResolver::new(&[("empty.version", "")]);
        assert!(
            resolve_declaration(&decl(Some("${empty.version}")), &refs, &AuditConfig::default())
                .is_none()
        );
    }

    #[test]
    fn test_reserved_placeholder_survives_as_literal() {
        let refs = MapResolver::new(&[]);
        let resolved =
            resolve_declaration(&decl(Some("1.0-${revision}")), &refs, &maven("3.6.3"))
                .expect("reserved token strips to a literal");
        assert_eq!(resolved.literal, "1.0");
        assert!(!resolved.is_indirect());
    }

    #[test]
    fn test_reserved_placeholders_all_tokens() {
        let refs = MapResolver::new(&[]);
        for raw in ["1.0-${sha1}", "1.0-${changelist}", "${revision}-1.0"] {
            let resolved = resolve_declaration(&decl(Some(raw)), &refs, &maven("3.5"));
            assert!(resolved.is_some(), "{raw} should audit as a literal");
        }
    }

    #[test]
    fn test_reserved_placeholder_alone_skipped() {
        // `<version>${revision}</version>` strips to nothing comparable.
        let refs = MapResolver::new(&[]);
        assert!(resolve_declaration(&decl(Some("${revision}")), &refs, &maven("3.6.3")).is_none());
    }

    #[test]
    fn test_reserved_placeholder_old_build_tool() {
        // Before 3.5 the reserved tokens are ordinary, unresolvable
        // properties.
        let refs = MapResolver::new(&[]);
        assert!(
            resolve_declaration(&decl(Some("1.0-${revision}")), &refs, &maven("3.3.9")).is_none()
        );
    }

    #[test]
    fn test_non_reserved_placeholder_not_stripped() {
        let refs = MapResolver::new(&[]);
        assert!(
            resolve_declaration(&decl(Some("1.0-${custom.suffix}")), &refs, &maven("3.6.3"))
                .is_none()
        );
    }
}
