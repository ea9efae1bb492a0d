//! Single-pass audit orchestration.
//!
//! Each declaration moves independently through
//! `Discovered -> Resolved | Skipped -> (Matched -> Outdated -> Planned) |
//! UpToDate | Unmatched`; only `Planned` produces output. Nothing is
//! mutated along the way, so an audit can be rerun or abandoned at any
//! point and reproduces the same findings.

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::{debug, info, warn};

use mvn_audit_core::{
    CatalogCache, CatalogSearch, DependencyDeclaration, DocumentModel, ReferenceResolver,
    UpdateFinding,
};

use crate::matcher::find_latest;
use crate::planner::plan_update;
use crate::resolver::resolve_declaration;
use crate::version::compare_versions;

/// Build tool release that introduced the reserved CI placeholders.
pub const RESERVED_PLACEHOLDER_MIN_VERSION: &str = "3.5";

/// Result-count cap passed to the catalog search, matching the upstream
/// index client's page size.
pub const DEFAULT_SEARCH_LIMIT: usize = 1000;

/// Invocation-time configuration; no process-wide state is consulted.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Active build-tool version, as reported by the host. `None` is
    /// treated as older than any threshold.
    pub build_tool_version: Option<String>,
    /// Threshold at or above which reserved CI placeholders are stripped.
    pub reserved_placeholder_min_version: String,
    pub search_limit: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            build_tool_version: None,
            reserved_placeholder_min_version: RESERVED_PLACEHOLDER_MIN_VERSION.to_string(),
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl AuditConfig {
    pub fn with_build_tool_version(version: impl Into<String>) -> Self {
        Self {
            build_tool_version: Some(version.into()),
            ..Self::default()
        }
    }

    /// Whether reserved CI placeholders (`revision`, `sha1`, `changelist`)
    /// are treated as literal survivors rather than indirection.
    pub fn strips_reserved_placeholders(&self) -> bool {
        self.build_tool_version.as_deref().is_some_and(|active| {
            compare_versions(active, &self.reserved_placeholder_min_version) != Ordering::Less
        })
    }
}

/// Audits one document scope per invocation against a catalog.
pub struct Auditor<C> {
    catalog: C,
    config: AuditConfig,
}

impl<C: CatalogSearch> Auditor<C> {
    pub fn new(catalog: C) -> Self {
        Self::with_config(catalog, AuditConfig::default())
    }

    pub fn with_config(catalog: C, config: AuditConfig) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Runs a full audit pass over `document`, resolving placeholder
    /// indirection through `references`.
    ///
    /// Declarations that cannot be resolved or matched are silently
    /// omitted; absence of a finding is the expected signal for "nothing
    /// to do". Catalog lookups are cached per coordinate for the duration
    /// of the pass.
    pub async fn audit<D, R>(
        &self,
        document: &D,
        references: &R,
    ) -> Vec<UpdateFinding<D::Handle>>
    where
        D: DocumentModel,
        R: ReferenceResolver<Handle = D::Handle>,
    {
        let declarations = collect_declarations(document);
        info!(count = declarations.len(), "dependency declarations discovered");

        let cache = CatalogCache::new();
        let mut findings = Vec::new();

        for declaration in &declarations {
            if !declaration.has_coordinate() {
                continue;
            }

            let Some(resolved) = resolve_declaration(declaration, references, &self.config) else {
                continue;
            };

            let candidates = match cache
                .get_or_fetch(
                    &self.catalog,
                    &declaration.group_id,
                    &declaration.artifact_id,
                    self.config.search_limit,
                )
                .await
            {
                Ok(candidates) => candidates,
                Err(err) => {
                    // A failed lookup leaves the declaration unmatched;
                    // the audit itself continues.
                    warn!(coordinate = %declaration.coordinate(), error = %err, "catalog lookup failed");
                    continue;
                }
            };

            let Some(latest) =
                find_latest(&declaration.group_id, &declaration.artifact_id, &candidates)
            else {
                debug!(coordinate = %declaration.coordinate(), "no exact catalog match");
                continue;
            };

            if let Some(finding) = plan_update(declaration, &resolved, &latest) {
                info!(
                    coordinate = %declaration.coordinate(),
                    current = %finding.current_version,
                    latest = %finding.latest_version,
                    "update available"
                );
                findings.push(finding);
            }
        }

        findings
    }
}

/// Merges the primary and declaration-management lists, deduplicating by
/// declaration identity so shared entries are not double-reported.
fn collect_declarations<D: DocumentModel>(
    document: &D,
) -> Vec<DependencyDeclaration<D::Handle>> {
    let mut declarations = document.declarations();
    declarations.extend(document.managed_declarations());

    let mut seen = HashSet::new();
    declarations.retain(|d| seen.insert(d.declaration_location.clone()));
    declarations
}
