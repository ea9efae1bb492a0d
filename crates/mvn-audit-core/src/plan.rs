//! Edit plans and audit findings.

use crate::document::DependencyDeclaration;

/// The minimal edit that applies an update.
///
/// Exactly one target: either the version token at the declaration site, or
/// the definition site of the placeholder the version indirects through.
/// Targeting the definition means updating one property fixes every
/// dependency that shares it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditPlan<H> {
    ReplaceLiteral { location: H },
    ReplacePlaceholderDefinition { location: H },
}

impl<H> EditPlan<H> {
    pub fn location(&self) -> &H {
        match self {
            Self::ReplaceLiteral { location } | Self::ReplacePlaceholderDefinition { location } => {
                location
            }
        }
    }

    pub fn targets_placeholder_definition(&self) -> bool {
        matches!(self, Self::ReplacePlaceholderDefinition { .. })
    }
}

/// One confirmed-outdated declaration, ready for the host to render and
/// (optionally) fix. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateFinding<H> {
    pub declaration: DependencyDeclaration<H>,
    pub current_version: String,
    pub latest_version: String,
    pub edit_plan: EditPlan<H>,
}

impl<H> UpdateFinding<H> {
    /// One-line human-readable summary. Localization and any richer
    /// formatting are the presenter's responsibility.
    pub fn summary(&self, project_name: &str) -> String {
        format!(
            "{project_name}: newer version of {} available: {} -> {}",
            self.declaration.coordinate(),
            self.current_version,
            self.latest_version
        )
    }
}
