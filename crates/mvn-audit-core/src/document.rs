//! Document-side contracts: dependency declarations, placeholder bindings,
//! and the traits a host document model implements.
//!
//! Locations inside the host document are opaque `Handle` values. The engine
//! never interprets them; it only records which handle an edit should target
//! and hands it back to the host.

use std::hash::Hash;

use crate::error::Result;

/// One `<dependency>`-like entry as written in the project descriptor.
///
/// `raw_version` is the version text exactly as authored and may contain a
/// `${placeholder}` reference. Declarations without both coordinates, or
/// without a version, are excluded from auditing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyDeclaration<H> {
    pub group_id: String,
    pub artifact_id: String,
    pub raw_version: Option<String>,
    /// Handle of the declaration entry itself; identity for deduplication.
    pub declaration_location: H,
    /// Handle of the version token, when one is physically present.
    pub version_location: Option<H>,
}

impl<H> DependencyDeclaration<H> {
    /// "{groupId}:{artifactId}"
    pub fn coordinate(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    /// Declarations missing either coordinate are never audited.
    pub fn has_coordinate(&self) -> bool {
        !self.group_id.is_empty() && !self.artifact_id.is_empty()
    }
}

/// A `name -> value` mapping discovered when a version is written as
/// `${name}`.
///
/// `definition_location` is the handle of the definition site (where the
/// value can be rewritten). It is absent when the host can locate only the
/// reference, in which case no edit is ever planned against the binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderBinding<H> {
    pub name: String,
    pub definition_location: Option<H>,
    pub value: String,
}

/// Outcome of resolving a declaration's effective version.
///
/// `literal` never contains an unresolved `${...}` expression; declarations
/// that cannot be brought to a literal are skipped before this type is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion<H> {
    pub literal: String,
    /// Present iff the version was indirected through a placeholder.
    pub binding: Option<PlaceholderBinding<H>>,
}

impl<H> ResolvedVersion<H> {
    pub fn is_indirect(&self) -> bool {
        self.binding.is_some()
    }
}

/// Host view of one project descriptor.
///
/// The primary dependency list and the declaration-management list are kept
/// separate here; the auditor merges them and deduplicates by declaration
/// handle before processing.
pub trait DocumentModel {
    type Handle: Clone + Eq + Hash;

    /// Entries of the primary `<dependencies>` section, in document order.
    fn declarations(&self) -> Vec<DependencyDeclaration<Self::Handle>>;

    /// Entries of `<dependencyManagement>`, in document order.
    fn managed_declarations(&self) -> Vec<DependencyDeclaration<Self::Handle>>;

    /// Display name of the project, used in finding summaries.
    fn project_name(&self) -> Option<&str> {
        None
    }
}

/// Resolves a placeholder name to its definition within the document.
///
/// Returning `None` means the reference is unresolved; the declaration that
/// produced it is then skipped, never reported as an error.
pub trait ReferenceResolver {
    type Handle;

    fn resolve_placeholder(&self, name: &str) -> Option<PlaceholderBinding<Self::Handle>>;
}

/// The single text-region capability the host exposes for applying an edit.
///
/// Invoked by the host once a finding is accepted; the engine itself never
/// calls this.
pub trait EditApplier {
    type Handle;

    fn set_text(&mut self, location: &Self::Handle, value: &str) -> Result<()>;
}
