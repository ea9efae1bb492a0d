//! Core abstractions for the mvn-audit engine.
//!
//! This crate defines the contracts between the audit engine and its host:
//! the document model that exposes dependency declarations, the reference
//! resolver for `${property}` indirection, the catalog search boundary, and
//! the edit-plan types the engine hands back. It owns no I/O of its own.

pub mod catalog;
pub mod document;
pub mod error;
pub mod plan;

pub use catalog::{CatalogCache, CatalogCandidate, CatalogSearch};
pub use document::{
    DependencyDeclaration, DocumentModel, EditApplier, PlaceholderBinding, ReferenceResolver,
    ResolvedVersion,
};
pub use error::{AuditError, Result};
pub use plan::{EditPlan, UpdateFinding};
