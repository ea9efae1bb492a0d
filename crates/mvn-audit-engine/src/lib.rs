//! Dependency-version audit engine for Maven descriptors.
//!
//! This crate provides the audit pipeline built on the contracts in
//! `mvn-audit-core`: Maven version comparison, declared-version
//! resolution through `${placeholder}` indirection, catalog matching,
//! and update planning. It also ships the two reference collaborators a
//! host needs to run an audit end to end: an in-memory pom.xml document
//! model and a Maven Central search client.

pub mod audit;
pub mod central;
pub mod document;
pub mod matcher;
pub mod planner;
pub mod resolver;
pub mod version;

pub use audit::{AuditConfig, Auditor, DEFAULT_SEARCH_LIMIT};
pub use central::{MavenCentralCatalog, artifact_url};
pub use document::{PomDocument, Span};
pub use matcher::find_latest;
pub use planner::plan_update;
pub use resolver::resolve_declaration;
pub use version::{MavenVersion, compare_versions};
