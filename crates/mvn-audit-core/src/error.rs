//! Error taxonomy shared across the audit workspace.
//!
//! Every failure mode is local: the audit loop degrades per declaration
//! instead of aborting, so these errors surface at collaborator boundaries
//! (parsing a descriptor, querying the catalog) and never out of the
//! comparison or planning code.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Failed to parse pom.xml: {message}")]
    ParseError { message: String },

    #[error("Catalog request failed for '{coordinate}': {source}")]
    CatalogError {
        coordinate: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to parse catalog response for '{coordinate}': {source}")]
    ApiResponseError {
        coordinate: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid Maven coordinates '{coordinates}': expected 'groupId:artifactId'")]
    InvalidCoordinates { coordinates: String },

    #[error("Edit target is invalid: {message}")]
    InvalidEditTarget { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AuditError>;
