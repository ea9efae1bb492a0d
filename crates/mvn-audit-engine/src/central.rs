//! Maven Central search client.

use async_trait::async_trait;
use serde::Deserialize;

use mvn_audit_core::{AuditError, CatalogCandidate, CatalogSearch, Result};

const MAVEN_SEARCH_BASE: &str = "https://search.maven.org/solrsearch/select";

pub fn artifact_url(group_id: &str, artifact_id: &str) -> String {
    format!("https://central.sonatype.com/artifact/{group_id}/{artifact_id}")
}

/// Queries the search.maven.org solr endpoint with `core=gav`, which lists
/// one document per published version of an artifact.
#[derive(Clone)]
pub struct MavenCentralCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl MavenCentralCatalog {
    pub fn new() -> Self {
        Self::with_base_url(MAVEN_SEARCH_BASE)
    }

    /// Points the client at a different endpoint, used by tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for MavenCentralCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogSearch for MavenCentralCatalog {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<CatalogCandidate>> {
        let url = format!(
            "{base}?q={q}&core=gav&rows={limit}&wt=json",
            base = self.base_url,
            q = urlencoding::encode(query),
        );
        tracing::debug!(%url, "querying catalog");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| AuditError::CatalogError {
                coordinate: query.to_string(),
                source: Box::new(e),
            })?;

        let data = response.bytes().await.map_err(|e| AuditError::CatalogError {
            coordinate: query.to_string(),
            source: Box::new(e),
        })?;

        parse_search_response(&data, query, limit)
    }
}

#[derive(Deserialize)]
struct SolrSearchResponse {
    response: SolrSearchBody,
}

#[derive(Deserialize)]
struct SolrSearchBody {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Deserialize)]
struct SearchDoc {
    g: String,
    a: String,
    v: String,
}

fn parse_search_response(data: &[u8], query: &str, limit: usize) -> Result<Vec<CatalogCandidate>> {
    let response: SolrSearchResponse =
        serde_json::from_slice(data).map_err(|e| AuditError::ApiResponseError {
            coordinate: query.to_string(),
            source: e,
        })?;

    Ok(response
        .response
        .docs
        .into_iter()
        .take(limit)
        .map(|d| CatalogCandidate {
            group_id: d.g,
            artifact_id: d.a,
            version: d.v,
        })
        .collect())
}
