use async_trait::async_trait;
use reqwest::{
    header::{AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE},
    Client, StatusCode,
};
use serde::Deserialize;
use shared::{domain::ReportId, error::StoreError};
use tracing::debug;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// PostgREST error code for a record whose shape does not match the
/// collection schema ("could not find column ... in the schema cache").
const SCHEMA_MISMATCH_CODE: &str = "PGRST204";

/// Per-object upload options. `overwrite` stays false in the pipeline so a
/// colliding object name from a prior submission is rejected instead of
/// silently replaced.
#[derive(Debug, Clone)]
pub struct PutOptions {
    pub cache_control: String,
    pub overwrite: bool,
}

impl Default for PutOptions {
    fn default() -> Self {
        Self {
            cache_control: "3600".to_string(),
            overwrite: false,
        }
    }
}

/// Name-addressed binary object storage with public-URL resolution.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(
        &self,
        object_name: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
        options: &PutOptions,
    ) -> Result<(), StoreError>;

    /// Pure name-to-URL computation; performs no I/O.
    fn resolve_public_url(&self, object_name: &str) -> String;
}

/// Schema-validated row insertion into a named collection.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert(
        &self,
        collection: &str,
        record: serde_json::Value,
    ) -> Result<ReportId, StoreError>;
}

/// Blob store backed by a Supabase-style storage HTTP API.
#[derive(Clone)]
pub struct HttpBlobStore {
    http: Client,
    base_url: String,
    api_key: String,
    store: String,
}

impl HttpBlobStore {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        store: impl Into<String>,
    ) -> Self {
        Self::with_client(Client::new(), base_url, api_key, store)
    }

    /// Like [`new`](Self::new) but with a caller-configured client
    /// (custom timeouts, proxy settings).
    pub fn with_client(
        http: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        store: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: trim_base_url(base_url.into()),
            api_key: api_key.into(),
            store: store.into(),
        }
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn put(
        &self,
        object_name: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
        options: &PutOptions,
    ) -> Result<(), StoreError> {
        let url = format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, self.store, object_name
        );
        debug!(object_name, size = bytes.len(), "uploading object");

        let response = self
            .http
            .post(&url)
            .header("apikey", &self.api_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header("x-upsert", if options.overwrite { "true" } else { "false" })
            .header(CACHE_CONTROL, &options.cache_control)
            .header(CONTENT_TYPE, content_type.unwrap_or(DEFAULT_CONTENT_TYPE))
            .body(bytes)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Transport(format!(
                "blob store returned {status}: {body}"
            )));
        }
        Ok(())
    }

    fn resolve_public_url(&self, object_name: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.store, object_name
        )
    }
}

/// Record store backed by a PostgREST-style HTTP API.
#[derive(Clone)]
pub struct HttpRecordStore {
    http: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct InsertedRow {
    id: i64,
}

impl HttpRecordStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url, api_key)
    }

    /// Like [`new`](Self::new) but with a caller-configured client.
    pub fn with_client(
        http: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: trim_base_url(base_url.into()),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn insert(
        &self,
        collection: &str,
        record: serde_json::Value,
    ) -> Result<ReportId, StoreError> {
        let url = format!("{}/rest/v1/{}", self.base_url, collection);
        debug!(collection, "inserting record");

        let response = self
            .http
            .post(&url)
            .header("apikey", &self.api_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header("Prefer", "return=representation")
            .json(&record)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        if !status.is_success() {
            return Err(classify_insert_failure(status, body));
        }

        let rows: Vec<InsertedRow> = serde_json::from_str(&body)
            .map_err(|e| StoreError::Transport(format!("unreadable insert response: {e}")))?;
        rows.first()
            .map(|row| ReportId(row.id))
            .ok_or_else(|| StoreError::Transport("insert response contained no row".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct RejectionBody {
    code: Option<String>,
}

/// A 4xx carrying the PostgREST `PGRST204` code is the store rejecting the
/// record shape; for stores that answer with unstructured text, a body
/// naming a column is taken as the same signal. Everything else, including
/// constraint violations that happen to mention a column, is plain
/// transport. The rejection body passes through verbatim for schema-drift
/// diagnosis.
fn classify_insert_failure(status: StatusCode, body: String) -> StoreError {
    if status.is_client_error() {
        match serde_json::from_str::<RejectionBody>(&body) {
            Ok(rejection) => {
                if rejection.code.as_deref() == Some(SCHEMA_MISMATCH_CODE) {
                    return StoreError::SchemaMismatch { message: body };
                }
            }
            Err(_) => {
                if body.contains("column") {
                    return StoreError::SchemaMismatch { message: body };
                }
            }
        }
    }
    StoreError::Transport(format!("record store returned {status}: {body}"))
}

fn transport(err: reqwest::Error) -> StoreError {
    StoreError::Transport(err.to_string())
}

fn trim_base_url(mut base_url: String) -> String {
    while base_url.ends_with('/') {
        base_url.pop();
    }
    base_url
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
