//! Remote object store client.
//!
//! Two object kinds live behind the same API surface: resources (`/files`)
//! and processing jobs (`/batches`). List endpoints wrap their payload in a
//! `data` envelope and page with `has_more` + an `after` cursor; both lists
//! are drained fully before any orchestration starts.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use batchsync_core::{Job, Resource, ResourceId};

use crate::config::RemoteConfig;
use crate::error::{io_err, ClientError};

/// Fixed processing target for every created job.
const JOB_ENDPOINT: &str = "/v1/chat/completions";
/// Fixed completion window for every created job.
const JOB_COMPLETION_WINDOW: &str = "24h";

/// JSON `data` envelope returned by list endpoints.
#[derive(Debug, Deserialize)]
struct Page<T> {
    data: Vec<T>,
    #[serde(default)]
    has_more: bool,
}

/// Client for the remote object store.
pub struct RemoteStore {
    http: Client,
    config: RemoteConfig,
}

impl RemoteStore {
    pub fn new(config: RemoteConfig) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    /// Build a store from `BATCHSYNC_API_URL` / `BATCHSYNC_API_KEY`.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(RemoteConfig::from_env()?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// All resources, every page, regardless of purpose — callers filter.
    pub async fn list_resources(&self) -> Result<Vec<Resource>, ClientError> {
        self.list_all("/files", |r: &Resource| r.id.0.clone()).await
    }

    /// All jobs, every page.
    pub async fn list_jobs(&self) -> Result<Vec<Job>, ClientError> {
        self.list_all("/batches", |j: &Job| j.id.0.clone()).await
    }

    /// Upload a local file as a new resource tagged with `purpose`.
    ///
    /// No resource is considered created when this fails — the remote
    /// service either registers the whole upload or nothing.
    pub async fn upload_resource(
        &self,
        path: &Path,
        purpose: &str,
    ) -> Result<Resource, ClientError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_owned)
            .ok_or_else(|| io_err(path, std::io::Error::other("file has no usable name")))?;
        let bytes = tokio::fs::read(path).await.map_err(|e| io_err(path, e))?;

        tracing::debug!(file = %name, size = bytes.len(), "uploading resource");
        let part = Part::bytes(bytes)
            .file_name(name)
            .mime_str("application/octet-stream")?;
        let form = Form::new()
            .part("file", part)
            .text("purpose", purpose.to_string());

        let response = self
            .http
            .post(self.url("/files"))
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Fetch a single resource's metadata by id.
    pub async fn get_resource(&self, id: &ResourceId) -> Result<Resource, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/files/{id}")))
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound { id: id.clone() });
        }
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Fetch a resource's full content as text. No streaming, no resume.
    pub async fn get_resource_content(&self, id: &ResourceId) -> Result<String, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/files/{id}/content")))
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.text().await?)
    }

    /// Create a processing job for an uploaded resource.
    ///
    /// The processing target and completion window are fixed; the input
    /// resource id is the only variable.
    pub async fn create_job(&self, input: &ResourceId) -> Result<Job, ClientError> {
        let body = json!({
            "input_file_id": input.0,
            "endpoint": JOB_ENDPOINT,
            "completion_window": JOB_COMPLETION_WINDOW,
        });
        let response = self
            .http
            .post(self.url("/batches"))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Drain every page of a list endpoint, following the `after` cursor
    /// while the server reports `has_more`.
    async fn list_all<T, F>(&self, path: &str, id_of: F) -> Result<Vec<T>, ClientError>
    where
        T: DeserializeOwned,
        F: Fn(&T) -> String,
    {
        let mut all = Vec::new();
        let mut after: Option<String> = None;
        loop {
            let mut request = self
                .http
                .get(self.url(path))
                .bearer_auth(&self.config.api_key);
            if let Some(cursor) = &after {
                request = request.query(&[("after", cursor.as_str())]);
            }
            let response = check_status(request.send().await?).await?;
            let page: Page<T> = response.json().await?;

            let cursor = page.data.last().map(&id_of);
            let fetched = page.data.len();
            all.extend(page.data);
            tracing::debug!(path, fetched, total = all.len(), "fetched list page");

            if !page.has_more || fetched == 0 {
                break;
            }
            after = cursor;
        }
        Ok(all)
    }
}

/// Map any non-success status to [`ClientError::Transport`], keeping the
/// response body for diagnostics.
async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Transport {
        status: status.as_u16(),
        body,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use batchsync_core::{JobStatus, SYNC_PURPOSE};
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path, query_param,
        query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store_for(server: &MockServer) -> RemoteStore {
        RemoteStore::new(RemoteConfig::new(server.uri(), "sk-test")).expect("client")
    }

    fn resource_json(id: &str, filename: &str, created_at: i64) -> serde_json::Value {
        json!({
            "id": id,
            "object": "file",
            "created_at": created_at,
            "bytes": 42,
            "filename": filename,
            "purpose": SYNC_PURPOSE,
        })
    }

    fn job_json(id: &str, status: &str) -> serde_json::Value {
        json!({
            "id": id,
            "object": "batch",
            "created_at": 1_700_000_000,
            "endpoint": "/v1/chat/completions",
            "completion_window": "24h",
            "status": status,
            "input_file_id": "file-in",
            "output_file_id": "file-out",
        })
    }

    #[tokio::test]
    async fn list_resources_follows_cursor_across_pages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files"))
            .and(query_param_is_missing("after"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [resource_json("file-1", "a.jsonl", 100)],
                "has_more": true,
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/files"))
            .and(query_param("after", "file-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [resource_json("file-2", "b.jsonl", 200)],
                "has_more": false,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let resources = store_for(&server).list_resources().await.expect("list");
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[1].id, ResourceId::from("file-2"));
    }

    #[tokio::test]
    async fn list_jobs_parses_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/batches"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [job_json("batch-1", "completed"), job_json("batch-2", "failed")],
                "has_more": false,
            })))
            .mount(&server)
            .await;

        let jobs = store_for(&server).list_jobs().await.expect("list");
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].status, JobStatus::Completed);
        assert_eq!(jobs[1].status, JobStatus::Failed);
    }

    #[tokio::test]
    async fn upload_sends_multipart_with_purpose() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/files"))
            .and(body_string_contains("purpose"))
            .and(body_string_contains(SYNC_PURPOSE))
            .and(body_string_contains("payload-contents"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(resource_json("file-new", "input.jsonl", 500)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("input.jsonl");
        std::fs::write(&file, "payload-contents").expect("write");

        let resource = store_for(&server)
            .upload_resource(&file, SYNC_PURPOSE)
            .await
            .expect("upload");
        assert_eq!(resource.id, ResourceId::from("file-new"));
    }

    #[tokio::test]
    async fn upload_failure_surfaces_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/files"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("input.jsonl");
        std::fs::write(&file, "x").expect("write");

        let err = store_for(&server)
            .upload_resource(&file, SYNC_PURPOSE)
            .await
            .expect_err("should fail");
        match err {
            ClientError::Transport { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_resource_maps_404_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/file-missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such file"))
            .mount(&server)
            .await;

        let err = store_for(&server)
            .get_resource(&ResourceId::from("file-missing"))
            .await
            .expect_err("should fail");
        assert!(matches!(err, ClientError::NotFound { .. }));
    }

    #[tokio::test]
    async fn get_resource_content_returns_full_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/file-out/content"))
            .respond_with(ResponseTemplate::new(200).set_body_string("line1\nline2\n"))
            .mount(&server)
            .await;

        let content = store_for(&server)
            .get_resource_content(&ResourceId::from("file-out"))
            .await
            .expect("content");
        assert_eq!(content, "line1\nline2\n");
    }

    #[tokio::test]
    async fn create_job_posts_fixed_configuration() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/batches"))
            .and(body_string_contains("\"input_file_id\":\"file-new\""))
            .and(body_string_contains(JOB_ENDPOINT))
            .and(body_string_contains(JOB_COMPLETION_WINDOW))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(job_json("batch-new", "validating")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let job = store_for(&server)
            .create_job(&ResourceId::from("file-new"))
            .await
            .expect("create");
        assert_eq!(job.id.0, "batch-new");
        assert_eq!(job.status, JobStatus::Validating);
    }
}
