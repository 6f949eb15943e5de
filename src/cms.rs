//! Minimal client for the DatoCMS Content Management API.
//!
//! Only what the conversion workflow needs is covered: looking records up by a field value,
//! creating items, and creating uploads from remote URLs (the latter also makes the client an
//! [`AssetStore`]). See <https://www.datocms.com/docs/content-management-api>.
//!
//! Uploads are deduplicated on the server: the downloaded bytes are hashed and an upload with the
//! same MD5 is reused instead of creating a new one.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use md5::{Digest, Md5};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tokio::sync::{Mutex, OnceCell};
use url::Url;

use crate::assets::AssetStore;
use crate::errors::CmsError;

pub const DEFAULT_BASE_URL: &str = "https://site-api.datocms.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const RECORDS_PAGE_LIMIT: usize = 100;
const API_VERSION: &str = "3";
const JSON_API: &str = "application/vnd.api+json";

/// Connection settings for [`CmaClient`]
#[derive(Clone, Debug)]
pub struct CmaConfig {
    pub api_token: String,
    pub base_url: String,
    /// Sandbox environment to target; primary environment when `None`
    pub environment: Option<String>,
    pub timeout: Duration,
    /// Delay between two polls of an upload job
    pub job_poll_interval: Duration,
    pub max_job_polls: usize,
}

impl CmaConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        CmaConfig {
            api_token: api_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            environment: None,
            timeout: DEFAULT_TIMEOUT,
            job_poll_interval: Duration::from_secs(1),
            max_job_polls: 60,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_environment(mut self, environment: Option<String>) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_job_polling(mut self, interval: Duration, max_polls: usize) -> Self {
        self.job_poll_interval = interval;
        self.max_job_polls = max_polls;
        self
    }
}

/// A JSON:API resource as returned by the CMA
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Record {
    pub id: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

#[derive(Deserialize, Debug)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize, Debug)]
struct JobResultAttributes {
    status: u16,
    payload: Value,
}

#[derive(Deserialize, Debug)]
struct JobResult {
    attributes: JobResultAttributes,
}

pub struct CmaClient {
    http: Client,
    config: CmaConfig,
    /// Source URL -> upload id, one cell per URL so that only calls for the same URL wait on
    /// each other
    uploads: Mutex<HashMap<String, Arc<OnceCell<String>>>>,
}

impl CmaClient {
    pub fn new(config: CmaConfig) -> Result<Self, CmsError> {
        let http = Client::builder()
            .user_agent(concat!("html2dast/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;
        Ok(CmaClient {
            http,
            config,
            uploads: Mutex::new(HashMap::new()),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request
            .bearer_auth(&self.config.api_token)
            .header("Accept", "application/json")
            .header("X-Api-Version", API_VERSION);
        match &self.config.environment {
            Some(environment) => request.header("X-Environment", environment),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, CmsError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(CmsError::Api {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            })
        }
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, CmsError> {
        let response = self.send(self.authorized(request)).await?;
        let envelope: Envelope<T> = response.json().await?;
        Ok(envelope.data)
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Value,
    ) -> Result<T, CmsError> {
        let request = self
            .http
            .post(self.endpoint(path))
            .header("Content-Type", JSON_API)
            .body(body.to_string());
        self.request_json(request).await
    }

    /// Lists the records of `item_type` whose `field` equals `value` (first page only)
    pub async fn fetch_records(
        &self,
        item_type: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Record>, CmsError> {
        let field_filter = format!("filter[fields][{}][eq]", field);
        let limit = RECORDS_PAGE_LIMIT.to_string();
        let request = self.http.get(self.endpoint("/items")).query(&[
            ("filter[type]", item_type),
            (field_filter.as_str(), value),
            ("page[limit]", limit.as_str()),
            ("version", "current"),
        ]);
        self.request_json(request).await
    }

    /// Creates a record of the model `item_type_id`
    pub async fn create_item(
        &self,
        item_type_id: &str,
        attributes: Map<String, Value>,
    ) -> Result<Record, CmsError> {
        self.post_json(
            "/items",
            json!({
                "data": {
                    "type": "item",
                    "attributes": attributes,
                    "relationships": {
                        "item_type": {"data": {"type": "item_type", "id": item_type_id}}
                    }
                }
            }),
        )
        .await
    }

    /// Looks up an existing upload by the MD5 checksum of its content
    pub async fn find_upload_by_md5(&self, md5: &str) -> Result<Option<Record>, CmsError> {
        let request = self.http.get(self.endpoint("/uploads")).query(&[
            ("filter[fields][md5][eq]", md5),
            ("page[limit]", "1"),
        ]);
        let uploads: Vec<Record> = self.request_json(request).await?;
        Ok(uploads.into_iter().next())
    }

    /// Downloads `url` and returns the id of the upload holding its content, creating one only
    /// when no upload with the same checksum exists yet
    async fn upload_from_url(&self, url: &str) -> Result<String, CmsError> {
        let filename = filename_from_url(url)?;
        let bytes = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        debug!("Downloaded {} bytes from {}", bytes.len(), url);

        let checksum = hex::encode(Md5::digest(&bytes));
        if let Some(existing) = self.find_upload_by_md5(&checksum).await? {
            info!("Reusing upload {} (md5 {}) for {}", existing.id, checksum, url);
            return Ok(existing.id);
        }

        let upload_request: Record = self
            .post_json(
                "/upload-requests",
                json!({"data": {"type": "upload_request", "attributes": {"filename": filename}}}),
            )
            .await?;
        let Some(put_url) = upload_request.attributes.get("url").and_then(Value::as_str) else {
            return Err(CmsError::UnexpectedResponse(
                "upload request without url".to_string(),
            ));
        };
        // the storage bucket takes the raw bytes and no CMA credentials
        self.send(self.http.put(put_url).body(bytes)).await?;

        let job: Record = self
            .post_json(
                "/uploads",
                json!({"data": {"type": "upload", "attributes": {"path": upload_request.id}}}),
            )
            .await?;
        self.await_job(&job.id).await
    }

    /// Polls an upload job until its result is available and returns the created upload's id
    async fn await_job(&self, job_id: &str) -> Result<String, CmsError> {
        let path = format!("/job-results/{}", job_id);
        for attempt in 0..self.config.max_job_polls {
            let response = self
                .authorized(self.http.get(self.endpoint(&path)))
                .send()
                .await?;
            if response.status() == StatusCode::NOT_FOUND {
                debug!("Upload job {} pending (poll {})", job_id, attempt + 1);
                tokio::time::sleep(self.config.job_poll_interval).await;
                continue;
            }
            if !response.status().is_success() {
                return Err(CmsError::Api {
                    status: response.status().as_u16(),
                    body: response.text().await.unwrap_or_default(),
                });
            }
            let result: Envelope<JobResult> = response.json().await?;
            let JobResultAttributes { status, payload } = result.data.attributes;
            if status >= 400 {
                return Err(CmsError::Api {
                    status,
                    body: payload.to_string(),
                });
            }
            return payload
                .pointer("/data/id")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| {
                    CmsError::UnexpectedResponse(format!("job result without upload: {}", payload))
                });
        }
        Err(CmsError::JobTimeout(job_id.to_string()))
    }
}

#[async_trait]
impl AssetStore for CmaClient {
    async fn create_from_url(&self, url: &str) -> Result<String, CmsError> {
        if url.trim().is_empty() {
            return Err(CmsError::EmptyUrl);
        }
        let cell = self
            .uploads
            .lock()
            .await
            .entry(url.to_string())
            .or_default()
            .clone();
        // a failed upload leaves the cell empty, so the next call retries
        let upload_id = cell.get_or_try_init(|| self.upload_from_url(url)).await?;
        Ok(upload_id.clone())
    }
}

/// Last path segment of `url`, used as the stored filename
pub fn filename_from_url(url: &str) -> Result<String, CmsError> {
    let parsed = Url::parse(url).map_err(|e| CmsError::InvalidUrl(url.to_string(), e))?;
    let filename = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .unwrap_or("upload");
    Ok(filename.to_string())
}
