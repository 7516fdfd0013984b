// API client module: contains a small blocking HTTP client that talks to
// a Langflow server. It is intentionally small and synchronous to keep
// the learning curve low for beginners.

use anyhow::{Context, Result};
use reqwest::blocking::{Client, multipart};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::ApiError;

/// Where a default local Langflow instance listens.
pub const DEFAULT_HOST: &str = "http://127.0.0.1:7860";

/// MIME types accepted for upload (text, PDF, Word, RTF, CSV, images).
/// The UI checks a file's detected type against this list before anything
/// leaves the machine; the upload operations themselves send whatever
/// content type they are handed, unvalidated.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "text/plain",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/rtf",
    "text/csv",
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/bmp",
    "image/webp",
    "image/jpg",
];

/// Returns whether `mime` is on the upload allow-list.
pub fn is_allowed_mime(mime: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mime)
}

/// Simple API client that holds a reqwest blocking client, the base URL
/// of the Langflow server and an optional API key for servers that
/// require one.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

/// Status code and raw body text of a completed HTTP exchange.
///
/// The body is handed back untouched. A non-2xx status is data here, not
/// an error: the server's reply gets printed verbatim either way.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

/// Payload for the flow run endpoint. Fields mirror what Langflow's
/// `/api/v1/run/{flow_id}` expects; empty ones are left out of the
/// serialized JSON.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct FlowRunRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty", default)]
    pub tweaks: HashMap<String, ComponentTweak>,
}

/// Per-component overrides sent under `tweaks`. A file component takes the
/// server-side `path` returned by the V2 upload, or `files` when driving
/// the V1 API.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ComponentTweak {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_value: Option<String>,
}

impl ApiClient {
    /// Create an ApiClient configured from the environment variables
    /// `LANGFLOW_URL` and `LANGFLOW_API_KEY`, falling back to the local
    /// instance at `http://127.0.0.1:7860`.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("LANGFLOW_URL").unwrap_or_else(|_| DEFAULT_HOST.into());
        let mut api = Self::new(&base_url)?;
        if let Ok(key) = std::env::var("LANGFLOW_API_KEY") {
            api.set_api_key(&key);
        }
        Ok(api)
    }

    /// Create an ApiClient against an explicit base URL. A trailing slash
    /// is stripped so endpoint paths can be appended uniformly.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
        })
    }

    /// The server this client talks to, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Store an API key for subsequent requests.
    pub fn set_api_key(&mut self, key: &str) {
        self.api_key = Some(key.to_string());
    }

    /// Returns whether an API key is present in the client.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Helper to build the request headers: `Accept: application/json`
    /// always, plus `x-api-key` when a key is set.
    fn request_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(key) = &self.api_key {
            headers.insert("x-api-key", HeaderValue::from_str(key).unwrap());
        }
        headers
    }

    /// Upload a file to the V2 files endpoint (`/api/v2/files/`) as
    /// multipart/form-data with a single part named `file`.
    ///
    /// `content_type` is declared on the part as given; it is not checked
    /// against the file's actual contents. The raw response body comes
    /// back whatever the HTTP status.
    pub fn upload_user_file(
        &self,
        file_path: &Path,
        filename: &str,
        content_type: &str,
    ) -> Result<ApiResponse, ApiError> {
        let url = format!("{}/api/v2/files/", self.base_url);
        self.upload(&url, file_path, filename, content_type)
    }

    /// Upload a file scoped to one flow via the V1 endpoint
    /// (`/api/v1/files/upload/{flow_id}`). Same wire shape as the V2
    /// upload, different path.
    pub fn upload_flow_file(
        &self,
        flow_id: &str,
        file_path: &Path,
        filename: &str,
        content_type: &str,
    ) -> Result<ApiResponse, ApiError> {
        let url = format!("{}/api/v1/files/upload/{}", self.base_url, flow_id);
        self.upload(&url, file_path, filename, content_type)
    }

    /// Shared upload body for both file endpoints: one POST, one part.
    fn upload(
        &self,
        url: &str,
        file_path: &Path,
        filename: &str,
        content_type: &str,
    ) -> Result<ApiResponse, ApiError> {
        // Read the whole file up front. The demo targets small inputs, and
        // a fixed-length body keeps the wire free of chunked encoding. The
        // handle is closed here, before any network activity starts.
        let bytes = fs::read(file_path).map_err(|source| ApiError::FileNotFound {
            path: file_path.to_path_buf(),
            source,
        })?;

        let part = multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|_| ApiError::InvalidContentType {
                mime: content_type.to_string(),
            })?;
        let form = multipart::Form::new().part("file", part);

        let res = self
            .client
            .post(url)
            .headers(self.request_headers())
            .multipart(form)
            .send()
            .map_err(|e| classify(url, e))?;

        let status = res.status().as_u16();
        let body = res.text().map_err(|e| classify(url, e))?;
        Ok(ApiResponse { status, body })
    }

    /// Run a flow by POSTing a JSON payload to
    /// `/api/v1/run/{flow_id}?stream=false`. The response body is returned
    /// raw; see `extract_message` for pulling the chat text out of it.
    pub fn run_flow(
        &self,
        flow_id: &str,
        request: &FlowRunRequest,
    ) -> Result<ApiResponse, ApiError> {
        let url = format!("{}/api/v1/run/{}", self.base_url, flow_id);
        let res = self
            .client
            .post(&url)
            .query(&[("stream", "false")])
            .headers(self.request_headers())
            .json(request)
            .send()
            .map_err(|e| classify(&url, e))?;

        let status = res.status().as_u16();
        let body = res.text().map_err(|e| classify(&url, e))?;
        Ok(ApiResponse { status, body })
    }
}

/// Sort a reqwest error into the client's taxonomy: reachability problems
/// are `Connection`, everything past the connect is `Transport`.
fn classify(url: &str, source: reqwest::Error) -> ApiError {
    if source.is_connect() || source.is_timeout() {
        ApiError::Connection {
            url: url.to_string(),
            source,
        }
    } else {
        ApiError::Transport {
            url: url.to_string(),
            source,
        }
    }
}

/// Find the server-side location of an uploaded file in an upload
/// response. The V2 API reports it as `path`, the V1 API as `file_path`,
/// and some responses only carry an `id`; checked in that order.
pub fn uploaded_file_path(body: &Value) -> Option<String> {
    ["path", "file_path", "id"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str).map(str::to_string))
}

/// Pull the assistant message text out of a flow run response, which
/// nests it at `outputs[0].outputs[0].results.message.data.text`.
pub fn extract_message(body: &Value) -> Option<&str> {
    body.pointer("/outputs/0/outputs/0/results/message/data/text")
        .and_then(Value::as_str)
}
