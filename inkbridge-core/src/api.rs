//! Authenticated access to one stat.ink instance.
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ApiKey;
use crate::constants::{AGENT_NAME, AGENT_VERSION};
use crate::error::{ApiError, ExportError};
use crate::transport::{HttpRequest, HttpResponse, Transport};

/// Base URL, bearer credentials and the transport shared by the catalog,
/// dedup and upload clients.
#[derive(Clone)]
pub struct Endpoint {
    base_url: String,
    api_key: ApiKey,
    transport: Arc<dyn Transport>,
}

impl Endpoint {
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: ApiKey, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            transport,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, path: &str) -> HttpRequest {
        HttpRequest::new(self.url(path))
            .header("Authorization", format!("Bearer {}", self.api_key.as_str()))
            .header("User-Agent", format!("{AGENT_NAME}/{AGENT_VERSION}"))
    }

    /// GET `path` and decode a JSON reply.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Api`] on a non-2xx status or an undecodable body,
    /// and [`ExportError::Transport`] if the request fails.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ExportError> {
        let request = self.request(path).header("Accept", "application/json");
        let url = request.url.clone();
        log::debug!("GET {url}");
        let response = self
            .transport
            .get(request)
            .await
            .map_err(ExportError::Transport)?;
        if !response.is_success() {
            return Err(api_error(url, &response).into());
        }
        response
            .json()
            .map_err(|_| api_error(url, &response).into())
    }

    /// POST a pre-encoded body.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Transport`] if the request fails. Status codes
    /// are left to the caller.
    pub async fn post(
        &self,
        path: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<HttpResponse, ExportError> {
        let request = self
            .request(path)
            .header("Content-Type", content_type)
            .body(body);
        log::debug!("POST {} ({} bytes)", request.url, request.body.len());
        self.transport
            .post(request)
            .await
            .map_err(ExportError::Transport)
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key)
            .finish_non_exhaustive()
    }
}

/// Build an [`ApiError`] from a reply, keeping the JSON body when it parses.
#[must_use]
pub fn api_error(url: String, response: &HttpResponse) -> ApiError {
    ApiError {
        url,
        status: response.status,
        raw: response.text(),
        body: response.json::<Value>().ok(),
    }
}
