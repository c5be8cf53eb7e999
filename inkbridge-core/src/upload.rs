//! Submission of mapped bodies.
use serde::Serialize;
use serde_json::Value;

use crate::api::{Endpoint, api_error};
use crate::body::{BattleBody, CoopBody};
use crate::constants::{MSGPACK_CONTENT_TYPE, PATH_POST_BATTLE, PATH_POST_SALMON};
use crate::error::ExportError;

pub struct UploadClient {
    endpoint: Endpoint,
}

impl UploadClient {
    #[must_use]
    pub const fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }

    /// Submit a battle; returns the stat.ink page of the new record.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails, the request fails, or stat.ink rejects it.
    pub async fn post_battle(&self, body: &BattleBody) -> Result<String, ExportError> {
        self.submit(PATH_POST_BATTLE, body).await
    }

    /// Submit a coop session; returns the stat.ink page of the new record.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails, the request fails, or stat.ink rejects it.
    pub async fn post_coop(&self, body: &CoopBody) -> Result<String, ExportError> {
        self.submit(PATH_POST_SALMON, body).await
    }

    async fn submit<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<String, ExportError> {
        let encoded = rmp_serde::to_vec_named(body)?;
        let response = self
            .endpoint
            .post(path, MSGPACK_CONTENT_TYPE, encoded)
            .await?;
        let url = self.endpoint.url(path);
        let parsed: Option<Value> = response.json().ok();
        let accepted = matches!(response.status, 200 | 201)
            && parsed.as_ref().is_some_and(|json| json.get("error").is_none());
        if !accepted {
            return Err(api_error(url, &response).into());
        }
        parsed
            .as_ref()
            .and_then(|json| json.get("url"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| api_error(url, &response).into())
    }
}
