//! The HTTP seam. The engine only needs "send a request, get status and body";
//! platform crates provide the actual client.
use serde::de::DeserializeOwned;

use crate::error::TransportError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends requests to stat.ink.
///
/// Implementations decide timeouts and TLS; they must not retry.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be completed at all.
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;

    /// Issue a POST request with `request.body`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be completed at all.
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_headers_are_case_insensitive() {
        let req = HttpRequest::new("https://stat.ink").header("Authorization", "Bearer x");
        assert_eq!(req.header_value("authorization"), Some("Bearer x"));
        assert_eq!(req.header_value("content-type"), None);
    }

    #[test]
    fn response_json_and_status() {
        let resp = HttpResponse::new(201, r#"{ "url": "https://stat.ink/x" }"#);
        assert!(resp.is_success());
        let value: serde_json::Value = resp.json().unwrap();
        assert_eq!(value["url"], "https://stat.ink/x");
        assert!(!HttpResponse::new(404, "").is_success());
    }
}
