use std::time::Duration;

use inkbridge_core::{HttpRequest, HttpResponse, Transport, TransportError};
use reqwest::{Client, RequestBuilder};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// [`Transport`] backed by a shared reqwest client.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    async fn send(
        &self,
        builder: RequestBuilder,
        request: HttpRequest,
    ) -> Result<HttpResponse, TransportError> {
        let builder = request
            .headers
            .iter()
            .fold(builder, |builder, (name, value)| builder.header(name, value));
        let builder = if request.body.is_empty() {
            builder
        } else {
            builder.body(request.body)
        };
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        log::debug!("{} -> {status} ({} bytes)", request.url, body.len());
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let builder = self.client.get(&request.url);
        self.send(builder, request).await
    }

    async fn post(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let builder = self.client.post(&request.url);
        self.send(builder, request).await
    }
}
