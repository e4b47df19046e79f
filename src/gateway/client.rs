use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::core::envelope::Envelope;
use crate::core::error::GatewayError;

/// Thin JSON client for the Synsight API. Every response is decoded as an
/// envelope; HTTP status codes only matter when the body is not one.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Http(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Envelope<T>, GatewayError> {
        let builder = self.request(Method::GET, path).query(query);
        send(builder).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Envelope<T>, GatewayError> {
        send(self.request(Method::POST, path).json(body)).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<Envelope<T>, GatewayError> {
        let builder = self.request(Method::PUT, path);
        let builder = match body {
            Some(body) => builder.json(body),
            None => builder,
        };
        send(builder).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>, GatewayError> {
        send(self.request(Method::DELETE, path)).await
    }
}

async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<Envelope<T>, GatewayError> {
    let response = builder.send().await.map_err(map_transport_error)?;
    decode(response).await
}

fn map_transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Http(format!("request timed out: {e}"))
    } else {
        GatewayError::Http(e.to_string())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<Envelope<T>, GatewayError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| GatewayError::Http(e.to_string()))?;

    match serde_json::from_str::<Envelope<T>>(&body) {
        Ok(envelope) => Ok(envelope),
        Err(e) if status.is_success() => Err(GatewayError::Decode(e.to_string())),
        Err(_) => {
            // Not an envelope (proxy error page, crash); report what we got.
            let message = serde_json::from_str::<Envelope<serde_json::Value>>(&body)
                .ok()
                .and_then(|env| env.message)
                .unwrap_or_else(|| body.chars().take(200).collect());
            Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}
