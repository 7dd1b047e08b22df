use super::traits::{MlEndpoint, MlEngine, MlEngineError};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// JSON-over-HTTP client for the scoring service.
pub struct HttpMlEngine {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMlEngine {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        info!(%base_url, ?timeout, "Initializing HttpMlEngine");
        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode(response: reqwest::Response) -> Result<Value, MlEngineError> {
        let status = response.status();
        if !status.is_success() {
            // Prefer the engine's own `error` field when it sends one.
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| "ML Engine error".to_string());
            return Err(MlEngineError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| MlEngineError::Decode(e.to_string()))
    }
}

fn transport_error(err: reqwest::Error) -> MlEngineError {
    if err.is_timeout() {
        MlEngineError::Unreachable(format!("timeout: {}", err))
    } else {
        MlEngineError::Unreachable(err.to_string())
    }
}

#[async_trait]
impl MlEngine for HttpMlEngine {
    fn base_url(&self) -> String {
        self.base_url.clone()
    }

    #[instrument(skip(self))]
    async fn health(&self) -> Result<Value, MlEngineError> {
        let response = self
            .client
            .get(self.url("/api/health"))
            .send()
            .await
            .map_err(transport_error)?;
        Self::decode(response).await
    }

    #[instrument(skip(self, body), fields(path = %endpoint.path()))]
    async fn call(&self, endpoint: MlEndpoint, body: Value) -> Result<Value, MlEngineError> {
        debug!("Forwarding request to ML engine");
        let response = self
            .client
            .post(self.url(&endpoint.path()))
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        Self::decode(response).await
    }
}
