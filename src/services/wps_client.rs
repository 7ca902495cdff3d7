use crate::config::TriggerConfig;
use crate::error::{NetworkError, TriggerError};
use crate::models::{StageOutcome, StagePayload};
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

/// Upper bound on the startup health check, independent of the stage request timeout
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Remote end of the trigger: runs one stage request and reports its outcome
#[async_trait::async_trait]
pub trait ProcessingClient: Send + Sync {
    /// Send the stage body once, without retrying.
    ///
    /// A response with any status code is an `Ok` outcome; only requests that
    /// never got a status back are errors.
    async fn trigger_stage(
        &self,
        payload: &StagePayload,
    ) -> Result<StageOutcome, TriggerError>;

    /// Check if the processing server answers at all
    async fn health_check(&self) -> bool;
}

/// Processing server reached over HTTP (GeoServer WPS)
pub struct WpsClient {
    http: reqwest::Client,
    endpoint: String,
}

impl WpsClient {
    pub fn new(http: reqwest::Client, endpoint: String) -> Self {
        Self { http, endpoint }
    }

    /// Build the client, rejecting an endpoint that is not an absolute http(s) URL
    pub fn from_config(config: &TriggerConfig) -> Result<Self, TriggerError> {
        let endpoint = config.endpoint_url();
        let url = reqwest::Url::parse(&endpoint).map_err(|e| TriggerError::InvalidEndpoint {
            url: endpoint.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(TriggerError::InvalidEndpoint {
                url: endpoint,
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(TriggerError::HttpClient)?;
        Ok(Self::new(http, endpoint))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl ProcessingClient for WpsClient {
    async fn trigger_stage(
        &self,
        payload: &StagePayload,
    ) -> Result<StageOutcome, TriggerError> {
        let stage = payload.stage();
        let transport = |source| TriggerError::Transport { stage, source };

        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/xml")
            .body(payload.body.clone())
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            // Body is only useful for diagnostics here
            if let Ok(text) = response.text().await {
                tracing::debug!("{} stage error body: {}", stage, text);
            }
            return Ok(StageOutcome::Failure(NetworkError::new(stage, status)));
        }

        let body = response.bytes().await.map_err(transport)?;
        Ok(StageOutcome::Success(body))
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}?service=WPS&request=GetCapabilities", self.endpoint);
        let request = self.http.get(&url).timeout(HEALTH_CHECK_TIMEOUT).send();
        match request.await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::debug!("WPS health check failed: {}", e);
                false
            }
        }
    }
}

/// Client that accepts every stage without sending anything (dry runs)
pub struct NoOpClient;

#[async_trait::async_trait]
impl ProcessingClient for NoOpClient {
    async fn trigger_stage(
        &self,
        payload: &StagePayload,
    ) -> Result<StageOutcome, TriggerError> {
        tracing::warn!("NoOpClient: not sending {} stage (dry run)", payload.stage());
        Ok(StageOutcome::Success(bytes::Bytes::new()))
    }

    async fn health_check(&self) -> bool {
        true
    }
}
