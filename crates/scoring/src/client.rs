use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use hostpulse_core::config::ScoringConfig;
use hostpulse_core::{Sample, Window};

use crate::traits::{ScoreError, Scorer, Verdict};

use async_trait::async_trait;

/// Client for the external anomaly-scoring HTTP service.
///
/// Posts one window per call to `{base_url}/infer`. The request carries a
/// hard timeout so a hung scoring service cannot stall the stream loop
/// indefinitely.
pub struct ScoringClient {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct InferRequest<'a> {
    window: &'a [Sample],
}

#[derive(Deserialize)]
struct InferResponse {
    status: String,
    anomaly_score: f64,
    is_anomaly: bool,
    model_version: String,
}

impl ScoringClient {
    pub fn new(config: &ScoringConfig) -> Result<Self, ScoreError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ScoreError::Transport(format!("client build failed: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Scorer for ScoringClient {
    async fn score(&self, window: &Window) -> Result<Verdict, ScoreError> {
        let request = InferRequest {
            window: window.samples(),
        };

        let response = self
            .client
            .post(format!("{}/infer", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| ScoreError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ScoreError::Protocol(format!("{status}: {body}")));
        }

        let parsed: InferResponse = response
            .json()
            .await
            .map_err(|e| ScoreError::Protocol(e.to_string()))?;

        debug!(
            status = %parsed.status,
            score = parsed.anomaly_score,
            anomalous = parsed.is_anomaly,
            model = %parsed.model_version,
            "Scoring response received"
        );

        Ok(Verdict {
            anomaly_score: parsed.anomaly_score,
            is_anomaly: parsed.is_anomaly,
            model_version: parsed.model_version,
        })
    }
}
