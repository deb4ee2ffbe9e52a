use async_trait::async_trait;
use thiserror::Error;

use hostpulse_core::Window;

#[derive(Debug, Error)]
pub enum ScoreError {
    /// The request never reached or never returned from the scoring
    /// service (connection refused, DNS failure, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// A response arrived but could not be decoded into a verdict,
    /// including non-success HTTP statuses.
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Anomaly judgment for one window. Ephemeral: it drives whether an
/// anomaly record is created but is never persisted itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub anomaly_score: f64,
    pub is_anomaly: bool,
    pub model_version: String,
}

/// Trait for scoring backends.
///
/// Callers own the retry policy; implementations make exactly one attempt
/// per call. The processor deliberately never retries: a failed score call
/// forfeits that window rather than blocking the stream.
#[async_trait]
pub trait Scorer: Send + Sync {
    /// Submit one full window for scoring and return its verdict.
    async fn score(&self, window: &Window) -> Result<Verdict, ScoreError>;
}
