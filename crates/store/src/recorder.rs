//! Durable recording of anomalous verdicts.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, warn};

use hostpulse_core::config::PostgresConfig;
use hostpulse_core::Window;
use hostpulse_scoring::Verdict;

use crate::error::StoreError;

/// Metric identifier written into every anomaly record.
///
/// The verdict covers the whole multi-metric window but the persisted
/// record names a single metric. Known scope limitation of the record
/// format; kept for compatibility.
pub const METRIC_CPU_USAGE: &str = "cpu_usage";

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(5);

const CREATE_ANOMALIES_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS anomalies (
    id SERIAL PRIMARY KEY,
    hostname TEXT,
    metric TEXT,
    window_start TIMESTAMPTZ,
    window_end TIMESTAMPTZ,
    anomaly_score REAL,
    model_version TEXT,
    created_at TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP
)";

const INSERT_ANOMALY: &str = "\
INSERT INTO anomalies (hostname, metric, window_start, window_end, anomaly_score, model_version)
VALUES ($1, $2, $3, $4, $5, $6)";

/// Sink for verdicts judged anomalous.
///
/// One insert per anomalous window. Callers log failures and keep the
/// stream moving; the sample stream is already acknowledged by the time a
/// record is attempted and cannot be replayed from here.
#[async_trait]
pub trait AnomalySink: Send + Sync {
    async fn record(&self, window: &Window, verdict: &Verdict) -> Result<(), StoreError>;
}

/// PostgreSQL-backed anomaly recorder.
///
/// Owns a single long-lived pool, used only from the stream loop.
pub struct AnomalyRecorder {
    pool: PgPool,
}

impl AnomalyRecorder {
    /// Establish the store connection with bounded retry.
    ///
    /// Up to 5 attempts, 5 seconds apart, each attempt connecting and
    /// running a liveness ping. Exhausting all attempts returns
    /// [`StoreError::ConnectExhausted`], which the process must treat as
    /// fatal.
    pub async fn connect(config: &PostgresConfig) -> Result<Self, StoreError> {
        let url = config.connection_string();
        let mut last_error = String::new();

        for attempt in 1..=CONNECT_ATTEMPTS {
            match PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&url)
                .await
            {
                Ok(pool) => match sqlx::query("SELECT 1").execute(&pool).await {
                    Ok(_) => {
                        info!(host = %config.host, database = %config.database, "Connected to the anomaly store");
                        return Ok(Self { pool });
                    }
                    Err(e) => last_error = e.to_string(),
                },
                Err(e) => last_error = e.to_string(),
            }

            warn!(
                attempt,
                max_attempts = CONNECT_ATTEMPTS,
                error = %last_error,
                "Could not connect to the anomaly store, retrying in {}s",
                CONNECT_RETRY_DELAY.as_secs()
            );

            if attempt < CONNECT_ATTEMPTS {
                tokio::time::sleep(CONNECT_RETRY_DELAY).await;
            }
        }

        Err(StoreError::ConnectExhausted {
            attempts: CONNECT_ATTEMPTS,
            message: last_error,
        })
    }

    /// Create the anomalies table if it does not exist.
    ///
    /// Create-if-absent semantics: safe to run on every startup.
    pub async fn provision(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_ANOMALIES_TABLE)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Provision)?;

        info!("Anomalies table is ready");
        Ok(())
    }
}

#[async_trait]
impl AnomalySink for AnomalyRecorder {
    async fn record(&self, window: &Window, verdict: &Verdict) -> Result<(), StoreError> {
        sqlx::query(INSERT_ANOMALY)
            .bind(window.hostname())
            .bind(METRIC_CPU_USAGE)
            .bind(window.start_time())
            .bind(window.end_time())
            .bind(verdict.anomaly_score)
            .bind(&verdict.model_version)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Insert)?;

        Ok(())
    }
}
