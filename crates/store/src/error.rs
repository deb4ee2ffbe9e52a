//! Store error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// All startup connection attempts failed. This is fatal: anomalies
    /// evaluated without a working store would silently lose their history.
    #[error("store connection failed after {attempts} attempts: {message}")]
    ConnectExhausted { attempts: u32, message: String },

    #[error("store provisioning failed: {0}")]
    Provision(#[source] sqlx::Error),

    #[error("anomaly insert failed: {0}")]
    Insert(#[source] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}
