//! Queue consumer trait and types.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::QueueError;

/// A raw message received from a queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueMessage {
    /// Raw message body (JSON string).
    pub body: String,
    /// Partition the message was read from.
    pub partition: i32,
    /// Offset within the partition, used for acknowledgment.
    pub offset: i64,
    /// When the message was produced to the queue.
    pub timestamp: DateTime<Utc>,
}

/// Health status of a queue connection.
#[derive(Debug, Clone, Serialize)]
pub struct QueueHealth {
    /// Whether the broker is reachable.
    pub connected: bool,
    /// Number of partitions in the subscribed topic.
    pub partition_count: Option<usize>,
    /// Queue provider name (e.g., "kafka").
    pub provider: String,
}

impl fmt::Display for QueueHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "QueueHealth {{ connected: {}, partitions: {:?}, provider: {} }}",
            self.connected, self.partition_count, self.provider
        )
    }
}

/// Trait for queue consumer backends.
///
/// Implementations handle the specifics of receiving and acknowledging
/// messages for a particular queue provider. The stream loop drives this
/// one message at a time; there is no batching at this seam.
#[async_trait]
pub trait QueueConsumer: Send + Sync {
    /// Block until the next message is available.
    ///
    /// An `Err` means the queue is unrecoverable (broker unreachable, topic
    /// deleted); the caller is expected to stop consuming.
    async fn next(&self) -> Result<QueueMessage, QueueError>;

    /// Acknowledge a processed message so it is not redelivered.
    async fn ack(&self, message: &QueueMessage) -> Result<(), QueueError>;

    /// Check broker connectivity and return health status.
    async fn health_check(&self) -> Result<QueueHealth, QueueError>;
}
