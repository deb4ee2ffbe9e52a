//! Kafka consumer implementation.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::message::Message;
use rdkafka::{Offset, TopicPartitionList};
use tracing::{debug, info};

use hostpulse_core::config::KafkaConfig;

use crate::consumer::{QueueConsumer, QueueHealth, QueueMessage};
use crate::error::QueueError;

const METADATA_TIMEOUT: Duration = Duration::from_secs(5);

/// Kafka-backed queue consumer.
///
/// Auto-commit is disabled: offsets are committed explicitly through
/// [`QueueConsumer::ack`], one message at a time, so acknowledgment stays
/// under the stream loop's control.
pub struct KafkaSampleConsumer {
    consumer: StreamConsumer,
    topic: String,
}

impl KafkaSampleConsumer {
    /// Create a consumer subscribed to the configured topic.
    pub fn new(config: &KafkaConfig) -> Result<Self, QueueError> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("group.id", &config.group_id)
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", "earliest")
            .set("session.timeout.ms", "6000")
            .create()
            .map_err(|e| QueueError::Connection(format!("Kafka client creation failed: {e}")))?;

        consumer
            .subscribe(&[&config.topic])
            .map_err(|e| QueueError::Connection(format!("Kafka subscribe failed: {e}")))?;

        info!(
            brokers = %config.brokers,
            topic = %config.topic,
            group_id = %config.group_id,
            "Kafka consumer initialized"
        );

        Ok(Self {
            consumer,
            topic: config.topic.clone(),
        })
    }
}

#[async_trait]
impl QueueConsumer for KafkaSampleConsumer {
    async fn next(&self) -> Result<QueueMessage, QueueError> {
        let msg = self
            .consumer
            .recv()
            .await
            .map_err(|e| QueueError::Connection(format!("Kafka receive failed: {e}")))?;

        // Non-UTF8 payloads become lossy strings and fail sample parsing
        // downstream instead of killing the read loop.
        let body = String::from_utf8_lossy(msg.payload().unwrap_or_default()).into_owned();

        let timestamp = msg
            .timestamp()
            .to_millis()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .unwrap_or_else(Utc::now);

        debug!(
            partition = msg.partition(),
            offset = msg.offset(),
            bytes = body.len(),
            "Received Kafka message"
        );

        Ok(QueueMessage {
            body,
            partition: msg.partition(),
            offset: msg.offset(),
            timestamp,
        })
    }

    async fn ack(&self, message: &QueueMessage) -> Result<(), QueueError> {
        debug!(
            partition = message.partition,
            offset = message.offset,
            "Committing Kafka offset"
        );

        let mut tpl = TopicPartitionList::new();
        tpl.add_partition_offset(
            &self.topic,
            message.partition,
            Offset::Offset(message.offset + 1),
        )
        .map_err(|e| QueueError::Ack(format!("invalid partition offset: {e}")))?;

        self.consumer
            .commit(&tpl, CommitMode::Async)
            .map_err(|e| QueueError::Ack(format!("Kafka commit failed: {e}")))?;

        Ok(())
    }

    async fn health_check(&self) -> Result<QueueHealth, QueueError> {
        let metadata = self
            .consumer
            .fetch_metadata(Some(&self.topic), METADATA_TIMEOUT)
            .map_err(|e| QueueError::Connection(format!("Kafka metadata fetch failed: {e}")))?;

        let partition_count = metadata
            .topics()
            .iter()
            .find(|t| t.name() == self.topic)
            .map(|t| t.partitions().len());

        Ok(QueueHealth {
            connected: true,
            partition_count,
            provider: "kafka".to_string(),
        })
    }
}
