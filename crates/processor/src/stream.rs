//! The windowed stream loop.
//!
//! Pulls samples from the queue one at a time, accumulates them into
//! fixed-size windows, scores completed windows, and persists anomalous
//! verdicts. Runs until the queue read fails unrecoverably or the shutdown
//! handle fires.
//!
//! Delivery is at-most-once for evaluation outcomes: every message is
//! acknowledged after its iteration regardless of scoring or recording
//! success. A message redelivered after a crash before acknowledgment may
//! be counted into a new window; that consistency trade-off is part of the
//! design, not an accident.

use std::sync::Arc;

use tokio::sync::Notify;
use tracing::{error, info, warn};

use hostpulse_core::{Window, WindowAccumulator};
use hostpulse_queue::{parse_sample, QueueConsumer, QueueMessage};
use hostpulse_scoring::Scorer;
use hostpulse_store::AnomalySink;

/// Single sequential worker driving the pipeline.
///
/// Generic over the queue, scorer, and sink seams so tests can drive the
/// loop with in-memory fakes. One instance owns one [`WindowAccumulator`];
/// scaling to multiple partitions means one loop per partition, never a
/// shared accumulator.
pub struct StreamLoop<S, K>
where
    S: Scorer,
    K: AnomalySink,
{
    accumulator: WindowAccumulator,
    scorer: S,
    sink: K,
}

impl<S, K> StreamLoop<S, K>
where
    S: Scorer,
    K: AnomalySink,
{
    pub fn new(window_size: usize, scorer: S, sink: K) -> Self {
        Self {
            accumulator: WindowAccumulator::new(window_size),
            scorer,
            sink,
        }
    }

    /// Consume the queue until it fails or `shutdown` is notified.
    ///
    /// A partially filled window is discarded on exit; it is neither
    /// persisted nor resumed on restart.
    pub async fn run<Q: QueueConsumer>(mut self, queue: &Q, shutdown: Arc<Notify>) {
        info!("Stream loop running");

        // One long-lived notified future: a signal arriving while an
        // iteration is busy (scoring, recording) is held until the next
        // select instead of being dropped.
        let shutdown_signal = shutdown.notified();
        tokio::pin!(shutdown_signal);

        loop {
            let message = tokio::select! {
                _ = &mut shutdown_signal => {
                    info!("Shutdown requested, stopping stream loop");
                    break;
                }
                next = queue.next() => match next {
                    Ok(message) => message,
                    Err(e) => {
                        // Unrecoverable by design: an external supervisor
                        // restarts the process.
                        error!(error = %e, "Queue read failed, stopping stream loop");
                        break;
                    }
                },
            };

            self.process_message(&message, queue).await;
        }

        if !self.accumulator.is_empty() {
            info!(
                buffered = self.accumulator.len(),
                "Discarding partial window on shutdown"
            );
        }
    }

    /// One loop iteration: decode, window, evaluate, acknowledge.
    async fn process_message<Q: QueueConsumer>(&mut self, message: &QueueMessage, queue: &Q) {
        match parse_sample(message) {
            Ok(sample) => {
                if let Some(window) = self.accumulator.push(sample) {
                    self.evaluate_window(window).await;
                }
            }
            Err(e) => {
                // The in-progress window is untouched; only this message
                // is dropped.
                warn!(
                    partition = message.partition,
                    offset = message.offset,
                    error = %e,
                    "Discarding malformed sample message"
                );
            }
        }

        // Unconditional ack: evaluation outcomes are at-most-once relative
        // to any given window.
        if let Err(e) = queue.ack(message).await {
            warn!(
                partition = message.partition,
                offset = message.offset,
                error = %e,
                "Failed to acknowledge message"
            );
        }
    }

    /// Score a completed window and persist the verdict if anomalous.
    ///
    /// No retry on either side: a failed score call forfeits the window,
    /// a failed insert loses one anomaly record. Both are logged and the
    /// loop proceeds.
    async fn evaluate_window(&self, window: Window) {
        info!(
            host = %window.hostname(),
            samples = window.len(),
            "Window full, sending for scoring"
        );

        let verdict = match self.scorer.score(&window).await {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!(error = %e, "Scoring failed, window forfeited");
                return;
            }
        };

        info!(
            score = verdict.anomaly_score,
            anomalous = verdict.is_anomaly,
            model = %verdict.model_version,
            "Scoring verdict received"
        );

        if verdict.is_anomaly {
            match self.sink.record(&window, &verdict).await {
                Ok(()) => info!(
                    host = %window.hostname(),
                    score = verdict.anomaly_score,
                    "Anomaly persisted"
                ),
                Err(e) => warn!(error = %e, "Failed to persist anomaly, continuing"),
            }
        }
    }
}
