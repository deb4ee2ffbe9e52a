//! hostpulse-processor — windowed anomaly-detection stream processor.
//!
//! Startup order matters: the anomaly store must be reachable and
//! provisioned before the first sample is consumed, because a loop running
//! without a store would silently lose all anomaly history.

use std::sync::Arc;

use tokio::sync::Notify;
use tracing::{info, warn};

use hostpulse_core::config::{self, Config};
use hostpulse_processor::StreamLoop;
use hostpulse_queue::{KafkaSampleConsumer, QueueConsumer};
use hostpulse_scoring::ScoringClient;
use hostpulse_store::AnomalyRecorder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Processor service starting");
    let config = Config::from_env();
    config.log_summary();

    // Bounded-retry connect; exhaustion is fatal.
    let recorder = AnomalyRecorder::connect(&config.postgres).await?;
    recorder.provision().await?;

    let queue = KafkaSampleConsumer::new(&config.kafka)?;
    match queue.health_check().await {
        Ok(health) => info!(%health, "Queue reachable"),
        Err(e) => warn!(error = %e, "Queue health check failed, reads will surface the error"),
    }

    let scorer = ScoringClient::new(&config.scoring)?;

    let shutdown = Arc::new(Notify::new());
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            // notify_one stores a permit, so the signal is kept even if
            // the loop is not parked on the shutdown future right now.
            signal_shutdown.notify_one();
        }
    });

    let stream = StreamLoop::new(config.processor.window_size, scorer, recorder);
    stream.run(&queue, shutdown).await;

    info!("Processor exited cleanly");
    Ok(())
}
