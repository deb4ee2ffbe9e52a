pub mod error;
pub mod recorder;

pub use error::StoreError;
pub use recorder::{AnomalyRecorder, AnomalySink, METRIC_CPU_USAGE};
