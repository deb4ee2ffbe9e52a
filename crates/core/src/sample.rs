use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One resource-utilization snapshot published by a collector agent.
///
/// Field names are the wire contract with the collector; percentages are
/// passed through as-is, out-of-range values are not rejected here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub hostname: String,
    pub timestamp: DateTime<Utc>,
    pub cpu_usage_percent: f64,
    pub mem_usage_percent: f64,
}
