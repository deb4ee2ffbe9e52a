//! Parse queue message bodies into [`Sample`]s.

use hostpulse_core::Sample;

use crate::consumer::QueueMessage;
use crate::error::QueueError;

/// Decode a single queue message body per the sample wire schema.
///
/// The schema is strict on the four required fields (`hostname`,
/// `timestamp`, `cpu_usage_percent`, `mem_usage_percent`); unknown extra
/// fields are ignored, which lets collectors ship richer payloads without
/// breaking older processors.
pub fn parse_sample(msg: &QueueMessage) -> Result<Sample, QueueError> {
    serde_json::from_str(&msg.body).map_err(|e| {
        QueueError::Parse(format!(
            "invalid sample at {}:{}: {}",
            msg.partition, msg.offset, e
        ))
    })
}
