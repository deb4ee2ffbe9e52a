pub mod consumer;
pub mod error;
pub mod kafka;
pub mod parser;

pub use consumer::{QueueConsumer, QueueHealth, QueueMessage};
pub use error::QueueError;
pub use kafka::KafkaSampleConsumer;
pub use parser::parse_sample;
