//! Count-based window accumulation.
//!
//! Collects consecutive [`Sample`]s and emits a [`Window`] once the
//! configured count is reached. Flushing is purely count-based: there is no
//! time threshold, a slow producer simply delays window completion.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::sample::Sample;

/// An ordered batch of exactly `N` samples, emitted as one evaluation unit.
///
/// Only the [`WindowAccumulator`] constructs windows, so a `Window` handed
/// downstream always holds a full batch. Ownership transfers with it; the
/// accumulator keeps nothing back.
#[derive(Debug, Clone, Serialize)]
pub struct Window {
    samples: Vec<Sample>,
}

impl Window {
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Hostname of the window's origin, taken from its first sample.
    pub fn hostname(&self) -> &str {
        &self.samples[0].hostname
    }

    /// Timestamp of the first sample in the window.
    pub fn start_time(&self) -> DateTime<Utc> {
        self.samples[0].timestamp
    }

    /// Timestamp of the last sample in the window.
    pub fn end_time(&self) -> DateTime<Utc> {
        self.samples[self.samples.len() - 1].timestamp
    }
}

/// Accumulates samples into fixed-size windows.
///
/// `push` returns the completed window when the buffer reaches capacity and
/// resets for the next one; otherwise it returns `None`. Partial windows are
/// never surfaced. Not safe for concurrent use: drive one accumulator from
/// one stream loop only.
pub struct WindowAccumulator {
    buffer: Vec<Sample>,
    capacity: usize,
}

impl WindowAccumulator {
    /// Create an accumulator emitting windows of `capacity` samples.
    ///
    /// A capacity of zero is clamped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append one sample, returning the completed window if it filled.
    pub fn push(&mut self, sample: Sample) -> Option<Window> {
        self.buffer.push(sample);
        if self.buffer.len() >= self.capacity {
            let samples = std::mem::replace(&mut self.buffer, Vec::with_capacity(self.capacity));
            Some(Window { samples })
        } else {
            None
        }
    }

    /// Number of samples currently buffered.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
