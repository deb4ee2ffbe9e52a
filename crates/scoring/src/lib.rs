pub mod client;
pub mod traits;

pub use client::ScoringClient;
pub use traits::{ScoreError, Scorer, Verdict};
