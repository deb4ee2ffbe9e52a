pub mod config;
pub mod sample;
pub mod window;

pub use config::Config;
pub use sample::Sample;
pub use window::{Window, WindowAccumulator};
