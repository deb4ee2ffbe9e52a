pub mod stream;

pub use stream::StreamLoop;
