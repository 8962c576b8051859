pub mod metrics;

pub use metrics::{DecoderMetrics, DecoderStats};
