use serde::Serialize;
use std::sync::Mutex;

/// Thread-safe decoder counters. Counting never affects decoding.
pub struct DecoderMetrics {
    inner: Mutex<DecoderStats>,
}

/// Point-in-time copy of the decoder counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DecoderStats {
    /// Frames that replaced the current reading.
    pub accepted: u64,
    /// Frames that were blank after trimming.
    pub empty: u64,
    /// Frames without a `,` separator.
    pub malformed: u64,
    /// Accepted frames whose angle token was unparseable.
    pub bad_angle: u64,
    /// Accepted frames whose distance token was unparseable.
    pub bad_distance: u64,
    /// Buffer overruns that forced a resync.
    pub overflowed: u64,
}

impl DecoderStats {
    pub fn discarded(&self) -> u64 {
        self.empty + self.malformed + self.overflowed
    }
}

impl DecoderMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(DecoderStats::default()),
        }
    }

    pub fn record_accepted(&self) {
        self.update(|stats| stats.accepted += 1);
    }

    pub fn record_empty(&self) {
        self.update(|stats| stats.empty += 1);
    }

    pub fn record_malformed(&self) {
        self.update(|stats| stats.malformed += 1);
    }

    pub fn record_bad_angle(&self) {
        self.update(|stats| stats.bad_angle += 1);
    }

    pub fn record_bad_distance(&self) {
        self.update(|stats| stats.bad_distance += 1);
    }

    pub fn record_overflow(&self) {
        self.update(|stats| stats.overflowed += 1);
    }

    pub fn snapshot(&self) -> DecoderStats {
        if let Ok(stats) = self.inner.lock() {
            *stats
        } else {
            DecoderStats::default()
        }
    }

    fn update(&self, apply: impl FnOnce(&mut DecoderStats)) {
        if let Ok(mut stats) = self.inner.lock() {
            apply(&mut stats);
        }
    }
}

impl Default for DecoderMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_independently() {
        let metrics = DecoderMetrics::new();
        metrics.record_accepted();
        metrics.record_accepted();
        metrics.record_empty();
        metrics.record_overflow();
        metrics.record_bad_angle();

        let stats = metrics.snapshot();
        assert_eq!(stats.accepted, 2);
        assert_eq!(stats.bad_angle, 1);
        assert_eq!(stats.bad_distance, 0);
        assert_eq!(stats.discarded(), 2);
    }
}
