use crate::generator::profile::FrameGenerator;
use crate::workflow::config::SimulatorConfig;
use radarcore::prelude::{DecoderStats, FrameDecoder, RadarState, Reading};
use serde::Serialize;

/// Result of pushing a generated stream through the decoder in-process.
#[derive(Debug, Clone, Serialize)]
pub struct OfflineSummary {
    pub frames_sent: usize,
    pub bytes_sent: usize,
    pub chunks: usize,
    pub readings: usize,
    pub in_range: usize,
    pub last_reading: Reading,
    pub decoder: DecoderStats,
}

#[derive(Clone)]
pub struct Runner {
    config: SimulatorConfig,
}

impl Runner {
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self, frames: usize) -> OfflineSummary {
        let mut generator = FrameGenerator::new(self.config.scenario.clone());
        let state = RadarState::new(self.config.max_range);
        let mut decoder = FrameDecoder::new();

        let stream: String = (0..frames).map(|_| generator.next_frame()).collect();
        let chunks = generator.chunk(stream.as_bytes());

        let mut readings = 0;
        let mut in_range = 0;
        for chunk in &chunks {
            decoder.feed(chunk, |reading| {
                readings += 1;
                if reading.within_range(self.config.max_range) {
                    in_range += 1;
                }
                state.write(reading);
            });
        }

        OfflineSummary {
            frames_sent: frames,
            bytes_sent: stream.len(),
            chunks: chunks.len(),
            readings,
            in_range,
            last_reading: state.read().reading(),
            decoder: decoder.metrics().snapshot(),
        }
    }
}
