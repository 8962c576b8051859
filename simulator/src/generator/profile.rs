use crate::generator::template::sweep_angle;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// An object the synthetic sensor sees across an angular span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub from_deg: u16,
    pub to_deg: u16,
    pub distance_cm: u32,
}

impl Target {
    fn covers(&self, angle: u16) -> bool {
        let (low, high) = if self.from_deg <= self.to_deg {
            (self.from_deg, self.to_deg)
        } else {
            (self.to_deg, self.from_deg)
        };
        (low..=high).contains(&angle)
    }
}

/// Shape of the generated frame stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub step_deg: u16,
    pub frame_interval_ms: u64,
    pub targets: Vec<Target>,
    /// Distance reported where no target is, usually beyond max range.
    pub background_cm: u32,
    pub noise_cm: u32,
    pub seed: u64,
    /// Probability that a frame is replaced by a corrupted one.
    pub malformed_rate: f64,
    /// Largest write handed to the channel at once.
    pub max_chunk: usize,
    pub description: Option<String>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            step_deg: 2,
            frame_interval_ms: 30,
            targets: vec![
                Target {
                    from_deg: 40,
                    to_deg: 55,
                    distance_cm: 22,
                },
                Target {
                    from_deg: 120,
                    to_deg: 135,
                    distance_cm: 35,
                },
            ],
            background_cm: 120,
            noise_cm: 1,
            seed: 0,
            malformed_rate: 0.0,
            max_chunk: 8,
            description: None,
        }
    }
}

const CORRUPTIONS: [&str; 6] = ["", "   ", "noise", "x,12", "45,y", "17"];

/// Deterministic source of wire frames for a scenario.
pub struct FrameGenerator {
    config: ScenarioConfig,
    rng: StdRng,
    index: u64,
}

impl FrameGenerator {
    pub fn new(config: ScenarioConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            rng,
            index: 0,
        }
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// Angle and distance the sensor would report for the next step.
    pub fn next_sample(&mut self) -> (u16, u32) {
        let angle = sweep_angle(self.index, self.config.step_deg);
        self.index += 1;

        let base = self
            .config
            .targets
            .iter()
            .find(|target| target.covers(angle))
            .map_or(self.config.background_cm, |target| target.distance_cm);
        let noise = i64::from(self.config.noise_cm);
        let jitter = if noise > 0 {
            self.rng.gen_range(-noise..=noise)
        } else {
            0
        };
        let distance = (i64::from(base) + jitter).max(0) as u32;
        (angle, distance)
    }

    /// Next frame including its `.` delimiter; occasionally corrupted.
    pub fn next_frame(&mut self) -> String {
        let (angle, distance) = self.next_sample();
        let rate = self.config.malformed_rate.clamp(0.0, 1.0);
        if rate > 0.0 && self.rng.gen_bool(rate) {
            let corruption = CORRUPTIONS[self.rng.gen_range(0..CORRUPTIONS.len())];
            return format!("{}.", corruption);
        }
        format!("{},{}.", angle, distance)
    }

    /// Splits `bytes` into writes of random length in `1..=max_chunk`.
    pub fn chunk(&mut self, bytes: &[u8]) -> Vec<Vec<u8>> {
        let max_chunk = self.config.max_chunk.max(1);
        let mut chunks = Vec::new();
        let mut rest = bytes;
        while !rest.is_empty() {
            let size = self.rng.gen_range(1..=max_chunk).min(rest.len());
            let (head, tail) = rest.split_at(size);
            chunks.push(head.to_vec());
            rest = tail;
        }
        chunks
    }
}

/// Concatenated wire bytes of the first `frames` frames of a scenario.
pub fn build_stream(config: &ScenarioConfig, frames: usize) -> Vec<u8> {
    let mut generator = FrameGenerator::new(config.clone());
    (0..frames)
        .map(|_| generator.next_frame())
        .collect::<String>()
        .into_bytes()
}
