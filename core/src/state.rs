use crate::protocol::Reading;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

/// Whether the byte channel is still delivering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkStatus {
    #[default]
    Connected,
    Lost,
}

/// The current reading together with when it arrived. Replaced as a unit.
#[derive(Debug, Clone, Copy, Default)]
struct Sample {
    reading: Reading,
    received_at: Option<Instant>,
}

/// What the renderer sees for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub angle: u16,
    pub distance: u32,
    pub max_range: u32,
    /// Time since the last accepted reading; `None` before the first one.
    pub age: Option<Duration>,
    pub link: LinkStatus,
}

impl Snapshot {
    pub fn reading(&self) -> Reading {
        Reading::new(self.angle, self.distance)
    }

    pub fn in_range(&self) -> bool {
        self.distance <= self.max_range
    }

    pub fn is_stale(&self, stale_after: Duration) -> bool {
        self.age.map_or(true, |age| age > stale_after)
    }
}

/// Single-slot holder shared by the decoder and the render loop.
///
/// Writers swap the whole sample under the lock, so a reader can never pair
/// a new angle with an old distance. Last write wins.
pub struct RadarState {
    current: RwLock<Sample>,
    link: RwLock<LinkStatus>,
    max_range: u32,
}

impl RadarState {
    pub fn new(max_range: u32) -> Self {
        Self {
            current: RwLock::new(Sample::default()),
            link: RwLock::new(LinkStatus::Connected),
            max_range,
        }
    }

    pub fn max_range(&self) -> u32 {
        self.max_range
    }

    pub fn write(&self, reading: Reading) {
        let sample = Sample {
            reading,
            received_at: Some(Instant::now()),
        };
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = sample;
    }

    pub fn set_link(&self, status: LinkStatus) {
        let mut guard = self.link.write().unwrap_or_else(PoisonError::into_inner);
        *guard = status;
    }

    pub fn read(&self) -> Snapshot {
        self.read_at(Instant::now())
    }

    pub fn read_at(&self, now: Instant) -> Snapshot {
        let sample = *self.current.read().unwrap_or_else(PoisonError::into_inner);
        let link = *self.link.read().unwrap_or_else(PoisonError::into_inner);
        Snapshot {
            angle: sample.reading.angle(),
            distance: sample.reading.distance(),
            max_range: self.max_range,
            age: sample
                .received_at
                .map(|received| now.saturating_duration_since(received)),
            link,
        }
    }
}
