use crate::protocol::buffer::RawFrameBuffer;
use crate::protocol::reading::Reading;
use crate::telemetry::DecoderMetrics;
use log::{debug, trace};
use std::sync::Arc;

pub const FRAME_DELIMITER: u8 = b'.';
pub const DEFAULT_FRAME_CAPACITY: usize = 1024;

/// Incremental decoder for `angle,distance.` frames.
///
/// Bytes may arrive in chunks of any size. A token that fails to parse keeps
/// the previous value for that field; frames that are blank or lack a comma
/// are dropped without touching the reading.
pub struct FrameDecoder {
    buffer: RawFrameBuffer,
    last: Reading,
    resyncing: bool,
    metrics: Arc<DecoderMetrics>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_FRAME_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: RawFrameBuffer::with_capacity(capacity),
            last: Reading::default(),
            resyncing: false,
            metrics: Arc::new(DecoderMetrics::new()),
        }
    }

    /// Starts from a previously published reading instead of `{0, 0}`.
    pub fn resume_from(mut self, reading: Reading) -> Self {
        self.last = reading;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<DecoderMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> Arc<DecoderMetrics> {
        self.metrics.clone()
    }

    pub fn last(&self) -> Reading {
        self.last
    }

    /// Bytes still waiting for a delimiter.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Consumes a chunk and hands every completed reading to `publish`.
    /// Returns how many readings were published.
    pub fn feed<F>(&mut self, bytes: &[u8], mut publish: F) -> usize
    where
        F: FnMut(Reading),
    {
        let mut published = 0;
        for &byte in bytes {
            if byte == FRAME_DELIMITER {
                if self.resyncing {
                    self.resyncing = false;
                    self.buffer.clear();
                    continue;
                }
                let text = self.buffer.take_text();
                if let Some(reading) = self.decode_frame(&text) {
                    publish(reading);
                    published += 1;
                }
                continue;
            }

            if self.resyncing {
                continue;
            }
            if !self.buffer.push(byte) {
                debug!(
                    "frame exceeded {} bytes without delimiter; resyncing",
                    self.buffer.capacity()
                );
                self.metrics.record_overflow();
                self.buffer.clear();
                self.resyncing = true;
            }
        }
        published
    }

    /// Decodes one frame body (delimiter already stripped).
    pub fn decode_frame(&mut self, text: &str) -> Option<Reading> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            trace!("discarding blank frame");
            self.metrics.record_empty();
            return None;
        }

        let Some((angle_token, distance_token)) = trimmed.split_once(',') else {
            debug!("discarding frame without separator: {:?}", trimmed);
            self.metrics.record_malformed();
            return None;
        };

        let angle = match parse_integer(angle_token) {
            Some(raw) => Reading::clamp_angle(raw),
            None => {
                debug!("unparseable angle {:?}; keeping {}", angle_token, self.last.angle());
                self.metrics.record_bad_angle();
                self.last.angle()
            }
        };
        let distance = match parse_integer(distance_token) {
            Some(raw) => Reading::clamp_distance(raw),
            None => {
                debug!(
                    "unparseable distance {:?}; keeping {}",
                    distance_token,
                    self.last.distance()
                );
                self.metrics.record_bad_distance();
                self.last.distance()
            }
        };

        let reading = Reading::new(angle, distance);
        trace!("decoded {:?}", reading);
        self.last = reading;
        self.metrics.record_accepted();
        Some(reading)
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// `["-"]? digit+` surrounded by optional whitespace.
fn parse_integer(token: &str) -> Option<i64> {
    let token = token.trim();
    let digits = token.strip_prefix('-').unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(decoder: &mut FrameDecoder, input: &[u8]) -> Vec<Reading> {
        let mut readings = Vec::new();
        decoder.feed(input, |reading| readings.push(reading));
        readings
    }

    fn primed(angle: u16, distance: u32) -> FrameDecoder {
        FrameDecoder::new().resume_from(Reading::new(angle, distance))
    }

    #[test]
    fn valid_frames_decode_exactly() {
        let mut decoder = FrameDecoder::new();
        for (angle, distance) in [(0, 0), (45, 20), (90, 40), (180, 1234)] {
            let frame = format!("{},{}.", angle, distance);
            let readings = decode_all(&mut decoder, frame.as_bytes());
            assert_eq!(readings, vec![Reading::new(angle, distance)]);
        }
    }

    #[test]
    fn angle_is_clamped_but_distance_is_not_range_limited() {
        let mut decoder = FrameDecoder::new();
        assert_eq!(
            decode_all(&mut decoder, b"200,999."),
            vec![Reading::new(180, 999)]
        );
        assert_eq!(
            decode_all(&mut decoder, b"181,5."),
            vec![Reading::new(180, 5)]
        );
        assert_eq!(
            decode_all(&mut decoder, b"90,-3."),
            vec![Reading::new(90, 0)]
        );
        assert_eq!(
            decode_all(&mut decoder, b"-7,12."),
            vec![Reading::new(0, 12)]
        );
    }

    #[test]
    fn bad_angle_keeps_previous_angle() {
        let mut decoder = primed(45, 20);
        assert_eq!(
            decode_all(&mut decoder, b"foo,30."),
            vec![Reading::new(45, 30)]
        );
        assert_eq!(decoder.metrics().snapshot().bad_angle, 1);
    }

    #[test]
    fn bad_distance_keeps_previous_distance() {
        let mut decoder = primed(45, 20);
        assert_eq!(
            decode_all(&mut decoder, b"60,bar."),
            vec![Reading::new(60, 20)]
        );
        assert_eq!(decoder.metrics().snapshot().bad_distance, 1);
    }

    #[test]
    fn blank_frame_changes_nothing() {
        let mut decoder = primed(45, 20);
        assert!(decode_all(&mut decoder, b"   .").is_empty());
        assert!(decode_all(&mut decoder, b".").is_empty());
        assert_eq!(decoder.last(), Reading::new(45, 20));
        assert_eq!(decoder.metrics().snapshot().empty, 2);
    }

    #[test]
    fn frame_without_comma_is_dropped() {
        let mut decoder = primed(45, 20);
        assert!(decode_all(&mut decoder, b"77.").is_empty());
        assert_eq!(decoder.last(), Reading::new(45, 20));
        assert_eq!(decoder.metrics().snapshot().malformed, 1);
    }

    #[test]
    fn only_first_comma_splits() {
        let mut decoder = primed(45, 20);
        assert_eq!(
            decode_all(&mut decoder, b"10,11,12."),
            vec![Reading::new(10, 20)]
        );
    }

    #[test]
    fn whitespace_around_tokens_is_ignored() {
        let mut decoder = FrameDecoder::new();
        assert_eq!(
            decode_all(&mut decoder, b"\r\n 45 , 20 ."),
            vec![Reading::new(45, 20)]
        );
    }

    #[test]
    fn plus_sign_and_overflow_are_unparseable() {
        let mut decoder = primed(45, 20);
        assert_eq!(
            decode_all(&mut decoder, b"+50,99999999999999999999."),
            vec![Reading::new(45, 20)]
        );
    }

    #[test]
    fn repeated_frame_is_idempotent() {
        let mut decoder = FrameDecoder::new();
        let first = decode_all(&mut decoder, b"33,17.");
        let second = decode_all(&mut decoder, b"33,17.");
        assert_eq!(first, second);
        assert_eq!(decoder.last(), Reading::new(33, 17));
    }

    #[test]
    fn frames_survive_arbitrary_chunking() {
        let stream = b"10,5.20,6. 30 ,7.\n40,8.";
        for chunk_size in 1..=stream.len() {
            let mut decoder = FrameDecoder::new();
            let mut readings = Vec::new();
            for chunk in stream.chunks(chunk_size) {
                decoder.feed(chunk, |reading| readings.push(reading));
            }
            assert_eq!(
                readings,
                vec![
                    Reading::new(10, 5),
                    Reading::new(20, 6),
                    Reading::new(30, 7),
                    Reading::new(40, 8),
                ],
                "chunk size {}",
                chunk_size
            );
        }
    }

    #[test]
    fn partial_frame_waits_for_delimiter() {
        let mut decoder = FrameDecoder::new();
        assert!(decode_all(&mut decoder, b"12,3").is_empty());
        assert_eq!(decoder.pending(), 4);
        assert_eq!(decode_all(&mut decoder, b"4."), vec![Reading::new(12, 34)]);
        assert_eq!(decoder.pending(), 0);
    }

    #[test]
    fn overrun_resyncs_at_next_delimiter() {
        let mut decoder = FrameDecoder::with_capacity(8).resume_from(Reading::new(1, 1));
        let readings = decode_all(&mut decoder, b"123456789,55.90,10.");
        assert_eq!(readings, vec![Reading::new(90, 10)]);
        assert_eq!(decoder.metrics().snapshot().overflowed, 1);
    }

    #[test]
    fn padded_and_zero_led_frames_decode() {
        let mut decoder = primed(1, 1);
        let padded = format!("45,{}20.", " ".repeat(70));
        let zero_led = format!("{}45,20.", "0".repeat(70));
        assert_eq!(
            decode_all(&mut decoder, padded.as_bytes()),
            vec![Reading::new(45, 20)]
        );
        assert_eq!(
            decode_all(&mut decoder, zero_led.as_bytes()),
            vec![Reading::new(45, 20)]
        );
        assert_eq!(decoder.metrics().snapshot().overflowed, 0);
    }

    #[test]
    fn frame_filling_the_buffer_exactly_decodes() {
        let capacity = 16;
        let body = format!("{:>width$}", "45,20", width = capacity);
        assert_eq!(body.len(), capacity);

        let mut decoder = FrameDecoder::with_capacity(capacity).resume_from(Reading::new(1, 1));
        let readings = decode_all(&mut decoder, format!("{}.", body).as_bytes());
        assert_eq!(readings, vec![Reading::new(45, 20)]);
        assert_eq!(decoder.metrics().snapshot().overflowed, 0);

        let readings = decode_all(&mut decoder, format!(" {}.", body).as_bytes());
        assert!(readings.is_empty());
        assert_eq!(decoder.metrics().snapshot().overflowed, 1);
    }

    #[test]
    fn invalid_utf8_token_is_treated_as_unparseable() {
        let mut decoder = primed(45, 20);
        assert_eq!(
            decode_all(&mut decoder, b"\xff\xfe,30."),
            vec![Reading::new(45, 30)]
        );
    }
}
