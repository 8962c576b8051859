use crate::protocol::FrameDecoder;
use crate::state::{LinkStatus, RadarState};
use log::{info, warn};
use std::io::{ErrorKind, Read};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

const READ_CHUNK: usize = 256;

/// Why the pump stopped reading.
#[derive(Debug)]
pub enum LinkEnd {
    Eof,
    Failed(std::io::Error),
}

/// Reads `source` until it ends, feeding every chunk through `decoder` and
/// publishing each reading into `state`.
///
/// Read timeouts are retried; end of stream or any other error marks the
/// link lost and returns, leaving the last reading in place.
pub fn pump<R: Read>(mut source: R, decoder: &mut FrameDecoder, state: &RadarState) -> LinkEnd {
    let mut chunk = [0u8; READ_CHUNK];
    loop {
        match source.read(&mut chunk) {
            Ok(0) => {
                state.set_link(LinkStatus::Lost);
                return LinkEnd::Eof;
            }
            Ok(count) => {
                decoder.feed(&chunk[..count], |reading| state.write(reading));
            }
            Err(err)
                if matches!(
                    err.kind(),
                    ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                ) => {}
            Err(err) => {
                state.set_link(LinkStatus::Lost);
                return LinkEnd::Failed(err);
            }
        }
    }
}

/// Runs [`pump`] on a dedicated thread that owns the source and decoder.
pub fn spawn<R>(
    name: &str,
    source: R,
    mut decoder: FrameDecoder,
    state: Arc<RadarState>,
) -> std::io::Result<JoinHandle<LinkEnd>>
where
    R: Read + Send + 'static,
{
    let label = name.to_string();
    thread::Builder::new()
        .name(format!("ingest-{}", name))
        .spawn(move || {
            info!("reading frames from {}", label);
            let end = pump(source, &mut decoder, &state);
            match &end {
                LinkEnd::Eof => warn!("{} closed; holding last reading", label),
                LinkEnd::Failed(err) => warn!("{} failed: {}; holding last reading", label, err),
            }
            end
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Reading;
    use std::collections::VecDeque;
    use std::io;

    /// Serves scripted reads: data chunks and transient errors.
    struct ScriptedSource {
        steps: VecDeque<io::Result<Vec<u8>>>,
    }

    impl ScriptedSource {
        fn new(steps: Vec<io::Result<Vec<u8>>>) -> Self {
            Self {
                steps: steps.into(),
            }
        }
    }

    impl Read for ScriptedSource {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.steps.pop_front() {
                None => Ok(0),
                Some(Err(err)) => Err(err),
                Some(Ok(bytes)) => {
                    buf[..bytes.len()].copy_from_slice(&bytes);
                    Ok(bytes.len())
                }
            }
        }
    }

    #[test]
    fn pump_publishes_latest_reading_and_marks_eof() {
        let state = RadarState::new(40);
        let mut decoder = FrameDecoder::new();
        let source = ScriptedSource::new(vec![
            Ok(b"10,1".to_vec()),
            Err(io::Error::new(ErrorKind::TimedOut, "quiet line")),
            Ok(b"2.20,".to_vec()),
            Ok(b"30.".to_vec()),
        ]);

        let end = pump(source, &mut decoder, &state);
        assert!(matches!(end, LinkEnd::Eof));

        let snapshot = state.read();
        assert_eq!(snapshot.reading(), Reading::new(20, 30));
        assert_eq!(snapshot.link, LinkStatus::Lost);
        assert_eq!(decoder.metrics().snapshot().accepted, 2);
    }

    #[test]
    fn hard_error_keeps_last_reading() {
        let state = RadarState::new(40);
        let mut decoder = FrameDecoder::new();
        let source = ScriptedSource::new(vec![
            Ok(b"90,15.".to_vec()),
            Err(io::Error::new(ErrorKind::BrokenPipe, "unplugged")),
            Ok(b"10,10.".to_vec()),
        ]);

        let end = pump(source, &mut decoder, &state);
        assert!(matches!(end, LinkEnd::Failed(_)));
        assert_eq!(state.read().reading(), Reading::new(90, 15));
    }

    #[test]
    fn spawned_pump_feeds_shared_state() {
        let state = Arc::new(RadarState::new(40));
        let handle = spawn(
            "test",
            io::Cursor::new(b"45,20.foo,30.".to_vec()),
            FrameDecoder::new(),
            state.clone(),
        )
        .unwrap();

        assert!(matches!(handle.join().unwrap(), LinkEnd::Eof));
        assert_eq!(state.read().reading(), Reading::new(45, 30));
    }
}
