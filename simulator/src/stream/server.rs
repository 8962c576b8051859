use crate::generator::profile::FrameGenerator;
use anyhow::Context;
use log::{debug, info, warn};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast::{self, error::RecvError};

const CHUNK_BACKLOG: usize = 256;

pub fn default_listen_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

/// Generates frames on a fixed cadence and fans the chunks out to every
/// connected TCP client. Slow clients skip chunks rather than stall the
/// sweep, which the receiving decoder absorbs like line noise.
pub async fn serve(listener: TcpListener, generator: FrameGenerator) -> anyhow::Result<()> {
    let address = listener.local_addr().context("reading listener address")?;
    info!("serving frames on {}", address);

    let (sender, _) = broadcast::channel::<Vec<u8>>(CHUNK_BACKLOG);
    let producer = sender.clone();
    tokio::spawn(async move {
        produce(generator, |chunk| {
            // No subscribers is fine; the sweep keeps running.
            let _ = producer.send(chunk);
        })
        .await
    });

    loop {
        let (socket, peer) = listener.accept().await.context("accepting client")?;
        info!("client {} connected", peer);
        let receiver = sender.subscribe();
        tokio::spawn(async move {
            match forward(socket, receiver).await {
                Ok(()) => info!("client {} done", peer),
                Err(err) => warn!("client {} dropped: {}", peer, err),
            }
        });
    }
}

/// Writes frames to `sink` forever, one chunked frame per interval.
pub async fn stream_to<W>(mut sink: W, mut generator: FrameGenerator) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut ticker = tokio::time::interval(frame_interval(&generator));
    loop {
        ticker.tick().await;
        let frame = generator.next_frame();
        for chunk in generator.chunk(frame.as_bytes()) {
            sink.write_all(&chunk).await.context("writing frame")?;
        }
        sink.flush().await.context("flushing frame")?;
    }
}

async fn produce<F>(mut generator: FrameGenerator, mut publish: F)
where
    F: FnMut(Vec<u8>),
{
    let mut ticker = tokio::time::interval(frame_interval(&generator));
    loop {
        ticker.tick().await;
        let frame = generator.next_frame();
        for chunk in generator.chunk(frame.as_bytes()) {
            publish(chunk);
        }
    }
}

async fn forward(
    mut socket: TcpStream,
    mut receiver: broadcast::Receiver<Vec<u8>>,
) -> std::io::Result<()> {
    loop {
        match receiver.recv().await {
            Ok(chunk) => socket.write_all(&chunk).await?,
            Err(RecvError::Lagged(skipped)) => debug!("client lagged, skipped {} chunks", skipped),
            Err(RecvError::Closed) => return Ok(()),
        }
    }
}

fn frame_interval(generator: &FrameGenerator) -> Duration {
    Duration::from_millis(generator.config().frame_interval_ms.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::ScenarioConfig;
    use radarcore::prelude::FrameDecoder;
    use tokio::io::AsyncReadExt;

    fn fast_generator() -> FrameGenerator {
        FrameGenerator::new(ScenarioConfig {
            frame_interval_ms: 1,
            max_chunk: 3,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn client_receives_decodable_frames() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(serve(listener, fast_generator()));

        let mut client = TcpStream::connect(address).await.unwrap();
        let mut decoder = FrameDecoder::new();
        let mut readings = Vec::new();
        let mut buffer = [0u8; 128];
        while readings.len() < 5 {
            let count = tokio::time::timeout(Duration::from_secs(5), client.read(&mut buffer))
                .await
                .unwrap()
                .unwrap();
            assert!(count > 0);
            decoder.feed(&buffer[..count], |reading| readings.push(reading));
        }
        assert!(readings.iter().all(|reading| reading.angle() <= 180));
    }

    #[tokio::test]
    async fn stream_to_writes_wire_frames() {
        let (writer, mut reader) = tokio::io::duplex(64);
        tokio::spawn(stream_to(writer, fast_generator()));

        let mut collected = Vec::new();
        let mut buffer = [0u8; 32];
        while collected.iter().filter(|&&byte| byte == b'.').count() < 2 {
            let count = reader.read(&mut buffer).await.unwrap();
            collected.extend_from_slice(&buffer[..count]);
        }
        assert!(collected.starts_with(b"0,"));
    }
}
