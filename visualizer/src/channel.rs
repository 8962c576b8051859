use anyhow::{bail, Context};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::net::TcpStream;
use std::path::PathBuf;
use std::time::Duration;

const SERIAL_READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Where the frame bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelAddress {
    Stdin,
    Tcp(String),
    File(PathBuf),
    Serial(String),
}

impl ChannelAddress {
    /// `-`/`stdin`, `tcp://host:port`, `file:PATH`, or a serial device path.
    pub fn parse(spec: &str) -> anyhow::Result<Self> {
        let spec = spec.trim();
        if spec.is_empty() {
            bail!("empty channel address");
        }
        if spec == "-" || spec.eq_ignore_ascii_case("stdin") {
            return Ok(ChannelAddress::Stdin);
        }
        if let Some(address) = spec.strip_prefix("tcp://") {
            if address.is_empty() {
                bail!("tcp channel needs host:port");
            }
            return Ok(ChannelAddress::Tcp(address.to_string()));
        }
        if let Some(path) = spec.strip_prefix("file:") {
            if path.is_empty() {
                bail!("file channel needs a path");
            }
            return Ok(ChannelAddress::File(PathBuf::from(path)));
        }
        Ok(ChannelAddress::Serial(spec.to_string()))
    }

    /// Opens the channel. Failing here is fatal for the caller.
    pub fn open(&self, baud: u32) -> anyhow::Result<Box<dyn Read + Send>> {
        match self {
            ChannelAddress::Stdin => Ok(Box::new(io::stdin())),
            ChannelAddress::Tcp(address) => {
                let stream = TcpStream::connect(address)
                    .with_context(|| format!("connecting to {}", address))?;
                Ok(Box::new(stream))
            }
            ChannelAddress::File(path) => {
                let file = File::open(path)
                    .with_context(|| format!("opening capture {}", path.display()))?;
                Ok(Box::new(file))
            }
            ChannelAddress::Serial(path) => {
                let port = serialport::new(path.as_str(), baud)
                    .timeout(SERIAL_READ_TIMEOUT)
                    .open()
                    .with_context(|| format!("opening serial port {} at {} baud", path, baud))?;
                port.clear(serialport::ClearBuffer::Input)
                    .with_context(|| format!("flushing serial port {}", path))?;
                Ok(Box::new(port))
            }
        }
    }
}

impl fmt::Display for ChannelAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelAddress::Stdin => write!(f, "stdin"),
            ChannelAddress::Tcp(address) => write!(f, "tcp://{}", address),
            ChannelAddress::File(path) => write!(f, "file:{}", path.display()),
            ChannelAddress::Serial(path) => write!(f, "{}", path),
        }
    }
}
