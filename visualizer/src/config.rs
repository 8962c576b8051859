use anyhow::{ensure, Context};
use radarcore::config::DisplayConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";
pub const DEFAULT_BAUD: u32 = 9600;
pub const DEFAULT_TICK_MS: u64 = 50;

/// Startup configuration; read once, never reloaded.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    pub port: String,
    pub baud: u32,
    pub tick_ms: u64,
    #[serde(flatten)]
    pub display: DisplayConfig,
}

/// Command-line values that win over the file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub port: Option<String>,
    pub baud: Option<u32>,
    pub tick_ms: Option<u64>,
    pub max_range: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub diagnostics: bool,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud: DEFAULT_BAUD,
            tick_ms: DEFAULT_TICK_MS,
            display: DisplayConfig::default(),
        }
    }
}

impl VisualizerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading display config {}", path_ref.display()))?;
        let config: VisualizerConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing display config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(baud) = overrides.baud {
            self.baud = baud;
        }
        if let Some(tick_ms) = overrides.tick_ms {
            self.tick_ms = tick_ms;
        }
        if let Some(max_range) = overrides.max_range {
            self.display.max_range = max_range;
        }
        if let Some(width) = overrides.width {
            self.display.surface.width = width;
        }
        if let Some(height) = overrides.height {
            self.display.surface.height = height;
        }
        self.display.show_diagnostics |= overrides.diagnostics;
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(!self.port.trim().is_empty(), "channel must not be empty");
        ensure!(self.baud > 0, "baud rate must be positive");
        ensure!(self.tick_ms > 0, "tick interval must be positive");
        self.display
            .validate()
            .context("invalid display configuration")?;
        Ok(())
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radarcore::config::SurfaceSize;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_are_valid() {
        let cfg = VisualizerConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.display.max_range, 40);
        assert_eq!(cfg.tick(), Duration::from_millis(50));
    }

    #[test]
    fn config_load_reads_flattened_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"port: tcp://127.0.0.1:9000\nbaud: 115200\nmax_range: 80\nsurface: { width: 900, height: 500 }\ntrail_fade: 0.5\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = VisualizerConfig::load(&path).unwrap();
        assert_eq!(cfg.port, "tcp://127.0.0.1:9000");
        assert_eq!(cfg.baud, 115200);
        assert_eq!(cfg.display.max_range, 80);
        assert_eq!(cfg.display.surface, SurfaceSize::new(900, 500));
        assert_eq!(cfg.display.trail_fade, 0.5);
        assert_eq!(cfg.tick_ms, DEFAULT_TICK_MS);
    }

    #[test]
    fn overrides_win_over_file_values() {
        let cfg = VisualizerConfig::default().with_overrides(Overrides {
            port: Some("-".into()),
            max_range: Some(25),
            height: Some(480),
            diagnostics: true,
            ..Default::default()
        });
        assert_eq!(cfg.port, "-");
        assert_eq!(cfg.display.max_range, 25);
        assert_eq!(cfg.display.surface.height, 480);
        assert_eq!(cfg.display.surface.width, 1200);
        assert!(cfg.display.show_diagnostics);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let zero_tick = VisualizerConfig {
            tick_ms: 0,
            ..Default::default()
        };
        assert!(zero_tick.validate().is_err());

        let zero_range = VisualizerConfig::default().with_overrides(Overrides {
            max_range: Some(0),
            ..Default::default()
        });
        let err = zero_range.validate().unwrap_err();
        assert!(format!("{:#}", err).contains("max range must be positive"));
    }
}
