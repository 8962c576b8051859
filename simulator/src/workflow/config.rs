use crate::generator::profile::ScenarioConfig;
use anyhow::Context;
use radarcore::config::DEFAULT_MAX_RANGE_CM;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Range used to classify readings in the offline summary.
    pub max_range: u32,
    pub scenario: ScenarioConfig,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_range: DEFAULT_MAX_RANGE_CM,
            scenario: ScenarioConfig::default(),
        }
    }
}

impl SimulatorConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading scenario {}", path_ref.display()))?;
        let config: SimulatorConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing scenario {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(max_range: u32, seed: u64) -> Self {
        Self {
            max_range,
            scenario: ScenarioConfig {
                seed,
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_sets_seed() {
        let cfg = SimulatorConfig::from_args(40, 9);
        assert_eq!(cfg.scenario.seed, 9);
        assert_eq!(cfg.scenario.step_deg, 2);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"max_range: 60\nscenario:\n  step_deg: 5\n  malformed_rate: 0.1\n  targets:\n    - { from_deg: 10, to_deg: 20, distance_cm: 30 }\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = SimulatorConfig::load(&path).unwrap();
        assert_eq!(cfg.max_range, 60);
        assert_eq!(cfg.scenario.step_deg, 5);
        assert_eq!(cfg.scenario.targets.len(), 1);
        assert_eq!(cfg.scenario.max_chunk, 8);
    }

    #[test]
    fn config_load_reports_missing_file() {
        let err = SimulatorConfig::load("/nonexistent/scenario.yaml").unwrap_err();
        assert!(err.to_string().contains("reading scenario"));
    }
}
