use crate::generator::profile::ScenarioConfig;
use anyhow::Context;
use aurafuse::prelude::FusionConfig;
use aurafuse::runtime::LaneSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub fusion: FusionConfig,
    pub scenario: ScenarioConfig,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .fusion
            .validate()
            .with_context(|| format!("validating workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    /// CLI flags win over file values.
    pub fn apply_overrides(
        &mut self,
        tick_ms: Option<u64>,
        seed: Option<u64>,
        duration_s: Option<f64>,
    ) {
        if let Some(tick_ms) = tick_ms {
            self.fusion.tick_period_ms = tick_ms;
        }
        if let Some(seed) = seed {
            self.scenario.seed = seed;
        }
        if let Some(duration_s) = duration_s {
            self.scenario.duration_s = duration_s;
        }
    }

    pub fn lane_settings(&self) -> LaneSettings {
        LaneSettings {
            read_timeout: Duration::from_secs(1),
            retry_delay: Duration::from_millis(self.fusion.retry_delay_ms),
        }
    }
}
