use crate::generator::profile::{build_scenario, ScheduledEvent};
use crate::workflow::config::WorkflowConfig;
use aurafuse::interface::{IntrusionEvent, IntrusionKind, SceneSnapshot};
use aurafuse::processing::FusionEngine;

pub struct WorkflowResult {
    pub ticks: usize,
    pub tag_updates: usize,
    pub removed_points: usize,
    pub intrusion_events: Vec<IntrusionEvent>,
    pub final_snapshot: Option<SceneSnapshot>,
}

impl WorkflowResult {
    pub fn count(&self, kind: IntrusionKind) -> usize {
        self.intrusion_events
            .iter()
            .filter(|event| event.kind == kind)
            .count()
    }
}

/// Offline driver: feeds a scenario through the engine on a simulated clock.
#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> anyhow::Result<WorkflowResult> {
        let events = build_scenario(&self.config.scenario, &self.config.fusion)?;
        // Run past the end of the feeds so evictions and departures show up.
        let fusion = &self.config.fusion;
        let tail = fusion.persistence_duration + fusion.illegal_persistence_duration + 1.0;
        Ok(self.replay(&events, self.config.scenario.duration_s + tail))
    }

    /// Ticks every `tick_period_ms` of scenario time, handing the engine
    /// every event scheduled at or before the tick.
    pub fn replay(&self, events: &[ScheduledEvent], until_s: f64) -> WorkflowResult {
        let mut engine = FusionEngine::new(self.config.fusion.clone());
        let period = self.config.fusion.tick_period_ms.max(1) as f64 / 1000.0;
        let mut result = WorkflowResult {
            ticks: 0,
            tag_updates: 0,
            removed_points: 0,
            intrusion_events: Vec::new(),
            final_snapshot: None,
        };

        let mut cursor = 0;
        for step in 0_u32.. {
            let now = f64::from(step) * period;
            if now > until_s {
                break;
            }
            let due = events[cursor..]
                .iter()
                .take_while(|scheduled| scheduled.at <= now)
                .count();
            let batch = events[cursor..cursor + due]
                .iter()
                .map(|scheduled| scheduled.event.clone());
            cursor += due;

            let report = engine.tick(batch, now);
            result.ticks += 1;
            result.tag_updates += report.tag_updates.len();
            result.removed_points += report.removed_points.len();
            result.intrusion_events.extend(report.intrusion_events);
            result.final_snapshot = Some(report.snapshot);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::ScenarioConfig;

    #[test]
    fn default_scenario_flags_then_clears() {
        let runner = Runner::new(WorkflowConfig::default());
        let result = runner.execute().unwrap();

        assert_eq!(result.count(IntrusionKind::Flagged), 1);
        assert_eq!(result.count(IntrusionKind::Cleared), 1);
        let flagged_at = result
            .intrusion_events
            .iter()
            .find(|e| e.kind == IntrusionKind::Flagged)
            .map(|e| e.timestamp)
            .unwrap();
        let cleared_at = result
            .intrusion_events
            .iter()
            .find(|e| e.kind == IntrusionKind::Cleared)
            .map(|e| e.timestamp)
            .unwrap();
        assert!(flagged_at < cleared_at);
        assert!(result.count(IntrusionKind::ObjectLeft) > 0);
        assert!(result.tag_updates > 0);

        let snapshot = result.final_snapshot.unwrap();
        assert_eq!(snapshot.tags.len(), 1);
        assert!(!snapshot.intrusion.flagged);
    }

    #[test]
    fn scenario_without_intruder_never_flags() {
        let mut config = WorkflowConfig::default();
        config.scenario = ScenarioConfig {
            intruder: None,
            ..Default::default()
        };
        let result = Runner::new(config).execute().unwrap();
        assert_eq!(result.count(IntrusionKind::Flagged), 0);
        assert_eq!(result.count(IntrusionKind::Cleared), 0);
        assert!(result.ticks > 300);
    }
}
