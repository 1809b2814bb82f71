//! Paddle slowdown malus

use hakai_events::{EffectCategory, EntityId, EventKind, GameEvent, PowerUpKind};
use hakai_plugin_api::{
    hakai_plugin, ConfigField, FieldKind, GamePlugin, PluginConfig, PluginError, PluginResult,
    TimedEffect,
};
use std::any::Any;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::debug;

const DEFAULT_DURATION_SECS: f64 = 8.0;
const DEFAULT_SPEED_MULTIPLIER: f64 = 0.5;

// Self-register the plugin with the Hakai runtime.
hakai_plugin! {
    contract: "effects",
    type_name: "paddle_slow",
    schema: PaddleSlowPlugin::SCHEMA,
    factory: PaddleSlowPlugin::boxed
}

/// Halves the collector's paddle speed for a bounded time.
pub struct PaddleSlowPlugin {
    speed_multiplier: f64,
    duration: Duration,
    slowed: BTreeSet<EntityId>,
}

impl PaddleSlowPlugin {
    pub const SCHEMA: &'static [ConfigField] = &[
        ConfigField::optional("speed_multiplier", FieldKind::Float),
        ConfigField::optional("duration_secs", FieldKind::Float),
    ];

    pub fn new() -> Self {
        Self {
            speed_multiplier: DEFAULT_SPEED_MULTIPLIER,
            duration: Duration::from_secs_f64(DEFAULT_DURATION_SECS),
            slowed: BTreeSet::new(),
        }
    }

    pub fn boxed() -> Box<dyn GamePlugin> {
        Box::new(Self::new())
    }

    pub fn is_slowed(&self, entity: EntityId) -> bool {
        self.slowed.contains(&entity)
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }
}

impl Default for PaddleSlowPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl GamePlugin for PaddleSlowPlugin {
    fn type_name(&self) -> &'static str {
        "paddle_slow"
    }

    fn contract(&self) -> &'static str {
        "effects"
    }

    fn configure(&mut self, config: &PluginConfig) -> PluginResult<()> {
        if let Some(multiplier) = config.get_f64("speed_multiplier") {
            // A multiplier above 1.0 would turn the malus into a buff.
            if multiplier <= 0.0 || multiplier > 1.0 {
                return Err(PluginError::invalid_field(
                    "speed_multiplier",
                    "must be within (0.0, 1.0]",
                ));
            }
            self.speed_multiplier = multiplier;
        }
        if let Some(secs) = config.get_f64("duration_secs") {
            self.duration = Duration::from_secs_f64(secs);
        }
        Ok(())
    }

    fn subscriptions(&self) -> &'static [EventKind] {
        &[EventKind::PowerUpCollected]
    }

    fn handle_event(&mut self, event: &GameEvent) -> PluginResult<()> {
        if let GameEvent::PowerUpCollected { collector, kind } = event {
            if *kind != PowerUpKind::PaddleSlow {
                return Ok(());
            }
            if self.slowed.insert(*collector) {
                debug!(
                    collector = %collector,
                    multiplier = self.speed_multiplier,
                    "Paddle slowed"
                );
            } else {
                debug!(collector = %collector, "Paddle already slowed, ignoring");
            }
        }
        Ok(())
    }

    fn timed_effect(&self) -> Option<&dyn TimedEffect> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl TimedEffect for PaddleSlowPlugin {
    fn duration(&self) -> Option<Duration> {
        Some(self.duration)
    }

    fn category(&self) -> EffectCategory {
        EffectCategory::Negative
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn malus_is_negative() {
        let plugin = PaddleSlowPlugin::new();
        assert_eq!(
            plugin.timed_effect().unwrap().category(),
            EffectCategory::Negative
        );
    }

    #[test]
    fn rejects_buffing_multiplier() {
        let mapping = serde_yaml::from_str("speed_multiplier: 1.5").unwrap();
        let mut plugin = PaddleSlowPlugin::new();
        let err = plugin
            .configure(&PluginConfig::from_mapping(mapping))
            .unwrap_err();
        assert!(matches!(err, PluginError::InvalidField { .. }));
        // The default survives the rejected configure call.
        assert_eq!(plugin.speed_multiplier(), DEFAULT_SPEED_MULTIPLIER);
    }

    #[test]
    fn slows_collector_once() {
        let mut plugin = PaddleSlowPlugin::new();
        let event = GameEvent::PowerUpCollected {
            collector: EntityId(9),
            kind: PowerUpKind::PaddleSlow,
        };
        plugin.handle_event(&event).unwrap();
        plugin.handle_event(&event).unwrap();
        assert!(plugin.is_slowed(EntityId(9)));
        assert_eq!(plugin.slowed.len(), 1);
    }
}
