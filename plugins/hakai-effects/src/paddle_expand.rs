//! Paddle expansion power-up

use hakai_events::{EffectCategory, EntityId, EventKind, GameEvent, PowerUpKind};
use hakai_plugin_api::{
    hakai_plugin, ConfigField, FieldKind, GamePlugin, PluginConfig, PluginResult, TimedEffect,
};
use std::any::Any;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::debug;

const DEFAULT_DURATION_SECS: f64 = 10.0;
const DEFAULT_WIDTH_MULTIPLIER: f64 = 1.5;

// Self-register the plugin with the Hakai runtime.
hakai_plugin! {
    contract: "effects",
    type_name: "paddle_expand",
    schema: PaddleExpandPlugin::SCHEMA,
    factory: PaddleExpandPlugin::boxed
}

/// Widens the collector's paddle for a bounded time.
///
/// Collecting the same power-up again while it is active is a no-op, so
/// the original width can always be restored when the effect expires.
pub struct PaddleExpandPlugin {
    width_multiplier: f64,
    duration: Duration,
    expanded: BTreeSet<EntityId>,
}

impl PaddleExpandPlugin {
    pub const SCHEMA: &'static [ConfigField] = &[
        ConfigField::optional("width_multiplier", FieldKind::Float),
        ConfigField::optional("duration_secs", FieldKind::Float),
    ];

    pub fn new() -> Self {
        Self {
            width_multiplier: DEFAULT_WIDTH_MULTIPLIER,
            duration: Duration::from_secs_f64(DEFAULT_DURATION_SECS),
            expanded: BTreeSet::new(),
        }
    }

    pub fn boxed() -> Box<dyn GamePlugin> {
        Box::new(Self::new())
    }

    /// Whether the effect is currently applied to an entity.
    pub fn is_expanded(&self, entity: EntityId) -> bool {
        self.expanded.contains(&entity)
    }

    pub fn width_multiplier(&self) -> f64 {
        self.width_multiplier
    }
}

impl Default for PaddleExpandPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl GamePlugin for PaddleExpandPlugin {
    fn type_name(&self) -> &'static str {
        "paddle_expand"
    }

    fn contract(&self) -> &'static str {
        "effects"
    }

    fn configure(&mut self, config: &PluginConfig) -> PluginResult<()> {
        if let Some(multiplier) = config.get_f64("width_multiplier") {
            self.width_multiplier = multiplier;
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
            if *kind != PowerUpKind::PaddleExpand {
                return Ok(());
            }
            // Collecting twice must not stack, or restoring the original
            // width on expiry would be wrong.
            if self.expanded.insert(*collector) {
                debug!(
                    collector = %collector,
                    multiplier = self.width_multiplier,
                    "Paddle expanded"
                );
            } else {
                debug!(collector = %collector, "Paddle already expanded, ignoring");
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

impl TimedEffect for PaddleExpandPlugin {
    fn duration(&self) -> Option<Duration> {
        Some(self.duration)
    }

    fn category(&self) -> EffectCategory {
        EffectCategory::Positive
    }
}
