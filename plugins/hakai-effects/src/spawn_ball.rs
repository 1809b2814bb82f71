//! Extra-ball power-up

use hakai_events::{
    EffectCategory, EventBus, EventKind, GameEvent, PowerUpKind,
};
use hakai_plugin_api::{
    hakai_plugin, ConfigField, FieldKind, GamePlugin, PluginConfig, PluginError, PluginResult,
    TimedEffect,
};
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_SPAWN_RANDOMNESS: f64 = 1.25;

// Self-register the plugin with the Hakai runtime.
hakai_plugin! {
    contract: "effects",
    type_name: "spawn_ball",
    schema: SpawnBallPlugin::SCHEMA,
    factory: SpawnBallPlugin::boxed
}

/// Requests an extra ball when its power-up is collected.
///
/// The runtime owns no entity world, so the plugin asks the shell for
/// the spawn by publishing `ResetBall` back onto the bus — a re-entrant
/// publish that the bus queues behind the event being dispatched.
pub struct SpawnBallPlugin {
    spawn_randomness: f64,
    bus: Option<Arc<EventBus>>,
    spawned: u64,
}

impl SpawnBallPlugin {
    pub const SCHEMA: &'static [ConfigField] =
        &[ConfigField::optional("spawn_randomness", FieldKind::Float)];

    pub fn new() -> Self {
        Self {
            spawn_randomness: DEFAULT_SPAWN_RANDOMNESS,
            bus: None,
            spawned: 0,
        }
    }

    pub fn boxed() -> Box<dyn GamePlugin> {
        Box::new(Self::new())
    }

    /// How many spawns this instance has requested.
    pub fn spawned(&self) -> u64 {
        self.spawned
    }
}

impl Default for SpawnBallPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl GamePlugin for SpawnBallPlugin {
    fn type_name(&self) -> &'static str {
        "spawn_ball"
    }

    fn contract(&self) -> &'static str {
        "effects"
    }

    fn configure(&mut self, config: &PluginConfig) -> PluginResult<()> {
        if let Some(randomness) = config.get_f64("spawn_randomness") {
            self.spawn_randomness = randomness;
        }
        Ok(())
    }

    fn on_init(&mut self, bus: &Arc<EventBus>) -> PluginResult<()> {
        self.bus = Some(bus.clone());
        Ok(())
    }

    fn subscriptions(&self) -> &'static [EventKind] {
        &[EventKind::PowerUpCollected]
    }

    fn handle_event(&mut self, event: &GameEvent) -> PluginResult<()> {
        let GameEvent::PowerUpCollected { collector, kind } = event else {
            return Ok(());
        };
        if *kind != PowerUpKind::SpawnBall {
            return Ok(());
        }
        let bus = self
            .bus
            .as_ref()
            .ok_or_else(|| PluginError::internal("spawn_ball used before on_init"))?;

        self.spawned += 1;
        debug!(collector = %collector, total = self.spawned, "Extra ball requested");
        // Queued behind the PowerUpCollected dispatch in flight; a
        // failure can only surface when called outside a dispatch.
        if let Err(err) = bus.publish(GameEvent::ResetBall) {
            warn!(%err, "ResetBall dispatch reported handler failures");
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

impl TimedEffect for SpawnBallPlugin {
    // Instant effect: nothing to expire.
    fn duration(&self) -> Option<Duration> {
        None
    }

    fn category(&self) -> EffectCategory {
        EffectCategory::Positive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hakai_events::EntityId;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;

    #[test]
    fn requests_spawn_through_the_bus() {
        let bus = Arc::new(EventBus::new());
        let resets = Arc::new(Mutex::new(0usize));
        {
            let resets = resets.clone();
            bus.subscribe(EventKind::ResetBall, move |_| {
                *resets.lock() += 1;
                Ok(())
            });
        }

        let mut plugin = SpawnBallPlugin::new();
        plugin.on_init(&bus).unwrap();
        plugin
            .handle_event(&GameEvent::PowerUpCollected {
                collector: EntityId(2),
                kind: PowerUpKind::SpawnBall,
            })
            .unwrap();

        assert_eq!(*resets.lock(), 1);
        assert_eq!(plugin.spawned(), 1);
    }

    #[test]
    fn errors_when_used_before_init() {
        let mut plugin = SpawnBallPlugin::new();
        let err = plugin
            .handle_event(&GameEvent::PowerUpCollected {
                collector: EntityId(2),
                kind: PowerUpKind::SpawnBall,
            })
            .unwrap_err();
        assert!(matches!(err, PluginError::Internal { .. }));
    }

    #[test]
    fn instant_effect_has_no_duration() {
        let plugin = SpawnBallPlugin::new();
        assert_eq!(plugin.timed_effect().unwrap().duration(), None);
    }
}
