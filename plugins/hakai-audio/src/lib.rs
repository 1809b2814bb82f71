//! Sound cue plugin
//!
//! Maps gameplay events to named sound cues for the `"audio"` contract.
//! The media pipeline that actually plays the clips is an external
//! collaborator; this plugin resolves which cue an event triggers and at
//! what volume, and records the resolution for the shell to pick up.

use hakai_events::{EventKind, GameEvent};
use hakai_plugin_api::{
    hakai_plugin, ConfigField, FieldKind, GamePlugin, PluginConfig, PluginError, PluginResult,
};
use std::any::Any;
use tracing::debug;

// Self-register the plugin with the Hakai runtime.
hakai_plugin! {
    contract: "audio",
    type_name: "sound_cues",
    schema: SoundCuePlugin::SCHEMA,
    factory: SoundCuePlugin::boxed
}

/// Resolves gameplay events to sound cue names.
pub struct SoundCuePlugin {
    volume: f64,
    muted: bool,
    played: Vec<&'static str>,
}

impl SoundCuePlugin {
    pub const SCHEMA: &'static [ConfigField] = &[
        ConfigField::required("volume", FieldKind::Float),
        ConfigField::optional("muted", FieldKind::Bool),
    ];

    pub fn new() -> Self {
        Self {
            volume: 0.0,
            muted: false,
            played: Vec::new(),
        }
    }

    pub fn boxed() -> Box<dyn GamePlugin> {
        Box::new(Self::new())
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Cues resolved so far, in dispatch order.
    pub fn played(&self) -> &[&'static str] {
        &self.played
    }

    fn cue_for(event: &GameEvent) -> Option<&'static str> {
        match event {
            GameEvent::PaddleHit => Some("paddle_hit.wav"),
            GameEvent::BrickDestroyed { .. } => Some("brick_break.wav"),
            GameEvent::BallLost => Some("ball_lost.wav"),
            GameEvent::GameOver => Some("game_over.wav"),
            GameEvent::LevelClear => Some("level_clear.wav"),
            _ => None,
        }
    }
}

impl Default for SoundCuePlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl GamePlugin for SoundCuePlugin {
    fn type_name(&self) -> &'static str {
        "sound_cues"
    }

    fn contract(&self) -> &'static str {
        "audio"
    }

    fn configure(&mut self, config: &PluginConfig) -> PluginResult<()> {
        let volume = config.require_f64("volume")?;
        if !(0.0..=1.0).contains(&volume) {
            return Err(PluginError::invalid_field(
                "volume",
                "must be within [0.0, 1.0]",
            ));
        }
        self.volume = volume;
        self.muted = config.get_bool("muted").unwrap_or(false);
        Ok(())
    }

    fn subscriptions(&self) -> &'static [EventKind] {
        &[
            EventKind::PaddleHit,
            EventKind::BrickDestroyed,
            EventKind::BallLost,
            EventKind::GameOver,
            EventKind::LevelClear,
        ]
    }

    fn handle_event(&mut self, event: &GameEvent) -> PluginResult<()> {
        if self.muted {
            return Ok(());
        }
        if let Some(cue) = Self::cue_for(event) {
            debug!(cue, volume = self.volume, "Sound cue resolved");
            self.played.push(cue);
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hakai_events::EntityId;
    use pretty_assertions::assert_eq;

    fn configured(yaml: &str) -> SoundCuePlugin {
        let mut plugin = SoundCuePlugin::new();
        plugin
            .configure(&PluginConfig::from_mapping(
                serde_yaml::from_str(yaml).unwrap(),
            ))
            .unwrap();
        plugin
    }

    #[test]
    fn volume_is_required() {
        let mut plugin = SoundCuePlugin::new();
        let err = plugin.configure(&PluginConfig::empty()).unwrap_err();
        assert!(matches!(err, PluginError::MissingField { .. }));
    }

    #[test]
    fn volume_out_of_range_is_rejected() {
        let mut plugin = SoundCuePlugin::new();
        let mapping = serde_yaml::from_str("volume: 1.5").unwrap();
        let err = plugin
            .configure(&PluginConfig::from_mapping(mapping))
            .unwrap_err();
        assert!(matches!(err, PluginError::InvalidField { .. }));
    }

    #[test]
    fn resolves_cues_in_dispatch_order() {
        let mut plugin = configured("volume: 0.8");
        plugin.handle_event(&GameEvent::PaddleHit).unwrap();
        plugin
            .handle_event(&GameEvent::BrickDestroyed {
                brick: EntityId(4),
            })
            .unwrap();
        plugin.handle_event(&GameEvent::GameOver).unwrap();
        assert_eq!(
            plugin.played(),
            &["paddle_hit.wav", "brick_break.wav", "game_over.wav"]
        );
    }

    #[test]
    fn muted_plugin_resolves_nothing() {
        let mut plugin = configured("volume: 0.8\nmuted: true");
        plugin.handle_event(&GameEvent::PaddleHit).unwrap();
        assert!(plugin.played().is_empty());
    }
}
