//! The gameplay event taxonomy
//!
//! Events carry plain value payloads (entity ids, counters, power-up
//! kinds), never references into simulation state, so they can be shared
//! read-only with every subscriber during dispatch.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to a simulation entity (a brick, the paddle, a drop).
///
/// The runtime never dereferences these; they are minted and resolved by
/// the application shell that owns the entity world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// The complete set of power-up and malus effect identifiers.
///
/// An enum rather than free-form strings so that typos in configuration
/// files fail at deserialization instead of silently matching nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PowerUpKind {
    PaddleExpand,
    SpawnBall,
    PaddleSlow,
}

impl PowerUpKind {
    /// The visual category, used to pick positive vs. malus styling.
    pub fn category(&self) -> EffectCategory {
        match self {
            PowerUpKind::PaddleExpand | PowerUpKind::SpawnBall => EffectCategory::Positive,
            PowerUpKind::PaddleSlow => EffectCategory::Negative,
        }
    }
}

impl fmt::Display for PowerUpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PowerUpKind::PaddleExpand => "PADDLE_EXPAND",
            PowerUpKind::SpawnBall => "SPAWN_BALL",
            PowerUpKind::PaddleSlow => "PADDLE_SLOW",
        };
        f.write_str(name)
    }
}

/// Whether an effect helps or hurts the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectCategory {
    Positive,
    Negative,
}

/// The condition under which a power-up effect activates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PowerUpTrigger {
    /// Applied instantly when the containing brick is destroyed.
    Instant,
    /// Spawned as a collectible drop the paddle must pick up.
    OnCollect,
}

/// A gameplay event.
///
/// Ownership transfers to the bus at publish time; subscribers observe a
/// shared borrow for the duration of their dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A ball collided with a brick.
    BrickHit { brick: EntityId },
    /// A brick's hit points reached zero.
    BrickDestroyed { brick: EntityId },
    /// Two entity bounding boxes overlapped.
    Collision { first: EntityId, second: EntityId },
    /// The ball bounced off the player's paddle.
    PaddleHit,
    /// The ball left the bottom edge of the playfield.
    BallLost,
    /// A ball should be (re)placed on the paddle for launch.
    ResetBall,
    /// The player's score changed.
    ScoreChanged { score: u32 },
    /// The player's remaining lives changed.
    LivesChanged { lives: u32 },
    /// The paddle collected a power-up drop.
    PowerUpCollected {
        collector: EntityId,
        kind: PowerUpKind,
    },
    /// The player ran out of lives.
    GameOver,
    /// The last brick was destroyed.
    LevelClear,
}

impl GameEvent {
    /// The type tag used for subscription routing.
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::BrickHit { .. } => EventKind::BrickHit,
            GameEvent::BrickDestroyed { .. } => EventKind::BrickDestroyed,
            GameEvent::Collision { .. } => EventKind::Collision,
            GameEvent::PaddleHit => EventKind::PaddleHit,
            GameEvent::BallLost => EventKind::BallLost,
            GameEvent::ResetBall => EventKind::ResetBall,
            GameEvent::ScoreChanged { .. } => EventKind::ScoreChanged,
            GameEvent::LivesChanged { .. } => EventKind::LivesChanged,
            GameEvent::PowerUpCollected { .. } => EventKind::PowerUpCollected,
            GameEvent::GameOver => EventKind::GameOver,
            GameEvent::LevelClear => EventKind::LevelClear,
        }
    }
}

/// Discriminant of [`GameEvent`], used as the subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    BrickHit,
    BrickDestroyed,
    Collision,
    PaddleHit,
    BallLost,
    ResetBall,
    ScoreChanged,
    LivesChanged,
    PowerUpCollected,
    GameOver,
    LevelClear,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        let event = GameEvent::PowerUpCollected {
            collector: EntityId(7),
            kind: PowerUpKind::SpawnBall,
        };
        assert_eq!(event.kind(), EventKind::PowerUpCollected);
        assert_eq!(GameEvent::GameOver.kind(), EventKind::GameOver);
    }

    #[test]
    fn power_up_kind_yaml_names_match_config_files() {
        let kind: PowerUpKind = serde_yaml::from_str("PADDLE_EXPAND").unwrap();
        assert_eq!(kind, PowerUpKind::PaddleExpand);
        let trigger: PowerUpTrigger = serde_yaml::from_str("ON_COLLECT").unwrap();
        assert_eq!(trigger, PowerUpTrigger::OnCollect);
    }

    #[test]
    fn malus_is_negative() {
        assert_eq!(PowerUpKind::PaddleSlow.category(), EffectCategory::Negative);
        assert_eq!(
            PowerUpKind::PaddleExpand.category(),
            EffectCategory::Positive
        );
    }
}
