//! Level descriptors
//!
//! Levels are declarative YAML documents describing the brick layout and
//! the power-ups bricks carry. The runtime core does not interpret them;
//! the application shell builds its entity world from the typed data.

use crate::ConfigError;
use hakai_events::{PowerUpKind, PowerUpTrigger};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Layout configuration for a level's brick grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutData {
    pub default_brick_width: f64,
    pub default_brick_height: f64,
    pub padding: f64,
    pub offset_top: f64,
    /// Rows of brick-type symbols; spaces and dots are empty cells.
    pub pattern: Vec<String>,
}

/// Power-up carried by a brick type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerUpData {
    #[serde(rename = "type")]
    pub kind: PowerUpKind,
    pub trigger: PowerUpTrigger,
}

/// One brick type referenced from the layout pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrickTypeData {
    pub color: String,
    pub hp: u32,
    // Optional so the layout defaults apply when unspecified.
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub power_up: Option<PowerUpData>,
}

/// A complete level description.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelData {
    pub level_name: String,
    pub level_number: u32,
    #[serde(default)]
    pub background: Option<String>,
    pub layout: LayoutData,
    pub brick_types: BTreeMap<char, BrickTypeData>,
}

impl LevelData {
    /// Parse a level from YAML text.
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        let level: LevelData =
            serde_yaml::from_str(source).map_err(|e| ConfigError::parse(e.to_string()))?;
        level.validate()?;
        debug!(
            level = %level.level_name,
            brick_types = level.brick_types.len(),
            "Level descriptor loaded"
        );
        Ok(level)
    }

    /// Parse a level from a file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (row_index, row) in self.layout.pattern.iter().enumerate() {
            for symbol in row.chars() {
                if symbol == ' ' || symbol == '.' {
                    continue;
                }
                if !self.brick_types.contains_key(&symbol) {
                    return Err(ConfigError::schema(format!(
                        "pattern row {row_index} references undefined brick type '{symbol}'"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LEVEL: &str = r##"
levelName: "Demolition Alley"
levelNumber: 2
background: "bg_night.png"
layout:
  defaultBrickWidth: 60.0
  defaultBrickHeight: 20.0
  padding: 4.0
  offsetTop: 60.0
  pattern:
    - "SSSSSSSSSS"
    - "W.W.W.W.W."
    - "  PPPP    "
brickTypes:
  S:
    color: "#888888"
    hp: 1
  W:
    color: "#cc3333"
    hp: 2
    width: 80.0
  P:
    color: "#33cc33"
    hp: 1
    powerUp:
      type: PADDLE_EXPAND
      trigger: ON_COLLECT
"##;

    #[test]
    fn parses_level_file() {
        let level = LevelData::parse(LEVEL).unwrap();
        assert_eq!(level.level_number, 2);
        assert_eq!(level.brick_types.len(), 3);

        let p = &level.brick_types[&'P'];
        let power_up = p.power_up.as_ref().unwrap();
        assert_eq!(power_up.kind, PowerUpKind::PaddleExpand);
        assert_eq!(power_up.trigger, PowerUpTrigger::OnCollect);
        // Unspecified dimensions fall back to layout defaults.
        assert_eq!(p.width, None);
        assert_eq!(level.brick_types[&'W'].width, Some(80.0));
    }

    #[test]
    fn unknown_pattern_symbol_is_a_schema_error() {
        let broken = LEVEL.replace("W.W.W.W.W.", "X.X.X.X.X.");
        let err = LevelData::parse(&broken).unwrap_err();
        assert!(matches!(err, ConfigError::Schema { .. }));
        assert!(err.to_string().contains('X'));
    }

    #[test]
    fn unknown_power_up_kind_is_a_parse_error() {
        let broken = LEVEL.replace("PADDLE_EXPAND", "PADDLE_TELEPORT");
        let err = LevelData::parse(&broken).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
