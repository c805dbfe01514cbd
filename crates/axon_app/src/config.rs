//! Application configuration

use serde::{Deserialize, Serialize};

/// Tunables for the tick schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Largest delta a single tick will accept, in seconds. A lag spike
    /// above this is clamped so delayed commands and updates don't jump.
    pub max_delta_time: f32,
    /// Cap on commands processed per tick. `None` processes everything
    /// that is ready.
    pub max_commands_per_tick: Option<usize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_delta_time: 0.25,
            max_commands_per_tick: None,
        }
    }
}

impl AppConfig {
    /// Parse a config from JSON. Missing fields fall back to defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialize the config to JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let config = AppConfig {
            max_delta_time: 0.1,
            max_commands_per_tick: Some(32),
        };
        let json = config.to_json().unwrap();
        let parsed = AppConfig::from_json(&json).unwrap();
        assert!((parsed.max_delta_time - 0.1).abs() < f32::EPSILON);
        assert_eq!(parsed.max_commands_per_tick, Some(32));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let parsed = AppConfig::from_json(r#"{"max_commands_per_tick": 8}"#).unwrap();
        assert_eq!(parsed.max_commands_per_tick, Some(8));
        assert!((parsed.max_delta_time - 0.25).abs() < f32::EPSILON);
    }
}
