use serde::{Deserialize, Serialize};

/// Data-driven configuration for the round lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    /// Minimum round length in milliseconds before the level can roll over.
    pub round_length_ms: f64,
    /// CPU players stop joining once this many balls are in the round.
    pub cpu_fill_target: usize,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            round_length_ms: 20_000.0,
            cpu_fill_target: 4,
        }
    }
}

impl RoundConfig {
    /// Load config from environment or TOML file, falling back to defaults.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("PARLOOP_CONFIG")
            && let Ok(contents) = std::fs::read_to_string(&path)
            && let Ok(config) = toml::from_str::<Self>(&contents)
        {
            return config;
        }
        if let Ok(contents) = std::fs::read_to_string("config/parloop.toml")
            && let Ok(config) = toml::from_str::<Self>(&contents)
        {
            return config;
        }
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_round() {
        let config = RoundConfig::default();
        assert_eq!(config.round_length_ms, 20_000.0);
        assert_eq!(config.cpu_fill_target, 4);
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let config: RoundConfig = toml::from_str("round_length_ms = 45000.0").unwrap();
        assert_eq!(config.round_length_ms, 45_000.0);
        assert_eq!(config.cpu_fill_target, 4);
    }

    #[test]
    fn full_toml_overrides_everything() {
        let config: RoundConfig =
            toml::from_str("round_length_ms = 60000.0\ncpu_fill_target = 8").unwrap();
        assert_eq!(config.round_length_ms, 60_000.0);
        assert_eq!(config.cpu_fill_target, 8);
    }
}
