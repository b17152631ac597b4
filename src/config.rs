use crate::markov::FallbackPolicy;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

pub const MIN_WORDS: usize = 2;
pub const MAX_WORDS: usize = 100;
pub const MAX_TEMPERATURE: f64 = 10.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub discord_token: String,
    pub database_path: String,
    pub log_level: String,
    pub generation_cooldown_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let generation_cooldown_secs = match lookup("GENERATION_COOLDOWN_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                anyhow::anyhow!("GENERATION_COOLDOWN_SECS must be a whole number of seconds, got '{}'", raw)
            })?,
            None => 30,
        };

        Ok(Config {
            discord_token: lookup("DISCORD_TOKEN")
                .ok_or_else(|| anyhow::anyhow!("DISCORD_TOKEN environment variable not set"))?,
            database_path: lookup("DATABASE_PATH").unwrap_or_else(|| "parrot.db".to_string()),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            generation_cooldown_secs,
        })
    }
}

/// Rejected generator settings, reported back to whoever tried to set them.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("temperature must be between 0 and {max}, got {value}")]
    Temperature { value: f64, max: f64 },

    #[error("max_words must be between {min} and {max}, got {value}")]
    MaxWords { value: i64, min: usize, max: usize },

    #[error("{name} must be between 0 and 1, got {value}")]
    Probability { name: &'static str, value: f64 },
}

/// Per-guild generator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub enabled: bool,
    /// 0 picks the most frequent successor every time.
    pub temperature: f64,
    pub max_words: usize,
    /// Chance that an unprompted message gets a generated reply.
    pub trigger_probability: f64,
    /// Chance to restart from a fresh seed on a dead end instead of stopping.
    pub continuation_probability: f64,
    pub strict_tokens: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            enabled: true,
            temperature: 1.0,
            max_words: 20,
            trigger_probability: 0.01,
            continuation_probability: 0.5,
            strict_tokens: false,
        }
    }
}

/// A partial change to a [`GenerationConfig`]; `None` leaves a field alone.
#[derive(Debug, Clone, Default)]
pub struct GenerationUpdate {
    pub enabled: Option<bool>,
    pub temperature: Option<f64>,
    pub max_words: Option<i64>,
    pub trigger_probability: Option<f64>,
    pub continuation_probability: Option<f64>,
    pub strict_tokens: Option<bool>,
}

impl GenerationUpdate {
    pub fn is_empty(&self) -> bool {
        self.enabled.is_none()
            && self.temperature.is_none()
            && self.max_words.is_none()
            && self.trigger_probability.is_none()
            && self.continuation_probability.is_none()
            && self.strict_tokens.is_none()
    }
}

impl GenerationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_temperature(self.temperature)?;
        validate_max_words(self.max_words as i64)?;
        validate_probability("trigger_probability", self.trigger_probability)?;
        validate_probability("continuation_probability", self.continuation_probability)?;
        Ok(())
    }

    /// Apply `update` on top of this config, rejecting the whole change if
    /// any field is out of range.
    pub fn apply(&self, update: &GenerationUpdate) -> Result<GenerationConfig, ConfigError> {
        let max_words = match update.max_words {
            Some(value) => validate_max_words(value)?,
            None => self.max_words,
        };

        let updated = GenerationConfig {
            enabled: update.enabled.unwrap_or(self.enabled),
            temperature: update.temperature.unwrap_or(self.temperature),
            max_words,
            trigger_probability: update.trigger_probability.unwrap_or(self.trigger_probability),
            continuation_probability: update
                .continuation_probability
                .unwrap_or(self.continuation_probability),
            strict_tokens: update.strict_tokens.unwrap_or(self.strict_tokens),
        };
        updated.validate()?;
        Ok(updated)
    }

    pub fn fallback_policy(&self) -> FallbackPolicy {
        if self.continuation_probability > 0.0 {
            FallbackPolicy::Restart {
                continuation_probability: self.continuation_probability,
            }
        } else {
            FallbackPolicy::Stop
        }
    }
}

pub fn validate_temperature(value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && (0.0..=MAX_TEMPERATURE).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::Temperature {
            value,
            max: MAX_TEMPERATURE,
        })
    }
}

pub fn validate_max_words(value: i64) -> Result<usize, ConfigError> {
    if value >= MIN_WORDS as i64 && value <= MAX_WORDS as i64 {
        Ok(value as usize)
    } else {
        Err(ConfigError::MaxWords {
            value,
            min: MIN_WORDS,
            max: MAX_WORDS,
        })
    }
}

fn validate_probability(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::Probability { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_config_missing_token() {
        let result = Config::from_lookup(lookup(&[]));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_with_defaults() {
        let config = Config::from_lookup(lookup(&[("DISCORD_TOKEN", "test_discord_token")])).unwrap();
        assert_eq!(config.discord_token, "test_discord_token");
        assert_eq!(config.database_path, "parrot.db");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.generation_cooldown_secs, 30);
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DISCORD_TOKEN", "t"),
            ("DATABASE_PATH", "/tmp/chatter.db"),
            ("LOG_LEVEL", "debug"),
            ("GENERATION_COOLDOWN_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.database_path, "/tmp/chatter.db");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.generation_cooldown_secs, 5);
    }

    #[test]
    fn test_config_rejects_bad_cooldown() {
        let result = Config::from_lookup(lookup(&[
            ("DISCORD_TOKEN", "t"),
            ("GENERATION_COOLDOWN_SECS", "soon"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_default_generation_config_is_valid() {
        assert!(GenerationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_apply_partial_update() {
        let update = GenerationUpdate {
            temperature: Some(0.4),
            max_words: Some(8),
            ..Default::default()
        };
        let updated = GenerationConfig::default().apply(&update).unwrap();
        assert_eq!(updated.temperature, 0.4);
        assert_eq!(updated.max_words, 8);
        assert_eq!(updated.trigger_probability, 0.01);
        assert!(updated.enabled);
    }

    #[test]
    fn test_apply_rejects_out_of_range() {
        let base = GenerationConfig::default();

        let err = base
            .apply(&GenerationUpdate { max_words: Some(1), ..Default::default() })
            .unwrap_err();
        assert_eq!(err, ConfigError::MaxWords { value: 1, min: 2, max: 100 });

        let err = base
            .apply(&GenerationUpdate { max_words: Some(-5), ..Default::default() })
            .unwrap_err();
        assert!(matches!(err, ConfigError::MaxWords { value: -5, .. }));

        assert!(base
            .apply(&GenerationUpdate { temperature: Some(f64::NAN), ..Default::default() })
            .is_err());
        assert!(base
            .apply(&GenerationUpdate { temperature: Some(-0.1), ..Default::default() })
            .is_err());
        assert!(base
            .apply(&GenerationUpdate { trigger_probability: Some(1.5), ..Default::default() })
            .is_err());
        assert!(base
            .apply(&GenerationUpdate { continuation_probability: Some(f64::NAN), ..Default::default() })
            .is_err());
    }

    #[test]
    fn test_fallback_policy_mapping() {
        let mut config = GenerationConfig::default();
        assert_eq!(
            config.fallback_policy(),
            FallbackPolicy::Restart { continuation_probability: 0.5 }
        );
        config.continuation_probability = 0.0;
        assert_eq!(config.fallback_policy(), FallbackPolicy::Stop);
    }

    #[test]
    fn test_update_is_empty() {
        assert!(GenerationUpdate::default().is_empty());
        assert!(!GenerationUpdate { strict_tokens: Some(true), ..Default::default() }.is_empty());
    }
}
