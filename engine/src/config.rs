// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the Apache-style license found in the
// LICENSE file in the root directory of this source tree.

use once_cell::sync::Lazy;
use parking_lot::RwLock;

/// Environment variable overriding [`EngineConfig::parallel_threshold`]
pub const PAR_THRESHOLD_ENV: &str = "EXTENSION_PAR_THRESHOLD";

const DEFAULT_PAR_THRESHOLD: usize = 1 << 12; // 4096 elements

/// Runtime knobs for kernel execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Element count at which elementwise kernels switch to rayon
    pub parallel_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PAR_THRESHOLD,
        }
    }
}

impl EngineConfig {
    /// Build a config from the process environment, falling back to defaults
    /// for unset or unparsable values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = lookup(PAR_THRESHOLD_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(value) => config.parallel_threshold = value,
                Err(_) => tracing::warn!(
                    "ignoring {PAR_THRESHOLD_ENV}={raw:?}: expected a non-negative integer"
                ),
            }
        }
        config
    }
}

static ENGINE_CONFIG: Lazy<RwLock<EngineConfig>> =
    Lazy::new(|| RwLock::new(EngineConfig::from_env()));

/// Current process-wide configuration
pub fn config() -> EngineConfig {
    *ENGINE_CONFIG.read()
}

/// Replace the process-wide configuration
pub fn set_config(config: EngineConfig) {
    *ENGINE_CONFIG.write() = config;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold() {
        let config = EngineConfig::from_lookup(|_| None);
        assert_eq!(config.parallel_threshold, 4096);
    }

    #[test]
    fn test_env_override() {
        let config = EngineConfig::from_lookup(|key| {
            (key == PAR_THRESHOLD_ENV).then(|| " 128 ".to_string())
        });
        assert_eq!(config.parallel_threshold, 128);
    }

    #[test]
    fn test_invalid_env_value_falls_back() {
        let config = EngineConfig::from_lookup(|_| Some("lots".to_string()));
        assert_eq!(config, EngineConfig::default());
    }
}
