// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Runtime configuration of an RHI instance.

use crate::rhi::{AssertPolicy, BackendType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Settings used to create an RHI instance, typically loaded from a RON file.
///
/// Every field has a default, so a configuration file only needs to name the
/// settings it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RhiConfig {
    /// The backend to create.
    pub backend: BackendType,
    /// What happens when an RHI assertion fails.
    pub assertion_policy: AssertPolicy,
    /// An optional name used in logs to tell RHI instances apart.
    pub debug_name: Option<String>,
    /// Capacity of the graphics pipeline state ID pool.
    pub maximum_number_of_pipeline_states: u32,
    /// The initial back buffer size of swap chains, in pixels.
    pub swap_chain_size: (u32, u32),
}

impl Default for RhiConfig {
    fn default() -> Self {
        Self {
            backend: BackendType::Null,
            assertion_policy: AssertPolicy::Log,
            debug_name: None,
            maximum_number_of_pipeline_states: 4096,
            swap_chain_size: (1024, 768),
        }
    }
}

impl RhiConfig {
    /// Parses a configuration from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        ron::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reads and parses a RON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        let config = Self::from_ron_str(&text)?;
        log::info!("Loaded RHI configuration from {}", path.display());
        Ok(config)
    }

    /// Serializes the configuration to pretty RON text.
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Errors raised while loading an [`RhiConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The file could not be read.
    Io(String),
    /// The text is not a valid configuration.
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "Failed to read configuration: {msg}"),
            ConfigError::Parse(msg) => write!(f, "Invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_configuration_keeps_defaults() {
        let config = RhiConfig::from_ron_str("(assertion_policy: Panic, debug_name: Some(\"main\"))")
            .unwrap();
        assert_eq!(config.assertion_policy, AssertPolicy::Panic);
        assert_eq!(config.debug_name.as_deref(), Some("main"));
        assert_eq!(config.backend, BackendType::Null);
        assert_eq!(config.maximum_number_of_pipeline_states, 4096);
    }

    #[test]
    fn configuration_survives_ron_text() {
        let config = RhiConfig {
            backend: BackendType::Vulkan,
            swap_chain_size: (1920, 1080),
            ..Default::default()
        };
        let text = config.to_ron_string().unwrap();
        assert_eq!(RhiConfig::from_ron_str(&text).unwrap(), config);
    }

    #[test]
    fn malformed_text_is_a_parse_error() {
        let err = RhiConfig::from_ron_str("(backend: Metal)").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = RhiConfig::load("definitely/not/here.ron").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
