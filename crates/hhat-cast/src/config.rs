//! Runtime configuration.
//!
//! Loaded once by the host and passed by reference into casts and memory
//! construction:
//!
//! ```yaml
//! backend:
//!   name: simulator
//!   version: "0.3.0"
//!   max_qubits: 20
//!   device_type: simulator
//!   paradigms: [digital]
//! execution:
//!   shots: 2048
//!   timeout_seconds: 30
//!   shots_policy:
//!     policy: linear
//!     threshold: 12
//! resolver: highest
//! memory:
//!   max_num_index: 20
//! ```
//!
//! Precedence (highest to lowest): environment variables, config file,
//! defaults.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `HHAT_SHOTS` | `execution.shots` |
//! | `HHAT_TIMEOUT_SECONDS` | `execution.timeout_seconds` |
//! | `HHAT_RESOLVER` | `resolver` |
//! | `HHAT_MAX_NUM_INDEX` | `memory.max_num_index` |

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use hhat_hal::{BackendInfo, Paradigm, ShotsEstimator, ShotsPolicy};
use hhat_mem::{DEFAULT_STACK_CAPACITY, MemoryManager};

use crate::error::{ConfigError, ConfigResult};
use crate::resolver::ResolverKind;

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Execution target.
    pub backend: BackendInfo,

    pub execution: ExecutionConfig,

    /// Default resolver for quantum to classical casts.
    pub resolver: ResolverKind,

    pub memory: MemoryConfig,
}

/// Shots and timeout for backend runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Fixed shot count. When absent, `shots_policy` decides.
    #[serde(default)]
    pub shots: Option<u32>,

    /// Wait limit per run. When absent, the backend's default applies.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: Option<u64>,

    #[serde(default)]
    pub shots_policy: ShotsPolicy,
}

fn default_timeout_seconds() -> Option<u64> {
    Some(60)
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            shots: None,
            timeout_seconds: default_timeout_seconds(),
            shots_policy: ShotsPolicy::default(),
        }
    }
}

impl ExecutionConfig {
    /// Shots for a program over `num_idxs` indices.
    pub fn shots_for(&self, num_idxs: usize) -> u32 {
        self.shots
            .unwrap_or_else(|| self.shots_policy.estimate(num_idxs))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

/// Per-scope memory limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Size of each index pool.
    #[serde(default = "default_max_num_index")]
    pub max_num_index: usize,

    #[serde(default = "default_stack_capacity")]
    pub stack_capacity: usize,
}

fn default_max_num_index() -> usize {
    20
}

fn default_stack_capacity() -> usize {
    DEFAULT_STACK_CAPACITY
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_num_index: default_max_num_index(),
            stack_capacity: default_stack_capacity(),
        }
    }
}

impl MemoryConfig {
    /// A fresh memory manager with these limits.
    pub fn memory_manager(&self) -> MemoryManager {
        MemoryManager::with_stack_capacity(self.max_num_index, self.stack_capacity)
    }
}

impl RuntimeConfig {
    pub fn from_yaml_str(contents: &str) -> ConfigResult<Self> {
        Ok(serde_yaml_ng::from_str(contents)?)
    }

    pub fn from_json_str(contents: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Load from a `.yaml`/`.yml` or `.json` file and validate.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&contents)?,
            Some("json") => Self::from_json_str(&contents)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };
        debug!("Loaded runtime config from {}", path.display());

        config.validate()?;
        Ok(config)
    }

    /// Load from an optional file, apply environment overrides and validate.
    pub fn load(config_file: Option<&Path>) -> ConfigResult<Self> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `HHAT_*` variables from the process environment.
    pub fn with_env_overrides(self) -> ConfigResult<Self> {
        self.with_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its
    /// value. Variables it does not know leave fields unchanged.
    pub fn with_overrides<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parsed(&lookup, "HHAT_SHOTS")? {
            self.execution.shots = Some(v);
        }
        if let Some(v) = parsed(&lookup, "HHAT_TIMEOUT_SECONDS")? {
            self.execution.timeout_seconds = Some(v);
        }
        if let Some(v) = parsed(&lookup, "HHAT_RESOLVER")? {
            self.resolver = v;
        }
        if let Some(v) = parsed(&lookup, "HHAT_MAX_NUM_INDEX")? {
            self.memory.max_num_index = v;
        }
        Ok(self)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.memory.max_num_index == 0 {
            return Err(ConfigError::Validation(
                "max_num_index must be greater than 0".to_string(),
            ));
        }
        if self.memory.stack_capacity == 0 {
            return Err(ConfigError::Validation(
                "stack_capacity must be greater than 0".to_string(),
            ));
        }
        if self.execution.shots == Some(0) {
            return Err(ConfigError::Validation(
                "shots must be greater than 0".to_string(),
            ));
        }
        if self.execution.timeout_seconds == Some(0) {
            return Err(ConfigError::Validation(
                "timeout_seconds must be greater than 0".to_string(),
            ));
        }
        if self.backend.max_qubits == 0 {
            return Err(ConfigError::Validation(format!(
                "backend '{}' has no qubits",
                self.backend.name
            )));
        }
        if !self.backend.supports(Paradigm::Digital) {
            return Err(ConfigError::Validation(format!(
                "backend '{}' does not support the digital paradigm",
                self.backend.name
            )));
        }
        if self.memory.max_num_index > self.backend.max_qubits as usize {
            warn!(
                "Index pool of {} exceeds backend '{}' capacity of {} qubits",
                self.memory.max_num_index, self.backend.name, self.backend.max_qubits
            );
        }
        Ok(())
    }
}

fn parsed<F, T>(lookup: &F, var: &str) -> ConfigResult<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let Some(value) = lookup(var) else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::InvalidEnv {
            var: var.to_string(),
            value,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hhat_hal::DeviceType;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.resolver, ResolverKind::Highest);
        assert_eq!(config.memory.max_num_index, 20);
        assert_eq!(config.execution.shots_for(2), 2_000);
        assert_eq!(config.execution.timeout(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_yaml() {
        let config = RuntimeConfig::from_yaml_str(
            r#"
backend:
  name: dev
  version: "1.0"
  max_qubits: 8
  device_type: emulator
  paradigms: [digital]
execution:
  shots: 512
  shots_policy:
    policy: fixed
    shots: 64
resolver: weighted_average
memory:
  max_num_index: 6
"#,
        )
        .unwrap();
        assert_eq!(config.backend.device_type, DeviceType::Emulator);
        assert_eq!(config.execution.shots_for(3), 512);
        assert_eq!(config.execution.timeout_seconds, Some(60));
        assert_eq!(config.resolver, ResolverKind::WeightedAverage);
        assert_eq!(config.memory.max_num_index, 6);
        assert_eq!(config.memory.stack_capacity, DEFAULT_STACK_CAPACITY);
    }

    #[test]
    fn test_partial_sections_use_defaults() {
        let config = RuntimeConfig::from_yaml_str("resolver: lowest\n").unwrap();
        assert_eq!(config.resolver, ResolverKind::Lowest);
        assert_eq!(config.backend, BackendInfo::default());
        assert_eq!(config.execution.shots_policy, ShotsPolicy::default());
    }

    #[test]
    fn test_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"execution": {{"shots": 100}}, "resolver": "raw"}}"#).unwrap();

        let config = RuntimeConfig::from_file(file.path()).unwrap();
        assert_eq!(config.execution.shots, Some(100));
        assert_eq!(config.resolver, ResolverKind::Raw);
    }

    #[test]
    fn test_file_errors() {
        assert!(matches!(
            RuntimeConfig::from_file("/nonexistent/hhat.yaml"),
            Err(ConfigError::Io { .. })
        ));

        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        assert!(matches!(
            RuntimeConfig::from_file(file.path()),
            Err(ConfigError::UnsupportedFormat(_))
        ));

        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(file, "memory: [1, 2").unwrap();
        assert!(matches!(
            RuntimeConfig::from_file(file.path()),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let env = |var: &str| match var {
            "HHAT_SHOTS" => Some("4096".to_string()),
            "HHAT_RESOLVER" => Some("lowest".to_string()),
            "HHAT_MAX_NUM_INDEX" => Some(" 4 ".to_string()),
            _ => None,
        };
        let config = RuntimeConfig::default().with_overrides(env).unwrap();
        assert_eq!(config.execution.shots, Some(4096));
        assert_eq!(config.execution.timeout_seconds, Some(60));
        assert_eq!(config.resolver, ResolverKind::Lowest);
        assert_eq!(config.memory.max_num_index, 4);
    }

    #[test]
    fn test_invalid_override() {
        let env = |var: &str| (var == "HHAT_RESOLVER").then(|| "median".to_string());
        let err = RuntimeConfig::default().with_overrides(env).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value 'median' for HHAT_RESOLVER");
    }

    #[test]
    fn test_validate() {
        let mut config = RuntimeConfig::default();
        config.memory.max_num_index = 0;
        assert!(config.validate().is_err());

        let mut config = RuntimeConfig::default();
        config.execution.shots = Some(0);
        assert!(config.validate().is_err());

        let mut config = RuntimeConfig::default();
        config.backend.paradigms = vec![Paradigm::Analog];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(msg)) if msg.contains("digital")
        ));
    }

    #[test]
    fn test_memory_manager() {
        let memory = MemoryConfig {
            max_num_index: 3,
            stack_capacity: 8,
        };
        let mem = memory.memory_manager();
        assert_eq!(mem.idx().max_number(), 3);
        assert_eq!(mem.stack().capacity(), 8);
    }
}
