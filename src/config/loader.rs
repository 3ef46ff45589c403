use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RoutingConfig {
    /// Never show the mode picker; every submission takes the default path.
    pub disabled: bool,
    /// Treat SSH and mobile terminals as constrained and skip the picker there.
    pub detect_limited_terminal: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            detect_limited_terminal: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BackendConfig {
    /// How long the simulated backend stays busy per prompt.
    pub task_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self { task_secs: 5 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    pub status_max_items: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            status_max_items: 5,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub routing: RoutingConfig,
    pub backend: BackendConfig,
    pub display: DisplayConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let path = config_path.unwrap_or_else(Self::default_config_path);

        let config = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Config::default()
        };

        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    pub fn default_config_path() -> PathBuf {
        if let Some(config_path) = std::env::var_os("STEERQ_CONFIG") {
            PathBuf::from(config_path)
        } else {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("steerq")
                .join("config.yaml")
        }
    }

    /// `STEERQ_DISABLE` wins over whatever the file says.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if lookup("STEERQ_DISABLE").is_some_and(|v| is_truthy(&v)) {
            self.routing.disabled = true;
        }
        self
    }

    pub fn with_task_secs(mut self, task_secs: Option<u64>) -> Self {
        if let Some(secs) = task_secs {
            self.backend.task_secs = secs;
        }
        self
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("steerq")
                .join("logs")
        })
    }
}

pub(crate) fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn config_default_values() {
        let config = Config::default();
        assert!(!config.routing.disabled);
        assert!(config.routing.detect_limited_terminal);
        assert_eq!(config.backend.task_secs, 5);
        assert_eq!(config.display.status_max_items, 5);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn config_loads_from_yaml_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let yaml = r#"
routing:
  disabled: true
  detect_limited_terminal: false
backend:
  task_secs: 12
display:
  status_max_items: 3
log_dir: "/tmp/steerq-logs"
"#;
        std::fs::write(&config_path, yaml).unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert!(config.routing.disabled);
        assert!(!config.routing.detect_limited_terminal);
        assert_eq!(config.backend.task_secs, 12);
        assert_eq!(config.display.status_max_items, 3);
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/steerq-logs"));
    }

    #[test]
    fn config_partial_yaml_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "backend:\n  task_secs: 2\n").unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.backend.task_secs, 2);
        assert!(config.routing.detect_limited_terminal);
        assert_eq!(config.display.status_max_items, 5);
    }

    #[test]
    fn config_load_returns_default_when_file_missing() {
        let config = Config::load(Some(PathBuf::from("/nonexistent/config.yaml"))).unwrap();
        assert_eq!(config.backend.task_secs, 5);
    }

    #[test]
    fn config_load_rejects_malformed_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "routing: [not, a, map").unwrap();

        let err = Config::load(Some(config_path)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn env_disable_overrides_file() {
        let config = Config::default().with_env_overrides(|key| {
            (key == "STEERQ_DISABLE").then(|| "TRUE".to_string())
        });
        assert!(config.routing.disabled);
    }

    #[test]
    fn env_disable_ignores_falsy_values() {
        let config = Config::default().with_env_overrides(|key| {
            (key == "STEERQ_DISABLE").then(|| "0".to_string())
        });
        assert!(!config.routing.disabled);
    }

    #[test]
    fn with_task_secs_only_overrides_when_given() {
        assert_eq!(Config::default().with_task_secs(None).backend.task_secs, 5);
        assert_eq!(Config::default().with_task_secs(Some(1)).backend.task_secs, 1);
    }

    #[test]
    fn config_serializes_to_yaml() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        assert!(yaml.contains("detect_limited_terminal: true"));
        assert!(yaml.contains("task_secs: 5"));
        assert!(!yaml.contains("log_dir"));
    }
}
