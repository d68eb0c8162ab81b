//! Configuration management for nswatch
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{NswatchError, Result};
use crate::resources::ResourceKind;
use crate::watcher::FilterCriteria;

/// Main configuration structure for nswatch
///
/// Holds everything the watcher needs: the target namespace, which resource
/// kinds to subscribe, the filter criteria, and logging behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Namespace whose resources are observed
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Per-kind enable flags
    #[serde(default)]
    pub resources: ResourcesConfig,

    /// Resync interval in seconds, informational to the feed only;
    /// 0 disables periodic resync
    #[serde(default)]
    pub resync_interval_secs: u64,

    /// Name-prefix and label filter criteria
    #[serde(default)]
    pub filters: FilterConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_namespace() -> String {
    "default".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            resources: ResourcesConfig::default(),
            resync_interval_secs: 0,
            filters: FilterConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Per-kind watch enable flags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcesConfig {
    /// Watch pods
    #[serde(default = "default_enabled")]
    pub pods: bool,

    /// Watch jobs
    #[serde(default = "default_enabled")]
    pub jobs: bool,

    /// Watch services
    #[serde(default = "default_enabled")]
    pub services: bool,

    /// Watch secrets
    #[serde(default = "default_enabled")]
    pub secrets: bool,
}

fn default_enabled() -> bool {
    true
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            pods: true,
            jobs: true,
            services: true,
            secrets: true,
        }
    }
}

impl ResourcesConfig {
    /// The kinds whose flags are set, in a stable order.
    pub fn enabled_kinds(&self) -> Vec<ResourceKind> {
        let mut kinds = Vec::new();
        if self.pods {
            kinds.push(ResourceKind::Pod);
        }
        if self.jobs {
            kinds.push(ResourceKind::Job);
        }
        if self.services {
            kinds.push(ResourceKind::Service);
        }
        if self.secrets {
            kinds.push(ResourceKind::Secret);
        }
        kinds
    }
}

/// Filter criteria configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Name prefixes to match (if empty, every name matches)
    #[serde(default)]
    pub name_prefixes: Vec<String>,

    /// Labels that must all be present and equal (if empty, every label
    /// set matches)
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl FilterConfig {
    /// Builds the immutable criteria shared across dispatch.
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            name_prefixes: self.name_prefixes.clone(),
            required_labels: self.labels.clone(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Enable JSON-formatted logs
    #[serde(default = "default_json_logs")]
    pub json_format: bool,

    /// Log file path (if None, STDOUT only)
    pub file_path: Option<PathBuf>,
}

/// Default log level
fn default_log_level() -> String {
    "info".to_string()
}

/// Default JSON logs setting
fn default_json_logs() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: default_json_logs(),
            file_path: None,
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to YAML configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| NswatchError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| NswatchError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(namespace) = std::env::var("NSWATCH_NAMESPACE") {
            self.namespace = namespace;
        }

        if let Ok(prefixes) = std::env::var("NSWATCH_NAME_PREFIXES") {
            let prefixes_vec: Vec<String> = prefixes
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !prefixes_vec.is_empty() {
                self.filters.name_prefixes = prefixes_vec.clone();
                tracing::debug!(?prefixes_vec, "Env override: NSWATCH_NAME_PREFIXES");
            }
        }

        if let Ok(labels) = std::env::var("NSWATCH_LABELS") {
            let mut parsed = BTreeMap::new();
            for pair in labels.split(',').filter(|s| !s.trim().is_empty()) {
                match pair.split_once('=') {
                    Some((key, value)) => {
                        parsed.insert(key.trim().to_string(), value.trim().to_string());
                    }
                    None => {
                        tracing::warn!("Ignoring malformed label pair in NSWATCH_LABELS: {}", pair);
                    }
                }
            }
            if !parsed.is_empty() {
                self.filters.labels = parsed;
                tracing::debug!("Env override: NSWATCH_LABELS");
            }
        }

        if let Ok(resync) = std::env::var("NSWATCH_RESYNC_SECS") {
            match resync.parse::<u64>() {
                Ok(v) => {
                    self.resync_interval_secs = v;
                    tracing::debug!(resync_secs = v, "Env override: NSWATCH_RESYNC_SECS");
                }
                Err(_) => {
                    tracing::warn!("Invalid value for NSWATCH_RESYNC_SECS: {}", resync);
                }
            }
        }

        if let Ok(level) = std::env::var("NSWATCH_LOG_LEVEL") {
            self.logging.level = level.clone();
            tracing::debug!(level = %level, "Env override: NSWATCH_LOG_LEVEL");
        }

        if let Ok(json_logs) = std::env::var("NSWATCH_JSON_LOGS") {
            match json_logs.parse::<bool>() {
                Ok(v) => {
                    self.logging.json_format = v;
                    tracing::debug!(json_logs = v, "Env override: NSWATCH_JSON_LOGS");
                }
                Err(_) => {
                    tracing::warn!("Invalid value for NSWATCH_JSON_LOGS: {}", json_logs);
                }
            }
        }

        if let Ok(log_file) = std::env::var("NSWATCH_LOG_FILE") {
            self.logging.file_path = Some(PathBuf::from(log_file.clone()));
            tracing::debug!(log_file = %log_file, "Env override: NSWATCH_LOG_FILE");
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            self.logging.level = "debug".to_string();
        }
        if let Some(namespace) = cli.namespace() {
            self.namespace = namespace.to_string();
        }
    }

    /// Resync interval as a duration; informational to the feed only.
    pub fn resync_interval(&self) -> Duration {
        Duration::from_secs(self.resync_interval_secs)
    }

    /// Validate the configuration
    ///
    /// Ensures all configuration values are within acceptable ranges
    /// and that required fields are properly set.
    ///
    /// # Returns
    ///
    /// Returns Ok if configuration is valid
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.namespace.is_empty() {
            return Err(NswatchError::Config("namespace cannot be empty".to_string()).into());
        }

        if self.resources.enabled_kinds().is_empty() {
            return Err(NswatchError::Config(
                "at least one resource kind must be enabled".to_string(),
            )
            .into());
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(NswatchError::Config(format!(
                "Invalid log level: {}. Must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            ))
            .into());
        }

        if self
            .filters
            .name_prefixes
            .iter()
            .any(|prefix| prefix.is_empty())
        {
            return Err(
                NswatchError::Config("name prefixes cannot be empty strings".to_string()).into(),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        for var in [
            "NSWATCH_NAMESPACE",
            "NSWATCH_NAME_PREFIXES",
            "NSWATCH_LABELS",
            "NSWATCH_RESYNC_SECS",
            "NSWATCH_LOG_LEVEL",
            "NSWATCH_JSON_LOGS",
            "NSWATCH_LOG_FILE",
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_default_config_is_valid() {
        clear_env();
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.namespace, "default");
        assert_eq!(config.resync_interval_secs, 0);
        assert!(config.filters.name_prefixes.is_empty());
    }

    #[test]
    #[serial]
    fn test_load_missing_file_uses_defaults() {
        clear_env();
        let config = Config::load("/nonexistent/config.yaml", &Cli::default()).unwrap();
        assert_eq!(config.namespace, "default");
    }

    #[test]
    #[serial]
    fn test_load_from_file() {
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"
namespace: staging
resources:
  pods: true
  jobs: true
  services: false
  secrets: false
filters:
  name_prefixes: ["nginx"]
  labels:
    app: nginx
logging:
  level: debug
  json_format: false
"#,
        )
        .unwrap();

        let config = Config::load(file.path().to_str().unwrap(), &Cli::default()).unwrap();
        assert_eq!(config.namespace, "staging");
        assert_eq!(
            config.resources.enabled_kinds(),
            vec![ResourceKind::Pod, ResourceKind::Job]
        );
        assert_eq!(config.filters.name_prefixes, vec!["nginx".to_string()]);
        assert_eq!(
            config.filters.labels.get("app").map(String::as_str),
            Some("nginx")
        );
        assert_eq!(config.logging.level, "debug");
        assert!(!config.logging.json_format);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        std::env::set_var("NSWATCH_NAMESPACE", "prod");
        std::env::set_var("NSWATCH_NAME_PREFIXES", "nginx, redis");
        std::env::set_var("NSWATCH_LABELS", "app=nginx, tier=frontend");
        std::env::set_var("NSWATCH_RESYNC_SECS", "300");
        std::env::set_var("NSWATCH_LOG_LEVEL", "warn");

        let config = Config::load("/nonexistent/config.yaml", &Cli::default()).unwrap();
        clear_env();

        assert_eq!(config.namespace, "prod");
        assert_eq!(
            config.filters.name_prefixes,
            vec!["nginx".to_string(), "redis".to_string()]
        );
        assert_eq!(
            config.filters.labels.get("tier").map(String::as_str),
            Some("frontend")
        );
        assert_eq!(config.resync_interval_secs, 300);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    #[serial]
    fn test_malformed_label_pairs_are_skipped() {
        clear_env();
        std::env::set_var("NSWATCH_LABELS", "app=nginx,notapair");

        let config = Config::load("/nonexistent/config.yaml", &Cli::default()).unwrap();
        clear_env();

        assert_eq!(config.filters.labels.len(), 1);
        assert_eq!(
            config.filters.labels.get("app").map(String::as_str),
            Some("nginx")
        );
    }

    #[test]
    #[serial]
    fn test_verbose_cli_override() {
        clear_env();
        let cli = Cli {
            verbose: true,
            ..Cli::default()
        };
        let config = Config::load("/nonexistent/config.yaml", &cli).unwrap();
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_validate_rejects_empty_namespace() {
        let config = Config {
            namespace: String::new(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_no_enabled_kinds() {
        let config = Config {
            resources: ResourcesConfig {
                pods: false,
                jobs: false,
                services: false,
                secrets: false,
            },
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_prefix() {
        let mut config = Config::default();
        config.filters.name_prefixes = vec![String::new()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_enabled_kinds_order_is_stable() {
        let resources = ResourcesConfig::default();
        assert_eq!(
            resources.enabled_kinds(),
            vec![
                ResourceKind::Pod,
                ResourceKind::Job,
                ResourceKind::Service,
                ResourceKind::Secret
            ]
        );
    }

    #[test]
    fn test_filter_config_builds_criteria() {
        let filter_config = FilterConfig {
            name_prefixes: vec!["nginx".to_string()],
            labels: [("app".to_string(), "nginx".to_string())].into(),
        };
        let criteria = filter_config.criteria();
        assert_eq!(criteria.name_prefixes, vec!["nginx".to_string()]);
        assert_eq!(
            criteria.required_labels.get("app").map(String::as_str),
            Some("nginx")
        );
    }

    #[test]
    fn test_resync_interval_conversion() {
        let config = Config {
            resync_interval_secs: 600,
            ..Config::default()
        };
        assert_eq!(config.resync_interval(), Duration::from_secs(600));
    }
}
