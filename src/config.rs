//! Configuration for casefuse.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (CASEFUSE_ORACLE_MODEL, CASEFUSE_ORACLE_URL,
//!    CASEFUSE_OPENAI_API_KEY / OPENAI_API_KEY, CASEFUSE_CASE_TYPE)
//! 2. Config file (.casefuse/config.yaml)
//! 3. Defaults
//!
//! Config file discovery:
//! - Searches current directory and parents for .casefuse/config.yaml
//! - Falls back to ~/.casefuse/config.yaml

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::adapters::openai::{OpenAiConfig, OpenAiOracle};
use crate::adapters::Oracle;
use crate::core::{CaseLimits, DEFAULT_CASE_TYPE};

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

pub const DEFAULT_ORACLE_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ORACLE_URL: &str = "https://api.openai.com/v1";

/// Keys that mean "not configured"
const PLACEHOLDER_KEYS: &[&str] = &["your_openai_api_key_here"];

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub oracle: OracleConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OracleConfig {
    /// Set to false to never call the oracle, even with a key present
    pub enabled: Option<bool>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisConfig {
    pub case_type: Option<String>,
    pub max_records: Option<usize>,
    pub max_text_bytes: Option<usize>,
}

/// Resolved oracle settings
#[derive(Debug, Clone, Serialize)]
pub struct OracleSettings {
    pub enabled: bool,
    pub model: String,
    pub base_url: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl OracleSettings {
    /// True when the oracle is enabled and a real key is present
    pub fn is_available(&self) -> bool {
        self.enabled
            && self
                .api_key
                .as_deref()
                .is_some_and(|key| !key.trim().is_empty() && !PLACEHOLDER_KEYS.contains(&key))
    }
}

/// Resolved configuration
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    pub oracle: OracleSettings,
    /// Case type used when the CLI is given none
    pub case_type: String,
    pub limits: CaseLimits,
}

impl ResolvedConfig {
    /// The configured oracle, or `None` when it is disabled or has no key
    pub fn oracle(&self) -> Option<Arc<dyn Oracle>> {
        if !self.oracle.is_available() {
            return None;
        }
        let api_key = self.oracle.api_key.clone()?;
        Some(Arc::new(OpenAiOracle::from_config(OpenAiConfig {
            base_url: self.oracle.base_url.clone(),
            api_key,
            model: self.oracle.model.clone(),
        })))
    }
}

/// Find config file by searching current directory and parents, then home
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok();

    while let Some(dir) = current {
        let config_path = dir.join(".casefuse").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent().map(Path::to_path_buf);
    }

    dirs::home_dir()
        .map(|home| home.join(".casefuse").join("config.yaml"))
        .filter(|path| path.exists())
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Merge file settings with environment overrides
fn resolve(
    file: ConfigFile,
    config_file: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    let non_empty = |name: &str| env(name).filter(|v| !v.trim().is_empty());

    let oracle = OracleSettings {
        enabled: file.oracle.enabled.unwrap_or(true),
        model: non_empty("CASEFUSE_ORACLE_MODEL")
            .or(file.oracle.model)
            .unwrap_or_else(|| DEFAULT_ORACLE_MODEL.to_string()),
        base_url: non_empty("CASEFUSE_ORACLE_URL")
            .or(file.oracle.base_url)
            .unwrap_or_else(|| DEFAULT_ORACLE_URL.to_string()),
        api_key: non_empty("CASEFUSE_OPENAI_API_KEY")
            .or_else(|| non_empty("OPENAI_API_KEY"))
            .or(file.oracle.api_key),
    };

    let defaults = CaseLimits::default();
    let limits = CaseLimits {
        max_records: file.analysis.max_records.unwrap_or(defaults.max_records),
        max_text_bytes: file.analysis.max_text_bytes.unwrap_or(defaults.max_text_bytes),
    };

    ResolvedConfig {
        config_file,
        oracle,
        case_type: non_empty("CASEFUSE_CASE_TYPE")
            .or(file.analysis.case_type)
            .unwrap_or_else(|| DEFAULT_CASE_TYPE.to_string()),
        limits,
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let config_file = find_config_file();
    let file = match &config_file {
        Some(path) => load_config_file(path)?,
        None => ConfigFile::default(),
    };
    Ok(resolve(file, config_file, |name| std::env::var(name).ok()))
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::TempDir;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let config = resolve(ConfigFile::default(), None, env_of(&[]));
        assert_eq!(config.oracle.model, DEFAULT_ORACLE_MODEL);
        assert_eq!(config.oracle.base_url, DEFAULT_ORACLE_URL);
        assert_eq!(config.case_type, "general");
        assert_eq!(config.limits, CaseLimits::default());
        assert!(!config.oracle.is_available());
        assert!(config.oracle().is_none());
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".casefuse");
        std::fs::create_dir_all(&dir).unwrap();

        let config_path = dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
version: "1.0"
oracle:
  model: gpt-4o
  api_key: sk-from-file
analysis:
  case_type: robbery
  max_records: 20
"#
        )
        .unwrap();

        let parsed = load_config_file(&config_path).unwrap();
        assert_eq!(parsed.version.as_deref(), Some("1.0"));

        let config = resolve(parsed, Some(config_path), env_of(&[]));
        assert_eq!(config.oracle.model, "gpt-4o");
        assert_eq!(config.case_type, "robbery");
        assert_eq!(config.limits.max_records, 20);
        assert!(config.oracle.is_available());
    }

    #[test]
    fn test_env_overrides_file() {
        let file: ConfigFile = serde_yaml::from_str(
            "oracle:\n  model: gpt-4o\n  api_key: sk-file\nanalysis:\n  case_type: robbery\n",
        )
        .unwrap();
        let config = resolve(
            file,
            None,
            env_of(&[
                ("CASEFUSE_ORACLE_MODEL", "local-model"),
                ("OPENAI_API_KEY", "sk-env"),
                ("CASEFUSE_CASE_TYPE", "assault"),
            ]),
        );
        assert_eq!(config.oracle.model, "local-model");
        assert_eq!(config.oracle.api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.case_type, "assault");
    }

    #[test]
    fn test_placeholder_key_and_disabled_oracle() {
        let config = resolve(
            ConfigFile::default(),
            None,
            env_of(&[("OPENAI_API_KEY", "your_openai_api_key_here")]),
        );
        assert!(!config.oracle.is_available());

        let file: ConfigFile =
            serde_yaml::from_str("oracle:\n  enabled: false\n  api_key: sk-real\n").unwrap();
        let config = resolve(file, None, env_of(&[]));
        assert!(config.oracle().is_none());
    }

    #[test]
    fn test_api_key_not_serialized() {
        let config = resolve(ConfigFile::default(), None, env_of(&[("OPENAI_API_KEY", "sk-secret")]));
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(!yaml.contains("sk-secret"));
    }
}
