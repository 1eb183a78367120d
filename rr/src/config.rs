//! Rescheduler configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::llm::LlmError;
use crate::rules::{RuleKind, RuleVariant};
use crate::time::Clock;

/// Main rescheduler configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Check the returned schedule locally before emitting it
    pub strict: bool,

    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Working-day bounds
    pub schedule: ScheduleConfig,

    /// Which placement rules are sent to the reasoning service
    pub rules: RulesConfig,

    /// Prompt template lookup
    pub prompts: PromptsConfig,

    /// Diagnostics that never affect the outcome of a run
    pub debug: DebugConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Project-local .rescheduler.yml, then ~/.config/rescheduler/rescheduler.yml
        for path in Self::fallback_paths() {
            match Self::load_from_file(&path) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only `log-level`, before logging is up and before the full load
    ///
    /// Follows the same chain as [`Config::load`] and never fails: a file that
    /// cannot be read or parsed is skipped, so that [`Config::load`] can report
    /// it once logging is installed.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let paths = match config_path {
            Some(path) => vec![path.clone()],
            None => Self::fallback_paths(),
        };

        paths.iter().find_map(|path| {
            let content = fs::read_to_string(path).ok()?;
            let value: serde_yaml::Value = serde_yaml::from_str(&content).ok()?;
            Some(value.get("log-level").and_then(|v| v.as_str()).map(str::to_string))
        })?
    }

    /// Config files consulted when no explicit path is given, in order
    fn fallback_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".rescheduler.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("rescheduler").join("rescheduler.yml"));
        }
        paths.retain(|path| path.exists());
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name ("openai" or "anthropic")
    pub provider: String,

    /// Model identifier; defaults per provider
    pub model: Option<String>,

    /// Environment variable containing the API key; defaults per provider
    #[serde(rename = "api-key-env")]
    pub api_key_env: Option<String>,

    /// API base URL; defaults per provider
    #[serde(rename = "base-url")]
    pub base_url: Option<String>,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds; unset leaves the transport default
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: None,
            api_key_env: None,
            base_url: None,
            max_tokens: 4096,
            timeout_ms: None,
        }
    }
}

impl LlmConfig {
    /// Model for the configured provider
    pub fn model(&self) -> String {
        match &self.model {
            Some(model) => model.clone(),
            None if self.provider == "anthropic" => "claude-sonnet-4-20250514".to_string(),
            None => "gpt-4o-mini".to_string(),
        }
    }

    /// Environment variable holding the key for the configured provider
    pub fn api_key_env(&self) -> String {
        match &self.api_key_env {
            Some(var) => var.clone(),
            None if self.provider == "anthropic" => "ANTHROPIC_API_KEY".to_string(),
            None => "OPENAI_API_KEY".to_string(),
        }
    }

    /// API base URL for the configured provider
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None if self.provider == "anthropic" => "https://api.anthropic.com".to_string(),
            None => "https://api.openai.com".to_string(),
        }
    }

    /// Read the API key from the configured environment variable
    ///
    /// Called lazily at request time so that a missing key only fails the
    /// first actual call.
    pub fn get_api_key(&self) -> Result<String, LlmError> {
        let var = self.api_key_env();
        match std::env::var(&var) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(LlmError::MissingApiKey(var)),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Working-day bounds used by the window rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Earliest time any task may start
    #[serde(rename = "day-start")]
    pub day_start: Clock,

    /// Latest time any task may end when the day-window rule is active
    #[serde(rename = "day-end")]
    pub day_end: Clock,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            day_start: Clock::DAY_START,
            day_end: Clock::DAY_END,
        }
    }
}

/// Rule selection: a preset variant plus individual toggles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Preset rule variant
    pub variant: RuleVariant,

    /// Rules added on top of the variant
    pub enable: Vec<RuleKind>,

    /// Rules removed from the variant
    pub disable: Vec<RuleKind>,
}

/// Prompt template lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// Directory searched for `{name}.pmt` overrides before the embedded templates
    pub dir: PathBuf,
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".rescheduler/prompts"),
        }
    }
}

/// Diagnostic side channels
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// File that receives the current-time string of each run
    #[serde(rename = "current-time-file")]
    pub current_time_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.llm.provider, "openai");
        assert!(!config.strict);
        assert_eq!(config.rules.variant, RuleVariant::CurrentMood);
        assert_eq!(config.schedule.day_start.to_string(), "09:00");
        assert_eq!(config.schedule.day_end.to_string(), "18:00");
        assert!(config.debug.current_time_file.is_none());
    }

    #[test]
    fn test_llm_config_defaults() {
        let config = LlmConfig::default();

        assert_eq!(config.provider, "openai");
        assert_eq!(config.api_key_env(), "OPENAI_API_KEY");
        assert_eq!(config.base_url(), "https://api.openai.com");
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
log-level: DEBUG
strict: true

llm:
  provider: anthropic
  model: claude-sonnet-4
  api-key-env: MY_API_KEY
  base-url: https://api.example.com
  max-tokens: 2048
  timeout-ms: 60000

schedule:
  day-start: "08:30"
  day-end: "17:00"

rules:
  variant: blocked
  enable: [keep-locked]
  disable: [breaks]

debug:
  current-time-file: /tmp/rr-now.txt
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.log_level.as_deref(), Some("DEBUG"));
        assert!(config.strict);
        assert_eq!(config.llm.provider, "anthropic");
        assert_eq!(config.llm.api_key_env(), "MY_API_KEY");
        assert_eq!(config.llm.base_url(), "https://api.example.com");
        assert_eq!(config.llm.max_tokens, 2048);
        assert_eq!(config.llm.timeout(), Some(Duration::from_secs(60)));
        assert_eq!(config.schedule.day_start.to_string(), "08:30");
        assert_eq!(config.rules.variant, RuleVariant::Blocked);
        assert_eq!(config.rules.enable, vec![RuleKind::KeepLocked]);
        assert_eq!(config.rules.disable, vec![RuleKind::Breaks]);
        assert_eq!(
            config.debug.current_time_file,
            Some(PathBuf::from("/tmp/rr-now.txt"))
        );
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
llm:
  model: gpt-4o
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        // Specified value
        assert_eq!(config.llm.model(), "gpt-4o");

        // Defaults for unspecified
        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.llm.api_key_env(), "OPENAI_API_KEY");
        assert_eq!(config.rules.variant, RuleVariant::CurrentMood);
    }

    #[test]
    fn test_bad_clock_in_config_is_rejected() {
        let yaml = r#"
schedule:
  day-start: "9am"
"#;
        assert!(serde_yaml::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_provider_defaults_follow_provider() {
        let config = LlmConfig {
            provider: "anthropic".to_string(),
            ..Default::default()
        };
        assert_eq!(config.api_key_env(), "ANTHROPIC_API_KEY");
        assert_eq!(config.base_url(), "https://api.anthropic.com");
    }

    #[test]
    fn test_missing_api_key_is_reported_lazily() {
        let config = LlmConfig {
            api_key_env: Some("RR_TEST_KEY_THAT_IS_NEVER_SET".to_string()),
            ..Default::default()
        };
        let err = config.get_api_key().unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey(ref var) if var == "RR_TEST_KEY_THAT_IS_NEVER_SET"));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rr.yml");
        fs::write(&path, "strict: true\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert!(config.strict);

        let missing = dir.path().join("missing.yml");
        assert!(Config::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_load_log_level_reads_only_that_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rr.yml");

        // Rest of the file is invalid for the full load
        fs::write(&path, "log-level: DEBUG\nschedule:\n  day-start: nine\n").unwrap();
        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("DEBUG"));
        assert!(Config::load(Some(&path)).is_err());

        fs::write(&path, "strict: true\n").unwrap();
        assert!(Config::load_log_level(Some(&path)).is_none());

        fs::write(&path, "log-level: [unclosed\n").unwrap();
        assert!(Config::load_log_level(Some(&path)).is_none());

        let missing = dir.path().join("missing.yml");
        assert!(Config::load_log_level(Some(&missing)).is_none());
    }
}
