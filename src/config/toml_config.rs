use crate::config::{
    validate_provider, Target, DEFAULT_CLASSES_FILE, DEFAULT_HOURS_FILE,
    DEFAULT_RETRY_DELAY_SECONDS, DEFAULT_TIMEOUT_SECONDS,
};
use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub scraper: Option<ScraperInfo>,
    pub source: SourceConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperInfo {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub target: Target,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub hours_url: String,
    pub classes_url: String,
    pub timeout_seconds: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub retry_delay_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    #[serde(default = "default_hours_filename")]
    pub hours_filename: String,
    #[serde(default = "default_classes_filename")]
    pub classes_filename: String,
    #[serde(default = "default_output_formats")]
    pub output_formats: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
    pub log_json: Option<bool>,
}

fn default_hours_filename() -> String {
    DEFAULT_HOURS_FILE.to_string()
}

fn default_classes_filename() -> String {
    DEFAULT_CLASSES_FILE.to_string()
}

fn default_output_formats() -> Vec<String> {
    vec!["json".to_string()]
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${REC_HOURS_URL})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn target(&self) -> Target {
        self.scraper.as_ref().map(|s| s.target).unwrap_or_default()
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().is_some_and(|m| m.enabled)
    }

    /// `debug` and `trace` log levels turn on verbose logging.
    pub fn verbose_logging(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_level.as_deref())
            .is_some_and(|level| {
                level.eq_ignore_ascii_case("debug") || level.eq_ignore_ascii_case("trace")
            })
    }

    pub fn log_json(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_json)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn hours_url(&self) -> &str {
        &self.source.hours_url
    }

    fn classes_url(&self) -> &str {
        &self.source.classes_url
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn hours_filename(&self) -> &str {
        &self.load.hours_filename
    }

    fn classes_filename(&self) -> &str {
        &self.load.classes_filename
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn timeout_seconds(&self) -> u64 {
        self.source.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    fn retry_attempts(&self) -> u32 {
        self.source.retry_attempts.unwrap_or(0)
    }

    fn retry_delay_seconds(&self) -> u64 {
        self.source
            .retry_delay_seconds
            .unwrap_or(DEFAULT_RETRY_DELAY_SECONDS)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self, self.target())
    }
}
