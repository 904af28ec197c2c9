use crate::config::{
    default_topics, validate_provider, DEFAULT_BASE_URL, DEFAULT_MAX_ITEMS,
    DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY_MS, DEFAULT_TIMEOUT_SECS,
};
use crate::core::{ConfigProvider, OutputFormat};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env reference regex"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingsTomlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_topics")]
    pub topics: Vec<String>,
    pub timeout_seconds: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub retry_delay_ms: Option<u64>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            topics: default_topics(),
            timeout_seconds: None,
            retry_attempts: None,
            retry_delay_ms: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractConfig {
    pub max_items: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    #[serde(default)]
    pub compress: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl RankingsTomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed)?)
    }

    /// 替換 `${VAR}`；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_REF
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for RankingsTomlConfig {
    fn base_url(&self) -> &str {
        &self.source.base_url
    }

    fn topics(&self) -> &[String] {
        &self.source.topics
    }

    fn max_items(&self) -> usize {
        self.extract.max_items.unwrap_or(DEFAULT_MAX_ITEMS)
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> Vec<OutputFormat> {
        self.load
            .output_formats
            .iter()
            .filter_map(|f| OutputFormat::parse(f))
            .collect()
    }

    fn compress(&self) -> bool {
        self.load.compress
    }

    fn timeout_secs(&self) -> u64 {
        self.source.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    fn retry_attempts(&self) -> u32 {
        self.source.retry_attempts.unwrap_or(DEFAULT_RETRY_ATTEMPTS)
    }

    fn retry_delay_ms(&self) -> u64 {
        self.source.retry_delay_ms.unwrap_or(DEFAULT_RETRY_DELAY_MS)
    }
}

impl Validate for RankingsTomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self, &self.load.output_formats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ToolkitError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let toml_content = r#"
[load]
output_path = "./out"
output_formats = ["csv"]
"#;

        let config = RankingsTomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.topics().len(), 5);
        assert_eq!(config.max_items(), 20);
        assert_eq!(config.retry_attempts(), DEFAULT_RETRY_ATTEMPTS);
        assert_eq!(config.output_formats(), vec![OutputFormat::Csv]);
        assert!(!config.compress());
        assert!(!config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_config() {
        let toml_content = r#"
[source]
base_url = "http://localhost:8080/rankings/"
topics = ["best-online-bootcamps"]
timeout_seconds = 5
retry_attempts = 0

[extract]
max_items = 10

[load]
output_path = "./out"
output_formats = ["json", "tsv"]
compress = true

[monitoring]
enabled = true
"#;

        let config = RankingsTomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(
            config.page_url("best-online-bootcamps"),
            "http://localhost:8080/rankings/best-online-bootcamps"
        );
        assert_eq!(config.max_items(), 10);
        assert_eq!(config.timeout_secs(), 5);
        assert_eq!(config.retry_attempts(), 0);
        assert_eq!(
            config.output_formats(),
            vec![OutputFormat::Json, OutputFormat::Tsv]
        );
        assert!(config.compress());
        assert!(config.monitoring_enabled());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PREWORK_TEST_OUTPUT_DIR", "/tmp/rankings-out");

        let toml_content = r#"
[load]
output_path = "${PREWORK_TEST_OUTPUT_DIR}"
output_formats = ["csv"]
"#;

        let config = RankingsTomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output_path(), "/tmp/rankings-out");

        std::env::remove_var("PREWORK_TEST_OUTPUT_DIR");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[source]
base_url = "not-a-url"

[load]
output_path = "./out"
output_formats = ["csv"]
"#;
        let config = RankingsTomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let toml_content = r#"
[source]
topics = []

[load]
output_path = "./out"
output_formats = ["csv"]
"#;
        let config = RankingsTomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let err = RankingsTomlConfig::from_toml_str("[load\noutput_path = 1").unwrap_err();
        assert!(matches!(err, ToolkitError::TomlError(_)));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[load]\noutput_path = \"./output\"\noutput_formats = [\"csv\", \"json\"]\n")
            .unwrap();

        let config = RankingsTomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output_path(), "./output");
        assert_eq!(config.output_formats().len(), 2);
    }
}
