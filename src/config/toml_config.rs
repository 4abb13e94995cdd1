use crate::config::DEFAULT_OUTPUT_FILE;
use crate::core::ratio_filter::DEFAULT_THRESHOLD;
use crate::core::ConfigProvider;
use crate::domain::model::MalformedPolicy;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub path: String,
    #[serde(default)]
    pub malformed_policy: MalformedPolicy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub threshold: Option<f64>,
    pub partitions: Option<usize>,
    pub preview_rows: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static pattern is valid"))
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

    /// 替換環境變數 (例如 ${INPUT_DIR})；未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("pipeline.name", &self.pipeline.name)?;

        validation::validate_path("source.path", &self.source.path)?;
        validation::validate_file_extension("source.path", &self.source.path, &["csv"])?;

        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_file_extension("load.file_name", self.output_file(), &["csv"])?;

        validation::validate_range("analysis.threshold", self.threshold(), 0.0, 100.0)?;
        if let Some(partitions) = self.analysis.partitions {
            validation::validate_positive_number("analysis.partitions", partitions, 1)?;
        }

        Ok(())
    }

    pub fn output_file(&self) -> &str {
        self.load.file_name.as_deref().unwrap_or(DEFAULT_OUTPUT_FILE)
    }

    pub fn threshold(&self) -> f64 {
        self.analysis.threshold.unwrap_or(DEFAULT_THRESHOLD)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    /// Verbose logging requested through `monitoring.log_level = "debug"`.
    pub fn debug_logging(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_level.as_deref())
            .is_some_and(|level| level.eq_ignore_ascii_case("debug"))
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.source.path
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_file(&self) -> &str {
        TomlConfig::output_file(self)
    }

    fn threshold(&self) -> f64 {
        TomlConfig::threshold(self)
    }

    fn partitions(&self) -> usize {
        self.analysis.partitions.unwrap_or(1)
    }

    fn preview_rows(&self) -> usize {
        self.analysis.preview_rows.unwrap_or(10)
    }

    fn malformed_policy(&self) -> MalformedPolicy {
        self.source.malformed_policy
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[pipeline]
name = "engagement"
description = "Departments with highly engaged staff"
version = "1.0.0"

[source]
path = "input/employee_data.csv"
malformed_policy = "reject"

[analysis]
threshold = 50.0
partitions = 4

[load]
output_path = "./outputs"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.pipeline.name, "engagement");
        assert_eq!(config.input_path(), "input/employee_data.csv");
        assert_eq!(config.malformed_policy(), MalformedPolicy::Reject);
        assert_eq!(ConfigProvider::threshold(&config), 50.0);
        assert_eq!(config.partitions(), 4);
        assert_eq!(config.preview_rows(), 10);
        assert_eq!(ConfigProvider::output_file(&config), DEFAULT_OUTPUT_FILE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_analysis_section_is_optional() {
        let toml_content = r#"
[pipeline]
name = "defaults"

[source]
path = "employees.csv"

[load]
output_path = "./outputs"
file_name = "result.csv"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.threshold(), DEFAULT_THRESHOLD);
        assert_eq!(config.partitions(), 1);
        assert_eq!(config.malformed_policy(), MalformedPolicy::Null);
        assert_eq!(config.output_file(), "result.csv");
        assert!(!config.monitoring_enabled());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("ENGAGEMENT_TEST_INPUT_DIR", "/data/hr");

        let toml_content = r#"
[pipeline]
name = "env"

[source]
path = "${ENGAGEMENT_TEST_INPUT_DIR}/employees.csv"

[load]
output_path = "${ENGAGEMENT_TEST_UNSET_VAR}/out"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.source.path, "/data/hr/employees.csv");
        assert_eq!(config.load.output_path, "${ENGAGEMENT_TEST_UNSET_VAR}/out");

        std::env::remove_var("ENGAGEMENT_TEST_INPUT_DIR");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[pipeline]
name = "bad"

[source]
path = "employees.csv"

[analysis]
threshold = 120.0

[load]
output_path = "./outputs"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(EtlError::InvalidConfigValueError { ref field, .. }) if field == "analysis.threshold"
        ));
    }

    #[test]
    fn test_unknown_malformed_policy_fails_to_parse() {
        let toml_content = r#"
[pipeline]
name = "bad"

[source]
path = "employees.csv"
malformed_policy = "skip"

[load]
output_path = "./outputs"
"#;

        assert!(TomlConfig::from_toml_str(toml_content).is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[pipeline]
name = "file-test"

[source]
path = "employees.csv"

[load]
output_path = "./outputs"

[monitoring]
enabled = true
log_level = "debug"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.pipeline.name, "file-test");
        assert!(config.monitoring_enabled());
        assert!(config.debug_logging());
    }
}
