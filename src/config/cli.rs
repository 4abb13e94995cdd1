use crate::config::DEFAULT_OUTPUT_FILE;
use crate::core::ConfigProvider;
use crate::domain::model::MalformedPolicy;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extension, validate_path, validate_positive_number, validate_range, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "engagement-etl")]
#[command(about = "Find departments with a high share of satisfied, highly engaged employees")]
pub struct CliConfig {
    /// Employee survey CSV with a header row
    #[arg(long, default_value = "input/employee_data.csv")]
    pub input: String,

    /// Directory the result file is written to
    #[arg(long, default_value = "./outputs")]
    pub output_path: String,

    #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output_file: String,

    /// Minimum qualifying percentage a department must strictly exceed
    #[arg(long, default_value_t = 5.0)]
    pub threshold: f64,

    /// Count the input in this many parallel slices
    #[arg(long, default_value_t = 1)]
    pub partitions: usize,

    /// Rows shown in debug previews (0 disables)
    #[arg(long, default_value_t = 10)]
    pub preview_rows: usize,

    /// How to treat cells that do not parse: null or reject
    #[arg(long, default_value = "null")]
    pub malformed: MalformedPolicy,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Print the run summary as JSON")]
    pub summary_json: bool,
}

impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_file(&self) -> &str {
        &self.output_file
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }

    fn partitions(&self) -> usize {
        self.partitions
    }

    fn preview_rows(&self) -> usize {
        self.preview_rows
    }

    fn malformed_policy(&self) -> MalformedPolicy {
        self.malformed
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input", &self.input)?;
        validate_file_extension("input", &self.input, &["csv"])?;
        validate_path("output_path", &self.output_path)?;
        validate_file_extension("output_file", &self.output_file, &["csv"])?;
        validate_range("threshold", self.threshold, 0.0, 100.0)?;
        validate_positive_number("partitions", self.partitions, 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::parse_from(["engagement-etl"]);

        assert_eq!(config.threshold, 5.0);
        assert_eq!(config.partitions, 1);
        assert_eq!(config.output_file, DEFAULT_OUTPUT_FILE);
        assert_eq!(config.malformed, MalformedPolicy::Null);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = CliConfig::parse_from([
            "engagement-etl",
            "--input",
            "data/survey.csv",
            "--threshold",
            "50",
            "--partitions",
            "4",
            "--malformed",
            "reject",
        ]);

        assert_eq!(config.input_path(), "data/survey.csv");
        assert_eq!(config.threshold(), 50.0);
        assert_eq!(config.partitions(), 4);
        assert_eq!(config.malformed_policy(), MalformedPolicy::Reject);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = CliConfig::parse_from(["engagement-etl"]);
        config.threshold = 150.0;
        assert!(config.validate().is_err());

        let mut config = CliConfig::parse_from(["engagement-etl"]);
        config.partitions = 0;
        assert!(config.validate().is_err());

        let mut config = CliConfig::parse_from(["engagement-etl"]);
        config.input = "employees.json".to_string();
        assert!(config.validate().is_err());
    }
}
