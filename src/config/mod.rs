#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

/// Default name of the result file inside the output directory.
pub const DEFAULT_OUTPUT_FILE: &str = "departments_high_satisfaction.csv";
