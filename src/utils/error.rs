use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Malformed record at row {row}: column '{column}' has invalid value '{value}'")]
    MalformedRecordError {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Input is missing required column '{column}'")]
    MissingColumnError { column: String },

    #[error("Aggregation worker failed: {0}")]
    WorkerError(#[from] tokio::task::JoinError),

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Output,
    Configuration,
    Processing,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::CsvError(_)
            | EtlError::MalformedRecordError { .. }
            | EtlError::MissingColumnError { .. } => ErrorCategory::Input,
            EtlError::IoError(_) | EtlError::SerializationError(_) => ErrorCategory::Output,
            EtlError::ConfigValidationError { .. } | EtlError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            EtlError::ProcessingError { .. } => ErrorCategory::Processing,
            EtlError::WorkerError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // IO failures are usually transient (locked file, full disk) and worth a rerun.
            EtlError::IoError(_) => ErrorSeverity::Medium,
            EtlError::WorkerError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::CsvError(_) => {
                "Check that the input is a comma-separated file with a header row".to_string()
            }
            EtlError::IoError(_) => {
                "Check that the input file exists and the output directory is writable".to_string()
            }
            EtlError::SerializationError(_) => "Re-run without --summary-json".to_string(),
            EtlError::ConfigValidationError { .. } | EtlError::InvalidConfigValueError { .. } => {
                "Fix the configuration value and run again".to_string()
            }
            EtlError::MalformedRecordError { row, .. } => format!(
                "Fix row {} of the input, or use the 'null' malformed policy to treat bad cells as empty",
                row
            ),
            EtlError::MissingColumnError { column } => {
                format!("Add a '{}' column to the input header", column)
            }
            EtlError::WorkerError(_) => "Re-run with --partitions 1".to_string(),
            EtlError::ProcessingError { .. } => "Inspect the input data".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Could not read the employee data: {}", self),
            ErrorCategory::Output => format!("Could not write the results: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Processing => format!("Processing failed: {}", self),
            ErrorCategory::System => format!("Internal failure: {}", self),
        }
    }

    /// Process exit code used by the binaries.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
