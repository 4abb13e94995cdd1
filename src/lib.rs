pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{CsvTableSink, CsvTableSource, LocalStorage, MemorySink, MemorySource};
pub use crate::core::{
    etl::{EtlEngine, RunSummary},
    pipeline::{run, EngagementPipeline, PipelineSettings},
};
pub use domain::model::{DepartmentAggregate, DepartmentPercentage, EmployeeRecord, MalformedPolicy};
pub use utils::error::{EtlError, Result};
