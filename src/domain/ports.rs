use crate::domain::model::{
    DepartmentPercentage, EmployeeRecord, MalformedPolicy, TransformResult,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_file(&self) -> &str;
    fn threshold(&self) -> f64;
    fn partitions(&self) -> usize;
    fn preview_rows(&self) -> usize;
    fn malformed_policy(&self) -> MalformedPolicy;
}

/// Produces the typed employee records of one run.
#[async_trait]
pub trait TableSource: Send + Sync {
    async fn read_records(&self) -> Result<Vec<EmployeeRecord>>;
}

/// Persists the complete result of one run in a single call.
///
/// Returns a human-readable location of what was written.
#[async_trait]
pub trait TableSink: Send + Sync {
    async fn write_rows(&self, rows: &[DepartmentPercentage]) -> Result<String>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<EmployeeRecord>>;
    async fn transform(&self, data: Vec<EmployeeRecord>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;

    fn threshold(&self) -> f64;
}
