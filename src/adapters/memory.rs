use crate::domain::model::{DepartmentPercentage, EmployeeRecord};
use crate::domain::ports::{TableSink, TableSource};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Source over records already in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<EmployeeRecord>,
}

impl MemorySource {
    pub fn new(records: Vec<EmployeeRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl TableSource for MemorySource {
    async fn read_records(&self) -> Result<Vec<EmployeeRecord>> {
        Ok(self.records.clone())
    }
}

/// Sink that keeps every batch it receives. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    batches: Arc<Mutex<Vec<Vec<DepartmentPercentage>>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows of the most recent write.
    pub async fn rows(&self) -> Option<Vec<DepartmentPercentage>> {
        self.batches.lock().await.last().cloned()
    }

    pub async fn write_count(&self) -> usize {
        self.batches.lock().await.len()
    }
}

#[async_trait]
impl TableSink for MemorySink {
    async fn write_rows(&self, rows: &[DepartmentPercentage]) -> Result<String> {
        let mut batches = self.batches.lock().await;
        batches.push(rows.to_vec());
        Ok(format!("memory://batch/{}", batches.len()))
    }
}
