use crate::core::aggregator::{aggregate, partition, DepartmentCounts};
use crate::core::classifier::qualifies;
use crate::core::ratio_filter::{self, DEFAULT_THRESHOLD};
use crate::domain::model::{DepartmentPercentage, EmployeeRecord, TransformResult};
use crate::domain::ports::{ConfigProvider, Pipeline, TableSink, TableSource};
use crate::utils::error::Result;
use std::sync::Arc;

/// Tuning knobs of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    /// Departments must have a qualifying share strictly above this percentage.
    pub threshold: f64,
    /// Number of slices counted in parallel; 1 counts sequentially.
    pub partitions: usize,
    /// How many rows to show in debug previews; 0 disables them.
    pub preview_rows: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            partitions: 1,
            preview_rows: 10,
        }
    }
}

impl PipelineSettings {
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self {
            threshold: config.threshold(),
            partitions: config.partitions(),
            preview_rows: config.preview_rows(),
        }
    }
}

/// Finds departments with a high share of satisfied, highly engaged employees.
pub struct EngagementPipeline<Src: TableSource, Snk: TableSink> {
    source: Src,
    sink: Snk,
    settings: PipelineSettings,
}

impl<Src: TableSource, Snk: TableSink> EngagementPipeline<Src, Snk> {
    pub fn new(source: Src, sink: Snk, settings: PipelineSettings) -> Self {
        Self {
            source,
            sink,
            settings,
        }
    }

    async fn count(&self, records: Vec<EmployeeRecord>) -> Result<DepartmentCounts> {
        let partitions = self.settings.partitions;
        if partitions <= 1 || records.len() < 2 {
            return Ok(aggregate(&records));
        }

        let records = Arc::new(records);
        let mut ranges = Vec::new();
        let mut start = 0;
        for chunk in partition(&records, partitions) {
            ranges.push(start..start + chunk.len());
            start += chunk.len();
        }

        tracing::debug!(
            "Counting {} records in {} partitions",
            records.len(),
            ranges.len()
        );

        let handles: Vec<_> = ranges
            .into_iter()
            .map(|range| {
                let records = Arc::clone(&records);
                tokio::task::spawn_blocking(move || aggregate(&records[range]))
            })
            .collect();

        let mut counts = DepartmentCounts::new();
        for handle in handles {
            counts.merge(handle.await?);
        }
        Ok(counts)
    }

    fn preview_records(&self, records: &[EmployeeRecord]) {
        let limit = self.settings.preview_rows;
        if limit == 0 || !tracing::enabled!(tracing::Level::DEBUG) {
            return;
        }

        for record in records.iter().take(limit) {
            tracing::debug!("  loaded: {:?}", record);
        }
        for record in records.iter().filter(|r| qualifies(r)).take(limit) {
            tracing::debug!("  qualifying: {:?}", record);
        }
    }

    fn preview_aggregates(&self, result: &TransformResult) {
        let limit = self.settings.preview_rows;
        if limit == 0 {
            return;
        }

        for aggregate in result.aggregates.iter().take(limit) {
            tracing::debug!(
                "  {}: total={}, qualifying={}, percentage={:?}",
                aggregate.department,
                aggregate.total_employees,
                aggregate.qualifying_count,
                aggregate.percentage()
            );
        }
    }
}

#[async_trait::async_trait]
impl<Src: TableSource, Snk: TableSink> Pipeline for EngagementPipeline<Src, Snk> {
    async fn extract(&self) -> Result<Vec<EmployeeRecord>> {
        let records = self.source.read_records().await?;
        self.preview_records(&records);
        Ok(records)
    }

    async fn transform(&self, data: Vec<EmployeeRecord>) -> Result<TransformResult> {
        let records_read = data.len();
        let mut aggregates = self.count(data).await?.into_aggregates();
        aggregates.sort_by(|a, b| a.department.cmp(&b.department));

        let rows = ratio_filter::filter(&aggregates, self.settings.threshold);
        let result = TransformResult {
            records_read,
            aggregates,
            rows,
        };
        self.preview_aggregates(&result);

        tracing::debug!(
            "{} of {} departments above {}%",
            result.rows.len(),
            result.aggregates.len(),
            self.settings.threshold
        );
        Ok(result)
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        self.sink.write_rows(&result.rows).await
    }

    fn threshold(&self) -> f64 {
        self.settings.threshold
    }
}

/// Reads every record from `source`, keeps departments above `threshold` and
/// writes them to `sink` in one call. Returns the rows written.
pub async fn run<Src: TableSource, Snk: TableSink>(
    source: Src,
    sink: Snk,
    threshold: f64,
) -> Result<Vec<DepartmentPercentage>> {
    let pipeline = EngagementPipeline::new(source, sink, PipelineSettings::with_threshold(threshold));

    let records = pipeline.extract().await?;
    let result = pipeline.transform(records).await?;
    let rows = result.rows.clone();
    pipeline.load(result).await?;

    Ok(rows)
}
