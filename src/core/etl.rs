use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// What one engine run did.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub records_read: usize,
    pub departments_seen: usize,
    pub departments_retained: usize,
    pub threshold: f64,
    pub output_location: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        let started_at = Utc::now();
        tracing::info!("Starting ETL process...");
        self.monitor.log_stats("Start");

        // Extract
        tracing::info!("Extracting employee records...");
        let records = self.pipeline.extract().await?;
        tracing::info!("Extracted {} records", records.len());
        self.monitor.log_stats("Extract");

        // Transform
        tracing::info!("Aggregating departments...");
        let result = self.pipeline.transform(records).await?;
        tracing::info!(
            "Retained {} of {} departments (threshold {}%)",
            result.rows.len(),
            result.aggregates.len(),
            self.pipeline.threshold()
        );
        self.monitor.log_stats("Transform");

        let records_read = result.records_read;
        let departments_seen = result.aggregates.len();
        let departments_retained = result.rows.len();

        // Load
        tracing::info!("Writing results...");
        let output_location = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_location);
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(RunSummary {
            records_read,
            departments_seen,
            departments_retained,
            threshold: self.pipeline.threshold(),
            output_location,
            started_at,
            finished_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MemorySink, MemorySource};
    use crate::core::pipeline::{EngagementPipeline, PipelineSettings};
    use crate::domain::model::EmployeeRecord;

    #[test]
    fn test_engine_reports_counts() {
        let records = vec![
            EmployeeRecord::new("Eng", Some(5), Some("High")),
            EmployeeRecord::new("Eng", Some(1), Some("Low")),
            EmployeeRecord::new("HR", Some(2), Some("Low")),
        ];
        let sink = MemorySink::new();
        let pipeline = EngagementPipeline::new(
            MemorySource::new(records),
            sink.clone(),
            PipelineSettings::default(),
        );
        let engine = EtlEngine::new(pipeline);

        let summary = tokio_test::block_on(engine.run()).unwrap();

        assert_eq!(summary.records_read, 3);
        assert_eq!(summary.departments_seen, 2);
        assert_eq!(summary.departments_retained, 1);
        assert_eq!(summary.threshold, 5.0);
        assert_eq!(summary.output_location, "memory://batch/1");
        assert!(summary.finished_at >= summary.started_at);
        assert_eq!(tokio_test::block_on(sink.write_count()), 1);

        let json: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(json["departments_retained"], 1);
        assert_eq!(json["output_location"], "memory://batch/1");
    }
}
