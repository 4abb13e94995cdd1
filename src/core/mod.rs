pub mod aggregator;
pub mod classifier;
pub mod etl;
pub mod pipeline;
pub mod ratio_filter;

pub use crate::domain::model::{
    DepartmentAggregate, DepartmentPercentage, EmployeeRecord, TransformResult,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage, TableSink, TableSource};
pub use crate::utils::error::Result;
