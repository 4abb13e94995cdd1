use serde::{Deserialize, Serialize};

/// Column names of the employee survey table, in file order.
pub mod columns {
    pub const EMPLOYEE_ID: &str = "EmployeeID";
    pub const DEPARTMENT: &str = "Department";
    pub const JOB_TITLE: &str = "JobTitle";
    pub const SATISFACTION_RATING: &str = "SatisfactionRating";
    pub const ENGAGEMENT_LEVEL: &str = "EngagementLevel";
    pub const REPORTS_CONCERNS: &str = "ReportsConcerns";
    pub const PROVIDED_SUGGESTIONS: &str = "ProvidedSuggestions";

    pub const ALL: [&str; 7] = [
        EMPLOYEE_ID,
        DEPARTMENT,
        JOB_TITLE,
        SATISFACTION_RATING,
        ENGAGEMENT_LEVEL,
        REPORTS_CONCERNS,
        PROVIDED_SUGGESTIONS,
    ];

    pub const OUTPUT_DEPARTMENT: &str = "Department";
    pub const OUTPUT_PERCENTAGE: &str = "Percentage";
}

/// One survey row. Every column except the department may be null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    #[serde(rename = "EmployeeID")]
    pub employee_id: Option<i64>,
    #[serde(rename = "Department")]
    pub department: String,
    #[serde(rename = "JobTitle")]
    pub job_title: Option<String>,
    #[serde(rename = "SatisfactionRating")]
    pub satisfaction_rating: Option<i32>,
    #[serde(rename = "EngagementLevel")]
    pub engagement_level: Option<String>,
    #[serde(rename = "ReportsConcerns")]
    pub reports_concerns: Option<bool>,
    #[serde(rename = "ProvidedSuggestions")]
    pub provided_suggestions: Option<bool>,
}

impl EmployeeRecord {
    /// Record with only the columns the analysis reads; the rest are null.
    pub fn new(
        department: impl Into<String>,
        satisfaction_rating: Option<i32>,
        engagement_level: Option<&str>,
    ) -> Self {
        Self {
            employee_id: None,
            department: department.into(),
            job_title: None,
            satisfaction_rating,
            engagement_level: engagement_level.map(str::to_string),
            reports_concerns: None,
            provided_suggestions: None,
        }
    }

    pub fn with_employee_id(mut self, employee_id: i64) -> Self {
        self.employee_id = Some(employee_id);
        self
    }
}

/// What the CSV reader does with a cell that does not parse as its column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Treat the cell as null and keep the row.
    #[default]
    Null,
    /// Fail the read with the offending row and column.
    Reject,
}

impl std::str::FromStr for MalformedPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "null" => Ok(MalformedPolicy::Null),
            "reject" => Ok(MalformedPolicy::Reject),
            other => Err(format!("unknown malformed policy '{}', expected 'null' or 'reject'", other)),
        }
    }
}

/// Result of the transform step, handed to the load step as a whole.
#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub records_read: usize,
    pub aggregates: Vec<DepartmentAggregate>,
    pub rows: Vec<DepartmentPercentage>,
}

/// Per-department counts produced by one aggregation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentAggregate {
    pub department: String,
    pub total_employees: u64,
    pub qualifying_count: u64,
}

impl DepartmentAggregate {
    /// Unrounded share of qualifying employees, `None` when the department is empty.
    pub fn percentage(&self) -> Option<f64> {
        if self.total_employees == 0 {
            return None;
        }
        Some(self.qualifying_count as f64 / self.total_employees as f64 * 100.0)
    }
}

/// Output row, serialized as `Department,Percentage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentPercentage {
    #[serde(rename = "Department")]
    pub department: String,
    #[serde(rename = "Percentage")]
    pub percentage: f64,
}
