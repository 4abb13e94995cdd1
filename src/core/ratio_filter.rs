use crate::domain::model::{DepartmentAggregate, DepartmentPercentage};

/// Threshold the tool has always applied: a share strictly above 5%.
pub const DEFAULT_THRESHOLD: f64 = 5.0;

/// Threshold stated by the business rule ("more than half of the department").
pub const BUSINESS_RULE_THRESHOLD: f64 = 50.0;

/// Rounds to two decimals, halves away from zero.
pub fn round_percentage(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Keeps departments whose share of qualifying employees is strictly above
/// `threshold`, sorted by department name.
///
/// The comparison uses the unrounded share; only the emitted value is rounded.
/// Aggregates with no employees are skipped.
pub fn filter(aggregates: &[DepartmentAggregate], threshold: f64) -> Vec<DepartmentPercentage> {
    let mut retained: Vec<DepartmentPercentage> = aggregates
        .iter()
        .filter_map(|aggregate| {
            let percentage = aggregate.percentage()?;
            (percentage > threshold).then(|| DepartmentPercentage {
                department: aggregate.department.clone(),
                percentage: round_percentage(percentage),
            })
        })
        .collect();

    retained.sort_by(|a, b| a.department.cmp(&b.department));
    retained
}
