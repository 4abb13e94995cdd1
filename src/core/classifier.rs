use crate::domain::model::EmployeeRecord;

/// Ratings strictly above this count as high satisfaction.
pub const SATISFACTION_FLOOR: i32 = 4;

/// Engagement level that counts as high; matched case-sensitively.
pub const HIGH_ENGAGEMENT: &str = "High";

/// True when the employee is both highly satisfied and highly engaged.
///
/// A null rating or engagement level never qualifies.
pub fn qualifies(record: &EmployeeRecord) -> bool {
    let satisfied = record
        .satisfaction_rating
        .is_some_and(|rating| rating > SATISFACTION_FLOOR);
    let engaged = record.engagement_level.as_deref() == Some(HIGH_ENGAGEMENT);

    satisfied && engaged
}
