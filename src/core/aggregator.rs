use crate::core::classifier::qualifies;
use crate::domain::model::{DepartmentAggregate, EmployeeRecord};
use std::collections::HashMap;

/// Per-department `(total, qualifying)` counts.
///
/// Merging is a per-department sum, so partial counts over disjoint slices of
/// the input can be combined in any order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentCounts {
    counts: HashMap<String, (u64, u64)>,
}

impl DepartmentCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, record: &EmployeeRecord) {
        let qualifying = u64::from(qualifies(record));

        // Avoid cloning the key for departments already seen.
        if let Some((total, hits)) = self.counts.get_mut(&record.department) {
            *total += 1;
            *hits += qualifying;
        } else {
            self.counts
                .insert(record.department.clone(), (1, qualifying));
        }
    }

    pub fn merge(&mut self, other: DepartmentCounts) {
        for (department, (total, hits)) in other.counts {
            let entry = self.counts.entry(department).or_insert((0, 0));
            entry.0 += total;
            entry.1 += hits;
        }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn get(&self, department: &str) -> Option<DepartmentAggregate> {
        self.counts
            .get(department)
            .map(|&(total, hits)| DepartmentAggregate {
                department: department.to_string(),
                total_employees: total,
                qualifying_count: hits,
            })
    }

    /// Aggregates in unspecified order.
    pub fn into_aggregates(self) -> Vec<DepartmentAggregate> {
        self.counts
            .into_iter()
            .map(|(department, (total, hits))| DepartmentAggregate {
                department,
                total_employees: total,
                qualifying_count: hits,
            })
            .collect()
    }
}

impl<'a> FromIterator<&'a EmployeeRecord> for DepartmentCounts {
    fn from_iter<I: IntoIterator<Item = &'a EmployeeRecord>>(iter: I) -> Self {
        let mut counts = DepartmentCounts::new();
        for record in iter {
            counts.observe(record);
        }
        counts
    }
}

/// Counts every record under its department, qualifying or not.
pub fn aggregate(records: &[EmployeeRecord]) -> DepartmentCounts {
    records.iter().collect()
}

/// Counts `partitions` contiguous slices independently and merges them.
pub fn aggregate_partitioned(records: &[EmployeeRecord], partitions: usize) -> DepartmentCounts {
    partition(records, partitions)
        .map(aggregate)
        .fold(DepartmentCounts::new(), |mut acc, part| {
            acc.merge(part);
            acc
        })
}

/// Splits `records` into at most `partitions` non-empty contiguous chunks.
pub fn partition(
    records: &[EmployeeRecord],
    partitions: usize,
) -> impl Iterator<Item = &[EmployeeRecord]> {
    let partitions = partitions.max(1);
    let chunk_size = records.len().div_ceil(partitions).max(1);
    records.chunks(chunk_size)
}
