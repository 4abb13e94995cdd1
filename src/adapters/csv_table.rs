use crate::domain::model::{columns, DepartmentPercentage, EmployeeRecord, MalformedPolicy};
use crate::domain::ports::{Storage, TableSink, TableSource};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use csv::{ByteRecord, ReaderBuilder, WriterBuilder};

/// Columns without which the analysis cannot run.
const REQUIRED_COLUMNS: [&str; 3] = [
    columns::DEPARTMENT,
    columns::SATISFACTION_RATING,
    columns::ENGAGEMENT_LEVEL,
];

/// Reads employee records from a header-row CSV file.
///
/// Columns are matched by header name. Empty cells are null; cells that fail to
/// parse as their column type are handled according to the [`MalformedPolicy`].
pub struct CsvTableSource<S: Storage> {
    storage: S,
    path: String,
    policy: MalformedPolicy,
}

impl<S: Storage> CsvTableSource<S> {
    pub fn new(storage: S, path: impl Into<String>, policy: MalformedPolicy) -> Self {
        Self {
            storage,
            path: path.into(),
            policy,
        }
    }

    pub fn parse(&self, data: &[u8]) -> Result<Vec<EmployeeRecord>> {
        parse_employee_csv(data, self.policy)
    }
}

#[async_trait]
impl<S: Storage> TableSource for CsvTableSource<S> {
    async fn read_records(&self) -> Result<Vec<EmployeeRecord>> {
        tracing::debug!("Loading employee data from {}", self.path);
        let data = self.storage.read_file(&self.path).await?;
        let records = self.parse(&data)?;
        tracing::debug!("Parsed {} records from {}", records.len(), self.path);
        Ok(records)
    }
}

/// Header position of every schema column present in the file.
struct ColumnIndex {
    positions: [Option<usize>; 7],
    width: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &ByteRecord) -> Result<Self> {
        let mut positions = [None; 7];
        for (slot, name) in positions.iter_mut().zip(columns::ALL) {
            *slot = headers
                .iter()
                .position(|h| String::from_utf8_lossy(h).trim() == name);
        }

        let index = Self {
            positions,
            width: headers.len(),
        };
        for column in REQUIRED_COLUMNS {
            if index.position(column).is_none() {
                return Err(EtlError::MissingColumnError {
                    column: column.to_string(),
                });
            }
        }
        Ok(index)
    }

    fn position(&self, column: &str) -> Option<usize> {
        columns::ALL
            .iter()
            .position(|&name| name == column)
            .and_then(|i| self.positions[i])
    }

    fn cell<'r>(&self, record: &'r ByteRecord, column: &str) -> Option<&'r [u8]> {
        self.position(column).and_then(|i| record.get(i))
    }
}

/// Typed access to one row, applying the malformed-cell policy.
///
/// Cells are taken as written: no trimming, and invalid UTF-8 counts as malformed.
struct RowReader<'a> {
    index: &'a ColumnIndex,
    record: &'a ByteRecord,
    row: usize,
    policy: MalformedPolicy,
}

impl<'a> RowReader<'a> {
    fn malformed<T>(&self, column: &str, value: &str) -> Result<Option<T>> {
        match self.policy {
            MalformedPolicy::Null => {
                tracing::warn!(
                    "Row {}: treating invalid {} value '{}' as null",
                    self.row,
                    column,
                    value
                );
                Ok(None)
            }
            MalformedPolicy::Reject => Err(EtlError::MalformedRecordError {
                row: self.row,
                column: column.to_string(),
                value: value.to_string(),
            }),
        }
    }

    /// Cell as text; absent and empty cells are null.
    fn decoded(&self, column: &str) -> Result<Option<&'a str>> {
        let Some(raw) = self.index.cell(self.record, column) else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }

        match std::str::from_utf8(raw) {
            Ok(value) => Ok(Some(value)),
            Err(_) => self.malformed(column, &String::from_utf8_lossy(raw)),
        }
    }

    fn text(&self, column: &str) -> Result<Option<String>> {
        Ok(self.decoded(column)?.map(str::to_string))
    }

    fn typed<T>(&self, column: &str, parse: impl Fn(&str) -> Option<T>) -> Result<Option<T>> {
        let Some(value) = self.decoded(column)? else {
            return Ok(None);
        };

        match parse(value) {
            Some(parsed) => Ok(Some(parsed)),
            None => self.malformed(column, value),
        }
    }

    /// The grouping key is never null; undecodable bytes are replaced under `Null`.
    fn department(&self) -> Result<String> {
        let raw = self
            .index
            .cell(self.record, columns::DEPARTMENT)
            .unwrap_or_default();

        match std::str::from_utf8(raw) {
            Ok(value) => Ok(value.to_string()),
            Err(_) => {
                let lossy = String::from_utf8_lossy(raw).into_owned();
                match self.policy {
                    MalformedPolicy::Null => {
                        tracing::warn!(
                            "Row {}: {} is not valid UTF-8, grouping under '{}'",
                            self.row,
                            columns::DEPARTMENT,
                            lossy
                        );
                        Ok(lossy)
                    }
                    MalformedPolicy::Reject => Err(EtlError::MalformedRecordError {
                        row: self.row,
                        column: columns::DEPARTMENT.to_string(),
                        value: lossy,
                    }),
                }
            }
        }
    }

    fn into_record(self) -> Result<EmployeeRecord> {
        if self.policy == MalformedPolicy::Reject && self.record.len() != self.index.width {
            return Err(EtlError::MalformedRecordError {
                row: self.row,
                column: "*".to_string(),
                value: format!(
                    "{} fields, expected {}",
                    self.record.len(),
                    self.index.width
                ),
            });
        }

        Ok(EmployeeRecord {
            employee_id: self.typed(columns::EMPLOYEE_ID, |s| s.parse().ok())?,
            department: self.department()?,
            job_title: self.text(columns::JOB_TITLE)?,
            satisfaction_rating: self.typed(columns::SATISFACTION_RATING, |s| s.parse().ok())?,
            engagement_level: self.text(columns::ENGAGEMENT_LEVEL)?,
            reports_concerns: self.typed(columns::REPORTS_CONCERNS, parse_bool)?,
            provided_suggestions: self.typed(columns::PROVIDED_SUGGESTIONS, parse_bool)?,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

pub fn parse_employee_csv(data: &[u8], policy: MalformedPolicy) -> Result<Vec<EmployeeRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers = reader.byte_headers()?.clone();
    let index = ColumnIndex::from_headers(&headers)?;

    let mut records = Vec::new();
    for (i, result) in reader.byte_records().enumerate() {
        let record = result?;
        let row = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(i + 2);

        let row_reader = RowReader {
            index: &index,
            record: &record,
            row,
            policy,
        };
        records.push(row_reader.into_record()?);
    }

    Ok(records)
}

/// Writes the result as a single `Department,Percentage` CSV file.
pub struct CsvTableSink<S: Storage> {
    storage: S,
    output_dir: String,
    file_name: String,
}

impl<S: Storage> CsvTableSink<S> {
    pub fn new(storage: S, output_dir: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            storage,
            output_dir: output_dir.into(),
            file_name: file_name.into(),
        }
    }
}

/// Serializes the rows with a header line, even when there are no rows.
pub fn render_results_csv(rows: &[DepartmentPercentage]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record([columns::OUTPUT_DEPARTMENT, columns::OUTPUT_PERCENTAGE])?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(std::io::Error::new(e.error().kind(), e.to_string())))
}

#[async_trait]
impl<S: Storage> TableSink for CsvTableSink<S> {
    async fn write_rows(&self, rows: &[DepartmentPercentage]) -> Result<String> {
        let data = render_results_csv(rows)?;

        tracing::debug!(
            "Writing {} result rows ({} bytes) to {}",
            rows.len(),
            data.len(),
            self.file_name
        );
        self.storage.write_file(&self.file_name, &data).await?;

        Ok(format!("{}/{}", self.output_dir, self.file_name))
    }
}
