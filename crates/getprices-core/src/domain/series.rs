use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::{UtcDateTime, ValidationError};

/// Metadata block that precedes the data rows of a getprices response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseHeader {
    pub exchange: String,
    /// Minutes after local midnight at which the session opens.
    pub market_open_minute: i64,
    pub market_close_minute: i64,
    /// Sampling interval in seconds as declared by the server. Offset rows are
    /// resolved against this value, never against the requested interval.
    pub interval: i64,
    /// Value columns in row order. The time-code column is not listed.
    pub columns: Vec<String>,
    pub data_log: String,
    /// Exchange offset from UTC, in minutes.
    pub timezone_offset: i64,
}

impl ResponseHeader {
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.eq_ignore_ascii_case(name))
    }

    pub fn utc_offset(&self) -> Result<UtcOffset, ValidationError> {
        let invalid = || ValidationError::InvalidUtcOffset {
            minutes: self.timezone_offset,
        };
        let seconds = self
            .timezone_offset
            .checked_mul(60)
            .and_then(|seconds| i32::try_from(seconds).ok())
            .ok_or_else(invalid)?;
        UtcOffset::from_whole_seconds(seconds).map_err(|_| invalid())
    }
}

/// One decoded sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRow {
    /// Absolute Unix-epoch seconds.
    pub timestamp: i64,
    pub values: Vec<f64>,
}

impl DataRow {
    pub fn datetime(&self) -> Result<UtcDateTime, ValidationError> {
        UtcDateTime::from_unix_seconds(self.timestamp)
    }

    pub fn value(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }
}

/// Fully decoded response: header plus rows in the order the server sent them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedSeries {
    pub header: ResponseHeader,
    pub rows: Vec<DataRow>,
}

impl DecodedSeries {
    pub fn new(header: ResponseHeader, rows: Vec<DataRow>) -> Self {
        Self { header, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn timestamps(&self) -> Vec<i64> {
        self.rows.iter().map(|row| row.timestamp).collect()
    }

    /// All values of one column, looked up by name (ASCII case-insensitive).
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let index = self.header.column_index(name)?;
        self.rows.iter().map(|row| row.value(index)).collect()
    }

    /// Column-major matrix: row 0 holds the timestamps, row `i + 1` holds
    /// the values of `header.columns[i]`.
    pub fn to_matrix(&self) -> Vec<Vec<f64>> {
        let mut matrix = Vec::with_capacity(self.header.width() + 1);
        matrix.push(self.rows.iter().map(|row| row.timestamp as f64).collect());
        for index in 0..self.header.width() {
            matrix.push(
                self.rows
                    .iter()
                    .map(|row| row.value(index).unwrap_or(f64::NAN))
                    .collect(),
            );
        }
        matrix
    }

    /// Row timestamps shifted into the exchange's local offset.
    pub fn local_times(&self) -> Result<Vec<OffsetDateTime>, ValidationError> {
        let offset = self.header.utc_offset()?;
        self.rows
            .iter()
            .map(|row| Ok(row.datetime()?.to_offset(offset)))
            .collect()
    }
}
