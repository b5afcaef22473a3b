use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::http_client::HttpError;

/// Validation errors raised while constructing query and domain values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter or '.': '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("period must be a positive count followed by a unit letter, e.g. 30d or 1Y: '{value}'")]
    InvalidPeriod { value: String },
    #[error("exchange code must be 1-16 ASCII letters or digits: '{value}'")]
    InvalidExchange { value: String },
    #[error("column code must be non-empty ASCII alphanumeric: '{value}'")]
    InvalidColumn { value: String },
    #[error("interval must be greater than zero seconds")]
    ZeroInterval,

    #[error("at least one symbol is required")]
    EmptySymbolList,
    #[error("at least one field code is required")]
    EmptyFieldList,

    #[error("timestamp must be RFC3339: '{value}'")]
    InvalidTimestamp { value: String },
    #[error("timestamp {seconds} is outside the supported range")]
    TimestampOutOfRange { seconds: i64 },
    #[error("timezone offset of {minutes} minutes is outside the supported range")]
    InvalidUtcOffset { minutes: i64 },
}

/// Coarse classification of a [`DecodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    MalformedHeader,
    NoDataRows,
    MalformedRow,
    MissingInitialAnchor,
    NumericParse,
    TimestampOverflow,
}

impl DecodeErrorKind {
    pub const fn code(self) -> &'static str {
        match self {
            Self::MalformedHeader => "decode.malformed_header",
            Self::NoDataRows => "decode.no_data_rows",
            Self::MalformedRow => "decode.malformed_row",
            Self::MissingInitialAnchor => "decode.missing_initial_anchor",
            Self::NumericParse => "decode.numeric_parse",
            Self::TimestampOverflow => "decode.timestamp_overflow",
        }
    }
}

impl Display for DecodeErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Structural failure while decoding a getprices response body.
///
/// Every variant is terminal for the decode call that produced it; no partial
/// series is ever returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed header token {index}: {reason}")]
    MalformedHeader { index: usize, reason: String },

    #[error("response has a header but no data rows")]
    NoDataRows,

    #[error("malformed row {row}: expected {expected} fields, found {found}")]
    MalformedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row} is an offset but no anchor row precedes it")]
    MissingInitialAnchor { row: usize },

    #[error("cannot parse {field} value '{value}' as a number")]
    NumericParse { field: String, value: String },

    #[error("row {row}: timestamp overflows anchor {anchor} + {interval}s x {offset}")]
    TimestampOverflow {
        row: usize,
        anchor: i64,
        interval: i64,
        offset: u64,
    },
}

impl DecodeError {
    pub const fn kind(&self) -> DecodeErrorKind {
        match self {
            Self::MalformedHeader { .. } => DecodeErrorKind::MalformedHeader,
            Self::NoDataRows => DecodeErrorKind::NoDataRows,
            Self::MalformedRow { .. } => DecodeErrorKind::MalformedRow,
            Self::MissingInitialAnchor { .. } => DecodeErrorKind::MissingInitialAnchor,
            Self::NumericParse { .. } => DecodeErrorKind::NumericParse,
            Self::TimestampOverflow { .. } => DecodeErrorKind::TimestampOverflow,
        }
    }

    pub const fn code(&self) -> &'static str {
        self.kind().code()
    }

    pub(crate) fn malformed_header(index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedHeader {
            index,
            reason: reason.into(),
        }
    }

    pub(crate) fn numeric(field: impl Into<String>, value: &str) -> Self {
        Self::NumericParse {
            field: field.into(),
            value: value.to_owned(),
        }
    }
}

/// Failure of a fetch-and-decode round trip.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] HttpError),

    #[error("upstream returned status {status}")]
    Status { status: u16 },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl FetchError {
    /// Whether a later fetch of the same query could plausibly succeed.
    pub fn retryable(&self) -> bool {
        match self {
            Self::Transport(error) => error.retryable(),
            Self::Status { status } => matches!(status, 408 | 429 | 500..=599),
            Self::Decode(_) => false,
        }
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {name} has invalid value '{value}'")]
    InvalidEnv { name: &'static str, value: String },

    #[error("base url must start with http:// or https://: '{value}'")]
    InvalidBaseUrl { value: String },

    #[error("config deserialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
