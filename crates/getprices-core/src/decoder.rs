//! Decoder for the getprices text format.
//!
//! A response is a run of whitespace-separated tokens. The first seven form
//! the header:
//!
//! ```text
//! EXCHANGE%3DNASDAQ
//! MARKET_OPEN_MINUTE=570
//! MARKET_CLOSE_MINUTE=960
//! INTERVAL=60
//! COLUMNS=DATE,CLOSE,VOLUME
//! DATA=
//! TIMEZONE_OFFSET=-240
//! a1500000000,100,10
//! 3,101,12
//! ```
//!
//! Every following token is a comma-separated row whose first field is a
//! time code. A code carrying the `a` marker is an absolute anchor; a bare
//! integer counts intervals elapsed since the most recent anchor.

use tracing::trace;

use crate::{DataRow, DecodeError, DecodedSeries, ResponseHeader};

/// Number of header tokens preceding the data rows.
pub const HEADER_TOKENS: usize = 7;

/// Marker identifying an anchor time code.
pub const ANCHOR_MARKER: char = 'a';

/// Column name the service uses for the time-code field itself.
pub const TIME_CODE_COLUMN: &str = "DATE";

const EXCHANGE_PREFIX: &str = "EXCHANGE";
const MARKET_OPEN_PREFIX: &str = "MARKET_OPEN_MINUTE=";
const MARKET_CLOSE_PREFIX: &str = "MARKET_CLOSE_MINUTE=";
const INTERVAL_PREFIX: &str = "INTERVAL=";
const COLUMNS_PREFIX: &str = "COLUMNS=";
const DATA_PREFIX: &str = "DATA";
const TIMEZONE_PREFIX: &str = "TIMEZONE_OFFSET=";

/// Time code carried in field 0 of every data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeCode {
    /// Absolute Unix-epoch seconds.
    Anchor(i64),
    /// Intervals elapsed since the last anchor.
    Offset(u64),
}

impl TimeCode {
    /// Classify a raw time code.
    ///
    /// Any code that contains the marker is an anchor, wherever the marker
    /// sits, and every occurrence is removed before parsing.
    pub fn parse(raw: &str) -> Result<Self, DecodeError> {
        if raw.contains(ANCHOR_MARKER) {
            let stripped = raw.replace(ANCHOR_MARKER, "");
            stripped
                .parse::<i64>()
                .map(Self::Anchor)
                .map_err(|_| DecodeError::numeric("anchor time code", raw))
        } else {
            raw.parse::<u64>()
                .map(Self::Offset)
                .map_err(|_| DecodeError::numeric("offset time code", raw))
        }
    }

    /// Resolve to absolute seconds, returning `(timestamp, anchor base for
    /// the next row)`.
    fn resolve(
        self,
        last_anchor: Option<i64>,
        interval: i64,
        row: usize,
    ) -> Result<(i64, i64), DecodeError> {
        match self {
            Self::Anchor(seconds) => Ok((seconds, seconds)),
            Self::Offset(offset) => {
                let anchor = last_anchor.ok_or(DecodeError::MissingInitialAnchor { row })?;
                let timestamp = i64::try_from(offset)
                    .ok()
                    .and_then(|count| interval.checked_mul(count))
                    .and_then(|elapsed| anchor.checked_add(elapsed))
                    .ok_or(DecodeError::TimestampOverflow {
                        row,
                        anchor,
                        interval,
                        offset,
                    })?;
                Ok((timestamp, anchor))
            }
        }
    }
}

/// Decode a raw response body into a [`DecodedSeries`].
///
/// Row indices reported in errors count data rows from zero, header excluded.
pub fn decode(raw: &str) -> Result<DecodedSeries, DecodeError> {
    let tokens = raw.split_whitespace().collect::<Vec<_>>();
    if tokens.len() < HEADER_TOKENS {
        return Err(DecodeError::malformed_header(
            tokens.len(),
            format!(
                "expected {HEADER_TOKENS} header tokens, found {}",
                tokens.len()
            ),
        ));
    }

    let (header_tokens, data_tokens) = tokens.split_at(HEADER_TOKENS);
    let header = parse_header(header_tokens)?;
    trace!(
        exchange = %header.exchange,
        interval = header.interval,
        columns = header.width(),
        "parsed getprices header"
    );

    if data_tokens.is_empty() {
        return Err(DecodeError::NoDataRows);
    }

    let mut rows = Vec::with_capacity(data_tokens.len());
    data_tokens
        .iter()
        .enumerate()
        .try_fold(None, |last_anchor, (row, line)| {
            let (code, values) = split_row(row, line, &header)?;
            let (timestamp, anchor) = code.resolve(last_anchor, header.interval, row)?;
            rows.push(DataRow { timestamp, values });
            Ok::<_, DecodeError>(Some(anchor))
        })?;

    Ok(DecodedSeries::new(header, rows))
}

fn parse_header(tokens: &[&str]) -> Result<ResponseHeader, DecodeError> {
    let exchange_token = urlencoding::decode(tokens[0])
        .map_err(|_| DecodeError::malformed_header(0, "exchange is not valid UTF-8"))?;
    let exchange = strip(0, &exchange_token, EXCHANGE_PREFIX)?;
    let exchange = exchange.strip_prefix('=').unwrap_or(exchange).to_owned();

    let market_open_minute = parse_integer(1, tokens[1], MARKET_OPEN_PREFIX)?;
    let market_close_minute = parse_integer(2, tokens[2], MARKET_CLOSE_PREFIX)?;

    let interval = parse_integer(3, tokens[3], INTERVAL_PREFIX)?;
    let columns = parse_columns(strip(4, tokens[4], COLUMNS_PREFIX)?);

    let data_log = strip(5, tokens[5], DATA_PREFIX)?;
    let data_log = data_log.strip_prefix('=').unwrap_or(data_log).to_owned();

    let timezone_offset = parse_integer(6, tokens[6], TIMEZONE_PREFIX)?;

    Ok(ResponseHeader {
        exchange,
        market_open_minute,
        market_close_minute,
        interval,
        columns,
        data_log,
        timezone_offset,
    })
}

fn strip<'a>(index: usize, token: &'a str, prefix: &str) -> Result<&'a str, DecodeError> {
    token.strip_prefix(prefix).ok_or_else(|| {
        DecodeError::malformed_header(index, format!("expected prefix '{prefix}' in '{token}'"))
    })
}

fn parse_integer(index: usize, token: &str, prefix: &str) -> Result<i64, DecodeError> {
    let value = strip(index, token, prefix)?;
    value
        .parse::<i64>()
        .map_err(|_| DecodeError::numeric(prefix.trim_end_matches('='), value))
}

fn parse_columns(list: &str) -> Vec<String> {
    if list.is_empty() {
        return Vec::new();
    }

    let mut columns = list.split(',').map(str::to_owned).collect::<Vec<_>>();
    if columns
        .first()
        .is_some_and(|first| first.eq_ignore_ascii_case(TIME_CODE_COLUMN))
    {
        columns.remove(0);
    }
    columns
}

fn split_row(
    row: usize,
    line: &str,
    header: &ResponseHeader,
) -> Result<(TimeCode, Vec<f64>), DecodeError> {
    let fields = line.split(',').collect::<Vec<_>>();
    let expected = header.width() + 1;
    if fields.len() != expected {
        return Err(DecodeError::MalformedRow {
            row,
            expected,
            found: fields.len(),
        });
    }

    let code = TimeCode::parse(fields[0])?;
    let values = fields[1..]
        .iter()
        .zip(&header.columns)
        .map(|(value, column)| {
            value
                .parse::<f64>()
                .map_err(|_| DecodeError::numeric(column.as_str(), value))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((code, values))
}
