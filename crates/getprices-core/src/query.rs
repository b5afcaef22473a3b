//! Request parameters and URL construction.
//!
//! [`PriceQuery`] is an immutable value; every `with_*` call returns a new
//! query, and fetching is always an explicit call on
//! [`PriceHistoryClient`](crate::PriceHistoryClient).

use std::num::NonZeroU32;

use crate::{Period, Symbol, ValidationError};

/// Default getprices endpoint.
pub const GETPRICES_URL: &str = "https://www.google.com/finance/getprices";

/// Default Yahoo quotes CSV endpoint.
pub const YAHOO_QUOTES_URL: &str = "http://finance.yahoo.com/d/quotes.csv";

/// One trading day, the interval used when none is given.
pub const DEFAULT_INTERVAL_SECS: u32 = 86_400;

const MAX_EXCHANGE_LEN: usize = 16;

/// Parameters of one historical price request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PriceQuery {
    symbol: Symbol,
    interval: Option<NonZeroU32>,
    period: Option<Period>,
    exchange: Option<String>,
    columns: Option<Vec<String>>,
}

impl PriceQuery {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            interval: NonZeroU32::new(DEFAULT_INTERVAL_SECS),
            period: None,
            exchange: None,
            columns: None,
        }
    }

    pub fn with_symbol(self, symbol: Symbol) -> Self {
        Self { symbol, ..self }
    }

    /// Request samples `seconds` apart. The server may answer with a
    /// different interval; decoding always follows the response header.
    pub fn with_interval(self, seconds: u32) -> Result<Self, ValidationError> {
        let interval = NonZeroU32::new(seconds).ok_or(ValidationError::ZeroInterval)?;
        Ok(Self {
            interval: Some(interval),
            ..self
        })
    }

    /// Leave the interval to the server.
    pub fn without_interval(self) -> Self {
        Self {
            interval: None,
            ..self
        }
    }

    pub fn with_period(self, period: Period) -> Self {
        Self {
            period: Some(period),
            ..self
        }
    }

    pub fn with_exchange(self, exchange: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            exchange: Some(validate_exchange(exchange)?),
            ..self
        })
    }

    /// Restrict the response to the given column codes (e.g. `d`, `c`, `v`).
    pub fn with_columns<I, S>(self, columns: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns = columns
            .into_iter()
            .map(|column| validate_code(column.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        if columns.is_empty() {
            return Err(ValidationError::EmptyFieldList);
        }
        Ok(Self {
            columns: Some(columns),
            ..self
        })
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn interval_secs(&self) -> Option<u32> {
        self.interval.map(NonZeroU32::get)
    }

    pub fn period(&self) -> Option<&Period> {
        self.period.as_ref()
    }

    pub fn exchange(&self) -> Option<&str> {
        self.exchange.as_deref()
    }

    pub fn columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }
}

/// Build the getprices URL, appending only the parameters that are set.
pub fn build_request_url(base_url: &str, query: &PriceQuery) -> String {
    let mut url = format!("{base_url}?q={}", urlencoding::encode(query.symbol.as_str()));
    if let Some(interval) = query.interval {
        url.push_str(&format!("&i={interval}"));
    }
    if let Some(period) = &query.period {
        url.push_str(&format!("&p={}", urlencoding::encode(&period.to_string())));
    }
    if let Some(exchange) = &query.exchange {
        url.push_str(&format!("&x={}", urlencoding::encode(exchange)));
    }
    if let Some(columns) = &query.columns {
        let joined = columns
            .iter()
            .map(|column| urlencoding::encode(column).into_owned())
            .collect::<Vec<_>>()
            .join(",");
        url.push_str(&format!("&f={joined}"));
    }
    url
}

/// Build a Yahoo `quotes.csv` URL: symbols comma-joined, field codes
/// concatenated (`f=sl1d1`).
pub fn yahoo_quotes_url<S>(
    base_url: &str,
    symbols: &[Symbol],
    fields: &[S],
) -> Result<String, ValidationError>
where
    S: AsRef<str>,
{
    if symbols.is_empty() {
        return Err(ValidationError::EmptySymbolList);
    }
    if fields.is_empty() {
        return Err(ValidationError::EmptyFieldList);
    }

    let symbols = symbols
        .iter()
        .map(|symbol| urlencoding::encode(symbol.as_str()).into_owned())
        .collect::<Vec<_>>()
        .join(",");
    let fields = fields
        .iter()
        .map(|field| validate_code(field.as_ref()))
        .collect::<Result<String, _>>()?;

    Ok(format!("{base_url}?s={symbols}&f={fields}"))
}

fn validate_exchange(input: &str) -> Result<String, ValidationError> {
    let normalized = input.trim().to_ascii_uppercase();
    let valid = !normalized.is_empty()
        && normalized.len() <= MAX_EXCHANGE_LEN
        && normalized.chars().all(|ch| ch.is_ascii_alphanumeric());
    if !valid {
        return Err(ValidationError::InvalidExchange {
            value: input.to_owned(),
        });
    }
    Ok(normalized)
}

fn validate_code(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|ch| ch.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidColumn {
            value: input.to_owned(),
        });
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goog() -> PriceQuery {
        PriceQuery::new(Symbol::parse("goog").expect("valid symbol"))
    }

    #[test]
    fn default_query_sends_symbol_and_daily_interval() {
        assert_eq!(
            build_request_url(GETPRICES_URL, &goog()),
            "https://www.google.com/finance/getprices?q=GOOG&i=86400"
        );
    }

    #[test]
    fn unset_interval_is_omitted() {
        let url = build_request_url("http://host/getprices", &goog().without_interval());
        assert_eq!(url, "http://host/getprices?q=GOOG");
    }

    #[test]
    fn builders_leave_the_original_query_untouched() {
        let base = goog();
        let weekly = base.clone().with_period(Period::days(7));
        assert_eq!(base.period(), None);
        assert_eq!(weekly.period(), Some(&Period::days(7)));
    }

    #[test]
    fn rejects_zero_interval_and_bad_exchange() {
        assert_eq!(goog().with_interval(0), Err(ValidationError::ZeroInterval));
        assert!(matches!(
            goog().with_exchange("NAS DAQ"),
            Err(ValidationError::InvalidExchange { .. })
        ));
        assert_eq!(
            goog().with_columns(Vec::<String>::new()),
            Err(ValidationError::EmptyFieldList)
        );
    }

    #[test]
    fn yahoo_url_concatenates_field_codes() {
        let symbols = [
            Symbol::parse("AAPL").expect("valid"),
            Symbol::parse("MSFT").expect("valid"),
        ];
        let url = yahoo_quotes_url(YAHOO_QUOTES_URL, &symbols, &["s", "l1", "d1"])
            .expect("valid url");
        assert_eq!(
            url,
            "http://finance.yahoo.com/d/quotes.csv?s=AAPL,MSFT&f=sl1d1"
        );
    }

    #[test]
    fn yahoo_url_requires_symbols_and_fields() {
        let fields: [&str; 0] = [];
        assert_eq!(
            yahoo_quotes_url(YAHOO_QUOTES_URL, &[], &["s"]),
            Err(ValidationError::EmptySymbolList)
        );
        assert_eq!(
            yahoo_quotes_url(YAHOO_QUOTES_URL, &[Symbol::parse("AAPL").expect("valid")], &fields),
            Err(ValidationError::EmptyFieldList)
        );
    }
}
