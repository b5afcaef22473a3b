//! Fetch-and-decode client for the getprices endpoint.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::decoder::decode;
use crate::http_client::{HttpClient, HttpError, HttpRequest, ReqwestHttpClient};
use crate::query::{build_request_url, PriceQuery};
use crate::{ClientConfig, DecodedSeries, FetchError};

/// Result of one fetch: the query that produced it, the URL that was
/// requested, the raw body and its decoded series.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceHistory {
    query: PriceQuery,
    url: String,
    body: String,
    series: DecodedSeries,
}

impl PriceHistory {
    pub fn query(&self) -> &PriceQuery {
        &self.query
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn series(&self) -> &DecodedSeries {
        &self.series
    }

    pub fn into_series(self) -> DecodedSeries {
        self.series
    }
}

/// Client that turns a [`PriceQuery`] into a [`PriceHistory`].
#[derive(Clone)]
pub struct PriceHistoryClient {
    http_client: Arc<dyn HttpClient>,
    config: ClientConfig,
}

impl Default for PriceHistoryClient {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl PriceHistoryClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()), config)
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, config: ClientConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn request_url(&self, query: &PriceQuery) -> String {
        build_request_url(&self.config.base_url, query)
    }

    pub async fn fetch(&self, query: &PriceQuery) -> Result<PriceHistory, FetchError> {
        let url = self.request_url(query);
        debug!(%url, symbol = %query.symbol(), "fetching price history");

        let body = self.fetch_body(&url).await?;
        let series = decode(&body)?;

        let requested = query.interval_secs().map(i64::from);
        if requested.is_some_and(|requested| requested != series.header.interval) {
            debug!(
                requested = ?requested,
                served = series.header.interval,
                "server answered with a different interval"
            );
        }
        debug!(rows = series.len(), columns = series.header.width(), "decoded price history");

        Ok(PriceHistory {
            query: query.clone(),
            url,
            body,
            series,
        })
    }

    /// Fetch again with the query of an earlier result. `previous` is left
    /// as it was.
    pub async fn refresh(&self, previous: &PriceHistory) -> Result<PriceHistory, FetchError> {
        self.fetch(&previous.query).await
    }

    /// One GET against the configured endpoint. Callers decide whether a
    /// failed fetch is worth repeating; see [`FetchError::retryable`].
    async fn fetch_body(&self, url: &str) -> Result<String, FetchError> {
        let timeout_ms = u64::try_from(self.config.timeout.as_millis()).unwrap_or(u64::MAX);
        let request = HttpRequest::get(url).with_timeout_ms(timeout_ms);

        let response = tokio::time::timeout(self.config.timeout, self.http_client.execute(request))
            .await
            .unwrap_or_else(|_| Err(HttpError::new(format!("request timeout after {timeout_ms} ms"))))
            .inspect_err(|error| warn!(%url, %error, "getprices request failed"))?;

        if !response.is_success() {
            warn!(%url, status = response.status, "getprices request rejected");
            return Err(FetchError::Status {
                status: response.status,
            });
        }

        Ok(response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::StaticHttpClient;
    use crate::{DecodeError, DecodeErrorKind, Symbol};

    const BODY: &str = "EXCHANGE%3DNASDAQ MARKET_OPEN_MINUTE=570 MARKET_CLOSE_MINUTE=960 \
                        INTERVAL=86400 COLUMNS=DATE,CLOSE,VOLUME DATA= TIMEZONE_OFFSET=-240 \
                        a1500000000,100,10 1,101,12";

    fn query() -> PriceQuery {
        PriceQuery::new(Symbol::parse("GOOG").expect("valid symbol"))
    }

    #[tokio::test]
    async fn fetch_keeps_url_body_and_series_together() {
        let client = PriceHistoryClient::with_http_client(
            Arc::new(StaticHttpClient::ok(BODY)),
            ClientConfig::default(),
        );

        let history = client.fetch(&query()).await.expect("fetch should succeed");

        assert_eq!(
            history.url(),
            "https://www.google.com/finance/getprices?q=GOOG&i=86400"
        );
        assert_eq!(history.body(), BODY);
        assert_eq!(history.series().timestamps(), vec![1_500_000_000, 1_500_086_400]);
        assert_eq!(history.query(), &query());
    }

    #[tokio::test]
    async fn undecodable_body_surfaces_decode_error() {
        let client = PriceHistoryClient::with_http_client(
            Arc::new(StaticHttpClient::ok("EXCHANGE%3DNASDAQ")),
            ClientConfig::default(),
        );

        let error = client.fetch(&query()).await.expect_err("decode should fail");
        match error {
            FetchError::Decode(error) => assert_eq!(error.kind(), DecodeErrorKind::MalformedHeader),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!FetchError::Decode(DecodeError::NoDataRows).retryable());
    }
}
