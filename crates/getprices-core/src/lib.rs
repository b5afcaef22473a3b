//! # getprices core
//!
//! Decoder and client for the `getprices` historical quote format.
//!
//! ## Overview
//!
//! The quote service answers a price-history request with a compact text
//! body: seven header tokens followed by comma-separated rows whose
//! timestamps are either absolute anchors or interval offsets from the last
//! anchor. This crate provides:
//!
//! - **A pure decoder** that rebuilds absolute timestamps and a numeric table
//! - **Typed query parameters** and deterministic URL construction
//! - **An async client** that fetches and decodes one query per call
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`decoder`] | Response decoder and time-code resolution |
//! | [`domain`] | Symbol, period, timestamp and series models |
//! | [`query`] | Immutable request parameters and URL builders |
//! | [`client`] | Fetch-and-decode client |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`config`] | Client configuration and environment overrides |
//! | [`error`] | Error types |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use getprices_core::{Period, PriceHistoryClient, PriceQuery, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PriceHistoryClient::default();
//!     let query = PriceQuery::new(Symbol::parse("GOOG")?)
//!         .with_interval(60)?
//!         .with_period(Period::days(5));
//!
//!     let history = client.fetch(&query).await?;
//!     for row in &history.series().rows {
//!         println!("{} {:?}", row.timestamp, row.values);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Decoding needs no network at all:
//!
//! ```rust
//! let body = "EXCHANGE%3DNASDAQ MARKET_OPEN_MINUTE=570 MARKET_CLOSE_MINUTE=960 \
//!             INTERVAL=60 COLUMNS=CLOSE,VOLUME DATA= TIMEZONE_OFFSET=-240 \
//!             a1500000000,100,10 3,101,12";
//! let series = getprices_core::decode(body).unwrap();
//! assert_eq!(series.timestamps(), vec![1_500_000_000, 1_500_000_180]);
//! ```

pub mod client;
pub mod config;
pub mod decoder;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod query;

pub use client::{PriceHistory, PriceHistoryClient};

pub use config::ClientConfig;

pub use decoder::{decode, TimeCode};

pub use domain::{DataRow, DecodedSeries, Period, ResponseHeader, Symbol, UtcDateTime};

pub use error::{ConfigError, DecodeError, DecodeErrorKind, FetchError, ValidationError};

pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient, StaticHttpClient,
};

pub use query::{build_request_url, yahoo_quotes_url, PriceQuery};
