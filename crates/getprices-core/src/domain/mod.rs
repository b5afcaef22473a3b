//! # Domain Models
//!
//! Typed values shared by the decoder, the query builder and the client.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated instrument ticker |
//! | [`Period`] | Trailing history window such as `30d` |
//! | [`UtcDateTime`] | UTC instant built from Unix seconds |
//! | [`ResponseHeader`] | Seven-token metadata block of a response |
//! | [`DataRow`] | One sample with an absolute timestamp |
//! | [`DecodedSeries`] | Header plus ordered rows |
//!
//! Constructors validate their invariants and return
//! [`ValidationError`](crate::ValidationError) on bad input.

mod period;
mod series;
mod symbol;
mod timestamp;

pub use period::Period;
pub use series::{DataRow, DecodedSeries, ResponseHeader};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
