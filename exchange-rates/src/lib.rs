//! Exchange rate providers for the P2P exchange service.
//!
//! Every provider implements the [`p2p_types::RateProvider`] port:
//!
//! - [`ExchangeRateApi`] - HTTP client for the exchangerate-api.com v6 `latest` endpoint
//! - [`StaticRates`] - built-in reference table, used when no API key is configured
//! - [`CachedRates`] - TTL cache in front of any other provider
//!
//! # Example
//! ```
//! use exchange_rates::StaticRates;
//! use p2p_types::{CurrencyCode, RateProvider};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let rates = StaticRates::builtin();
//! let usd = CurrencyCode::parse("usd").unwrap();
//! let eur = CurrencyCode::parse("eur").unwrap();
//! let rate = rates.rate(&usd, &eur).await.unwrap();
//! assert!(rate > rust_decimal::Decimal::ZERO);
//! # }
//! ```

mod api;
mod cache;
mod reference;

pub use api::{DEFAULT_API_URL, ExchangeRateApi};
pub use cache::CachedRates;
pub use reference::{REFERENCE_CODES, StaticRates};
