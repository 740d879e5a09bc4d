//! Domain models for the exchange service.

pub mod conversion;
pub mod currency;
pub mod ledger;
pub mod rates;
pub mod user;
pub mod wallet;

pub use conversion::{Conversion, ConversionQuote, SERVICE_FEE_RATE};
pub use currency::CurrencyCode;
pub use ledger::LEDGER_SCALE;
pub use rates::RateTable;
pub use user::{NewUser, User, UserId, UserStatus};
pub use wallet::{Wallet, WalletLookup};
