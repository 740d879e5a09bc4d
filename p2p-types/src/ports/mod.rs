//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The application layer depends on these traits, not concrete implementations.

mod rates;
mod repository;

pub use rates::RateProvider;
pub use repository::ExchangeRepository;
