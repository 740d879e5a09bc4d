//! # P2P Exchange Hex
//!
//! Application service layer and HTTP adapter for the exchange service.
//!
//! ## Architecture
//!
//! - `service/` - Application service (orchestrates domain operations)
//! - `inbound/` - HTTP adapter (Axum server)
//! - `openapi/` - OpenAPI document served by Swagger UI
//!
//! The service is generic over `R: ExchangeRepository`, allowing
//! different repository implementations to be injected.

pub mod inbound;
pub mod openapi;
pub mod service;


pub use service::ExchangeService;
