//! # P2P Exchange Client SDK
//!
//! A typed Rust client for the exchange API.

use p2p_types::{
    ConversionQuote, CreditBalanceRequest, CurrencyCode, HealthResponse, QuoteRequest,
    RatesResponse, SignupRequest, SignupResponse, Wallet, WalletLookup,
};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Exchange API client.
pub struct ExchangeClient {
    base_url: String,
    http: Client,
}

impl ExchangeClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Service and database status.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.get("/health").await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Wallet
    // ─────────────────────────────────────────────────────────────────────────

    /// Lists every wallet balance.
    pub async fn balances(&self) -> Result<Vec<Wallet>, ClientError> {
        self.get("/api/wallet/balances").await
    }

    /// Credits `amount` to the `currency` wallet and returns its new state.
    pub async fn credit(
        &self,
        currency: CurrencyCode,
        amount: Decimal,
    ) -> Result<Wallet, ClientError> {
        let req = CreditBalanceRequest { amount, currency };
        self.post("/api/wallet/update-balance", &req).await
    }

    /// Checks whether a wallet exists for `currency`.
    pub async fn verify_wallet(&self, currency: &CurrencyCode) -> Result<WalletLookup, ClientError> {
        self.get(&format!("/api/wallet/verify/{}", currency)).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rates and quotes
    // ─────────────────────────────────────────────────────────────────────────

    /// Latest rate table for `base`.
    pub async fn rates(&self, base: &CurrencyCode) -> Result<RatesResponse, ClientError> {
        self.get(&format!("/api/rates/{}", base)).await
    }

    /// Fee-inclusive quote for converting `amount` of `from` into `to`.
    pub async fn quote(
        &self,
        from_currency: CurrencyCode,
        to_currency: CurrencyCode,
        amount: Decimal,
    ) -> Result<ConversionQuote, ClientError> {
        let req = QuoteRequest {
            from_currency,
            to_currency,
            amount,
        };
        self.post("/api/quote", &req).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Users
    // ─────────────────────────────────────────────────────────────────────────

    /// Registers a new user.
    pub async fn signup(&self, req: &SignupRequest) -> Result<SignupResponse, ClientError> {
        self.post("/api/auth/signup", req).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let resp = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let resp = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(api_error(status.as_u16(), body))
        }
    }
}

/// Builds an `Api` error, preferring the `error` field of a JSON body.
fn api_error(status: u16, body: String) -> ClientError {
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or(body);
    ClientError::Api { status, message }
}
