//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use p2p_types::{
    AppError, CreditBalanceRequest, CurrencyCode, ExchangeRepository, QuoteRequest,
    RatesResponse, SignupRequest,
};

use crate::ExchangeService;

/// Application state shared across handlers.
pub struct AppState<R: ExchangeRepository> {
    pub service: ExchangeService<R>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

/// Malformed or mistyped JSON is the caller's fault: 400, not axum's 422.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(AppError::InvalidArgument(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Client errors carry their reason, which is always built from
        // validation or a fixed text. Server-side detail stays in the log.
        let (status, message) = match &self.0 {
            AppError::InvalidArgument(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::DuplicateEntity(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::ConcurrentModification(_) => (
                StatusCode::CONFLICT,
                "Concurrent update, please retry".to_string(),
            ),
            AppError::StorageUnavailable(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Storage unavailable".to_string(),
            ),
            AppError::RateUnavailable(_) => (
                StatusCode::BAD_GATEWAY,
                "Exchange rate service unavailable".to_string(),
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::warn!(error = %self.0, "Request rejected");
        }

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

fn parse_currency(raw: &str) -> Result<CurrencyCode, ApiError> {
    CurrencyCode::parse(raw).map_err(|e| ApiError(e.into()))
}

/// Health check endpoint. Always 200; reports database reachability.
pub async fn health<R: ExchangeRepository>(
    State(state): State<Arc<AppState<R>>>,
) -> impl IntoResponse {
    Json(state.service.health().await)
}

// ─────────────────────────────────────────────────────────────────────────────
// Wallet
// ─────────────────────────────────────────────────────────────────────────────

/// List all wallet balances.
#[tracing::instrument(skip(state))]
pub async fn get_balances<R: ExchangeRepository>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<impl IntoResponse, ApiError> {
    let wallets = state.service.get_balances().await?;
    Ok(Json(wallets))
}

/// Credit a wallet, creating it on first use.
#[tracing::instrument(skip(state, body))]
pub async fn update_balance<R: ExchangeRepository>(
    State(state): State<Arc<AppState<R>>>,
    body: Result<Json<CreditBalanceRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;
    let wallet = state.service.credit_balance(req).await?;
    Ok(Json(wallet))
}

/// Check whether a wallet exists for a currency.
#[tracing::instrument(skip(state))]
pub async fn verify_wallet<R: ExchangeRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(currency): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let currency = parse_currency(&currency)?;
    let lookup = state.service.verify_wallet(&currency).await?;
    Ok(Json(lookup))
}

// ─────────────────────────────────────────────────────────────────────────────
// Rates and quotes
// ─────────────────────────────────────────────────────────────────────────────

/// Latest rate table for a base currency.
#[tracing::instrument(skip(state))]
pub async fn get_rates<R: ExchangeRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(base): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let base = parse_currency(&base)?;
    let table = state.service.rates(&base).await?;
    Ok(Json(RatesResponse::from(table)))
}

/// Fee-inclusive conversion quote.
#[tracing::instrument(skip(state, body))]
pub async fn quote<R: ExchangeRepository>(
    State(state): State<Arc<AppState<R>>>,
    body: Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;
    let quote = state.service.quote(req).await?;
    Ok(Json(quote))
}

// ─────────────────────────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────────────────────────

/// Register a new user.
#[tracing::instrument(skip(state, body))]
pub async fn signup<R: ExchangeRepository>(
    State(state): State<Arc<AppState<R>>>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;
    let created = state.service.signup(req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
