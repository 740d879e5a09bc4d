//! HTTP client for exchangerate-api.com (v6 `latest` endpoint).

use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use p2p_types::{CurrencyCode, RateError, RateProvider, RateTable};

/// Public endpoint of the v6 API.
pub const DEFAULT_API_URL: &str = "https://v6.exchangerate-api.com/v6";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Wire shape of `GET /{key}/latest/{BASE}`.
#[derive(Debug, Deserialize)]
struct LatestResponse {
    result: String,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    #[serde(default)]
    conversion_rates: BTreeMap<String, serde_json::Value>,
}

/// exchangerate-api.com client.
pub struct ExchangeRateApi {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ExchangeRateApi {
    /// Creates a client against the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_API_URL, api_key)
    }

    /// Creates a client against a custom endpoint (mirrors, test servers).
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn latest_url(&self, base: &CurrencyCode) -> String {
        format!("{}/{}/latest/{}", self.base_url, self.api_key, base)
    }
}

#[async_trait::async_trait]
impl RateProvider for ExchangeRateApi {
    #[tracing::instrument(skip(self), fields(base = %base))]
    async fn latest(&self, base: &CurrencyCode) -> Result<RateTable, RateError> {
        let resp = self
            .http
            .get(self.latest_url(base))
            .send()
            .await
            .map_err(|e| RateError::ServiceUnavailable(e.without_url().to_string()))?;

        let status = resp.status();
        let body: LatestResponse = resp.json().await.map_err(|e| {
            RateError::ServiceUnavailable(format!("HTTP {}: {}", status, e.without_url()))
        })?;

        parse_latest(base, body)
    }
}

fn parse_latest(base: &CurrencyCode, body: LatestResponse) -> Result<RateTable, RateError> {
    if body.result != "success" {
        let error_type = body.error_type.unwrap_or_else(|| "unknown".into());
        warn!(%base, %error_type, "Rate provider returned an error");
        return Err(match error_type.as_str() {
            "unsupported-code" => RateError::UnsupportedCurrency(base.clone()),
            _ => RateError::ServiceUnavailable(error_type),
        });
    }

    let total = body.conversion_rates.len();
    let rates: BTreeMap<CurrencyCode, Decimal> = body
        .conversion_rates
        .into_iter()
        .filter_map(|(code, value)| {
            let code = CurrencyCode::parse(&code).ok()?;
            let rate = parse_rate(&value).filter(|r| *r > Decimal::ZERO)?;
            Some((code, rate))
        })
        .filter(|(code, _)| code != base)
        .collect();

    debug!(%base, kept = rates.len(), total, "Parsed rate table");
    Ok(RateTable::new(base.clone(), rates))
}

fn parse_rate(value: &serde_json::Value) -> Option<Decimal> {
    let raw = match value {
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        _ => return None,
    };
    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .ok()
}
