//! TTL cache in front of a rate provider.

use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;

use p2p_types::{CurrencyCode, RateError, RateProvider, RateTable};

/// Caches rate tables per base currency for `ttl`. Failed lookups are not cached.
pub struct CachedRates<P> {
    inner: P,
    ttl: Duration,
    tables: DashMap<CurrencyCode, RateTable>,
}

impl<P: RateProvider> CachedRates<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            tables: DashMap::new(),
        }
    }

    fn fresh(&self, base: &CurrencyCode) -> Option<RateTable> {
        let ttl = chrono::Duration::from_std(self.ttl).unwrap_or(chrono::Duration::MAX);
        self.tables
            .get(base)
            .filter(|table| Utc::now() - table.fetched_at < ttl)
            .map(|table| table.value().clone())
    }
}

#[async_trait::async_trait]
impl<P: RateProvider> RateProvider for CachedRates<P> {
    async fn latest(&self, base: &CurrencyCode) -> Result<RateTable, RateError> {
        if let Some(table) = self.fresh(base) {
            return Ok(table);
        }

        tracing::debug!(%base, "Rate cache miss");
        let table = self.inner.latest(base).await?;
        self.tables.insert(base.clone(), table.clone());
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::StaticRates;

    struct Counting {
        inner: StaticRates,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl RateProvider for Counting {
        async fn latest(&self, base: &CurrencyCode) -> Result<RateTable, RateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.latest(base).await
        }
    }

    fn counting() -> Counting {
        Counting {
            inner: StaticRates::builtin(),
            calls: AtomicUsize::new(0),
        }
    }

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_hits_are_served_from_cache() {
        let cache = CachedRates::new(counting(), Duration::from_secs(300));
        cache.latest(&code("USD")).await.unwrap();
        cache.latest(&code("USD")).await.unwrap();
        cache.rate(&code("USD"), &code("EUR")).await.unwrap();
        assert_eq!(cache.inner.calls.load(Ordering::SeqCst), 1);

        cache.latest(&code("EUR")).await.unwrap();
        assert_eq!(cache.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_zero_ttl_always_refetches() {
        let cache = CachedRates::new(counting(), Duration::ZERO);
        cache.latest(&code("USD")).await.unwrap();
        cache.latest(&code("USD")).await.unwrap();
        assert_eq!(cache.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = CachedRates::new(counting(), Duration::from_secs(300));
        assert!(cache.latest(&code("XYZ")).await.is_err());
        assert!(cache.latest(&code("XYZ")).await.is_err());
        assert_eq!(cache.inner.calls.load(Ordering::SeqCst), 2);
    }
}
