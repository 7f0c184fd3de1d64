//! Refresh and publication of the active configuration.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::EconomicConfig;
use crate::error::IndicatorError;

use super::cache::{CachedIndicators, IndicatorCache};
use super::source::{IndicatorSnapshot, IndicatorSource};

/// Default time allowed for a provider request.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the indicators currently in effect came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorOrigin {
    /// Built-in defaults or the configuration directory.
    Configured,
    /// A successful provider fetch.
    Provider,
    /// The local cache.
    Cache,
}

/// Owns the active [`EconomicConfig`] and replaces it when indicators change.
///
/// Each snapshot is immutable and shared as an `Arc`. A refresh tries the
/// provider, then the cache, and otherwise leaves the current snapshot in
/// place. Subscribers are only notified when UF or UTM actually change.
pub struct IndicatorService {
    source: Option<Arc<dyn IndicatorSource>>,
    cache: Option<IndicatorCache>,
    timeout: Duration,
    config: watch::Sender<Arc<EconomicConfig>>,
    origin: watch::Sender<IndicatorOrigin>,
}

impl IndicatorService {
    /// Creates a service publishing `config`, with no provider or cache.
    pub fn new(config: EconomicConfig) -> Self {
        let (config, _) = watch::channel(Arc::new(config));
        let (origin, _) = watch::channel(IndicatorOrigin::Configured);
        Self {
            source: None,
            cache: None,
            timeout: DEFAULT_FETCH_TIMEOUT,
            config,
            origin,
        }
    }

    /// Sets the provider to fetch from.
    pub fn with_source(mut self, source: Arc<dyn IndicatorSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets the local cache.
    pub fn with_cache(mut self, cache: IndicatorCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Sets the provider timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the configuration currently in effect.
    pub fn snapshot(&self) -> Arc<EconomicConfig> {
        self.config.borrow().clone()
    }

    /// Returns where the current indicators came from.
    pub fn origin(&self) -> IndicatorOrigin {
        *self.origin.borrow()
    }

    /// Subscribes to configuration replacements.
    pub fn subscribe(&self) -> watch::Receiver<Arc<EconomicConfig>> {
        self.config.subscribe()
    }

    /// Refreshes the indicators and returns where the values in effect came from.
    pub async fn refresh(&self) -> IndicatorOrigin {
        if let Some(source) = &self.source {
            match self.fetch(source.as_ref()).await {
                Ok(snapshot) => {
                    self.apply(
                        snapshot.uf,
                        snapshot.utm,
                        None,
                        snapshot.effective_date,
                        IndicatorOrigin::Provider,
                    );
                    self.store(&snapshot);
                    return IndicatorOrigin::Provider;
                }
                Err(e) => {
                    warn!(source = source.name(), error = %e, "Indicator fetch failed, trying cache");
                }
            }
        }

        if let Some(cached) = self.cache.as_ref().and_then(IndicatorCache::load) {
            self.apply(
                cached.uf,
                cached.utm,
                cached.imm,
                cached.effective_date,
                IndicatorOrigin::Cache,
            );
            return IndicatorOrigin::Cache;
        }

        info!("No fresh indicators available, keeping current values");
        self.origin()
    }

    /// Spawns a task refreshing the indicators every `period`, starting now.
    pub fn spawn_periodic(self: Arc<Self>, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                self.refresh().await;
            }
        })
    }

    async fn fetch(&self, source: &dyn IndicatorSource) -> Result<IndicatorSnapshot, IndicatorError> {
        let snapshot = tokio::time::timeout(self.timeout, source.fetch())
            .await
            .map_err(|_| IndicatorError::Timeout {
                seconds: self.timeout.as_secs(),
            })??;
        snapshot.validate()?;
        Ok(snapshot)
    }

    fn apply(
        &self,
        uf: Decimal,
        utm: Decimal,
        imm: Option<Decimal>,
        effective_date: NaiveDate,
        origin: IndicatorOrigin,
    ) {
        let notified = self.config.send_if_modified(|current| {
            let changed = current.uf() != uf || current.utm() != utm;
            *current = Arc::new(current.with_indicators(uf, utm, imm, effective_date));
            changed
        });
        self.origin.send_replace(origin);

        info!(
            origin = ?origin,
            uf = %uf,
            utm = %utm,
            changed = notified,
            "Indicators applied"
        );
    }

    fn store(&self, snapshot: &IndicatorSnapshot) {
        let Some(cache) = &self.cache else {
            return;
        };

        let cached = CachedIndicators {
            uf: snapshot.uf,
            utm: snapshot.utm,
            imm: Some(self.snapshot().imm()),
            effective_date: snapshot.effective_date,
            timestamp: Utc::now(),
        };
        if let Err(e) = cache.store(&cached) {
            warn!(error = %e, "Could not cache indicators");
        }
    }
}
