//! Economic indicator refresh.
//!
//! UF and UTM change daily and monthly. This module fetches them from a
//! provider, validates them, keeps a local cache of the last good values and
//! publishes each new [`EconomicConfig`](crate::config::EconomicConfig)
//! snapshot to subscribers.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use chile_labor_engine::config::EconomicConfig;
//! use chile_labor_engine::indicators::{
//!     IndicatorCache, IndicatorService, MINDICADOR_URL, MindicadorSource,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let source = MindicadorSource::new(MINDICADOR_URL, Duration::from_secs(10))?;
//! let service = IndicatorService::new(EconomicConfig::default())
//!     .with_source(Arc::new(source))
//!     .with_cache(IndicatorCache::new("indicators.json"));
//!
//! service.refresh().await;
//! println!("UF {}", service.snapshot().uf());
//! # Ok(())
//! # }
//! ```

mod cache;
mod mindicador;
mod service;
mod source;

pub use cache::{CachedIndicators, IndicatorCache};
pub use mindicador::{MINDICADOR_URL, MindicadorSource};
pub use service::{DEFAULT_FETCH_TIMEOUT, IndicatorOrigin, IndicatorService};
pub use source::{IndicatorSnapshot, IndicatorSource};
