//! Application state for the labor entitlements API.

use std::sync::Arc;

use crate::config::EconomicConfig;
use crate::indicators::{IndicatorOrigin, IndicatorService};

/// Shared application state.
///
/// Handlers take one configuration snapshot per request, so a refresh that
/// lands mid-request never changes the values a calculation sees.
#[derive(Clone)]
pub struct AppState {
    indicators: Arc<IndicatorService>,
}

impl AppState {
    /// Creates a new application state around an indicator service.
    pub fn new(indicators: Arc<IndicatorService>) -> Self {
        Self { indicators }
    }

    /// Creates a state serving a fixed configuration.
    pub fn from_config(config: EconomicConfig) -> Self {
        Self::new(Arc::new(IndicatorService::new(config)))
    }

    /// Returns the configuration currently in effect.
    pub fn config(&self) -> Arc<EconomicConfig> {
        self.indicators.snapshot()
    }

    /// Returns where the current indicators came from.
    pub fn origin(&self) -> IndicatorOrigin {
        self.indicators.origin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_fixed_config_state() {
        let state = AppState::from_config(EconomicConfig::default());
        assert_eq!(*state.config(), EconomicConfig::default());
        assert_eq!(state.origin(), IndicatorOrigin::Configured);
    }
}
