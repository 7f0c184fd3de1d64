//! Local JSON cache of the last indicators fetched successfully.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::IndicatorError;

use super::source::ensure_positive;

/// The cached record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedIndicators {
    /// Unidad de Fomento.
    pub uf: Decimal,
    /// Unidad Tributaria Mensual.
    pub utm: Decimal,
    /// Ingreso Mínimo Mensual, when known.
    #[serde(default)]
    pub imm: Option<Decimal>,
    /// The date the values apply to.
    pub effective_date: NaiveDate,
    /// When the values were cached.
    pub timestamp: DateTime<Utc>,
}

/// A JSON file holding the last good indicators.
#[derive(Debug, Clone)]
pub struct IndicatorCache {
    path: PathBuf,
}

impl IndicatorCache {
    /// Creates a cache backed by `path`. The file need not exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the cache file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the cached indicators.
    ///
    /// Returns `None` when the file is absent, unreadable, or holds a
    /// non-positive UF or UTM.
    pub fn load(&self) -> Option<CachedIndicators> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Could not read indicator cache");
                return None;
            }
        };

        let cached: CachedIndicators = match serde_json::from_str(&content) {
            Ok(cached) => cached,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Could not parse indicator cache");
                return None;
            }
        };

        let valid = ensure_positive("uf", cached.uf)
            .and_then(|_| ensure_positive("utm", cached.utm))
            .and_then(|_| match cached.imm {
                Some(imm) => ensure_positive("imm", imm),
                None => Ok(()),
            });
        match valid {
            Ok(()) => Some(cached),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring invalid indicator cache");
                None
            }
        }
    }

    /// Writes indicators to the cache, replacing its contents.
    ///
    /// # Errors
    ///
    /// Returns [`IndicatorError::Cache`] if the file cannot be written.
    pub fn store(&self, cached: &CachedIndicators) -> Result<(), IndicatorError> {
        let to_cache_error = |message: String| IndicatorError::Cache {
            path: self.path.display().to_string(),
            message,
        };

        let json = serde_json::to_string_pretty(cached).map_err(|e| to_cache_error(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| to_cache_error(e.to_string()))?;
        }
        fs::write(&self.path, json).map_err(|e| to_cache_error(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cached(uf: i64) -> CachedIndicators {
        CachedIndicators {
            uf: Decimal::from(uf),
            utm: Decimal::new(69611, 0),
            imm: Some(Decimal::new(539000, 0)),
            effective_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            timestamp: DateTime::parse_from_rfc3339("2026-02-01T12:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    #[test]
    fn test_store_then_load() {
        let dir = TempDir::new().unwrap();
        let cache = IndicatorCache::new(dir.path().join("nested").join("indicators.json"));

        cache.store(&cached(39683)).unwrap();
        assert_eq!(cache.load(), Some(cached(39683)));
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let cache = IndicatorCache::new(dir.path().join("absent.json"));
        assert_eq!(cache.load(), None);
    }

    #[test]
    fn test_invalid_values_are_ignored() {
        let dir = TempDir::new().unwrap();
        let cache = IndicatorCache::new(dir.path().join("indicators.json"));
        cache.store(&cached(0)).unwrap();
        assert_eq!(cache.load(), None);
    }

    #[test]
    fn test_garbage_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("indicators.json");
        fs::write(&path, "not json").unwrap();
        assert_eq!(IndicatorCache::new(path).load(), None);
    }
}
