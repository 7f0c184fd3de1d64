//! Indicator source backed by the mindicador.cl public API.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::error::IndicatorError;

use super::source::{IndicatorSnapshot, IndicatorSource};

/// The public endpoint returning the day's indicators.
pub const MINDICADOR_URL: &str = "https://mindicador.cl/api";

#[derive(Debug, Deserialize)]
struct DailyResponse {
    uf: Option<Indicator>,
    utm: Option<Indicator>,
}

#[derive(Debug, Deserialize)]
struct Indicator {
    valor: serde_json::Number,
    #[serde(default)]
    fecha: Option<String>,
}

/// Fetches UF and UTM from mindicador.cl.
#[derive(Debug, Clone)]
pub struct MindicadorSource {
    client: Client,
    url: String,
}

impl MindicadorSource {
    /// Creates a source for `url` with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`IndicatorError::Request`] if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, IndicatorError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

fn parse_value(name: &str, indicator: Option<&Indicator>) -> Result<Decimal, IndicatorError> {
    let indicator = indicator.ok_or_else(|| IndicatorError::Missing {
        indicator: name.to_string(),
    })?;
    let raw = indicator.valor.to_string();
    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|_| IndicatorError::InvalidValue {
            indicator: name.to_string(),
            value: raw,
        })
}

/// Reads the publication date, e.g. `2026-02-01T03:00:00.000Z`.
fn parse_date(fecha: Option<&str>) -> Option<NaiveDate> {
    let fecha = fecha?;
    DateTime::parse_from_rfc3339(fecha)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| fecha.get(..10).and_then(|d| NaiveDate::from_str(d).ok()))
}

fn parse_snapshot(body: &str) -> Result<IndicatorSnapshot, IndicatorError> {
    let response: DailyResponse =
        serde_json::from_str(body).map_err(|e| IndicatorError::InvalidValue {
            indicator: "response".to_string(),
            value: e.to_string(),
        })?;

    let uf = parse_value("uf", response.uf.as_ref())?;
    let utm = parse_value("utm", response.utm.as_ref())?;
    let effective_date = parse_date(response.uf.as_ref().and_then(|i| i.fecha.as_deref()))
        .unwrap_or_else(|| Utc::now().date_naive());

    let snapshot = IndicatorSnapshot {
        uf,
        utm,
        effective_date,
    };
    snapshot.validate()?;
    Ok(snapshot)
}

#[async_trait]
impl IndicatorSource for MindicadorSource {
    fn name(&self) -> &str {
        "mindicador"
    }

    async fn fetch(&self) -> Result<IndicatorSnapshot, IndicatorError> {
        debug!(url = %self.url, "Fetching indicators");

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IndicatorError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_snapshot(&body)
    }
}
