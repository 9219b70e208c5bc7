//! Street address to coordinates via a Nominatim search endpoint.
//!
//! Requests are spaced at least `min_interval_ms` apart and successful
//! results are memoized for `cache_ttl_secs`. Every failure surfaces as
//! `SiteDataUnavailable` so the user can fall back to `--lat/--lon` or
//! `--sds`.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use fpcalc_core::errors::{CalcError, CalcResult};
use reqwest::Client;
use serde::Deserialize;

use crate::config::GeocodeConfig;
use crate::error::CliResult;
use crate::http::{self, TtlCache};

/// A resolved address
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedSite {
    pub latitude: f64,
    pub longitude: f64,
    /// Place name as returned by the service
    pub display_name: String,
}

/// Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

fn coordinate(field: &str, text: &str, limit: f64) -> CalcResult<f64> {
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v.abs() <= limit => Ok(v),
        _ => Err(CalcError::site_data_unavailable(format!(
            "geocoder returned {} = {:?}",
            field, text
        ))),
    }
}

/// First match of a Nominatim `format=json` search body.
pub(crate) fn parse_place(body: &str) -> CalcResult<GeocodedSite> {
    let places: Vec<Place> = serde_json::from_str(body).map_err(|e| {
        CalcError::site_data_unavailable(format!("malformed geocoder response: {}", e))
    })?;
    let place = places
        .into_iter()
        .next()
        .ok_or_else(|| CalcError::site_data_unavailable("address not found"))?;
    Ok(GeocodedSite {
        latitude: coordinate("lat", &place.lat, 90.0)?,
        longitude: coordinate("lon", &place.lon, 180.0)?,
        display_name: place.display_name,
    })
}

fn cache_key(address: &str) -> String {
    address.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

pub struct Nominatim {
    client: Client,
    config: GeocodeConfig,
    cache: TtlCache<GeocodedSite>,
    next_slot: Mutex<Option<Instant>>,
}

impl Nominatim {
    pub fn new(config: GeocodeConfig) -> CliResult<Self> {
        Ok(Nominatim {
            client: http::client(config.timeout_secs)?,
            cache: TtlCache::new(config.cache_ttl_secs),
            next_slot: Mutex::new(None),
            config,
        })
    }

    fn query_params<'a>(&self, address: &'a str) -> [(&'static str, &'a str); 3] {
        [("q", address), ("format", "json"), ("limit", "1")]
    }

    /// Reserve the next request slot; returns how long to wait for it.
    fn reserve_slot(&self) -> Duration {
        let interval = Duration::from_millis(self.config.min_interval_ms);
        let Ok(mut next) = self.next_slot.lock() else {
            return Duration::ZERO;
        };
        let now = Instant::now();
        let start = (*next).map_or(now, |slot| slot.max(now));
        *next = Some(start + interval);
        start - now
    }

    async fn request(&self, address: &str) -> CalcResult<GeocodedSite> {
        let wait = self.reserve_slot();
        if !wait.is_zero() {
            tracing::debug!(wait_ms = wait.as_millis() as u64, "geocoder rate limit");
            tokio::time::sleep(wait).await;
        }

        tracing::info!(address, "geocoding address");
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&self.query_params(address))
            .send()
            .await
            .map_err(|e| CalcError::site_data_unavailable(format!("network error: {}", e)))?;

        if !response.status().is_success() {
            return Err(CalcError::site_data_unavailable(format!(
                "geocoder returned HTTP {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CalcError::site_data_unavailable(format!("failed to read response: {}", e)))?;
        parse_place(&body)
    }

    /// Resolve a street address to coordinates.
    pub async fn geocode(&self, address: &str) -> CalcResult<GeocodedSite> {
        let key = cache_key(address);
        if key.is_empty() {
            return Err(CalcError::invalid_input("address", address, "Address is empty"));
        }
        if let Some(site) = self.cache.get(&key) {
            tracing::debug!(address = %key, "geocoder cache hit");
            return Ok(site);
        }

        match self.request(address.trim()).await {
            Ok(site) => {
                tracing::info!(
                    latitude = site.latitude,
                    longitude = site.longitude,
                    place = %site.display_name,
                    "address geocoded"
                );
                self.cache.insert(key, site.clone());
                Ok(site)
            }
            Err(e) => {
                tracing::warn!(error = %e, address, "geocoding failed");
                Err(e)
            }
        }
    }
}
