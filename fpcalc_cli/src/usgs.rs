//! SDS lookup against the USGS seismic design-maps web service.
//!
//! Successful lookups are memoized in-process for `cache_ttl_secs`, keyed on
//! the coordinates rounded to six decimals (as sent), site class and risk
//! category.

use fpcalc_core::errors::{CalcError, CalcResult};
use fpcalc_core::site::{SiteAccelerationProvider, SiteQuery};
use reqwest::Client;
use serde::Deserialize;

use crate::config::UsgsConfig;
use crate::error::CliResult;
use crate::http::{self, coordinate, TtlCache};

#[derive(Debug, Deserialize)]
struct UsgsEnvelope {
    response: UsgsResponse,
}

#[derive(Debug, Deserialize)]
struct UsgsResponse {
    data: UsgsData,
}

#[derive(Debug, Deserialize)]
struct UsgsData {
    sds: Option<f64>,
}

/// Pull `response.data.sds` out of a design-maps JSON body.
pub(crate) fn parse_sds(body: &str) -> CalcResult<f64> {
    let envelope: UsgsEnvelope = serde_json::from_str(body)
        .map_err(|e| CalcError::site_data_unavailable(format!("malformed USGS response: {}", e)))?;
    match envelope.response.data.sds {
        Some(sds) if sds.is_finite() && sds > 0.0 => Ok(sds),
        Some(sds) => Err(CalcError::site_data_unavailable(format!(
            "USGS returned SDS = {}",
            sds
        ))),
        None => Err(CalcError::site_data_unavailable(
            "USGS response has no SDS value for this location",
        )),
    }
}

fn cache_key(query: &SiteQuery) -> String {
    format!(
        "{},{},{},{}",
        coordinate(query.latitude),
        coordinate(query.longitude),
        query.site_class.code(),
        query.risk_category.code()
    )
}

pub struct UsgsDesignMaps {
    client: Client,
    config: UsgsConfig,
    cache: TtlCache<f64>,
}

impl UsgsDesignMaps {
    pub fn new(config: UsgsConfig) -> CliResult<Self> {
        Ok(UsgsDesignMaps {
            client: http::client(config.timeout_secs)?,
            cache: TtlCache::new(config.cache_ttl_secs),
            config,
        })
    }

    /// Query string; coordinates rounded the same way as the cache key.
    fn query_params(&self, query: &SiteQuery) -> [(&'static str, String); 5] {
        [
            ("latitude", coordinate(query.latitude)),
            ("longitude", coordinate(query.longitude)),
            ("riskCategory", query.risk_category.code().to_string()),
            ("siteClass", query.site_class.code().to_string()),
            ("title", self.config.title.clone()),
        ]
    }

    async fn request(&self, query: &SiteQuery) -> CalcResult<f64> {
        tracing::info!(
            latitude = query.latitude,
            longitude = query.longitude,
            site_class = query.site_class.code(),
            risk_category = query.risk_category.code(),
            "requesting SDS from USGS"
        );

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&self.query_params(query))
            .send()
            .await
            .map_err(|e| CalcError::site_data_unavailable(format!("network error: {}", e)))?;

        if !response.status().is_success() {
            return Err(CalcError::site_data_unavailable(format!(
                "USGS returned HTTP {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CalcError::site_data_unavailable(format!("failed to read response: {}", e)))?;
        parse_sds(&body)
    }
}

impl SiteAccelerationProvider for UsgsDesignMaps {
    async fn fetch_sds(&self, query: &SiteQuery) -> CalcResult<f64> {
        let key = cache_key(query);
        if let Some(sds_g) = self.cache.get(&key) {
            tracing::debug!(key = %key, sds_g, "USGS cache hit");
            return Ok(sds_g);
        }

        match self.request(query).await {
            Ok(sds_g) => {
                self.cache.insert(key, sds_g);
                Ok(sds_g)
            }
            Err(e) => {
                tracing::warn!(error = %e, "USGS lookup failed");
                Err(e)
            }
        }
    }
}
