//! # Site Acceleration
//!
//! The engine consumes an already-resolved short-period design spectral
//! acceleration (SDS). Where that value comes from is the caller's business:
//! typed in by the user, or fetched from a hazard service through a
//! [`SiteAccelerationProvider`].
//!
//! A provider failure is reported as [`CalcError::SiteDataUnavailable`] and
//! never as `InvalidInput`, so a front end can offer manual entry instead of
//! asking the user to fix an input.
//!
//! ```rust
//! use fpcalc_core::site::{resolve_sds, SdsInput, SiteAccelerationProvider, SiteQuery};
//! use fpcalc_core::CalcResult;
//!
//! struct Fixed(f64);
//!
//! impl SiteAccelerationProvider for Fixed {
//!     async fn fetch_sds(&self, _query: &SiteQuery) -> CalcResult<f64> {
//!         Ok(self.0)
//!     }
//! }
//!
//! # tokio_test_block(async {
//! let site = resolve_sds(&SdsInput::Manual { sds_g: 1.2 }, &Fixed(0.5)).await.unwrap();
//! assert_eq!(site.sds_g, 1.2);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f);
//! # }
//! ```

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::errors::{require_positive, CalcError, CalcResult};
use crate::occupancy::RiskCategory;

/// Site class per ASCE 7-22 Section 20.2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SiteClass {
    A,
    B,
    BC,
    C,
    CD,
    D,
    DE,
    E,
    /// Site class not determined; the service applies the default rules
    #[default]
    Default,
}

impl SiteClass {
    /// All site classes for UI selection
    pub const ALL: [SiteClass; 9] = [
        SiteClass::A,
        SiteClass::B,
        SiteClass::BC,
        SiteClass::C,
        SiteClass::CD,
        SiteClass::D,
        SiteClass::DE,
        SiteClass::E,
        SiteClass::Default,
    ];

    /// Query value understood by the USGS design-maps service
    pub fn code(&self) -> &'static str {
        match self {
            SiteClass::A => "A",
            SiteClass::B => "B",
            SiteClass::BC => "BC",
            SiteClass::C => "C",
            SiteClass::CD => "CD",
            SiteClass::D => "D",
            SiteClass::DE => "DE",
            SiteClass::E => "E",
            SiteClass::Default => "Default",
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            SiteClass::A => "A - Hard rock",
            SiteClass::B => "B - Medium hard rock",
            SiteClass::BC => "BC - Soft rock",
            SiteClass::C => "C - Very dense sand or hard clay",
            SiteClass::CD => "CD - Dense sand or very stiff clay",
            SiteClass::D => "D - Medium dense sand or stiff clay",
            SiteClass::DE => "DE - Loose sand or medium stiff clay",
            SiteClass::E => "E - Very loose sand or soft clay",
            SiteClass::Default => "Default",
        }
    }

    /// Parse a site class code, ignoring case
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CalcError::unknown_key("site class", s))
    }
}

impl std::fmt::Display for SiteClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Resolved site seismicity used by the engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteProfile {
    /// Short-period design spectral acceleration SDS (g)
    pub sds_g: f64,
}

impl SiteProfile {
    pub fn new(sds_g: f64) -> Self {
        SiteProfile { sds_g }
    }
}

/// Parameters for a hazard-service lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteQuery {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    #[serde(default)]
    pub site_class: SiteClass,
    #[serde(default)]
    pub risk_category: RiskCategory,
}

impl SiteQuery {
    /// Check coordinates are finite and on the globe
    pub fn validate(&self) -> CalcResult<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(CalcError::invalid_input(
                "latitude",
                self.latitude.to_string(),
                "Latitude must be between -90 and 90 degrees",
            ));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(CalcError::invalid_input(
                "longitude",
                self.longitude.to_string(),
                "Longitude must be between -180 and 180 degrees",
            ));
        }
        Ok(())
    }
}

/// How SDS is supplied in an input bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SdsInput {
    /// User-entered value; always bypasses the provider
    Manual { sds_g: f64 },
    /// Look the value up for a location
    Lookup(SiteQuery),
}

/// Source of site-specific SDS values.
///
/// Implementations return a positive finite SDS in g, or
/// [`CalcError::SiteDataUnavailable`] on any failure (network, coverage,
/// malformed response).
pub trait SiteAccelerationProvider {
    fn fetch_sds(&self, query: &SiteQuery) -> impl Future<Output = CalcResult<f64>> + Send;
}

/// Resolve an [`SdsInput`] to a [`SiteProfile`].
pub async fn resolve_sds<P>(input: &SdsInput, provider: &P) -> CalcResult<SiteProfile>
where
    P: SiteAccelerationProvider + ?Sized,
{
    match input {
        SdsInput::Manual { sds_g } => {
            let sds_g = require_positive("sds_g", *sds_g)?;
            Ok(SiteProfile::new(sds_g))
        }
        SdsInput::Lookup(query) => {
            query.validate()?;
            let sds_g = provider.fetch_sds(query).await.map_err(|e| match e {
                CalcError::SiteDataUnavailable { .. } => e,
                other => CalcError::site_data_unavailable(other.to_string()),
            })?;
            if !sds_g.is_finite() || sds_g <= 0.0 {
                tracing::warn!(sds_g, "site provider returned an unusable SDS");
                return Err(CalcError::site_data_unavailable(format!(
                    "provider returned SDS = {}",
                    sds_g
                )));
            }
            tracing::debug!(
                latitude = query.latitude,
                longitude = query.longitude,
                sds_g,
                "resolved SDS from provider"
            );
            Ok(SiteProfile::new(sds_g))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeProvider {
        result: CalcResult<f64>,
        calls: AtomicUsize,
    }

    impl FakeProvider {
        fn returning(result: CalcResult<f64>) -> Self {
            FakeProvider {
                result,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl SiteAccelerationProvider for FakeProvider {
        async fn fetch_sds(&self, _query: &SiteQuery) -> CalcResult<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn query() -> SiteQuery {
        SiteQuery {
            latitude: 37.77,
            longitude: -122.42,
            site_class: SiteClass::D,
            risk_category: RiskCategory::II,
        }
    }

    #[tokio::test]
    async fn test_manual_bypasses_provider() {
        let provider = FakeProvider::returning(Ok(0.5));
        let site = resolve_sds(&SdsInput::Manual { sds_g: 1.0 }, &provider)
            .await
            .unwrap();
        assert_eq!(site.sds_g, 1.0);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_manual_zero_is_invalid_input() {
        let provider = FakeProvider::returning(Ok(0.5));
        let err = resolve_sds(&SdsInput::Manual { sds_g: 0.0 }, &provider)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_lookup_delegates() {
        let provider = FakeProvider::returning(Ok(1.304));
        let site = resolve_sds(&SdsInput::Lookup(query()), &provider)
            .await
            .unwrap();
        assert_eq!(site.sds_g, 1.304);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_provider_failure_is_recoverable() {
        let provider = FakeProvider::returning(Err(CalcError::site_data_unavailable("offline")));
        let err = resolve_sds(&SdsInput::Lookup(query()), &provider)
            .await
            .unwrap_err();
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_bad_provider_value_is_site_error() {
        for bad in [0.0, -0.2, f64::NAN] {
            let provider = FakeProvider::returning(Ok(bad));
            let err = resolve_sds(&SdsInput::Lookup(query()), &provider)
                .await
                .unwrap_err();
            assert_eq!(err.error_code(), "SITE_DATA_UNAVAILABLE");
        }
    }

    #[tokio::test]
    async fn test_other_provider_errors_are_rewrapped() {
        let provider = FakeProvider::returning(Err(CalcError::Internal {
            message: "parse failure".to_string(),
        }));
        let err = resolve_sds(&SdsInput::Lookup(query()), &provider)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "SITE_DATA_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_bad_coordinates_rejected_before_lookup() {
        let provider = FakeProvider::returning(Ok(1.0));
        let mut q = query();
        q.latitude = 91.0;
        let err = resolve_sds(&SdsInput::Lookup(q), &provider).await.unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_site_class_codes() {
        assert_eq!(SiteClass::from_str_flexible("cd").unwrap(), SiteClass::CD);
        assert_eq!(SiteClass::from_str_flexible("default").unwrap(), SiteClass::Default);
        assert!(SiteClass::from_str_flexible("F").is_err());
    }

    #[test]
    fn test_sds_input_serialization() {
        let json = r#"{"mode":"manual","sds_g":1.0}"#;
        let input: SdsInput = serde_json::from_str(json).unwrap();
        assert_eq!(input, SdsInput::Manual { sds_g: 1.0 });

        let json = r#"{"mode":"lookup","latitude":34.05,"longitude":-118.25,"site_class":"CD"}"#;
        let input: SdsInput = serde_json::from_str(json).unwrap();
        match input {
            SdsInput::Lookup(q) => {
                assert_eq!(q.site_class, SiteClass::CD);
                assert_eq!(q.risk_category, RiskCategory::II);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
