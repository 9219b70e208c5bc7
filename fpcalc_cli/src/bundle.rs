//! Input bundle: an [`FpInput`] whose SDS may still need a lookup.

use fpcalc_core::calculations::{CodeEditions, ComponentProfile, FpInput, StructureProfile};
use fpcalc_core::occupancy::OccupancyProfile;
use fpcalc_core::site::{SdsInput, SiteProfile};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputBundle {
    #[serde(default)]
    pub label: String,
    pub structure: StructureProfile,
    pub component: ComponentProfile,
    #[serde(default)]
    pub occupancy: OccupancyProfile,
    pub sds: SdsInput,
    #[serde(default)]
    pub wp_lb: f64,
    #[serde(default)]
    pub editions: CodeEditions,
}

impl InputBundle {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        let mut bundle: InputBundle = serde_json::from_str(text)?;
        bundle.sync_lookup_risk_category();
        Ok(bundle)
    }

    /// The hazard lookup is always made for the occupancy risk category.
    fn sync_lookup_risk_category(&mut self) {
        if let SdsInput::Lookup(query) = &mut self.sds {
            query.risk_category = self.occupancy.risk_category;
        }
    }

    pub fn with_sds(mut self, sds: SdsInput) -> Self {
        self.sds = sds;
        self.sync_lookup_risk_category();
        self
    }

    /// Engine input once SDS is known
    pub fn into_input(self, site: SiteProfile) -> FpInput {
        FpInput {
            label: self.label,
            structure: self.structure,
            component: self.component,
            occupancy: self.occupancy,
            site,
            wp_lb: self.wp_lb,
            editions: self.editions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fpcalc_core::occupancy::RiskCategory;
    use fpcalc_core::site::{SiteClass, SiteQuery};

    const BUNDLE: &str = r#"{
        "label": "AHU-1",
        "structure": {
            "structure_type": "steel-moment-frame",
            "resisting_system": {"mode": "tabulated", "system": "special-steel-moment-frame"},
            "height_ft": 40.0,
            "elevation_ft": 40.0
        },
        "component": {"category": "mechanical-electrical", "subtype": "air-side-hvac"},
        "occupancy": {"risk_category": "IV"},
        "sds": {"mode": "lookup", "latitude": 37.8, "longitude": -122.27, "site_class": "D"},
        "wp_lb": 1500.0
    }"#;

    #[test]
    fn test_lookup_takes_occupancy_risk_category() {
        let bundle = InputBundle::from_json(BUNDLE).unwrap();
        match &bundle.sds {
            SdsInput::Lookup(query) => {
                assert_eq!(query.site_class, SiteClass::D);
                assert_eq!(query.risk_category, RiskCategory::IV);
            }
            other => panic!("expected lookup, got {:?}", other),
        }
        assert!(bundle.editions.asce7_22);
    }

    #[test]
    fn test_manual_override() {
        let bundle = InputBundle::from_json(BUNDLE)
            .unwrap()
            .with_sds(SdsInput::Manual { sds_g: 0.9 });
        assert_eq!(bundle.sds, SdsInput::Manual { sds_g: 0.9 });
    }

    #[test]
    fn test_into_input_carries_fields() {
        let input = InputBundle::from_json(BUNDLE)
            .unwrap()
            .into_input(SiteProfile::new(1.1));
        assert_eq!(input.label, "AHU-1");
        assert_eq!(input.site.sds_g, 1.1);
        assert_eq!(input.wp_lb, 1500.0);
        assert_eq!(input.occupancy.risk_category, RiskCategory::IV);
    }

    #[test]
    fn test_with_sds_lookup_syncs_category() {
        let query = SiteQuery {
            latitude: 34.05,
            longitude: -118.25,
            site_class: SiteClass::Default,
            risk_category: RiskCategory::I,
        };
        let bundle = InputBundle::from_json(BUNDLE).unwrap().with_sds(SdsInput::Lookup(query));
        match bundle.sds {
            SdsInput::Lookup(q) => assert_eq!(q.risk_category, RiskCategory::IV),
            other => panic!("expected lookup, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_weight_defaults_to_zero() {
        let text = BUNDLE.replace(",\n        \"wp_lb\": 1500.0", "");
        assert!(!text.contains("wp_lb"));
        let input = InputBundle::from_json(&text)
            .unwrap()
            .into_input(SiteProfile::new(1.0));
        assert_eq!(input.wp_lb, 0.0);
        let result = fpcalc_core::calculations::calculate_bundled(&input).unwrap();
        assert_eq!(result.fp_lb(), Some(0.0));
    }
}
