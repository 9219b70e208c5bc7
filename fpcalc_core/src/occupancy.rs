//! Occupancy and Importance Factors
//!
//! Risk category drives the structure importance factor Ie (ASCE/SEI 7-22
//! Table 1.5-2). The component importance factor Ip (Section 13.1.3) defaults
//! from the risk category but is an engineering decision and can be set
//! explicitly.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Risk category per ASCE 7 Table 1.5-1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RiskCategory {
    I,
    #[default]
    II,
    III,
    IV,
}

impl RiskCategory {
    /// All risk categories for UI selection
    pub const ALL: [RiskCategory; 4] = [
        RiskCategory::I,
        RiskCategory::II,
        RiskCategory::III,
        RiskCategory::IV,
    ];

    /// Seismic importance factor Ie
    pub fn importance_factor(&self) -> f64 {
        match self {
            RiskCategory::I | RiskCategory::II => 1.0,
            RiskCategory::III => 1.25,
            RiskCategory::IV => 1.5,
        }
    }

    /// Roman numeral, also the USGS `riskCategory` query value
    pub fn code(&self) -> &'static str {
        match self {
            RiskCategory::I => "I",
            RiskCategory::II => "II",
            RiskCategory::III => "III",
            RiskCategory::IV => "IV",
        }
    }

    /// Parse roman or arabic numerals
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_uppercase().as_str() {
            "I" | "1" => Ok(RiskCategory::I),
            "II" | "2" => Ok(RiskCategory::II),
            "III" | "3" => Ok(RiskCategory::III),
            "IV" | "4" => Ok(RiskCategory::IV),
            _ => Err(CalcError::unknown_key("risk category", s)),
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Risk Category {}", self.code())
    }
}

/// Component importance per ASCE 7-22 Section 13.1.3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentImportance {
    /// Ip = 1.0
    Standard,
    /// Ip = 1.5 (life-safety, hazardous contents, or needed after the event)
    Essential,
}

impl ComponentImportance {
    /// Component importance factor Ip
    pub fn factor(&self) -> f64 {
        match self {
            ComponentImportance::Standard => 1.0,
            ComponentImportance::Essential => 1.5,
        }
    }

    /// Default for a risk category: components of Risk Category IV structures
    /// are treated as essential.
    pub fn default_for(risk_category: RiskCategory) -> Self {
        match risk_category {
            RiskCategory::IV => ComponentImportance::Essential,
            _ => ComponentImportance::Standard,
        }
    }

    /// Recover the variant from a numeric Ip (1.0 or 1.5 only)
    pub fn from_factor(ip: f64) -> CalcResult<Self> {
        if ip == 1.0 {
            Ok(ComponentImportance::Standard)
        } else if ip == 1.5 {
            Ok(ComponentImportance::Essential)
        } else {
            Err(CalcError::invalid_input(
                "ip",
                ip.to_string(),
                "Component importance factor must be 1.0 or 1.5",
            ))
        }
    }
}

impl std::fmt::Display for ComponentImportance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ip = {:.1}", self.factor())
    }
}

/// Occupancy inputs for one calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct OccupancyProfile {
    pub risk_category: RiskCategory,
    /// Explicit component importance; `None` uses the risk-category default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_importance: Option<ComponentImportance>,
}

impl OccupancyProfile {
    pub fn new(risk_category: RiskCategory) -> Self {
        OccupancyProfile {
            risk_category,
            component_importance: None,
        }
    }

    /// Override the component importance
    pub fn with_component_importance(mut self, importance: ComponentImportance) -> Self {
        self.component_importance = Some(importance);
        self
    }

    /// Resolved component importance
    pub fn component_importance(&self) -> ComponentImportance {
        self.component_importance
            .unwrap_or_else(|| ComponentImportance::default_for(self.risk_category))
    }

    /// Structure importance factor Ie
    pub fn ie(&self) -> f64 {
        self.risk_category.importance_factor()
    }

    /// Component importance factor Ip
    pub fn ip(&self) -> f64 {
        self.component_importance().factor()
    }
}
