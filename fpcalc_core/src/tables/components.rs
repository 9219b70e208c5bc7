//! Component Coefficients (ASCE/SEI 7-22 Tables 13.5-1 and 13.6-1)
//!
//! Each row carries the 7-22 factors (CAR for both support locations, Rpo,
//! Ω0p), optionally the 7-16 factors (ap, Rp, Ω0), and optionally a distinct
//! set of factors for the flexible / flexibly-mounted condition.
//!
//! Subtypes are string keys: the lists are long and edited as data, so they
//! stay in `data/architectural.toml` and `data/mechanical.toml`.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Component category (selects the table)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentCategory {
    /// Architectural components (Table 13.5-1)
    #[default]
    Architectural,
    /// Mechanical and electrical components (Table 13.6-1)
    MechanicalElectrical,
}

impl ComponentCategory {
    /// All categories for UI selection
    pub const ALL: [ComponentCategory; 2] = [
        ComponentCategory::Architectural,
        ComponentCategory::MechanicalElectrical,
    ];

    /// Table name used in errors and logs
    pub fn table_name(&self) -> &'static str {
        match self {
            ComponentCategory::Architectural => "architectural component",
            ComponentCategory::MechanicalElectrical => "mechanical/electrical component",
        }
    }

    /// Code table reference
    pub fn code_table(&self) -> &'static str {
        match self {
            ComponentCategory::Architectural => "Table 13.5-1",
            ComponentCategory::MechanicalElectrical => "Table 13.6-1",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().replace([' ', '_', '/'], "-").as_str() {
            "architectural" | "arch" => Ok(ComponentCategory::Architectural),
            "mechanical-electrical" | "mechanical" | "electrical" | "mech" | "mep" => {
                Ok(ComponentCategory::MechanicalElectrical)
            }
            _ => Err(CalcError::unknown_key("component category", s)),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            ComponentCategory::Architectural => "Architectural",
            ComponentCategory::MechanicalElectrical => "Mechanical/Electrical",
        }
    }
}

impl std::fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Where the component is supported, which selects the CAR column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SupportLocation {
    /// Supported at or below grade (z = 0)
    AtOrBelowGrade,
    /// Supported above grade (z > 0)
    AboveGrade,
}

impl SupportLocation {
    /// Location implied by the attachment elevation
    pub fn from_elevation(elevation_ft: f64) -> Self {
        if elevation_ft > 0.0 {
            SupportLocation::AboveGrade
        } else {
            SupportLocation::AtOrBelowGrade
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            SupportLocation::AtOrBelowGrade => "Supported at or below grade",
            SupportLocation::AboveGrade => "Supported above grade",
        }
    }
}

impl std::fmt::Display for SupportLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// ASCE 7-16 component factors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegacyComponentFactors {
    /// Component amplification factor ap
    pub ap: f64,
    /// Component response modification factor Rp
    pub rp: f64,
    /// Overstrength factor Ω0
    pub omega_0p: f64,
}

/// One set of 7-22 factors (rigid default or flexible variant)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentVariant {
    /// CAR for components supported at or below grade
    pub car_at_or_below_grade: f64,
    /// CAR for components supported above grade
    pub car_above_grade: f64,
    /// Component strength factor Rpo
    pub rpo: f64,
    /// Component overstrength factor Ω0p
    pub omega_0p: f64,
    /// ASCE 7-16 factors, when the row exists in the older table
    #[serde(default)]
    pub legacy: Option<LegacyComponentFactors>,
}

impl ComponentVariant {
    /// CAR for the given support location
    pub fn car(&self, location: SupportLocation) -> f64 {
        match location {
            SupportLocation::AtOrBelowGrade => self.car_at_or_below_grade,
            SupportLocation::AboveGrade => self.car_above_grade,
        }
    }

    fn coefficients(&self) -> Vec<(&'static str, f64)> {
        let mut values = vec![
            ("car_at_or_below_grade", self.car_at_or_below_grade),
            ("car_above_grade", self.car_above_grade),
            ("rpo", self.rpo),
            ("omega_0p", self.omega_0p),
        ];
        if let Some(legacy) = &self.legacy {
            values.push(("legacy.ap", legacy.ap));
            values.push(("legacy.rp", legacy.rp));
            values.push(("legacy.omega_0p", legacy.omega_0p));
        }
        values
    }
}

/// A component table row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord {
    /// Table key (e.g. "wet-side-hvac")
    pub key: String,
    /// Description as printed in the code table
    pub name: String,
    /// Default (rigid mount) factors
    pub factors: ComponentVariant,
    /// Factors for the flexible / flexibly-mounted condition, when distinct
    pub flexible: Option<ComponentVariant>,
}

impl ComponentRecord {
    /// Factors for the requested mounting condition.
    ///
    /// Returns the variant and whether the flexible row was used. A flexible
    /// request falls back to the default row when the table has no distinct
    /// flexible entry.
    pub fn variant(&self, flexible: bool) -> (&ComponentVariant, bool) {
        match (&self.flexible, flexible) {
            (Some(variant), true) => (variant, true),
            _ => (&self.factors, false),
        }
    }

    /// Every coefficient in the row, labelled, for load-time validation
    pub(crate) fn coefficients(&self) -> Vec<(String, f64)> {
        let mut values: Vec<(String, f64)> = self
            .factors
            .coefficients()
            .into_iter()
            .map(|(label, v)| (label.to_string(), v))
            .collect();
        if let Some(flexible) = &self.flexible {
            values.extend(
                flexible
                    .coefficients()
                    .into_iter()
                    .map(|(label, v)| (format!("flexible.{}", label), v)),
            );
        }
        values
    }
}

/// Raw TOML row
#[derive(Debug, Deserialize)]
pub(crate) struct ComponentRow {
    pub key: String,
    pub name: String,
    pub car_at_or_below_grade: f64,
    pub car_above_grade: f64,
    pub rpo: f64,
    pub omega_0p: f64,
    #[serde(default)]
    pub legacy: Option<LegacyComponentFactors>,
    #[serde(default)]
    pub flexible: Option<ComponentVariant>,
}

impl From<ComponentRow> for ComponentRecord {
    fn from(row: ComponentRow) -> Self {
        ComponentRecord {
            key: row.key,
            name: row.name,
            factors: ComponentVariant {
                car_at_or_below_grade: row.car_at_or_below_grade,
                car_above_grade: row.car_above_grade,
                rpo: row.rpo,
                omega_0p: row.omega_0p,
                legacy: row.legacy,
            },
            flexible: row.flexible,
        }
    }
}

/// Normalize a subtype key or name for lookup: case, separators and runs of
/// whitespace are ignored.
pub(crate) fn normalize_subtype(s: &str) -> String {
    s.split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}
