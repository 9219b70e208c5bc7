//! Approximate Period Parameters (ASCE/SEI 7-22 Table 12.8-2)
//!
//! Structure types and the `Ct`/`x` pair used in `Ta = Ct · hn^x`.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Structure type per ASCE 7-22 Table 12.8-2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StructureType {
    /// Steel moment-resisting frames
    SteelMomentFrame,
    /// Concrete moment-resisting frames
    ConcreteMomentFrame,
    /// Steel eccentrically braced frames
    SteelEccentricallyBracedFrame,
    /// Steel buckling-restrained braced frames
    SteelBucklingRestrainedBracedFrame,
    /// All other structural systems
    AllOther,
}

impl StructureType {
    /// All structure types for UI selection
    pub const ALL: [StructureType; 5] = [
        StructureType::SteelMomentFrame,
        StructureType::ConcreteMomentFrame,
        StructureType::SteelEccentricallyBracedFrame,
        StructureType::SteelBucklingRestrainedBracedFrame,
        StructureType::AllOther,
    ];

    /// Key used in the period table
    pub fn code(&self) -> &'static str {
        match self {
            StructureType::SteelMomentFrame => "steel-moment-frame",
            StructureType::ConcreteMomentFrame => "concrete-moment-frame",
            StructureType::SteelEccentricallyBracedFrame => "steel-eccentrically-braced-frame",
            StructureType::SteelBucklingRestrainedBracedFrame => {
                "steel-buckling-restrained-braced-frame"
            }
            StructureType::AllOther => "all-other",
        }
    }

    /// Find the structure type whose table key is `code`
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let normalized = s.trim().to_lowercase().replace([' ', '_'], "-");
        if let Some(t) = Self::from_code(&normalized) {
            return Ok(t);
        }
        match normalized.as_str() {
            "moment-frame" | "steel-mrf" | "steel-moment-resisting-frame" | "smf" => {
                Ok(StructureType::SteelMomentFrame)
            }
            "concrete-mrf" | "concrete-moment-resisting-frame" | "rc-moment-frame" => {
                Ok(StructureType::ConcreteMomentFrame)
            }
            "ebf" | "steel-ebf" => Ok(StructureType::SteelEccentricallyBracedFrame),
            "brbf" | "steel-brbf" => Ok(StructureType::SteelBucklingRestrainedBracedFrame),
            "other" | "all-other-structural-systems" => Ok(StructureType::AllOther),
            _ => Err(CalcError::unknown_key("structure type", s)),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            StructureType::SteelMomentFrame => "Steel moment-resisting frames",
            StructureType::ConcreteMomentFrame => "Concrete moment-resisting frames",
            StructureType::SteelEccentricallyBracedFrame => "Steel eccentrically braced frames",
            StructureType::SteelBucklingRestrainedBracedFrame => {
                "Steel buckling-restrained braced frames"
            }
            StructureType::AllOther => "All other structural systems",
        }
    }
}

impl std::fmt::Display for StructureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Period parameters for one structure type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// Coefficient Ct
    pub ct: f64,
    /// Exponent x
    pub x: f64,
}

/// Raw TOML row
#[derive(Debug, Deserialize)]
pub(crate) struct PeriodRow {
    pub key: String,
    pub ct: f64,
    pub x: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for t in StructureType::ALL {
            assert_eq!(StructureType::from_code(t.code()), Some(t));
        }
    }

    #[test]
    fn test_from_str_flexible() {
        assert_eq!(
            StructureType::from_str_flexible("Moment Frame").unwrap(),
            StructureType::SteelMomentFrame
        );
        assert_eq!(
            StructureType::from_str_flexible("concrete_moment_frame").unwrap(),
            StructureType::ConcreteMomentFrame
        );
        assert_eq!(
            StructureType::from_str_flexible("BRBF").unwrap(),
            StructureType::SteelBucklingRestrainedBracedFrame
        );
    }

    #[test]
    fn test_unknown_structure_type() {
        let err = StructureType::from_str_flexible("tensegrity dome").unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_KEY");
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&StructureType::SteelMomentFrame).unwrap();
        assert_eq!(json, "\"steel-moment-frame\"");
    }
}
