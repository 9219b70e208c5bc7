//! Seismic Force-Resisting Systems (ASCE/SEI 7-22 Table 12.2-1)
//!
//! A curated set of the common systems with their response modification
//! coefficient `R` and overstrength factor `Ω0`. Values live in
//! `data/systems.toml`; this module owns the keys.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Family grouping used by Table 12.2-1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemFamily {
    /// A. Bearing wall systems
    BearingWall,
    /// B. Building frame systems
    BuildingFrame,
    /// C. Moment-resisting frame systems
    MomentFrame,
    /// D. Dual systems with special moment frames
    Dual,
    /// G. Cantilevered column systems
    CantileverColumn,
    /// H. Steel systems not specifically detailed for seismic resistance
    NotDetailed,
}

impl SystemFamily {
    /// Table 12.2-1 heading
    pub fn display_name(&self) -> &'static str {
        match self {
            SystemFamily::BearingWall => "Bearing wall systems",
            SystemFamily::BuildingFrame => "Building frame systems",
            SystemFamily::MomentFrame => "Moment-resisting frame systems",
            SystemFamily::Dual => "Dual systems with special moment frames",
            SystemFamily::CantileverColumn => "Cantilevered column systems",
            SystemFamily::NotDetailed => "Steel systems not specifically detailed for seismic resistance",
        }
    }
}

/// Seismic force-resisting system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResistingSystem {
    // A. Bearing wall systems
    #[serde(rename = "bearing-special-rc-shear-wall")]
    BearingSpecialConcreteShearWall,
    #[serde(rename = "bearing-ordinary-rc-shear-wall")]
    BearingOrdinaryConcreteShearWall,
    #[serde(rename = "bearing-special-masonry-shear-wall")]
    BearingSpecialMasonryShearWall,
    #[serde(rename = "bearing-intermediate-masonry-shear-wall")]
    BearingIntermediateMasonryShearWall,
    #[serde(rename = "bearing-ordinary-masonry-shear-wall")]
    BearingOrdinaryMasonryShearWall,
    #[serde(rename = "bearing-wood-panel-light-frame")]
    BearingWoodPanelLightFrame,
    #[serde(rename = "bearing-cfs-panel-light-frame")]
    BearingColdFormedSteelPanelLightFrame,
    #[serde(rename = "bearing-light-frame-other-sheathing")]
    BearingLightFrameOtherSheathing,
    #[serde(rename = "bearing-cfs-strap-bracing")]
    BearingColdFormedSteelStrapBracing,

    // B. Building frame systems
    #[serde(rename = "frame-steel-ebf")]
    FrameSteelEccentricallyBraced,
    #[serde(rename = "frame-special-steel-cbf")]
    FrameSpecialSteelConcentricallyBraced,
    #[serde(rename = "frame-ordinary-steel-cbf")]
    FrameOrdinarySteelConcentricallyBraced,
    #[serde(rename = "frame-special-rc-shear-wall")]
    FrameSpecialConcreteShearWall,
    #[serde(rename = "frame-ordinary-rc-shear-wall")]
    FrameOrdinaryConcreteShearWall,
    #[serde(rename = "frame-special-masonry-shear-wall")]
    FrameSpecialMasonryShearWall,
    #[serde(rename = "frame-wood-panel-light-frame")]
    FrameWoodPanelLightFrame,
    #[serde(rename = "frame-steel-brbf")]
    FrameBucklingRestrainedBraced,
    #[serde(rename = "frame-special-steel-plate-shear-wall")]
    FrameSpecialSteelPlateShearWall,

    // C. Moment-resisting frame systems
    #[serde(rename = "special-steel-moment-frame")]
    SpecialSteelMomentFrame,
    #[serde(rename = "special-steel-truss-moment-frame")]
    SpecialSteelTrussMomentFrame,
    #[serde(rename = "intermediate-steel-moment-frame")]
    IntermediateSteelMomentFrame,
    #[serde(rename = "ordinary-steel-moment-frame")]
    OrdinarySteelMomentFrame,
    #[serde(rename = "special-rc-moment-frame")]
    SpecialConcreteMomentFrame,
    #[serde(rename = "intermediate-rc-moment-frame")]
    IntermediateConcreteMomentFrame,
    #[serde(rename = "ordinary-rc-moment-frame")]
    OrdinaryConcreteMomentFrame,

    // D. Dual systems with special moment frames
    #[serde(rename = "dual-steel-ebf")]
    DualSteelEccentricallyBraced,
    #[serde(rename = "dual-special-steel-cbf")]
    DualSpecialSteelConcentricallyBraced,
    #[serde(rename = "dual-special-rc-shear-wall")]
    DualSpecialConcreteShearWall,
    #[serde(rename = "dual-steel-brbf")]
    DualBucklingRestrainedBraced,

    // G. Cantilevered column systems
    #[serde(rename = "cantilever-special-steel-column")]
    CantileverSpecialSteelColumn,
    #[serde(rename = "cantilever-special-rc-moment-frame")]
    CantileverSpecialConcreteMomentFrame,

    // H. Steel systems not specifically detailed for seismic resistance
    #[serde(rename = "steel-not-detailed")]
    SteelNotDetailedForSeismic,
}

impl ResistingSystem {
    /// All systems for UI selection
    pub const ALL: [ResistingSystem; 32] = [
        ResistingSystem::BearingSpecialConcreteShearWall,
        ResistingSystem::BearingOrdinaryConcreteShearWall,
        ResistingSystem::BearingSpecialMasonryShearWall,
        ResistingSystem::BearingIntermediateMasonryShearWall,
        ResistingSystem::BearingOrdinaryMasonryShearWall,
        ResistingSystem::BearingWoodPanelLightFrame,
        ResistingSystem::BearingColdFormedSteelPanelLightFrame,
        ResistingSystem::BearingLightFrameOtherSheathing,
        ResistingSystem::BearingColdFormedSteelStrapBracing,
        ResistingSystem::FrameSteelEccentricallyBraced,
        ResistingSystem::FrameSpecialSteelConcentricallyBraced,
        ResistingSystem::FrameOrdinarySteelConcentricallyBraced,
        ResistingSystem::FrameSpecialConcreteShearWall,
        ResistingSystem::FrameOrdinaryConcreteShearWall,
        ResistingSystem::FrameSpecialMasonryShearWall,
        ResistingSystem::FrameWoodPanelLightFrame,
        ResistingSystem::FrameBucklingRestrainedBraced,
        ResistingSystem::FrameSpecialSteelPlateShearWall,
        ResistingSystem::SpecialSteelMomentFrame,
        ResistingSystem::SpecialSteelTrussMomentFrame,
        ResistingSystem::IntermediateSteelMomentFrame,
        ResistingSystem::OrdinarySteelMomentFrame,
        ResistingSystem::SpecialConcreteMomentFrame,
        ResistingSystem::IntermediateConcreteMomentFrame,
        ResistingSystem::OrdinaryConcreteMomentFrame,
        ResistingSystem::DualSteelEccentricallyBraced,
        ResistingSystem::DualSpecialSteelConcentricallyBraced,
        ResistingSystem::DualSpecialConcreteShearWall,
        ResistingSystem::DualBucklingRestrainedBraced,
        ResistingSystem::CantileverSpecialSteelColumn,
        ResistingSystem::CantileverSpecialConcreteMomentFrame,
        ResistingSystem::SteelNotDetailedForSeismic,
    ];

    /// Key used in the systems table
    pub fn code(&self) -> &'static str {
        match self {
            ResistingSystem::BearingSpecialConcreteShearWall => "bearing-special-rc-shear-wall",
            ResistingSystem::BearingOrdinaryConcreteShearWall => "bearing-ordinary-rc-shear-wall",
            ResistingSystem::BearingSpecialMasonryShearWall => "bearing-special-masonry-shear-wall",
            ResistingSystem::BearingIntermediateMasonryShearWall => "bearing-intermediate-masonry-shear-wall",
            ResistingSystem::BearingOrdinaryMasonryShearWall => "bearing-ordinary-masonry-shear-wall",
            ResistingSystem::BearingWoodPanelLightFrame => "bearing-wood-panel-light-frame",
            ResistingSystem::BearingColdFormedSteelPanelLightFrame => "bearing-cfs-panel-light-frame",
            ResistingSystem::BearingLightFrameOtherSheathing => "bearing-light-frame-other-sheathing",
            ResistingSystem::BearingColdFormedSteelStrapBracing => "bearing-cfs-strap-bracing",
            ResistingSystem::FrameSteelEccentricallyBraced => "frame-steel-ebf",
            ResistingSystem::FrameSpecialSteelConcentricallyBraced => "frame-special-steel-cbf",
            ResistingSystem::FrameOrdinarySteelConcentricallyBraced => "frame-ordinary-steel-cbf",
            ResistingSystem::FrameSpecialConcreteShearWall => "frame-special-rc-shear-wall",
            ResistingSystem::FrameOrdinaryConcreteShearWall => "frame-ordinary-rc-shear-wall",
            ResistingSystem::FrameSpecialMasonryShearWall => "frame-special-masonry-shear-wall",
            ResistingSystem::FrameWoodPanelLightFrame => "frame-wood-panel-light-frame",
            ResistingSystem::FrameBucklingRestrainedBraced => "frame-steel-brbf",
            ResistingSystem::FrameSpecialSteelPlateShearWall => "frame-special-steel-plate-shear-wall",
            ResistingSystem::SpecialSteelMomentFrame => "special-steel-moment-frame",
            ResistingSystem::SpecialSteelTrussMomentFrame => "special-steel-truss-moment-frame",
            ResistingSystem::IntermediateSteelMomentFrame => "intermediate-steel-moment-frame",
            ResistingSystem::OrdinarySteelMomentFrame => "ordinary-steel-moment-frame",
            ResistingSystem::SpecialConcreteMomentFrame => "special-rc-moment-frame",
            ResistingSystem::IntermediateConcreteMomentFrame => "intermediate-rc-moment-frame",
            ResistingSystem::OrdinaryConcreteMomentFrame => "ordinary-rc-moment-frame",
            ResistingSystem::DualSteelEccentricallyBraced => "dual-steel-ebf",
            ResistingSystem::DualSpecialSteelConcentricallyBraced => "dual-special-steel-cbf",
            ResistingSystem::DualSpecialConcreteShearWall => "dual-special-rc-shear-wall",
            ResistingSystem::DualBucklingRestrainedBraced => "dual-steel-brbf",
            ResistingSystem::CantileverSpecialSteelColumn => "cantilever-special-steel-column",
            ResistingSystem::CantileverSpecialConcreteMomentFrame => "cantilever-special-rc-moment-frame",
            ResistingSystem::SteelNotDetailedForSeismic => "steel-not-detailed",
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            ResistingSystem::BearingSpecialConcreteShearWall => {
                "Bearing wall: special reinforced concrete shear walls"
            }
            ResistingSystem::BearingOrdinaryConcreteShearWall => {
                "Bearing wall: ordinary reinforced concrete shear walls"
            }
            ResistingSystem::BearingSpecialMasonryShearWall => {
                "Bearing wall: special reinforced masonry shear walls"
            }
            ResistingSystem::BearingIntermediateMasonryShearWall => {
                "Bearing wall: intermediate reinforced masonry shear walls"
            }
            ResistingSystem::BearingOrdinaryMasonryShearWall => {
                "Bearing wall: ordinary reinforced masonry shear walls"
            }
            ResistingSystem::BearingWoodPanelLightFrame => {
                "Bearing wall: light-frame (wood) walls sheathed with wood structural panels"
            }
            ResistingSystem::BearingColdFormedSteelPanelLightFrame => {
                "Bearing wall: light-frame (cold-formed steel) walls sheathed with wood structural panels or steel sheets"
            }
            ResistingSystem::BearingLightFrameOtherSheathing => {
                "Bearing wall: light-frame walls with shear panels of all other materials"
            }
            ResistingSystem::BearingColdFormedSteelStrapBracing => {
                "Bearing wall: light-frame (cold-formed steel) walls with flat strap bracing"
            }
            ResistingSystem::FrameSteelEccentricallyBraced => {
                "Building frame: steel eccentrically braced frames"
            }
            ResistingSystem::FrameSpecialSteelConcentricallyBraced => {
                "Building frame: special steel concentrically braced frames"
            }
            ResistingSystem::FrameOrdinarySteelConcentricallyBraced => {
                "Building frame: ordinary steel concentrically braced frames"
            }
            ResistingSystem::FrameSpecialConcreteShearWall => {
                "Building frame: special reinforced concrete shear walls"
            }
            ResistingSystem::FrameOrdinaryConcreteShearWall => {
                "Building frame: ordinary reinforced concrete shear walls"
            }
            ResistingSystem::FrameSpecialMasonryShearWall => {
                "Building frame: special reinforced masonry shear walls"
            }
            ResistingSystem::FrameWoodPanelLightFrame => {
                "Building frame: light-frame (wood) walls sheathed with wood structural panels"
            }
            ResistingSystem::FrameBucklingRestrainedBraced => {
                "Building frame: steel buckling-restrained braced frames"
            }
            ResistingSystem::FrameSpecialSteelPlateShearWall => {
                "Building frame: special steel plate shear walls"
            }
            ResistingSystem::SpecialSteelMomentFrame => {
                "Moment frame: steel special moment frames"
            }
            ResistingSystem::SpecialSteelTrussMomentFrame => {
                "Moment frame: steel special truss moment frames"
            }
            ResistingSystem::IntermediateSteelMomentFrame => {
                "Moment frame: steel intermediate moment frames"
            }
            ResistingSystem::OrdinarySteelMomentFrame => {
                "Moment frame: steel ordinary moment frames"
            }
            ResistingSystem::SpecialConcreteMomentFrame => {
                "Moment frame: special reinforced concrete moment frames"
            }
            ResistingSystem::IntermediateConcreteMomentFrame => {
                "Moment frame: intermediate reinforced concrete moment frames"
            }
            ResistingSystem::OrdinaryConcreteMomentFrame => {
                "Moment frame: ordinary reinforced concrete moment frames"
            }
            ResistingSystem::DualSteelEccentricallyBraced => {
                "Dual system with special moment frames: steel eccentrically braced frames"
            }
            ResistingSystem::DualSpecialSteelConcentricallyBraced => {
                "Dual system with special moment frames: special steel concentrically braced frames"
            }
            ResistingSystem::DualSpecialConcreteShearWall => {
                "Dual system with special moment frames: special reinforced concrete shear walls"
            }
            ResistingSystem::DualBucklingRestrainedBraced => {
                "Dual system with special moment frames: steel buckling-restrained braced frames"
            }
            ResistingSystem::CantileverSpecialSteelColumn => {
                "Cantilevered column: steel special cantilever column systems"
            }
            ResistingSystem::CantileverSpecialConcreteMomentFrame => {
                "Cantilevered column: special reinforced concrete moment frames"
            }
            ResistingSystem::SteelNotDetailedForSeismic => {
                "Steel systems not specifically detailed for seismic resistance"
            }
        }
    }

    /// Table 12.2-1 family
    pub fn family(&self) -> SystemFamily {
        use ResistingSystem::*;
        match self {
            BearingSpecialConcreteShearWall
            | BearingOrdinaryConcreteShearWall
            | BearingSpecialMasonryShearWall
            | BearingIntermediateMasonryShearWall
            | BearingOrdinaryMasonryShearWall
            | BearingWoodPanelLightFrame
            | BearingColdFormedSteelPanelLightFrame
            | BearingLightFrameOtherSheathing
            | BearingColdFormedSteelStrapBracing => SystemFamily::BearingWall,
            FrameSteelEccentricallyBraced
            | FrameSpecialSteelConcentricallyBraced
            | FrameOrdinarySteelConcentricallyBraced
            | FrameSpecialConcreteShearWall
            | FrameOrdinaryConcreteShearWall
            | FrameSpecialMasonryShearWall
            | FrameWoodPanelLightFrame
            | FrameBucklingRestrainedBraced
            | FrameSpecialSteelPlateShearWall => SystemFamily::BuildingFrame,
            SpecialSteelMomentFrame
            | SpecialSteelTrussMomentFrame
            | IntermediateSteelMomentFrame
            | OrdinarySteelMomentFrame
            | SpecialConcreteMomentFrame
            | IntermediateConcreteMomentFrame
            | OrdinaryConcreteMomentFrame => SystemFamily::MomentFrame,
            DualSteelEccentricallyBraced
            | DualSpecialSteelConcentricallyBraced
            | DualSpecialConcreteShearWall
            | DualBucklingRestrainedBraced => SystemFamily::Dual,
            CantileverSpecialSteelColumn
            | CantileverSpecialConcreteMomentFrame => SystemFamily::CantileverColumn,
            SteelNotDetailedForSeismic => SystemFamily::NotDetailed,
        }
    }

    /// Find the system whose table key is `code`
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    /// Parse from a table key or a display name (case-insensitive)
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let wanted = s.trim().to_lowercase();
        let as_code = wanted.replace([' ', '_'], "-");
        Self::ALL
            .into_iter()
            .find(|sys| sys.code() == as_code || sys.display_name().to_lowercase() == wanted)
            .ok_or_else(|| CalcError::unknown_key("resisting system", s))
    }
}

impl std::fmt::Display for ResistingSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Response modification coefficient and overstrength factor for one system
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResistingSystemRecord {
    /// Response modification coefficient R
    pub r: f64,
    /// Overstrength factor Ω0
    pub omega_0: f64,
}

/// Raw TOML row
#[derive(Debug, Deserialize)]
pub(crate) struct SystemRow {
    pub key: String,
    pub r: f64,
    pub omega_0: f64,
}
