//! # Component Design Force Calculation
//!
//! The single entry point that turns a complete input bundle into an
//! [`FpResult`]: period, height factor, ductility, component factors, and the
//! ASCE 7-22 (and optionally ASCE 7-16) design forces.
//!
//! Every input is validated before any table is consulted; a single invalid
//! value aborts the calculation.
//!
//! ## Example
//!
//! ```rust
//! use fpcalc_core::calculations::design::{calculate_bundled, FpInput, StructureProfile};
//! use fpcalc_core::calculations::{ComponentProfile, SystemSelection};
//! use fpcalc_core::occupancy::{OccupancyProfile, RiskCategory};
//! use fpcalc_core::site::SiteProfile;
//! use fpcalc_core::tables::{ComponentCategory, ResistingSystem, StructureType};
//!
//! let input = FpInput {
//!     label: "AHU-1".to_string(),
//!     structure: StructureProfile {
//!         structure_type: Some(StructureType::SteelMomentFrame),
//!         resisting_system: Some(SystemSelection::Tabulated {
//!             system: ResistingSystem::SpecialSteelMomentFrame,
//!         }),
//!         height_ft: 40.0,
//!         elevation_ft: 40.0,
//!         period_override_s: None,
//!     },
//!     component: ComponentProfile::new(ComponentCategory::MechanicalElectrical, "air-side-hvac"),
//!     occupancy: OccupancyProfile::new(RiskCategory::II),
//!     site: SiteProfile::new(1.0),
//!     wp_lb: 1500.0,
//!     editions: Default::default(),
//! };
//!
//! let result = calculate_bundled(&input).unwrap();
//! println!("Fp = {:.0} lb", result.fp_lb().unwrap());
//! ```
//!
//! ## JSON Input
//!
//! ```json
//! {
//!   "label": "AHU-1",
//!   "structure": {
//!     "structure_type": "steel-moment-frame",
//!     "resisting_system": { "mode": "tabulated", "system": "special-steel-moment-frame" },
//!     "height_ft": 40.0,
//!     "elevation_ft": 40.0
//!   },
//!   "component": { "category": "mechanical-electrical", "subtype": "air-side-hvac" },
//!   "occupancy": { "risk_category": "II" },
//!   "site": { "sds_g": 1.0 },
//!   "wp_lb": 1500.0
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::asce7_16::{calculate_asce7_16, Asce716Result};
use crate::calculations::component_factors::{
    resolve_component_factors, ComponentFactors, ComponentProfile,
};
use crate::calculations::ductility::{resolve_ductility, Ductility, SystemSelection};
use crate::calculations::fp::{evaluate, FpForce, Governs};
use crate::calculations::height_factor::{elevation_ratio, resolve_hf, HeightFactor};
use crate::calculations::period::{resolve_period, usable_override, ApproximatePeriod, PeriodSource};
use crate::equations::{Equation, EquationTracker};
use crate::errors::{require_non_negative, require_positive, CalcError, CalcResult};
use crate::occupancy::OccupancyProfile;
use crate::site::SiteProfile;
use crate::tables::{CoefficientTables, StructureType, SupportLocation};

/// The supporting structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureProfile {
    /// Table 12.8-2 structure type; `None` with no override means Ta is unknown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure_type: Option<StructureType>,

    /// Seismic force-resisting system; `None` gives Rμ = 1.0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resisting_system: Option<SystemSelection>,

    /// Average roof height h above the base (ft)
    pub height_ft: f64,

    /// Component attachment height z above the base (ft)
    pub elevation_ft: f64,

    /// Known fundamental period (s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_override_s: Option<f64>,
}

impl StructureProfile {
    /// Validate geometry and manual entries; returns z/h.
    pub fn validate(&self) -> CalcResult<f64> {
        let ratio = elevation_ratio(self.elevation_ft, self.height_ft)?;
        usable_override(self.period_override_s)?;
        if let Some(selection) = &self.resisting_system {
            selection.validate()?;
        }
        Ok(ratio)
    }
}

/// Code editions to evaluate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeEditions {
    #[serde(default = "default_true")]
    pub asce7_16: bool,
    #[serde(default = "default_true")]
    pub asce7_22: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CodeEditions {
    fn default() -> Self {
        CodeEditions {
            asce7_16: true,
            asce7_22: true,
        }
    }
}

/// Complete input bundle for one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FpInput {
    /// User label (e.g. "AHU-1", "Parapet at grid A")
    #[serde(default)]
    pub label: String,
    pub structure: StructureProfile,
    pub component: ComponentProfile,
    #[serde(default)]
    pub occupancy: OccupancyProfile,
    pub site: SiteProfile,
    /// Component operating weight Wp (lb); zero gives the breakdown only
    #[serde(default)]
    pub wp_lb: f64,
    #[serde(default)]
    pub editions: CodeEditions,
}

impl FpInput {
    /// Validate every input; returns z/h.
    pub fn validate(&self) -> CalcResult<f64> {
        let ratio = self.structure.validate()?;
        self.component.validate()?;
        require_positive("sds_g", self.site.sds_g)?;
        require_non_negative("wp_lb", self.wp_lb)?;
        if !self.editions.asce7_16 && !self.editions.asce7_22 {
            return Err(CalcError::invalid_input(
                "editions",
                "none",
                "Select at least one code edition",
            ));
        }
        Ok(ratio)
    }
}

/// ASCE 7-22 design force
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Asce722Result {
    pub force: FpForce,
    /// Ω0p · Fp
    pub emh_lb: f64,
}

/// Calculation output. Produced fresh per call and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FpResult {
    pub label: String,
    pub sds_g: f64,
    pub wp_lb: f64,
    pub ie: f64,
    pub ip: f64,
    pub elevation_ratio: f64,
    pub location: SupportLocation,
    pub period: ApproximatePeriod,
    pub height_factor: HeightFactor,
    pub ductility: Ductility,
    pub component: ComponentFactors,
    pub asce7_22: Option<Asce722Result>,
    pub asce7_16: Option<Asce716Result>,
    /// Informational messages (e.g. an edition that could not be evaluated)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl FpResult {
    pub fn ta_s(&self) -> Option<f64> {
        self.period.ta_s
    }

    pub fn hf(&self) -> f64 {
        self.height_factor.hf
    }

    pub fn rmu(&self) -> f64 {
        self.ductility.rmu
    }

    /// Governing force: ASCE 7-22 when evaluated, else ASCE 7-16
    pub fn primary_force(&self) -> Option<&FpForce> {
        self.asce7_22
            .as_ref()
            .map(|r| &r.force)
            .or_else(|| self.asce7_16.as_ref().map(|r| &r.force))
    }

    /// Governing design force (lb)
    pub fn fp_lb(&self) -> Option<f64> {
        self.primary_force().map(|f| f.fp_lb)
    }

    /// Which expression set the governing force
    pub fn governs(&self) -> Option<Governs> {
        self.primary_force().map(|f| f.governs)
    }

    /// Horizontal load effect with overstrength for the governing edition
    pub fn emh_lb(&self) -> Option<f64> {
        self.asce7_22
            .as_ref()
            .map(|r| r.emh_lb)
            .or_else(|| self.asce7_16.as_ref().map(|r| r.emh_lb))
    }

    /// Record every equation this result depends on.
    pub fn equation_tracker(&self) -> EquationTracker {
        let mut tracker = EquationTracker::new();
        let label = self.label.as_str();

        if let PeriodSource::Table { .. } = self.period.source {
            tracker.record_for_component(Equation::ApproximatePeriod, "Approximate period", label);
        }
        if self.asce7_22.is_some() {
            tracker.record_for_component(
                self.height_factor.form.equation(),
                "Height amplification",
                label,
            );
            if self.ductility.system.is_some() {
                tracker.record_for_component(Equation::DuctilityReduction, "Structure ductility", label);
            }
            tracker.record_for_component(Equation::ComponentForce, "Design force", label);
            tracker.record_for_component(Equation::ComponentForceMax, "Upper bound", label);
            tracker.record_for_component(Equation::ComponentForceMin, "Lower bound", label);
            tracker.record_for_component(Equation::OverstrengthForce, "Overstrength", label);
        }
        if self.asce7_16.is_some() {
            tracker.record_for_component(Equation::ComponentForceAsce716, "ASCE 7-16 design force", label);
            tracker.record_for_component(Equation::ComponentForceMax, "ASCE 7-16 upper bound", label);
            tracker.record_for_component(Equation::ComponentForceMin, "ASCE 7-16 lower bound", label);
            tracker.record_for_component(Equation::OverstrengthForce, "ASCE 7-16 overstrength", label);
        }
        tracker
    }

    /// Equations used, deduplicated in order of first use
    pub fn equations_used(&self) -> Vec<Equation> {
        self.equation_tracker().unique_equations()
    }
}

/// Run the full calculation against the given tables.
pub fn calculate(tables: &CoefficientTables, input: &FpInput) -> CalcResult<FpResult> {
    let z_over_h = input.validate()?;

    let sds = input.site.sds_g;
    let ie = input.occupancy.ie();
    let ip = input.occupancy.ip();
    let location = SupportLocation::from_elevation(input.structure.elevation_ft);

    let period = resolve_period(
        tables,
        input.structure.structure_type,
        input.structure.height_ft,
        input.structure.period_override_s,
    )?;
    let height_factor = resolve_hf(z_over_h, period.ta_s)?;
    let ductility = resolve_ductility(tables, input.structure.resisting_system.as_ref(), ie)?;
    let component = resolve_component_factors(tables, &input.component, location)?;

    let mut notes = Vec::new();

    let asce7_22 = if input.editions.asce7_22 {
        let force = evaluate(
            sds,
            ip,
            input.wp_lb,
            height_factor.hf,
            ductility.rmu,
            component.car,
            component.rpo,
        )?;
        Some(Asce722Result {
            force,
            emh_lb: force.emh_lb(component.omega_0p, input.wp_lb)?,
        })
    } else {
        None
    };

    let asce7_16 = match (input.editions.asce7_16, component.legacy) {
        (false, _) => None,
        (true, Some(factors)) => Some(calculate_asce7_16(sds, ip, input.wp_lb, factors, z_over_h)?),
        (true, None) if asce7_22.is_some() => {
            notes.push(format!(
                "ASCE 7-16 factors are not tabulated for '{}'; only ASCE 7-22 was evaluated",
                component.name
            ));
            None
        }
        (true, None) => {
            return Err(CalcError::unknown_key("ASCE 7-16 component", &component.key));
        }
    };

    let result = FpResult {
        label: input.label.clone(),
        sds_g: sds,
        wp_lb: input.wp_lb,
        ie,
        ip,
        elevation_ratio: z_over_h,
        location,
        period,
        height_factor,
        ductility,
        component,
        asce7_22,
        asce7_16,
        notes,
    };

    tracing::debug!(
        label = %result.label,
        ta_s = ?result.period.ta_s,
        hf = result.height_factor.hf,
        rmu = result.ductility.rmu,
        car = result.component.car,
        rpo = result.component.rpo,
        fp_lb = ?result.fp_lb(),
        "Fp calculated"
    );

    Ok(result)
}

/// [`calculate`] against the bundled reference tables.
pub fn calculate_bundled(input: &FpInput) -> CalcResult<FpResult> {
    calculate(CoefficientTables::try_bundled()?, input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::occupancy::{ComponentImportance, RiskCategory};
    use crate::tables::{ComponentCategory, ResistingSystem};

    fn canonical() -> FpInput {
        FpInput {
            label: "P-1".to_string(),
            structure: StructureProfile {
                structure_type: Some(StructureType::SteelMomentFrame),
                resisting_system: Some(SystemSelection::Tabulated {
                    system: ResistingSystem::SpecialSteelMomentFrame,
                }),
                height_ft: 40.0,
                elevation_ft: 40.0,
                period_override_s: None,
            },
            component: ComponentProfile::new(ComponentCategory::Architectural, "interior-wall-other"),
            occupancy: OccupancyProfile::new(RiskCategory::II),
            site: SiteProfile::new(1.0),
            wp_lb: 100.0,
            editions: CodeEditions::default(),
        }
    }

    fn rel_eq(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs()
    }

    #[test]
    fn test_canonical_hand_calculation() {
        let result = calculate_bundled(&canonical()).unwrap();

        let ta = 0.028 * 40f64.powf(0.8);
        let a1 = (1.0 / ta).min(2.5);
        let a2 = (1.0 - (0.4 / ta).powi(2)).max(0.0);
        let hf = 1.0 + a1 + a2;
        let rmu = (1.1f64 * 8.0 / 3.0).sqrt();
        let fp = 0.4 * 1.0 * 1.0 * 100.0 * (hf / rmu) * (1.0 / 1.5);

        assert!(rel_eq(result.ta_s().unwrap(), ta));
        assert!(rel_eq(result.hf(), hf));
        assert!(rel_eq(result.rmu(), rmu));
        assert_eq!(result.component.car, 1.0);
        assert_eq!(result.component.rpo, 1.5);
        assert_eq!(result.governs(), Some(Governs::Calculated));
        assert!(rel_eq(result.fp_lb().unwrap(), fp), "Fp = {:?}, expected {}", result.fp_lb(), fp);
    }

    #[test]
    fn test_emh_uses_component_overstrength() {
        let result = calculate_bundled(&canonical()).unwrap();
        let r22 = result.asce7_22.unwrap();
        assert!(rel_eq(r22.emh_lb, result.component.omega_0p * r22.force.fp_lb));
    }

    #[test]
    fn test_both_editions_by_default() {
        let result = calculate_bundled(&canonical()).unwrap();
        assert!(result.asce7_22.is_some());
        assert!(result.asce7_16.is_some());
        assert!(result.notes.is_empty());
    }

    #[test]
    fn test_asce7_16_only() {
        let mut input = canonical();
        input.editions.asce7_22 = false;
        let result = calculate_bundled(&input).unwrap();
        assert!(result.asce7_22.is_none());
        assert_eq!(
            result.fp_lb(),
            result.asce7_16.as_ref().map(|r| r.force.fp_lb)
        );
    }

    #[test]
    fn test_no_edition_rejected() {
        let mut input = canonical();
        input.editions = CodeEditions {
            asce7_16: false,
            asce7_22: false,
        };
        assert_eq!(calculate_bundled(&input).unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_zero_weight_keeps_breakdown() {
        let mut input = canonical();
        input.wp_lb = 0.0;
        let result = calculate_bundled(&input).unwrap();
        assert_eq!(result.fp_lb(), Some(0.0));
        assert!(result.asce7_22.unwrap().force.coefficient > 0.0);
        assert!(result.hf() > 1.0);
    }

    #[test]
    fn test_overflowing_weight_rejected() {
        let mut input = canonical();
        input.site = SiteProfile::new(2.0);
        input.wp_lb = 1e308;
        assert_eq!(calculate_bundled(&input).unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_no_resisting_system_baseline() {
        let mut input = canonical();
        input.structure.resisting_system = None;
        let result = calculate_bundled(&input).unwrap();
        assert_eq!(result.rmu(), 1.0);
        assert!(!result.equations_used().contains(&Equation::DuctilityReduction));
    }

    #[test]
    fn test_unknown_period_mode() {
        let mut input = canonical();
        input.structure.structure_type = None;
        let result = calculate_bundled(&input).unwrap();
        assert_eq!(result.ta_s(), None);
        assert_eq!(result.hf(), 3.5);
        assert!(result.equations_used().contains(&Equation::HeightFactorWithoutPeriod));
    }

    #[test]
    fn test_zero_period_override_falls_back_to_table() {
        let mut input = canonical();
        input.structure.period_override_s = Some(0.0);
        let result = calculate_bundled(&input).unwrap();
        assert_eq!(result.ta_s(), Some(0.028 * 40f64.powf(0.8)));
        assert!(matches!(result.period.source, PeriodSource::Table { .. }));
    }

    #[test]
    fn test_nan_period_override_rejected() {
        let mut input = canonical();
        input.structure.period_override_s = Some(f64::NAN);
        assert_eq!(calculate_bundled(&input).unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_component_at_grade() {
        let mut input = canonical();
        input.component = ComponentProfile::new(ComponentCategory::MechanicalElectrical, "air-side-hvac");
        input.structure.elevation_ft = 0.0;
        let result = calculate_bundled(&input).unwrap();
        assert_eq!(result.location, SupportLocation::AtOrBelowGrade);
        assert_eq!(result.component.car, 1.0);
        assert_eq!(result.hf(), 1.0);
    }

    #[test]
    fn test_validation_precedes_lookup() {
        // Both the subtype and the height are bad: the input error wins.
        let mut input = canonical();
        input.component.subtype = "flux capacitor".to_string();
        input.structure.height_ft = -10.0;
        assert_eq!(calculate_bundled(&input).unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_elevation_above_roof_rejected() {
        let mut input = canonical();
        input.structure.elevation_ft = 40.4;
        assert_eq!(calculate_bundled(&input).unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_unknown_component() {
        let mut input = canonical();
        input.component.subtype = "flux capacitor".to_string();
        assert_eq!(calculate_bundled(&input).unwrap_err().error_code(), "UNKNOWN_KEY");
    }

    #[test]
    fn test_manual_system_validation() {
        let mut input = canonical();
        input.structure.resisting_system = Some(SystemSelection::Manual { r: 0.0, omega_0: 3.0 });
        assert_eq!(calculate_bundled(&input).unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_essential_component() {
        let standard = calculate_bundled(&canonical()).unwrap();
        let mut input = canonical();
        input.occupancy = input
            .occupancy
            .with_component_importance(ComponentImportance::Essential);
        let essential = calculate_bundled(&input).unwrap();
        assert_eq!(essential.ip, 1.5);
        assert!(rel_eq(essential.fp_lb().unwrap(), 1.5 * standard.fp_lb().unwrap()));
    }

    #[test]
    fn test_json_roundtrip() {
        let input = canonical();
        let json = serde_json::to_string(&input).unwrap();
        let parsed: FpInput = serde_json::from_str(&json).unwrap();
        assert_eq!(input, parsed);

        let result = calculate_bundled(&input).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["period"]["source"], "table");
        assert_eq!(json["location"], "above-grade");
        assert_eq!(json["asce7_22"]["force"]["governs"], "calculated");
        let parsed: FpResult = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.label, "P-1");
    }

    #[test]
    fn test_minimal_json_input() {
        let json = r#"{
            "structure": { "height_ft": 30.0, "elevation_ft": 15.0 },
            "component": { "category": "architectural", "subtype": "Ceiling" },
            "site": { "sds_g": 0.9 }
        }"#;
        let input: FpInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.editions, CodeEditions::default());
        assert_eq!(input.wp_lb, 0.0);
        let result = calculate_bundled(&input).unwrap();
        assert_eq!(result.fp_lb(), Some(0.0));
    }

    #[test]
    fn test_equations_used() {
        let result = calculate_bundled(&canonical()).unwrap();
        let used = result.equations_used();
        assert!(used.contains(&Equation::ApproximatePeriod));
        assert!(used.contains(&Equation::HeightFactorWithPeriod));
        assert!(used.contains(&Equation::DuctilityReduction));
        assert!(used.contains(&Equation::ComponentForce));
        assert!(used.contains(&Equation::ComponentForceAsce716));
    }
}
