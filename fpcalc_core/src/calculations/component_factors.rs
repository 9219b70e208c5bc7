//! Component factor lookup (ASCE 7-22 Tables 13.5-1 and 13.6-1)

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::tables::{
    CoefficientTables, ComponentCategory, LegacyComponentFactors, SupportLocation,
};

/// The component being anchored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentProfile {
    pub category: ComponentCategory,
    /// Table key or printed name, e.g. "wet-side-hvac"
    pub subtype: String,
    /// Flexible component or flexibly mounted (vibration isolated, etc.)
    #[serde(default)]
    pub flexible: bool,
}

impl ComponentProfile {
    pub fn new(category: ComponentCategory, subtype: impl Into<String>) -> Self {
        ComponentProfile {
            category,
            subtype: subtype.into(),
            flexible: false,
        }
    }

    pub fn flexible(mut self) -> Self {
        self.flexible = true;
        self
    }

    pub fn validate(&self) -> CalcResult<()> {
        if self.subtype.trim().is_empty() {
            return Err(CalcError::invalid_input(
                "subtype",
                "",
                "Component subtype is required",
            ));
        }
        Ok(())
    }
}

/// Factors resolved for one component and support location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentFactors {
    /// Table key of the matched row
    pub key: String,
    /// Printed description of the matched row
    pub name: String,
    pub location: SupportLocation,
    pub car: f64,
    pub rpo: f64,
    pub omega_0p: f64,
    /// True when the table's flexible row was selected
    pub flexible_variant_used: bool,
    /// ASCE 7-16 factors for the same condition, when tabulated
    pub legacy: Option<LegacyComponentFactors>,
}

/// Look up CAR, Rpo and Ω0p for a component.
pub fn resolve_component_factors(
    tables: &CoefficientTables,
    component: &ComponentProfile,
    location: SupportLocation,
) -> CalcResult<ComponentFactors> {
    let record = tables.component(component.category, &component.subtype)?;
    let (variant, flexible_variant_used) = record.variant(component.flexible);

    if component.flexible && !flexible_variant_used {
        tracing::debug!(
            component = %record.key,
            "no distinct flexible row; using default factors"
        );
    }

    Ok(ComponentFactors {
        key: record.key.clone(),
        name: record.name.clone(),
        location,
        car: variant.car(location),
        rpo: variant.rpo,
        omega_0p: variant.omega_0p,
        flexible_variant_used,
        legacy: variant.legacy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> &'static CoefficientTables {
        CoefficientTables::try_bundled().unwrap()
    }

    #[test]
    fn test_rigid_lookup() {
        let component = ComponentProfile::new(ComponentCategory::MechanicalElectrical, "air-side-hvac");
        let factors =
            resolve_component_factors(tables(), &component, SupportLocation::AboveGrade).unwrap();
        assert_eq!(factors.car, 1.4);
        assert_eq!(factors.rpo, 2.0);
        assert!(!factors.flexible_variant_used);
        assert_eq!(factors.legacy.map(|l| l.rp), Some(6.0));
    }

    #[test]
    fn test_location_selects_car_column() {
        let component = ComponentProfile::new(ComponentCategory::MechanicalElectrical, "air-side-hvac");
        let factors =
            resolve_component_factors(tables(), &component, SupportLocation::AtOrBelowGrade)
                .unwrap();
        assert_eq!(factors.car, 1.0);
    }

    #[test]
    fn test_flexible_variant_selected() {
        let component =
            ComponentProfile::new(ComponentCategory::MechanicalElectrical, "wet-side-hvac").flexible();
        let factors =
            resolve_component_factors(tables(), &component, SupportLocation::AboveGrade).unwrap();
        assert!(factors.flexible_variant_used);
        assert_eq!(factors.car, 2.2);
        assert_eq!(factors.legacy.map(|l| l.ap), Some(2.5));
    }

    #[test]
    fn test_flexible_without_variant_uses_default() {
        let component =
            ComponentProfile::new(ComponentCategory::MechanicalElectrical, "air-side-hvac").flexible();
        let factors =
            resolve_component_factors(tables(), &component, SupportLocation::AboveGrade).unwrap();
        assert!(!factors.flexible_variant_used);
        assert_eq!(factors.car, 1.4);
    }

    #[test]
    fn test_unknown_subtype() {
        let component = ComponentProfile::new(ComponentCategory::Architectural, "gargoyle");
        let err = resolve_component_factors(tables(), &component, SupportLocation::AboveGrade)
            .unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_KEY");
    }

    #[test]
    fn test_blank_subtype_invalid() {
        let component = ComponentProfile::new(ComponentCategory::Architectural, "  ");
        assert_eq!(component.validate().unwrap_err().error_code(), "INVALID_INPUT");
    }
}
