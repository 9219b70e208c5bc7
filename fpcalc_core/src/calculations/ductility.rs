//! # Structure Ductility Reduction Factor
//!
//! Rμ per ASCE 7-22 Eqn 13.3-6. The seismic force-resisting system is
//! optional: a component whose supporting structure has no identified
//! lateral system gets the baseline Rμ = 1.0, meaning no ductility benefit.
//!
//! The system can come from Table 12.2-1 or be entered directly when the
//! engineer uses values from another source.

use serde::{Deserialize, Serialize};

use crate::equations::seismic::ductility_factor;
use crate::errors::{require_positive, CalcResult};
use crate::tables::{CoefficientTables, ResistingSystem, ResistingSystemRecord};

/// Rμ when no resisting system is selected
pub const BASELINE_RMU: f64 = 1.0;

/// How the resisting system is specified
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SystemSelection {
    /// Look up R and Ω0 in Table 12.2-1
    Tabulated { system: ResistingSystem },
    /// User-entered R and Ω0
    Manual { r: f64, omega_0: f64 },
}

impl SystemSelection {
    /// Check manually entered coefficients
    pub fn validate(&self) -> CalcResult<()> {
        if let SystemSelection::Manual { r, omega_0 } = self {
            require_positive("r", *r)?;
            require_positive("omega_0", *omega_0)?;
        }
        Ok(())
    }

    /// R and Ω0 for this selection
    pub fn record(&self, tables: &CoefficientTables) -> CalcResult<ResistingSystemRecord> {
        match self {
            SystemSelection::Tabulated { system } => tables.system(*system).copied(),
            SystemSelection::Manual { r, omega_0 } => Ok(ResistingSystemRecord {
                r: *r,
                omega_0: *omega_0,
            }),
        }
    }

    /// Label for reports
    pub fn describe(&self) -> String {
        match self {
            SystemSelection::Tabulated { system } => system.display_name().to_string(),
            SystemSelection::Manual { .. } => "User-defined system".to_string(),
        }
    }
}

/// Resolved ductility data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ductility {
    pub rmu: f64,
    /// R and Ω0 used, absent on the baseline path
    pub system: Option<ResistingSystemRecord>,
    pub selection: Option<SystemSelection>,
    pub ie: f64,
}

/// Rμ from an optional system record and Ie.
///
/// `None` returns [`BASELINE_RMU`] regardless of Ie. Otherwise R, Ω0 and Ie
/// must all be positive.
pub fn resolve_rmu(system: Option<&ResistingSystemRecord>, ie: f64) -> CalcResult<f64> {
    match system {
        None => Ok(BASELINE_RMU),
        Some(record) => {
            let r = require_positive("r", record.r)?;
            let omega_0 = require_positive("omega_0", record.omega_0)?;
            let ie = require_positive("ie", ie)?;
            Ok(ductility_factor(r, omega_0, ie))
        }
    }
}

/// Resolve Rμ for an optional system selection.
pub fn resolve_ductility(
    tables: &CoefficientTables,
    selection: Option<&SystemSelection>,
    ie: f64,
) -> CalcResult<Ductility> {
    let system = selection.map(|s| s.record(tables)).transpose()?;
    let rmu = resolve_rmu(system.as_ref(), ie)?;
    Ok(Ductility {
        rmu,
        system,
        selection: selection.copied(),
        ie,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::seismic::RMU_MIN;

    #[test]
    fn test_baseline_independent_of_ie() {
        for ie in [1.0, 1.25, 1.5] {
            assert_eq!(resolve_rmu(None, ie).unwrap(), BASELINE_RMU);
        }
    }

    #[test]
    fn test_special_moment_frame() {
        let record = ResistingSystemRecord { r: 8.0, omega_0: 3.0 };
        let rmu = resolve_rmu(Some(&record), 1.0).unwrap();
        assert!((rmu - (8.8f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_floor_applies() {
        let record = ResistingSystemRecord { r: 1.25, omega_0: 2.5 };
        assert_eq!(resolve_rmu(Some(&record), 1.5).unwrap(), RMU_MIN);
    }

    #[test]
    fn test_non_positive_r_rejected() {
        let record = ResistingSystemRecord { r: 0.0, omega_0: 3.0 };
        let err = resolve_rmu(Some(&record), 1.0).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        let record = ResistingSystemRecord { r: 8.0, omega_0: -1.0 };
        assert!(resolve_rmu(Some(&record), 1.0).is_err());
    }

    #[test]
    fn test_tabulated_selection() {
        let tables = CoefficientTables::try_bundled().unwrap();
        let selection = SystemSelection::Tabulated {
            system: ResistingSystem::SpecialSteelMomentFrame,
        };
        let ductility = resolve_ductility(tables, Some(&selection), 1.0).unwrap();
        assert_eq!(ductility.system, Some(ResistingSystemRecord { r: 8.0, omega_0: 3.0 }));
        assert!(ductility.rmu > RMU_MIN);
    }

    #[test]
    fn test_manual_selection() {
        let tables = CoefficientTables::try_bundled().unwrap();
        let selection = SystemSelection::Manual { r: 6.5, omega_0: 2.5 };
        let ductility = resolve_ductility(tables, Some(&selection), 1.25).unwrap();
        let expected = (1.1f64 * 6.5 / (1.25 * 2.5)).sqrt();
        assert!((ductility.rmu - expected).abs() < 1e-12);
    }

    #[test]
    fn test_selection_serialization() {
        let json = r#"{"mode":"tabulated","system":"special-steel-moment-frame"}"#;
        let selection: SystemSelection = serde_json::from_str(json).unwrap();
        assert_eq!(
            selection,
            SystemSelection::Tabulated {
                system: ResistingSystem::SpecialSteelMomentFrame
            }
        );
    }
}
