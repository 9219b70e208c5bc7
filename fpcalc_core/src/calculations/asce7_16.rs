//! ASCE/SEI 7-16 component force, kept for comparison with the 7-22 result.
//!
//! `Fp = 0.4·ap·SDS·Wp / (Rp/Ip) · (1 + 2·z/h)`, bounded by the same
//! 0.3/1.6·SDS·Ip·Wp limits as 7-22.

use serde::{Deserialize, Serialize};

use crate::calculations::fp::FpForce;
use crate::equations::seismic::fp_coefficient_asce7_16;
use crate::errors::{require_non_negative, require_positive, CalcError, CalcResult};
use crate::tables::LegacyComponentFactors;

/// 7-16 breakdown
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Asce716Result {
    pub factors: LegacyComponentFactors,
    pub force: FpForce,
    /// Ω0 · Fp
    pub emh_lb: f64,
}

/// Evaluate the 7-16 design force.
pub fn evaluate_asce7_16(
    sds: f64,
    ip: f64,
    wp_lb: f64,
    ap: f64,
    rp: f64,
    z_over_h: f64,
) -> CalcResult<FpForce> {
    let sds = require_positive("sds_g", sds)?;
    let ip = require_positive("ip", ip)?;
    let wp_lb = require_non_negative("wp_lb", wp_lb)?;
    let ap = require_positive("ap", ap)?;
    let rp = require_positive("rp", rp)?;
    if !z_over_h.is_finite() || !(0.0..=1.0).contains(&z_over_h) {
        return Err(CalcError::invalid_input(
            "elevation_ratio",
            z_over_h.to_string(),
            "Elevation ratio z/h must be between 0 and 1",
        ));
    }

    let coefficient_calc = fp_coefficient_asce7_16(sds, ip, ap, rp, z_over_h);
    FpForce::bounded(coefficient_calc, sds, ip, wp_lb)
}

/// Full 7-16 result for tabulated legacy factors.
pub fn calculate_asce7_16(
    sds: f64,
    ip: f64,
    wp_lb: f64,
    factors: LegacyComponentFactors,
    z_over_h: f64,
) -> CalcResult<Asce716Result> {
    let force = evaluate_asce7_16(sds, ip, wp_lb, factors.ap, factors.rp, z_over_h)?;
    Ok(Asce716Result {
        factors,
        force,
        emh_lb: force.emh_lb(factors.omega_0p, wp_lb)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::fp::Governs;

    #[test]
    fn test_roof_mounted_air_handler() {
        // ap = 2.5, Rp = 6.0, SDS = 1.0, Ip = 1.0, z/h = 1: 0.4 * 2.5 / 6 * 3 = 0.5
        let force = evaluate_asce7_16(1.0, 1.0, 1000.0, 2.5, 6.0, 1.0).unwrap();
        assert!((force.coefficient - 0.5).abs() < 1e-12);
        assert_eq!(force.governs, Governs::Calculated);
        assert!((force.fp_lb - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_grade_level_minimum_governs() {
        // 0.4 * 1.0 / 2.5 * 1 = 0.16 < 0.3
        let force = evaluate_asce7_16(1.0, 1.0, 100.0, 1.0, 2.5, 0.0).unwrap();
        assert_eq!(force.governs, Governs::Minimum);
        assert!((force.fp_lb - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_emh() {
        let factors = LegacyComponentFactors { ap: 2.5, rp: 6.0, omega_0p: 2.0 };
        let result = calculate_asce7_16(1.0, 1.0, 1000.0, factors, 1.0).unwrap();
        assert!((result.emh_lb - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        assert!(evaluate_asce7_16(1.0, 1.0, 100.0, 2.5, 0.0, 0.5).is_err());
        assert!(evaluate_asce7_16(1.0, 1.0, 100.0, 2.5, 6.0, 1.2).is_err());
    }

    #[test]
    fn test_overflowing_weight_rejected() {
        // Fp,max = 1.6 * 2.0 * 1.5 * 1e308 overflows
        let err = evaluate_asce7_16(2.0, 1.5, 1e308, 2.5, 6.0, 1.0).unwrap_err();
        match err {
            CalcError::InvalidInput { field, .. } => assert_eq!(field, "wp_lb"),
            other => panic!("expected invalid input, got {:?}", other),
        }
    }
}
