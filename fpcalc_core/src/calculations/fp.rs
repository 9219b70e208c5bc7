//! # Fp Evaluator
//!
//! Combines resolved coefficients into the component design force
//! (ASCE 7-22 Eqns 13.3-1 to 13.3-3):
//!
//! ```text
//! Fp,calc = 0.4 · SDS · Ip · Wp · (Hf / Rμ) · (CAR / Rpo)
//! Fp,max  = 1.6 · SDS · Ip · Wp
//! Fp,min  = 0.3 · SDS · Ip · Wp
//! Fp      = min(max(Fp,calc, Fp,min), Fp,max)
//! ```
//!
//! Every quantity is also reported per unit weight, so a zero Wp still yields
//! a full breakdown.
//!
//! ## Example
//!
//! ```rust
//! use fpcalc_core::calculations::fp::{evaluate, Governs};
//!
//! // SDS = 1.0 g, Ip = 1.0, Wp = 100 lb, Hf = 2.0, Rμ = 1.5, CAR = 1.0, Rpo = 1.5
//! let force = evaluate(1.0, 1.0, 100.0, 2.0, 1.5, 1.0, 1.5).unwrap();
//! assert_eq!(force.governs, Governs::Calculated);
//! assert!((force.fp_lb - 35.555_555_555_555_6).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::seismic::{
    fp_coefficient, fp_max_coefficient, fp_min_coefficient, overstrength_force,
};
use crate::errors::{require_non_negative, require_positive, CalcError, CalcResult};

/// Which expression set the design force
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Governs {
    /// Eqn 13.3-1
    Calculated,
    /// Lower bound, Eqn 13.3-3
    Minimum,
    /// Upper bound, Eqn 13.3-2
    Maximum,
}

impl Governs {
    pub fn display_name(&self) -> &'static str {
        match self {
            Governs::Calculated => "Calculated",
            Governs::Minimum => "Minimum",
            Governs::Maximum => "Maximum",
        }
    }
}

impl std::fmt::Display for Governs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Design force with its bounds, per unit weight and in pounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FpForce {
    /// Fp,calc / Wp
    pub coefficient_calc: f64,
    /// Fp,min / Wp
    pub coefficient_min: f64,
    /// Fp,max / Wp
    pub coefficient_max: f64,
    /// Governing Fp / Wp
    pub coefficient: f64,
    pub fp_calc_lb: f64,
    pub fp_min_lb: f64,
    pub fp_max_lb: f64,
    /// Governing design force
    pub fp_lb: f64,
    pub governs: Governs,
}

impl FpForce {
    /// Apply the code bounds to an unbounded coefficient.
    ///
    /// Fails when any coefficient or force overflows to a non-finite value.
    pub(crate) fn bounded(
        coefficient_calc: f64,
        sds: f64,
        ip: f64,
        wp_lb: f64,
    ) -> CalcResult<Self> {
        let coefficient_min = fp_min_coefficient(sds, ip);
        let coefficient_max = fp_max_coefficient(sds, ip);

        let (coefficient, governs) = if coefficient_calc > coefficient_max {
            (coefficient_max, Governs::Maximum)
        } else if coefficient_calc < coefficient_min {
            (coefficient_min, Governs::Minimum)
        } else {
            (coefficient_calc, Governs::Calculated)
        };

        if governs != Governs::Calculated {
            tracing::warn!(
                governs = %governs,
                coefficient_calc,
                coefficient,
                "Fp bound governs"
            );
        }

        let force = FpForce {
            coefficient_calc,
            coefficient_min,
            coefficient_max,
            coefficient,
            fp_calc_lb: coefficient_calc * wp_lb,
            fp_min_lb: coefficient_min * wp_lb,
            fp_max_lb: coefficient_max * wp_lb,
            fp_lb: coefficient * wp_lb,
            governs,
        };
        if force.is_finite() {
            Ok(force)
        } else {
            Err(overflow(wp_lb))
        }
    }

    fn is_finite(&self) -> bool {
        [
            self.coefficient_calc,
            self.coefficient_min,
            self.coefficient_max,
            self.coefficient,
            self.fp_calc_lb,
            self.fp_min_lb,
            self.fp_max_lb,
            self.fp_lb,
        ]
        .iter()
        .all(|v| v.is_finite())
    }

    /// Ω0p · Fp, rejected if it overflows.
    pub(crate) fn emh_lb(&self, omega_0p: f64, wp_lb: f64) -> CalcResult<f64> {
        let emh = overstrength_force(omega_0p, self.fp_lb);
        if emh.is_finite() {
            Ok(emh)
        } else {
            Err(overflow(wp_lb))
        }
    }
}

fn overflow(wp_lb: f64) -> CalcError {
    CalcError::invalid_input(
        "wp_lb",
        wp_lb.to_string(),
        "Component weight is too large; the design force is not a finite number",
    )
}

/// Evaluate Fp from resolved coefficients.
///
/// SDS, Ip, Hf, Rμ, CAR and Rpo must be positive and finite; Wp must be
/// non-negative.
pub fn evaluate(
    sds: f64,
    ip: f64,
    wp_lb: f64,
    hf: f64,
    rmu: f64,
    car: f64,
    rpo: f64,
) -> CalcResult<FpForce> {
    let sds = require_positive("sds_g", sds)?;
    let ip = require_positive("ip", ip)?;
    let wp_lb = require_non_negative("wp_lb", wp_lb)?;
    let hf = require_positive("hf", hf)?;
    let rmu = require_positive("rmu", rmu)?;
    let car = require_positive("car", car)?;
    let rpo = require_positive("rpo", rpo)?;

    let coefficient_calc = fp_coefficient(sds, ip, hf, rmu, car, rpo);
    FpForce::bounded(coefficient_calc, sds, ip, wp_lb)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel_eq(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1e-12)
    }

    #[test]
    fn test_calculated_governs() {
        let force = evaluate(1.0, 1.0, 100.0, 2.0, 1.5, 1.0, 1.5).unwrap();
        assert_eq!(force.governs, Governs::Calculated);
        assert!(rel_eq(force.coefficient, 0.4 * 2.0 / 1.5 / 1.5));
        assert!(rel_eq(force.fp_lb, 100.0 * force.coefficient));
    }

    #[test]
    fn test_minimum_governs() {
        // 0.4 * (1.0 / 1.3) * (1.0 / 2.0) ≈ 0.154 < 0.3
        let force = evaluate(1.0, 1.0, 100.0, 1.0, 1.3, 1.0, 2.0).unwrap();
        assert_eq!(force.governs, Governs::Minimum);
        assert!(rel_eq(force.fp_lb, 30.0));
    }

    #[test]
    fn test_maximum_governs() {
        // 0.4 * 3.5 * 2.2 / 1.5 ≈ 2.05 > 1.6
        let force = evaluate(1.0, 1.0, 100.0, 3.5, 1.0, 2.2, 1.5).unwrap();
        assert_eq!(force.governs, Governs::Maximum);
        assert!(rel_eq(force.fp_lb, 160.0));
    }

    #[test]
    fn test_zero_weight() {
        let force = evaluate(1.0, 1.5, 0.0, 2.0, 1.5, 1.0, 1.5).unwrap();
        assert_eq!(force.fp_lb, 0.0);
        assert!(force.coefficient > 0.0);
    }

    #[test]
    fn test_linear_in_weight() {
        let one = evaluate(0.8, 1.0, 250.0, 2.0, 1.5, 1.0, 1.5).unwrap();
        let two = evaluate(0.8, 1.0, 500.0, 2.0, 1.5, 1.0, 1.5).unwrap();
        assert!(rel_eq(two.fp_lb, 2.0 * one.fp_lb));
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(evaluate(0.0, 1.0, 100.0, 2.0, 1.5, 1.0, 1.5).is_err());
        assert!(evaluate(1.0, 0.0, 100.0, 2.0, 1.5, 1.0, 1.5).is_err());
        assert!(evaluate(1.0, 1.0, -1.0, 2.0, 1.5, 1.0, 1.5).is_err());
        assert!(evaluate(1.0, 1.0, 100.0, 2.0, 0.0, 1.0, 1.5).is_err());
        assert!(evaluate(1.0, 1.0, 100.0, 2.0, 1.5, 1.0, -1.5).is_err());
        let err = evaluate(1.0, 1.0, 100.0, 2.0, 1.5, 1.0, 0.0).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_result_is_finite() {
        let force = evaluate(2.5, 1.5, 1.0e6, 3.5, 1.0, 2.8, 1.0).unwrap();
        assert!(force.fp_lb.is_finite());
        assert!(force.fp_lb >= 0.0);
    }

    #[test]
    fn test_overflowing_weight_rejected() {
        let err = evaluate(2.0, 1.5, 1e308, 3.5, 1.0, 2.8, 1.0).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        match err {
            CalcError::InvalidInput { field, .. } => assert_eq!(field, "wp_lb"),
            other => panic!("expected invalid input, got {:?}", other),
        }
    }

    #[test]
    fn test_overflowing_emh_rejected() {
        // Fp itself fits, Ω0p · Fp does not
        let force = evaluate(1.0, 1.0, 1e308, 2.0, 1.5, 1.0, 1.5).unwrap();
        assert!(force.fp_lb.is_finite());
        assert!(force.emh_lb(10.0, 1e308).is_err());
        assert!(rel_eq(force.emh_lb(1.0, 1e308).unwrap(), force.fp_lb));
    }
}
