//! # Nonstructural Component Seismic Formulas
//!
//! Closed-form expressions from ASCE/SEI 7 used by the Fp calculation. These
//! functions do no validation: callers in [`crate::calculations`] check ranges
//! first and then evaluate.
//!
//! ## Notation
//!
//! - `SDS` = Short-period design spectral acceleration (g)
//! - `Ip` = Component importance factor
//! - `Ie` = Structure importance factor
//! - `Wp` = Component operating weight
//! - `z` = Height of the component attachment above the base
//! - `h` = Average roof height of the structure above the base
//! - `Ta` = Approximate fundamental period (s)
//! - `Hf` = Height amplification factor
//! - `Rμ` = Structure ductility reduction factor
//! - `CAR` = Component resonance ductility factor
//! - `Rpo` = Component strength factor
//! - `ap`, `Rp` = ASCE 7-16 component amplification and response modification factors
//!
//! ## References
//!
//! - ASCE/SEI 7-22 Sections 12.8.2.1 and 13.3.1
//! - ASCE/SEI 7-16 Section 13.3.1

// =============================================================================
// APPROXIMATE PERIOD
// =============================================================================

/// Approximate fundamental period
///
/// # Formula (ASCE 7-22 Eqn 12.8-8)
/// - Ta = Ct · hn^x
#[inline]
pub fn approximate_period(ct: f64, x: f64, height_ft: f64) -> f64 {
    ct * height_ft.powf(x)
}

// =============================================================================
// HEIGHT AMPLIFICATION
// =============================================================================

/// Upper limit on the linear term of Hf
pub const HF_A1_MAX: f64 = 2.5;

/// Height amplification factor coefficients for a known period
///
/// # Formulas (ASCE 7-22 Eqn 13.3-4)
/// - a1 = 1/Ta ≤ 2.5
/// - a2 = [1 - (0.4/Ta)²] ≥ 0
///
/// # Returns
/// (a1, a2)
#[inline]
pub fn height_factor_coefficients(ta_s: f64) -> (f64, f64) {
    let a1 = (1.0 / ta_s).min(HF_A1_MAX);
    let a2 = (1.0 - (0.4 / ta_s).powi(2)).max(0.0);
    (a1, a2)
}

/// Height amplification factor
///
/// # Formula (ASCE 7-22 Eqn 13.3-4)
/// - Hf = 1 + a1·(z/h) + a2·(z/h)^10
///
/// With `a1 = 2.5`, `a2 = 0` this is Eqn 13.3-5, used when the period is unknown.
#[inline]
pub fn height_factor(a1: f64, a2: f64, z_over_h: f64) -> f64 {
    1.0 + a1 * z_over_h + a2 * z_over_h.powi(10)
}

// =============================================================================
// DUCTILITY
// =============================================================================

/// Lower limit on Rμ when a resisting system is known
pub const RMU_MIN: f64 = 1.3;

/// Structure ductility reduction factor
///
/// # Formula (ASCE 7-22 Eqn 13.3-6)
/// - Rμ = [1.1·R / (Ie·Ω0)]^(1/2) ≥ 1.3
#[inline]
pub fn ductility_factor(r: f64, omega_0: f64, ie: f64) -> f64 {
    (1.1 * r / (ie * omega_0)).sqrt().max(RMU_MIN)
}

// =============================================================================
// DESIGN FORCE COEFFICIENTS (per unit Wp)
// =============================================================================

/// Fp / Wp before bounds
///
/// # Formula (ASCE 7-22 Eqn 13.3-1)
/// - Fp = 0.4·SDS·Ip·Wp·(Hf/Rμ)·(CAR/Rpo)
#[inline]
pub fn fp_coefficient(sds: f64, ip: f64, hf: f64, rmu: f64, car: f64, rpo: f64) -> f64 {
    0.4 * sds * ip * (hf / rmu) * (car / rpo)
}

/// Upper bound on Fp / Wp
///
/// # Formula (ASCE 7-22 Eqn 13.3-2, ASCE 7-16 Eqn 13.3-2)
/// - Fp ≤ 1.6·SDS·Ip·Wp
#[inline]
pub fn fp_max_coefficient(sds: f64, ip: f64) -> f64 {
    1.6 * sds * ip
}

/// Lower bound on Fp / Wp
///
/// # Formula (ASCE 7-22 Eqn 13.3-3, ASCE 7-16 Eqn 13.3-3)
/// - Fp ≥ 0.3·SDS·Ip·Wp
#[inline]
pub fn fp_min_coefficient(sds: f64, ip: f64) -> f64 {
    0.3 * sds * ip
}

/// Fp / Wp before bounds, ASCE 7-16 form
///
/// # Formula (ASCE 7-16 Eqn 13.3-1)
/// - Fp = 0.4·ap·SDS·Wp / (Rp/Ip) · (1 + 2·z/h)
#[inline]
pub fn fp_coefficient_asce7_16(sds: f64, ip: f64, ap: f64, rp: f64, z_over_h: f64) -> f64 {
    0.4 * ap * sds / (rp / ip) * (1.0 + 2.0 * z_over_h)
}

/// Horizontal seismic load effect including overstrength
///
/// # Formula (ASCE 7-22 Section 13.3.1.3)
/// - Emh = Ω0p·Fp
#[inline]
pub fn overstrength_force(omega_0p: f64, fp: f64) -> f64 {
    omega_0p * fp
}

// =============================================================================
// UNIT TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON * b.abs().max(1.0)
    }

    #[test]
    fn test_approximate_period_steel_moment_frame() {
        // Ct = 0.028, x = 0.8, hn = 40 ft
        let ta = approximate_period(0.028, 0.8, 40.0);
        assert!(approx_eq(ta, 0.028 * 40f64.powf(0.8)), "Ta = {}", ta);
        assert!((ta - 0.5357).abs() < 1e-3, "Ta = {}", ta);
    }

    #[test]
    fn test_height_factor_coefficients_short_period() {
        // Short period: a1 capped at 2.5, a2 floored at 0
        let (a1, a2) = height_factor_coefficients(0.2);
        assert_eq!(a1, 2.5);
        assert_eq!(a2, 0.0);
    }

    #[test]
    fn test_height_factor_coefficients_long_period() {
        // Ta = 1.0 s: a1 = 1.0, a2 = 1 - 0.16 = 0.84
        let (a1, a2) = height_factor_coefficients(1.0);
        assert!(approx_eq(a1, 1.0));
        assert!(approx_eq(a2, 0.84));
    }

    #[test]
    fn test_height_factor_at_base_is_one() {
        assert_eq!(height_factor(1.8, 0.4, 0.0), 1.0);
    }

    #[test]
    fn test_height_factor_at_roof() {
        // At z/h = 1: Hf = 1 + a1 + a2
        assert!(approx_eq(height_factor(1.0, 0.84, 1.0), 2.84));
    }

    #[test]
    fn test_height_factor_unknown_period_form() {
        // Eqn 13.3-5 at mid-height: 1 + 2.5 * 0.5 = 2.25
        assert!(approx_eq(height_factor(HF_A1_MAX, 0.0, 0.5), 2.25));
    }

    #[test]
    fn test_ductility_factor() {
        // R = 8, Ω0 = 3, Ie = 1: sqrt(8.8 / 3) ≈ 1.7127
        let rmu = ductility_factor(8.0, 3.0, 1.0);
        assert!(approx_eq(rmu, (8.8f64 / 3.0).sqrt()));
    }

    #[test]
    fn test_ductility_factor_floor() {
        // R = 1.5, Ω0 = 2.5, Ie = 1.5: sqrt(0.44) < 1.3
        assert_eq!(ductility_factor(1.5, 2.5, 1.5), RMU_MIN);
    }

    #[test]
    fn test_fp_coefficient() {
        // 0.4 * 1.0 * 1.0 * (2.0 / 1.0) * (1.0 / 2.0) = 0.4
        assert!(approx_eq(fp_coefficient(1.0, 1.0, 2.0, 1.0, 1.0, 2.0), 0.4));
    }

    #[test]
    fn test_bounds() {
        assert!(approx_eq(fp_max_coefficient(1.0, 1.5), 2.4));
        assert!(approx_eq(fp_min_coefficient(1.0, 1.5), 0.45));
    }

    #[test]
    fn test_fp_coefficient_asce7_16() {
        // ap = 2.5, Rp = 6.0, Ip = 1.0, SDS = 1.0, at roof:
        // 0.4 * 2.5 * 1.0 / 6.0 * 3 = 0.5
        assert!(approx_eq(fp_coefficient_asce7_16(1.0, 1.0, 2.5, 6.0, 1.0), 0.5));
    }

    #[test]
    fn test_overstrength_force() {
        assert!(approx_eq(overstrength_force(2.0, 150.0), 300.0));
    }
}
