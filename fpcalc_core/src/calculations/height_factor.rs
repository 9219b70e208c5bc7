//! Height amplification factor Hf (ASCE 7-22 Section 13.3.1.1)

use serde::{Deserialize, Serialize};

use crate::equations::seismic::{height_factor, height_factor_coefficients, HF_A1_MAX};
use crate::equations::Equation;
use crate::errors::{require_non_negative, require_positive, CalcError, CalcResult};

/// Which Hf expression applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeightFactorForm {
    /// Eqn 13.3-4, period known
    PeriodDependent,
    /// Eqn 13.3-5, period unknown
    PeriodIndependent,
}

impl HeightFactorForm {
    pub fn equation(&self) -> Equation {
        match self {
            HeightFactorForm::PeriodDependent => Equation::HeightFactorWithPeriod,
            HeightFactorForm::PeriodIndependent => Equation::HeightFactorWithoutPeriod,
        }
    }
}

/// Hf with the coefficients that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeightFactor {
    pub hf: f64,
    pub a1: f64,
    pub a2: f64,
    pub form: HeightFactorForm,
}

/// z/h with both ends of [0, 1] accepted.
pub fn elevation_ratio(elevation_ft: f64, height_ft: f64) -> CalcResult<f64> {
    let height_ft = require_positive("height_ft", height_ft)?;
    let elevation_ft = require_non_negative("elevation_ft", elevation_ft)?;
    if elevation_ft > height_ft {
        return Err(CalcError::invalid_input(
            "elevation_ft",
            elevation_ft.to_string(),
            format!("Component elevation exceeds structure height ({} ft)", height_ft),
        ));
    }
    Ok(elevation_ft / height_ft)
}

/// Resolve Hf for an elevation ratio and optional period.
pub fn resolve_hf(z_over_h: f64, ta_s: Option<f64>) -> CalcResult<HeightFactor> {
    if !z_over_h.is_finite() || !(0.0..=1.0).contains(&z_over_h) {
        return Err(CalcError::invalid_input(
            "elevation_ratio",
            z_over_h.to_string(),
            "Elevation ratio z/h must be between 0 and 1",
        ));
    }

    let (a1, a2, form) = match ta_s {
        Some(ta) => {
            let ta = require_positive("ta_s", ta)?;
            let (a1, a2) = height_factor_coefficients(ta);
            (a1, a2, HeightFactorForm::PeriodDependent)
        }
        None => (HF_A1_MAX, 0.0, HeightFactorForm::PeriodIndependent),
    };

    let hf = height_factor(a1, a2, z_over_h).max(1.0);
    Ok(HeightFactor { hf, a1, a2, form })
}
