//! # Approximate Fundamental Period
//!
//! `Ta` per ASCE 7-22 Section 12.8.2.1, or a user-supplied period.
//!
//! A positive period override always wins, so a user who knows the building's
//! period from analysis is never second-guessed by the table. An override of
//! zero or less counts as "not given". With neither an override nor a
//! structure type the period is *unknown*, and the height factor falls back to
//! the period-independent form.

use serde::{Deserialize, Serialize};

use crate::equations::seismic::approximate_period;
use crate::errors::{require_positive, CalcError, CalcResult};
use crate::tables::{CoefficientTables, StructureType};

/// Where the period came from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum PeriodSource {
    /// User-supplied value
    Override,
    /// Ta = Ct · hn^x from Table 12.8-2
    Table {
        structure_type: StructureType,
        ct: f64,
        x: f64,
    },
    /// Not determinable
    Unknown,
}

/// Resolved period with its provenance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApproximatePeriod {
    /// Ta in seconds; `None` when unknown
    pub ta_s: Option<f64>,
    #[serde(flatten)]
    pub source: PeriodSource,
}

/// Keep an override only when it is positive.
///
/// NaN or infinite values are rejected; zero or negative means "not given".
pub(crate) fn usable_override(override_s: Option<f64>) -> CalcResult<Option<f64>> {
    match override_s {
        Some(ta) if !ta.is_finite() => Err(CalcError::invalid_input(
            "period_override_s",
            ta.to_string(),
            "Period override must be a finite number",
        )),
        Some(ta) if ta > 0.0 => Ok(Some(ta)),
        Some(ta) => {
            tracing::debug!(ta, "non-positive period override ignored");
            Ok(None)
        }
        None => Ok(None),
    }
}

/// Estimate Ta for a structure type and height.
///
/// Returns `override_s` unchanged when it is positive; otherwise
/// `Ct · height^x`.
/// Fails with `MissingPeriodData` when the table has no record for the type.
pub fn estimate_ta(
    tables: &CoefficientTables,
    structure_type: StructureType,
    height_ft: f64,
    override_s: Option<f64>,
) -> CalcResult<f64> {
    Ok(estimate(tables, structure_type, height_ft, override_s)?.0)
}

fn estimate(
    tables: &CoefficientTables,
    structure_type: StructureType,
    height_ft: f64,
    override_s: Option<f64>,
) -> CalcResult<(f64, PeriodSource)> {
    if let Some(ta) = usable_override(override_s)? {
        return Ok((ta, PeriodSource::Override));
    }
    let height_ft = require_positive("height_ft", height_ft)?;
    let record = tables
        .period(structure_type)
        .map_err(|_| CalcError::missing_period_data(structure_type.code()))?;
    Ok((
        approximate_period(record.ct, record.x, height_ft),
        PeriodSource::Table {
            structure_type,
            ct: record.ct,
            x: record.x,
        },
    ))
}

/// Resolve the period, allowing the unknown-period case.
pub fn resolve_period(
    tables: &CoefficientTables,
    structure_type: Option<StructureType>,
    height_ft: f64,
    override_s: Option<f64>,
) -> CalcResult<ApproximatePeriod> {
    match (structure_type, usable_override(override_s)?) {
        (None, None) => Ok(ApproximatePeriod {
            ta_s: None,
            source: PeriodSource::Unknown,
        }),
        (None, Some(ta)) => Ok(ApproximatePeriod {
            ta_s: Some(ta),
            source: PeriodSource::Override,
        }),
        (Some(structure_type), override_s) => {
            let (ta, source) = estimate(tables, structure_type, height_ft, override_s)?;
            Ok(ApproximatePeriod {
                ta_s: Some(ta),
                source,
            })
        }
    }
}
