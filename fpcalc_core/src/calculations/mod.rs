//! # Component Force Calculations
//!
//! The Fp engine, leaf to root:
//!
//! - [`period`] - Approximate fundamental period Ta
//! - [`height_factor`] - Height amplification factor Hf
//! - [`ductility`] - Structure ductility reduction factor Rμ
//! - [`component_factors`] - CAR, Rpo, Ω0p for the component
//! - [`fp`] - Fp with code bounds (ASCE 7-22)
//! - [`asce7_16`] - Fp per the previous edition, for comparison
//! - [`design`] - `FpInput` → `FpResult`, the entry point
//!
//! Each step is a pure function of validated inputs and the read-only
//! [`CoefficientTables`](crate::tables::CoefficientTables). Nothing here does
//! I/O or holds state between calls, so calculations can run concurrently.

pub mod asce7_16;
pub mod component_factors;
pub mod design;
pub mod ductility;
pub mod fp;
pub mod height_factor;
pub mod period;

pub use asce7_16::{calculate_asce7_16, evaluate_asce7_16, Asce716Result};
pub use component_factors::{resolve_component_factors, ComponentFactors, ComponentProfile};
pub use design::{
    calculate, calculate_bundled, Asce722Result, CodeEditions, FpInput, FpResult,
    StructureProfile,
};
pub use ductility::{resolve_ductility, resolve_rmu, Ductility, SystemSelection, BASELINE_RMU};
pub use fp::{evaluate, FpForce, Governs};
pub use height_factor::{elevation_ratio, resolve_hf, HeightFactor, HeightFactorForm};
pub use period::{estimate_ta, resolve_period, ApproximatePeriod, PeriodSource};
