//! # Seismic Equations
//!
//! All formulas used by the Fp calculation live here, apart from the
//! validation and table lookups in [`crate::calculations`]. Keeping them in one
//! place makes them easy to check against the code text.
//!
//! ## Modules
//!
//! - [`seismic`] - ASCE/SEI 7 Chapter 12/13 formulas (Ta, Hf, Rμ, Fp, Emh)
//! - [`registry`] - Equation metadata and tracking for the PDF appendix
//!
//! ## References
//!
//! - ASCE/SEI 7-22: Minimum Design Loads and Associated Criteria for Buildings
//!   and Other Structures, Chapters 12 and 13
//! - ASCE/SEI 7-16, Chapter 13 (previous-edition comparison)

pub mod registry;
pub mod seismic;

pub use seismic::{
    approximate_period,
    ductility_factor,
    fp_coefficient,
    fp_coefficient_asce7_16,
    fp_max_coefficient,
    fp_min_coefficient,
    height_factor,
    height_factor_coefficients,
    overstrength_force,
};

pub use registry::{
    CodeReference,
    Equation,
    EquationCategory,
    EquationMetadata,
    EquationTracker,
    EquationUsage,
    Variable,
    ALL_EQUATIONS,
    generate_equations_markdown,
};
