//! # fpcalc_core - Nonstructural Component Seismic Force Engine
//!
//! `fpcalc_core` computes the horizontal seismic design force `Fp` on
//! architectural, mechanical, and electrical components per ASCE/SEI 7-22
//! Chapter 13, with an optional ASCE/SEI 7-16 comparison. All inputs and
//! outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **Data-driven**: Coefficient tables are TOML, validated on load
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use fpcalc_core::calculations::{
//!     calculate_bundled, ComponentProfile, FpInput, StructureProfile, SystemSelection,
//! };
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
//! assert!(result.fp_lb().unwrap() > 0.0);
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Ta, Hf, Rμ, component factors, and the Fp entry point
//! - [`equations`] - Pure formulas and the equation registry
//! - [`tables`] - Coefficient tables (Tables 12.2-1, 12.8-2, 13.5-1, 13.6-1)
//! - [`occupancy`] - Risk category and importance factors
//! - [`site`] - SDS input and the site acceleration provider seam
//! - [`pdf`] - Typst PDF report
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod equations;
pub mod errors;
pub mod occupancy;
pub mod pdf;
pub mod site;
pub mod tables;

// Re-export commonly used types at crate root for convenience
pub use calculations::{calculate, calculate_bundled, FpInput, FpResult};
pub use errors::{CalcError, CalcResult};
