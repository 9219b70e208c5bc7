//! # Equation Registry
//!
//! Every formula the Fp calculation uses, with code references, variables and
//! assumptions. The registry drives the PDF "List of Equations" appendix and
//! the generated `EQUATIONS.md`.
//!
//! ## Usage
//!
//! ```rust
//! use fpcalc_core::equations::registry::{Equation, EquationTracker};
//!
//! let mut tracker = EquationTracker::new();
//! tracker.record_for_component(Equation::ComponentForce, "Design force", "AHU-1");
//!
//! let meta = Equation::ComponentForce.metadata();
//! assert_eq!(meta.reference.citation(), "ASCE 7-22 Section 13.3.1, Eqn 13.3-1");
//! ```

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

// ============================================================================
// Code References
// ============================================================================

/// Reference to the code provision an equation comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum CodeReference {
    /// ASCE/SEI 7 - Minimum Design Loads and Associated Criteria
    ASCE7 {
        year: u16,
        section: &'static str,
        equation: &'static str,
    },
}

impl CodeReference {
    /// Format the reference for display in reports
    pub fn citation(&self) -> String {
        match self {
            CodeReference::ASCE7 {
                year,
                section,
                equation,
            } => format!("ASCE 7-{} Section {}, Eqn {}", year % 100, section, equation),
        }
    }

    /// Short form for inline references
    pub fn short_form(&self) -> String {
        match self {
            CodeReference::ASCE7 { year, equation, .. } => {
                format!("7-{} Eqn {}", year % 100, equation)
            }
        }
    }
}

// ============================================================================
// Equation Categories
// ============================================================================

/// Categories for organizing equations in the appendix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquationCategory {
    /// Structure period
    Period,
    /// Height amplification
    Amplification,
    /// Ductility reduction
    Ductility,
    /// Component design force and its bounds
    DesignForce,
    /// Load effects built on Fp
    LoadEffects,
}

impl EquationCategory {
    /// Display name for the category
    pub fn display_name(&self) -> &'static str {
        match self {
            EquationCategory::Period => "Structure Period",
            EquationCategory::Amplification => "Height Amplification",
            EquationCategory::Ductility => "Ductility Reduction",
            EquationCategory::DesignForce => "Design Force",
            EquationCategory::LoadEffects => "Load Effects",
        }
    }

    /// Sort order for the appendix (lower = earlier)
    pub fn sort_order(&self) -> u8 {
        match self {
            EquationCategory::Period => 1,
            EquationCategory::Amplification => 2,
            EquationCategory::Ductility => 3,
            EquationCategory::DesignForce => 4,
            EquationCategory::LoadEffects => 5,
        }
    }
}

// ============================================================================
// Variable Definition
// ============================================================================

/// Definition of a variable used in an equation.
#[derive(Debug, Clone)]
pub struct Variable {
    /// Symbol (e.g., "S_DS", "W_p")
    pub symbol: &'static str,
    pub description: &'static str,
    /// Units, or "-" for dimensionless
    pub units: &'static str,
}

impl Variable {
    pub const fn new(symbol: &'static str, description: &'static str, units: &'static str) -> Self {
        Self {
            symbol,
            description,
            units,
        }
    }
}

// ============================================================================
// Equation Metadata
// ============================================================================

/// Complete metadata for one equation.
#[derive(Debug, Clone)]
pub struct EquationMetadata {
    /// Human-readable name
    pub name: &'static str,
    /// What this equation calculates
    pub description: &'static str,
    /// The formula in Typst math notation
    pub formula_typst: &'static str,
    /// The formula in plain text for markdown
    pub formula_plain: &'static str,
    pub reference: CodeReference,
    pub variables: Vec<Variable>,
    /// Assumptions or limitations
    pub assumptions: Vec<&'static str>,
    pub category: EquationCategory,
    /// Source module where the equation implementation lives
    pub source_module: &'static str,
    /// Function implementing the equation
    pub source_function: &'static str,
}

// ============================================================================
// Equation Enum
// ============================================================================

/// All equations used by the Fp calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Equation {
    /// Ta = Ct hn^x
    ApproximatePeriod,
    /// Hf = 1 + a1 (z/h) + a2 (z/h)^10
    HeightFactorWithPeriod,
    /// Hf = 1 + 2.5 (z/h)
    HeightFactorWithoutPeriod,
    /// Rμ = sqrt(1.1 R / (Ie Ω0)) ≥ 1.3
    DuctilityReduction,
    /// Fp = 0.4 SDS Ip Wp (Hf/Rμ)(CAR/Rpo)
    ComponentForce,
    /// Fp ≤ 1.6 SDS Ip Wp
    ComponentForceMax,
    /// Fp ≥ 0.3 SDS Ip Wp
    ComponentForceMin,
    /// ASCE 7-16: Fp = 0.4 ap SDS Wp / (Rp/Ip) (1 + 2z/h)
    ComponentForceAsce716,
    /// Emh = Ω0p Fp
    OverstrengthForce,
}

impl Equation {
    /// Get the full metadata for this equation
    pub fn metadata(&self) -> EquationMetadata {
        match self {
            Equation::ApproximatePeriod => EquationMetadata {
                name: "Approximate Fundamental Period",
                description: "Approximate fundamental period of the supporting structure from its height",
                formula_typst: r#"$T_a = C_t h_n^x$"#,
                formula_plain: "Ta = Ct * hn^x",
                reference: CodeReference::ASCE7 {
                    year: 2022,
                    section: "12.8.2.1",
                    equation: "12.8-8",
                },
                variables: vec![
                    Variable::new("T_a", "Approximate fundamental period", "s"),
                    Variable::new("C_t", "Period coefficient, Table 12.8-2", "-"),
                    Variable::new("x", "Period exponent, Table 12.8-2", "-"),
                    Variable::new("h_n", "Structural height", "ft"),
                ],
                assumptions: vec!["Not used when a period is entered directly"],
                category: EquationCategory::Period,
                source_module: "equations/seismic.rs",
                source_function: "approximate_period",
            },

            Equation::HeightFactorWithPeriod => EquationMetadata {
                name: "Height Amplification Factor",
                description: "Amplification of floor acceleration with height when the period is known",
                formula_typst: r#"$H_f = 1 + a_1 (z/h) + a_2 (z/h)^10$, $a_1 = 1/T_a <= 2.5$, $a_2 = [1 - (0.4/T_a)^2] >= 0$"#,
                formula_plain: "Hf = 1 + a1*(z/h) + a2*(z/h)^10; a1 = min(1/Ta, 2.5); a2 = max(1 - (0.4/Ta)^2, 0)",
                reference: CodeReference::ASCE7 {
                    year: 2022,
                    section: "13.3.1.1",
                    equation: "13.3-4",
                },
                variables: vec![
                    Variable::new("H_f", "Height amplification factor", "-"),
                    Variable::new("z", "Height of attachment above the base", "ft"),
                    Variable::new("h", "Average roof height above the base", "ft"),
                    Variable::new("T_a", "Approximate fundamental period", "s"),
                ],
                assumptions: vec!["0 <= z/h <= 1", "Hf is not taken less than 1.0"],
                category: EquationCategory::Amplification,
                source_module: "equations/seismic.rs",
                source_function: "height_factor",
            },

            Equation::HeightFactorWithoutPeriod => EquationMetadata {
                name: "Height Amplification Factor (Period Unknown)",
                description: "Amplification of floor acceleration with height when the period is not known",
                formula_typst: r#"$H_f = 1 + 2.5 (z/h)$"#,
                formula_plain: "Hf = 1 + 2.5*(z/h)",
                reference: CodeReference::ASCE7 {
                    year: 2022,
                    section: "13.3.1.1",
                    equation: "13.3-5",
                },
                variables: vec![
                    Variable::new("H_f", "Height amplification factor", "-"),
                    Variable::new("z", "Height of attachment above the base", "ft"),
                    Variable::new("h", "Average roof height above the base", "ft"),
                ],
                assumptions: vec!["0 <= z/h <= 1"],
                category: EquationCategory::Amplification,
                source_module: "equations/seismic.rs",
                source_function: "height_factor",
            },

            Equation::DuctilityReduction => EquationMetadata {
                name: "Structure Ductility Reduction Factor",
                description: "Reduction in floor acceleration from yielding of the supporting structure",
                formula_typst: r#"$R_mu = (1.1 R / (I_e Omega_0))^(1/2) >= 1.3$"#,
                formula_plain: "Rmu = sqrt(1.1*R / (Ie*Omega0)) >= 1.3",
                reference: CodeReference::ASCE7 {
                    year: 2022,
                    section: "13.3.1.2",
                    equation: "13.3-6",
                },
                variables: vec![
                    Variable::new("R_mu", "Structure ductility reduction factor", "-"),
                    Variable::new("R", "Response modification coefficient, Table 12.2-1", "-"),
                    Variable::new("Omega_0", "Overstrength factor, Table 12.2-1", "-"),
                    Variable::new("I_e", "Importance factor, Table 1.5-2", "-"),
                ],
                assumptions: vec!["Rμ = 1.0 when no seismic force-resisting system is identified"],
                category: EquationCategory::Ductility,
                source_module: "equations/seismic.rs",
                source_function: "ductility_factor",
            },

            Equation::ComponentForce => EquationMetadata {
                name: "Component Seismic Design Force",
                description: "Horizontal seismic design force at the component center of gravity",
                formula_typst: r#"$F_p = 0.4 S_(D S) I_p W_p (H_f / R_mu) (C_(A R) / R_(p o))$"#,
                formula_plain: "Fp = 0.4 * SDS * Ip * Wp * (Hf/Rmu) * (CAR/Rpo)",
                reference: CodeReference::ASCE7 {
                    year: 2022,
                    section: "13.3.1",
                    equation: "13.3-1",
                },
                variables: vec![
                    Variable::new("F_p", "Seismic design force", "lb"),
                    Variable::new("S_(D S)", "Short-period design spectral acceleration", "g"),
                    Variable::new("I_p", "Component importance factor", "-"),
                    Variable::new("W_p", "Component operating weight", "lb"),
                    Variable::new("C_(A R)", "Component resonance ductility factor", "-"),
                    Variable::new("R_(p o)", "Component strength factor", "-"),
                ],
                assumptions: vec!["Subject to the bounds of Eqns 13.3-2 and 13.3-3"],
                category: EquationCategory::DesignForce,
                source_module: "equations/seismic.rs",
                source_function: "fp_coefficient",
            },

            Equation::ComponentForceMax => EquationMetadata {
                name: "Maximum Component Design Force",
                description: "Upper limit on the component seismic design force",
                formula_typst: r#"$F_p <= 1.6 S_(D S) I_p W_p$"#,
                formula_plain: "Fp <= 1.6 * SDS * Ip * Wp",
                reference: CodeReference::ASCE7 {
                    year: 2022,
                    section: "13.3.1",
                    equation: "13.3-2",
                },
                variables: vec![
                    Variable::new("S_(D S)", "Short-period design spectral acceleration", "g"),
                    Variable::new("I_p", "Component importance factor", "-"),
                    Variable::new("W_p", "Component operating weight", "lb"),
                ],
                assumptions: vec!["Same limit in ASCE 7-16"],
                category: EquationCategory::DesignForce,
                source_module: "equations/seismic.rs",
                source_function: "fp_max_coefficient",
            },

            Equation::ComponentForceMin => EquationMetadata {
                name: "Minimum Component Design Force",
                description: "Lower limit on the component seismic design force",
                formula_typst: r#"$F_p >= 0.3 S_(D S) I_p W_p$"#,
                formula_plain: "Fp >= 0.3 * SDS * Ip * Wp",
                reference: CodeReference::ASCE7 {
                    year: 2022,
                    section: "13.3.1",
                    equation: "13.3-3",
                },
                variables: vec![
                    Variable::new("S_(D S)", "Short-period design spectral acceleration", "g"),
                    Variable::new("I_p", "Component importance factor", "-"),
                    Variable::new("W_p", "Component operating weight", "lb"),
                ],
                assumptions: vec!["Same limit in ASCE 7-16"],
                category: EquationCategory::DesignForce,
                source_module: "equations/seismic.rs",
                source_function: "fp_min_coefficient",
            },

            Equation::ComponentForceAsce716 => EquationMetadata {
                name: "Component Seismic Design Force (ASCE 7-16)",
                description: "Previous-edition design force, reported for comparison",
                formula_typst: r#"$F_p = (0.4 a_p S_(D S) W_p) / (R_p / I_p) (1 + 2 z/h)$"#,
                formula_plain: "Fp = 0.4 * ap * SDS * Wp / (Rp/Ip) * (1 + 2*z/h)",
                reference: CodeReference::ASCE7 {
                    year: 2016,
                    section: "13.3.1",
                    equation: "13.3-1",
                },
                variables: vec![
                    Variable::new("a_p", "Component amplification factor, Tables 13.5-1/13.6-1", "-"),
                    Variable::new("R_p", "Component response modification factor", "-"),
                    Variable::new("z", "Height of attachment above the base", "ft"),
                    Variable::new("h", "Average roof height above the base", "ft"),
                ],
                assumptions: vec!["Bounded by 0.3 and 1.6 SDS Ip Wp"],
                category: EquationCategory::DesignForce,
                source_module: "equations/seismic.rs",
                source_function: "fp_coefficient_asce7_16",
            },

            Equation::OverstrengthForce => EquationMetadata {
                name: "Horizontal Load Effect Including Overstrength",
                description: "Design force amplified by the component overstrength factor for anchorage",
                formula_typst: r#"$E_(m h) = Omega_(0 p) F_p$"#,
                formula_plain: "Emh = Omega0p * Fp",
                reference: CodeReference::ASCE7 {
                    year: 2022,
                    section: "13.3.1.3",
                    equation: "12.4-7",
                },
                variables: vec![
                    Variable::new("E_(m h)", "Horizontal seismic load effect with overstrength", "lb"),
                    Variable::new("Omega_(0 p)", "Component overstrength factor", "-"),
                    Variable::new("F_p", "Seismic design force", "lb"),
                ],
                assumptions: vec!["Applies where anchorage design requires overstrength"],
                category: EquationCategory::LoadEffects,
                source_module: "equations/seismic.rs",
                source_function: "overstrength_force",
            },
        }
    }

    /// Get all equations in a given category
    pub fn in_category(category: EquationCategory) -> Vec<Equation> {
        ALL_EQUATIONS
            .iter()
            .filter(|eq| eq.metadata().category == category)
            .copied()
            .collect()
    }

    /// Get all categories in appendix order
    pub fn all_categories() -> Vec<EquationCategory> {
        use EquationCategory::*;
        let mut cats = vec![DesignForce, Period, Amplification, Ductility, LoadEffects];
        cats.sort_by_key(|c| c.sort_order());
        cats
    }
}

/// All equations in the registry (for iteration)
pub static ALL_EQUATIONS: &[Equation] = &[
    Equation::ApproximatePeriod,
    Equation::HeightFactorWithPeriod,
    Equation::HeightFactorWithoutPeriod,
    Equation::DuctilityReduction,
    Equation::ComponentForce,
    Equation::ComponentForceMax,
    Equation::ComponentForceMin,
    Equation::ComponentForceAsce716,
    Equation::OverstrengthForce,
];

// ============================================================================
// Equation Usage Tracking
// ============================================================================

/// Record of an equation being used in a calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquationUsage {
    pub equation: Equation,
    /// Where/why it was used (e.g., "Height amplification")
    pub context: String,
    /// The component label this equation was applied to
    pub component_label: Option<String>,
}

impl EquationUsage {
    pub fn new(equation: Equation, context: impl Into<String>) -> Self {
        Self {
            equation,
            context: context.into(),
            component_label: None,
        }
    }

    pub fn for_component(equation: Equation, context: impl Into<String>, label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            equation,
            context: context.into(),
            component_label: (!label.is_empty()).then_some(label),
        }
    }
}

/// Collector for equation usage during a calculation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquationTracker {
    usages: Vec<EquationUsage>,
}

impl EquationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that an equation was used
    pub fn record(&mut self, equation: Equation, context: impl Into<String>) {
        self.usages.push(EquationUsage::new(equation, context));
    }

    /// Record equation usage for a specific component
    pub fn record_for_component(&mut self, equation: Equation, context: impl Into<String>, label: impl Into<String>) {
        self.usages.push(EquationUsage::for_component(equation, context, label));
    }

    pub fn usages(&self) -> &[EquationUsage] {
        &self.usages
    }

    /// Unique equations in order of first use
    pub fn unique_equations(&self) -> Vec<Equation> {
        let mut seen = HashSet::new();
        self.usages
            .iter()
            .filter(|u| seen.insert(u.equation))
            .map(|u| u.equation)
            .collect()
    }

    /// Group usages by equation
    pub fn by_equation(&self) -> HashMap<Equation, Vec<&EquationUsage>> {
        let mut map: HashMap<Equation, Vec<&EquationUsage>> = HashMap::new();
        for usage in &self.usages {
            map.entry(usage.equation).or_default().push(usage);
        }
        map
    }

    /// Group unique equations by category, categories in appendix order
    pub fn by_category(&self) -> Vec<(EquationCategory, Vec<Equation>)> {
        let mut by_cat: HashMap<EquationCategory, Vec<Equation>> = HashMap::new();
        for eq in self.unique_equations() {
            by_cat.entry(eq.metadata().category).or_default().push(eq);
        }

        let mut result: Vec<_> = by_cat.into_iter().collect();
        result.sort_by_key(|(cat, _)| cat.sort_order());
        result
    }
}

// ============================================================================
// Typst Appendix Generation
// ============================================================================

impl EquationTracker {
    /// Generate Typst markup for the "List of Equations" appendix.
    ///
    /// ```rust
    /// use fpcalc_core::equations::registry::{Equation, EquationTracker};
    ///
    /// let mut tracker = EquationTracker::new();
    /// tracker.record_for_component(Equation::DuctilityReduction, "Structure ductility", "AHU-1");
    ///
    /// let typst = tracker.generate_appendix_typst();
    /// assert!(typst.contains("Structure Ductility Reduction Factor"));
    /// ```
    pub fn generate_appendix_typst(&self) -> String {
        let mut output = String::new();

        output.push_str(r##"
#pagebreak()

#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[Appendix: List of Equations]
  ]
]

#v(12pt)

#text(size: 10pt)[
  Equations used in this calculation, with code references and the components they were applied to.
]

#v(16pt)
"##);

        let by_category = self.by_category();
        if by_category.is_empty() {
            output.push_str("#text(style: \"italic\")[No equations recorded for this calculation.]\n");
            return output;
        }

        let usage_by_eq = self.by_equation();

        for (category, equations) in by_category {
            output.push_str(&format!("\n== {}\n\n", category.display_name()));

            for equation in equations {
                let meta = equation.metadata();

                output.push_str(&format!("=== {}\n\n", meta.name));
                output.push_str(&format!("#text(size: 10pt)[{}]\n\n", meta.description));
                output.push_str(&format!("*Formula:* {}\n\n", meta.formula_typst));
                output.push_str(&format!("*Reference:* {}\n\n", meta.reference.citation()));

                if !meta.variables.is_empty() {
                    output.push_str("*Variables:*\n");
                    output.push_str("#table(\n");
                    output.push_str("  columns: (auto, 1fr, auto),\n");
                    output.push_str("  inset: 6pt,\n");
                    output.push_str("  stroke: 0.5pt,\n");
                    output.push_str("  align: (left, left, left),\n");
                    output.push_str("  table.header([*Symbol*], [*Description*], [*Units*]),\n");
                    for var in &meta.variables {
                        output.push_str(&format!(
                            "  [${}$], [{}], [{}],\n",
                            escape_typst_math(var.symbol),
                            var.description,
                            var.units
                        ));
                    }
                    output.push_str(")\n\n");
                }

                if let Some(usages) = usage_by_eq.get(&equation) {
                    let mut labels: Vec<&str> = usages
                        .iter()
                        .filter_map(|u| u.component_label.as_deref())
                        .collect();
                    labels.sort_unstable();
                    labels.dedup();
                    if !labels.is_empty() {
                        output.push_str(&format!("*Applied to:* {}\n\n", labels.join(", ")));
                    }
                }

                if !meta.assumptions.is_empty() {
                    output.push_str("*Assumptions:*\n");
                    for assumption in &meta.assumptions {
                        output.push_str(&format!("- {}\n", assumption));
                    }
                    output.push('\n');
                }

                output.push_str("#v(8pt)\n");
                output.push_str("#line(length: 100%, stroke: 0.25pt + gray)\n");
                output.push_str("#v(8pt)\n\n");
            }
        }

        output
    }
}

/// Escape backslashes for Typst math mode
fn escape_typst_math(s: &str) -> String {
    s.replace('\\', "\\\\")
}

// ============================================================================
// Markdown Generation for EQUATIONS.md
// ============================================================================

/// Generate the EQUATIONS.md reference document.
///
/// ```rust
/// use fpcalc_core::equations::registry::generate_equations_markdown;
///
/// let markdown = generate_equations_markdown();
/// assert!(markdown.contains("FpCalc Equations Reference"));
/// assert!(markdown.contains("Height Amplification"));
/// ```
pub fn generate_equations_markdown() -> String {
    let mut output = String::with_capacity(12_000);

    output.push_str(r#"# FpCalc Equations Reference

> **Auto-generated from source code. Do not edit manually.**
>
> Regenerate with: `cargo run --bin gen-equations`

This document lists every formula used to compute seismic design forces on
nonstructural components. Each equation includes its formula, code reference,
source location, and assumptions.

## Units

| Quantity | Units |
|----------|-------|
| Heights (z, h, hn) | ft |
| Weights and forces (Wp, Fp, Emh) | lb |
| Spectral acceleration (SDS) | g |
| Period (Ta) | s |

---

"#);

    let categories = Equation::all_categories();

    for category in &categories {
        let equations = Equation::in_category(*category);
        if equations.is_empty() {
            continue;
        }

        output.push_str(&format!("## {}\n\n", category.display_name()));

        for equation in equations {
            let meta = equation.metadata();

            output.push_str(&format!("### {}\n\n", meta.name));
            output.push_str(&format!("{}\n\n", meta.description));
            output.push_str(&format!("**Formula:** `{}`\n\n", meta.formula_plain));

            if !meta.variables.is_empty() {
                output.push_str("**Variables:**\n\n");
                output.push_str("| Symbol | Description | Units |\n");
                output.push_str("|--------|-------------|-------|\n");
                for var in &meta.variables {
                    output.push_str(&format!(
                        "| {} | {} | {} |\n",
                        var.symbol, var.description, var.units
                    ));
                }
                output.push('\n');
            }

            output.push_str(&format!("**Reference:** {}\n\n", meta.reference.citation()));
            output.push_str(&format!(
                "**Source:** [`{}`](fpcalc_core/src/{})\n\n",
                meta.source_function, meta.source_module
            ));

            if !meta.assumptions.is_empty() {
                output.push_str("**Assumptions:**\n");
                for assumption in &meta.assumptions {
                    output.push_str(&format!("- {}\n", assumption));
                }
                output.push('\n');
            }

            output.push_str("---\n\n");
        }
    }

    output.push_str(&format!(
        "## Statistics\n\n- **Total Equations:** {}\n- **Categories:** {}\n\n",
        ALL_EQUATIONS.len(),
        categories.len()
    ));

    output.push_str(r#"## How to Audit

1. Find the equation in the sections above
2. Check the **Reference** against the cited ASCE/SEI 7 provision
3. Follow the **Source** link to the implementation
4. Run `cargo test` to check the equations against hand calculations
"#);

    output
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_equations_have_metadata() {
        assert_eq!(ALL_EQUATIONS.len(), 9);

        for eq in ALL_EQUATIONS {
            let meta = eq.metadata();
            assert!(!meta.name.is_empty(), "Equation {:?} has no name", eq);
            assert!(!meta.formula_typst.is_empty(), "Equation {:?} has no formula", eq);
            assert!(!meta.variables.is_empty(), "Equation {:?} has no variables", eq);
            assert!(!meta.source_function.is_empty(), "Equation {:?} has no source", eq);
        }

        let fp = Equation::ComponentForce.metadata();
        assert!(fp.formula_plain.contains("(Hf/Rmu) * (CAR/Rpo)"));
    }

    #[test]
    fn test_code_reference_citation() {
        let reference = CodeReference::ASCE7 {
            year: 2016,
            section: "13.3.1",
            equation: "13.3-1",
        };
        assert_eq!(reference.citation(), "ASCE 7-16 Section 13.3.1, Eqn 13.3-1");
        assert_eq!(reference.short_form(), "7-16 Eqn 13.3-1");
    }

    #[test]
    fn test_equation_tracker() {
        let mut tracker = EquationTracker::new();
        tracker.record(Equation::ComponentForce, "AHU-1");
        tracker.record(Equation::ComponentForceMin, "AHU-1");
        tracker.record(Equation::ComponentForce, "AHU-2");

        assert_eq!(tracker.usages().len(), 3);
        assert_eq!(
            tracker.unique_equations(),
            vec![Equation::ComponentForce, Equation::ComponentForceMin]
        );
    }

    #[test]
    fn test_by_category_sorted() {
        let mut tracker = EquationTracker::new();
        tracker.record(Equation::OverstrengthForce, "test");
        tracker.record(Equation::ComponentForce, "test");
        tracker.record(Equation::ApproximatePeriod, "test");

        let cats: Vec<_> = tracker.by_category().into_iter().map(|(c, _)| c).collect();
        assert_eq!(
            cats,
            vec![
                EquationCategory::Period,
                EquationCategory::DesignForce,
                EquationCategory::LoadEffects
            ]
        );
    }

    #[test]
    fn test_blank_component_label_not_recorded() {
        let usage = EquationUsage::for_component(Equation::ComponentForce, "ctx", "");
        assert!(usage.component_label.is_none());
    }

    #[test]
    fn test_usage_serializes_component_label() {
        let usage = EquationUsage::for_component(Equation::ComponentForce, "Fp", "AHU-1");
        let json = serde_json::to_value(&usage).unwrap();
        assert_eq!(json["component_label"], "AHU-1");
        assert!(json.get("member_label").is_none());
    }

    #[test]
    fn test_generate_appendix_typst() {
        let mut tracker = EquationTracker::new();
        tracker.record_for_component(Equation::HeightFactorWithPeriod, "Hf", "AHU-1");
        tracker.record_for_component(Equation::ComponentForce, "Fp", "AHU-1");

        let typst = tracker.generate_appendix_typst();
        assert!(typst.contains("Appendix: List of Equations"));
        assert!(typst.contains("Height Amplification Factor"));
        assert!(typst.contains("ASCE 7-22 Section 13.3.1.1, Eqn 13.3-4"));
        assert!(typst.contains("*Applied to:* AHU-1"));
        assert!(typst.contains("== Design Force"));
    }

    #[test]
    fn test_generate_appendix_empty_tracker() {
        let typst = EquationTracker::new().generate_appendix_typst();
        assert!(typst.contains("No equations recorded"));
    }

    #[test]
    fn test_generate_equations_markdown() {
        let markdown = generate_equations_markdown();
        assert!(markdown.contains("# FpCalc Equations Reference"));
        assert!(markdown.contains("## Structure Period"));
        assert!(markdown.contains("## Load Effects"));
        assert!(markdown.contains("`Hf = 1 + 2.5*(z/h)`"));
        assert!(markdown.contains("ASCE 7-16 Section 13.3.1"));
        assert!(markdown.contains("equations/seismic.rs"));
        assert!(markdown.contains("**Total Equations:** 9"));
        assert!(markdown.contains("**Categories:** 5"));
    }
}
