//! # PDF Report Generation
//!
//! Renders a calculation to a one-component report using Typst.
//!
//! ## Architecture
//!
//! - The Typst template is an embedded string constant
//! - Data is injected by placeholder replacement before compilation
//! - Fonts come from `typst-assets`, so no files are read at runtime
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use fpcalc_core::calculations::{calculate_bundled, FpInput};
//! use fpcalc_core::pdf::{render_fp_pdf, ReportHeader};
//!
//! let input: FpInput = serde_json::from_str(&std::fs::read_to_string("ahu-1.json").unwrap()).unwrap();
//! let result = calculate_bundled(&input).unwrap();
//! let header = ReportHeader::new("Jane Engineer", "25-001");
//! let pdf_bytes = render_fp_pdf(&input, &result, &header).unwrap();
//! std::fs::write("ahu-1.pdf", pdf_bytes).unwrap();
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::calculations::{FpForce, FpInput, FpResult, HeightFactorForm, PeriodSource};
use crate::errors::{CalcError, CalcResult};

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world for compiling one in-memory document.
struct PdfWorld {
    main: Source,
    book: LazyHash<FontBook>,
    fonts: Vec<Font>,
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        let fonts = Self::load_fonts();
        let book = FontBook::from_fonts(&fonts);

        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
        }
    }

    fn load_fonts() -> Vec<Font> {
        typst_assets::fonts()
            .flat_map(|font_bytes| Font::iter(Bytes::new(font_bytes.to_vec())))
            .collect()
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

// ============================================================================
// Report Header
// ============================================================================

/// Title-block information printed on every report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportHeader {
    pub engineer: String,
    pub job_id: String,
}

impl ReportHeader {
    pub fn new(engineer: impl Into<String>, job_id: impl Into<String>) -> Self {
        ReportHeader {
            engineer: engineer.into(),
            job_id: job_id.into(),
        }
    }
}

// ============================================================================
// PDF Template
// ============================================================================

const FP_TEMPLATE: &str = r##"
#set page(
  paper: "us-letter",
  margin: (top: 1in, bottom: 1in, left: 1in, right: 1in),
  header: align(right)[
    #text(size: 9pt, fill: gray)[FpCalc Nonstructural Component Seismic Design]
  ],
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr, 1fr),
      align(left)[#text(size: 9pt)[Job: {{JOB_ID}}]],
      align(center)[#text(size: 9pt)[Page #counter(page).display()]],
      align(right)[#text(size: 9pt)[{{DATE}}]],
    )
  ]
)

#set text(font: "Libertinus Serif", size: 11pt)

#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[Component Seismic Design Force]
    #v(4pt)
    #text(size: 14pt)[{{LABEL}}]
  ]
]

#v(12pt)

#grid(
  columns: (1fr, 1fr),
  gutter: 20pt,
  [
    *Project Information*
    #v(4pt)
    #table(
      columns: (auto, 1fr),
      stroke: none,
      row-gutter: 4pt,
      [Engineer:], [{{ENGINEER}}],
      [Job ID:], [{{JOB_ID}}],
      [Date:], [{{DATE}}],
    )
  ],
  [
    *Code Reference*
    #v(4pt)
    {{CODE_REFERENCE}}
  ]
)

#v(16pt)
#line(length: 100%, stroke: 0.5pt)
#v(8pt)

== Input Parameters

#table(
  columns: (1fr, auto, auto),
  inset: 8pt,
  stroke: 0.5pt,
  align: (left, right, left),
  table.header([*Parameter*], [*Value*], [*Unit*]),
{{INPUT_ROWS}}
)

#v(12pt)

== Seismic Parameters

#table(
  columns: (1fr, auto, 1fr),
  inset: 8pt,
  stroke: 0.5pt,
  align: (left, right, left),
  table.header([*Parameter*], [*Value*], [*Basis*]),
{{PARAMETER_ROWS}}
)

#v(16pt)
#line(length: 100%, stroke: 0.5pt)
#v(8pt)

{{ASCE7_22_SECTION}}

{{ASCE7_16_SECTION}}

{{NOTES}}

#v(16pt)

#align(center)[
  #block(width: auto, fill: rgb("#e8f0fe"), inset: 16pt, radius: 4pt)[
    #text(size: 16pt, weight: "bold")[F#sub[p] = {{FP_LB}} lb]
    #v(4pt)
    #text(size: 12pt)[E#sub[mh] = {{EMH_LB}} lb #h(12pt) Governs: {{GOVERNS}}]
  ]
]

#v(24pt)
#line(length: 100%, stroke: 0.5pt)
#v(8pt)

#text(size: 9pt, fill: gray)[
  Generated by FpCalc \
  Calculations should be verified by a licensed professional engineer.
]
"##;

// ============================================================================
// PDF Rendering
// ============================================================================

/// Render one calculation to PDF bytes.
///
/// Typst compilation or export failures are returned as
/// [`CalcError::Internal`].
pub fn render_fp_pdf(input: &FpInput, result: &FpResult, header: &ReportHeader) -> CalcResult<Vec<u8>> {
    let mut source = build_report_source(input, result, header);
    source.push_str(&result.equation_tracker().generate_appendix_typst());
    compile_pdf(source)
}

fn compile_pdf(source: String) -> CalcResult<Vec<u8>> {
    let world = PdfWorld::new(source);

    let warned = typst::compile(&world);
    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::Internal {
            message: format!("Typst compilation failed: {}", error_msgs.join("; ")),
        }
    })?;

    typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::Internal {
            message: format!("PDF rendering failed: {}", error_msgs.join("; ")),
        }
    })
}

/// Fill the report template (without the equations appendix).
fn build_report_source(input: &FpInput, result: &FpResult, header: &ReportHeader) -> String {
    let label = if result.label.trim().is_empty() {
        "Unnamed component".to_string()
    } else {
        escape_typst(&result.label)
    };

    let mut references = Vec::new();
    if result.asce7_22.is_some() {
        references.push("ASCE/SEI 7-22 Chapter 13");
    }
    if result.asce7_16.is_some() {
        references.push("ASCE/SEI 7-16 Chapter 13");
    }

    let notes = if result.notes.is_empty() {
        String::new()
    } else {
        let items: Vec<String> = result
            .notes
            .iter()
            .map(|n| format!("- {}", escape_typst(n)))
            .collect();
        format!("=== Notes\n\n{}\n", items.join("\n"))
    };

    FP_TEMPLATE
        .replace("{{LABEL}}", &label)
        .replace("{{ENGINEER}}", &escape_typst(&header.engineer))
        .replace("{{JOB_ID}}", &escape_typst(&header.job_id))
        .replace("{{DATE}}", &Utc::now().format("%Y-%m-%d").to_string())
        .replace("{{CODE_REFERENCE}}", &references.join(" \\\n    "))
        .replace("{{INPUT_ROWS}}", &input_rows(input, result))
        .replace("{{PARAMETER_ROWS}}", &parameter_rows(result))
        .replace("{{ASCE7_22_SECTION}}", &asce7_22_section(result))
        .replace("{{ASCE7_16_SECTION}}", &asce7_16_section(result))
        .replace("{{NOTES}}", &notes)
        .replace("{{FP_LB}}", &fmt_opt(result.fp_lb(), 0))
        .replace("{{EMH_LB}}", &fmt_opt(result.emh_lb(), 0))
        .replace(
            "{{GOVERNS}}",
            result.governs().map(|g| g.display_name()).unwrap_or("-"),
        )
}

fn row(cells: [&str; 3]) -> String {
    format!("  [{}], [{}], [{}],", cells[0], cells[1], cells[2])
}

fn input_rows(input: &FpInput, result: &FpResult) -> String {
    let structure = &input.structure;
    let structure_type = structure
        .structure_type
        .map(|t| t.display_name().to_string())
        .unwrap_or_else(|| "Not specified".to_string());
    let system = structure
        .resisting_system
        .as_ref()
        .map(|s| escape_typst(&s.describe()))
        .unwrap_or_else(|| "None".to_string());

    [
        row(["Structure type", &structure_type, ""]),
        row(["Seismic force-resisting system", &system, ""]),
        row(["Roof height, h", &format!("{:.1}", structure.height_ft), "ft"]),
        row(["Attachment height, z", &format!("{:.1}", structure.elevation_ft), "ft"]),
        row(["z/h", &format!("{:.3}", result.elevation_ratio), ""]),
        row(["Support location", result.location.display_name(), ""]),
        row(["Risk category", input.occupancy.risk_category.code(), ""]),
        row(["S#sub[DS]", &format!("{:.3}", result.sds_g), "g"]),
        row(["Component category", input.component.category.display_name(), ""]),
        row(["Component", &escape_typst(&result.component.name), ""]),
        row([
            "Flexible or flexibly mounted",
            if input.component.flexible { "Yes" } else { "No" },
            "",
        ]),
        row(["Operating weight, W#sub[p]", &format!("{:.0}", result.wp_lb), "lb"]),
    ]
    .join("\n")
}

fn parameter_rows(result: &FpResult) -> String {
    let period_basis = match result.period.source {
        PeriodSource::Override => "User-specified".to_string(),
        PeriodSource::Table { ct, x, .. } => format!("Eqn 12.8-8, C#sub[t] = {}, x = {}", ct, x),
        PeriodSource::Unknown => "Not determined".to_string(),
    };
    let hf_basis = match result.height_factor.form {
        HeightFactorForm::PeriodDependent => format!(
            "Eqn 13.3-4, a#sub[1] = {:.3}, a#sub[2] = {:.3}",
            result.height_factor.a1, result.height_factor.a2
        ),
        HeightFactorForm::PeriodIndependent => "Eqn 13.3-5".to_string(),
    };
    let rmu_basis = match &result.ductility.system {
        Some(system) => format!("Eqn 13.3-6, R = {}, Ω#sub[0] = {}", system.r, system.omega_0),
        None => "No resisting system".to_string(),
    };
    let car_basis = if result.component.flexible_variant_used {
        "Flexible row"
    } else {
        "Table value"
    };

    [
        row(["T#sub[a]", &fmt_opt(result.ta_s(), 3), &period_basis]),
        row(["I#sub[e]", &format!("{:.2}", result.ie), "Table 1.5-2"]),
        row(["I#sub[p]", &format!("{:.2}", result.ip), "Section 13.1.3"]),
        row(["H#sub[f]", &format!("{:.3}", result.hf()), &hf_basis]),
        row(["R#sub[μ]", &format!("{:.3}", result.rmu()), &rmu_basis]),
        row(["C#sub[AR]", &format!("{:.2}", result.component.car), car_basis]),
        row(["R#sub[po]", &format!("{:.2}", result.component.rpo), "Table value"]),
        row(["Ω#sub[0p]", &format!("{:.2}", result.component.omega_0p), "Table value"]),
    ]
    .join("\n")
}

fn force_table(force: &FpForce, emh_lb: f64) -> String {
    format!(
        r#"#table(
  columns: (1fr, auto, auto),
  inset: 8pt,
  stroke: 0.5pt,
  align: (left, right, right),
  table.header([*Quantity*], [*F#sub[p]/W#sub[p]*], [*Force (lb)*]),
  [Calculated], [{:.3}], [{:.0}],
  [Minimum, 0.3 S#sub[DS] I#sub[p] W#sub[p]], [{:.3}], [{:.0}],
  [Maximum, 1.6 S#sub[DS] I#sub[p] W#sub[p]], [{:.3}], [{:.0}],
  [*Design F#sub[p]* ({})], [*{:.3}*], [*{:.0}*],
  [E#sub[mh] = Ω#sub[0p] F#sub[p]], [], [{:.0}],
)"#,
        force.coefficient_calc,
        force.fp_calc_lb,
        force.coefficient_min,
        force.fp_min_lb,
        force.coefficient_max,
        force.fp_max_lb,
        force.governs.display_name(),
        force.coefficient,
        force.fp_lb,
        emh_lb,
    )
}

fn asce7_22_section(result: &FpResult) -> String {
    match &result.asce7_22 {
        Some(r) => format!(
            "== ASCE/SEI 7-22\n\n$ F_p = 0.4 S_(D S) I_p W_p (H_f / R_mu) (C_(A R) / R_(p o)) $\n\n{}\n\n#v(12pt)\n",
            force_table(&r.force, r.emh_lb)
        ),
        None => String::new(),
    }
}

fn asce7_16_section(result: &FpResult) -> String {
    match &result.asce7_16 {
        Some(r) => format!(
            "== ASCE/SEI 7-16\n\n$ F_p = (0.4 a_p S_(D S) W_p) / (R_p / I_p) (1 + 2 z/h) $\n\na#sub[p] = {:.2}, R#sub[p] = {:.2}, Ω#sub[0] = {:.2}\n\n{}\n\n#v(12pt)\n",
            r.factors.ap,
            r.factors.rp,
            r.factors.omega_0p,
            force_table(&r.force, r.emh_lb)
        ),
        None => String::new(),
    }
}

fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "-".to_string(),
    }
}

/// Escape special Typst characters in user-provided text
fn escape_typst(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '*' => "\\*".to_string(),
            '_' => "\\_".to_string(),
            '#' => "\\#".to_string(),
            '$' => "\\$".to_string(),
            '@' => "\\@".to_string(),
            '<' => "\\<".to_string(),
            '>' => "\\>".to_string(),
            '[' => "\\[".to_string(),
            ']' => "\\]".to_string(),
            '\\' => "\\\\".to_string(),
            '`' => "\\`".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{
        calculate_bundled, CodeEditions, ComponentProfile, StructureProfile, SystemSelection,
    };
    use crate::occupancy::{OccupancyProfile, RiskCategory};
    use crate::site::SiteProfile;
    use crate::tables::{ComponentCategory, ResistingSystem, StructureType};

    fn sample_input() -> FpInput {
        FpInput {
            label: "AHU_1 [roof]".to_string(),
            structure: StructureProfile {
                structure_type: Some(StructureType::SteelMomentFrame),
                resisting_system: Some(SystemSelection::Tabulated {
                    system: ResistingSystem::SpecialSteelMomentFrame,
                }),
                height_ft: 40.0,
                elevation_ft: 40.0,
                period_override_s: None,
            },
            component: ComponentProfile::new(ComponentCategory::MechanicalElectrical, "air-side-hvac"),
            occupancy: OccupancyProfile::new(RiskCategory::II),
            site: SiteProfile::new(1.0),
            wp_lb: 1500.0,
            editions: CodeEditions::default(),
        }
    }

    #[test]
    fn test_escape_typst() {
        assert_eq!(escape_typst("AHU_1 #2"), "AHU\\_1 \\#2");
        assert_eq!(escape_typst("[x]"), "\\[x\\]");
    }

    #[test]
    fn test_report_source_contents() {
        let input = sample_input();
        let result = calculate_bundled(&input).unwrap();
        let source = build_report_source(&input, &result, &ReportHeader::new("J. Doe", "25-001"));

        assert!(source.contains("AHU\\_1 \\[roof\\]"));
        assert!(source.contains("25-001"));
        assert!(source.contains("== ASCE/SEI 7-22"));
        assert!(source.contains("== ASCE/SEI 7-16"));
        assert!(source.contains("Eqn 13.3-6"));
        assert!(!source.contains("{{"), "unreplaced placeholder");
    }

    #[test]
    fn test_report_source_single_edition() {
        let mut input = sample_input();
        input.editions.asce7_16 = false;
        let result = calculate_bundled(&input).unwrap();
        let source = build_report_source(&input, &result, &ReportHeader::default());
        assert!(!source.contains("== ASCE/SEI 7-16"));
    }

    #[test]
    fn test_pdf_generation() {
        let input = sample_input();
        let result = calculate_bundled(&input).unwrap();
        let pdf = render_fp_pdf(&input, &result, &ReportHeader::new("Test Engineer", "TEST-001"));

        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());
        let pdf_bytes = pdf.unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"), "Output is not a valid PDF");
        assert!(pdf_bytes.len() > 1000, "PDF seems too small");
    }
}
