//! # FpCalc CLI
//!
//! Reads an input bundle (JSON), resolves SDS (manual or USGS lookup), runs
//! the Fp calculation, and prints a text summary or JSON. Optionally writes a
//! PDF report.
//!
//! ```bash
//! fpcalc demos/ahu-roof.json
//! fpcalc demos/ahu-roof.json --sds 1.2 --json
//! fpcalc demos/ahu-roof.json --lat 37.80 --lon -122.27 --site-class D --pdf ahu.pdf
//! fpcalc demos/ahu-roof.json --address "601 12th Street, Oakland, CA 94607"
//! ```
//!
//! Logs go to stderr (`RUST_LOG` honoured), results to stdout.

mod bundle;
mod config;
mod error;
mod geocode;
mod http;
mod usgs;

use std::path::{Path, PathBuf};

use clap::{ArgGroup, Parser};
use fpcalc_core::calculations::{calculate_bundled, FpForce, FpResult};
use fpcalc_core::pdf::{render_fp_pdf, ReportHeader};
use fpcalc_core::errors::CalcError;
use fpcalc_core::site::{resolve_sds, SdsInput, SiteClass, SiteQuery};
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use crate::bundle::InputBundle;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::geocode::Nominatim;
use crate::usgs::UsgsDesignMaps;

/// FpCalc - seismic design force for nonstructural components (ASCE/SEI 7 Ch. 13)
#[derive(Parser, Debug)]
#[command(name = "fpcalc", version)]
#[command(group(ArgGroup::new("location").args(["lat", "address"])))]
struct Args {
    /// Input bundle (JSON)
    input: PathBuf,

    /// Print the full result as JSON instead of a text summary
    #[arg(long)]
    json: bool,

    /// Write a PDF report to this path
    #[arg(long, value_name = "PATH")]
    pdf: Option<PathBuf>,

    /// Use this SDS (g) instead of the bundle's SDS input
    #[arg(long, value_name = "G", conflicts_with_all = ["lat", "lon"])]
    sds: Option<f64>,

    /// Site latitude for a USGS lookup
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Site longitude for a USGS lookup
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Street address, geocoded to coordinates for a USGS lookup
    #[arg(long, value_name = "TEXT", conflicts_with_all = ["lat", "lon", "sds"])]
    address: Option<String>,

    /// Site class for a USGS lookup (A, B, BC, C, CD, D, DE, E, Default)
    #[arg(long, value_name = "CLASS", requires = "location")]
    site_class: Option<String>,

    /// Evaluate ASCE 7-16 (true/false)
    #[arg(long = "asce7-16", value_name = "BOOL")]
    asce7_16: Option<bool>,

    /// Evaluate ASCE 7-22 (true/false)
    #[arg(long = "asce7-22", value_name = "BOOL")]
    asce7_22: Option<bool>,

    /// Configuration file (defaults to $FPCALC_CONFIG or ./fpcalc.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "fpcalc=debug,fpcalc_core=debug"
    } else {
        "fpcalc=info,fpcalc_core=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(&args) {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e);
        if let CliError::Calc(calc) = &e {
            if let Ok(json) = serde_json::to_string_pretty(calc) {
                eprintln!("{}", json);
            }
            if calc.is_recoverable() {
                eprintln!("Hint: pass --sds <g> to enter SDS manually.");
            }
        }
        std::process::exit(e.exit_code());
    }
}

fn run(args: &Args) -> CliResult<()> {
    let config = CliConfig::load(args.config.as_deref())?;
    let bundle = read_bundle(&args.input)?;

    let runtime = Runtime::new().map_err(CliError::Runtime)?;
    let coordinates = match &args.address {
        Some(address) => {
            let geocoder = Nominatim::new(config.geocode.clone())?;
            let site = runtime.block_on(geocoder.geocode(address))?;
            Some((site.latitude, site.longitude))
        }
        None => args.lat.zip(args.lon),
    };
    let bundle = apply_overrides(bundle, args, coordinates)?;

    let provider = UsgsDesignMaps::new(config.usgs.clone())?;
    let site = runtime.block_on(resolve_sds(&bundle.sds, &provider))?;
    tracing::info!(sds_g = site.sds_g, "SDS resolved");

    let input = bundle.into_input(site);
    let result = calculate_bundled(&input)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result).map_err(CalcError::from)?);
    } else {
        print_summary(&result);
    }

    if let Some(path) = &args.pdf {
        let header = ReportHeader::new(&config.report.engineer, &config.report.job_id);
        let bytes = render_fp_pdf(&input, &result, &header)?;
        std::fs::write(path, bytes).map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), "PDF report written");
    }

    Ok(())
}

fn read_bundle(path: &Path) -> CliResult<InputBundle> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(InputBundle::from_json(&text)?)
}

/// Apply command-line overrides; `coordinates` come from `--lat/--lon` or a
/// geocoded `--address`.
fn apply_overrides(
    mut bundle: InputBundle,
    args: &Args,
    coordinates: Option<(f64, f64)>,
) -> CliResult<InputBundle> {
    if let Some(sds_g) = args.sds {
        bundle = bundle.with_sds(SdsInput::Manual { sds_g });
    } else if let Some((latitude, longitude)) = coordinates {
        let site_class = match &args.site_class {
            Some(code) => SiteClass::from_str_flexible(code)?,
            None => SiteClass::default(),
        };
        let risk_category = bundle.occupancy.risk_category;
        bundle = bundle.with_sds(SdsInput::Lookup(SiteQuery {
            latitude,
            longitude,
            site_class,
            risk_category,
        }));
    }
    if let Some(on) = args.asce7_16 {
        bundle.editions.asce7_16 = on;
    }
    if let Some(on) = args.asce7_22 {
        bundle.editions.asce7_22 = on;
    }
    Ok(bundle)
}

fn print_summary(result: &FpResult) {
    println!("═══════════════════════════════════════");
    println!("  {}", if result.label.is_empty() { "COMPONENT" } else { result.label.as_str() });
    println!("═══════════════════════════════════════");
    println!();
    println!("Parameters:");
    println!("  SDS  = {:.3} g", result.sds_g);
    println!("  Ie   = {:.2}   Ip = {:.2}", result.ie, result.ip);
    match result.ta_s() {
        Some(ta) => println!("  Ta   = {:.3} s", ta),
        None => println!("  Ta   = not determined"),
    }
    println!("  z/h  = {:.3} ({})", result.elevation_ratio, result.location.display_name());
    println!("  Hf   = {:.3}", result.hf());
    println!("  Rμ   = {:.3}", result.rmu());
    println!(
        "  CAR  = {:.2}   Rpo = {:.2}   Ω0p = {:.2}",
        result.component.car, result.component.rpo, result.component.omega_0p
    );
    println!("  Component: {}", result.component.name);

    if let Some(r) = &result.asce7_22 {
        println!();
        println!("ASCE 7-22:");
        print_force(&r.force, r.emh_lb);
    }
    if let Some(r) = &result.asce7_16 {
        println!();
        println!(
            "ASCE 7-16 (ap = {:.2}, Rp = {:.2}):",
            r.factors.ap, r.factors.rp
        );
        print_force(&r.force, r.emh_lb);
    }
    for note in &result.notes {
        println!();
        println!("Note: {}", note);
    }
    println!();
    println!("═══════════════════════════════════════");
    if let Some(fp) = result.fp_lb() {
        println!("  Fp = {:.0} lb   Emh = {:.0} lb", fp, result.emh_lb().unwrap_or(0.0));
    }
    println!("═══════════════════════════════════════");
}

fn print_force(force: &FpForce, emh_lb: f64) {
    println!("  Fp,calc = {:.3} Wp = {:.0} lb", force.coefficient_calc, force.fp_calc_lb);
    println!("  Fp,min  = {:.3} Wp = {:.0} lb", force.coefficient_min, force.fp_min_lb);
    println!("  Fp,max  = {:.3} Wp = {:.0} lb", force.coefficient_max, force.fp_max_lb);
    println!(
        "  Fp      = {:.3} Wp = {:.0} lb ({} governs)",
        force.coefficient,
        force.fp_lb,
        force.governs.display_name()
    );
    println!("  Emh     = {:.0} lb", emh_lb);
}
