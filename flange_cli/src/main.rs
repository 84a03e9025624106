//! # Flange CLI
//!
//! Command-line front end for `flange_core`: sizes and verifies blind
//! flanges from job files, and exposes the table lookups.
//!
//! ```text
//! flange_cli size job.toml
//! flange_cli verify job.toml --json
//! flange_cli lookup --dn 100 --pn 40
//! flange_cli allowable --material P265GH --temp 150 --code EN --usage operating
//! flange_cli hydrotest --code ASME --design-pressure 16 --design-temp 200 --material P265GH
//! flange_cli materials
//! ```
//!
//! Logging goes to stderr and follows `RUST_LOG` (default `warn`).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use flange_core::calculations::{ManualCheckResult, SizedResult, SizingOutcome};
use flange_core::equations::{allowable_stress_detail, hydrotest_pressure, DesignCode, StressUsage};
use flange_core::materials::{fastener_grades, plate_materials, GASKET_MATERIALS};
use flange_core::{standards, CalcError, Job};

#[derive(Parser, Debug)]
#[command(name = "flange_cli", about = "Blind flange sizing and verification")]
struct Cli {
    /// Print results as JSON instead of a report
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the sizing request of a job file
    Size {
        /// Job file (.toml or .json)
        job: PathBuf,
    },
    /// Run the manual verification of a job file
    Verify {
        /// Job file (.toml or .json)
        job: PathBuf,
    },
    /// Look up EN 1092-1 blind flange dimensions
    Lookup {
        #[arg(long)]
        dn: u32,
        /// Pressure class; all cataloged classes when omitted
        #[arg(long)]
        pn: Option<u32>,
    },
    /// Allowable plate stress at a temperature
    Allowable {
        #[arg(long)]
        material: String,
        /// Temperature (°C)
        #[arg(long)]
        temp: f64,
        #[arg(long, default_value = "EN", value_parser = parse_code)]
        code: DesignCode,
        #[arg(long, default_value = "operating", value_parser = parse_usage)]
        usage: StressUsage,
    },
    /// Hydrotest pressure
    Hydrotest {
        #[arg(long, default_value = "EN", value_parser = parse_code)]
        code: DesignCode,
        /// Design pressure (bar)
        #[arg(long)]
        design_pressure: f64,
        /// Operating pressure (bar); the design pressure when omitted
        #[arg(long)]
        operating_pressure: Option<f64>,
        /// Design temperature (°C)
        #[arg(long)]
        design_temp: f64,
        /// Test temperature (°C)
        #[arg(long, default_value_t = 20.0)]
        test_temp: f64,
        #[arg(long)]
        material: String,
    },
    /// List plate materials, fastener grades and gasket materials
    Materials,
}

fn parse_code(s: &str) -> Result<DesignCode, String> {
    DesignCode::from_str_flexible(s).map_err(|e| e.to_string())
}

fn parse_usage(s: &str) -> Result<StressUsage, String> {
    StressUsage::from_str_flexible(s).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(command = ?cli.command, json = cli.json, "starting");
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {}", e);
            if cli.json {
                if let Ok(json) = serde_json::to_string_pretty(&e) {
                    eprintln!("{}", json);
                }
            }
            ExitCode::FAILURE
        }
    }
}

/// Run a command; `Ok(false)` when the calculation itself failed
fn run(cli: &Cli) -> Result<bool, CalcError> {
    match &cli.command {
        Command::Size { job } => {
            let job = Job::load(job)?;
            let outcome = job
                .run_sizing()
                .ok_or_else(|| CalcError::missing_field("sizing"))??;
            if cli.json {
                print_json(&outcome)?;
            } else {
                print_sizing(&outcome);
            }
            Ok(outcome.sized().is_some())
        }
        Command::Verify { job } => {
            let job = Job::load(job)?;
            let result = job.run_manual().ok_or_else(|| CalcError::missing_field("manual"))?;
            if cli.json {
                print_json(&result)?;
            } else {
                print_manual(&result);
            }
            Ok(result.pass)
        }
        Command::Lookup { dn, pn } => {
            let entries: Vec<standards::StandardFlange> = match pn {
                Some(pn) => standards::lookup(*dn, *pn).into_iter().collect(),
                None => standards::classes_for(*dn)
                    .into_iter()
                    .filter_map(|pn| standards::lookup(*dn, pn))
                    .collect(),
            };
            if cli.json {
                print_json(&entries)?;
            } else if entries.is_empty() {
                println!("No EN 1092-1 entry for DN{}{}", dn, pn.map(|p| format!(" PN{}", p)).unwrap_or_default());
            } else {
                println!("{:>6} {:>5} {:>8} {:>8} {:>4} {:>6} {:>6}", "DN", "PN", "D", "K", "n", "bolt", "hole");
                for f in &entries {
                    println!(
                        "{:>6} {:>5} {:>8.0} {:>8.0} {:>4} {:>6} {:>6.0}",
                        f.dn,
                        f.pn,
                        f.outer_diameter_mm,
                        f.bolt_circle_mm,
                        f.bolt_count,
                        f.thread_size,
                        f.hole_diameter_mm
                    );
                }
            }
            Ok(!entries.is_empty())
        }
        Command::Allowable { material, temp, code, usage } => {
            let stress = allowable_stress_detail(material, *temp, *code, *usage);
            if cli.json {
                print_json(&stress)?;
            } else {
                println!("{} at {:.0} °C ({} {:?}): {:.1} MPa", material, temp, code, usage, stress.stress_mpa);
                match (stress.yield_mpa, stress.safety_factor, stress.temperature_point_c) {
                    (Some(y), Some(sf), Some(t)) => println!("  = {:.1} MPa yield at {:.0} °C / {:.2}", y, t, sf),
                    _ => println!("  material not found, fallback allowable"),
                }
            }
            Ok(true)
        }
        Command::Hydrotest {
            code,
            design_pressure,
            operating_pressure,
            design_temp,
            test_temp,
            material,
        } => {
            let result = hydrotest_pressure(
                *code,
                *design_pressure,
                operating_pressure.unwrap_or(*design_pressure),
                *design_temp,
                *test_temp,
                material,
            );
            if cli.json {
                print_json(&result)?;
            } else {
                println!("Test pressure: {:.2} bar", result.test_pressure_bar);
                println!("  {}", result.basis_text);
            }
            Ok(true)
        }
        Command::Materials => {
            if cli.json {
                let listing = serde_json::json!({
                    "plate": plate_materials().iter().map(|m| &m.id).collect::<Vec<_>>(),
                    "fasteners": fastener_grades()
                        .iter()
                        .map(|g| format!("{} {}", g.standard, g.id))
                        .collect::<Vec<_>>(),
                    "gaskets": GASKET_MATERIALS.iter().map(|g| g.id).collect::<Vec<_>>(),
                });
                print_json(&listing)?;
            } else {
                println!("Plate materials:");
                for m in plate_materials() {
                    println!("  {:<14} {}", m.id, m.name);
                }
                println!();
                println!("Fastener grades:");
                for g in fastener_grades() {
                    let flag = if g.placeholder { " (placeholder)" } else { "" };
                    println!("  {:<5} {:<14} {}{}", g.standard, g.id, g.name, flag);
                }
                println!();
                println!("Gasket materials:");
                for g in GASKET_MATERIALS.iter() {
                    println!("  {:<14} m = {:.2}, y = {:.1} MPa", g.id, g.factors.m, g.factors.y_mpa);
                }
            }
            Ok(true)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CalcError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn status_icon(pass: bool) -> &'static str {
    if pass {
        "[OK]"
    } else {
        "[FAIL]"
    }
}

fn print_notes(notes: &[String]) {
    if notes.is_empty() {
        return;
    }
    println!();
    println!("Notes:");
    for note in notes {
        println!("  - {}", note);
    }
}

fn print_sizing(outcome: &SizingOutcome) {
    match outcome {
        SizingOutcome::Sized(result) => print_sized(result),
        SizingOutcome::Infeasible { closest } => {
            println!("RESULT: no feasible bolt layout");
            if let Some(reason) = closest {
                println!("  {}", reason.message);
            }
        }
        SizingOutcome::Blocked { reason, .. } => {
            println!("RESULT: blocked");
            println!("  {}", reason);
        }
    }
}

fn print_sized(r: &SizedResult) {
    let d = &r.design;
    println!("═══════════════════════════════════════");
    println!("  BLIND FLANGE SIZING  {} DN{} PN{}", r.label, r.nominal_size, r.pressure_class);
    println!("═══════════════════════════════════════");
    println!();
    println!("Hydrotest: {:.2} bar", r.hydrotest.test_pressure_bar);
    println!("  {}", r.hydrotest.basis_text);
    println!(
        "Gasket:    G = {:.1} mm, b = {:.1} mm, {:.0}/{:.0} mm ({}, m = {}, y = {} MPa)",
        r.gasket.effective_diameter_mm, r.gasket.effective_width_mm, r.gasket.id_mm, r.gasket.od_mm,
        r.gasket.material, r.gasket.m, r.gasket.y_mpa
    );
    println!(
        "Loads:     Wm1 = {:.0} N, Wm2 op = {:.0} N, Wm2 hydro = {:.0} N",
        r.loads.wm1_n, r.loads.wm2_op_n, r.loads.wm2_hydro_n
    );
    println!();
    println!("Design ({:?}, {} of {} layouts pass):", r.preference, r.candidates_passing, r.candidates_evaluated);
    println!("  Bolts:        {} x {} {} {}", d.bolt_count, d.bolt_size, d.fastener.standard, d.fastener.grade_id);
    println!("  Bolt circle:  {:.0} mm", d.bolt_circle_mm);
    println!("  Outer dia.:   {:.0} mm", d.outer_diameter_mm);
    println!(
        "  Bolt area:    {:.0} / {:.0} mm² ({} governs) {}",
        d.bolt_check.max_required(),
        d.bolt_check.provided_area_mm2,
        d.bolt_check.governing_case,
        status_icon(d.bolt_check.pass)
    );
    println!(
        "  Thickness:    ASME {:.1} mm, EN {:.1} mm, {} governs",
        d.thickness.asme_mm,
        d.thickness.en_mm,
        d.thickness.governing.code()
    );
    println!(
        "                {:.1} + {:.1} CA = {:.1} mm -> plate {:.0} mm",
        d.thickness.raw_mm(),
        d.thickness.corrosion_allowance_mm,
        d.thickness.final_mm,
        d.thickness.recommended_mm
    );
    println!("  Weight:       {:.1} kg", d.weight_kg);
    println!(
        "  Torque:       {:.0} N·m ({:.0} to {:.0}), preload {:.0} N per bolt{}",
        d.torque.torque_nm,
        d.torque.torque_min_nm,
        d.torque.torque_max_nm,
        d.torque.preload_per_bolt_n,
        if d.torque.capped_by_proof { " (capped)" } else { "" }
    );
    print_notes(&r.notes);
}

fn print_manual(r: &ManualCheckResult) {
    println!("═══════════════════════════════════════");
    println!("  MANUAL GEOMETRY CHECK");
    println!("═══════════════════════════════════════");
    println!();
    if let Some(h) = &r.hydrotest {
        println!("Hydrotest: {:.2} bar", h.test_pressure_bar);
    }
    if let Some(g) = &r.geometry {
        println!(
            "Edge:      {:.1} / {:.1} mm radius {}",
            g.required_radius_mm,
            g.available_radius_mm,
            status_icon(g.edge_pass)
        );
        println!("Spacing:   pitch {:.1} / {:.1} mm {}", g.pitch_mm, g.required_pitch_mm, status_icon(g.spacing_pass));
    }
    if let Some(b) = &r.bolts {
        println!(
            "Bolt area: seating {:.2}, operating {:.2}, hydrotest {:.2} {}",
            b.utilization_seating,
            b.utilization_operating,
            b.utilization_hydro,
            status_icon(b.check.pass)
        );
    }
    if let Some(t) = &r.thickness {
        println!(
            "Thickness: {:.1} required, {:.1} supplied ({:.2}) {}",
            t.required_with_ca_mm,
            t.supplied_mm,
            t.utilization,
            status_icon(t.pass)
        );
    }
    if let Some(t) = &r.torque {
        println!("Torque:    {:.0} N·m ({:.0} to {:.0})", t.torque_nm, t.torque_min_nm, t.torque_max_nm);
    }
    println!();
    println!("RESULT: {}", if r.pass { "PASS" } else { "FAIL" });
    for e in &r.errors {
        println!("  - {}", e);
    }
    print_notes(&r.notes);
}
