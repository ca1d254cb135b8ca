//! Croprec Core - Recommendation Explanation Engine
//!
//! The main entry point for cr-core, handling:
//! - Model bundle and reference dataset loading
//! - Recommendation generation with narrative explanations
//! - Counterfactual suggestions for alternative crops
//! - Artifact validation

use clap::{Args, Parser, Subcommand};
use cr_common::{format_error_human, Error, OutputFormat, StructuredError};
use cr_core::context::EngineContext;
use cr_core::engine::normalize::InputRow;
use cr_core::engine::report::{generate_recommendation, PlotSink};
use cr_core::exit_codes::ExitCode;
use cr_core::logging::{init_logging, LogConfig, LogFormat};
use cr_core::plot::{NoopRenderer, PlotRenderer, SvgWaterfall};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::info;

/// Croprec Core - Crop recommendation explanations and counterfactuals
#[derive(Parser)]
#[command(name = "cr-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to the model bundle JSON
    #[arg(long, global = true, env = "CR_BUNDLE", default_value = "data/model_bundle.json")]
    bundle: PathBuf,

    /// Path to the reference dataset CSV
    #[arg(long, global = true, env = "CR_DATASET", default_value = "data/crop_reference.csv")]
    dataset: PathBuf,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Log filter directive (overrides CR_LOG / RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log output format (human, jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an explained recommendation for one input row
    Recommend(RecommendArgs),

    /// Validate the model bundle and reference dataset
    Check,

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct RecommendArgs {
    /// Input row as a JSON object, e.g. '{"N": 90, "ph": 6.5}'
    #[arg(long, conflicts_with = "input_file")]
    input: Option<String>,

    /// Read the input row JSON object from a file
    #[arg(long)]
    input_file: Option<PathBuf>,

    /// Nitrogen (kg/ha)
    #[arg(long, short = 'n')]
    nitrogen: Option<f64>,

    /// Phosphorus (kg/ha)
    #[arg(long, short = 'p')]
    phosphorus: Option<f64>,

    /// Potassium (kg/ha)
    #[arg(long, short = 'k')]
    potassium: Option<f64>,

    /// Temperature (celsius)
    #[arg(long)]
    temperature: Option<f64>,

    /// Relative humidity (percent)
    #[arg(long)]
    humidity: Option<f64>,

    /// Soil pH
    #[arg(long)]
    ph: Option<f64>,

    /// Rainfall (mm)
    #[arg(long)]
    rainfall: Option<f64>,

    /// Directory for plot artifacts
    #[arg(long, default_value = "results")]
    out: PathBuf,

    /// Skip plot rendering entirely
    #[arg(long)]
    no_plots: bool,
}

// ============================================================================
// Main entry point
// ============================================================================

fn main() {
    let cli = Cli::parse();

    // JSON payloads on stdout pair with JSONL logs on stderr so agent
    // pipelines stay machine-readable end to end.
    let log_format = cli.global.log_format.unwrap_or(match cli.global.format {
        OutputFormat::Json => LogFormat::Jsonl,
        OutputFormat::Text => LogFormat::Human,
    });
    init_logging(&LogConfig::from_env(
        cli.global.log_level.clone(),
        Some(log_format),
    ));

    let exit_code = match cli.command {
        Commands::Recommend(args) => run_recommend(&cli.global, &args),
        Commands::Check => run_check(&cli.global),
        Commands::Version => {
            print_version(&cli.global);
            ExitCode::Success
        }
    };

    exit_code.exit();
}

// ============================================================================
// Command implementations
// ============================================================================

fn run_recommend(global: &GlobalOpts, args: &RecommendArgs) -> ExitCode {
    let result = (|| -> cr_common::Result<()> {
        let row = parse_input_row(args)?;
        let ctx = EngineContext::load(&global.bundle, &global.dataset)?;

        let svg = SvgWaterfall;
        let noop = NoopRenderer;
        let renderer: &dyn PlotRenderer = if args.no_plots { &noop } else { &svg };
        let recommendation = generate_recommendation(
            &ctx,
            &row,
            Some(PlotSink {
                dir: &args.out,
                renderer,
            }),
        )?;

        match global.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&recommendation)?);
            }
            OutputFormat::Text => {
                println!("{}", recommendation.full_report);
            }
        }
        Ok(())
    })();

    finish(global, result)
}

fn run_check(global: &GlobalOpts) -> ExitCode {
    let result = (|| -> cr_common::Result<()> {
        let ctx = EngineContext::load(&global.bundle, &global.dataset)?;
        info!(
            bundle = %global.bundle.display(),
            dataset = %global.dataset.display(),
            "artifacts validated"
        );

        match global.format {
            OutputFormat::Json => {
                let summary = serde_json::json!({
                    "status": "ok",
                    "bundle": global.bundle.display().to_string(),
                    "dataset": global.dataset.display().to_string(),
                    "classes": ctx.bundle().num_classes(),
                    "features": ctx.catalog().len(),
                });
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            OutputFormat::Text => {
                println!(
                    "ok: {} classes, {} features",
                    ctx.bundle().num_classes(),
                    ctx.catalog().len()
                );
            }
        }
        Ok(())
    })();

    finish(global, result)
}

fn print_version(global: &GlobalOpts) {
    match global.format {
        OutputFormat::Json => {
            let info = serde_json::json!({
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
                "bundle_schema": cr_core::bundle::BUNDLE_SCHEMA_VERSION,
            });
            println!("{}", info);
        }
        OutputFormat::Text => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }
    }
}

// ============================================================================
// Input assembly
// ============================================================================

/// Assemble the input row from one of three sources: an inline JSON object,
/// a JSON file, or per-feature flags. JSON nulls mean "absent" and are
/// dropped; any other non-numeric value is rejected.
fn parse_input_row(args: &RecommendArgs) -> cr_common::Result<InputRow> {
    if let Some(raw) = &args.input {
        return row_from_json(raw);
    }
    if let Some(path) = &args.input_file {
        let raw = std::fs::read_to_string(path)?;
        return row_from_json(&raw);
    }

    let mut row = InputRow::new();
    let flags = [
        ("N", args.nitrogen),
        ("P", args.phosphorus),
        ("K", args.potassium),
        ("temperature", args.temperature),
        ("humidity", args.humidity),
        ("ph", args.ph),
        ("rainfall", args.rainfall),
    ];
    for (key, value) in flags {
        if let Some(v) = value {
            row.insert(key.to_string(), v);
        }
    }
    Ok(row)
}

fn row_from_json(raw: &str) -> cr_common::Result<InputRow> {
    let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(raw)?;
    let mut row = InputRow::new();
    for (key, value) in object {
        match value {
            serde_json::Value::Null => {}
            serde_json::Value::Number(n) => {
                let v = n.as_f64().ok_or_else(|| Error::SchemaMismatch {
                    feature: key.clone(),
                })?;
                row.insert(key, v);
            }
            _ => return Err(Error::SchemaMismatch { feature: key }),
        }
    }
    Ok(row)
}

// ============================================================================
// Error reporting
// ============================================================================

fn finish(global: &GlobalOpts, result: cr_common::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::Success,
        Err(err) => {
            match global.format {
                OutputFormat::Json => {
                    eprintln!("{}", StructuredError::from(&err).to_json());
                }
                OutputFormat::Text => {
                    let use_color =
                        !global.no_color && std::io::stderr().is_terminal();
                    eprintln!("{}", format_error_human(&err, use_color));
                }
            }
            ExitCode::from_error(&err)
        }
    }
}
