//! CLI entry point for the manufacturing defect report.

use anyhow::{Result, anyhow};
use clap::Parser;
use defect_analysis::config::{DEFAULT_CLEANED_NAME, DEFAULT_INPUT};
use defect_analysis::{AnalysisReport, ReportConfig, ReportPipeline};
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Quality report for manufacturing defect data",
    long_about = "Loads a CSV of manufacturing defects, checks and cleans it, runs Pareto, \
                  shift and machine analyses, exports a cleaned CSV with charts and prints \
                  a summary.\n\n\
                  EXAMPLES:\n  \
                  # Standard report over ./manufacturing_defects.csv\n  \
                  defect-analysis\n\n  \
                  # Other input, outputs in reports/\n  \
                  defect-analysis -i data/march.csv -o reports/\n\n  \
                  # Machine-readable output only\n  \
                  defect-analysis --json --no-charts | jq .headlines"
)]
struct Args {
    /// Path to the CSV file to analyze
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    input: String,

    /// Output directory for the cleaned CSV, charts and report
    #[arg(short, long, default_value = ".")]
    output: String,

    /// File name of the cleaned dataset
    #[arg(long, default_value = DEFAULT_CLEANED_NAME)]
    cleaned_name: String,

    /// Skip chart rendering
    #[arg(long)]
    no_charts: bool,

    /// Number of leading defect types in the Pareto headline
    #[arg(long, default_value = "3")]
    top_n: usize,

    /// Shift whose share of defects is reported
    #[arg(long, default_value = "Night")]
    shift: String,

    /// Machine whose mean cost is reported
    ///
    /// If not specified, the machine with the highest mean cost is used
    #[arg(long)]
    machine: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of the console report
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write a JSON report to the output directory
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let mut config_builder = ReportConfig::builder()
        .input_path(&args.input)
        .output_dir(&args.output)
        .cleaned_file_name(&args.cleaned_name)
        .render_charts(!args.no_charts)
        .top_n(args.top_n)
        .focus_shift(&args.shift);

    if let Some(ref machine) = args.machine {
        config_builder = config_builder.focus_machine(machine);
    }

    let config = config_builder.build()?;

    info!("{}", "=".repeat(60));
    info!("Starting defect report for {}", args.input);
    info!("{}", "=".repeat(60));

    match ReportPipeline::new(config).run() {
        Ok(report) => handle_output(&report, &args),
        Err(e) => {
            error!("Report failed: {}", e);
            Err(anyhow!("Report failed: {}", e))
        }
    }
}

/// Handle report output based on CLI flags.
///
/// Output behavior:
/// - Default: Print the console report to stdout
/// - `--json`: Print JSON to stdout only (no logs)
/// - `--emit-report`: Write the JSON report to a file as well
fn handle_output(report: &AnalysisReport, args: &Args) -> Result<()> {
    if args.emit_report {
        let input_stem = extract_file_stem(&args.input);
        let report_path = report.write_to_file(&PathBuf::from(&args.output), &input_stem)?;
        info!("Report written to: {}", report_path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("{report}");
    Ok(())
}

fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset")
        .to_string()
}
