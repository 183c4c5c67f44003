//! CLI commands for the skysense binary.
//!
//! Provides ingest, stream, classify, and config subcommands. Command results
//! go to stdout; diagnostics go to stderr through tracing.

use crate::exit_codes::ExitCode;
use crate::export::export_text;
use crate::health::{classify, tier_label};
use crate::logging::{self, LogFormat};
use crate::state::AirQualityState;
use clap::{ArgAction, Args, Parser, Subcommand};
use sky_common::{Error, OutputFormat, SCHEMA_VERSION};
use sky_config::{resolve_config, ResolvedConfig};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// SkySense particulate telemetry pipeline
#[derive(Parser, Debug)]
#[command(name = "skysense", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand
#[derive(Args, Debug)]
pub struct GlobalOpts {
    /// Configuration file (overrides SKYSENSE_CONFIG and the XDG location)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable reverse geocoding; locations fall back to coordinates
    #[arg(long, global = true)]
    pub offline: bool,

    /// Log line encoding on stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// skysense subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest a sensor log file (CSV or spreadsheet)
    Ingest {
        /// Sensor log to ingest
        file: PathBuf,
        /// Calendar date recorded in the upload history (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Ingest JSON-lines sensor samples
    Stream {
        /// Input file; stdin when absent or `-`
        #[arg(long)]
        input: Option<PathBuf>,
        /// Format of the final snapshot
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Show the health risks for an AQI value
    Classify {
        /// AQI value
        #[arg(allow_negative_numbers = true)]
        aqi: i64,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Print the resolved configuration
    Config {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
}

/// Run a parsed command line.
pub fn run(cli: &Cli) -> ExitCode {
    let global = &cli.global;
    logging::init(global.log_format, global.verbose, global.quiet);

    let resolved = match load_config(global) {
        Ok(resolved) => resolved,
        Err(err) => {
            error!(error = %err, "configuration rejected");
            eprintln!("skysense: {err}");
            return ExitCode::ConfigError;
        }
    };

    match &cli.command {
        Commands::Ingest { file, date, format } => {
            run_ingest(&resolved, file, date.as_deref(), *format)
        }
        Commands::Stream { input, format } => run_stream(&resolved, input.as_deref(), *format),
        Commands::Classify { aqi, format } => run_classify(*aqi, *format),
        Commands::Config { format } => run_config(&resolved, *format),
    }
}

fn load_config(global: &GlobalOpts) -> Result<ResolvedConfig, Error> {
    let mut resolved = resolve_config(global.config.as_deref())?;
    if global.offline {
        resolved.config.geocoder.enabled = false;
    }
    Ok(resolved)
}

fn run_ingest(
    resolved: &ResolvedConfig,
    file: &Path,
    date: Option<&str>,
    format: OutputFormat,
) -> ExitCode {
    let bytes = match std::fs::read(file) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("skysense: cannot read {}: {err}", file.display());
            return ExitCode::IoError;
        }
    };
    let filename = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());

    let state = AirQualityState::from_config(resolved.config.clone());
    match state.ingest_batch(&bytes, &filename, date) {
        Ok(snapshot) => {
            let written = match format {
                OutputFormat::Json => print_json(&snapshot, true),
                OutputFormat::Text => write_stdout(&export_text(&snapshot)),
            };
            written.map(|_| ExitCode::Clean).unwrap_or_else(|err| report(&err, "ingest", format))
        }
        Err(err) => report(&err, "ingest", format),
    }
}

fn run_stream(resolved: &ResolvedConfig, input: Option<&Path>, format: OutputFormat) -> ExitCode {
    let reader: Box<dyn BufRead> = match input {
        None => Box::new(BufReader::new(io::stdin())),
        Some(path) if path.as_os_str() == "-" => Box::new(BufReader::new(io::stdin())),
        Some(path) => match File::open(path) {
            Ok(file) => Box::new(BufReader::new(file)),
            Err(err) => {
                eprintln!("skysense: cannot open {}: {err}", path.display());
                return ExitCode::IoError;
            }
        },
    };

    let state = AirQualityState::from_config(resolved.config.clone());
    let mut accepted = 0usize;
    let mut rejected = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                eprintln!("skysense: read failed: {err}");
                return ExitCode::IoError;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let record = match state.ingest_sample_json(line.as_bytes()) {
            Ok(ack) => {
                accepted += 1;
                serde_json::json!({ "line": line_no, "ack": ack })
            }
            Err(err) => {
                rejected += 1;
                serde_json::json!({
                    "line": line_no,
                    "error": { "code": err.code(), "message": err.to_string() },
                })
            }
        };
        if let Err(err) = print_json(&record, false) {
            return report(&err, "stream", format);
        }
    }

    info!(accepted, rejected, "stream finished");
    let snapshot = state.current_snapshot();
    let written = match format {
        OutputFormat::Json => print_json(&snapshot, false),
        OutputFormat::Text => write_stdout(&export_text(&snapshot)),
    };
    if let Err(err) = written {
        return report(&err, "stream", format);
    }
    if rejected > 0 {
        ExitCode::PartialStream
    } else {
        ExitCode::Clean
    }
}

fn run_classify(aqi: i64, format: OutputFormat) -> ExitCode {
    let risks = classify(aqi);
    let tier = tier_label(aqi);
    let written = match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "command": "classify",
                "aqi": aqi,
                "tier": tier,
                "health_risks": risks,
            });
            print_json(&output, true)
        }
        OutputFormat::Text => {
            let mut text = format!("# AQI {aqi}: {tier}\n");
            for risk in &risks {
                text.push_str(&format!(
                    "\n  [{}] {} ({}%)\n    {}\n",
                    risk.severity, risk.name, risk.probability, risk.description
                ));
                for rec in &risk.recommendations {
                    text.push_str(&format!("    - {rec}\n"));
                }
            }
            write_stdout(text.as_bytes())
        }
    };
    written
        .map(|_| ExitCode::Clean)
        .unwrap_or_else(|err| report(&err, "classify", format))
}

fn run_config(resolved: &ResolvedConfig, format: OutputFormat) -> ExitCode {
    let written = match format {
        OutputFormat::Json => print_json(resolved, true),
        OutputFormat::Text => {
            let cfg = &resolved.config;
            let text = format!(
                "# Configuration ({:?})\n\n  \
                 Series capacity: {}\n  \
                 Movement threshold: {} deg\n  \
                 Geocoder: {} ({})\n  \
                 Timeout: {}s x {} attempts\n  \
                 Relocate interval: {}s\n  \
                 History order: {:?}\n",
                resolved.source,
                cfg.series.capacity,
                cfg.series.movement_threshold_deg,
                if cfg.geocoder.enabled { "enabled" } else { "disabled" },
                cfg.geocoder.endpoint,
                cfg.geocoder.timeout_secs,
                cfg.geocoder.max_attempts,
                cfg.streaming.relocate_interval_secs,
                cfg.history.default_order,
            );
            write_stdout(text.as_bytes())
        }
    };
    written
        .map(|_| ExitCode::Clean)
        .unwrap_or_else(|err| report(&err, "config", format))
}

/// Report a failed command and map it to an exit code.
fn report(err: &Error, command: &str, format: OutputFormat) -> ExitCode {
    error!(command, code = err.code(), error = %err, "command failed");
    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "command": command,
                "error": { "code": err.code(), "message": err.to_string() },
            });
            let _ = print_json(&output, true);
        }
        OutputFormat::Text => eprintln!("skysense: {err}"),
    }
    ExitCode::from(err)
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T, pretty: bool) -> Result<(), Error> {
    let mut rendered = if pretty {
        serde_json::to_vec_pretty(value)?
    } else {
        serde_json::to_vec(value)?
    };
    rendered.push(b'\n');
    write_stdout(&rendered)
}

fn write_stdout(bytes: &[u8]) -> Result<(), Error> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(bytes)?;
    stdout.flush()?;
    Ok(())
}
