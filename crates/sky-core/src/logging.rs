//! Tracing subscriber setup. All log output goes to stderr so stdout stays
//! reserved for command results.

use clap::ValueEnum;
use std::io;
use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive.
pub const ENV_LOG: &str = "SKYSENSE_LOG";

/// Log line encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Default level for a `-v` count / `-q` flag combination.
pub fn default_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. `SKYSENSE_LOG` wins over the flags.
///
/// Calling this twice is harmless; the second call is ignored.
pub fn init(format: LogFormat, verbose: u8, quiet: bool) {
    let level = default_level(verbose, quiet);
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false);
    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
