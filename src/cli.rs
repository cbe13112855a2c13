//! Command line surface

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};

use crate::error::EXIT_FAILURE;

/// Global session options shared by every subcommand
#[derive(Debug, Parser)]
#[command(
    name = "nifi-align",
    about = "Lay out NiFi process groups on the canvas",
    version
)]
pub struct Cli {
    /// NiFi base url. (i.e. https://somehost.com:8443)
    #[arg(short = 'l', long, env = "NIFI_LOCATION", global = true)]
    pub location: Option<String>,

    /// Username of the user.
    #[arg(short = 'u', long, env = "NIFI_USERNAME", global = true)]
    pub username: Option<String>,

    /// Password of the user.
    #[arg(short = 'p', long, env = "NIFI_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Timeout in seconds for each HTTP request.
    #[arg(long, env = "NIFI_TIMEOUT_SECS", default_value_t = 30, global = true)]
    pub timeout_secs: u64,

    /// Accept invalid TLS certificates (self-signed NiFi installs).
    #[arg(long, global = true)]
    pub insecure: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Align independent process groups on the canvas in a grid manner.
    Align(AlignArgs),
}

#[derive(Debug, Clone, Args)]
pub struct AlignArgs {
    /// Depth upto which process groups needs to be aligned. NOTE: Provide -1 to align all process groups recursively.
    #[arg(short = 'd', long, default_value_t = 5, allow_negative_numbers = true)]
    pub depth: i64,

    /// Root process group id from which aligning should start down the hierarchy. Defaults to the root process group.
    #[arg(short = 'r', long = "rootpgid")]
    pub root_pg_id: Option<String>,

    /// Maximum number of columns. NOTE: This should not be less than 1.
    #[arg(short = 'c', long, default_value_t = 4, allow_negative_numbers = true)]
    pub columns: i64,
}

/// Exit status for a command line that failed to parse
///
/// Values that do not convert (`-c many`, `-d abc`) are configuration errors
/// and share the failure status of a run. Other usage errors keep clap's own
/// status, and help or version output exits with 0.
pub fn parse_failure_code(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::ValueValidation | ErrorKind::InvalidValue => EXIT_FAILURE,
        _ => u8::try_from(err.exit_code()).unwrap_or(2),
    }
}
