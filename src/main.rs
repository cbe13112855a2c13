use std::process::ExitCode;

use clap::Parser;
use nifi_align::cli::parse_failure_code;
use nifi_align::{logging, Cli};
use tracing::debug;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(parse_failure_code(&e));
        }
    };

    if let Err(e) = logging::init_logging() {
        eprintln!("{:#}", e);
    }

    match nifi_align::run(cli).await {
        Ok(report) => {
            debug!(?report, "Run finished");
            ExitCode::SUCCESS
        }
        Err(e) => ExitCode::from(e.exit_code()),
    }
}
