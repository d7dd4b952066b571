//! `lineseek` binary entry point.
//!
//! Parses arguments, initializes logging on stderr and runs the command with
//! results on stdout. See the `lineseek-cli` crate for the commands.

use anyhow::Result;
use lineseek_cli::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::from_args();
    tracing::debug!("Command: {:?}", cli.command);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    lineseek_cli::run(&cli.command, &mut out)?;

    Ok(())
}
