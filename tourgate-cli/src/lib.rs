//! Command-line interface for the Tourgate route optimisation gateway.
//!
//! `tourgate serve` runs the HTTP API; `tourgate optimize <path>` runs the
//! same pipeline once for a request stored on disk.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

pub mod config;
mod error;
mod optimize;
pub mod server;

pub use config::{CorsOrigins, PipelineConfig, ServeConfig, SolverKind};
pub use error::CliError;
pub use optimize::build_optimizer;

/// Run the Tourgate CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments or configuration are invalid, the
/// optimiser cannot be built, or the selected command fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Serve(args) => {
            let config = args.into_config()?;
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .map_err(CliError::Runtime)?;
            runtime.block_on(server::serve(config))
        }
        Command::Optimize(args) => optimize::run_optimize(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "tourgate",
    about = "Route optimisation gateway backed by an OSRM routing service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the optimisation API over HTTP.
    Serve(config::ServeArgs),
    /// Optimise a single request read from a JSON file.
    Optimize(config::OptimizeArgs),
}

#[cfg(test)]
mod tests;
