//! Optimiser assembly and the one-shot `optimize` command.

use std::fs::File;
use std::io::{BufReader, Write};
use std::sync::Arc;

use camino::Utf8Path;
use tourgate_core::{
    OptimizationResult, OptimizePayload, Optimizer, OptimizerConfig, RouteOptimizer, TourSolver,
};
use tourgate_data::routing::HttpRoutingProvider;
use tourgate_solver_gls::GuidedLocalSearchSolver;

use crate::CliError;
use crate::config::{OptimizeArgs, OptimizeConfig, PipelineConfig, SolverKind};

/// Build the optimiser described by `config`.
///
/// One [`HttpRoutingProvider`] serves as both the matrix and the geometry
/// provider, so both stages share a connection pool.
///
/// # Errors
///
/// Returns [`CliError::BuildRoutingProvider`] when the routing base URL is
/// invalid or the HTTP client cannot be built, and
/// [`CliError::MissingFeature`] when the configured solver was not compiled
/// in.
pub fn build_optimizer(config: &PipelineConfig) -> Result<Arc<dyn RouteOptimizer>, CliError> {
    let provider = HttpRoutingProvider::with_config(config.routing.clone())
        .map(Arc::new)
        .map_err(|source| CliError::BuildRoutingProvider {
            base_url: config.routing.base_url.clone(),
            source,
        })?;
    let solver = build_solver(config.solver)?;
    log::info!(
        "routing via {} ({}), solver {:?}, budget {:?}",
        config.routing.base_url,
        config.routing.profile,
        config.solver,
        config.solver_time_limit
    );
    Ok(Arc::new(Optimizer::with_config(
        Arc::clone(&provider),
        provider,
        solver,
        OptimizerConfig {
            limits: config.limits,
            solver_time_limit: config.solver_time_limit,
        },
    )))
}

fn build_solver(kind: SolverKind) -> Result<Box<dyn TourSolver>, CliError> {
    match kind {
        SolverKind::Gls => Ok(Box::new(GuidedLocalSearchSolver::new())),
        #[cfg(feature = "solver-vrp")]
        SolverKind::Vrp => Ok(Box::new(tourgate_solver_vrp::VrpTourSolver::new())),
        #[cfg(not(feature = "solver-vrp"))]
        SolverKind::Vrp => Err(CliError::MissingFeature {
            feature: "solver-vrp",
            action: "--solver vrp",
        }),
    }
}

/// Builds the optimiser for one `optimize` invocation.
pub(crate) trait OptimizerBuilder {
    fn build(&self, config: &PipelineConfig) -> Result<Arc<dyn RouteOptimizer>, CliError>;
}

pub(crate) struct DefaultOptimizerBuilder;

impl OptimizerBuilder for DefaultOptimizerBuilder {
    fn build(&self, config: &PipelineConfig) -> Result<Arc<dyn RouteOptimizer>, CliError> {
        build_optimizer(config)
    }
}

pub(crate) fn run_optimize(args: OptimizeArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    let mut stdout = std::io::stdout().lock();
    run_optimize_with(&config, &DefaultOptimizerBuilder, &mut stdout)
}

pub(crate) fn run_optimize_with(
    config: &OptimizeConfig,
    builder: &dyn OptimizerBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let payload = load_payload(&config.request_path)?;
    let optimizer = builder.build(&config.pipeline)?;
    let result = optimizer
        .optimize(&payload)
        .map_err(|source| CliError::Optimize { source })?;
    write_result(writer, &result)
}

/// Loads a JSON-encoded [`OptimizePayload`] from disk.
pub(crate) fn load_payload(path: &Utf8Path) -> Result<OptimizePayload, CliError> {
    let file = File::open(path.as_std_path()).map_err(|source| CliError::OpenRequest {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseRequest {
        path: path.to_path_buf(),
        source,
    })
}

fn write_result(writer: &mut dyn Write, result: &OptimizationResult) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(result).map_err(CliError::SerializeResult)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
