//! Layered configuration for the `serve` and `optimize` subcommands.
//!
//! Values merge from defaults, configuration files, `TOURGATE_CMDS_*`
//! environment variables and CLI flags (highest precedence) via
//! `ortho_config`, then resolve once into immutable config structs.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;
use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use tourgate_core::{DEFAULT_MAX_LOCATIONS, DEFAULT_SOLVER_TIME_LIMIT, RequestLimits};
use tourgate_data::routing::HttpRoutingProviderConfig;

use crate::CliError;
use crate::server::RateLimitRule;

pub(crate) const ARG_ROUTING_BASE_URL: &str = "routing-base-url";
pub(crate) const ARG_ROUTING_PROFILE: &str = "routing-profile";
pub(crate) const ARG_MAX_LOCATIONS: &str = "max-locations";
pub(crate) const ARG_CONNECT_TIMEOUT: &str = "connect-timeout-seconds";
pub(crate) const ARG_READ_TIMEOUT: &str = "read-timeout-seconds";
pub(crate) const ARG_SOLVER: &str = "solver";
pub(crate) const ARG_SOLVER_TIME_LIMIT: &str = "solver-time-limit-ms";
pub(crate) const ARG_RATE_LIMIT_RULE: &str = "rate-limit-rule";
pub(crate) const ARG_BIND_ADDRESS: &str = "bind-address";
pub(crate) const ARG_CORS_ALLOWED_ORIGINS: &str = "cors-allowed-origins";
pub(crate) const ARG_OPTIMIZE_REQUEST: &str = "request";
pub(crate) const ENV_OPTIMIZE_REQUEST: &str = "TOURGATE_CMDS_OPTIMIZE_REQUEST_PATH";

/// Default rate limit for `POST /api/optimize`.
pub const DEFAULT_RATE_LIMIT_RULE: &str = "60/minute";
/// Default listening address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:5000";
/// Default CORS origin list; `*` allows any origin.
pub const DEFAULT_CORS_ALLOWED_ORIGINS: &str = "*";

/// Tour solver backing the optimiser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolverKind {
    /// Guided local search (`tourgate-solver-gls`).
    #[default]
    Gls,
    /// `vrp-core` metaheuristic (`tourgate-solver-vrp`, feature `solver-vrp`).
    Vrp,
}

impl FromStr for SolverKind {
    type Err = CliError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gls" => Ok(Self::Gls),
            "vrp" => Ok(Self::Vrp),
            _ => Err(CliError::UnknownSolver {
                name: value.to_owned(),
            }),
        }
    }
}

/// Resolved settings shared by every command that runs the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Routing service connection settings.
    pub routing: HttpRoutingProviderConfig,
    /// Request bounds.
    pub limits: RequestLimits,
    /// Wall-clock budget per solve.
    pub solver_time_limit: Duration,
    /// Which solver to run.
    pub solver: SolverKind,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            routing: HttpRoutingProviderConfig::default(),
            limits: RequestLimits::default(),
            solver_time_limit: DEFAULT_SOLVER_TIME_LIMIT,
            solver: SolverKind::default(),
        }
    }
}

/// Pipeline fields as merged from the configuration layers.
struct PipelineFields {
    routing_base_url: Option<String>,
    routing_profile: Option<String>,
    max_locations: Option<usize>,
    connect_timeout_seconds: Option<f64>,
    read_timeout_seconds: Option<f64>,
    solver: Option<String>,
    solver_time_limit_ms: Option<u64>,
}

impl TryFrom<PipelineFields> for PipelineConfig {
    type Error = CliError;

    fn try_from(fields: PipelineFields) -> Result<Self, Self::Error> {
        let defaults = HttpRoutingProviderConfig::default();
        let connect_timeout = timeout(
            fields.connect_timeout_seconds,
            defaults.connect_timeout,
            ARG_CONNECT_TIMEOUT,
        )?;
        let read_timeout = timeout(
            fields.read_timeout_seconds,
            defaults.read_timeout,
            ARG_READ_TIMEOUT,
        )?;
        let mut routing = HttpRoutingProviderConfig::new(
            fields.routing_base_url.unwrap_or(defaults.base_url),
        )
        .with_connect_timeout(connect_timeout)
        .with_read_timeout(read_timeout);
        if let Some(profile) = fields.routing_profile {
            routing = routing.with_profile(profile);
        }

        let max_locations = fields.max_locations.unwrap_or(DEFAULT_MAX_LOCATIONS);
        if max_locations == 0 {
            return Err(CliError::InvalidMaxLocations);
        }

        let solver = fields
            .solver
            .as_deref()
            .map(SolverKind::from_str)
            .transpose()?
            .unwrap_or_default();

        let solver_time_limit = fields
            .solver_time_limit_ms
            .map_or(DEFAULT_SOLVER_TIME_LIMIT, Duration::from_millis);

        Ok(Self {
            routing,
            limits: RequestLimits::new(max_locations),
            solver_time_limit,
            solver,
        })
    }
}

fn timeout(
    seconds: Option<f64>,
    default: Duration,
    field: &'static str,
) -> Result<Duration, CliError> {
    let Some(value) = seconds else {
        return Ok(default);
    };
    let invalid = || CliError::InvalidTimeout { field, value };
    if value > 0.0 {
        Duration::try_from_secs_f64(value).map_err(|_| invalid())
    } else {
        Err(invalid())
    }
}

/// Allowed CORS origins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    /// Any origin (`*`).
    Any,
    /// An explicit origin list.
    List(Vec<HeaderValue>),
}

impl FromStr for CorsOrigins {
    type Err = CliError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let origins: Vec<&str> = value
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .collect();
        if origins.is_empty() || origins.contains(&"*") {
            return Ok(Self::Any);
        }
        origins
            .into_iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|_| CliError::InvalidCorsOrigin {
                    origin: origin.to_owned(),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self::List)
    }
}

/// CLI arguments for the `serve` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Serve the route optimisation API. Settings can come from \
                 CLI flags, configuration files, or TOURGATE_CMDS_SERVE_* \
                 environment variables.",
    about = "Run the HTTP gateway"
)]
#[ortho_config(prefix = "TOURGATE")]
pub struct ServeArgs {
    /// Base URL of the OSRM-compatible routing service.
    #[arg(long = ARG_ROUTING_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub routing_base_url: Option<String>,
    /// Routing profile, e.g. `driving`.
    #[arg(long = ARG_ROUTING_PROFILE, value_name = "profile")]
    #[serde(default)]
    pub routing_profile: Option<String>,
    /// Largest number of locations accepted per request.
    #[arg(long = ARG_MAX_LOCATIONS, value_name = "count")]
    #[serde(default)]
    pub max_locations: Option<usize>,
    /// Seconds allowed to connect to the routing service.
    #[arg(long = ARG_CONNECT_TIMEOUT, value_name = "seconds")]
    #[serde(default)]
    pub connect_timeout_seconds: Option<f64>,
    /// Seconds allowed between reads from the routing service.
    #[arg(long = ARG_READ_TIMEOUT, value_name = "seconds")]
    #[serde(default)]
    pub read_timeout_seconds: Option<f64>,
    /// Tour solver: `gls` (default) or `vrp`.
    #[arg(long = ARG_SOLVER, value_name = "name")]
    #[serde(default)]
    pub solver: Option<String>,
    /// Solver budget per request, in milliseconds.
    #[arg(long = ARG_SOLVER_TIME_LIMIT, value_name = "ms")]
    #[serde(default)]
    pub solver_time_limit_ms: Option<u64>,
    /// Per-client limit on optimisation requests, e.g. `60/minute`.
    #[arg(long = ARG_RATE_LIMIT_RULE, value_name = "rule")]
    #[serde(default)]
    pub rate_limit_rule: Option<String>,
    /// Socket address to listen on.
    #[arg(long = ARG_BIND_ADDRESS, value_name = "addr")]
    #[serde(default)]
    pub bind_address: Option<String>,
    /// Comma-separated allowed origins, or `*`.
    #[arg(long = ARG_CORS_ALLOWED_ORIGINS, value_name = "origins")]
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,
}

impl ServeArgs {
    pub(crate) fn into_config(self) -> Result<ServeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ServeConfig::try_from(merged)
    }
}

/// Resolved `serve` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeConfig {
    /// Pipeline settings.
    pub pipeline: PipelineConfig,
    /// Rate limit for `POST /api/optimize`.
    pub rate_limit: RateLimitRule,
    /// Listening address.
    pub bind_address: SocketAddr,
    /// Allowed CORS origins.
    pub cors: CorsOrigins,
}

impl TryFrom<ServeArgs> for ServeConfig {
    type Error = CliError;

    fn try_from(args: ServeArgs) -> Result<Self, Self::Error> {
        let pipeline = PipelineConfig::try_from(PipelineFields {
            routing_base_url: args.routing_base_url,
            routing_profile: args.routing_profile,
            max_locations: args.max_locations,
            connect_timeout_seconds: args.connect_timeout_seconds,
            read_timeout_seconds: args.read_timeout_seconds,
            solver: args.solver,
            solver_time_limit_ms: args.solver_time_limit_ms,
        })?;

        let rule = args
            .rate_limit_rule
            .unwrap_or_else(|| DEFAULT_RATE_LIMIT_RULE.to_owned());
        let rate_limit = rule
            .parse::<RateLimitRule>()
            .map_err(|source| CliError::InvalidRateLimit {
                rule: rule.clone(),
                source,
            })?;

        let address = args
            .bind_address
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_owned());
        let bind_address =
            address
                .parse::<SocketAddr>()
                .map_err(|source| CliError::InvalidBindAddress {
                    value: address.clone(),
                    source,
                })?;

        let cors = args
            .cors_allowed_origins
            .as_deref()
            .unwrap_or(DEFAULT_CORS_ALLOWED_ORIGINS)
            .parse::<CorsOrigins>()?;

        Ok(Self {
            pipeline,
            rate_limit,
            bind_address,
            cors,
        })
    }
}

/// CLI arguments for the `optimize` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Optimise one request read from a JSON file containing \
                 {\"depot\": ..., \"locations\": [...]} and print the result \
                 as JSON.",
    about = "Optimise a single request from a file"
)]
#[ortho_config(prefix = "TOURGATE")]
pub struct OptimizeArgs {
    /// Path to a JSON file containing the request payload.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub request_path: Option<Utf8PathBuf>,
    /// Base URL of the OSRM-compatible routing service.
    #[arg(long = ARG_ROUTING_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub routing_base_url: Option<String>,
    /// Routing profile, e.g. `driving`.
    #[arg(long = ARG_ROUTING_PROFILE, value_name = "profile")]
    #[serde(default)]
    pub routing_profile: Option<String>,
    /// Largest number of locations accepted.
    #[arg(long = ARG_MAX_LOCATIONS, value_name = "count")]
    #[serde(default)]
    pub max_locations: Option<usize>,
    /// Seconds allowed to connect to the routing service.
    #[arg(long = ARG_CONNECT_TIMEOUT, value_name = "seconds")]
    #[serde(default)]
    pub connect_timeout_seconds: Option<f64>,
    /// Seconds allowed between reads from the routing service.
    #[arg(long = ARG_READ_TIMEOUT, value_name = "seconds")]
    #[serde(default)]
    pub read_timeout_seconds: Option<f64>,
    /// Tour solver: `gls` (default) or `vrp`.
    #[arg(long = ARG_SOLVER, value_name = "name")]
    #[serde(default)]
    pub solver: Option<String>,
    /// Solver budget, in milliseconds.
    #[arg(long = ARG_SOLVER_TIME_LIMIT, value_name = "ms")]
    #[serde(default)]
    pub solver_time_limit_ms: Option<u64>,
}

impl OptimizeArgs {
    pub(crate) fn into_config(self) -> Result<OptimizeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        OptimizeConfig::try_from(merged)
    }
}

/// Resolved `optimize` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizeConfig {
    /// Path to the JSON request file.
    pub request_path: Utf8PathBuf,
    /// Pipeline settings.
    pub pipeline: PipelineConfig,
}

impl TryFrom<OptimizeArgs> for OptimizeConfig {
    type Error = CliError;

    fn try_from(args: OptimizeArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_OPTIMIZE_REQUEST,
            env: ENV_OPTIMIZE_REQUEST,
        })?;
        let pipeline = PipelineConfig::try_from(PipelineFields {
            routing_base_url: args.routing_base_url,
            routing_profile: args.routing_profile,
            max_locations: args.max_locations,
            connect_timeout_seconds: args.connect_timeout_seconds,
            read_timeout_seconds: args.read_timeout_seconds,
            solver: args.solver,
            solver_time_limit_ms: args.solver_time_limit_ms,
        })?;
        Ok(Self {
            request_path,
            pipeline,
        })
    }
}

#[cfg(test)]
pub(crate) fn serve_config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ServeConfig, CliError> {
    let merged = ServeArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ServeConfig::try_from(merged)
}
