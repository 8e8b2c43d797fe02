//! Error types emitted by the Tourgate CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use tourgate_core::OptimizeError;
use tourgate_data::routing::ProviderBuildError;

use crate::server::RateLimitRuleError;

/// Errors emitted by the Tourgate CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name of the missing option.
        field: &'static str,
        /// Environment variable that could supply it.
        env: &'static str,
    },
    /// The requested operation requires a missing compile-time feature.
    #[error("{action} requires the `{feature}` feature to be enabled")]
    MissingFeature {
        /// Cargo feature to enable.
        feature: &'static str,
        /// What the user asked for.
        action: &'static str,
    },
    /// A timeout is not a positive, finite number of seconds.
    #[error("{field} must be a positive number of seconds (got {value})")]
    InvalidTimeout {
        /// Flag name of the timeout.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// `max-locations` was zero.
    #[error("max-locations must be at least 1")]
    InvalidMaxLocations,
    /// The solver name is not recognised.
    #[error("unknown solver {name:?} (expected \"gls\" or \"vrp\")")]
    UnknownSolver {
        /// Rejected solver name.
        name: String,
    },
    /// The rate limit rule could not be parsed.
    #[error("invalid rate-limit-rule {rule:?}: {source}")]
    InvalidRateLimit {
        /// Rejected rule text.
        rule: String,
        /// Parser error.
        #[source]
        source: RateLimitRuleError,
    },
    /// The bind address is not a socket address.
    #[error("invalid bind-address {value:?}: {source}")]
    InvalidBindAddress {
        /// Rejected address text.
        value: String,
        /// Parser error.
        #[source]
        source: std::net::AddrParseError,
    },
    /// A CORS origin is not a valid header value.
    #[error("invalid CORS origin {origin:?}")]
    InvalidCorsOrigin {
        /// Rejected origin.
        origin: String,
    },
    /// Constructing the routing provider failed.
    #[error("failed to build routing provider for {base_url:?}: {source}")]
    BuildRoutingProvider {
        /// Configured routing base URL.
        base_url: String,
        /// Construction error.
        #[source]
        source: ProviderBuildError,
    },
    /// Opening the request file failed.
    #[error("failed to open request at {path:?}: {source}")]
    OpenRequest {
        /// Request file path.
        path: Utf8PathBuf,
        /// IO error.
        #[source]
        source: std::io::Error,
    },
    /// Request JSON could not be decoded.
    #[error("failed to parse request JSON at {path:?}: {source}")]
    ParseRequest {
        /// Request file path.
        path: Utf8PathBuf,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// The optimisation pipeline failed.
    #[error("optimisation failed: {source}")]
    Optimize {
        /// Pipeline error.
        #[source]
        source: OptimizeError,
    },
    /// Serializing the optimisation result failed.
    #[error("failed to serialize optimisation result: {0}")]
    SerializeResult(#[source] serde_json::Error),
    /// Writing the command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
    /// Building the async runtime failed.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Binding the listening socket failed.
    #[error("failed to bind {address}: {source}")]
    Bind {
        /// Requested address.
        address: std::net::SocketAddr,
        /// IO error.
        #[source]
        source: std::io::Error,
    },
    /// The HTTP server stopped with an error.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
