//! HTTP routing provider backed by OSRM's Table and Route services.
//!
//! [`HttpRoutingProvider`] implements [`DistanceMatrixProvider`] with the
//! Table service (`annotations=distance`) and [`RouteGeometryProvider`] with
//! the Route service (`overview=full&geometries=polyline6`).
//!
//! # Architecture
//!
//! The provider traits are synchronous. This provider bridges the async
//! HTTP calls to the sync interface by blocking on a Tokio runtime: the
//! caller's runtime when it is multi-threaded, otherwise a small runtime the
//! provider owns.
//!
//! Each call makes exactly one HTTP request; there are no retries.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use tourgate_core::{
    CoordinateList, DistanceMatrix, DistanceMatrixProvider, GeoPoint, LegGeometries,
    RouteGeometryProvider, RoutingError,
};
use url::Url;

use super::osrm::{RouteResponse, TableResponse, encode_coordinates, is_ok_code};

/// Default user agent for routing requests.
pub const DEFAULT_USER_AGENT: &str = "tourgate-routing/0.1";

/// Public OSRM demo server.
pub const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org";

/// Default OSRM routing profile.
pub const DEFAULT_PROFILE: &str = "driving";

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Longest upstream error body quoted in an error message.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Error type for [`HttpRoutingProvider`] construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// The base URL is not an absolute URL.
    #[error("invalid routing base URL {base_url:?}: {source}")]
    InvalidBaseUrl {
        /// Rejected base URL.
        base_url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Configuration for [`HttpRoutingProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRoutingProviderConfig {
    /// Base URL of the routing service (e.g. `"http://localhost:5000"`).
    pub base_url: String,
    /// Routing profile path segment, e.g. `driving`.
    pub profile: String,
    /// Time allowed to establish a connection.
    pub connect_timeout: Duration,
    /// Time allowed between reads of the response.
    pub read_timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpRoutingProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            profile: DEFAULT_PROFILE.to_owned(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpRoutingProviderConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the routing profile.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Set the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the read timeout.
    #[must_use]
    pub const fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Runtime owned by the provider for calls made outside a multi-threaded
/// Tokio runtime.
///
/// Dropping a runtime from async context panics, and the provider is often
/// dropped inside a server, so shutdown happens in the background.
struct OwnedRuntime(Option<Runtime>);

impl OwnedRuntime {
    fn block_on<F: Future>(&self, future: F) -> Option<F::Output> {
        self.0.as_ref().map(|runtime| runtime.block_on(future))
    }
}

impl Drop for OwnedRuntime {
    fn drop(&mut self) {
        if let Some(runtime) = self.0.take() {
            runtime.shutdown_background();
        }
    }
}

/// HTTP routing provider using the OSRM Table and Route APIs.
///
/// # Runtime behaviour
///
/// When called from within a multi-threaded Tokio runtime (detected via
/// [`Handle::try_current()`] and [`RuntimeFlavor::MultiThread`]), the
/// provider uses that runtime's handle with [`tokio::task::block_in_place`].
/// Outside any runtime it blocks on its own runtime. Inside a
/// `current_thread` runtime it blocks on its own runtime from a scoped
/// helper thread, since starting a runtime on a thread already driving one
/// panics.
pub struct HttpRoutingProvider {
    client: Client,
    config: HttpRoutingProviderConfig,
    base_url: String,
    runtime: OwnedRuntime,
}

impl std::fmt::Debug for HttpRoutingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRoutingProvider")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpRoutingProvider {
    /// Create a new provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client or
    /// Tokio runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpRoutingProviderConfig::new(base_url))
    }

    /// Create a new provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client or
    /// Tokio runtime fails to build.
    pub fn with_config(config: HttpRoutingProviderConfig) -> Result<Self, ProviderBuildError> {
        let base_url = config.base_url.trim_end_matches('/').to_owned();
        Url::parse(&base_url).map_err(|source| ProviderBuildError::InvalidBaseUrl {
            base_url: config.base_url.clone(),
            source,
        })?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            base_url,
            runtime: OwnedRuntime(Some(runtime)),
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpRoutingProviderConfig {
        &self.config
    }

    /// Build the Table API URL: `{base}/table/v1/{profile}/{coords}?annotations=distance`.
    fn build_table_url(&self, points: &[GeoPoint]) -> String {
        format!(
            "{}/table/v1/{}/{}?annotations=distance",
            self.base_url,
            self.config.profile,
            encode_coordinates(points)
        )
    }

    /// Build the Route API URL:
    /// `{base}/route/v1/{profile}/{coords}?overview=full&geometries=polyline6`.
    fn build_route_url(&self, points: &[GeoPoint]) -> String {
        format!(
            "{}/route/v1/{}/{}?overview=full&geometries=polyline6",
            self.base_url,
            self.config.profile,
            encode_coordinates(points)
        )
    }

    /// Issue a GET request and decode the JSON body.
    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, RoutingError> {
        log::debug!("GET {url}");
        let sent = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?;
        let response = Self::check_status(sent, url).await?;
        let body = response
            .bytes()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?;
        serde_json::from_slice(&body).map_err(|err| RoutingError::ParseError {
            message: err.to_string(),
        })
    }

    /// Turn non-success statuses into `HttpError`, quoting the body.
    async fn check_status(response: Response, url: &str) -> Result<Response, RoutingError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let detail: String = body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect();
        let message = if detail.is_empty() {
            status.to_string()
        } else {
            format!("{status}: {detail}")
        };
        Err(RoutingError::HttpError {
            url: url.to_owned(),
            status: status.as_u16(),
            message,
        })
    }

    /// Convert a reqwest error to a `RoutingError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> RoutingError {
        if error.is_timeout() {
            let timeout = if error.is_connect() {
                self.config.connect_timeout
            } else {
                self.config.read_timeout
            };
            return RoutingError::Timeout {
                url: url.to_owned(),
                timeout,
            };
        }

        if let Some(status) = error.status() {
            return RoutingError::HttpError {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        RoutingError::NetworkError {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }

    /// Convert an OSRM Table response into a matrix of `expected` nodes.
    fn convert_table(
        response: TableResponse,
        expected: usize,
    ) -> Result<DistanceMatrix, RoutingError> {
        if !is_ok_code(response.code.as_deref()) {
            return Err(RoutingError::ServiceError {
                code: response.code.unwrap_or_default(),
                message: response.message.unwrap_or_default(),
            });
        }

        let distances = response
            .distances
            .ok_or(RoutingError::MissingField { field: "distances" })?;
        if distances.len() != expected {
            return Err(RoutingError::InvalidMatrix {
                message: format!("expected {expected} rows, got {}", distances.len()),
            });
        }

        let rows = distances
            .into_iter()
            .enumerate()
            .map(|(from, row)| {
                row.into_iter()
                    .enumerate()
                    .map(|(to, cell)| metres(from, to, cell))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        DistanceMatrix::new(rows).map_err(|err| RoutingError::InvalidMatrix {
            message: err.to_string(),
        })
    }

    /// Extract one geometry per leg from an OSRM Route response.
    ///
    /// Legs lacking a geometry yield empty strings as long as at least one
    /// leg has one; otherwise the overview geometry stands in for the whole
    /// route.
    fn convert_route(response: RouteResponse) -> Result<LegGeometries, RoutingError> {
        if !is_ok_code(response.code.as_deref()) {
            return Err(RoutingError::ServiceError {
                code: response.code.unwrap_or_default(),
                message: response.message.unwrap_or_default(),
            });
        }

        let route = response
            .routes
            .and_then(|routes| routes.into_iter().next())
            .ok_or(RoutingError::MissingField { field: "routes" })?;

        let has_leg_geometry = route
            .legs
            .iter()
            .any(|leg| leg.geometry.as_deref().is_some_and(|g| !g.is_empty()));
        if has_leg_geometry {
            return Ok(route
                .legs
                .into_iter()
                .map(|leg| leg.geometry.unwrap_or_default())
                .collect());
        }

        route
            .geometry
            .filter(|overview| !overview.is_empty())
            .map(|overview| vec![overview])
            .ok_or(RoutingError::MissingField { field: "geometry" })
    }

    /// Drive `future` to completion from synchronous code.
    fn block_on<T, F>(&self, future: F) -> Result<T, RoutingError>
    where
        F: Future<Output = Result<T, RoutingError>> + Send,
        T: Send,
    {
        let outcome = match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                Some(tokio::task::block_in_place(|| handle.block_on(future)))
            }
            Ok(_) => std::thread::scope(|scope| {
                scope
                    .spawn(|| self.runtime.block_on(future))
                    .join()
                    .ok()
                    .flatten()
            }),
            Err(_) => self.runtime.block_on(future),
        };
        outcome.unwrap_or_else(|| {
            Err(RoutingError::NetworkError {
                url: self.base_url.clone(),
                message: "routing runtime unavailable".to_owned(),
            })
        })
    }
}

/// Round a distance cell to whole metres, rejecting unroutable pairs.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "cells are checked finite and non-negative; `as` saturates at u64::MAX"
)]
fn metres(from: usize, to: usize, cell: Option<f64>) -> Result<u64, RoutingError> {
    match cell {
        None => Err(RoutingError::InvalidMatrix {
            message: format!("no route from node {from} to node {to}"),
        }),
        Some(value) if !value.is_finite() || value < 0.0 => Err(RoutingError::InvalidMatrix {
            message: format!("invalid distance {value} from node {from} to node {to}"),
        }),
        Some(value) => Ok(value.round() as u64),
    }
}

impl DistanceMatrixProvider for HttpRoutingProvider {
    /// Fetch the distance matrix for `coordinates`.
    ///
    /// # Runtime requirements
    ///
    /// Inside a Tokio runtime, prefer `flavor = "multi_thread"`; see the
    /// type-level documentation.
    fn distance_matrix(
        &self,
        coordinates: &CoordinateList,
    ) -> Result<DistanceMatrix, RoutingError> {
        if coordinates.is_empty() {
            return Err(RoutingError::EmptyInput);
        }
        let url = self.build_table_url(coordinates.as_slice());
        let expected = coordinates.len();
        self.block_on(async {
            let response: TableResponse = self.fetch_json(&url).await?;
            Self::convert_table(response, expected)
        })
    }
}

impl RouteGeometryProvider for HttpRoutingProvider {
    fn leg_geometries(&self, waypoints: &[GeoPoint]) -> Result<LegGeometries, RoutingError> {
        if waypoints.len() < 2 {
            return Err(RoutingError::EmptyInput);
        }
        let url = self.build_route_url(waypoints);
        self.block_on(async {
            let response: RouteResponse = self.fetch_json(&url).await?;
            Self::convert_route(response)
        })
    }
}
