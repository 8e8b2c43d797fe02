//! Configuration resolution for the `serve` and `optimize` commands.

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::HeaderValue;
use camino::Utf8PathBuf;
use ortho_config::MergeComposer;
use rstest::rstest;
use serde_json::json;
use tourgate_core::{DEFAULT_SOLVER_TIME_LIMIT, RequestLimits};

use super::*;
use crate::config::{
    ARG_CONNECT_TIMEOUT, ARG_OPTIMIZE_REQUEST, ARG_READ_TIMEOUT, ENV_OPTIMIZE_REQUEST,
    OptimizeArgs, OptimizeConfig, ServeArgs, serve_config_from_layers_for_test,
};
use crate::server::RateLimitRule;

fn serve_config(args: ServeArgs) -> Result<ServeConfig, CliError> {
    ServeConfig::try_from(args)
}

#[rstest]
fn serve_defaults() {
    let config = serve_config(ServeArgs::default()).expect("defaults should resolve");

    assert_eq!(
        config.pipeline.routing.base_url,
        "https://router.project-osrm.org"
    );
    assert_eq!(config.pipeline.routing.profile, "driving");
    assert_eq!(config.pipeline.routing.connect_timeout, Duration::from_secs(3));
    assert_eq!(config.pipeline.routing.read_timeout, Duration::from_secs(5));
    assert_eq!(config.pipeline.limits, RequestLimits::new(10));
    assert_eq!(config.pipeline.solver_time_limit, DEFAULT_SOLVER_TIME_LIMIT);
    assert_eq!(config.pipeline.solver, SolverKind::Gls);
    assert_eq!(
        config.rate_limit,
        RateLimitRule {
            limit: 60,
            window: Duration::from_secs(60),
        }
    );
    assert_eq!(
        config.bind_address,
        "0.0.0.0:5000".parse::<SocketAddr>().expect("socket address")
    );
    assert_eq!(config.cors, CorsOrigins::Any);
}

#[rstest]
fn serve_overrides() {
    let args = ServeArgs {
        routing_base_url: Some("http://osrm.internal:5000".to_owned()),
        routing_profile: Some("foot".to_owned()),
        max_locations: Some(25),
        connect_timeout_seconds: Some(0.5),
        read_timeout_seconds: Some(12.0),
        solver: Some("GLS".to_owned()),
        solver_time_limit_ms: Some(750),
        rate_limit_rule: Some("2/second".to_owned()),
        bind_address: Some("127.0.0.1:8080".to_owned()),
        cors_allowed_origins: Some("https://a.example, https://b.example".to_owned()),
    };

    let config = serve_config(args).expect("overrides should resolve");

    assert_eq!(config.pipeline.routing.base_url, "http://osrm.internal:5000");
    assert_eq!(config.pipeline.routing.profile, "foot");
    assert_eq!(
        config.pipeline.routing.connect_timeout,
        Duration::from_millis(500)
    );
    assert_eq!(config.pipeline.routing.read_timeout, Duration::from_secs(12));
    assert_eq!(config.pipeline.limits.max_locations, 25);
    assert_eq!(config.pipeline.solver_time_limit, Duration::from_millis(750));
    assert_eq!(config.rate_limit.limit, 2);
    assert_eq!(config.rate_limit.window, Duration::from_secs(1));
    assert_eq!(config.bind_address.port(), 8080);
    assert_eq!(
        config.cors,
        CorsOrigins::List(vec![
            HeaderValue::from_static("https://a.example"),
            HeaderValue::from_static("https://b.example"),
        ])
    );
}

#[rstest]
#[case::zero_connect(Some(0.0), None, ARG_CONNECT_TIMEOUT)]
#[case::negative_connect(Some(-1.0), None, ARG_CONNECT_TIMEOUT)]
#[case::nan_read(None, Some(f64::NAN), ARG_READ_TIMEOUT)]
#[case::infinite_read(None, Some(f64::INFINITY), ARG_READ_TIMEOUT)]
fn rejects_invalid_timeouts(
    #[case] connect: Option<f64>,
    #[case] read: Option<f64>,
    #[case] expected: &'static str,
) {
    let args = ServeArgs {
        connect_timeout_seconds: connect,
        read_timeout_seconds: read,
        ..ServeArgs::default()
    };

    match serve_config(args).expect_err("timeout should be rejected") {
        CliError::InvalidTimeout { field, .. } => assert_eq!(field, expected),
        other => panic!("expected InvalidTimeout, found {other:?}"),
    }
}

#[rstest]
fn rejects_zero_max_locations() {
    let args = ServeArgs {
        max_locations: Some(0),
        ..ServeArgs::default()
    };

    let err = serve_config(args).expect_err("zero max should be rejected");
    assert!(matches!(err, CliError::InvalidMaxLocations), "found {err:?}");
}

#[rstest]
fn rejects_unknown_solver() {
    let args = ServeArgs {
        solver: Some("annealing".to_owned()),
        ..ServeArgs::default()
    };

    match serve_config(args).expect_err("solver should be rejected") {
        CliError::UnknownSolver { name } => assert_eq!(name, "annealing"),
        other => panic!("expected UnknownSolver, found {other:?}"),
    }
}

#[rstest]
fn rejects_malformed_rate_limit_rule() {
    let args = ServeArgs {
        rate_limit_rule: Some("lots".to_owned()),
        ..ServeArgs::default()
    };

    match serve_config(args).expect_err("rule should be rejected") {
        CliError::InvalidRateLimit { rule, .. } => assert_eq!(rule, "lots"),
        other => panic!("expected InvalidRateLimit, found {other:?}"),
    }
}

#[rstest]
fn rejects_malformed_bind_address() {
    let args = ServeArgs {
        bind_address: Some("localhost".to_owned()),
        ..ServeArgs::default()
    };

    match serve_config(args).expect_err("address should be rejected") {
        CliError::InvalidBindAddress { value, .. } => assert_eq!(value, "localhost"),
        other => panic!("expected InvalidBindAddress, found {other:?}"),
    }
}

#[rstest]
#[case::star("*", CorsOrigins::Any)]
#[case::star_in_list("https://a.example,*", CorsOrigins::Any)]
#[case::blank("  ", CorsOrigins::Any)]
#[case::single(
    "https://a.example",
    CorsOrigins::List(vec![HeaderValue::from_static("https://a.example")])
)]
fn parses_cors_origins(#[case] text: &str, #[case] expected: CorsOrigins) {
    assert_eq!(text.parse::<CorsOrigins>().expect("valid origins"), expected);
}

#[rstest]
fn rejects_unprintable_cors_origin() {
    match "https://a.example\u{7f}".parse::<CorsOrigins>() {
        Err(CliError::InvalidCorsOrigin { origin }) => {
            assert_eq!(origin, "https://a.example\u{7f}");
        }
        other => panic!("expected InvalidCorsOrigin, found {other:?}"),
    }
}

#[rstest]
#[case::gls("gls", SolverKind::Gls)]
#[case::vrp("vrp", SolverKind::Vrp)]
#[case::mixed_case(" Vrp ", SolverKind::Vrp)]
fn parses_solver_names(#[case] name: &str, #[case] expected: SolverKind) {
    assert_eq!(name.parse::<SolverKind>().expect("known solver"), expected);
}

#[rstest]
fn optimize_without_request_errors() {
    match OptimizeConfig::try_from(OptimizeArgs::default()).expect_err("request is required") {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_OPTIMIZE_REQUEST);
            assert_eq!(env, ENV_OPTIMIZE_REQUEST);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn optimize_shares_pipeline_settings() {
    let args = OptimizeArgs {
        request_path: Some(Utf8PathBuf::from("request.json")),
        max_locations: Some(3),
        solver_time_limit_ms: Some(100),
        ..OptimizeArgs::default()
    };

    let config = OptimizeConfig::try_from(args).expect("config should resolve");

    assert_eq!(config.request_path, Utf8PathBuf::from("request.json"));
    assert_eq!(config.pipeline.limits.max_locations, 3);
    assert_eq!(config.pipeline.solver_time_limit, Duration::from_millis(100));
    assert_eq!(config.pipeline.routing, PipelineConfig::default().routing);
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "max_locations": "many" }));

    match serve_config_from_layers_for_test(composer.layers())
        .expect_err("invalid layer should map to CliError::Configuration")
    {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "routing_base_url": "http://from-file:5000",
            "max_locations": 4,
            "rate_limit_rule": "10/minute",
        }),
        None,
    );
    composer.push_environment(json!({
        "max_locations": 6,
        "rate_limit_rule": "2/second",
    }));
    composer.push_cli(json!({ "max_locations": 8 }));

    let config = serve_config_from_layers_for_test(composer.layers())
        .expect("merged config should build");

    assert_eq!(config.pipeline.routing.base_url, "http://from-file:5000");
    assert_eq!(config.pipeline.limits.max_locations, 8);
    assert_eq!(config.rate_limit.limit, 2);
    assert_eq!(config.cors, CorsOrigins::Any);
}
