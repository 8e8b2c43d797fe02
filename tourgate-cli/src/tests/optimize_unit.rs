//! The one-shot `optimize` command and optimiser assembly.

use rstest::rstest;
use tourgate_core::{
    LatLng, OptimizationResult, OptimizeError, OptimizePayload, RequestLimits,
};
use tourgate_data::routing::HttpRoutingProviderConfig;

use super::helpers::{RequestFile, StubOptimizerBuilder};
use super::*;
use crate::config::OptimizeConfig;
use crate::optimize::{load_payload, run_optimize_with};

const REQUEST: &str = r#"{
    "depot": {"lat": 35.0, "lng": 135.0},
    "locations": [{"lat": 35.1, "lng": 135.2}]
}"#;

fn optimize_config(file: &RequestFile) -> OptimizeConfig {
    OptimizeConfig {
        request_path: file.path().to_path_buf(),
        pipeline: PipelineConfig::default(),
    }
}

#[rstest]
fn load_payload_decodes_json() {
    let file = RequestFile::with_contents(REQUEST);

    let payload = load_payload(file.path()).expect("request should decode");

    assert_eq!(
        payload,
        OptimizePayload {
            depot: LatLng {
                lat: 35.0,
                lng: 135.0,
            },
            locations: vec![LatLng {
                lat: 35.1,
                lng: 135.2,
            }],
        }
    );
}

#[rstest]
fn load_payload_rejects_invalid_json() {
    let file = RequestFile::with_contents("{ not valid json");

    match load_payload(file.path()).expect_err("invalid json should error") {
        CliError::ParseRequest { path, .. } => assert_eq!(path, file.path()),
        other => panic!("expected ParseRequest, found {other:?}"),
    }
}

#[rstest]
fn load_payload_reports_missing_file() {
    let file = RequestFile::missing();

    match load_payload(file.path()).expect_err("missing request should error") {
        CliError::OpenRequest { path, .. } => assert_eq!(path, file.path()),
        other => panic!("expected OpenRequest, found {other:?}"),
    }
}

#[rstest]
fn run_optimize_writes_pretty_json() {
    let file = RequestFile::with_contents(REQUEST);
    let mut output = Vec::new();

    run_optimize_with(&optimize_config(&file), &StubOptimizerBuilder, &mut output)
        .expect("optimisation should succeed");

    assert!(output.ends_with(b"}\n"), "output: {output:?}");
    let result: OptimizationResult = serde_json::from_slice(&output).expect("result JSON");
    assert_eq!(result.route, vec![0]);
    assert_eq!(result.total_distance, 200);
    assert_eq!(result.route_geometries, vec!["poly0", "poly1"]);
}

#[rstest]
fn run_optimize_surfaces_pipeline_errors() {
    let file = RequestFile::with_contents(r#"{"depot": {"lat": 0.0, "lng": 0.0}, "locations": []}"#);
    let mut output = Vec::new();

    let err = run_optimize_with(&optimize_config(&file), &StubOptimizerBuilder, &mut output)
        .expect_err("empty request should fail");

    match err {
        CliError::Optimize {
            source: OptimizeError::Validation(_),
        } => {}
        other => panic!("expected a validation failure, found {other:?}"),
    }
    assert!(output.is_empty());
}

#[rstest]
fn build_optimizer_rejects_invalid_base_url() {
    let config = PipelineConfig {
        routing: HttpRoutingProviderConfig::new("not a url"),
        ..PipelineConfig::default()
    };

    match build_optimizer(&config) {
        Err(CliError::BuildRoutingProvider { base_url, .. }) => assert_eq!(base_url, "not a url"),
        Err(other) => panic!("expected BuildRoutingProvider, found {other:?}"),
        Ok(_) => panic!("invalid base URL should be rejected"),
    }
}

#[rstest]
fn build_optimizer_applies_configured_limits() {
    let config = PipelineConfig {
        limits: RequestLimits::new(4),
        ..PipelineConfig::default()
    };

    let optimizer = build_optimizer(&config).expect("optimiser should build");

    assert_eq!(optimizer.limits().max_locations, 4);
}

#[cfg(not(feature = "solver-vrp"))]
#[rstest]
fn vrp_solver_requires_feature() {
    let config = PipelineConfig {
        solver: SolverKind::Vrp,
        ..PipelineConfig::default()
    };

    match build_optimizer(&config) {
        Err(CliError::MissingFeature { feature, .. }) => assert_eq!(feature, "solver-vrp"),
        Err(other) => panic!("expected MissingFeature, found {other:?}"),
        Ok(_) => panic!("vrp solver should need its feature"),
    }
}
