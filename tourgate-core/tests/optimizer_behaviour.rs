//! Behavioural tests for the `Optimizer` pipeline using stub providers.

use std::cell::RefCell;
use std::sync::Arc;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tourgate_core::test_support::{FixedOrderSolver, StubGeometryProvider, StubMatrixProvider};
use tourgate_core::{
    LatLng, OptimizationResult, OptimizeError, OptimizePayload, Optimizer, RoutingError,
};

#[derive(Debug, Default)]
struct OptimizerWorld {
    matrix: RefCell<Option<Arc<StubMatrixProvider>>>,
    geometry: RefCell<Option<Arc<StubGeometryProvider>>>,
    outcome: RefCell<Option<Result<OptimizationResult, OptimizeError>>>,
}

impl OptimizerWorld {
    fn run(&self, payload: &OptimizePayload) {
        let matrix = self
            .matrix
            .borrow()
            .clone()
            .expect("matrix provider should be configured");
        let geometry = self
            .geometry
            .borrow()
            .clone()
            .expect("geometry provider should be configured");
        // 1 then 0 is the cheaper of the two orders on the asymmetric matrix.
        let optimizer = Optimizer::new(matrix, geometry, FixedOrderSolver::new(vec![1, 0]));
        self.outcome.replace(Some(optimizer.optimize(payload)));
    }

    fn geometry_calls(&self) -> usize {
        self.geometry
            .borrow()
            .as_ref()
            .map_or(0, |provider| provider.calls())
    }

    fn error(&self) -> OptimizeError {
        self.outcome
            .borrow()
            .clone()
            .expect("optimisation should have run")
            .expect_err("optimisation should fail")
    }

    fn result(&self) -> OptimizationResult {
        self.outcome
            .borrow()
            .clone()
            .expect("optimisation should have run")
            .expect("optimisation should succeed")
    }
}

fn failure() -> RoutingError {
    RoutingError::HttpError {
        url: "http://routing.test".to_owned(),
        status: 503,
        message: "unavailable".to_owned(),
    }
}

fn two_locations(depot_lat: f64) -> OptimizePayload {
    OptimizePayload {
        depot: LatLng {
            lat: depot_lat,
            lng: 135.0,
        },
        locations: vec![
            LatLng {
                lat: 35.1,
                lng: 135.2,
            },
            LatLng {
                lat: -10.5,
                lng: 0.25,
            },
        ],
    }
}

#[fixture]
fn world() -> OptimizerWorld {
    OptimizerWorld::default()
}

#[given("a routing service with the asymmetric three-node matrix")]
fn asymmetric_matrix(#[from(world)] world: &OptimizerWorld) {
    world.matrix.replace(Some(Arc::new(StubMatrixProvider::with_matrix(vec![
        vec![0, 10, 20],
        vec![12, 0, 5],
        vec![25, 6, 0],
    ]))));
}

#[given("a routing service whose table request fails")]
fn failing_table(#[from(world)] world: &OptimizerWorld) {
    world
        .matrix
        .replace(Some(Arc::new(StubMatrixProvider::with_error(failure()))));
}

#[given("a geometry service answering one polyline per leg")]
fn per_leg_geometry(#[from(world)] world: &OptimizerWorld) {
    world
        .geometry
        .replace(Some(Arc::new(StubGeometryProvider::per_leg())));
}

#[given("a geometry service whose route request fails")]
fn failing_geometry(#[from(world)] world: &OptimizerWorld) {
    world
        .geometry
        .replace(Some(Arc::new(StubGeometryProvider::with_error(failure()))));
}

#[when("I optimise a depot with two locations")]
fn optimise_two(#[from(world)] world: &OptimizerWorld) {
    world.run(&two_locations(35.0));
}

#[when("I optimise a depot at latitude 91 with two locations")]
fn optimise_invalid_depot(#[from(world)] world: &OptimizerWorld) {
    world.run(&two_locations(91.0));
}

#[then("the route visits the second location first")]
fn second_location_first(#[from(world)] world: &OptimizerWorld) {
    assert_eq!(world.result().route, vec![1, 0]);
}

#[then("the total distance is 38")]
fn total_distance(#[from(world)] world: &OptimizerWorld) {
    assert_eq!(world.result().total_distance, 38);
}

#[then("three leg geometries are returned")]
fn three_geometries(#[from(world)] world: &OptimizerWorld) {
    assert_eq!(
        world.result().route_geometries,
        vec!["poly0", "poly1", "poly2"]
    );
}

#[then("a table failure is reported")]
fn table_failure(#[from(world)] world: &OptimizerWorld) {
    assert_eq!(world.error(), OptimizeError::Table(failure()));
}

#[then("a route failure is reported")]
fn route_failure(#[from(world)] world: &OptimizerWorld) {
    assert_eq!(world.error(), OptimizeError::Route(failure()));
}

#[then("a validation failure is reported")]
fn validation_failure(#[from(world)] world: &OptimizerWorld) {
    assert!(matches!(world.error(), OptimizeError::Validation(_)));
}

#[then("the geometry service is never called")]
fn geometry_not_called(#[from(world)] world: &OptimizerWorld) {
    assert_eq!(world.geometry_calls(), 0);
}

#[scenario(path = "tests/features/optimizer.feature", index = 0)]
fn optimises_small_tour(#[from(world)] world: OptimizerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/optimizer.feature", index = 1)]
fn table_failure_stops_pipeline(#[from(world)] world: OptimizerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/optimizer.feature", index = 2)]
fn route_failure_is_reported(#[from(world)] world: OptimizerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/optimizer.feature", index = 3)]
fn invalid_depot_is_rejected(#[from(world)] world: OptimizerWorld) {
    let _ = world;
}
