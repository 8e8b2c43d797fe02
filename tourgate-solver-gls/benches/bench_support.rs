//! Benchmark support utilities for the guided local search solver.
//!
//! Generates deterministic, road-like asymmetric distance matrices: stops are
//! scattered around a few neighbourhood centres and each directed arc costs
//! its straight-line length with up to twenty percent detour noise.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tourgate_core::DistanceMatrix;

/// Seed for deterministic random number generation in benchmarks.
pub const BENCHMARK_SEED: u64 = 42;

/// Number of neighbourhood centres stops cluster around.
const CLUSTER_COUNT: usize = 4;

/// Side of the square service area, in metres.
const AREA_SIZE_M: f64 = 20_000.0;

/// Spread of stops around their centre, in metres.
const CLUSTER_SPREAD_M: f64 = 1_500.0;

/// Generate a `size` x `size` matrix whose node 0 is the depot.
#[must_use]
pub fn generate_distance_matrix(size: usize, seed: u64) -> DistanceMatrix {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let centres: Vec<(f64, f64)> = (0..CLUSTER_COUNT)
        .map(|_| (rng.gen_range(0.0..AREA_SIZE_M), rng.gen_range(0.0..AREA_SIZE_M)))
        .collect();

    let points: Vec<(f64, f64)> = (0..size)
        .map(|i| {
            #[expect(
                clippy::integer_division_remainder_used,
                reason = "Modulo for cyclic cluster assignment is intentional"
            )]
            let cluster = i % CLUSTER_COUNT;
            let (cx, cy) = centres.get(cluster).copied().unwrap_or_default();
            let dx: f64 = rng.gen_range(-CLUSTER_SPREAD_M..CLUSTER_SPREAD_M);
            let dy: f64 = rng.gen_range(-CLUSTER_SPREAD_M..CLUSTER_SPREAD_M);
            #[expect(clippy::float_arithmetic, reason = "Required for coordinate offset")]
            let point = (cx + dx, cy + dy);
            point
        })
        .collect();

    let rows = points
        .iter()
        .map(|&from| {
            points
                .iter()
                .map(|&to| road_distance(&mut rng, from, to))
                .collect()
        })
        .collect();

    DistanceMatrix::new(rows).unwrap_or_default()
}

/// Straight-line distance with detour noise, rounded to whole metres.
fn road_distance(rng: &mut impl Rng, from: (f64, f64), to: (f64, f64)) -> u64 {
    let detour: f64 = rng.gen_range(1.0..1.2);

    #[expect(clippy::float_arithmetic, reason = "Required for distance calculation")]
    let metres = (to.0 - from.0).hypot(to.1 - from.1) * detour;

    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "Distances are bounded by the service area and non-negative"
    )]
    let rounded = metres.round() as u64;
    rounded
}
