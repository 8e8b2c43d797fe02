//! Shared fixtures for CLI unit tests.

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;
use tourgate_core::test_support::{InputOrderSolver, StubGeometryProvider, UniformMatrixProvider};
use tourgate_core::{Optimizer, OptimizerConfig, RouteOptimizer};

use super::*;
use crate::optimize::OptimizerBuilder;

/// Builds an optimiser from stubs, honouring the configured limits.
pub(super) struct StubOptimizerBuilder;

impl OptimizerBuilder for StubOptimizerBuilder {
    fn build(&self, config: &PipelineConfig) -> Result<Arc<dyn RouteOptimizer>, CliError> {
        Ok(Arc::new(Optimizer::with_config(
            UniformMatrixProvider::new(100),
            StubGeometryProvider::per_leg(),
            InputOrderSolver,
            OptimizerConfig {
                limits: config.limits,
                solver_time_limit: config.solver_time_limit,
            },
        )))
    }
}

/// A temporary directory holding `request.json`.
pub(super) struct RequestFile {
    _dir: TempDir,
    path: Utf8PathBuf,
}

impl RequestFile {
    /// A request file path that has not been written yet.
    pub(super) fn missing() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        let path = root.join("request.json");
        Self { _dir: dir, path }
    }

    /// A request file containing `contents`.
    pub(super) fn with_contents(contents: &str) -> Self {
        let file = Self::missing();
        std::fs::write(file.path.as_std_path(), contents).expect("write request");
        file
    }

    pub(super) fn path(&self) -> &Utf8Path {
        &self.path
    }
}
