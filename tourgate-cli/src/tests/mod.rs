//! Unit tests for the Tourgate CLI configuration and commands.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;

mod config_unit;
mod helpers;
mod optimize_unit;
