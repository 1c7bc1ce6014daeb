//! Event replay module.

mod fixture;
mod replayer;
mod stats;

pub use fixture::{load_fixture, parse_fixture, EventFixture};
pub use replayer::{ReplayConfig, Replayer};
pub use stats::ReplayStats;
