//! Run state tracking
//!
//! A harvest run moves through a fixed, linear sequence of phases. There is no
//! way back to an earlier phase; any phase may fail, and failure is terminal.

mod run_state;

pub use run_state::{RunState, RunTracker};
