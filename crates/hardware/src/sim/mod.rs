//! Trace-driven simulation.
//!
//! Replays an address trace through a [`TagStore`](crate::cache::TagStore), standing in
//! for the memory system that would normally drive it: every miss goes through victim
//! selection and exactly one installation, and a fill with no allocatable way is
//! counted as deferred instead of retried.

pub mod driver;
pub mod trace;

pub use driver::{StepOutcome, TraceDriver};
pub use trace::{TraceOp, load_trace, parse_line, parse_trace};
