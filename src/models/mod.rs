//! Core data models for the journey planner.

mod mood;
mod suggestion;
mod task;
mod time;

pub use mood::*;
pub use suggestion::*;
pub use task::*;
pub use time::*;
