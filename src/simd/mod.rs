//! Software lane engine and the kernels built on it.
//!
//! The engine is a logical model of a `W`-wide vector unit: registers are plain
//! arrays and every operation is a short loop over the lanes its mask enables.
//! Lane width is a const generic, so the same kernel code runs at any width.

pub mod engine;
pub mod kernels;
pub mod lanes;
pub mod stats;
pub mod traits;

pub use engine::LaneEngine;
pub use lanes::{LaneElement, Lanes, Mask};
pub use stats::LaneStats;
pub use traits::{LaneAbs, LaneClampedExp, LaneSum};
