//! Two case studies of statically partitioned, uniform work:
//!
//! - [`fractal`]: escape-time rendering where an image's rows are split into
//!   contiguous blocks and handed to a fixed number of workers.
//! - [`simd`]: a software lane engine with predicate masks, and kernels that turn
//!   per-element branches and loops into masked lock-step code.
//!
//! # Example
//!
//! ```rust
//! use masklane::fractal::{render_parallel, Viewport};
//! use masklane::simd::{LaneAbs, LaneClampedExp};
//!
//! let view = Viewport::new(-2.0, -1.0, 1.0, 1.0).unwrap();
//! let mut image = vec![0u32; 64 * 48];
//! render_parallel(4, &view, 64, 48, 256, &mut image).unwrap();
//!
//! let values = [-3.0f32, 0.0, 2.5, -1.5];
//! assert_eq!(values.as_slice().lane_abs(), vec![3.0, 0.0, 2.5, 1.5]);
//!
//! let clamped = [2.0f32].as_slice().lane_clamped_exp(&[10]);
//! assert_eq!(clamped, vec![4.18]);
//! ```

pub mod error;
pub mod fractal;
pub mod simd;

/// Upper bound on the number of workers a render may request.
pub const MAX_WORKERS: usize = 32;

/// Squared magnitude past which an orbit counts as escaped.
pub const ESCAPE_THRESHOLD: f32 = 4.0;

/// Ceiling applied to every clamped exponentiation result.
pub const EXP_CEILING: f32 = 4.18;

/// Lane width used by the slice-level kernel traits.
pub const DEFAULT_LANE_WIDTH: usize = 8;

/// Minimum slice length before the `par_lane_*` variants go parallel.
pub const PARALLEL_THRESHOLD: usize = 131_072;

/// Elements per rayon task in the `par_lane_*` variants. Must stay a multiple of
/// [`DEFAULT_LANE_WIDTH`].
pub const PARALLEL_CHUNK_SIZE: usize = 16_384;

pub use error::{MasklaneError, Result};
pub use fractal::{escape_time, render_parallel, render_rows, RowPartitioner, Viewport};
pub use simd::{LaneAbs, LaneClampedExp, LaneEngine, LaneSum, Lanes, Mask};
