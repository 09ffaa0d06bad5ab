//! Escape-time rendering split across a fixed pool of workers.
//!
//! The pipeline is three layers deep:
//!
//! - [`escape`]: the per-point iteration count, the reference every other layer
//!   must reproduce exactly.
//! - [`viewport`]: maps a pixel grid onto the complex plane and renders a
//!   contiguous block of rows into a caller-owned buffer.
//! - [`partition`]: splits the rows of an image into one block per worker and
//!   renders the blocks concurrently.
//!
//! Workers never share mutable state. The output buffer is split into disjoint
//! row slabs before any worker starts, so no locking is involved.

pub mod escape;
pub mod partition;
pub mod viewport;

pub use escape::escape_time;
pub use partition::{render_parallel, row_range, RowPartitioner, WorkerDescriptor};
pub use viewport::{grid_view, render_rows, Viewport};
