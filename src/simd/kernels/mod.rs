//! Branchy per-element algorithms rewritten as masked lane code.
//!
//! Every kernel has a scalar twin with the same name and a `_serial` suffix. The
//! twin defines the expected result and handles the `N mod W` elements left after
//! the last full chunk.

pub mod abs;
pub mod exp;
pub mod sum;

pub use abs::{abs_serial, abs_vector};
pub use exp::{clamped_exp_serial, clamped_exp_vector};
pub use sum::{sum_serial, sum_vector};
