//! Slice-level entry points for the lane kernels.
//!
//! Each trait offers three variants of the same computation:
//!
//! - `lane_*`: one [`LaneEngine`](crate::simd::LaneEngine) at
//!   [`DEFAULT_LANE_WIDTH`](crate::DEFAULT_LANE_WIDTH), scalar remainder.
//! - `par_lane_*`: splits long slices into rayon tasks of
//!   [`PARALLEL_CHUNK_SIZE`](crate::PARALLEL_CHUNK_SIZE) elements, each with its
//!   own engine. Slices under [`PARALLEL_THRESHOLD`](crate::PARALLEL_THRESHOLD)
//!   take the `lane_*` path.
//! - `scalar_*`: the plain reference loop.

pub trait LaneAbs {
    type Output;

    fn lane_abs(self) -> Self::Output;
    fn par_lane_abs(self) -> Self::Output;
    fn scalar_abs(self) -> Self::Output;
}

/// `values[i]^exponents[i]` clamped to [`EXP_CEILING`](crate::EXP_CEILING).
pub trait LaneClampedExp {
    type Output;

    fn lane_clamped_exp(self, exponents: &[i32]) -> Self::Output;
    fn par_lane_clamped_exp(self, exponents: &[i32]) -> Self::Output;
    fn scalar_clamped_exp(self, exponents: &[i32]) -> Self::Output;
}

/// Unlike [`sum_vector`](crate::simd::kernels::sum_vector), these accept any
/// length and add a trailing partial chunk with the scalar loop.
pub trait LaneSum {
    type Output;

    fn lane_sum(self) -> Self::Output;
    fn par_lane_sum(self) -> Self::Output;
    fn scalar_sum(self) -> Self::Output;
}
