use rayon::{iter::ParallelIterator, slice::ParallelSlice};

use crate::{
    simd::{
        engine::LaneEngine,
        lanes::{Lanes, Mask},
        traits::LaneSum,
    },
    DEFAULT_LANE_WIDTH, PARALLEL_CHUNK_SIZE, PARALLEL_THRESHOLD,
};

/// Reference left-to-right sum.
pub fn sum_serial(values: &[f32]) -> f32 {
    let mut sum = 0.0;
    for &value in values {
        sum += value;
    }
    sum
}

/// Sums `values` with one `W`-lane accumulator, then folds the lanes together.
///
/// Lane `k` of the accumulator collects elements `k, k + W, k + 2W, ...` in order.
/// The lanes are then combined pairwise over `log2(W)` rounds of
/// [`hadd`](LaneEngine::hadd) and [`interleave`](LaneEngine::interleave). The
/// association order differs from [`sum_serial`], so results agree only up to
/// rounding.
///
/// `values.len()` must be a multiple of `W` and `W` a power of two. Neither is
/// checked in release builds; elements past the last full chunk are ignored.
pub fn sum_vector<const W: usize>(engine: &mut LaneEngine<W>, values: &[f32]) -> f32 {
    debug_assert!(W.is_power_of_two(), "lane width {W} is not a power of two");
    debug_assert_eq!(
        values.len() % W,
        0,
        "length {} is not a multiple of {W}",
        values.len()
    );

    let all = Mask::ones();
    let mut acc = engine.broadcast(0.0f32);

    for chunk in values.chunks_exact(W) {
        let x = engine.load(Lanes::default(), chunk, all);
        acc = engine.add(acc, acc, x, all);
    }

    reduce_lanes(engine, acc)
}

#[inline(always)]
fn reduce_lanes<const W: usize>(engine: &mut LaneEngine<W>, mut acc: Lanes<f32, W>) -> f32 {
    let mut width = W;

    while width > 1 {
        acc = engine.hadd(acc);
        acc = engine.interleave(acc);
        width /= 2;
    }

    acc.lane(0)
}

/// Sum of any length: full chunks through the engine, the tail through the
/// scalar loop.
#[inline(always)]
fn sum_any_length<const W: usize>(engine: &mut LaneEngine<W>, values: &[f32]) -> f32 {
    let aligned = values.len() - values.len() % W;
    let (head, tail) = values.split_at(aligned);

    sum_vector(engine, head) + sum_serial(tail)
}

fn lane_sum(values: &[f32]) -> f32 {
    let mut engine = LaneEngine::<DEFAULT_LANE_WIDTH>::new();

    let sum = sum_any_length(&mut engine, values);
    engine.stats().log_summary("sum");

    sum
}

fn parallel_lane_sum(values: &[f32]) -> f32 {
    if values.len() < PARALLEL_THRESHOLD {
        return lane_sum(values);
    }

    values
        .par_chunks(PARALLEL_CHUNK_SIZE)
        .map(|chunk| sum_any_length(&mut LaneEngine::<DEFAULT_LANE_WIDTH>::new(), chunk))
        .sum()
}

impl LaneSum for &[f32] {
    type Output = f32;

    #[inline(always)]
    fn lane_sum(self) -> Self::Output {
        lane_sum(self)
    }

    #[inline(always)]
    fn par_lane_sum(self) -> Self::Output {
        parallel_lane_sum(self)
    }

    #[inline(always)]
    fn scalar_sum(self) -> Self::Output {
        sum_serial(self)
    }
}
