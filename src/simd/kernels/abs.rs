use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::{ParallelSlice, ParallelSliceMut},
};

use crate::{
    simd::{
        engine::LaneEngine,
        lanes::{Lanes, Mask},
        traits::LaneAbs,
    },
    DEFAULT_LANE_WIDTH, PARALLEL_CHUNK_SIZE, PARALLEL_THRESHOLD,
};

/// Reference absolute value: `x < 0 ? -x : x`.
///
/// `-0.0` is not below zero and is copied through unchanged, as is NaN.
pub fn abs_serial(values: &[f32], output: &mut [f32]) {
    debug_assert_eq!(values.len(), output.len(), "Slices must be the same length");

    for (out, &x) in output.iter_mut().zip(values) {
        *out = if x < 0.0 { -x } else { x };
    }
}

/// Absolute value on `W`-wide chunks, bit-identical to [`abs_serial`].
pub fn abs_vector<const W: usize>(engine: &mut LaneEngine<W>, values: &[f32], output: &mut [f32]) {
    debug_assert_eq!(values.len(), output.len(), "Slices must be the same length");

    let zero = engine.broadcast(0.0f32);

    let mut src_chunks = values.chunks_exact(W);
    let mut dst_chunks = output.chunks_exact_mut(W);

    for (src, dst) in (&mut src_chunks).zip(&mut dst_chunks) {
        abs_block(engine, src, dst, zero);
    }

    abs_serial(src_chunks.remainder(), dst_chunks.into_remainder());
}

#[inline(always)]
fn abs_block<const W: usize>(
    engine: &mut LaneEngine<W>,
    src: &[f32],
    dst: &mut [f32],
    zero: Lanes<f32, W>,
) {
    let all = Mask::ones();

    let x = engine.load(Lanes::default(), src, all);

    // if (x < 0) result = 0 - x
    let negative = engine.lt(Mask::zeros(), x, zero, all);
    let result = engine.sub(Lanes::default(), zero, x, negative);

    // else result = x
    let result = engine.load(result, src, !negative);

    engine.store(dst, result, all);
}

fn lane_abs(values: &[f32]) -> Vec<f32> {
    let mut output = vec![0.0; values.len()];
    let mut engine = LaneEngine::<DEFAULT_LANE_WIDTH>::new();

    abs_vector(&mut engine, values, &mut output);
    engine.stats().log_summary("abs");

    output
}

fn parallel_lane_abs(values: &[f32]) -> Vec<f32> {
    if values.len() < PARALLEL_THRESHOLD {
        return lane_abs(values);
    }

    let mut output = vec![0.0; values.len()];

    output
        .par_chunks_mut(PARALLEL_CHUNK_SIZE)
        .zip(values.par_chunks(PARALLEL_CHUNK_SIZE))
        .for_each(|(dst, src)| {
            let mut engine = LaneEngine::<DEFAULT_LANE_WIDTH>::new();
            abs_vector(&mut engine, src, dst);
        });

    output
}

impl LaneAbs for &[f32] {
    type Output = Vec<f32>;

    #[inline(always)]
    fn lane_abs(self) -> Self::Output {
        lane_abs(self)
    }

    #[inline(always)]
    fn par_lane_abs(self) -> Self::Output {
        parallel_lane_abs(self)
    }

    #[inline(always)]
    fn scalar_abs(self) -> Self::Output {
        let mut output = vec![0.0; self.len()];
        abs_serial(self, &mut output);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(values: &[f32]) -> Vec<u32> {
        values.iter().map(|x| x.to_bits()).collect()
    }

    #[test]
    fn test_abs_width_two_scenario() {
        let values = [-3.0f32, 0.0, 2.5, -0.0];
        let mut output = [f32::NAN; 4];

        abs_vector(&mut LaneEngine::<2>::new(), &values, &mut output);
        assert_eq!(output, [3.0, 0.0, 2.5, 0.0]);
    }

    #[test]
    fn test_abs_keeps_signed_zero_like_serial() {
        let values = [-0.0f32, 0.0, -0.0, -1.0, f32::NAN, f32::NEG_INFINITY, 1.0];

        let mut expected = [0.0f32; 7];
        abs_serial(&values, &mut expected);

        let mut output = [0.0f32; 7];
        abs_vector(&mut LaneEngine::<4>::new(), &values, &mut output);

        assert_eq!(bits(&output), bits(&expected));
        assert_eq!(output[0].to_bits(), (-0.0f32).to_bits());
    }

    #[test]
    fn test_abs_remainder_only() {
        let values = [-1.0f32, -2.0, 3.0];
        let mut output = [0.0f32; 3];

        let mut engine = LaneEngine::<8>::new();
        abs_vector(&mut engine, &values, &mut output);

        assert_eq!(output, [1.0, 2.0, 3.0]);
        // Only the zero broadcast ran; the three elements went to the scalar twin.
        assert_eq!(engine.stats().instructions(), 1);
    }

    #[test]
    fn test_abs_instruction_mix() {
        let values = [-1.0f32, 2.0, -3.0, 4.0];
        let mut output = [0.0f32; 4];

        let mut engine = LaneEngine::<4>::new();
        abs_vector(&mut engine, &values, &mut output);

        // broadcast, load, lt, sub, load, store
        let stats = engine.stats();
        assert_eq!(stats.instructions(), 6);
        assert_eq!(stats.total_lanes(), 24);
        assert_eq!(stats.active_lanes(), 4 + 4 + 4 + 2 + 2 + 4);
    }

    #[test]
    fn test_slice_trait_variants_agree() {
        let values: Vec<f32> = (0..1000).map(|i| (i as f32 - 500.0) * 0.25).collect();

        let scalar = values.as_slice().scalar_abs();
        assert_eq!(bits(&values.as_slice().lane_abs()), bits(&scalar));
        assert_eq!(bits(&values.as_slice().par_lane_abs()), bits(&scalar));
    }
}
