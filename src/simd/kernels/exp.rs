use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::{ParallelSlice, ParallelSliceMut},
};

use crate::{
    simd::{
        engine::LaneEngine,
        lanes::{Lanes, Mask},
        traits::LaneClampedExp,
    },
    DEFAULT_LANE_WIDTH, EXP_CEILING, PARALLEL_CHUNK_SIZE, PARALLEL_THRESHOLD,
};

/// Reference `values[i]^exponents[i]` by repeated squaring, clamped to
/// [`EXP_CEILING`]. Exponents of zero or below yield 1.
pub fn clamped_exp_serial(values: &[f32], exponents: &[i32], output: &mut [f32]) {
    debug_assert_eq!(values.len(), exponents.len(), "Slices must be the same length");
    debug_assert_eq!(values.len(), output.len(), "Slices must be the same length");

    for ((out, &x), &y) in output.iter_mut().zip(values).zip(exponents) {
        let mut result = 1.0f32;
        let mut xpower = x;
        let mut y = y;

        while y > 0 {
            if y & 0x1 != 0 {
                result *= xpower;
            }
            xpower *= xpower;
            y >>= 1;
        }

        if result > EXP_CEILING {
            result = EXP_CEILING;
        }

        *out = result;
    }
}

/// Registers shared by every chunk of one call.
#[derive(Clone, Copy)]
struct ExpConstants<const W: usize> {
    zero: Lanes<i32, W>,
    one: Lanes<i32, W>,
    ceiling: Lanes<f32, W>,
}

/// Clamped exponentiation on `W`-wide chunks, equal to [`clamped_exp_serial`]
/// element for element.
///
/// The squaring loop of a chunk runs until no lane has a positive exponent left.
/// Lanes that are done drop out of the active mask and are not modified again.
pub fn clamped_exp_vector<const W: usize>(
    engine: &mut LaneEngine<W>,
    values: &[f32],
    exponents: &[i32],
    output: &mut [f32],
) {
    debug_assert_eq!(values.len(), exponents.len(), "Slices must be the same length");
    debug_assert_eq!(values.len(), output.len(), "Slices must be the same length");

    let constants = ExpConstants {
        zero: engine.broadcast(0),
        one: engine.broadcast(1),
        ceiling: engine.broadcast(EXP_CEILING),
    };

    let mut value_chunks = values.chunks_exact(W);
    let mut exponent_chunks = exponents.chunks_exact(W);
    let mut dst_chunks = output.chunks_exact_mut(W);

    for ((x, y), dst) in (&mut value_chunks)
        .zip(&mut exponent_chunks)
        .zip(&mut dst_chunks)
    {
        clamped_exp_block(engine, x, y, dst, constants);
    }

    clamped_exp_serial(
        value_chunks.remainder(),
        exponent_chunks.remainder(),
        dst_chunks.into_remainder(),
    );
}

#[inline(always)]
fn clamped_exp_block<const W: usize>(
    engine: &mut LaneEngine<W>,
    values: &[f32],
    exponents: &[i32],
    dst: &mut [f32],
    constants: ExpConstants<W>,
) {
    let ExpConstants { zero, one, ceiling } = constants;
    let all = Mask::ones();

    let mut xpower = engine.load(Lanes::default(), values, all);
    let mut y = engine.load(Lanes::default(), exponents, all);
    let mut result = engine.broadcast(1.0f32);

    loop {
        // while (y > 0)
        let active = engine.gt(Mask::zeros(), y, zero, all);
        if engine.cntbits(active) == 0 {
            break;
        }

        // if (y & 1) result *= xpower
        let low_bit = engine.bitand(Lanes::default(), y, one, active);
        let odd = engine.gt(Mask::zeros(), low_bit, zero, active);
        result = engine.mult(result, result, xpower, odd);

        xpower = engine.mult(xpower, xpower, xpower, active);
        y = engine.shift_right(y, y, one, active);
    }

    let over = engine.gt(Mask::zeros(), result, ceiling, all);
    result = engine.set(result, EXP_CEILING, over);

    engine.store(dst, result, all);
}

fn lane_clamped_exp(values: &[f32], exponents: &[i32]) -> Vec<f32> {
    let mut output = vec![0.0; values.len()];
    let mut engine = LaneEngine::<DEFAULT_LANE_WIDTH>::new();

    clamped_exp_vector(&mut engine, values, exponents, &mut output);
    engine.stats().log_summary("clamped_exp");

    output
}

fn parallel_lane_clamped_exp(values: &[f32], exponents: &[i32]) -> Vec<f32> {
    if values.len() < PARALLEL_THRESHOLD {
        return lane_clamped_exp(values, exponents);
    }

    let mut output = vec![0.0; values.len()];

    output
        .par_chunks_mut(PARALLEL_CHUNK_SIZE)
        .zip(values.par_chunks(PARALLEL_CHUNK_SIZE))
        .zip(exponents.par_chunks(PARALLEL_CHUNK_SIZE))
        .for_each(|((dst, x), y)| {
            let mut engine = LaneEngine::<DEFAULT_LANE_WIDTH>::new();
            clamped_exp_vector(&mut engine, x, y, dst);
        });

    output
}

impl LaneClampedExp for &[f32] {
    type Output = Vec<f32>;

    #[inline(always)]
    fn lane_clamped_exp(self, exponents: &[i32]) -> Self::Output {
        lane_clamped_exp(self, exponents)
    }

    #[inline(always)]
    fn par_lane_clamped_exp(self, exponents: &[i32]) -> Self::Output {
        parallel_lane_clamped_exp(self, exponents)
    }

    #[inline(always)]
    fn scalar_clamped_exp(self, exponents: &[i32]) -> Self::Output {
        let mut output = vec![0.0; self.len()];
        clamped_exp_serial(self, exponents, &mut output);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_large_power_is_clamped() {
        let mut output = [0.0f32];
        clamped_exp_vector(&mut LaneEngine::<4>::new(), &[2.0], &[10], &mut output);
        assert_eq!(output, [EXP_CEILING]);

        clamped_exp_vector(&mut LaneEngine::<1>::new(), &[2.0], &[10], &mut output);
        assert_eq!(output, [EXP_CEILING]);
    }

    #[test]
    fn test_small_powers() {
        let values = [2.0f32, 1.5, -2.0, 0.5];
        let exponents = [1, 2, 3, 0];
        let mut output = [0.0f32; 4];

        clamped_exp_vector(&mut LaneEngine::<4>::new(), &values, &exponents, &mut output);
        assert_eq!(output, [2.0, 2.25, -8.0, 1.0]);
    }

    #[test]
    fn test_finished_lanes_stop_changing() {
        // Lane 0 finishes after one round, lane 3 needs five.
        let values = [3.0f32, 1.1, 0.9, 1.01];
        let exponents = [1, 3, 6, 17];

        let mut expected = [0.0f32; 4];
        clamped_exp_serial(&values, &exponents, &mut expected);

        let mut output = [0.0f32; 4];
        let mut engine = LaneEngine::<4>::new();
        clamped_exp_vector(&mut engine, &values, &exponents, &mut output);

        assert_eq!(output, expected);
        assert!(engine.stats().utilization() < 1.0);
    }

    #[test]
    fn test_negative_exponents_yield_one() {
        let mut output = [0.0f32; 2];
        clamped_exp_vector(&mut LaneEngine::<2>::new(), &[3.0, 0.25], &[-4, -1], &mut output);
        assert_eq!(output, [1.0, 1.0]);
    }

    #[test]
    fn test_slice_trait_variants_agree() {
        let values: Vec<f32> = (0..777).map(|i| (i % 13) as f32 * 0.2 - 1.0).collect();
        let exponents: Vec<i32> = (0..777).map(|i| i % 9).collect();

        let scalar = values.as_slice().scalar_clamped_exp(&exponents);
        assert_eq!(values.as_slice().lane_clamped_exp(&exponents), scalar);
        assert_eq!(values.as_slice().par_lane_clamped_exp(&exponents), scalar);
    }
}
