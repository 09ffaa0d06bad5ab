//! Lane reduction against the scalar left-to-right sum.
//!
//! The lane version adds in a different order, so results are compared with a
//! relative tolerance rather than for equality.

use masklane::simd::{
    kernels::{sum_serial, sum_vector},
    LaneEngine, LaneSum,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const RELATIVE_TOLERANCE: f32 = 1e-4;

fn assert_close(actual: f32, expected: f32, context: &str) {
    let relative_error = (actual - expected).abs() / expected.abs().max(f32::MIN_POSITIVE);
    println!("{context}: vector={actual}, serial={expected}, rel error={relative_error:.2e}");

    assert!(
        relative_error <= RELATIVE_TOLERANCE,
        "{context}: vector={actual}, serial={expected}, rel error={relative_error:.2e}"
    );
}

fn random_values(seed: u64, len: usize) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.random_range(0.0..=1.0)).collect()
}

#[test]
fn test_sum_multiple_widths() {
    for chunks in [1usize, 2, 3, 10, 257] {
        let values = random_values(chunks as u64, chunks * 16);
        let expected = sum_serial(&values);

        assert_close(sum_vector(&mut LaneEngine::<1>::new(), &values), expected, "W=1");
        assert_close(sum_vector(&mut LaneEngine::<2>::new(), &values), expected, "W=2");
        assert_close(sum_vector(&mut LaneEngine::<4>::new(), &values), expected, "W=4");
        assert_close(sum_vector(&mut LaneEngine::<8>::new(), &values), expected, "W=8");
        assert_close(sum_vector(&mut LaneEngine::<16>::new(), &values), expected, "W=16");
    }
}

#[test]
fn test_sum_large_array() {
    let values = random_values(31337, 1 << 18);
    let expected = sum_serial(&values);

    assert_close(sum_vector(&mut LaneEngine::<8>::new(), &values), expected, "262144 elements");
}

#[test]
fn test_sum_exact_for_small_integers() {
    let values: Vec<f32> = (0..64).map(|i| i as f32).collect();
    assert_eq!(sum_vector(&mut LaneEngine::<4>::new(), &values), 2016.0);
}

#[test]
fn test_sum_slice_traits() {
    let values = random_values(5, 300_007);
    let expected = values.as_slice().scalar_sum();

    assert_close(values.as_slice().lane_sum(), expected, "lane_sum");
    assert_close(values.as_slice().par_lane_sum(), expected, "par_lane_sum");
}
