//! Demo driver: renders the classic Mandelbrot view serially and with a row
//! partition, then runs the lane kernels against their scalar twins.
//!
//! Settings come from the environment:
//!
//! - `MASKLANE_WORKERS` (default 8)
//! - `MASKLANE_WIDTH` / `MASKLANE_HEIGHT` (default 1200 x 800)
//! - `MASKLANE_BUDGET` (default 256)
//! - `RUST_LOG` for log verbosity

use std::env;
use std::process;
use std::str::FromStr;
use std::time::{Duration, Instant};

use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use masklane::{
    error::validation_error,
    fractal::{render_parallel, render_rows, Viewport},
    simd::{
        kernels::{
            abs_serial, abs_vector, clamped_exp_serial, clamped_exp_vector, sum_serial,
            sum_vector,
        },
        LaneEngine,
    },
    DEFAULT_LANE_WIDTH, EXP_CEILING,
};

const KERNEL_LEN: usize = 1 << 16;

fn setting<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("ignoring unparsable {name}={raw}");
            default
        }),
        Err(_) => default,
    }
}

fn timed<F: FnMut()>(mut run: F) -> Duration {
    let start = Instant::now();
    run();
    start.elapsed()
}

fn run_render(workers: usize, width: usize, height: usize, budget: u32) -> masklane::Result<()> {
    if width == 0 || height == 0 {
        return Err(validation_error("image must be at least 1x1"));
    }

    let view = Viewport::new(-2.167, -1.0, 1.167, 1.0)?;

    let mut serial = vec![0u32; width * height];
    let serial_time = timed(|| render_rows(&view, width, height, 0, height, budget, &mut serial));

    let mut parallel = vec![0u32; width * height];
    let mut outcome: masklane::Result<()> = Ok(());
    let parallel_time = timed(|| {
        outcome = render_parallel(workers, &view, width, height, budget, &mut parallel);
    });
    outcome?;

    let mismatches = serial
        .iter()
        .zip(&parallel)
        .filter(|(a, b)| a != b)
        .count();

    if mismatches > 0 {
        error!("{mismatches} pixels differ between serial and {workers}-worker renders");
    }

    println!(
        "render {width}x{height}, budget {budget}: serial {:.2} ms, {workers} workers {:.2} ms ({:.2}x speedup)",
        serial_time.as_secs_f64() * 1e3,
        parallel_time.as_secs_f64() * 1e3,
        serial_time.as_secs_f64() / parallel_time.as_secs_f64().max(f64::EPSILON)
    );

    Ok(())
}

fn run_kernels() {
    let mut rng = StdRng::seed_from_u64(42);
    // Odd length so every kernel exercises its scalar remainder.
    let len = KERNEL_LEN + DEFAULT_LANE_WIDTH / 2 + 1;

    let values: Vec<f32> = (0..len).map(|_| rng.random_range(-10.0..=10.0)).collect();
    let exponents: Vec<i32> = (0..len).map(|_| rng.random_range(0..=10)).collect();

    let mut expected = vec![0.0f32; len];
    let mut output = vec![0.0f32; len];

    let mut engine = LaneEngine::<DEFAULT_LANE_WIDTH>::new();
    abs_serial(&values, &mut expected);
    abs_vector(&mut engine, &values, &mut output);
    let abs_ok = expected
        .iter()
        .zip(&output)
        .all(|(a, b)| a.to_bits() == b.to_bits());
    println!("abs: {} ({})", verdict(abs_ok), engine.stats());

    let mut engine = LaneEngine::<DEFAULT_LANE_WIDTH>::new();
    clamped_exp_serial(&values, &exponents, &mut expected);
    clamped_exp_vector(&mut engine, &values, &exponents, &mut output);
    let exp_ok = expected == output && output.iter().all(|&x| x <= EXP_CEILING);
    println!("clamped_exp: {} ({})", verdict(exp_ok), engine.stats());

    let mut engine = LaneEngine::<DEFAULT_LANE_WIDTH>::new();
    let aligned = &values[..len - len % DEFAULT_LANE_WIDTH];
    let serial = sum_serial(aligned);
    let vector = sum_vector(&mut engine, aligned);
    let relative = ((serial - vector) / serial.abs().max(1.0)).abs();
    println!(
        "sum: {} (serial {serial}, vector {vector}, relative error {relative:.2e}; {})",
        verdict(relative < 1e-4),
        engine.stats()
    );
}

fn verdict(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "MISMATCH"
    }
}

fn main() {
    env_logger::init();

    let workers = setting("MASKLANE_WORKERS", 8usize);
    let width = setting("MASKLANE_WIDTH", 1200usize);
    let height = setting("MASKLANE_HEIGHT", 800usize);
    let budget = setting("MASKLANE_BUDGET", 256u32);

    info!("workers={workers} width={width} height={height} budget={budget}");

    if let Err(err) = run_render(workers, width, height, budget) {
        eprintln!("Error: {err}");
        process::exit(1);
    }

    run_kernels();
}
