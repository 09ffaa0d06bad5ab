//! Row assignment properties of the static block decomposition.

use masklane::{
    error::MasklaneError,
    fractal::{render_parallel, row_range, RowPartitioner, Viewport},
    MAX_WORKERS,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Every row is owned by exactly one worker.
#[test]
fn test_ranges_cover_every_row_once() {
    let partitioner = RowPartitioner::default();

    for height in [0usize, 1, 2, 7, 31, 32, 33, 100, 1001] {
        for workers in 1..=MAX_WORKERS {
            let plan = partitioner.plan(workers, height).unwrap();
            assert_eq!(plan.len(), workers);

            let mut owners = vec![0usize; height];
            for range in &plan {
                for row in range.clone() {
                    owners[row] += 1;
                }
            }

            assert!(
                owners.iter().all(|&count| count == 1),
                "height={height}, workers={workers}: {plan:?}"
            );

            // Contiguous and ordered.
            for pair in plan.windows(2) {
                assert_eq!(pair[0].end, pair[1].start);
            }
            assert_eq!(plan[0].start, 0);
            assert_eq!(plan[workers - 1].end, height);
        }
    }
}

#[test]
fn test_only_last_worker_gets_extra_rows() {
    for height in [10usize, 97, 640] {
        for workers in 2..=MAX_WORKERS {
            let block = height / workers;

            for worker in 0..workers - 1 {
                assert_eq!(row_range(worker, workers, height).len(), block);
            }
            assert_eq!(
                row_range(workers - 1, workers, height).len(),
                height - block * (workers - 1)
            );
        }
    }
}

#[test]
fn test_worker_ceiling_boundary() {
    init_logging();

    let view = Viewport::new(-1.0, -1.0, 1.0, 1.0).unwrap();
    let mut buffer = vec![0u32; 40 * 40];

    assert!(render_parallel(MAX_WORKERS, &view, 40, 40, 50, &mut buffer).is_ok());

    let mut untouched = vec![7u32; 40 * 40];
    let result = render_parallel(MAX_WORKERS + 1, &view, 40, 40, 50, &mut untouched);

    println!("{:?}", result);
    assert_eq!(
        result,
        Err(MasklaneError::WorkerLimitExceeded {
            requested: MAX_WORKERS + 1,
            max: MAX_WORKERS
        })
    );
    assert!(untouched.iter().all(|&v| v == 7), "a rejected render wrote pixels");
}

#[test]
fn test_custom_ceiling() {
    let partitioner = RowPartitioner::new(2);
    assert_eq!(partitioner.max_workers(), 2);
    assert!(partitioner.plan(2, 10).is_ok());
    assert!(partitioner.plan(3, 10).is_err());
}
