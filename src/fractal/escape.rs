use num::Complex;

use crate::ESCAPE_THRESHOLD;

/// Counts the iterations of `z <- z^2 + c` before the orbit of `c = re + im·i`
/// leaves the disc `|z|^2 <= ESCAPE_THRESHOLD`.
///
/// The orbit starts at `z = c`. Returns `budget` when the point never escapes
/// within the budget. A NaN coordinate never compares greater than the
/// threshold, so it also runs out the budget.
///
/// # Examples
///
/// ```rust
/// use masklane::fractal::escape_time;
///
/// assert_eq!(escape_time(0.0, 0.0, 100), 100);
/// assert_eq!(escape_time(2.0, 2.0, 100), 0);
/// ```
#[inline(always)]
pub fn escape_time(re: f32, im: f32, budget: u32) -> u32 {
    let c = Complex::new(re, im);
    let mut z = c;

    let mut iterations = 0;
    while iterations < budget {
        if z.norm_sqr() > ESCAPE_THRESHOLD {
            break;
        }

        z = z * z + c;
        iterations += 1;
    }

    iterations
}
