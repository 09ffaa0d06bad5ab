//! Masked, lock-step emulation of a `W`-lane vector unit.
//!
//! Registers are values, so an operation takes the destination's current
//! contents and returns the updated register. Every operation that takes a mask
//! only changes the lanes the mask enables; inactive lanes come back exactly as
//! they were passed in. Kernels turn
//! branches into masks and loops into "repeat while any lane is active", so a lane
//! that has finished simply stops changing.
//!
//! Memory operations read or write `W` consecutive elements starting at the
//! beginning of the given slice. Slices shorter than `W` are a caller bug, checked
//! only in debug builds.
//!
//! ```rust
//! use masklane::simd::{LaneEngine, Lanes, Mask};
//!
//! let mut engine = LaneEngine::<4>::new();
//! let x = engine.load(Lanes::default(), &[-1.0f32, 2.0, -3.0, 4.0], Mask::ones());
//!
//! let zero = engine.broadcast(0.0f32);
//! let negative = engine.lt(Mask::zeros(), x, zero, Mask::ones());
//! assert_eq!(engine.cntbits(negative), 2);
//! ```

use crate::simd::{
    lanes::{LaneElement, Lanes, Mask},
    stats::LaneStats,
};

/// A `W`-lane vector unit with instruction accounting.
#[derive(Debug, Clone, Default)]
pub struct LaneEngine<const W: usize> {
    stats: LaneStats,
}

impl<const W: usize> LaneEngine<W> {
    /// Number of lanes per register.
    pub const WIDTH: usize = W;

    /// # Panics
    ///
    /// Panics if `W` is zero.
    pub fn new() -> Self {
        assert!(W > 0, "lane width must be at least 1");

        Self {
            stats: LaneStats::default(),
        }
    }

    pub fn stats(&self) -> &LaneStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = LaneStats::default();
    }

    #[inline(always)]
    fn record(&mut self, mask: Mask<W>) {
        self.stats.record(mask.count(), W);
    }

    #[inline(always)]
    fn record_full(&mut self) {
        self.stats.record(W, W);
    }

    #[inline(always)]
    fn binary<T: LaneElement>(
        &mut self,
        dst: Lanes<T, W>,
        a: Lanes<T, W>,
        b: Lanes<T, W>,
        mask: Mask<W>,
        op: impl Fn(T, T) -> T,
    ) -> Lanes<T, W> {
        self.record(mask);

        let mut out = dst;
        for lane in mask.active_lanes() {
            out.as_mut_array()[lane] = op(a.lane(lane), b.lane(lane));
        }
        out
    }

    #[inline(always)]
    fn compare<T: LaneElement>(
        &mut self,
        dst: Mask<W>,
        a: Lanes<T, W>,
        b: Lanes<T, W>,
        mask: Mask<W>,
        op: impl Fn(T, T) -> bool,
    ) -> Mask<W> {
        self.record(mask);

        let mut out = dst;
        for lane in mask.active_lanes() {
            out.set_lane(lane, op(a.lane(lane), b.lane(lane)));
        }
        out
    }

    /// Register with every lane set to `value`.
    #[inline(always)]
    pub fn broadcast<T: LaneElement>(&mut self, value: T) -> Lanes<T, W> {
        self.record_full();
        Lanes::splat(value)
    }

    /// `dst` with active lanes set to `value`.
    #[must_use]
    #[inline(always)]
    pub fn set<T: LaneElement>(&mut self, dst: Lanes<T, W>, value: T, mask: Mask<W>) -> Lanes<T, W> {
        self.record(mask);

        let mut out = dst;
        for lane in mask.active_lanes() {
            out.as_mut_array()[lane] = value;
        }
        out
    }

    /// `dst` with active lanes copied from `src`.
    #[must_use]
    #[inline(always)]
    pub fn mov<T: LaneElement>(
        &mut self,
        dst: Lanes<T, W>,
        src: Lanes<T, W>,
        mask: Mask<W>,
    ) -> Lanes<T, W> {
        self.record(mask);

        let mut out = dst;
        for lane in mask.active_lanes() {
            out.as_mut_array()[lane] = src.lane(lane);
        }
        out
    }

    /// `dst` with active lanes read from the first `W` elements of `src`.
    #[must_use]
    #[inline(always)]
    pub fn load<T: LaneElement>(&mut self, dst: Lanes<T, W>, src: &[T], mask: Mask<W>) -> Lanes<T, W> {
        debug_assert!(src.len() >= W, "load needs {W} elements, got {}", src.len());
        self.record(mask);

        let mut out = dst;
        for lane in mask.active_lanes() {
            out.as_mut_array()[lane] = src[lane];
        }
        out
    }

    /// Writes the active lanes of `src` to the first `W` elements of `dst`.
    #[inline(always)]
    pub fn store<T: LaneElement>(&mut self, dst: &mut [T], src: Lanes<T, W>, mask: Mask<W>) {
        debug_assert!(dst.len() >= W, "store needs {W} elements, got {}", dst.len());
        self.record(mask);

        for lane in mask.active_lanes() {
            dst[lane] = src.lane(lane);
        }
    }

    #[must_use]
    #[inline(always)]
    pub fn add<T: LaneElement>(
        &mut self,
        dst: Lanes<T, W>,
        a: Lanes<T, W>,
        b: Lanes<T, W>,
        mask: Mask<W>,
    ) -> Lanes<T, W> {
        self.binary(dst, a, b, mask, |x, y| x + y)
    }

    #[must_use]
    #[inline(always)]
    pub fn sub<T: LaneElement>(
        &mut self,
        dst: Lanes<T, W>,
        a: Lanes<T, W>,
        b: Lanes<T, W>,
        mask: Mask<W>,
    ) -> Lanes<T, W> {
        self.binary(dst, a, b, mask, |x, y| x - y)
    }

    #[must_use]
    #[inline(always)]
    pub fn mult<T: LaneElement>(
        &mut self,
        dst: Lanes<T, W>,
        a: Lanes<T, W>,
        b: Lanes<T, W>,
        mask: Mask<W>,
    ) -> Lanes<T, W> {
        self.binary(dst, a, b, mask, |x, y| x * y)
    }

    /// Arithmetic right shift. Shift amounts are clamped to `0..=31`.
    #[must_use]
    #[inline(always)]
    pub fn shift_right(
        &mut self,
        dst: Lanes<i32, W>,
        a: Lanes<i32, W>,
        b: Lanes<i32, W>,
        mask: Mask<W>,
    ) -> Lanes<i32, W> {
        self.binary(dst, a, b, mask, |x, y| x >> y.clamp(0, 31))
    }

    #[must_use]
    #[inline(always)]
    pub fn bitand(
        &mut self,
        dst: Lanes<i32, W>,
        a: Lanes<i32, W>,
        b: Lanes<i32, W>,
        mask: Mask<W>,
    ) -> Lanes<i32, W> {
        self.binary(dst, a, b, mask, |x, y| x & y)
    }

    /// `a < b` for active lanes; inactive lanes keep their value from `dst`.
    #[must_use]
    #[inline(always)]
    pub fn lt<T: LaneElement>(
        &mut self,
        dst: Mask<W>,
        a: Lanes<T, W>,
        b: Lanes<T, W>,
        mask: Mask<W>,
    ) -> Mask<W> {
        self.compare(dst, a, b, mask, |x, y| x < y)
    }

    /// `a > b` for active lanes; inactive lanes keep their value from `dst`.
    #[must_use]
    #[inline(always)]
    pub fn gt<T: LaneElement>(
        &mut self,
        dst: Mask<W>,
        a: Lanes<T, W>,
        b: Lanes<T, W>,
        mask: Mask<W>,
    ) -> Mask<W> {
        self.compare(dst, a, b, mask, |x, y| x > y)
    }

    /// `a == b` for active lanes; inactive lanes keep their value from `dst`.
    #[must_use]
    #[inline(always)]
    pub fn eq<T: LaneElement>(
        &mut self,
        dst: Mask<W>,
        a: Lanes<T, W>,
        b: Lanes<T, W>,
        mask: Mask<W>,
    ) -> Mask<W> {
        self.compare(dst, a, b, mask, |x, y| x == y)
    }

    /// Population count of `mask`.
    #[inline(always)]
    pub fn cntbits(&mut self, mask: Mask<W>) -> usize {
        self.record_full();
        mask.count()
    }

    /// Adds adjacent lane pairs: lanes `2i` and `2i + 1` both receive
    /// `src[2i] + src[2i + 1]`. With an odd width the last lane is copied.
    #[must_use]
    #[inline(always)]
    pub fn hadd<T: LaneElement>(&mut self, src: Lanes<T, W>) -> Lanes<T, W> {
        self.record_full();

        let mut out = src;
        for (pair, input) in out
            .as_mut_array()
            .chunks_exact_mut(2)
            .zip(src.as_array().chunks_exact(2))
        {
            let sum = input[0] + input[1];
            pair[0] = sum;
            pair[1] = sum;
        }
        out
    }

    /// Moves even lanes to the front half and odd lanes to the back half.
    #[must_use]
    #[inline(always)]
    pub fn interleave<T: LaneElement>(&mut self, src: Lanes<T, W>) -> Lanes<T, W> {
        self.record_full();

        let input = src.as_array();
        let evens = input.iter().step_by(2);
        let odds = input.iter().skip(1).step_by(2);

        let mut out = src;
        for (lane, &value) in out.as_mut_array().iter_mut().zip(evens.chain(odds)) {
            *lane = value;
        }
        out
    }
}
