//! Value types for the lane engine: fixed-width registers and predicate masks.

use std::fmt::Debug;
use std::ops::{BitAnd, BitOr, Not};

/// Scalar types a lane can hold.
pub trait LaneElement: num::Num + Copy + PartialOrd + Debug + Send + Sync {}

impl LaneElement for f32 {}

impl LaneElement for i32 {}

/// A vector register of `W` lanes.
///
/// Registers are plain values. They only exchange data with memory through the
/// engine's masked [`load`](crate::simd::LaneEngine::load) and
/// [`store`](crate::simd::LaneEngine::store).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Lanes<T, const W: usize> {
    elements: [T; W],
}

impl<T: LaneElement, const W: usize> Lanes<T, W> {
    /// Register with every lane set to `value`.
    #[inline(always)]
    pub fn splat(value: T) -> Self {
        Self {
            elements: [value; W],
        }
    }

    #[inline(always)]
    pub fn lane(&self, index: usize) -> T {
        self.elements[index]
    }

    #[inline(always)]
    pub fn as_array(&self) -> &[T; W] {
        &self.elements
    }

    #[inline(always)]
    pub(crate) fn as_mut_array(&mut self) -> &mut [T; W] {
        &mut self.elements
    }

    #[inline(always)]
    pub fn to_array(self) -> [T; W] {
        self.elements
    }
}

impl<T: LaneElement, const W: usize> Default for Lanes<T, W> {
    fn default() -> Self {
        Self::splat(T::zero())
    }
}

impl<T: LaneElement, const W: usize> From<[T; W]> for Lanes<T, W> {
    fn from(elements: [T; W]) -> Self {
        Self { elements }
    }
}

/// One predicate bit per lane of a `W`-wide register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Mask<const W: usize> {
    lanes: [bool; W],
}

impl<const W: usize> Mask<W> {
    #[inline(always)]
    pub fn ones() -> Self {
        Self { lanes: [true; W] }
    }

    #[inline(always)]
    pub fn zeros() -> Self {
        Self { lanes: [false; W] }
    }

    /// Mask with the first `count` lanes active.
    #[inline(always)]
    pub fn first(count: usize) -> Self {
        let mut lanes = [false; W];
        lanes.iter_mut().take(count).for_each(|lane| *lane = true);
        Self { lanes }
    }

    #[inline(always)]
    pub fn is_active(&self, lane: usize) -> bool {
        self.lanes[lane]
    }

    #[inline(always)]
    pub(crate) fn set_lane(&mut self, lane: usize, active: bool) {
        self.lanes[lane] = active;
    }

    /// Number of active lanes. Unlike [`LaneEngine::cntbits`](crate::simd::LaneEngine::cntbits)
    /// this is not counted as a vector instruction.
    #[inline(always)]
    pub fn count(&self) -> usize {
        self.lanes.iter().filter(|&&lane| lane).count()
    }

    #[inline(always)]
    pub fn any(&self) -> bool {
        self.lanes.contains(&true)
    }

    #[inline(always)]
    pub fn none(&self) -> bool {
        !self.any()
    }

    #[inline(always)]
    pub fn and(self, other: Self) -> Self {
        self & other
    }

    #[inline(always)]
    pub fn or(self, other: Self) -> Self {
        self | other
    }

    /// Iterator over the indices of active lanes.
    pub fn active_lanes(&self) -> impl Iterator<Item = usize> + '_ {
        self.lanes
            .iter()
            .enumerate()
            .filter_map(|(index, &active)| active.then_some(index))
    }
}

impl<const W: usize> From<[bool; W]> for Mask<W> {
    fn from(lanes: [bool; W]) -> Self {
        Self { lanes }
    }
}

impl<const W: usize> Not for Mask<W> {
    type Output = Self;

    #[inline(always)]
    fn not(mut self) -> Self {
        self.lanes.iter_mut().for_each(|lane| *lane = !*lane);
        self
    }
}

impl<const W: usize> BitAnd for Mask<W> {
    type Output = Self;

    #[inline(always)]
    fn bitand(mut self, rhs: Self) -> Self {
        self.lanes
            .iter_mut()
            .zip(rhs.lanes)
            .for_each(|(lane, other)| *lane &= other);
        self
    }
}

impl<const W: usize> BitOr for Mask<W> {
    type Output = Self;

    #[inline(always)]
    fn bitor(mut self, rhs: Self) -> Self {
        self.lanes
            .iter_mut()
            .zip(rhs.lanes)
            .for_each(|(lane, other)| *lane |= other);
        self
    }
}
