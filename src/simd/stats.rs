use std::fmt;

use log::debug;

/// Running count of vector instructions and how many of their lanes did work.
///
/// Every masked engine operation adds one instruction, `W` total lanes and as many
/// active lanes as its mask enables. Utilization is the active share, so a kernel
/// that keeps running lanes whose work is done shows up below 1.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaneStats {
    instructions: u64,
    active_lanes: u64,
    total_lanes: u64,
}

impl LaneStats {
    #[inline(always)]
    pub(crate) fn record(&mut self, active: usize, width: usize) {
        self.instructions += 1;
        self.active_lanes += active as u64;
        self.total_lanes += width as u64;
    }

    pub fn instructions(&self) -> u64 {
        self.instructions
    }

    pub fn active_lanes(&self) -> u64 {
        self.active_lanes
    }

    pub fn total_lanes(&self) -> u64 {
        self.total_lanes
    }

    /// Fraction of lanes that were active, or 0.0 before any instruction ran.
    pub fn utilization(&self) -> f64 {
        if self.total_lanes == 0 {
            return 0.0;
        }

        self.active_lanes as f64 / self.total_lanes as f64
    }

    /// Adds another engine's counts into this one.
    pub fn merge(&mut self, other: &LaneStats) {
        self.instructions += other.instructions;
        self.active_lanes += other.active_lanes;
        self.total_lanes += other.total_lanes;
    }

    pub fn log_summary(&self, kernel: &str) {
        debug!("{kernel}: {self}");
    }
}

impl fmt::Display for LaneStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vector instructions, {}/{} lanes active ({:.1}% utilization)",
            self.instructions,
            self.active_lanes,
            self.total_lanes,
            self.utilization() * 100.0
        )
    }
}
