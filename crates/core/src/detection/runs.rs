//! Run-length encoding of boolean day flags

use serde::{Deserialize, Serialize};

/// Maximal block of consecutive days sharing the same flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSegment {
    /// Index of the first day of the run
    pub start_index: usize,
    /// Number of days in the run, at least 1
    pub length: usize,
    /// Flag value shared by every day of the run
    pub all_above_threshold: bool,
}

impl RunSegment {
    /// One past the last index of the run
    pub fn end_index(&self) -> usize {
        self.start_index + self.length
    }

    /// Indices covered by the run
    pub fn indices(&self) -> std::ops::Range<usize> {
        self.start_index..self.end_index()
    }

    /// Above-threshold run of at least `min_length` days
    pub fn is_heatwave(&self, min_length: usize) -> bool {
        self.all_above_threshold && self.length >= min_length
    }
}

/// Partition `flags` into maximal runs of equal values in one forward pass
///
/// The runs cover every index exactly once, in order.
pub fn encode_runs(flags: &[bool]) -> Vec<RunSegment> {
    let mut runs = Vec::new();
    let mut iter = flags.iter().copied().enumerate();
    let Some((_, mut current)) = iter.next() else {
        return runs;
    };
    let mut start = 0;

    for (i, flag) in iter {
        if flag != current {
            runs.push(RunSegment {
                start_index: start,
                length: i - start,
                all_above_threshold: current,
            });
            start = i;
            current = flag;
        }
    }
    runs.push(RunSegment {
        start_index: start,
        length: flags.len() - start,
        all_above_threshold: current,
    });
    runs
}

/// Per-day mask of days inside runs that qualify as heatwaves
pub fn heatwave_mask(runs: &[RunSegment], len: usize, min_length: usize) -> Vec<bool> {
    let mut mask = vec![false; len];
    for run in runs.iter().filter(|r| r.is_heatwave(min_length)) {
        for i in run.indices() {
            mask[i] = true;
        }
    }
    mask
}
