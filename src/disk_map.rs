//! Ordered region sequence representing the storage medium
//!
//! The map is a left-to-right run of non-overlapping regions with no
//! explicit offsets; a region's position is the sum of the lengths of all
//! regions before it. Compaction relocates units between regions but never
//! creates or destroys them, so the total unit count is an invariant of the
//! whole simulation.

use crate::error::{DefragError, Result};
use crate::region::{FileId, Region, RegionKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write as _;

/// The region sequence for one simulated storage medium.
///
/// Each compaction strategy receives its own clone of the decoded map; the
/// two strategies never observe each other's side effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskMap {
    pub(crate) regions: Vec<Region>,
}

impl DiskMap {
    pub(crate) fn from_regions(regions: Vec<Region>) -> Self {
        DiskMap { regions }
    }

    /// The regions in left-to-right order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Number of regions currently in the sequence.
    ///
    /// Grows as compaction splits regions; the unit count does not.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Total number of storage units on the medium.
    pub fn total_units(&self) -> u64 {
        self.regions.iter().map(|r| r.length).sum()
    }

    /// Number of unoccupied storage units.
    pub fn free_units(&self) -> u64 {
        self.regions
            .iter()
            .filter(|r| r.is_free())
            .map(|r| r.length)
            .sum()
    }

    /// Number of occupied storage units.
    pub fn file_units(&self) -> u64 {
        self.regions
            .iter()
            .filter(|r| r.is_file())
            .map(|r| r.length)
            .sum()
    }

    /// Per-file unit counts, keyed by id.
    ///
    /// Compaction must conserve every count in this table.
    pub fn file_unit_counts(&self) -> BTreeMap<FileId, u64> {
        let mut counts = BTreeMap::new();
        for region in &self.regions {
            if let RegionKind::File(id) = region.kind {
                *counts.entry(id).or_insert(0) += region.length;
            }
        }
        counts
    }

    /// Fragmentation score (0.0 = all free space contiguous, higher = more
    /// fragmented)
    ///
    /// Based on the number of free runs relative to the free unit count:
    /// a single free run scores 0.0, one-unit runs everywhere approach 1.0.
    pub fn fragmentation_score(&self) -> f64 {
        let free_units = self.free_units();
        if free_units == 0 {
            return 0.0;
        }

        let free_runs = self.regions.iter().filter(|r| r.is_free()).count();
        if free_runs == 0 {
            return 0.0;
        }

        (free_runs as f64 - 1.0) / (free_units as f64).max(1.0)
    }

    /// Merge adjacent regions of the same kind into single runs.
    ///
    /// Neither compaction strategy merges as it goes (splicing stays local
    /// to the regions touched by a move), so a finished map usually carries
    /// split free runs. Coalescing normalizes the sequence for structural
    /// comparison; it never changes unit positions or the checksum.
    pub fn coalesce(&mut self) {
        let mut merged: Vec<Region> = Vec::with_capacity(self.regions.len());
        for region in self.regions.drain(..) {
            match merged.last_mut() {
                Some(last) if last.kind == region.kind => last.length += region.length,
                _ => merged.push(region),
            }
        }
        self.regions = merged;
    }

    /// Check unit conservation against the count captured before a
    /// compaction pass.
    ///
    /// A mismatch means a move operation created or destroyed units, which
    /// is an internal-consistency failure rather than a user error.
    pub(crate) fn verify_conservation(&self, expected: u64) -> Result<()> {
        let actual = self.total_units();
        if actual != expected {
            return Err(DefragError::InvariantViolation { expected, actual });
        }
        Ok(())
    }
}

/// Renders the map unit-by-unit: `.` for free units, the id digit for file
/// units, ids above 9 in brackets. Intended for small maps in tests and
/// debug output.
impl fmt::Display for DiskMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for region in &self.regions {
            for _ in 0..region.length {
                match region.kind {
                    RegionKind::Free => f.write_char('.')?,
                    RegionKind::File(id) if id < 10 => write!(f, "{}", id)?,
                    RegionKind::File(id) => write!(f, "[{}]", id)?,
                }
            }
        }
        Ok(())
    }
}
