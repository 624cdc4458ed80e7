//! Region model for the simulated storage medium
//!
//! A region is a maximal contiguous run of storage units that are either
//! free or belong to a single file. Positions are implicit: a region starts
//! where the previous one ends.

use serde::{Deserialize, Serialize};

/// Identifier of a file on the medium.
///
/// Ids are assigned in strictly increasing order of first appearance during
/// decoding, so before any compaction id order and position order coincide.
pub type FileId = u32;

/// Occupancy state of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionKind {
    /// Units belonging to the file with the given id
    File(FileId),
    /// Unoccupied units
    Free,
}

/// A contiguous run of storage units sharing one occupancy state.
///
/// A region never has length zero; zero-length runs are elided wherever
/// regions are created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub kind: RegionKind,
    /// Number of storage units covered by this region (always > 0)
    pub length: u64,
}

impl Region {
    pub fn file(id: FileId, length: u64) -> Self {
        Region {
            kind: RegionKind::File(id),
            length,
        }
    }

    pub fn free(length: u64) -> Self {
        Region {
            kind: RegionKind::Free,
            length,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, RegionKind::File(_))
    }

    pub fn is_free(&self) -> bool {
        matches!(self.kind, RegionKind::Free)
    }

    /// File id carried by this region, or `None` for free space.
    pub fn file_id(&self) -> Option<FileId> {
        match self.kind {
            RegionKind::File(id) => Some(id),
            RegionKind::Free => None,
        }
    }
}
