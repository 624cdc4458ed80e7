//! Compaction strategies and their shared region-move primitive
//!
//! Both strategies rewrite a [`DiskMap`] in place and differ only in
//! whether a file may be split across several destinations:
//!
//! - [`block`] - moves individual storage units right-to-left into any free
//!   space, splitting files freely
//! - [`whole_file`] - moves entire files into the first free region large
//!   enough, never splitting

pub mod block;
pub mod whole_file;

pub use block::BlockCompactor;
pub use whole_file::WholeFileCompactor;

use crate::disk_map::DiskMap;
use crate::error::Result;
use crate::region::Region;
use tracing::trace;

/// A defragmentation policy applied to a mutable disk map.
pub trait CompactionStrategy {
    /// Short strategy name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Rewrite `map` in place according to this policy.
    ///
    /// Verifies unit conservation over the whole pass; a mismatch is an
    /// internal-consistency failure and surfaces as
    /// [`DefragError::InvariantViolation`](crate::error::DefragError).
    fn compact(&self, map: &mut DiskMap) -> Result<()>;
}

/// Result of transferring units between two regions.
pub(crate) struct Transfer {
    /// Units actually moved
    pub moved: u64,
    /// Index of the source region after any splice shifted it
    pub src: usize,
}

/// Move units from the file at `src` into the free region at `dest`.
///
/// `dest` must precede `src`. Returns `None` without touching the map when
/// splitting is disallowed and the destination cannot hold the whole file.
///
/// The destination takes the source's id for the moved length; destination
/// surplus stays behind as a fresh free region, and the vacated source tail
/// becomes one as well. No merging with neighbouring free regions is
/// attempted. Adjacent regions degenerate to a swap. Callers must re-derive
/// their cursors from the returned source index, since a splice shifts
/// every index after the destination.
pub(crate) fn transfer(
    map: &mut DiskMap,
    src: usize,
    dest: usize,
    allow_split: bool,
) -> Option<Transfer> {
    debug_assert!(dest < src);
    debug_assert!(map.regions[dest].is_free());

    let src_region = map.regions[src];
    let id = src_region.file_id()?;
    let dest_len = map.regions[dest].length;

    if dest_len < src_region.length && !allow_split {
        return None;
    }

    if src == dest + 1 {
        // Adjacent regions: the file slides left over the gap wholesale,
        // which is exactly a swap even when the lengths differ.
        map.regions.swap(src, dest);
        trace!(src, dest, moved = src_region.length, "swapped adjacent regions");
        return Some(Transfer {
            moved: src_region.length,
            src: src + 1,
        });
    }

    let moved = dest_len.min(src_region.length);
    let mut src = src;

    map.regions[dest] = Region::file(id, moved);
    if dest_len > moved {
        // Surplus free space stays immediately behind the filled portion.
        map.regions.insert(dest + 1, Region::free(dest_len - moved));
        src += 1;
    }

    if src_region.length > moved {
        // Partial move: the file shrinks in place and the vacated tail
        // becomes free space right after it.
        map.regions[src].length = src_region.length - moved;
        map.regions.insert(src + 1, Region::free(moved));
    } else {
        map.regions[src] = Region::free(src_region.length);
    }

    trace!(src, dest, moved, "moved units into free region");
    Some(Transfer { moved, src })
}
