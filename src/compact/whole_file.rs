//! Whole-file compactor: relocates entire files, never splitting them
//!
//! Files are attempted in strictly decreasing id order. Each file moves to
//! the leftmost free region that can hold it whole and that lies strictly
//! before its current position; a file with no such region stays put, and
//! no file is attempted twice.

use super::{transfer, CompactionStrategy};
use crate::disk_map::DiskMap;
use crate::error::Result;
use crate::region::FileId;
use tracing::{debug, trace};

/// Compacts with fragmentation disallowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeFileCompactor;

impl CompactionStrategy for WholeFileCompactor {
    fn name(&self) -> &'static str {
        "whole-file"
    }

    fn compact(&self, map: &mut DiskMap) -> Result<()> {
        let expected = map.total_units();

        let mut src = map.region_count().saturating_sub(1);
        // Files are first encountered in descending id order (id order and
        // position order coincide before any move). A relocated file can be
        // encountered a second time at its new position; its id is then at
        // or above the last id attempted, which is how we recognize it.
        let mut lowest_attempted: Option<FileId> = None;

        while src > 0 {
            while src > 0 && map.regions[src].is_free() {
                src -= 1;
            }
            if src == 0 {
                break;
            }

            let candidate = map.regions[src];
            let already_attempted = match (candidate.file_id(), lowest_attempted) {
                (Some(id), Some(low)) => id >= low,
                _ => false,
            };

            if !already_attempted {
                if let Some(id) = candidate.file_id() {
                    lowest_attempted = Some(id);
                }

                for dest in 0..src {
                    let target = map.regions[dest];
                    if target.is_file() || target.length < candidate.length {
                        continue;
                    }
                    if let Some(outcome) = transfer(map, src, dest, false) {
                        trace!(
                            id = candidate.file_id(),
                            moved = outcome.moved,
                            "relocated file"
                        );
                        src = outcome.src;
                        break;
                    }
                }
            }

            src -= 1;
        }

        debug!(
            regions = map.region_count(),
            free_units = map.free_units(),
            "whole-file compaction finished"
        );
        map.verify_conservation(expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::checksum;
    use crate::decoder::decode;
    use crate::region::Region;

    fn compacted(input: &str) -> DiskMap {
        let mut map = decode(input).unwrap();
        WholeFileCompactor.compact(&mut map).unwrap();
        map
    }

    #[test]
    fn test_canonical_layout() {
        let map = compacted("2333133121414131402");
        assert_eq!(
            map.to_string(),
            "00992111777.44.333....5555.6666.....8888.."
        );
    }

    #[test]
    fn test_canonical_checksum() {
        assert_eq!(checksum(&compacted("2333133121414131402")), 2858);
    }

    #[test]
    fn test_files_never_split() {
        let map = compacted("2333133121414131402");
        let mut coalesced = map.clone();
        coalesced.coalesce();
        // Each id must appear as exactly one region once adjacent pieces
        // are merged.
        let mut ids: Vec<_> = coalesced
            .regions()
            .iter()
            .filter_map(|r| r.file_id())
            .collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_too_large_file_stays_put() {
        // file0 len 1, free 1, file1 len 3: file1 cannot fit in the gap.
        let map = compacted("113");
        assert_eq!(map.to_string(), "0.111");
    }

    #[test]
    fn test_exact_fit_moves() {
        // file0 len 1, free 3, file1 len 3
        let map = compacted("133");
        assert_eq!(map.to_string(), "0111...");
    }

    #[test]
    fn test_no_free_space_is_identity() {
        let mut map = decode("502").unwrap();
        let before = map.clone();
        WholeFileCompactor.compact(&mut map).unwrap();
        assert_eq!(map, before);
    }

    #[test]
    fn test_single_file() {
        let map = compacted("5");
        assert_eq!(map.regions(), &[Region::file(0, 5)]);
    }

    #[test]
    fn test_single_unit() {
        assert_eq!(checksum(&compacted("1")), 0);
    }

    #[test]
    fn test_empty_map() {
        assert!(compacted("0").is_empty());
    }

    #[test]
    fn test_files_never_move_right() {
        let before = decode("2333133121414131402").unwrap();
        let after = compacted("2333133121414131402");

        let starts = |map: &DiskMap| {
            let mut positions = std::collections::BTreeMap::new();
            let mut offset = 0u64;
            for region in map.regions() {
                if let Some(id) = region.file_id() {
                    positions.entry(id).or_insert(offset);
                }
                offset += region.length;
            }
            positions
        };

        let before_starts = starts(&before);
        for (id, start) in starts(&after) {
            assert!(start <= before_starts[&id], "file {} moved right", id);
        }
    }

    #[test]
    fn test_relocated_files_are_not_moved_again() {
        // file2 relocates into the first gap, file1 into the remainder.
        // The cursor passes both again at their new positions and must
        // leave them where they landed.
        let map = compacted("12131");
        assert_eq!(map.to_string(), "021.....");
    }

    #[test]
    fn test_conservation() {
        let before = decode("2333133121414131402").unwrap();
        let after = compacted("2333133121414131402");
        assert_eq!(after.total_units(), before.total_units());
        assert_eq!(after.file_unit_counts(), before.file_unit_counts());
    }
}
