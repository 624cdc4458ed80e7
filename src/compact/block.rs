//! Block-level compactor: fills leading free space with trailing file units
//!
//! Equivalent to moving one unit at a time from the end of the medium into
//! the first free unit from the start, until the two scans meet. Files may
//! end up split across several regions; that is expected, not an error.

use super::{transfer, CompactionStrategy};
use crate::disk_map::DiskMap;
use crate::error::Result;
use tracing::debug;

/// Compacts with fragmentation allowed.
///
/// Two cursors converge over the sequence: a forward cursor resting on free
/// regions and a backward cursor resting on file regions. Units are
/// transferred backward-to-forward until the cursors meet, after which no
/// free unit precedes any file unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockCompactor;

impl CompactionStrategy for BlockCompactor {
    fn name(&self) -> &'static str {
        "block"
    }

    fn compact(&self, map: &mut DiskMap) -> Result<()> {
        let expected = map.total_units();

        if !map.is_empty() {
            let mut front = 0usize;
            let mut back = map.region_count() - 1;

            loop {
                // Advance to the next free region from the head.
                while front < back && map.regions[front].is_file() {
                    front += 1;
                }
                // Retreat to the next file region from the tail.
                while back > front && map.regions[back].is_free() {
                    back -= 1;
                }
                if front >= back {
                    break;
                }

                match transfer(map, back, front, true) {
                    // A splice may have shifted the source; re-derive the
                    // cursor from the reported index rather than the stale one.
                    Some(outcome) => back = outcome.src.min(map.region_count() - 1),
                    None => break,
                }
            }
        }

        debug!(
            regions = map.region_count(),
            free_units = map.free_units(),
            "block compaction finished"
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
        BlockCompactor.compact(&mut map).unwrap();
        map
    }

    #[test]
    fn test_small_example_layout() {
        let map = compacted("12345");
        assert_eq!(map.to_string(), "022111222......");
    }

    #[test]
    fn test_small_example_checksum() {
        assert_eq!(checksum(&compacted("12345")), 60);
    }

    #[test]
    fn test_canonical_layout() {
        let map = compacted("2333133121414131402");
        assert_eq!(
            map.to_string(),
            "0099811188827773336446555566.............."
        );
    }

    #[test]
    fn test_canonical_checksum() {
        assert_eq!(checksum(&compacted("2333133121414131402")), 1928);
    }

    #[test]
    fn test_no_file_after_free_space() {
        let map = compacted("2333133121414131402");
        let first_free = map
            .regions()
            .iter()
            .position(|r| r.is_free())
            .expect("free space survives compaction");
        assert!(map.regions()[first_free..].iter().all(|r| r.is_free()));
    }

    #[test]
    fn test_no_free_space_is_identity() {
        let mut map = decode("502").unwrap();
        let before = map.clone();
        BlockCompactor.compact(&mut map).unwrap();
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
        let map = compacted("0");
        assert!(map.is_empty());
    }

    #[test]
    fn test_leading_free_space_is_filled() {
        // file0 len 0 (elided), free 3, file1 len 2
        let map = compacted("032");
        assert_eq!(map.to_string(), "11...");
    }

    #[test]
    fn test_conservation() {
        let before = decode("2333133121414131402").unwrap();
        let after = compacted("2333133121414131402");
        assert_eq!(after.total_units(), before.total_units());
        assert_eq!(after.file_unit_counts(), before.file_unit_counts());
    }
}
