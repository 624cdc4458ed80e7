//! Position-weighted checksum over a finished region sequence
//!
//! Every file unit contributes `position * id`, counting positions from
//! zero at the head of the medium; free units contribute nothing.

use crate::disk_map::DiskMap;
use crate::region::RegionKind;

/// Compute the checksum without materializing individual units.
///
/// A file region of length `L` and id `k` starting at offset `p` contributes
/// `k * (L*p + L*(L-1)/2)`, the closed form of `k * (p + (p+1) + ... +
/// (p+L-1))`.
pub fn checksum(map: &DiskMap) -> u64 {
    let mut sum = 0u64;
    let mut position = 0u64;

    for region in map.regions() {
        if let RegionKind::File(id) = region.kind {
            let len = region.length;
            sum += u64::from(id) * (len * position + len * (len - 1) / 2);
        }
        position += region.length;
    }

    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::Region;

    /// Unit-by-unit reference implementation.
    fn naive_checksum(map: &DiskMap) -> u64 {
        let mut sum = 0u64;
        let mut position = 0u64;
        for region in map.regions() {
            for _ in 0..region.length {
                if let Some(id) = region.file_id() {
                    sum += position * u64::from(id);
                }
                position += 1;
            }
        }
        sum
    }

    #[test]
    fn test_checksum_matches_naive_sum() {
        let map = DiskMap::from_regions(vec![
            Region::file(0, 2),
            Region::free(3),
            Region::file(1, 3),
            Region::free(1),
            Region::file(2, 4),
        ]);
        assert_eq!(checksum(&map), naive_checksum(&map));
    }

    #[test]
    fn test_checksum_free_regions_contribute_nothing() {
        let with_gap = DiskMap::from_regions(vec![Region::free(7), Region::file(3, 2)]);
        // file 3 occupies positions 7 and 8
        assert_eq!(checksum(&with_gap), 3 * (7 + 8));
    }

    #[test]
    fn test_checksum_single_unit_id_zero() {
        let map = DiskMap::from_regions(vec![Region::file(0, 1)]);
        assert_eq!(checksum(&map), 0);
    }

    #[test]
    fn test_checksum_empty_map() {
        let map = DiskMap::from_regions(vec![]);
        assert_eq!(checksum(&map), 0);
    }

    #[test]
    fn test_checksum_split_file_counts_both_pieces() {
        let split = DiskMap::from_regions(vec![
            Region::file(2, 1),
            Region::free(1),
            Region::file(2, 2),
        ]);
        // positions 0, 2, 3 all carry id 2
        assert_eq!(checksum(&split), 2 * (0 + 2 + 3));
        assert_eq!(checksum(&split), naive_checksum(&split));
    }
}
