//! Decoding of the run-length disk description
//!
//! The input is a string of ASCII digits alternating between file lengths
//! and free-space lengths, starting with a file length; the trailing free
//! length may be omitted. Anything that is not a digit (newlines, spaces)
//! is skipped.

use crate::disk_map::DiskMap;
use crate::error::{DefragError, Result};
use crate::region::{FileId, Region};
use tracing::debug;

/// Decode a digit string into the initial region sequence.
///
/// The k-th file-length digit produces a file region with id `k`. A zero
/// digit still consumes its id but produces no region, so zero-length
/// regions never enter the sequence. Fails if the input contains no digits
/// at all.
///
/// # Examples
///
/// ```rust
/// let map = defrag_rs::decode("12345").unwrap();
/// assert_eq!(map.to_string(), "0..111....22222");
/// ```
pub fn decode(input: &str) -> Result<DiskMap> {
    let mut regions = Vec::with_capacity(input.len());
    let mut next_id: FileId = 0;
    let mut is_file = true;
    let mut saw_digit = false;

    for byte in input.bytes() {
        if !byte.is_ascii_digit() {
            continue;
        }
        saw_digit = true;
        let length = u64::from(byte - b'0');

        if is_file {
            if length > 0 {
                regions.push(Region::file(next_id, length));
            }
            // A zero-length file still consumes its id.
            next_id += 1;
        } else if length > 0 {
            regions.push(Region::free(length));
        }
        is_file = !is_file;
    }

    if !saw_digit {
        return Err(DefragError::MalformedInput(
            "input contains no digits".to_string(),
        ));
    }

    let map = DiskMap::from_regions(regions);
    debug!(
        regions = map.region_count(),
        units = map.total_units(),
        files = next_id,
        "decoded disk map"
    );
    Ok(map)
}
