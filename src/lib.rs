//! # defrag-rs - Disk-Compaction Simulator
//!
//! `defrag-rs` simulates compaction of a linear storage medium described as
//! an alternating run-length sequence of file and free regions. Two
//! defragmentation strategies are provided, together with a
//! position-weighted checksum over the finished layout:
//!
//! - **Block-level compaction** ([`BlockCompactor`]): individual storage
//!   units migrate right-to-left into any free space, splitting files
//!   freely. The result is maximally packed to the left.
//! - **Whole-file compaction** ([`WholeFileCompactor`]): entire files move
//!   into the first free region large enough, in decreasing id order,
//!   never splitting. Files that fit nowhere stay put.
//!
//! ## Quick Start
//!
//! ```rust
//! use defrag_rs::simulate;
//!
//! # fn main() -> defrag_rs::Result<()> {
//! let report = simulate("2333133121414131402")?;
//! assert_eq!(report.fragmented_checksum, 1928);
//! assert_eq!(report.whole_file_checksum, 2858);
//! # Ok(())
//! # }
//! ```
//!
//! ## Working with the map directly
//!
//! ```rust
//! use defrag_rs::{checksum, decode, BlockCompactor, CompactionStrategy};
//!
//! # fn main() -> defrag_rs::Result<()> {
//! let mut map = decode("12345")?;
//! BlockCompactor.compact(&mut map)?;
//! assert_eq!(map.to_string(), "022111222......");
//! assert_eq!(checksum(&map), 60);
//! # Ok(())
//! # }
//! ```
//!
//! The decoder produces the initial [`DiskMap`]; each strategy mutates its
//! own clone, so the two policies never observe each other's side effects.
//! The whole pipeline is single-threaded, synchronous and allocation-light:
//! compaction splices regions in place and the checksum is evaluated in
//! closed form per region, never per unit.

pub mod checksum;
pub mod compact;
pub mod decoder;
pub mod disk_map;
pub mod error;
pub mod region;

// Re-export commonly used items
pub use checksum::checksum;
pub use compact::{BlockCompactor, CompactionStrategy, WholeFileCompactor};
pub use decoder::decode;
pub use disk_map::DiskMap;
pub use error::{DefragError, Result};
pub use region::{FileId, Region, RegionKind};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Outcome of running both compaction strategies over one decoded map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactionReport {
    /// Checksum after block-level (fragmenting) compaction
    pub fragmented_checksum: u64,
    /// Checksum after whole-file (non-fragmenting) compaction
    pub whole_file_checksum: u64,
    /// Units on the medium (conserved by both strategies)
    pub total_units: u64,
    /// Unoccupied units (conserved as well)
    pub free_units: u64,
    /// Region count after block-level compaction
    pub fragmented_regions: usize,
    /// Region count after whole-file compaction
    pub whole_file_regions: usize,
}

/// Decode `input` and run both compaction strategies against independent
/// copies of the resulting map.
///
/// # Examples
///
/// ```rust
/// let report = defrag_rs::simulate("12345")?;
/// assert_eq!(report.fragmented_checksum, 60);
/// # Ok::<(), defrag_rs::DefragError>(())
/// ```
pub fn simulate(input: &str) -> Result<CompactionReport> {
    let map = decoder::decode(input)?;
    let total_units = map.total_units();
    let free_units = map.free_units();
    info!(
        regions = map.region_count(),
        units = total_units,
        "starting compaction run"
    );

    let mut fragmented = map.clone();
    BlockCompactor.compact(&mut fragmented)?;
    let fragmented_checksum = checksum(&fragmented);
    debug!(checksum = fragmented_checksum, "block strategy finished");

    let mut whole_file = map;
    WholeFileCompactor.compact(&mut whole_file)?;
    let whole_file_checksum = checksum(&whole_file);
    debug!(checksum = whole_file_checksum, "whole-file strategy finished");

    Ok(CompactionReport {
        fragmented_checksum,
        whole_file_checksum,
        total_units,
        free_units,
        fragmented_regions: fragmented.region_count(),
        whole_file_regions: whole_file.region_count(),
    })
}
