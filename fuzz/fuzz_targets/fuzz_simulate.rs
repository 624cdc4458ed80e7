#![no_main]
use defrag_rs::{decode, BlockCompactor, CompactionStrategy, WholeFileCompactor};
use libfuzzer_sys::fuzz_target;

// Feed arbitrary bytes through decode and both compaction strategies and
// check that the conserved quantities really are conserved.

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    let Ok(map) = decode(input) else {
        return;
    };

    let total = map.total_units();
    let counts = map.file_unit_counts();

    let mut fragmented = map.clone();
    BlockCompactor.compact(&mut fragmented).unwrap();
    assert_eq!(fragmented.total_units(), total);
    assert_eq!(fragmented.file_unit_counts(), counts);

    let mut whole = map;
    WholeFileCompactor.compact(&mut whole).unwrap();
    assert_eq!(whole.total_units(), total);
    assert_eq!(whole.file_unit_counts(), counts);
});
