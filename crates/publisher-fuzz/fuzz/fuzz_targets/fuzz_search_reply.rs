#![no_main]

use libfuzzer_sys::fuzz_target;
use paper_publisher::models::{MAX_AUTHORS, SearchReply};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes should only ever decode or fail, never panic
    let Ok(reply) = serde_json::from_slice::<SearchReply>(data) else {
        return;
    };

    for paper in reply.data.into_iter().filter_map(|hit| hit.into_record("fuzz")) {
        assert!(paper.has_abstract());
        assert!(paper.authors.len() <= MAX_AUTHORS);
    }
});
