#![no_main]

use libfuzzer_sys::fuzz_target;
use paper_publisher::models::MAX_AUTHORS;
use paper_publisher::sources::parse_feed;

fuzz_target!(|data: &[u8]| {
    let Ok(xml) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(papers) = parse_feed(xml) {
        for paper in papers {
            assert!(!paper.r#abstract.is_empty());
            assert!(paper.authors.len() <= MAX_AUTHORS);
        }
    }
});
