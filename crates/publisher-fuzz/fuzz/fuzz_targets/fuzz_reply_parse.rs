#![no_main]

use libfuzzer_sys::fuzz_target;
use paper_publisher::models::AnalysisResult;
use paper_publisher::parser::parse;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Text replies: failures must keep the reply verbatim
    if let AnalysisResult::ParseFailed { raw_text } = parse(text) {
        assert_eq!(raw_text, text);
    }

    // Structured replies never panic either
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(text) {
        let _ = parse(value);
    }
});
