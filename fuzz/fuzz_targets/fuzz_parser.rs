#![no_main]

use jsontape::{structural_indexes, PaddedBytes, Parser, ParserOptions};
use libfuzzer_sys::fuzz_target;

// Drive scan + stage 2 over arbitrary bytes. Nothing may panic; any
// accepted UTF-8 document must survive re-serialization and reparse with
// an identical tape. (Non-UTF-8 string content is upstream's business and
// is exempt from the round-trip check.)
fuzz_target!(|data: &[u8]| {
    if data.len() >= u32::MAX as usize {
        return;
    }
    let utf8 = core::str::from_utf8(data).is_ok();
    let input = PaddedBytes::from_slice(data);
    let Ok(structurals) = structural_indexes(&input) else {
        return;
    };

    let mut parser = Parser::new(ParserOptions {
        capacity: data.len().max(64),
        ..Default::default()
    });

    let (tape, json) = match parser.parse(&input, &structurals) {
        Ok(doc) => (doc.tape().to_vec(), doc.to_json()),
        Err(_) => {
            // Streaming consumption must terminate as well.
            let mut budget = structurals.len() + 1;
            parser.reset_stream();
            while budget > 0 && parser.parse_streaming(&input, &structurals).is_ok() {
                budget -= 1;
            }
            return;
        }
    };

    if !utf8 {
        return;
    }
    let reserialized = PaddedBytes::from_slice(json.as_bytes());
    let reindexed = structural_indexes(&reserialized).expect("accepted document rescans");
    let tape2 = parser
        .parse(&reserialized, &reindexed)
        .expect("accepted document reparses")
        .tape()
        .to_vec();
    assert_eq!(tape, tape2);
});
