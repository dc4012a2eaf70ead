#![no_main]

use libfuzzer_sys::fuzz_target;

use stash::extraction::{PageMetadata, ScrapedPage};
use stash::import::{normalize_page, parse_published_at};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data).to_string();

    // Arbitrary date strings must never panic the parser.
    let _ = parse_published_at(&text);

    // Neither may arbitrary JSON coming back from the extraction service.
    let json = serde_json::from_slice::<serde_json::Value>(data).ok();
    let page = ScrapedPage {
        markdown: Some(text.clone()),
        metadata: PageMetadata {
            title: Some(text),
            og_image: None,
        },
        json,
    };
    let _ = normalize_page(page);
});
