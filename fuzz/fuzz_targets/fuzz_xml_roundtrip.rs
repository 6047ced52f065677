#![no_main]
use fattura::xml::{WriteOptions, parse_document, to_xml_string};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(root) = parse_document(s) {
            // Anything the reader accepts must survive a write/read cycle unchanged
            for options in [WriteOptions::default(), WriteOptions { indent: None, declaration: false }] {
                let xml = to_xml_string(&root, &options)
                    .expect("serializing a parsed document must not fail");
                let reparsed = parse_document(&xml).expect("re-parsing written XML must not fail");
                assert_eq!(root, reparsed);
            }
        }
    }
});
