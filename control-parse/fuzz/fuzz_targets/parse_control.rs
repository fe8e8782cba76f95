#![no_main]

use control_parse::{ControlFile, Paragraph};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Bytes go through the UTF-8 gate
    let _ = ControlFile::parse_bytes(data);

    if let Ok(s) = std::str::from_utf8(data) {
        // Fuzz the single-paragraph parser
        let _ = Paragraph::parse(s);

        // Fuzz the whole-file parser and reserialization
        let file = ControlFile::parse(s);
        let _ = file.to_string();
    }
});
