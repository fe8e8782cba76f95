#![no_main]

use control_parse::ControlFile;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let mut file = ControlFile::parse(s);

        // Test modification operations
        for paragraph in file.iter_mut() {
            paragraph.set("Test-Field", "test-value");
            paragraph.remove("Test-Field");

            for (name, value) in paragraph.iter() {
                let _ = (name, value);
            }
        }

        // Test serialization back to string
        let _ = file.to_string();
    }
});
