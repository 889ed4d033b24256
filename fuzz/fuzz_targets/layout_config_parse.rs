#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(config) = remodel::LayoutConfig::from_json_str(text) {
            let _ = config.to_json_string();
        }
    }
});
