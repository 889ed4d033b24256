#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let mappings = remodel::root::parse_maps(&text);
    if let Some(path) = mappings.iter().find_map(|m| m.path.as_deref()) {
        let _ = remodel::root::module_base(&mappings, path);
    }
});
