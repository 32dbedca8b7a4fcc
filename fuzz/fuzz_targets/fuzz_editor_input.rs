#![no_main]

use liquid_glass_core::{EditorConfig, ExportPackager, ParameterBindings, ParameterId};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 4096 {
        return;
    }

    // Config parsing must never panic; accepted configs must validate.
    if let Ok(config) = EditorConfig::from_json(text) {
        assert!(config.validate().is_ok());
    }

    // Any raw control value is either applied or rejected, never a panic.
    let mut bindings = ParameterBindings::default();
    for id in ParameterId::ALL {
        let _ = bindings.apply(id, text);
    }
    let css = |_: &str| -> Option<String> { Some(text.to_string()) };
    let _ = bindings.initialize_from_css(&css);
    let package = ExportPackager::render(bindings.params(), &css);
    assert_eq!(package.files.len(), 4);
});
