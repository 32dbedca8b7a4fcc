#![forbid(unsafe_code)]

//! Export flow: bindings state → rendered package → zip archive.
//!
//! Run:
//!   cargo test -p liquid-glass-core --test export_archive

use std::collections::HashMap;
use std::io::{Cursor, Read};

use liquid_glass_core::{ExportPackager, ParameterBindings, ParameterId};
use pretty_assertions::assert_eq;

fn read_entry(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("archive should open");
    let mut entry = archive.by_name(name).expect("entry should exist");
    let mut contents = String::new();
    entry
        .read_to_string(&mut contents)
        .expect("entry should be utf-8");
    contents
}

#[test]
fn archive_holds_every_rendered_file() {
    let package = ExportPackager::render(&Default::default(), &|_: &str| -> Option<String> { None });
    let bytes = package.to_zip().expect("zip should build");

    let archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).expect("archive should open");
    let mut names: Vec<&str> = archive.file_names().collect();
    names.sort_unstable();
    assert_eq!(
        names,
        [
            "README.md",
            "glass-displacement-map.html",
            "liquid-glass-effect.css",
            "safari-compatibility.js",
        ]
    );

    for file in &package.files {
        assert_eq!(read_entry(&bytes, file.name), file.contents);
    }
}

#[test]
fn export_reflects_values_entered_through_bindings() {
    let mut bindings = ParameterBindings::default();
    bindings
        .apply(ParameterId::NoiseFreq, "0.015")
        .expect("valid noise");
    bindings
        .apply(ParameterId::Distortion, "90")
        .expect("valid distortion");
    bindings
        .apply(ParameterId::FontSize, "36")
        .expect("valid font size");
    bindings
        .apply(ParameterId::TextContent, "Frosted")
        .expect("text is free-form");

    // The document reports what the bindings wrote into the root style.
    let computed: HashMap<&str, &str> = HashMap::from([
        ("--noise-frequency", "0.015"),
        ("--distortion-strength", "90"),
        ("--shadow-color", "rgba(255, 255, 255, 0.7)"),
    ]);
    let css = |name: &str| computed.get(name).map(|value| (*value).to_string());

    let bytes = ExportPackager::render(bindings.params(), &css)
        .to_zip()
        .expect("zip should build");

    let stylesheet = read_entry(&bytes, "liquid-glass-effect.css");
    assert!(stylesheet.contains("--noise-frequency: 0.015;"));
    assert!(stylesheet.contains("--shadow-color: rgba(255, 255, 255, 0.7);"));
    assert!(stylesheet.contains("font-size: 36px;"));

    let map = read_entry(&bytes, "glass-displacement-map.html");
    assert!(map.contains(r#"baseFrequency="0.015""#));
    assert!(map.contains(r#"scale="90""#));

    let readme = read_entry(&bytes, "README.md");
    assert!(readme.contains("Text Content: \"Frosted\""));
    assert!(readme.contains("Font Size: 36px"));
}

#[test]
fn untouched_sliders_export_the_values_the_page_shows() {
    // Markup ships slider values that differ from the built-in defaults.
    let markup = [
        (ParameterId::NoiseFreq, "0.012"),
        (ParameterId::Distortion, "110"),
        (ParameterId::FrostBlur, "3"),
    ];
    let computed: HashMap<&str, &str> = HashMap::from([
        ("--noise-frequency", "0.012"),
        ("--distortion-strength", "110"),
        ("--frost-blur", "3px"),
    ]);
    let css = |name: &str| computed.get(name).map(|value| (*value).to_string());

    let mut bindings = ParameterBindings::default();
    for (id, value) in markup {
        bindings.sync_value(id, value).expect("markup value parses");
    }
    bindings.initialize_from_css(&css);

    let bytes = ExportPackager::render(bindings.params(), &css)
        .to_zip()
        .expect("zip should build");

    let stylesheet = read_entry(&bytes, "liquid-glass-effect.css");
    let map = read_entry(&bytes, "glass-displacement-map.html");
    let readme = read_entry(&bytes, "README.md");
    assert!(stylesheet.contains("--noise-frequency: 0.012;"));
    assert!(map.contains(r#"baseFrequency="0.012""#), "{map}");
    assert!(map.contains(r#"scale="110""#), "{map}");
    assert!(!readme.contains("0.008"), "{readme}");
}
