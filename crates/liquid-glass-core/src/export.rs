//! Export packager: renders the stylesheet, filter markup, Safari script, and
//! README for the current settings and bundles them into a zip archive.

use std::io::{Cursor, Write};

use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::bindings::{CssVariableSource, GlassParameters, SHADOW_ALPHA, hex_to_rgb};
use crate::error::Result;

const STYLESHEET: &str = include_str!("../templates/liquid-glass-effect.css");
const DISPLACEMENT_MAP: &str = include_str!("../templates/glass-displacement-map.html");
const SAFARI_SCRIPT: &str = include_str!("../templates/safari-compatibility.js");
const README: &str = include_str!("../templates/README.md");

/// Custom properties copied verbatim into the exported `:root` block.
pub const EXPORTED_VARIABLES: [&str; 10] = [
    "--shadow-offset",
    "--shadow-blur",
    "--shadow-spread",
    "--shadow-color",
    "--tint-color",
    "--tint-opacity",
    "--frost-blur",
    "--noise-frequency",
    "--distortion-strength",
    "--outer-shadow-blur",
];

/// One file inside the export archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub name: &'static str,
    pub contents: String,
}

/// Rendered export, ready to be zipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPackage {
    pub files: Vec<ExportFile>,
}

impl ExportPackage {
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&ExportFile> {
        self.files.iter().find(|file| file.name == name)
    }

    /// Deflate every file into an in-memory zip archive.
    pub fn to_zip(&self) -> Result<Vec<u8>> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for file in &self.files {
            writer.start_file(file.name, options)?;
            writer.write_all(file.contents.as_bytes())?;
        }
        let bytes = writer.finish()?.into_inner();
        tracing::debug!(files = self.files.len(), bytes = bytes.len(), "export archive written");
        Ok(bytes)
    }
}

/// Renders the export templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportPackager;

impl ExportPackager {
    pub const STYLESHEET_NAME: &'static str = "liquid-glass-effect.css";
    pub const DISPLACEMENT_MAP_NAME: &'static str = "glass-displacement-map.html";
    pub const SAFARI_SCRIPT_NAME: &'static str = "safari-compatibility.js";
    pub const README_NAME: &'static str = "README.md";

    /// Render all files from the current parameters and computed CSS variables.
    ///
    /// A variable the document does not define falls back to the value implied by
    /// `params`.
    #[must_use]
    pub fn render(params: &GlassParameters, css: &impl CssVariableSource) -> ExportPackage {
        let variable = |name: &str| {
            css.css_variable(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| fallback_variable(params, name))
        };

        let font_size = params.font_size.to_string();
        let noise = params.noise_frequency.to_string();
        let distortion = params.distortion_strength.to_string();
        let text = params.display_text();
        let background = if params.background_url.is_empty() {
            "Default"
        } else {
            params.background_url.as_str()
        };

        let mut stylesheet_values: Vec<(String, String)> = EXPORTED_VARIABLES
            .iter()
            .map(|&name| (name.trim_start_matches("--").replace('-', "_"), variable(name)))
            .collect();
        stylesheet_values.push(("font_size".to_string(), font_size.clone()));
        stylesheet_values.push(("font_color".to_string(), params.font_color.clone()));

        let map_values = [
            ("noise_frequency", noise.clone()),
            ("distortion", distortion.clone()),
        ];
        let readme_values = [
            ("noise_frequency", noise),
            ("distortion", distortion),
            ("text", text.to_string()),
            ("font_size", font_size),
            ("font_color", params.font_color.clone()),
            ("background", background.to_string()),
        ];

        ExportPackage {
            files: vec![
                ExportFile {
                    name: Self::STYLESHEET_NAME,
                    contents: render_template(STYLESHEET, &stylesheet_values),
                },
                ExportFile {
                    name: Self::DISPLACEMENT_MAP_NAME,
                    contents: render_template(DISPLACEMENT_MAP, &map_values),
                },
                ExportFile {
                    name: Self::SAFARI_SCRIPT_NAME,
                    contents: SAFARI_SCRIPT.to_string(),
                },
                ExportFile {
                    name: Self::README_NAME,
                    contents: render_template(README, &readme_values),
                },
            ],
        }
    }
}

fn fallback_variable(params: &GlassParameters, name: &str) -> String {
    match name {
        "--shadow-offset" => "0px".to_string(),
        "--shadow-blur" => format!("{}px", params.shadow_blur),
        "--shadow-spread" => format!("{}px", params.shadow_spread),
        "--shadow-color" => format!("rgba({}, {SHADOW_ALPHA})", hex_to_rgb(&params.shadow_color)),
        "--tint-color" => hex_to_rgb(&params.tint_color),
        "--tint-opacity" => params.tint_opacity.to_string(),
        "--frost-blur" => format!("{}px", params.frost_blur),
        "--noise-frequency" => params.noise_frequency.to_string(),
        "--distortion-strength" => params.distortion_strength.to_string(),
        "--outer-shadow-blur" => format!("{}px", params.outer_shadow_blur),
        _ => String::new(),
    }
}

/// Replace `{{key}}` placeholders. Unknown keys are left in place.
fn render_template<K: AsRef<str>, V: AsRef<str>>(template: &str, values: &[(K, V)]) -> String {
    let mut out = String::with_capacity(template.len() + 256);
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = after[..end].trim();
        match values.iter().find(|(candidate, _)| candidate.as_ref() == key) {
            Some((_, value)) => out.push_str(value.as_ref()),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{ExportPackager, render_template};
    use crate::bindings::GlassParameters;

    fn no_css(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn template_substitution_handles_unknown_and_unterminated() {
        let rendered = render_template("a={{a}} b={{ b }} c={{c}} d={{d", &[("a", "1"), ("b", "2")]);
        assert_eq!(rendered, "a=1 b=2 c={{c}} d={{d");
    }

    #[test]
    fn package_contains_four_files() {
        let package = ExportPackager::render(&GlassParameters::default(), &no_css);
        let names: Vec<&str> = package.files.iter().map(|file| file.name).collect();
        assert_eq!(
            names,
            [
                "liquid-glass-effect.css",
                "glass-displacement-map.html",
                "safari-compatibility.js",
                "README.md"
            ]
        );
        for file in &package.files {
            assert!(!file.contents.contains("{{"), "{} has placeholders", file.name);
        }
    }

    #[test]
    fn stylesheet_copies_computed_variables() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("--shadow-blur", " 33px "),
            ("--tint-color", "1, 2, 3"),
            ("--shadow-offset", "0px"),
        ]);
        let css = |name: &str| vars.get(name).map(|value| (*value).to_string());
        let params = GlassParameters {
            font_size: 40.0,
            font_color: "#123456".to_string(),
            ..GlassParameters::default()
        };
        let package = ExportPackager::render(&params, &css);
        let stylesheet = &package
            .file(ExportPackager::STYLESHEET_NAME)
            .expect("stylesheet")
            .contents;
        assert!(stylesheet.contains("--shadow-blur: 33px;"));
        assert!(stylesheet.contains("--tint-color: 1, 2, 3;"));
        assert!(stylesheet.contains("--frost-blur: 2px;"));
        assert!(stylesheet.contains("font-size: 40px;"));
        assert!(stylesheet.contains("color: #123456;"));
    }

    #[test]
    fn displacement_map_uses_filter_settings() {
        let params = GlassParameters {
            noise_frequency: 0.02,
            distortion_strength: 150.0,
            ..GlassParameters::default()
        };
        let package = ExportPackager::render(&params, &no_css);
        let map = &package
            .file(ExportPackager::DISPLACEMENT_MAP_NAME)
            .expect("map")
            .contents;
        assert!(map.contains(r#"baseFrequency="0.02""#));
        assert!(map.contains(r#"scale="150""#));
    }

    #[test]
    fn readme_reports_placeholders_for_empty_settings() {
        let params = GlassParameters {
            text_content: String::new(),
            background_url: String::new(),
            ..GlassParameters::default()
        };
        let package = ExportPackager::render(&params, &no_css);
        let readme = &package.file("README.md").expect("readme").contents;
        assert!(readme.contains("Text Content: \"Your Text Here\""));
        assert!(readme.contains("Background: Default"));
        assert!(readme.contains(r#"<h2 class="glass-text">Your Text Here</h2>"#));
    }
}
