//! Form controls → CSS custom properties, text, and filter attributes.
//!
//! Every control maps one-to-one onto DOM writes; the only transformation is the
//! hex → `r, g, b` conversion for color pickers. [`ParameterBindings`] also keeps
//! the last accepted values so the export packager can read them back.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GlassError, Result};

/// Text shown when the text control is emptied.
pub const PLACEHOLDER_TEXT: &str = "Your Text Here";
/// Alpha applied to the inner shadow color.
pub const SHADOW_ALPHA: f64 = 0.7;
const FALLBACK_RGB: &str = "255, 255, 255";

/// Convert `#rrggbb` (or `rrggbb`, any case) into `r, g, b`.
///
/// Anything else, including the short `#rgb` form, yields white.
#[must_use]
pub fn hex_to_rgb(hex: &str) -> String {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return FALLBACK_RGB.to_string();
    }
    let channel = |range: core::ops::Range<usize>| u8::from_str_radix(&digits[range], 16);
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Ok(r), Ok(g), Ok(b)) => format!("{r}, {g}, {b}"),
        _ => FALLBACK_RGB.to_string(),
    }
}

/// Read access to computed CSS custom properties on the document root.
pub trait CssVariableSource {
    /// Raw property value, or `None` when the property is unset.
    fn css_variable(&self, name: &str) -> Option<String>;
}

impl<F> CssVariableSource for F
where
    F: Fn(&str) -> Option<String>,
{
    fn css_variable(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// Editor controls, keyed by their DOM `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterId {
    ShadowBlur,
    ShadowSpread,
    TintOpacity,
    FrostBlur,
    NoiseFreq,
    Distortion,
    OuterShadow,
    TintColor,
    ShadowColor,
    BackgroundUrl,
    TextContent,
    FontSize,
    FontColor,
}

impl ParameterId {
    pub const ALL: [Self; 13] = [
        Self::ShadowBlur,
        Self::ShadowSpread,
        Self::TintOpacity,
        Self::FrostBlur,
        Self::NoiseFreq,
        Self::Distortion,
        Self::OuterShadow,
        Self::TintColor,
        Self::ShadowColor,
        Self::BackgroundUrl,
        Self::TextContent,
        Self::FontSize,
        Self::FontColor,
    ];

    #[must_use]
    pub const fn control_id(self) -> &'static str {
        match self {
            Self::ShadowBlur => "shadowBlur",
            Self::ShadowSpread => "shadowSpread",
            Self::TintOpacity => "tintOpacity",
            Self::FrostBlur => "frostBlur",
            Self::NoiseFreq => "noiseFreq",
            Self::Distortion => "distortion",
            Self::OuterShadow => "outerShadow",
            Self::TintColor => "tintColor",
            Self::ShadowColor => "shadowColor",
            Self::BackgroundUrl => "backgroundUrl",
            Self::TextContent => "textContent",
            Self::FontSize => "fontSize",
            Self::FontColor => "fontColor",
        }
    }

    #[must_use]
    pub fn from_control_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|param| param.control_id() == id)
    }

    /// Element showing the current slider value, if the control has one.
    #[must_use]
    pub const fn label_id(self) -> Option<&'static str> {
        match self {
            Self::ShadowBlur => Some("shadowBlurValue"),
            Self::ShadowSpread => Some("shadowSpreadValue"),
            Self::TintOpacity => Some("tintOpacityValue"),
            Self::FrostBlur => Some("frostBlurValue"),
            Self::NoiseFreq => Some("noiseFreqValue"),
            Self::Distortion => Some("distortionValue"),
            Self::OuterShadow => Some("outerShadowValue"),
            Self::FontSize => Some("fontSizeValue"),
            Self::TintColor
            | Self::ShadowColor
            | Self::BackgroundUrl
            | Self::TextContent
            | Self::FontColor => None,
        }
    }

    /// Numeric sliders, with the unit appended to CSS and label values.
    const fn numeric_unit(self) -> Option<&'static str> {
        match self {
            Self::ShadowBlur
            | Self::ShadowSpread
            | Self::FrostBlur
            | Self::OuterShadow
            | Self::FontSize => Some("px"),
            Self::TintOpacity | Self::NoiseFreq | Self::Distortion => Some(""),
            Self::TintColor
            | Self::ShadowColor
            | Self::BackgroundUrl
            | Self::TextContent
            | Self::FontColor => None,
        }
    }
}

impl fmt::Display for ParameterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.control_id())
    }
}

/// SVG filter primitive inside the displacement filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterPrimitive {
    Turbulence,
    DisplacementMap,
}

impl FilterPrimitive {
    #[must_use]
    pub const fn tag_name(self) -> &'static str {
        match self {
            Self::Turbulence => "feTurbulence",
            Self::DisplacementMap => "feDisplacementMap",
        }
    }
}

/// Inline style property written on the glass text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextStyleProperty {
    FontSize,
    Color,
}

impl TextStyleProperty {
    #[must_use]
    pub const fn css_name(self) -> &'static str {
        match self {
            Self::FontSize => "font-size",
            Self::Color => "color",
        }
    }
}

/// One DOM write requested by a binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingEffect {
    /// `document.documentElement.style.setProperty(name, value)`.
    SetCssVariable { name: &'static str, value: String },
    /// `textContent` of a value label.
    SetLabel { element_id: &'static str, text: String },
    /// Attribute on a primitive of the displacement filter.
    SetFilterAttribute {
        primitive: FilterPrimitive,
        attribute: &'static str,
        value: String,
    },
    /// `background` shorthand of the bounding container.
    SetBackground { value: String },
    /// `textContent` of the glass text.
    SetText { text: String },
    /// Inline style on the glass text.
    SetTextStyle {
        property: TextStyleProperty,
        value: String,
    },
    /// Write a control's `value` (initialization only).
    SetControlValue { control: ParameterId, value: String },
    /// Run the reflow policy's refresh plan.
    RefreshFilter,
}

/// Current appearance parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlassParameters {
    pub shadow_blur: f64,
    pub shadow_spread: f64,
    pub tint_opacity: f64,
    pub frost_blur: f64,
    pub noise_frequency: f64,
    pub distortion_strength: f64,
    pub outer_shadow_blur: f64,
    /// `#rrggbb` as entered in the picker.
    pub tint_color: String,
    /// `#rrggbb` as entered in the picker.
    pub shadow_color: String,
    pub background_url: String,
    pub text_content: String,
    pub font_size: f64,
    pub font_color: String,
}

impl Default for GlassParameters {
    fn default() -> Self {
        Self {
            shadow_blur: 20.0,
            shadow_spread: -5.0,
            tint_opacity: 0.04,
            frost_blur: 2.0,
            noise_frequency: 0.008,
            distortion_strength: 77.0,
            outer_shadow_blur: 24.0,
            tint_color: "#ffffff".to_string(),
            shadow_color: "#ffffff".to_string(),
            background_url: String::new(),
            text_content: "Liquid Glass".to_string(),
            font_size: 48.0,
            font_color: "#ffffff".to_string(),
        }
    }
}

impl GlassParameters {
    /// Text the glass element displays.
    #[must_use]
    pub fn display_text(&self) -> &str {
        if self.text_content.is_empty() {
            PLACEHOLDER_TEXT
        } else {
            &self.text_content
        }
    }

    /// Value a control currently holds, formatted as the DOM would report it.
    #[must_use]
    pub fn control_value(&self, id: ParameterId) -> String {
        match id {
            ParameterId::ShadowBlur => self.shadow_blur.to_string(),
            ParameterId::ShadowSpread => self.shadow_spread.to_string(),
            ParameterId::TintOpacity => self.tint_opacity.to_string(),
            ParameterId::FrostBlur => self.frost_blur.to_string(),
            ParameterId::NoiseFreq => self.noise_frequency.to_string(),
            ParameterId::Distortion => self.distortion_strength.to_string(),
            ParameterId::OuterShadow => self.outer_shadow_blur.to_string(),
            ParameterId::TintColor => self.tint_color.clone(),
            ParameterId::ShadowColor => self.shadow_color.clone(),
            ParameterId::BackgroundUrl => self.background_url.clone(),
            ParameterId::TextContent => self.text_content.clone(),
            ParameterId::FontSize => self.font_size.to_string(),
            ParameterId::FontColor => self.font_color.clone(),
        }
    }

    fn numeric(&self, id: ParameterId) -> Option<f64> {
        match id {
            ParameterId::ShadowBlur => Some(self.shadow_blur),
            ParameterId::ShadowSpread => Some(self.shadow_spread),
            ParameterId::TintOpacity => Some(self.tint_opacity),
            ParameterId::FrostBlur => Some(self.frost_blur),
            ParameterId::NoiseFreq => Some(self.noise_frequency),
            ParameterId::Distortion => Some(self.distortion_strength),
            ParameterId::OuterShadow => Some(self.outer_shadow_blur),
            ParameterId::FontSize => Some(self.font_size),
            ParameterId::TintColor
            | ParameterId::ShadowColor
            | ParameterId::BackgroundUrl
            | ParameterId::TextContent
            | ParameterId::FontColor => None,
        }
    }

    fn numeric_mut(&mut self, id: ParameterId) -> Option<&mut f64> {
        match id {
            ParameterId::ShadowBlur => Some(&mut self.shadow_blur),
            ParameterId::ShadowSpread => Some(&mut self.shadow_spread),
            ParameterId::TintOpacity => Some(&mut self.tint_opacity),
            ParameterId::FrostBlur => Some(&mut self.frost_blur),
            ParameterId::NoiseFreq => Some(&mut self.noise_frequency),
            ParameterId::Distortion => Some(&mut self.distortion_strength),
            ParameterId::OuterShadow => Some(&mut self.outer_shadow_blur),
            ParameterId::FontSize => Some(&mut self.font_size),
            ParameterId::TintColor
            | ParameterId::ShadowColor
            | ParameterId::BackgroundUrl
            | ParameterId::TextContent
            | ParameterId::FontColor => None,
        }
    }
}

fn background_shorthand(url: &str) -> String {
    format!("url('{url}') center/cover no-repeat")
}

fn unquote(raw: &str) -> String {
    raw.replace('"', "").trim().to_string()
}

/// Leading-integer parse of values like `48px`.
fn leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let end = trimmed
        .char_indices()
        .find(|&(index, ch)| !(ch.is_ascii_digit() || (index == 0 && matches!(ch, '-' | '+'))))
        .map_or(trimmed.len(), |(index, _)| index);
    trimmed[..end].parse().ok()
}

/// Stateful binding table from controls to DOM effects.
#[derive(Debug, Clone, Default)]
pub struct ParameterBindings {
    params: GlassParameters,
}

impl ParameterBindings {
    #[must_use]
    pub fn new(params: GlassParameters) -> Self {
        Self { params }
    }

    #[must_use]
    pub const fn params(&self) -> &GlassParameters {
        &self.params
    }

    /// Handle an `input` event by control id.
    pub fn apply_control(&mut self, control: &str, raw: &str) -> Result<Vec<BindingEffect>> {
        let id = ParameterId::from_control_id(control).ok_or_else(|| GlassError::UnknownControl {
            control: control.to_string(),
        })?;
        self.apply(id, raw)
    }

    /// Handle an `input` event: store the value and return the DOM writes.
    ///
    /// Unparsable numeric input is rejected and leaves state untouched.
    pub fn apply(&mut self, id: ParameterId, raw: &str) -> Result<Vec<BindingEffect>> {
        self.store(id, raw)?;
        let effects = match id {
            ParameterId::ShadowBlur
            | ParameterId::ShadowSpread
            | ParameterId::TintOpacity
            | ParameterId::FrostBlur
            | ParameterId::NoiseFreq
            | ParameterId::Distortion
            | ParameterId::OuterShadow
            | ParameterId::FontSize => {
                let value = self.params.numeric(id).unwrap_or_default();
                numeric_effects(id, value, id.numeric_unit().unwrap_or_default())
            }
            ParameterId::TintColor => vec![BindingEffect::SetCssVariable {
                name: "--tint-color",
                value: hex_to_rgb(raw),
            }],
            ParameterId::ShadowColor => vec![BindingEffect::SetCssVariable {
                name: "--shadow-color",
                value: format!("rgba({}, {SHADOW_ALPHA})", hex_to_rgb(raw)),
            }],
            ParameterId::BackgroundUrl => {
                if raw.trim().is_empty() {
                    Vec::new()
                } else {
                    vec![BindingEffect::SetBackground {
                        value: background_shorthand(raw),
                    }]
                }
            }
            ParameterId::TextContent => vec![BindingEffect::SetText {
                text: self.params.display_text().to_string(),
            }],
            ParameterId::FontColor => vec![BindingEffect::SetTextStyle {
                property: TextStyleProperty::Color,
                value: raw.to_string(),
            }],
        };
        tracing::trace!(control = id.control_id(), effects = effects.len(), "applied control");
        Ok(effects)
    }

    /// Store a control's current value without producing DOM writes.
    ///
    /// Seeds state from the values the page markup ships with, so exports match
    /// what is on screen before any control is touched.
    pub fn sync_value(&mut self, id: ParameterId, raw: &str) -> Result<()> {
        self.store(id, raw)
    }

    fn store(&mut self, id: ParameterId, raw: &str) -> Result<()> {
        if let Some(slot) = self.params.numeric_mut(id) {
            *slot = parse_numeric(id, raw)?;
            return Ok(());
        }
        let slot = match id {
            ParameterId::TintColor => &mut self.params.tint_color,
            ParameterId::ShadowColor => &mut self.params.shadow_color,
            ParameterId::BackgroundUrl => &mut self.params.background_url,
            ParameterId::TextContent => &mut self.params.text_content,
            ParameterId::FontColor => &mut self.params.font_color,
            ParameterId::ShadowBlur
            | ParameterId::ShadowSpread
            | ParameterId::TintOpacity
            | ParameterId::FrostBlur
            | ParameterId::NoiseFreq
            | ParameterId::Distortion
            | ParameterId::OuterShadow
            | ParameterId::FontSize => return Ok(()),
        };
        *slot = raw.to_string();
        Ok(())
    }

    /// Seed controls from the `--initial-*` custom properties.
    ///
    /// Missing properties keep the current value.
    pub fn initialize_from_css(&mut self, css: &impl CssVariableSource) -> Vec<BindingEffect> {
        if let Some(text) = css.css_variable("--initial-text-content") {
            self.params.text_content = unquote(&text);
        }
        if let Some(size) = css
            .css_variable("--initial-font-size")
            .and_then(|raw| leading_int(&raw))
        {
            self.params.font_size = size as f64;
        }
        if let Some(color) = css.css_variable("--initial-font-color") {
            self.params.font_color = color.trim().to_string();
        }
        if let Some(url) = css.css_variable("--initial-background-url") {
            self.params.background_url = unquote(&url);
        }
        if let Some(color) = css.css_variable("--initial-tint-color") {
            self.params.tint_color = color.trim().to_string();
        }
        if let Some(color) = css.css_variable("--initial-shadow-color") {
            self.params.shadow_color = color.trim().to_string();
        }

        let p = &self.params;
        let mut effects: Vec<BindingEffect> = [
            ParameterId::TextContent,
            ParameterId::FontSize,
            ParameterId::FontColor,
            ParameterId::BackgroundUrl,
            ParameterId::TintColor,
            ParameterId::ShadowColor,
        ]
        .into_iter()
        .map(|control| BindingEffect::SetControlValue {
            control,
            value: p.control_value(control),
        })
        .collect();
        effects.push(BindingEffect::SetLabel {
            element_id: "fontSizeValue",
            text: format!("{}px", p.font_size),
        });
        effects.push(BindingEffect::SetText {
            text: p.text_content.clone(),
        });
        effects.push(BindingEffect::SetBackground {
            value: background_shorthand(&p.background_url),
        });
        tracing::debug!(text = %p.text_content, font_size = p.font_size, "initialized controls");
        effects
    }
}

fn parse_numeric(id: ParameterId, raw: &str) -> Result<f64> {
    raw.trim()
        .parse()
        .ok()
        .filter(|value: &f64| value.is_finite())
        .ok_or_else(|| {
            tracing::warn!(control = id.control_id(), raw, "rejected numeric input");
            GlassError::InvalidParameterValue {
                control: id.control_id(),
                value: raw.to_string(),
            }
        })
}

fn numeric_effects(id: ParameterId, value: f64, unit: &str) -> Vec<BindingEffect> {
    let with_unit = format!("{value}{unit}");
    let mut effects = Vec::with_capacity(4);
    match id {
        ParameterId::FontSize => effects.push(BindingEffect::SetTextStyle {
            property: TextStyleProperty::FontSize,
            value: with_unit.clone(),
        }),
        _ => effects.push(BindingEffect::SetCssVariable {
            name: css_variable_name(id),
            value: with_unit.clone(),
        }),
    }
    if let Some(element_id) = id.label_id() {
        effects.push(BindingEffect::SetLabel {
            element_id,
            text: with_unit,
        });
    }
    let filter = match id {
        ParameterId::NoiseFreq => Some((FilterPrimitive::Turbulence, "baseFrequency")),
        ParameterId::Distortion => Some((FilterPrimitive::DisplacementMap, "scale")),
        _ => None,
    };
    if let Some((primitive, attribute)) = filter {
        effects.push(BindingEffect::SetFilterAttribute {
            primitive,
            attribute,
            value: value.to_string(),
        });
        effects.push(BindingEffect::RefreshFilter);
    }
    effects
}

const fn css_variable_name(id: ParameterId) -> &'static str {
    match id {
        ParameterId::ShadowBlur => "--shadow-blur",
        ParameterId::ShadowSpread => "--shadow-spread",
        ParameterId::TintOpacity => "--tint-opacity",
        ParameterId::FrostBlur => "--frost-blur",
        ParameterId::NoiseFreq => "--noise-frequency",
        ParameterId::Distortion => "--distortion-strength",
        ParameterId::OuterShadow => "--outer-shadow-blur",
        ParameterId::TintColor => "--tint-color",
        ParameterId::ShadowColor => "--shadow-color",
        ParameterId::BackgroundUrl
        | ParameterId::TextContent
        | ParameterId::FontSize
        | ParameterId::FontColor => "",
    }
}
