//! Maps binding effects onto concrete DOM writes.
//!
//! Kept free of `web-sys` so the mapping is testable on native targets; the wasm
//! module resolves [`DomTarget`]s to elements and performs the writes.

use liquid_glass_core::{BindingEffect, EditorConfig};

/// Element a write lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomTarget {
    /// `document.documentElement`, home of the custom properties.
    Root,
    /// Element looked up by `id` (value labels).
    ById(&'static str),
    /// Bounding container of the draggable element.
    Container,
    /// Text inside the glass element.
    GlassText,
    /// Primitive inside the displacement filter, by tag name.
    FilterPrimitive(&'static str),
    /// Form control, by `id`.
    Control(&'static str),
}

impl DomTarget {
    /// CSS selector for `querySelector`, given the editor's configured hooks.
    #[must_use]
    pub fn selector(&self, config: &EditorConfig) -> String {
        match self {
            Self::Root => ":root".to_string(),
            Self::ById(id) | Self::Control(id) => format!("#{id}"),
            Self::Container => config.container_selector.clone(),
            Self::GlassText => config.text_selector.clone(),
            Self::FilterPrimitive(tag) => format!("{} {tag}", config.filter_selector()),
        }
    }
}

/// One DOM mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomWrite {
    Style {
        target: DomTarget,
        property: String,
        value: String,
    },
    Text {
        target: DomTarget,
        text: String,
    },
    Attribute {
        target: DomTarget,
        name: &'static str,
        value: String,
    },
    InputValue {
        target: DomTarget,
        value: String,
    },
    /// Run the reflow policy's refresh plan.
    RefreshFilter,
}

#[must_use]
pub fn plan_effect(effect: &BindingEffect) -> DomWrite {
    match effect {
        BindingEffect::SetCssVariable { name, value } => DomWrite::Style {
            target: DomTarget::Root,
            property: (*name).to_string(),
            value: value.clone(),
        },
        BindingEffect::SetLabel { element_id, text } => DomWrite::Text {
            target: DomTarget::ById(element_id),
            text: text.clone(),
        },
        BindingEffect::SetFilterAttribute {
            primitive,
            attribute,
            value,
        } => DomWrite::Attribute {
            target: DomTarget::FilterPrimitive(primitive.tag_name()),
            name: attribute,
            value: value.clone(),
        },
        BindingEffect::SetBackground { value } => DomWrite::Style {
            target: DomTarget::Container,
            property: "background".to_string(),
            value: value.clone(),
        },
        BindingEffect::SetText { text } => DomWrite::Text {
            target: DomTarget::GlassText,
            text: text.clone(),
        },
        BindingEffect::SetTextStyle { property, value } => DomWrite::Style {
            target: DomTarget::GlassText,
            property: property.css_name().to_string(),
            value: value.clone(),
        },
        BindingEffect::SetControlValue { control, value } => DomWrite::InputValue {
            target: DomTarget::Control(control.control_id()),
            value: value.clone(),
        },
        BindingEffect::RefreshFilter => DomWrite::RefreshFilter,
    }
}
