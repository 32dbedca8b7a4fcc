//! Editor configuration, read from an optional JSON blob supplied by the page.

use serde::{Deserialize, Serialize};

use crate::bindings::GlassParameters;
use crate::drag::DragConfig;
use crate::error::{GlassError, Result};
use crate::reflow::ReflowPolicy;

/// How the reflow workaround is selected.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReflowMode {
    /// Enable for Safari user agents.
    #[default]
    Auto,
    Always,
    Never,
}

impl ReflowMode {
    #[must_use]
    pub fn resolve(self, user_agent: &str) -> ReflowPolicy {
        match self {
            Self::Auto => ReflowPolicy::detect(user_agent),
            Self::Always => ReflowPolicy::Enabled,
            Self::Never => ReflowPolicy::Disabled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub archive_name: String,
    /// How long the export button shows its confirmation text.
    pub feedback_ms: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            archive_name: "liquid-glass-effect-package.zip".to_string(),
            feedback_ms: 2000,
        }
    }
}

/// DOM hooks and behavior switches for one editor instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// `id` of the draggable glass element.
    pub draggable_id: String,
    /// Selector of the bounding container.
    pub container_selector: String,
    /// Selector of the text inside the glass element.
    pub text_selector: String,
    /// `id` of the SVG displacement filter.
    pub filter_id: String,
    pub export_button_selector: String,
    pub drag: DragConfig,
    pub reflow: ReflowMode,
    pub export: ExportConfig,
    /// Values used before `--initial-*` properties are read.
    pub defaults: GlassParameters,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            draggable_id: "draggableContainer".to_string(),
            container_selector: ".main-container".to_string(),
            text_selector: ".glass-text".to_string(),
            filter_id: "glass-distortion".to_string(),
            export_button_selector: ".export-btn".to_string(),
            drag: DragConfig::default(),
            reflow: ReflowMode::default(),
            export: ExportConfig::default(),
            defaults: GlassParameters::default(),
        }
    }
}

impl EditorConfig {
    /// Parse and validate. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("draggable_id", &self.draggable_id),
            ("container_selector", &self.container_selector),
            ("text_selector", &self.text_selector),
            ("filter_id", &self.filter_id),
            ("export_button_selector", &self.export_button_selector),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(GlassError::invalid_config(format!("{field} must not be empty")));
        }
        if !self.export.archive_name.ends_with(".zip") {
            return Err(GlassError::invalid_config(format!(
                "archive name must end in .zip: {}",
                self.export.archive_name
            )));
        }
        Ok(())
    }

    /// Selector for the displacement filter element.
    #[must_use]
    pub fn filter_selector(&self) -> String {
        format!("#{}", self.filter_id)
    }
}
