//! Safari filter-refresh workaround, expressed as schedulable steps.
//!
//! Safari sometimes fails to repaint SVG filter changes. Forcing a reflow (flip a
//! style property, read layout, flip it back) makes it pick them up. The host
//! decides whether the workaround applies; this module only plans the steps.

use serde::{Deserialize, Serialize};

/// True for Safari user agents: `safari` present with no `chrome` or `android`
/// before it (case-insensitive).
#[must_use]
pub fn is_safari(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    let Some(index) = ua.find("safari") else {
        return false;
    };
    let prefix = &ua[..index];
    !prefix.contains("chrome") && !prefix.contains("android")
}

/// When a reflow step runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReflowTiming {
    /// `setTimeout` after the given delay.
    AfterMillis(u32),
    /// Next `requestAnimationFrame` callback.
    NextFrame,
}

/// Element whose style is flipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReflowTarget {
    /// The draggable glass element.
    GlassElement,
    /// The `<filter>` element holding the turbulence/displacement primitives.
    DisplacementFilter,
}

/// Style property flipped to `none` and restored around a forced layout read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReflowProperty {
    Filter,
    Display,
}

impl ReflowProperty {
    #[must_use]
    pub const fn css_name(self) -> &'static str {
        match self {
            Self::Filter => "filter",
            Self::Display => "display",
        }
    }
}

/// One scheduled flip-read-restore cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReflowStep {
    pub timing: ReflowTiming,
    pub target: ReflowTarget,
    pub property: ReflowProperty,
}

const STARTUP_STEPS: [ReflowStep; 2] = [
    ReflowStep {
        timing: ReflowTiming::AfterMillis(50),
        target: ReflowTarget::GlassElement,
        property: ReflowProperty::Filter,
    },
    ReflowStep {
        timing: ReflowTiming::AfterMillis(100),
        target: ReflowTarget::DisplacementFilter,
        property: ReflowProperty::Display,
    },
];

const REFRESH_STEPS: [ReflowStep; 1] = [ReflowStep {
    timing: ReflowTiming::NextFrame,
    target: ReflowTarget::DisplacementFilter,
    property: ReflowProperty::Display,
}];

/// Whether the host should run the reflow workaround.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflowPolicy {
    #[default]
    Disabled,
    Enabled,
}

impl ReflowPolicy {
    #[must_use]
    pub fn detect(user_agent: &str) -> Self {
        if is_safari(user_agent) {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }

    #[must_use]
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }

    /// Steps to run once after the editor is mounted.
    #[must_use]
    pub fn startup_plan(self) -> &'static [ReflowStep] {
        if self.is_enabled() { &STARTUP_STEPS } else { &[] }
    }

    /// Steps to run after a filter attribute changed.
    #[must_use]
    pub fn refresh_plan(self) -> &'static [ReflowStep] {
        if self.is_enabled() { &REFRESH_STEPS } else { &[] }
    }
}

#[cfg(test)]
mod tests {
    use super::{ReflowPolicy, ReflowProperty, ReflowTarget, ReflowTiming, is_safari};

    const SAFARI_MAC: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_5) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15";
    const CHROME_MAC: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";
    const ANDROID: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Safari/537.36";
    const FIREFOX: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

    #[test]
    fn detects_desktop_safari_only() {
        assert!(is_safari(SAFARI_MAC));
        assert!(!is_safari(CHROME_MAC));
        assert!(!is_safari(ANDROID));
        assert!(!is_safari(FIREFOX));
        assert!(!is_safari(""));
    }

    #[test]
    fn detection_is_case_insensitive() {
        assert!(is_safari("SOMETHING SAFARI/1.0"));
        assert!(!is_safari("CHROME SAFARI"));
    }

    #[test]
    fn chrome_after_safari_still_counts_as_safari() {
        assert!(is_safari("Safari/605 chrome-extension"));
    }

    #[test]
    fn disabled_policy_plans_nothing() {
        let policy = ReflowPolicy::detect(CHROME_MAC);
        assert!(!policy.is_enabled());
        assert!(policy.startup_plan().is_empty());
        assert!(policy.refresh_plan().is_empty());
    }

    #[test]
    fn enabled_policy_plans_startup_and_refresh() {
        let policy = ReflowPolicy::detect(SAFARI_MAC);
        let startup = policy.startup_plan();
        assert_eq!(startup.len(), 2);
        assert_eq!(startup[0].timing, ReflowTiming::AfterMillis(50));
        assert_eq!(startup[0].target, ReflowTarget::GlassElement);
        assert_eq!(startup[0].property.css_name(), "filter");
        assert_eq!(startup[1].timing, ReflowTiming::AfterMillis(100));
        assert_eq!(startup[1].property, ReflowProperty::Display);

        let refresh = policy.refresh_plan();
        assert_eq!(refresh.len(), 1);
        assert_eq!(refresh[0].timing, ReflowTiming::NextFrame);
        assert_eq!(refresh[0].target, ReflowTarget::DisplacementFilter);
    }
}
