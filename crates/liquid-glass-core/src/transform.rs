//! CSS transform output for the centered draggable element.

use core::fmt;

use crate::geometry::DragPoint;

/// Translation composed with the `-50%,-50%` centering anchor.
///
/// Displays as `translate(calc(-50% + Xpx), calc(-50% + Ypx))`, the value written
/// to the element's `transform` style property.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct CenteredTransform {
    pub offset: DragPoint,
}

impl CenteredTransform {
    /// CSS property the host writes [`CenteredTransform::css_value`] into.
    pub const PROPERTY: &'static str = "transform";

    #[must_use]
    pub const fn new(offset: DragPoint) -> Self {
        Self { offset }
    }

    #[must_use]
    pub fn css_value(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CenteredTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "translate(calc(-50% + {}px), calc(-50% + {}px))",
            css_number(self.offset.x),
            css_number(self.offset.y)
        )
    }
}

// Negative zero would print as `-0`.
fn css_number(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

#[cfg(test)]
mod tests {
    use super::CenteredTransform;
    use crate::geometry::DragPoint;

    #[test]
    fn formats_integral_offsets_without_fraction() {
        let transform = CenteredTransform::new(DragPoint::new(60.0, 0.0));
        assert_eq!(
            transform.css_value(),
            "translate(calc(-50% + 60px), calc(-50% + 0px))"
        );
    }

    #[test]
    fn formats_negative_and_fractional_offsets() {
        let transform = CenteredTransform::new(DragPoint::new(-150.0, 12.5));
        assert_eq!(
            transform.to_string(),
            "translate(calc(-50% + -150px), calc(-50% + 12.5px))"
        );
    }

    #[test]
    fn negative_zero_prints_as_zero() {
        let transform = CenteredTransform::new(DragPoint::new(-0.0, -0.0));
        assert_eq!(
            transform.css_value(),
            "translate(calc(-50% + 0px), calc(-50% + 0px))"
        );
    }
}
