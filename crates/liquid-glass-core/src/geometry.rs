//! Pointer coordinates, rendered sizes, and the symmetric clamp rectangle.
//!
//! The draggable element is anchored with a `-50%,-50%` centering transform, so
//! translations are measured from the container center and the valid range is
//! symmetric around zero.

use serde::{Deserialize, Serialize};

/// A 2-D point in CSS pixels (client coordinates or a translation).
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragPoint {
    pub x: f64,
    pub y: f64,
}

impl DragPoint {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl core::ops::Sub for DragPoint {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl core::ops::Add for DragPoint {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Rendered width/height of an element in CSS pixels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragSize {
    pub width: f64,
    pub height: f64,
}

impl DragSize {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Live geometry provider queried on every move.
///
/// Implementations must not cache across a drag session: parameter edits (text,
/// font size) can resize the element between two moves.
pub trait DragGeometry {
    /// Current rendered size of the draggable element.
    fn element_size(&self) -> DragSize;

    /// Current rendered size of the bounding container.
    fn container_size(&self) -> DragSize;
}

/// Fixed geometry, for hosts that measure up front and for tests.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct StaticGeometry {
    pub element: DragSize,
    pub container: DragSize,
}

impl StaticGeometry {
    #[must_use]
    pub const fn new(element: DragSize, container: DragSize) -> Self {
        Self { element, container }
    }
}

impl DragGeometry for StaticGeometry {
    fn element_size(&self) -> DragSize {
        self.element
    }

    fn container_size(&self) -> DragSize {
        self.container
    }
}

impl<G: DragGeometry + ?Sized> DragGeometry for &G {
    fn element_size(&self) -> DragSize {
        (**self).element_size()
    }

    fn container_size(&self) -> DragSize {
        (**self).container_size()
    }
}

/// Translation rectangle that keeps a centered element inside its container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl DragBounds {
    /// Bounds for an element of size `element` centered in `container`.
    #[must_use]
    pub fn centered(element: DragSize, container: DragSize) -> Self {
        Self {
            min_x: -container.width / 2.0 + element.width / 2.0,
            max_x: container.width / 2.0 - element.width / 2.0,
            min_y: -container.height / 2.0 + element.height / 2.0,
            max_y: container.height / 2.0 - element.height / 2.0,
        }
    }

    /// Bounds derived from a live geometry query.
    #[must_use]
    pub fn from_geometry(geometry: &impl DragGeometry) -> Self {
        Self::centered(geometry.element_size(), geometry.container_size())
    }

    /// True when the element is wider or taller than the container.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Clamp each axis independently.
    ///
    /// When an axis is inverted (`min > max`) the result is `min` for that axis.
    #[must_use]
    pub fn clamp(&self, point: DragPoint) -> DragPoint {
        DragPoint::new(
            clamp_favor_min(point.x, self.min_x, self.max_x),
            clamp_favor_min(point.y, self.min_y, self.max_y),
        )
    }

    /// Whether `point` already satisfies the bounds (inverted axes accept only `min`).
    #[must_use]
    pub fn contains(&self, point: DragPoint) -> bool {
        self.clamp(point) == point
    }
}

// `f64::clamp` panics on `min > max`; this resolves that case to `min`.
fn clamp_favor_min(value: f64, min: f64, max: f64) -> f64 {
    min.max(max.min(value))
}
