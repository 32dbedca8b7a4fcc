#![forbid(unsafe_code)]

//! End-to-end drag sessions against fixed and changing geometry.
//!
//! Run:
//!   cargo test -p liquid-glass-core --test drag_scenarios

use std::cell::Cell;

use liquid_glass_core::{
    DragConfig, DragController, DragGeometry, DragIgnoredReason, DragInput, DragLogOutcome,
    DragPoint, DragSize, DragState, InputSource, PressTarget, StaticGeometry,
};
use pretty_assertions::assert_eq;

fn stage() -> StaticGeometry {
    StaticGeometry::new(DragSize::new(100.0, 100.0), DragSize::new(400.0, 300.0))
}

fn mouse(x: f64, y: f64) -> DragInput {
    DragInput::Mouse(DragPoint::new(x, y))
}

fn touch(x: f64, y: f64) -> DragInput {
    DragInput::Touch(Some(DragPoint::new(x, y)))
}

/// Geometry whose element width can change between moves, like a text edit would.
struct ResizableElement {
    width: Cell<f64>,
}

impl DragGeometry for ResizableElement {
    fn element_size(&self) -> DragSize {
        DragSize::new(self.width.get(), 100.0)
    }

    fn container_size(&self) -> DragSize {
        DragSize::new(400.0, 300.0)
    }
}

#[test]
fn drag_right_within_bounds() {
    let mut drag = DragController::new(DragConfig::default());
    drag.press(mouse(200.0, 150.0), PressTarget::Element);
    let dispatch = drag.pointer_move(mouse(260.0, 150.0), &stage());

    assert_eq!(drag.translation(), DragPoint::new(60.0, 0.0));
    assert_eq!(
        dispatch.transform.expect("move emits transform").css_value(),
        "translate(calc(-50% + 60px), calc(-50% + 0px))"
    );
}

#[test]
fn drag_past_right_edge_saturates_at_max() {
    let mut drag = DragController::new(DragConfig::default());
    drag.press(mouse(200.0, 150.0), PressTarget::Element);
    drag.pointer_move(mouse(500.0, 150.0), &stage());
    assert_eq!(drag.translation(), DragPoint::new(150.0, 0.0));

    // Coming back does not carry any overshoot.
    drag.pointer_move(mouse(340.0, 150.0), &stage());
    assert_eq!(drag.translation(), DragPoint::new(140.0, 0.0));
}

#[test]
fn press_outside_then_move_changes_nothing() {
    let mut drag = DragController::new(DragConfig::default());
    let press = drag.press(mouse(20.0, 20.0), PressTarget::Outside);
    assert!(!drag.is_dragging());
    assert_eq!(
        press.log.outcome,
        DragLogOutcome::Ignored(DragIgnoredReason::PressOutsideElement)
    );

    for x in [30.0, 80.0, 400.0] {
        let dispatch = drag.pointer_move(mouse(x, 20.0), &stage());
        assert_eq!(dispatch.transform, None);
        assert!(!dispatch.prevent_default);
    }
    assert_eq!(drag.translation(), DragPoint::ORIGIN);
}

#[test]
fn release_and_repress_at_same_point_does_not_jump() {
    let mut drag = DragController::new(DragConfig::default());
    drag.press(mouse(200.0, 150.0), PressTarget::Element);
    drag.pointer_move(mouse(250.0, 120.0), &stage());
    let anchor = drag.anchor_offset();
    let before = drag.translation();
    drag.release(InputSource::Mouse);

    drag.press(mouse(250.0, 120.0), PressTarget::Element);
    assert_eq!(drag.anchor_offset(), anchor);
    drag.pointer_move(mouse(250.0, 120.0), &stage());
    assert_eq!(drag.translation(), before);
}

#[test]
fn repress_after_clamped_session_anchors_to_clamped_position() {
    let mut drag = DragController::new(DragConfig::default());
    drag.press(mouse(200.0, 150.0), PressTarget::Element);
    drag.pointer_move(mouse(600.0, 150.0), &stage());
    drag.release(InputSource::Mouse);
    assert_eq!(drag.translation(), DragPoint::new(150.0, 0.0));

    drag.press(mouse(600.0, 150.0), PressTarget::Element);
    drag.pointer_move(mouse(590.0, 150.0), &stage());
    assert_eq!(drag.translation(), DragPoint::new(140.0, 0.0));
}

#[test]
fn mouse_and_touch_commit_identical_translations() {
    let path = [
        (200.0, 150.0),
        (230.0, 160.0),
        (420.0, 90.0),
        (-50.0, 500.0),
        (210.0, 140.0),
    ];
    let mut by_mouse = DragController::new(DragConfig::default());
    let mut by_touch = DragController::new(DragConfig::default());
    by_mouse.press(mouse(path[0].0, path[0].1), PressTarget::Element);
    by_touch.press(touch(path[0].0, path[0].1), PressTarget::Element);

    for &(x, y) in &path[1..] {
        let m = by_mouse.pointer_move(mouse(x, y), &stage());
        let t = by_touch.pointer_move(touch(x, y), &stage());
        assert_eq!(m.transform, t.transform);
        assert_eq!(by_mouse.translation(), by_touch.translation());
    }
    by_mouse.release(InputSource::Mouse);
    by_touch.release(InputSource::Touch);
    assert_eq!(by_mouse.state(), by_touch.state());
}

#[test]
fn geometry_is_requeried_on_every_move() {
    let geometry = ResizableElement {
        width: Cell::new(100.0),
    };
    let mut drag = DragController::new(DragConfig::default());
    drag.press(mouse(200.0, 150.0), PressTarget::Element);
    drag.pointer_move(mouse(340.0, 150.0), &geometry);
    assert_eq!(drag.translation().x, 140.0);

    // Element grows to 200px wide: max_x shrinks from 150 to 100.
    geometry.width.set(200.0);
    let dispatch = drag.pointer_move(mouse(340.0, 150.0), &geometry);
    assert_eq!(drag.translation().x, 100.0);
    assert_eq!(dispatch.log.outcome, DragLogOutcome::Moved { clamped: true });
}

#[test]
fn oversized_element_pins_to_min_bound() {
    let geometry = StaticGeometry::new(DragSize::new(600.0, 100.0), DragSize::new(400.0, 300.0));
    let mut drag = DragController::new(DragConfig::default());
    drag.press(mouse(200.0, 150.0), PressTarget::Element);
    for x in [0.0, 200.0, 900.0] {
        drag.pointer_move(mouse(x, 150.0), &geometry);
        assert_eq!(drag.translation().x, 100.0);
    }
}

#[test]
fn lost_release_is_recovered_by_blur() {
    let mut drag = DragController::new(DragConfig::default());
    drag.press(touch(200.0, 150.0), PressTarget::Element);
    drag.pointer_move(touch(220.0, 150.0), &stage());
    drag.cancel(liquid_glass_core::DragCancelReason::Blur);
    assert_eq!(drag.state(), DragState::Idle);

    let stray = drag.pointer_move(touch(300.0, 150.0), &stage());
    assert_eq!(stray.transform, None);
    assert_eq!(drag.translation(), DragPoint::new(20.0, 0.0));
}
