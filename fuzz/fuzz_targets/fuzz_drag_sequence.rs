#![no_main]

use arbitrary::Arbitrary;
use liquid_glass_core::{
    DragBounds, DragCancelReason, DragConfig, DragController, DragInput, DragPoint, DragSize,
    InputSource, PressTarget, StaticGeometry,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Press { x: f64, y: f64, touch: bool, hit: bool },
    EmptyTouchPress,
    Move { x: f64, y: f64, touch: bool, element_w: u16, element_h: u16 },
    Release { touch: bool },
    Cancel(u8),
}

#[derive(Debug, Arbitrary)]
struct Script {
    cancel_on_interrupt: bool,
    container_w: u16,
    container_h: u16,
    ops: Vec<Op>,
}

fn input(x: f64, y: f64, touch: bool) -> DragInput {
    let point = DragPoint::new(x, y);
    if touch {
        DragInput::touch_list(&[point])
    } else {
        DragInput::Mouse(point)
    }
}

fuzz_target!(|script: Script| {
    if script.ops.len() > 512 {
        return;
    }
    let container = DragSize::new(f64::from(script.container_w), f64::from(script.container_h));
    let mut drag = DragController::new(DragConfig {
        cancel_on_interrupt: script.cancel_on_interrupt,
    });

    for op in script.ops {
        let before = drag.translation();
        let dispatch = match op {
            Op::Press { x, y, touch, hit } => drag.press(input(x, y, touch), PressTarget::from_hit(hit)),
            Op::EmptyTouchPress => drag.press(DragInput::touch_list(&[]), PressTarget::Element),
            Op::Move { x, y, touch, element_w, element_h } => {
                let element = DragSize::new(f64::from(element_w), f64::from(element_h));
                let geometry = StaticGeometry::new(element, container);
                let dispatch = drag.pointer_move(input(x, y, touch), &geometry);
                if dispatch.transform.is_some() {
                    let bounds = DragBounds::centered(element, container);
                    assert!(bounds.contains(drag.translation()), "{:?} outside {bounds:?}", drag.translation());
                }
                dispatch
            }
            Op::Release { touch } => drag.release(if touch { InputSource::Touch } else { InputSource::Mouse }),
            Op::Cancel(reason) => drag.cancel(match reason % 3 {
                0 => DragCancelReason::Blur,
                1 => DragCancelReason::PointerCancel,
                _ => DragCancelReason::VisibilityHidden,
            }),
        };

        // Only accepted moves touch the element or suppress defaults.
        if dispatch.transform.is_none() {
            assert_eq!(drag.translation(), before);
        }
        assert_eq!(dispatch.prevent_default, dispatch.transform.is_some());
        assert!(drag.translation().is_finite());
    }
});
