#![forbid(unsafe_code)]

//! Deterministic drag controller for the centered glass preview element.
//!
//! The host forwards DOM press/move/release signals; the controller answers each
//! with a [`DragDispatch`] describing the transform to apply, whether the event's
//! default action must be suppressed, and a structured log record. It enforces:
//! - a drag starts only from a press on the draggable element (or a descendant),
//! - every committed translation lies inside the container, re-measured per move,
//! - mouse and touch input follow the same code path.

use serde::{Deserialize, Serialize};

use crate::geometry::{DragBounds, DragGeometry, DragPoint};
use crate::transform::CenteredTransform;

/// Physical input family that produced a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSource {
    Mouse,
    Touch,
}

/// Pointer coordinates carried by one DOM event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragInput {
    /// `clientX`/`clientY` of a mouse event.
    Mouse(DragPoint),
    /// First entry of the touch list, or `None` when the list was empty.
    Touch(Option<DragPoint>),
}

impl DragInput {
    /// Build a touch input from a full touch list; only the first point counts.
    #[must_use]
    pub fn touch_list(points: &[DragPoint]) -> Self {
        Self::Touch(points.first().copied())
    }

    #[must_use]
    pub const fn source(self) -> InputSource {
        match self {
            Self::Mouse(_) => InputSource::Mouse,
            Self::Touch(_) => InputSource::Touch,
        }
    }

    #[must_use]
    pub const fn position(self) -> Option<DragPoint> {
        match self {
            Self::Mouse(point) => Some(point),
            Self::Touch(point) => point,
        }
    }
}

/// Where a press landed relative to the draggable element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressTarget {
    /// The element itself or one of its descendants.
    Element,
    Outside,
}

impl PressTarget {
    #[must_use]
    pub const fn from_hit(hit: bool) -> Self {
        if hit { Self::Element } else { Self::Outside }
    }
}

/// Controller configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// If true, blur/touch-cancel/visibility-hidden end an active drag.
    pub cancel_on_interrupt: bool,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            cancel_on_interrupt: true,
        }
    }
}

/// Drag session state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        source: InputSource,
    },
}

impl DragState {
    #[must_use]
    pub const fn is_dragging(self) -> bool {
        matches!(self, Self::Dragging { .. })
    }
}

/// Why an active drag was interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragCancelReason {
    Blur,
    PointerCancel,
    VisibilityHidden,
}

/// Lifecycle phase recorded for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragPhase {
    Press,
    Move,
    Release,
    Cancel,
}

/// Deterministic reason why an incoming signal was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragIgnoredReason {
    PressOutsideElement,
    NotDragging,
    MissingTouchPoint,
    NonFinitePosition,
    CancelDisabled,
}

/// Outcome category for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragLogOutcome {
    Started,
    Moved { clamped: bool },
    Ended,
    Cancelled(DragCancelReason),
    Ignored(DragIgnoredReason),
}

/// Structured log record for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragLogEntry {
    pub phase: DragPhase,
    pub sequence: Option<u64>,
    pub source: Option<InputSource>,
    pub position: Option<DragPoint>,
    pub bounds: Option<DragBounds>,
    pub outcome: DragLogOutcome,
}

/// State change produced by an accepted signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragTransition {
    pub sequence: u64,
    pub from: DragState,
    pub to: DragState,
}

/// Result of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragDispatch {
    pub transition: Option<DragTransition>,
    /// Transform the host writes to the element; only set by accepted moves.
    pub transform: Option<CenteredTransform>,
    /// Whether the host must call `preventDefault()` on the originating event.
    pub prevent_default: bool,
    pub log: DragLogEntry,
}

impl DragDispatch {
    fn ignored(
        phase: DragPhase,
        reason: DragIgnoredReason,
        source: Option<InputSource>,
        position: Option<DragPoint>,
    ) -> Self {
        Self {
            transition: None,
            transform: None,
            prevent_default: false,
            log: DragLogEntry {
                phase,
                sequence: None,
                source,
                position,
                bounds: None,
                outcome: DragLogOutcome::Ignored(reason),
            },
        }
    }

    /// True when the signal changed controller state.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        self.transition.is_some()
    }
}

/// Owned drag controller for one draggable element.
///
/// Press positions are recorded as an anchor offset relative to the current
/// translation, so the element keeps its grab point instead of jumping to center
/// on the cursor.
#[derive(Debug, Clone)]
pub struct DragController {
    config: DragConfig,
    state: DragState,
    anchor_offset: DragPoint,
    translation: DragPoint,
    next_sequence: u64,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(DragConfig::default())
    }
}

impl DragController {
    #[must_use]
    pub fn new(config: DragConfig) -> Self {
        Self {
            config,
            state: DragState::Idle,
            anchor_offset: DragPoint::ORIGIN,
            translation: DragPoint::ORIGIN,
            next_sequence: 1,
        }
    }

    #[must_use]
    pub const fn config(&self) -> DragConfig {
        self.config
    }

    #[must_use]
    pub const fn state(&self) -> DragState {
        self.state
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    /// Last committed, clamped translation.
    #[must_use]
    pub const fn translation(&self) -> DragPoint {
        self.translation
    }

    /// Press position minus the translation at press time.
    #[must_use]
    pub const fn anchor_offset(&self) -> DragPoint {
        self.anchor_offset
    }

    /// Transform reflecting the committed translation.
    #[must_use]
    pub const fn transform(&self) -> CenteredTransform {
        CenteredTransform::new(self.translation)
    }

    /// Handle mouse-down / touch-start.
    ///
    /// The anchor offset is refreshed for every press; only presses on the
    /// element start a drag.
    pub fn press(&mut self, input: DragInput, target: PressTarget) -> DragDispatch {
        let source = input.source();
        let Some(position) = input.position() else {
            tracing::warn!(?source, "press without touch point ignored");
            return DragDispatch::ignored(
                DragPhase::Press,
                DragIgnoredReason::MissingTouchPoint,
                Some(source),
                None,
            );
        };
        if !position.is_finite() {
            return DragDispatch::ignored(
                DragPhase::Press,
                DragIgnoredReason::NonFinitePosition,
                Some(source),
                Some(position),
            );
        }

        self.anchor_offset = position - self.translation;
        if target == PressTarget::Outside {
            tracing::trace!(?source, x = position.x, y = position.y, "press outside element");
            return DragDispatch::ignored(
                DragPhase::Press,
                DragIgnoredReason::PressOutsideElement,
                Some(source),
                Some(position),
            );
        }

        let from = self.state;
        self.state = DragState::Dragging { source };
        let sequence = self.next_sequence();
        tracing::debug!(
            sequence,
            ?source,
            anchor_x = self.anchor_offset.x,
            anchor_y = self.anchor_offset.y,
            "drag started"
        );
        DragDispatch {
            transition: Some(DragTransition {
                sequence,
                from,
                to: self.state,
            }),
            transform: None,
            prevent_default: false,
            log: DragLogEntry {
                phase: DragPhase::Press,
                sequence: Some(sequence),
                source: Some(source),
                position: Some(position),
                bounds: None,
                outcome: DragLogOutcome::Started,
            },
        }
    }

    /// Handle mouse-move / touch-move from the document.
    ///
    /// Geometry is queried on every call; nothing is cached between moves.
    pub fn pointer_move(&mut self, input: DragInput, geometry: &impl DragGeometry) -> DragDispatch {
        let source = input.source();
        if !self.state.is_dragging() {
            return DragDispatch::ignored(
                DragPhase::Move,
                DragIgnoredReason::NotDragging,
                Some(source),
                input.position(),
            );
        }
        let Some(position) = input.position() else {
            tracing::warn!(?source, "move without touch point ignored");
            return DragDispatch::ignored(
                DragPhase::Move,
                DragIgnoredReason::MissingTouchPoint,
                Some(source),
                None,
            );
        };
        if !position.is_finite() {
            return DragDispatch::ignored(
                DragPhase::Move,
                DragIgnoredReason::NonFinitePosition,
                Some(source),
                Some(position),
            );
        }

        let proposed = position - self.anchor_offset;
        let bounds = DragBounds::from_geometry(geometry);
        let committed = bounds.clamp(proposed);
        let clamped = committed != proposed;
        self.translation = committed;

        let sequence = self.next_sequence();
        tracing::trace!(
            sequence,
            x = committed.x,
            y = committed.y,
            clamped,
            "drag moved"
        );
        DragDispatch {
            transition: Some(DragTransition {
                sequence,
                from: self.state,
                to: self.state,
            }),
            transform: Some(CenteredTransform::new(committed)),
            prevent_default: true,
            log: DragLogEntry {
                phase: DragPhase::Move,
                sequence: Some(sequence),
                source: Some(source),
                position: Some(position),
                bounds: Some(bounds),
                outcome: DragLogOutcome::Moved { clamped },
            },
        }
    }

    /// Handle mouse-up / touch-end from the document.
    ///
    /// A release while idle is a no-op. No transform is emitted; the committed
    /// translation becomes the basis for the next press.
    pub fn release(&mut self, source: InputSource) -> DragDispatch {
        if !self.state.is_dragging() {
            return DragDispatch::ignored(
                DragPhase::Release,
                DragIgnoredReason::NotDragging,
                Some(source),
                None,
            );
        }
        let from = self.state;
        self.state = DragState::Idle;
        let sequence = self.next_sequence();
        tracing::debug!(
            sequence,
            ?source,
            x = self.translation.x,
            y = self.translation.y,
            "drag ended"
        );
        DragDispatch {
            transition: Some(DragTransition {
                sequence,
                from,
                to: self.state,
            }),
            transform: None,
            prevent_default: false,
            log: DragLogEntry {
                phase: DragPhase::Release,
                sequence: Some(sequence),
                source: Some(source),
                position: None,
                bounds: None,
                outcome: DragLogOutcome::Ended,
            },
        }
    }

    /// Handle interruption signals (window blur, touch-cancel, hidden page).
    ///
    /// The committed translation is kept.
    pub fn cancel(&mut self, reason: DragCancelReason) -> DragDispatch {
        if !self.config.cancel_on_interrupt {
            return DragDispatch::ignored(
                DragPhase::Cancel,
                DragIgnoredReason::CancelDisabled,
                None,
                None,
            );
        }
        let DragState::Dragging { source } = self.state else {
            return DragDispatch::ignored(
                DragPhase::Cancel,
                DragIgnoredReason::NotDragging,
                None,
                None,
            );
        };
        let from = self.state;
        self.state = DragState::Idle;
        let sequence = self.next_sequence();
        tracing::debug!(sequence, ?reason, "drag cancelled");
        DragDispatch {
            transition: Some(DragTransition {
                sequence,
                from,
                to: self.state,
            }),
            transform: None,
            prevent_default: false,
            log: DragLogEntry {
                phase: DragPhase::Cancel,
                sequence: Some(sequence),
                source: Some(source),
                position: None,
                bounds: None,
                outcome: DragLogOutcome::Cancelled(reason),
            },
        }
    }

    fn next_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence = sequence.saturating_add(1);
        sequence
    }
}
