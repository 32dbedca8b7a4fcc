#![forbid(unsafe_code)]

//! `liquid-glass-core` holds the deterministic half of the liquid glass editor.
//!
//! Design goals:
//! - **Host-driven input**: the embedding environment (JS/DOM) pushes press, move and
//!   release signals and supplies live geometry on demand.
//! - **Effects, not side effects**: every operation returns a value describing what
//!   the host should apply (a transform, CSS variable writes, a download).
//! - **No DOM, no threads**: everything here runs and tests on native targets.
//!
//! The `liquid-glass-web` crate wraps these building blocks with DOM listeners.

pub mod bindings;
pub mod config;
pub mod drag;
pub mod error;
pub mod export;
pub mod geometry;
pub mod reflow;
pub mod transform;

pub use bindings::{
    BindingEffect, CssVariableSource, FilterPrimitive, GlassParameters, ParameterBindings,
    ParameterId, TextStyleProperty, hex_to_rgb,
};
pub use config::{EditorConfig, ExportConfig, ReflowMode};
pub use drag::{
    DragCancelReason, DragConfig, DragController, DragDispatch, DragIgnoredReason, DragInput,
    DragLogEntry, DragLogOutcome, DragPhase, DragState, DragTransition, InputSource, PressTarget,
};
pub use error::{GlassError, Result};
pub use export::{ExportFile, ExportPackage, ExportPackager};
pub use geometry::{DragBounds, DragGeometry, DragPoint, DragSize, StaticGeometry};
pub use reflow::{ReflowPolicy, ReflowProperty, ReflowStep, ReflowTarget, ReflowTiming, is_safari};
pub use transform::CenteredTransform;
