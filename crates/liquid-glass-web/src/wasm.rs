#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the glass editor.
//!
//! [`GlassEditor`] owns the DOM listeners. Every handler borrows the shared
//! [`EditorState`], feeds the signal to a core controller and applies the
//! returned effects. Only compiled on `wasm32` targets.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use js_sys::{Array, Object, Reflect, Uint8Array};
use liquid_glass_core::{
    BindingEffect, CenteredTransform, CssVariableSource, DragCancelReason, DragController,
    DragDispatch, DragGeometry, DragInput, DragPoint, DragSize, EditorConfig, ExportPackager,
    GlassError, InputSource, ParameterBindings, ParameterId, PressTarget, ReflowPolicy,
    ReflowStep, ReflowTarget, ReflowTiming,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Blob, BlobPropertyBag, CssStyleDeclaration, Document, Element,
    Event, EventTarget, HtmlAnchorElement, HtmlElement, HtmlInputElement, MouseEvent, Node,
    SvgElement, TouchEvent, Url, VisibilityState, Window,
};

use crate::plan::{DomTarget, DomWrite, plan_effect};

const DOWNLOADED_LABEL: &str = "Downloaded!";
const DOWNLOADED_BACKGROUND: &str = "#28a745";

fn install_panic_hook() {
    use std::sync::Once;
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let global = js_sys::global();
            if let Ok(console) = Reflect::get(&global, &"console".into()) {
                if let Ok(error) = Reflect::get(&console, &"error".into()) {
                    if let Ok(f) = error.dyn_into::<js_sys::Function>() {
                        let _ = f.call1(&console, &JsValue::from_str(&format!("{info}")));
                    }
                }
            }
        }));
    });
}

fn set_js(obj: &Object, key: &str, value: JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), &value);
}

fn dom_error(context: &str, err: &JsValue) -> GlassError {
    let detail = err.as_string().unwrap_or_else(|| format!("{err:?}"));
    GlassError::dom(format!("{context}: {detail}"))
}

fn to_js(err: &GlassError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Inline style of an HTML or SVG element.
fn inline_style(element: &Element) -> Option<CssStyleDeclaration> {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        return Some(html.style());
    }
    element.dyn_ref::<SvgElement>().map(SvgElement::style)
}

fn query(document: &Document, selector: &str) -> Result<Element, GlassError> {
    document
        .query_selector(selector)
        .map_err(|err| dom_error(selector, &err))?
        .ok_or_else(|| GlassError::missing(selector))
}

fn query_html(document: &Document, selector: &str) -> Result<HtmlElement, GlassError> {
    query(document, selector)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| GlassError::dom(format!("{selector} is not an HTML element")))
}

/// Live element and container sizes, re-read on every call.
struct DomGeometry {
    element: HtmlElement,
    container: HtmlElement,
}

impl DragGeometry for DomGeometry {
    fn element_size(&self) -> DragSize {
        let rect = self.element.get_bounding_client_rect();
        DragSize::new(rect.width(), rect.height())
    }

    fn container_size(&self) -> DragSize {
        let rect = self.container.get_bounding_client_rect();
        DragSize::new(rect.width(), rect.height())
    }
}

/// Computed custom properties on the document root.
struct ComputedVariables(Option<CssStyleDeclaration>);

impl CssVariableSource for ComputedVariables {
    fn css_variable(&self, name: &str) -> Option<String> {
        let value = self.0.as_ref()?.get_property_value(name).ok()?;
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

fn drag_input(event: &Event) -> Option<DragInput> {
    if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
        return Some(DragInput::Mouse(DragPoint::new(
            f64::from(mouse.client_x()),
            f64::from(mouse.client_y()),
        )));
    }
    let touch = event.dyn_ref::<TouchEvent>()?;
    let list = touch.touches();
    let points: Vec<DragPoint> = (0..list.length())
        .filter_map(|index| list.get(index))
        .map(|t| DragPoint::new(f64::from(t.client_x()), f64::from(t.client_y())))
        .collect();
    Some(DragInput::touch_list(&points))
}

/// Elements the editor touches, resolved once at construction.
struct EditorDom {
    window: Window,
    document: Document,
    root: Element,
    draggable: HtmlElement,
    container: HtmlElement,
    text: HtmlElement,
    filter: Element,
    export_button: HtmlElement,
    controls: Vec<(ParameterId, HtmlInputElement)>,
}

impl EditorDom {
    fn lookup(config: &EditorConfig) -> Result<Self, GlassError> {
        let window = web_sys::window().ok_or_else(|| GlassError::missing("window"))?;
        let document = window
            .document()
            .ok_or_else(|| GlassError::missing("document"))?;
        let root = document
            .document_element()
            .ok_or_else(|| GlassError::missing(":root"))?;
        let draggable = query_html(&document, &format!("#{}", config.draggable_id))?;
        let container = query_html(&document, &config.container_selector)?;
        let text = query_html(&document, &config.text_selector)?;
        let filter = query(&document, &config.filter_selector())?;
        let export_button = query_html(&document, &config.export_button_selector)?;

        let controls = ParameterId::ALL
            .iter()
            .map(|&id| {
                let selector = format!("#{}", id.control_id());
                query(&document, &selector)?
                    .dyn_into::<HtmlInputElement>()
                    .map(|input| (id, input))
                    .map_err(|_| GlassError::dom(format!("{selector} is not an input")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            window,
            document,
            root,
            draggable,
            container,
            text,
            filter,
            export_button,
            controls,
        })
    }

    fn geometry(&self) -> DomGeometry {
        DomGeometry {
            element: self.draggable.clone(),
            container: self.container.clone(),
        }
    }

    fn computed_variables(&self) -> ComputedVariables {
        ComputedVariables(self.window.get_computed_style(&self.root).ok().flatten())
    }

    fn resolve(&self, target: DomTarget, config: &EditorConfig) -> Option<Element> {
        match target {
            DomTarget::Root => Some(self.root.clone()),
            DomTarget::Container => Some(self.container.clone().into()),
            DomTarget::GlassText => Some(self.text.clone().into()),
            DomTarget::ById(_) | DomTarget::FilterPrimitive(_) | DomTarget::Control(_) => self
                .document
                .query_selector(&target.selector(config))
                .ok()
                .flatten(),
        }
    }

    fn perform(
        &self,
        write: DomWrite,
        config: &EditorConfig,
        reflow: ReflowPolicy,
    ) -> Result<(), GlassError> {
        let target = match &write {
            DomWrite::Style { target, .. }
            | DomWrite::Text { target, .. }
            | DomWrite::Attribute { target, .. }
            | DomWrite::InputValue { target, .. } => *target,
            DomWrite::RefreshFilter => {
                self.schedule_reflow(reflow.refresh_plan());
                return Ok(());
            }
        };
        let Some(element) = self.resolve(target, config) else {
            tracing::warn!(?target, "write target missing");
            return Ok(());
        };
        match write {
            DomWrite::Style {
                property, value, ..
            } => {
                let style = inline_style(&element)
                    .ok_or_else(|| GlassError::dom(format!("{target:?} has no inline style")))?;
                style
                    .set_property(&property, &value)
                    .map_err(|err| dom_error(&property, &err))?;
            }
            DomWrite::Text { text, .. } => element.set_text_content(Some(&text)),
            DomWrite::Attribute { name, value, .. } => element
                .set_attribute(name, &value)
                .map_err(|err| dom_error(name, &err))?,
            DomWrite::InputValue { value, .. } => {
                if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
                    input.set_value(&value);
                }
            }
            DomWrite::RefreshFilter => {}
        }
        Ok(())
    }

    fn apply_effects(&self, effects: &[BindingEffect], config: &EditorConfig, reflow: ReflowPolicy) {
        for effect in effects {
            if let Err(err) = self.perform(plan_effect(effect), config, reflow) {
                tracing::warn!(%err, "binding effect failed");
            }
        }
    }

    fn apply_dispatch(&self, event: &Event, dispatch: &DragDispatch) {
        if dispatch.prevent_default {
            event.prevent_default();
        }
        if let Some(transform) = dispatch.transform {
            if let Err(err) = self
                .draggable
                .style()
                .set_property(CenteredTransform::PROPERTY, &transform.css_value())
            {
                tracing::warn!(error = ?err, "transform write failed");
            }
        }
    }

    fn reflow_element(&self, target: ReflowTarget) -> Element {
        match target {
            ReflowTarget::GlassElement => self.draggable.clone().into(),
            ReflowTarget::DisplacementFilter => self.filter.clone(),
        }
    }

    fn schedule_reflow(&self, steps: &[ReflowStep]) {
        for &step in steps {
            let element = self.reflow_element(step.target);
            let callback = Closure::once_into_js(move || force_reflow(&element, step));
            let scheduled = match step.timing {
                ReflowTiming::AfterMillis(delay) => self
                    .window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(
                        callback.unchecked_ref(),
                        i32::try_from(delay).unwrap_or(i32::MAX),
                    ),
                ReflowTiming::NextFrame => self
                    .window
                    .request_animation_frame(callback.unchecked_ref()),
            };
            if let Err(err) = scheduled {
                tracing::warn!(error = ?err, ?step, "reflow scheduling failed");
            }
        }
    }
}

/// Flip the property to `none`, force layout, restore the previous inline value.
fn force_reflow(element: &Element, step: ReflowStep) {
    let Some(style) = inline_style(element) else {
        return;
    };
    let name = step.property.css_name();
    let previous = style.get_property_value(name).unwrap_or_default();
    if style.set_property(name, "none").is_err() {
        return;
    }
    let _ = element.get_bounding_client_rect();
    let restored = if previous.is_empty() {
        style.remove_property(name).map(drop)
    } else {
        style.set_property(name, &previous)
    };
    match restored {
        Ok(()) => tracing::trace!(?step, "forced reflow"),
        Err(err) => tracing::warn!(error = ?err, ?step, "reflow restore failed"),
    }
}

struct EditorState {
    config: EditorConfig,
    dom: EditorDom,
    drag: DragController,
    bindings: ParameterBindings,
    reflow: ReflowPolicy,
}

impl EditorState {
    fn on_press(&mut self, event: &Event) {
        let Some(input) = drag_input(event) else {
            return;
        };
        let hit = event
            .target()
            .and_then(|target| target.dyn_into::<Node>().ok())
            .is_some_and(|node| self.dom.draggable.contains(Some(&node)));
        let dispatch = self.drag.press(input, PressTarget::from_hit(hit));
        self.dom.apply_dispatch(event, &dispatch);
    }

    fn on_move(&mut self, event: &Event) {
        if !self.drag.is_dragging() {
            return;
        }
        let Some(input) = drag_input(event) else {
            return;
        };
        let geometry = self.dom.geometry();
        let dispatch = self.drag.pointer_move(input, &geometry);
        self.dom.apply_dispatch(event, &dispatch);
    }

    fn on_release(&mut self, event: &Event, source: InputSource) {
        let dispatch = self.drag.release(source);
        self.dom.apply_dispatch(event, &dispatch);
    }

    fn on_cancel(&mut self, event: &Event, reason: DragCancelReason) {
        let dispatch = self.drag.cancel(reason);
        self.dom.apply_dispatch(event, &dispatch);
    }

    fn on_visibility_change(&mut self, event: &Event) {
        if self.dom.document.visibility_state() == VisibilityState::Hidden {
            self.on_cancel(event, DragCancelReason::VisibilityHidden);
        }
    }

    fn on_input(&mut self, id: ParameterId, raw: &str) {
        match self.bindings.apply(id, raw) {
            Ok(effects) => self.dom.apply_effects(&effects, &self.config, self.reflow),
            Err(err) => tracing::debug!(%err, "input ignored"),
        }
    }

    fn initialize(&mut self) {
        for (id, input) in &self.dom.controls {
            if let Err(err) = self.bindings.sync_value(*id, &input.value()) {
                tracing::debug!(%err, "markup value kept at default");
            }
        }
        let css = self.dom.computed_variables();
        let effects = self.bindings.initialize_from_css(&css);
        self.dom.apply_effects(&effects, &self.config, self.reflow);
        self.dom.schedule_reflow(self.reflow.startup_plan());
    }

    fn render_archive(&self) -> Result<Vec<u8>, GlassError> {
        let css = self.dom.computed_variables();
        ExportPackager::render(self.bindings.params(), &css).to_zip()
    }
}

fn download(dom: &EditorDom, bytes: &[u8], file_name: &str) -> Result<(), GlassError> {
    let parts = Array::of1(&Uint8Array::from(bytes));
    let options = BlobPropertyBag::new();
    options.set_type("application/zip");
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(|err| dom_error("blob", &err))?;
    let url = Url::create_object_url_with_blob(&blob).map_err(|err| dom_error("object url", &err))?;

    let anchor = dom
        .document
        .create_element("a")
        .map_err(|err| dom_error("anchor", &err))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| GlassError::dom("anchor is not an HtmlAnchorElement"))?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    Url::revoke_object_url(&url).map_err(|err| dom_error("revoke", &err))?;
    tracing::info!(file_name, bytes = bytes.len(), "export downloaded");
    Ok(())
}

/// Swap the button to its confirmation look and restore it after `feedback_ms`.
fn show_export_feedback(dom: &EditorDom, feedback_ms: u32) {
    let button = dom.export_button.clone();
    let label = button.text_content();
    let style = button.style();
    let background = style.get_property_value("background").unwrap_or_default();
    button.set_text_content(Some(DOWNLOADED_LABEL));
    let _ = style.set_property("background", DOWNLOADED_BACKGROUND);

    let restore = Closure::once_into_js(move || {
        button.set_text_content(label.as_deref());
        let style = button.style();
        let _ = if background.is_empty() {
            style.remove_property("background").map(drop)
        } else {
            style.set_property("background", &background)
        };
    });
    if let Err(err) = dom.window.set_timeout_with_callback_and_timeout_and_arguments_0(
        restore.unchecked_ref(),
        i32::try_from(feedback_ms).unwrap_or(i32::MAX),
    ) {
        tracing::warn!(error = ?err, "export feedback reset not scheduled");
    }
}

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

/// Liquid glass editor bound to the current document.
///
/// Construct it once the page markup is present; call [`GlassEditor::destroy`]
/// to detach every listener.
#[wasm_bindgen]
pub struct GlassEditor {
    state: Rc<RefCell<EditorState>>,
    listeners: Vec<Listener>,
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

#[wasm_bindgen]
impl GlassEditor {
    /// Bind the editor. `config_json` overrides selectors and behavior switches.
    ///
    /// Fails when a required element is missing or the config does not parse.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<GlassEditor, JsValue> {
        install_panic_hook();
        Self::build(config_json.as_deref()).map_err(|err| {
            tracing::error!(%err, "glass editor failed to start");
            to_js(&err)
        })
    }

    /// Whether a drag is in progress.
    #[wasm_bindgen(js_name = isDragging)]
    pub fn is_dragging(&self) -> Result<bool, JsValue> {
        Ok(self.read_state()?.drag.is_dragging())
    }

    /// Committed translation as `{ x, y }`.
    pub fn translation(&self) -> Result<JsValue, JsValue> {
        let point = self.read_state()?.drag.translation();
        let obj = Object::new();
        set_js(&obj, "x", JsValue::from_f64(point.x));
        set_js(&obj, "y", JsValue::from_f64(point.y));
        Ok(obj.into())
    }

    /// Current parameter values as JSON.
    #[wasm_bindgen(js_name = parametersJson)]
    pub fn parameters_json(&self) -> Result<String, JsValue> {
        let state = self.read_state()?;
        serde_json::to_string(state.bindings.params())
            .map_err(|err| to_js(&GlassError::from(err)))
    }

    /// Build and download the export archive.
    #[wasm_bindgen(js_name = exportPackage)]
    pub fn export_package(&self) -> Result<(), JsValue> {
        export_from(&self.state).map_err(|err| to_js(&err))
    }

    /// Remove every listener installed by the constructor.
    pub fn destroy(&mut self) {
        for listener in self.listeners.drain(..) {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.kind,
                listener.callback.as_ref().unchecked_ref(),
            );
        }
        tracing::debug!("glass editor destroyed");
    }
}

impl GlassEditor {
    fn read_state(&self) -> Result<Ref<'_, EditorState>, JsValue> {
        self.state
            .try_borrow()
            .map_err(|_| to_js(&GlassError::dom("editor busy")))
    }

    fn build(config_json: Option<&str>) -> Result<Self, GlassError> {
        let config = match config_json {
            Some(json) => EditorConfig::from_json(json)?,
            None => EditorConfig::default(),
        };
        let dom = EditorDom::lookup(&config)?;
        let user_agent = dom.window.navigator().user_agent().unwrap_or_default();
        let reflow = config.reflow.resolve(&user_agent);
        let state = EditorState {
            drag: DragController::new(config.drag),
            bindings: ParameterBindings::new(config.defaults.clone()),
            reflow,
            config,
            dom,
        };

        let mut editor = Self {
            state: Rc::new(RefCell::new(state)),
            listeners: Vec::new(),
        };
        editor.bind_drag()?;
        editor.bind_controls()?;
        editor.bind_export()?;
        editor.state.borrow_mut().initialize();
        tracing::info!(reflow = reflow.is_enabled(), "glass editor started");
        Ok(editor)
    }

    fn listen(
        &mut self,
        target: EventTarget,
        kind: &'static str,
        passive: Option<bool>,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), GlassError> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let added = match passive {
            Some(passive) => {
                let options = AddEventListenerOptions::new();
                options.set_passive(passive);
                target.add_event_listener_with_callback_and_add_event_listener_options(
                    kind,
                    callback.as_ref().unchecked_ref(),
                    &options,
                )
            }
            None => {
                target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
            }
        };
        added.map_err(|err| dom_error(kind, &err))?;
        self.listeners.push(Listener {
            target,
            kind,
            callback,
        });
        Ok(())
    }

    /// Forward `event` to a state method. Signals arriving while the state is
    /// already borrowed are dropped.
    fn route(
        &mut self,
        target: EventTarget,
        kind: &'static str,
        passive: Option<bool>,
        on_event: fn(&mut EditorState, &Event),
    ) -> Result<(), GlassError> {
        let state = Rc::clone(&self.state);
        self.listen(target, kind, passive, move |event| {
            match state.try_borrow_mut() {
                Ok(mut state) => on_event(&mut state, &event),
                Err(_) => tracing::warn!(kind, "re-entrant event dropped"),
            }
        })
    }

    fn bind_drag(&mut self) -> Result<(), GlassError> {
        let (draggable, document, window, cancel_on_interrupt) = {
            let state = self.state.borrow();
            (
                EventTarget::from(state.dom.draggable.clone()),
                EventTarget::from(state.dom.document.clone()),
                EventTarget::from(state.dom.window.clone()),
                state.config.drag.cancel_on_interrupt,
            )
        };

        self.route(draggable.clone(), "mousedown", None, EditorState::on_press)?;
        self.route(draggable, "touchstart", None, EditorState::on_press)?;
        self.route(document.clone(), "mousemove", None, EditorState::on_move)?;
        // preventDefault on touchmove only works from a non-passive listener.
        self.route(document.clone(), "touchmove", Some(false), EditorState::on_move)?;
        self.route(document.clone(), "mouseup", None, |state, event| {
            state.on_release(event, InputSource::Mouse);
        })?;
        self.route(document.clone(), "touchend", None, |state, event| {
            state.on_release(event, InputSource::Touch);
        })?;

        if cancel_on_interrupt {
            self.route(window, "blur", None, |state, event| {
                state.on_cancel(event, DragCancelReason::Blur);
            })?;
            self.route(document.clone(), "touchcancel", None, |state, event| {
                state.on_cancel(event, DragCancelReason::PointerCancel);
            })?;
            self.route(
                document,
                "visibilitychange",
                None,
                EditorState::on_visibility_change,
            )?;
        }
        Ok(())
    }

    fn bind_controls(&mut self) -> Result<(), GlassError> {
        let controls = self.state.borrow().dom.controls.clone();
        for (id, input) in controls {
            let state = Rc::clone(&self.state);
            let source = input.clone();
            self.listen(input.into(), "input", None, move |_event| {
                let raw = source.value();
                match state.try_borrow_mut() {
                    Ok(mut state) => state.on_input(id, &raw),
                    Err(_) => tracing::warn!(control = id.control_id(), "re-entrant input dropped"),
                }
            })?;
        }
        Ok(())
    }

    fn bind_export(&mut self) -> Result<(), GlassError> {
        let button = EventTarget::from(self.state.borrow().dom.export_button.clone());
        let state = Rc::clone(&self.state);
        self.listen(button, "click", None, move |_event| {
            if let Err(err) = export_from(&state) {
                tracing::error!(%err, "export failed");
            }
        })
    }
}

/// Listeners use `try_borrow_mut`, so events dispatched synchronously by
/// `anchor.click()` while this shared borrow is held are dropped, not panics.
fn export_from(state: &Rc<RefCell<EditorState>>) -> Result<(), GlassError> {
    let state = state
        .try_borrow()
        .map_err(|_| GlassError::dom("editor busy"))?;
    let bytes = state.render_archive()?;
    let export = &state.config.export;
    download(&state.dom, &bytes, &export.archive_name)?;
    show_export_feedback(&state.dom, export.feedback_ms);
    Ok(())
}

impl Drop for GlassEditor {
    fn drop(&mut self) {
        self.destroy();
    }
}
