#![forbid(unsafe_code)]

//! DOM host and the JS-facing API.
//!
//! [`TerreiroPage::mount`] probes the document once, wires listeners that turn
//! DOM events into [`Msg`] values, and starts an interval pump that feeds
//! monotonic time to the controller. The controller and its [`DomHost`] live
//! in one `Rc<RefCell<_>>`; listeners hold a `Weak` so a destroyed page can't
//! be revived by a late event.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Once;

use chrono::{DateTime, FixedOffset};
use js_sys::{Array, Date, Math, Reflect};
use terreiro_core::utils::{self, FormControl, LogLevel};
use terreiro_core::{FormFields, FormSource, UiElement};
use terreiro_runtime::{ClipboardError, Msg, PageApp, PageHost};
use terreiro_widgets::floating::PULSE_ANIMATION;
use terreiro_widgets::nav::ACTIVE_CLASS;
use terreiro_widgets::{CopyButtonFace, StarGroup, Toast, ToastId, ToastKind};
use tracing::{Level, debug, info, warn};
use tracing_subscriber::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    Document, Element, Event, EventTarget, FormData, HtmlElement, HtmlFormElement,
    ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, Window,
};
use web_time::Instant;

use crate::bridge::{self, CONFIG_SCRIPT_ID, INLINE_FIELD_IDS, WebError};
use crate::console::{BrowserConsoleLayer, ConsoleSink, page_log};

const TOAST_BODY: &str = r#"<i class="fas fa-star"></i><span></span><i class="fas fa-star"></i>"#;

impl From<WebError> for JsValue {
    fn from(err: WebError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

fn js_error(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

// ============================================================================
// Logging
// ============================================================================

struct WebConsole;

impl ConsoleSink for WebConsole {
    fn emit(&self, level: Level, line: &str) {
        let line = JsValue::from_str(line);
        match level {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            Level::INFO => web_sys::console::info_1(&line),
            _ => web_sys::console::debug_1(&line),
        }
    }
}

fn install_tracing() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        // `log` writes page lines to the console itself.
        let layer = BrowserConsoleLayer::new(WebConsole).forward_page_lines(false);
        let subscriber = tracing_subscriber::registry().with(layer);
        // A host page may have installed its own subscriber already.
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

// ============================================================================
// Element probing
// ============================================================================

fn now_timestamp() -> DateTime<FixedOffset> {
    let date = Date::new_0();
    bridge::timestamp_from_js(date.get_time(), date.get_timezone_offset()).unwrap_or_default()
}

fn query(root: &Document, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

fn query_all(root: &Element, selector: &str) -> Vec<Element> {
    match root.query_selector_all(selector) {
        Ok(list) => (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect(),
        Err(_) => Vec::new(),
    }
}

fn query_document_all(document: &Document, selector: &str) -> Vec<Element> {
    match document.query_selector_all(selector) {
        Ok(list) => (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect(),
        Err(_) => Vec::new(),
    }
}

fn set_style(el: &Element, property: &str, value: &str) {
    let Some(html) = el.dyn_ref::<HtmlElement>() else {
        return;
    };
    if let Err(err) = html.style().set_property(property, value) {
        debug!(property, error = %js_error(&err), "style update failed");
    }
}

fn input_value(el: &Element) -> Option<String> {
    Reflect::get(el, &JsValue::from_str("value"))
        .ok()
        .and_then(|v| v.as_string())
}

/// Page elements, resolved once at mount.
#[derive(Clone)]
struct DomElements {
    found: [Option<Element>; UiElement::ALL.len()],
    star_containers: Vec<Element>,
    stars: Vec<Vec<Element>>,
}

impl DomElements {
    fn probe(document: &Document) -> Self {
        let found = UiElement::ALL.map(|el| query(document, el.selector()));
        let star_containers = query_document_all(document, ".stars");
        let stars = star_containers
            .iter()
            .map(|container| query_all(container, "i"))
            .collect();
        Self {
            found,
            star_containers,
            stars,
        }
    }

    fn get(&self, element: UiElement) -> Option<&Element> {
        self.found[element as usize].as_ref()
    }
}

// ============================================================================
// DomHost
// ============================================================================

struct Runtime {
    app: PageApp,
    host: DomHost,
}

struct DomHost {
    window: Window,
    document: Document,
    elements: DomElements,
    toasts: Vec<(ToastId, Element)>,
    runtime: Weak<RefCell<Runtime>>,
}

fn dispatch(runtime: &Weak<RefCell<Runtime>>, msg: Msg) {
    let Some(shared) = runtime.upgrade() else {
        return;
    };
    let Ok(mut guard) = shared.try_borrow_mut() else {
        warn!(?msg, "page busy; event dropped");
        return;
    };
    let Runtime { app, host } = &mut *guard;
    app.update(msg, host);
}

fn pump(runtime: &Weak<RefCell<Runtime>>, started: Instant) {
    let Some(shared) = runtime.upgrade() else {
        return;
    };
    let Ok(mut guard) = shared.try_borrow_mut() else {
        return;
    };
    let Runtime { app, host } = &mut *guard;
    app.tick(started.elapsed(), host);
}

impl DomHost {
    fn form(&self, source: FormSource) -> Option<&HtmlFormElement> {
        self.elements
            .get(source.element())
            .and_then(|el| el.dyn_ref::<HtmlFormElement>())
    }

    fn toast_element(&self, id: ToastId) -> Option<&Element> {
        self.toasts.iter().find(|(t, _)| *t == id).map(|(_, el)| el)
    }

    fn build_toast(&self, toast: &Toast) -> Result<Element, JsValue> {
        let div = self.document.create_element("div")?;
        div.set_class_name(&toast.class_attr());
        div.set_inner_html(TOAST_BODY);
        if let Some(span) = div.query_selector("span")? {
            span.set_text_content(Some(&toast.message));
        }
        if let Some(html) = div.dyn_ref::<HtmlElement>() {
            html.style().set_css_text(&toast.css_text());
        }
        Ok(div)
    }
}

impl PageHost for DomHost {
    fn has_element(&self, element: UiElement) -> bool {
        self.elements.get(element).is_some()
    }

    fn star_groups(&self) -> Vec<usize> {
        self.elements.stars.iter().map(Vec::len).collect()
    }

    fn element_text(&self, element: UiElement) -> Option<String> {
        self.elements.get(element).and_then(|el| el.text_content())
    }

    fn copy_button_label(&self) -> Option<String> {
        self.elements
            .get(UiElement::CopyButton)
            .map(|el| el.inner_html())
    }

    fn random_index(&mut self, len: usize) -> usize {
        bridge::index_from_unit(Math::random(), len)
    }

    fn set_modal_visible(&mut self, visible: bool) {
        if let Some(modal) = self.elements.get(UiElement::Modal) {
            set_style(modal, "display", if visible { "block" } else { "none" });
        }
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        if let Some(body) = self.document.body() {
            set_style(&body, "overflow", if locked { "hidden" } else { "auto" });
        }
    }

    fn reset_form(&mut self, source: FormSource) {
        if let Some(form) = self.form(source) {
            form.reset();
        }
    }

    fn select_service(&mut self, service: &str) {
        let select = self
            .form(FormSource::Modal)
            .and_then(|form| form.query_selector("select").ok().flatten());
        if let Some(select) = select {
            if let Err(err) = Reflect::set(&select, &"value".into(), &service.into()) {
                debug!(error = %js_error(&err), "service preselect failed");
            }
        }
    }

    fn open_outbound(&mut self, url: &str) {
        if let Err(err) = self.window.open_with_url_and_target(url, "_blank") {
            warn!(error = %js_error(&err), "outbound window blocked");
        }
    }

    fn render_stars(&mut self, group: usize, stars: &StarGroup) {
        let Some(elements) = self.elements.stars.get(group) else {
            return;
        };
        for (el, visual) in elements.iter().zip(stars.stars()) {
            let _ = el.class_list().toggle_with_force("active", visual.active);
            set_style(el, "color", visual.highlight.color());
            set_style(el, "transform", visual.highlight.transform());
        }
    }

    fn mount_toast(&mut self, toast: &Toast) {
        let Some(body) = self.document.body() else {
            return;
        };
        match self.build_toast(toast) {
            Ok(div) => {
                if let Err(err) = body.append_child(&div) {
                    warn!(toast = %toast.id, error = %js_error(&err), "toast mount failed");
                    return;
                }
                self.toasts.push((toast.id, div));
            }
            Err(err) => warn!(toast = %toast.id, error = %js_error(&err), "toast build failed"),
        }
    }

    fn begin_toast_exit(&mut self, id: ToastId) {
        if let Some(el) = self.toast_element(id) {
            set_style(el, "animation", Toast::EXIT_ANIMATION);
        }
    }

    fn remove_toast(&mut self, id: ToastId) {
        if let Some(pos) = self.toasts.iter().position(|(t, _)| *t == id) {
            let (_, el) = self.toasts.remove(pos);
            el.remove();
        }
    }

    fn set_copy_button(&mut self, face: &CopyButtonFace) {
        if let Some(button) = self.elements.get(UiElement::CopyButton) {
            button.set_inner_html(&face.label_html);
            set_style(button, "background", face.background);
        }
    }

    fn set_nav_open(&mut self, open: bool) {
        for element in [UiElement::NavMenu, UiElement::NavToggle] {
            if let Some(el) = self.elements.get(element) {
                let _ = el.class_list().toggle_with_force(ACTIVE_CLASS, open);
            }
        }
    }

    fn scroll_into_view(&mut self, id: &str) -> bool {
        let Some(target) = self.document.get_element_by_id(id) else {
            return false;
        };
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Start);
        target.scroll_into_view_with_scroll_into_view_options(&options);
        true
    }

    fn reveal_floating_trigger(&mut self) {
        if let Some(trigger) = self.elements.get(UiElement::FloatingTrigger) {
            set_style(trigger, "opacity", "1");
            set_style(trigger, "transform", "scale(1)");
        }
    }

    fn set_floating_pulse(&mut self, running: bool) {
        if let Some(trigger) = self.elements.get(UiElement::FloatingTrigger) {
            set_style(trigger, "animation", if running { PULSE_ANIMATION } else { "none" });
        }
    }

    fn write_clipboard(&mut self, text: &str) {
        let runtime = self.runtime.clone();
        let navigator = self.window.navigator();
        let available = Reflect::get(&navigator, &"clipboard".into())
            .map(|v| !v.is_undefined() && !v.is_null())
            .unwrap_or(false);
        if !available {
            spawn_local(async move {
                dispatch(&runtime, Msg::ClipboardWritten(Err(ClipboardError::NotAvailable)));
            });
            return;
        }
        let promise = navigator.clipboard().write_text(text);
        spawn_local(async move {
            let result = JsFuture::from(promise)
                .await
                .map(|_| ())
                .map_err(|err| ClipboardError::WriteError(js_error(&err)));
            dispatch(&runtime, Msg::ClipboardWritten(result));
        });
    }
}

// ============================================================================
// Form reading
// ============================================================================

fn inline_fields(document: &Document) -> FormFields {
    INLINE_FIELD_IDS
        .iter()
        .filter_map(|id| {
            let el = document.get_element_by_id(id)?;
            Some((*id, input_value(&el).unwrap_or_default()))
        })
        .collect()
}

fn modal_fields(form: &HtmlFormElement) -> FormFields {
    let Ok(data) = FormData::new_with_form(form) else {
        return FormFields::new();
    };
    let Ok(Some(entries)) = js_sys::try_iter(&data) else {
        return FormFields::new();
    };
    bridge::fields_from_entries(entries.filter_map(Result::ok).filter_map(|entry| {
        let pair = Array::from(&entry);
        let key = pair.get(0).as_string()?;
        Some((key, pair.get(1).as_string()))
    }))
}

// ============================================================================
// Exported API
// ============================================================================

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

/// A mounted page controller.
#[wasm_bindgen]
pub struct TerreiroPage {
    window: Window,
    runtime: Option<Rc<RefCell<Runtime>>>,
    listeners: Vec<Listener>,
    pump: Option<(i32, Closure<dyn FnMut()>)>,
}

#[wasm_bindgen]
impl TerreiroPage {
    /// Probe the current document, wire every present feature, and start the
    /// timer pump.
    pub fn mount() -> Result<TerreiroPage, JsValue> {
        install_tracing();
        let window = web_sys::window().ok_or(WebError::NoWindow)?;
        let document = window.document().ok_or(WebError::NoDocument)?;

        let raw_config = document
            .get_element_by_id(CONFIG_SCRIPT_ID)
            .and_then(|el| el.text_content());
        let config = bridge::load_config(raw_config.as_deref());
        let pump_interval = config.timings.pump_interval();
        let elements = DomElements::probe(&document);

        let runtime = Rc::new_cyclic(|weak| {
            RefCell::new(Runtime {
                app: PageApp::new(config),
                host: DomHost {
                    window: window.clone(),
                    document: document.clone(),
                    elements: elements.clone(),
                    toasts: Vec::new(),
                    runtime: weak.clone(),
                },
            })
        });
        {
            let mut guard = runtime.borrow_mut();
            let Runtime { app, host } = &mut *guard;
            app.init(host);
        }

        let mut page = TerreiroPage {
            window,
            runtime: Some(runtime.clone()),
            listeners: Vec::new(),
            pump: None,
        };
        let weak = Rc::downgrade(&runtime);
        page.wire(&document, &elements, &weak)?;
        page.start_pump(&weak, pump_interval.as_millis())?;
        info!(listeners = page.listeners.len(), "page mounted");
        Ok(page)
    }

    /// Copy the donation key to the clipboard.
    #[wasm_bindgen(js_name = copyPixKey)]
    pub fn copy_pix_key(&self) {
        self.send(Msg::CopyRequested);
    }

    /// Show a toast. `kind` is `"success"` (default) or `"warning"`.
    #[wasm_bindgen(js_name = showSpiritualMessage)]
    pub fn show_spiritual_message(&self, message: String, kind: Option<String>) {
        let kind = kind.as_deref().map_or(ToastKind::Success, ToastKind::from_js);
        self.send(Msg::Notify { message, kind });
    }

    /// Open the feedback modal, optionally preselecting a service.
    #[wasm_bindgen(js_name = openFeedback)]
    pub fn open_feedback(&self, service: Option<String>) {
        self.send(Msg::FeedbackLinkClicked { service });
    }

    /// Detach listeners, stop the pump, and drop controller state.
    pub fn destroy(&mut self) {
        for listener in self.listeners.drain(..) {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.kind,
                listener.callback.as_ref().unchecked_ref(),
            );
        }
        if let Some((handle, _callback)) = self.pump.take() {
            self.window.clear_interval_with_handle(handle);
        }
        if self.runtime.take().is_some() {
            debug!("page destroyed");
        }
    }
}

impl TerreiroPage {
    fn send(&self, msg: Msg) {
        if let Some(runtime) = &self.runtime {
            dispatch(&Rc::downgrade(runtime), msg);
        }
    }

    fn listen(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), WebError> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target
            .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
            .map_err(|err| WebError::Js(js_error(&err)))?;
        self.listeners.push(Listener {
            target: target.clone(),
            kind,
            callback,
        });
        Ok(())
    }

    /// Bind `kind` on `target` to a fixed message.
    fn listen_msg(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        weak: &Weak<RefCell<Runtime>>,
        msg: Msg,
    ) -> Result<(), WebError> {
        let weak = weak.clone();
        self.listen(target, kind, move |_| dispatch(&weak, msg.clone()))
    }

    fn wire(
        &mut self,
        document: &Document,
        elements: &DomElements,
        weak: &Weak<RefCell<Runtime>>,
    ) -> Result<(), WebError> {
        if let Some(trigger) = elements.get(UiElement::FloatingTrigger) {
            self.listen_msg(trigger, "click", weak, Msg::FloatingTriggerClicked)?;
        }
        if let Some(close) = elements.get(UiElement::CloseModal) {
            self.listen_msg(close, "click", weak, Msg::CloseClicked)?;
        }
        if let Some(modal) = elements.get(UiElement::Modal) {
            let w = weak.clone();
            let backdrop = modal.clone();
            self.listen(modal, "click", move |event: Event| {
                let on_backdrop = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .is_some_and(|el| el == backdrop);
                if on_backdrop {
                    dispatch(&w, Msg::ModalBackdropClicked);
                }
            })?;
        }

        for link in query_document_all(document, ".footer-feedback-link") {
            let w = weak.clone();
            let service = link.get_attribute("data-service");
            self.listen(&link, "click", move |event: Event| {
                event.prevent_default();
                dispatch(
                    &w,
                    Msg::FeedbackLinkClicked {
                        service: service.clone(),
                    },
                );
            })?;
        }

        if let Some(form) = elements.get(UiElement::InlineForm) {
            let w = weak.clone();
            let doc = document.clone();
            self.listen(form, "submit", move |event: Event| {
                event.prevent_default();
                dispatch(
                    &w,
                    Msg::FormSubmitted {
                        source: FormSource::Inline,
                        fields: inline_fields(&doc),
                        submitted_at: now_timestamp(),
                    },
                );
            })?;
        }
        let modal_form = elements
            .get(UiElement::ModalForm)
            .and_then(|el| el.dyn_ref::<HtmlFormElement>())
            .cloned();
        if let Some(form) = modal_form {
            let w = weak.clone();
            let source = form.clone();
            self.listen(&form, "submit", move |event: Event| {
                event.prevent_default();
                dispatch(
                    &w,
                    Msg::FormSubmitted {
                        source: FormSource::Modal,
                        fields: modal_fields(&source),
                        submitted_at: now_timestamp(),
                    },
                );
            })?;
        }

        for (group, (container, stars)) in elements
            .star_containers
            .iter()
            .zip(&elements.stars)
            .enumerate()
        {
            for (index, star) in stars.iter().enumerate() {
                self.listen_msg(star, "click", weak, Msg::StarClicked { group, index })?;
                self.listen_msg(star, "mouseenter", weak, Msg::StarHovered { group, index })?;
            }
            self.listen_msg(container, "mouseleave", weak, Msg::StarsLeft { group })?;
        }

        if elements.get(UiElement::NavMenu).is_some() {
            if let Some(toggle) = elements.get(UiElement::NavToggle) {
                self.listen_msg(toggle, "click", weak, Msg::NavToggleClicked)?;
            }
            for link in query_document_all(document, ".nav-link") {
                self.listen_msg(&link, "click", weak, Msg::NavLinkClicked)?;
            }
        }

        for anchor in query_document_all(document, r##"a[href^="#"]"##) {
            let w = weak.clone();
            let href = anchor.get_attribute("href").unwrap_or_default();
            self.listen(&anchor, "click", move |event: Event| {
                event.prevent_default();
                dispatch(&w, Msg::AnchorClicked { href: href.clone() });
            })?;
        }

        if let Some(button) = elements.get(UiElement::CopyButton) {
            self.listen_msg(button, "click", weak, Msg::CopyRequested)?;
        }
        Ok(())
    }

    fn start_pump(&mut self, weak: &Weak<RefCell<Runtime>>, interval_ms: u128) -> Result<(), WebError> {
        let started = Instant::now();
        let w = weak.clone();
        let callback = Closure::<dyn FnMut()>::new(move || pump(&w, started));
        let timeout = i32::try_from(interval_ms).unwrap_or(i32::MAX);
        let handle = self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                timeout,
            )
            .map_err(|err| WebError::Js(js_error(&err)))?;
        self.pump = Some((handle, callback));
        Ok(())
    }
}

impl Drop for TerreiroPage {
    fn drop(&mut self) {
        self.destroy();
    }
}

// ============================================================================
// Free utilities
// ============================================================================

/// Write `[HH:MM:SS] Terreiro: <message>` to the console at `level`
/// (`"debug"`, `"info"`, `"warn"`, `"error"`; default `"info"`). Returns the
/// line.
#[wasm_bindgen]
pub fn log(message: &str, level: Option<String>) -> String {
    install_tracing();
    let level = level
        .as_deref()
        .map(|raw| raw.parse::<LogLevel>().unwrap_or_default())
        .unwrap_or_default();
    page_log(&WebConsole, level, message, now_timestamp())
}

/// Whether every `[required]` control in `form` has a non-blank value.
#[wasm_bindgen(js_name = validateForm)]
pub fn validate_form(form: &HtmlFormElement) -> bool {
    let controls: Vec<FormControl> = query_all(form, "[required]")
        .iter()
        .map(|el| FormControl::new(true, input_value(el).unwrap_or_default()))
        .collect();
    utils::validate_form(&controls)
}

/// Format a Brazilian mobile number as `(DD) DDDDD-DDDD`.
#[wasm_bindgen(js_name = formatPhone)]
pub fn format_phone(phone: &str) -> String {
    utils::format_phone(phone)
}
