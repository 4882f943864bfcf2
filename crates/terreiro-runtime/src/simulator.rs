#![forbid(unsafe_code)]

//! Deterministic page simulator for testing.
//!
//! [`RecordingHost`] implements [`PageHost`] in memory: it records every call
//! and mirrors the resulting page state. [`PageSimulator`] pairs it with a
//! [`PageApp`] and drives time explicitly, so timer behavior can be asserted
//! to the millisecond.
//!
//! # Example
//!
//! ```
//! use terreiro_core::PageConfig;
//! use terreiro_runtime::simulator::{PageSimulator, RecordingHost};
//! use terreiro_runtime::{ModalState, Msg};
//! use std::time::Duration;
//!
//! let mut sim = PageSimulator::new(PageConfig::default(), RecordingHost::full_page(vec![5]));
//! sim.init();
//! sim.send(Msg::FloatingTriggerClicked);
//! assert_eq!(sim.app().modal_state(), ModalState::Open);
//! sim.advance(Duration::from_millis(4500));
//! assert!(sim.app().toasts().is_empty());
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use terreiro_core::{FormSource, PageConfig, UiElement};
use terreiro_widgets::{CopyButtonFace, StarGroup, StarVisual, Toast, ToastId, ToastKind};

use crate::app::{Msg, PageApp};
use crate::host::{ClipboardError, PageHost};

/// Label the recording host reports for an untouched copy button.
pub const DEFAULT_COPY_LABEL: &str = r#"<i class="fas fa-copy"></i> Copiar"#;

/// One recorded host call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    SetModalVisible(bool),
    SetScrollLocked(bool),
    ResetForm(FormSource),
    SelectService(String),
    OpenOutbound(String),
    RenderStars { group: usize, active: usize },
    MountToast { id: ToastId, kind: ToastKind, message: String },
    BeginToastExit(ToastId),
    RemoveToast(ToastId),
    SetCopyButton(CopyButtonFace),
    SetNavOpen(bool),
    ScrollIntoView(String),
    RevealFloatingTrigger,
    SetFloatingPulse(bool),
    WriteClipboard(String),
}

/// In-memory page.
#[derive(Debug, Clone)]
pub struct RecordingHost {
    present: Vec<UiElement>,
    star_groups: Vec<usize>,
    /// Text inside the donation key element.
    pub pix_text: Option<String>,
    /// Current copy button inner HTML.
    pub copy_label: String,
    /// Ids that [`PageHost::scroll_into_view`] can find.
    pub anchors: Vec<String>,
    random: VecDeque<usize>,
    /// Outcome queued for the next clipboard write. `None` leaves the write
    /// pending until the test sends [`Msg::ClipboardWritten`] itself.
    pub clipboard_outcome: Option<Result<(), ClipboardError>>,
    pending_clipboard: Option<Result<(), ClipboardError>>,

    pub calls: Vec<HostCall>,
    pub modal_visible: bool,
    pub scroll_locked: bool,
    pub nav_open: bool,
    pub floating_visible: bool,
    pub floating_pulsing: bool,
    pub selected_service: Option<String>,
    pub opened_urls: Vec<String>,
    pub clipboard: Option<String>,
    pub stars: Vec<Vec<StarVisual>>,
    pub toasts: Vec<Toast>,
}

impl RecordingHost {
    /// A page with every element and the given star groups.
    #[must_use]
    pub fn full_page(star_groups: Vec<usize>) -> Self {
        Self {
            present: UiElement::ALL.to_vec(),
            stars: star_groups
                .iter()
                .map(|len| vec![StarVisual::default(); *len])
                .collect(),
            star_groups,
            pix_text: Some("axe@terreiro.org".to_string()),
            copy_label: DEFAULT_COPY_LABEL.to_string(),
            anchors: Vec::new(),
            random: VecDeque::new(),
            clipboard_outcome: Some(Ok(())),
            pending_clipboard: None,
            calls: Vec::new(),
            modal_visible: false,
            scroll_locked: false,
            nav_open: false,
            floating_visible: false,
            floating_pulsing: true,
            selected_service: None,
            opened_urls: Vec::new(),
            clipboard: None,
            toasts: Vec::new(),
        }
    }

    /// A page with no elements at all.
    #[must_use]
    pub fn empty_page() -> Self {
        let mut host = Self::full_page(Vec::new());
        host.present.clear();
        host.pix_text = None;
        host
    }

    /// Remove `element` from the page.
    #[must_use]
    pub fn without(mut self, element: UiElement) -> Self {
        self.present.retain(|el| *el != element);
        self
    }

    /// Add an anchor target id.
    #[must_use]
    pub fn with_anchor(mut self, id: &str) -> Self {
        self.anchors.push(id.to_string());
        self
    }

    /// Queue values returned by [`PageHost::random_index`]. Once drained it
    /// returns `0`.
    #[must_use]
    pub fn with_random(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.random.extend(picks);
        self
    }

    /// Set the outcome of subsequent clipboard writes.
    #[must_use]
    pub fn with_clipboard(mut self, outcome: Option<Result<(), ClipboardError>>) -> Self {
        self.clipboard_outcome = outcome;
        self
    }

    /// Toasts that were ever mounted, oldest first.
    pub fn mounted_toasts(&self) -> impl Iterator<Item = (&ToastKind, &str)> {
        self.calls.iter().filter_map(|call| match call {
            HostCall::MountToast { kind, message, .. } => Some((kind, message.as_str())),
            _ => None,
        })
    }

    /// Message of the most recently mounted toast.
    #[must_use]
    pub fn last_toast_message(&self) -> Option<&str> {
        self.mounted_toasts().last().map(|(_, msg)| msg)
    }

    /// Take the completion of the last clipboard write, if any.
    pub fn take_clipboard_completion(&mut self) -> Option<Result<(), ClipboardError>> {
        self.pending_clipboard.take()
    }
}

impl PageHost for RecordingHost {
    fn has_element(&self, element: UiElement) -> bool {
        self.present.contains(&element)
    }

    fn star_groups(&self) -> Vec<usize> {
        self.star_groups.clone()
    }

    fn element_text(&self, element: UiElement) -> Option<String> {
        match element {
            UiElement::PixKey => self.pix_text.clone(),
            _ => None,
        }
    }

    fn copy_button_label(&self) -> Option<String> {
        Some(self.copy_label.clone())
    }

    fn random_index(&mut self, len: usize) -> usize {
        self.random.pop_front().unwrap_or(0) % len.max(1)
    }

    fn set_modal_visible(&mut self, visible: bool) {
        self.modal_visible = visible;
        self.calls.push(HostCall::SetModalVisible(visible));
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
        self.calls.push(HostCall::SetScrollLocked(locked));
    }

    fn reset_form(&mut self, source: FormSource) {
        if source == FormSource::Modal {
            self.selected_service = None;
        }
        self.calls.push(HostCall::ResetForm(source));
    }

    fn select_service(&mut self, service: &str) {
        self.selected_service = Some(service.to_string());
        self.calls.push(HostCall::SelectService(service.to_string()));
    }

    fn open_outbound(&mut self, url: &str) {
        self.opened_urls.push(url.to_string());
        self.calls.push(HostCall::OpenOutbound(url.to_string()));
    }

    fn render_stars(&mut self, group: usize, stars: &StarGroup) {
        if let Some(slot) = self.stars.get_mut(group) {
            *slot = stars.stars().to_vec();
        }
        self.calls.push(HostCall::RenderStars {
            group,
            active: stars.active_indices().count(),
        });
    }

    fn mount_toast(&mut self, toast: &Toast) {
        self.toasts.push(toast.clone());
        self.calls.push(HostCall::MountToast {
            id: toast.id,
            kind: toast.kind,
            message: toast.message.clone(),
        });
    }

    fn begin_toast_exit(&mut self, id: ToastId) {
        self.calls.push(HostCall::BeginToastExit(id));
    }

    fn remove_toast(&mut self, id: ToastId) {
        self.toasts.retain(|t| t.id != id);
        self.calls.push(HostCall::RemoveToast(id));
    }

    fn set_copy_button(&mut self, face: &CopyButtonFace) {
        self.copy_label = face.label_html.clone();
        self.calls.push(HostCall::SetCopyButton(face.clone()));
    }

    fn set_nav_open(&mut self, open: bool) {
        self.nav_open = open;
        self.calls.push(HostCall::SetNavOpen(open));
    }

    fn scroll_into_view(&mut self, id: &str) -> bool {
        self.calls.push(HostCall::ScrollIntoView(id.to_string()));
        self.anchors.iter().any(|a| a == id)
    }

    fn reveal_floating_trigger(&mut self) {
        self.floating_visible = true;
        self.calls.push(HostCall::RevealFloatingTrigger);
    }

    fn set_floating_pulse(&mut self, running: bool) {
        self.floating_pulsing = running;
        self.calls.push(HostCall::SetFloatingPulse(running));
    }

    fn write_clipboard(&mut self, text: &str) {
        self.calls.push(HostCall::WriteClipboard(text.to_string()));
        if let Some(Ok(())) = self.clipboard_outcome {
            self.clipboard = Some(text.to_string());
        }
        self.pending_clipboard = self.clipboard_outcome.clone();
    }
}

/// Runs a [`PageApp`] against a [`RecordingHost`] on simulated time.
///
/// Clipboard completions are delivered right after the message that
/// started the write, like a promise that resolves on the next microtask.
#[derive(Debug)]
pub struct PageSimulator {
    app: PageApp,
    host: RecordingHost,
    now: Duration,
}

impl PageSimulator {
    #[must_use]
    pub fn new(config: PageConfig, host: RecordingHost) -> Self {
        Self {
            app: PageApp::new(config),
            host,
            now: Duration::ZERO,
        }
    }

    pub fn init(&mut self) {
        self.app.init(&mut self.host);
    }

    /// Deliver `msg`, then any clipboard completion it produced.
    pub fn send(&mut self, msg: Msg) {
        self.app.update(msg, &mut self.host);
        if let Some(result) = self.host.take_clipboard_completion() {
            self.app.update(Msg::ClipboardWritten(result), &mut self.host);
        }
    }

    /// Move simulated time forward and run due timers.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
        self.app.tick(self.now, &mut self.host);
    }

    /// Move forward `ms` milliseconds.
    pub fn advance_ms(&mut self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    #[must_use]
    pub fn app(&self) -> &PageApp {
        &self.app
    }

    #[must_use]
    pub fn host(&self) -> &RecordingHost {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut RecordingHost {
        &mut self.host
    }

    /// Forget recorded calls, keeping mirrored state.
    pub fn clear_calls(&mut self) {
        self.host.calls.clear();
    }
}
