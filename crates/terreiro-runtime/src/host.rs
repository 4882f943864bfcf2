#![forbid(unsafe_code)]

//! Page host capability interface.
//!
//! The controller reaches the page only through [`PageHost`]. A DOM host
//! implements it over `web-sys`; tests use
//! [`RecordingHost`](crate::simulator::RecordingHost).

use std::fmt;

use terreiro_core::{FormSource, UiElement};
use terreiro_widgets::{CopyButtonFace, StarGroup, Toast, ToastId};

/// Clipboard write failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// The page has no clipboard API (insecure context, old browser).
    NotAvailable,
    /// The write was rejected (permissions, focus).
    WriteError(String),
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAvailable => write!(f, "clipboard not available"),
            Self::WriteError(msg) => write!(f, "clipboard write failed: {msg}"),
        }
    }
}

impl std::error::Error for ClipboardError {}

/// Everything the controller may ask of the page.
///
/// Methods for elements the cache reported missing are never called.
pub trait PageHost {
    // --- Startup probing --------------------------------------------------

    /// Whether `element` exists. Called once per element at startup.
    fn has_element(&self, element: UiElement) -> bool;

    /// Star count of each star group, in document order.
    fn star_groups(&self) -> Vec<usize>;

    // --- Reads ------------------------------------------------------------

    /// Text content of `element`.
    fn element_text(&self, element: UiElement) -> Option<String>;

    /// Current inner HTML of the copy button.
    fn copy_button_label(&self) -> Option<String>;

    /// Uniform pick in `0..len`. `len` is never zero.
    fn random_index(&mut self, len: usize) -> usize;

    // --- Feedback modal ---------------------------------------------------

    fn set_modal_visible(&mut self, visible: bool);

    /// Lock or restore page scrolling behind the modal.
    fn set_scroll_locked(&mut self, locked: bool);

    fn reset_form(&mut self, source: FormSource);

    /// Select `service` in the modal form's service picker.
    fn select_service(&mut self, service: &str);

    /// Open `url` in a new browsing context. Failures are not reported.
    fn open_outbound(&mut self, url: &str);

    // --- Widgets ----------------------------------------------------------

    fn render_stars(&mut self, group: usize, stars: &StarGroup);

    fn mount_toast(&mut self, toast: &Toast);

    fn begin_toast_exit(&mut self, id: ToastId);

    fn remove_toast(&mut self, id: ToastId);

    fn set_copy_button(&mut self, face: &CopyButtonFace);

    fn set_nav_open(&mut self, open: bool);

    /// Smooth-scroll to the element with `id`. Returns `false` if absent.
    fn scroll_into_view(&mut self, id: &str) -> bool;

    fn reveal_floating_trigger(&mut self);

    fn set_floating_pulse(&mut self, running: bool);

    // --- Async ------------------------------------------------------------

    /// Start a clipboard write. The outcome must come back later as
    /// [`Msg::ClipboardWritten`](crate::app::Msg::ClipboardWritten).
    fn write_clipboard(&mut self, text: &str);
}
