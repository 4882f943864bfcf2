#![forbid(unsafe_code)]

//! Transient on-screen notifications ("spiritual messages").
//!
//! Toasts progress through `Visible → Exiting → removed`. The stack only
//! tracks identity and phase; the controller schedules the phase changes
//! and the host mounts, animates and removes the elements.
//!
//! Every call to [`ToastStack::push`] creates an independent toast. There is
//! no deduplication and no cap.

use std::time::Duration;

/// Unique identifier for a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(pub u64);

impl std::fmt::Display for ToastId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Toast flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum ToastKind {
    #[default]
    Success,
    Warning,
}

impl ToastKind {
    /// Modifier class appended to `spiritual-alert`.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
        }
    }

    #[must_use]
    pub const fn background(self) -> &'static str {
        match self {
            Self::Success => "linear-gradient(45deg, #27ae60, #2ecc71)",
            Self::Warning => "linear-gradient(45deg, #f39c12, #e67e22)",
        }
    }

    /// Lenient parse for the JS entry point: anything but "warning" is a
    /// success toast.
    #[must_use]
    pub fn from_js(kind: &str) -> Self {
        if kind.eq_ignore_ascii_case("warning") {
            Self::Warning
        } else {
            Self::Success
        }
    }
}

/// Lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastPhase {
    /// Mounted, entrance animation playing or done.
    #[default]
    Visible,
    /// Exit animation playing; removed once it finishes.
    Exiting,
}

/// One notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub kind: ToastKind,
    pub phase: ToastPhase,
    /// Monotonic time the toast was mounted.
    pub shown_at: Duration,
}

impl Toast {
    pub const ENTER_ANIMATION: &'static str = "slideInRight 0.5s ease";
    pub const EXIT_ANIMATION: &'static str = "slideOutRight 0.5s ease";

    /// Full class attribute.
    #[must_use]
    pub fn class_attr(&self) -> String {
        format!("spiritual-alert {}", self.kind.class_name())
    }

    /// Inline style for the container element.
    #[must_use]
    pub fn css_text(&self) -> String {
        format!(
            "position: fixed; top: 20px; right: 20px; background: {}; color: white; \
             padding: 1rem 1.5rem; border-radius: 10px; box-shadow: 0 10px 30px rgba(0,0,0,0.2); \
             z-index: 10000; display: flex; align-items: center; gap: 0.5rem; \
             max-width: 400px; animation: {};",
            self.kind.background(),
            Self::ENTER_ANIMATION,
        )
    }

    /// Animation to apply for the current phase.
    #[must_use]
    pub const fn animation(&self) -> &'static str {
        match self.phase {
            ToastPhase::Visible => Self::ENTER_ANIMATION,
            ToastPhase::Exiting => Self::EXIT_ANIMATION,
        }
    }
}

/// All toasts currently on screen, oldest first.
#[derive(Debug, Clone, Default)]
pub struct ToastStack {
    toasts: Vec<Toast>,
    next_id: u64,
}

impl ToastStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a toast and return a reference to it.
    pub fn push(&mut self, message: impl Into<String>, kind: ToastKind, now: Duration) -> &Toast {
        self.next_id += 1;
        let id = ToastId(self.next_id);
        tracing::debug!(toast = id.0, kind = kind.class_name(), "toast pushed");
        self.toasts.push(Toast {
            id,
            message: message.into(),
            kind,
            phase: ToastPhase::Visible,
            shown_at: now,
        });
        &self.toasts[self.toasts.len() - 1]
    }

    /// Start the exit transition. Returns `false` for unknown or already
    /// exiting toasts.
    pub fn begin_exit(&mut self, id: ToastId) -> bool {
        match self.toasts.iter_mut().find(|t| t.id == id) {
            Some(toast) if toast.phase == ToastPhase::Visible => {
                toast.phase = ToastPhase::Exiting;
                true
            }
            _ => false,
        }
    }

    /// Drop a toast. Returns the removed toast if it was still tracked.
    pub fn remove(&mut self, id: ToastId) -> Option<Toast> {
        let pos = self.toasts.iter().position(|t| t.id == id)?;
        Some(self.toasts.remove(pos))
    }

    #[must_use]
    pub fn get(&self, id: ToastId) -> Option<&Toast> {
        self.toasts.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut stack = ToastStack::new();
        let a = stack.push("a", ToastKind::Success, Duration::ZERO).id;
        let b = stack.push("a", ToastKind::Success, Duration::ZERO).id;
        assert!(b > a);
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn exit_then_remove() {
        let mut stack = ToastStack::new();
        let id = stack.push("oi", ToastKind::Warning, Duration::ZERO).id;
        assert!(stack.begin_exit(id));
        assert!(!stack.begin_exit(id));
        assert_eq!(stack.get(id).unwrap().animation(), Toast::EXIT_ANIMATION);
        assert_eq!(stack.remove(id).unwrap().message, "oi");
        assert!(stack.remove(id).is_none());
        assert!(stack.is_empty());
    }

    #[test]
    fn kind_styles_differ() {
        assert_ne!(ToastKind::Success.background(), ToastKind::Warning.background());
        let mut stack = ToastStack::new();
        let toast = stack.push("x", ToastKind::Warning, Duration::ZERO);
        assert_eq!(toast.class_attr(), "spiritual-alert warning");
        assert!(toast.css_text().contains("#e67e22"));
        assert!(toast.css_text().contains(Toast::ENTER_ANIMATION));
    }

    #[test]
    fn js_kind_parsing_defaults_to_success() {
        assert_eq!(ToastKind::from_js("Warning"), ToastKind::Warning);
        assert_eq!(ToastKind::from_js("info"), ToastKind::Success);
    }
}
