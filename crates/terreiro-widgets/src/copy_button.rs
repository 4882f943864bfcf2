#![forbid(unsafe_code)]

//! Copy button feedback.
//!
//! After a successful copy the button swaps to a "copied" face for a while
//! and then returns to whatever it showed before. The original label is
//! snapshotted only while the button is idle, so overlapping copies always
//! restore the real original instead of the "copied" label.

/// Background while idle.
pub const IDLE_BACKGROUND: &str = "rgba(255, 255, 255, 0.2)";
/// Background while showing the copied confirmation.
pub const COPIED_BACKGROUND: &str = "rgba(39, 174, 96, 0.3)";

/// What the host should render on the button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyButtonFace {
    /// Inner HTML for the button.
    pub label_html: String,
    pub background: &'static str,
}

/// Feedback state of the copy button.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyButton {
    original: Option<String>,
}

impl CopyButton {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the copied face is showing.
    #[must_use]
    pub fn is_showing_copied(&self) -> bool {
        self.original.is_some()
    }

    /// Switch to the copied face. `current_label` is read from the button and
    /// only kept when the button is idle.
    pub fn show_copied(&mut self, current_label: String, copied_label: &str) -> CopyButtonFace {
        if self.original.is_none() {
            self.original = Some(current_label);
        }
        CopyButtonFace {
            label_html: copied_label.to_string(),
            background: COPIED_BACKGROUND,
        }
    }

    /// Return to the snapshotted face. `None` when already idle.
    pub fn restore(&mut self) -> Option<CopyButtonFace> {
        self.original.take().map(|label_html| CopyButtonFace {
            label_html,
            background: IDLE_BACKGROUND,
        })
    }
}
