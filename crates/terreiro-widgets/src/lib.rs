#![forbid(unsafe_code)]

//! Stateful page widgets.
//!
//! Widgets here own visual state only. They never talk to the DOM: the
//! controller mutates them and hands them to a host to render.

pub mod copy_button;
pub mod floating;
pub mod nav;
pub mod rating;
pub mod toast;

pub use copy_button::{CopyButton, CopyButtonFace};
pub use floating::FloatingTrigger;
pub use nav::{NavMenu, anchor_target};
pub use rating::{StarGroup, StarHighlight, StarVisual};
pub use toast::{Toast, ToastId, ToastKind, ToastPhase, ToastStack};
