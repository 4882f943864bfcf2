#![forbid(unsafe_code)]

//! Runtime: the page controller and its timer machinery.
//!
//! # Architecture
//!
//! - [`PageApp`] holds every piece of mutable page state and handles [`Msg`].
//! - [`Scheduler`] owns delayed work as keyed, cancelable timers.
//! - [`PageHost`] is the only way out to the page. The browser binding
//!   implements it over the DOM; [`simulator::RecordingHost`] implements it in
//!   memory for tests.
//!
//! Time only moves when the host calls [`PageApp::tick`], which keeps every
//! timer-driven behavior reproducible under test.

pub mod app;
pub mod host;
pub mod scheduler;
pub mod simulator;

pub use app::{ModalState, Msg, PageApp};
pub use host::{ClipboardError, PageHost};
pub use scheduler::{Scheduler, TimerKey};
