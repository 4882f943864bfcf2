#![forbid(unsafe_code)]

//! Core: page configuration, element vocabulary, testimonial model,
//! validation, and outbound message formatting.
//!
//! Nothing in this crate touches the DOM or reads the wall clock. Hosts hand
//! in form contents and timestamps; everything here is a pure function of its
//! inputs so it can be tested natively.

pub mod clock;
pub mod config;
pub mod element;
pub mod message;
pub mod testimonial;
pub mod utils;
pub mod validation;

pub use clock::DeterministicClock;
pub use config::{ConfigError, MessageCatalog, PageConfig, Timings, WhatsAppConfig};
pub use element::{ElementCache, FormSource, UiElement};
pub use message::{OutboundLink, format_testimonial_message, rating_bar};
pub use testimonial::{FormFields, Testimonial};
pub use validation::{ValidationError, ValidationResult, validate_testimonial};

// Re-export tracing macros at crate root for ergonomic use.
pub use tracing::{debug, error, info, trace, warn};
