#![forbid(unsafe_code)]

//! Terreiro public facade crate.
//!
//! Re-exports the page vocabulary, widgets, and controller from the internal
//! crates and offers a prelude plus a headless helper for composing outbound
//! testimonial links without a page.

use std::fmt;

use chrono::{DateTime, FixedOffset};

// --- Core re-exports -------------------------------------------------------

pub use terreiro_core::{
    ConfigError, DeterministicClock, ElementCache, FormFields, FormSource, MessageCatalog,
    OutboundLink, PageConfig, Testimonial, Timings, UiElement, ValidationError,
    ValidationResult, WhatsAppConfig, format_testimonial_message, rating_bar,
    validate_testimonial,
};

// --- Widget re-exports -----------------------------------------------------

pub use terreiro_widgets::{
    CopyButton, CopyButtonFace, FloatingTrigger, NavMenu, StarGroup, StarHighlight, StarVisual,
    Toast, ToastId, ToastKind, ToastPhase, ToastStack,
};

// --- Runtime re-exports ----------------------------------------------------

pub use terreiro_runtime::{
    ClipboardError, ModalState, Msg, PageApp, PageHost, Scheduler, TimerKey,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type.
#[derive(Debug)]
pub enum Error {
    /// Page config failed to parse or validate.
    Config(ConfigError),
    /// A testimonial was rejected.
    Validation(ValidationError),
    /// The clipboard refused a write.
    Clipboard(ClipboardError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Clipboard(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Clipboard(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<ClipboardError> for Error {
    fn from(err: ClipboardError) -> Self {
        Self::Clipboard(err)
    }
}

/// Standard result type for Terreiro APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Extract, validate, and link a testimonial in one step.
///
/// This is what a submission does minus the page effects.
pub fn compose_outbound(
    config: &PageConfig,
    fields: &FormFields,
    rating: u8,
    submitted_at: DateTime<FixedOffset>,
) -> Result<OutboundLink> {
    let testimonial = Testimonial::extract(fields, rating, submitted_at, &config.messages);
    validate_testimonial(&testimonial).into_result()?;
    Ok(OutboundLink::for_testimonial(
        &config.whatsapp.phone_number,
        &testimonial,
    ))
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Error, FormFields, FormSource, ModalState, Msg, OutboundLink, PageApp, PageConfig,
        PageHost, Result, Testimonial, ToastKind, UiElement, compose_outbound,
    };

    pub use crate::{core, runtime, widgets};
}

pub use terreiro_core as core;
pub use terreiro_runtime as runtime;
pub use terreiro_widgets as widgets;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<FixedOffset> {
        FixedOffset::west_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 17, 14, 3, 9)
            .unwrap()
    }

    #[test]
    fn compose_links_valid_testimonial() {
        let fields = FormFields::new().with("message", "Axé");
        let link = compose_outbound(&PageConfig::default(), &fields, 5, at()).unwrap();
        assert!(link.as_str().starts_with("https://wa.me/5571981962425?text="));
    }

    #[test]
    fn compose_rejects_missing_rating() {
        let fields = FormFields::new().with("message", "Axé");
        let err = compose_outbound(&PageConfig::default(), &fields, 0, at()).unwrap_err();
        assert!(matches!(err, Error::Validation(ref v) if v.code == terreiro_core::validation::ERROR_CODE_MISSING_RATING));
        assert!(err.to_string().starts_with(terreiro_core::validation::ERROR_CODE_MISSING_RATING));
    }

    #[test]
    fn error_sources_chain() {
        let err = Error::from(ClipboardError::NotAvailable);
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.to_string(), "clipboard not available");
    }
}
