#![forbid(unsafe_code)]

//! Browser-independent pieces of the web binding.
//!
//! Everything here takes plain Rust values already pulled out of JS, so it
//! compiles and tests on native targets.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use terreiro_core::{ConfigError, FormFields, PageConfig};

/// Id of the optional `<script type="application/json">` config block.
pub const CONFIG_SCRIPT_ID: &str = "terreiro-config";

/// Ids of the inline form controls, in field order.
pub const INLINE_FIELD_IDS: [&str; 3] =
    ["testimonial-name", "testimonial-service", "testimonial-message"];

/// Failures while mounting or talking to the page.
#[derive(Debug)]
pub enum WebError {
    /// No `window` global (not running in a browser main thread).
    NoWindow,
    /// `window.document` is missing.
    NoDocument,
    /// A DOM call threw.
    Js(String),
    /// The page config block did not parse or validate.
    Config(ConfigError),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWindow => write!(f, "no window object"),
            Self::NoDocument => write!(f, "no document on window"),
            Self::Js(msg) => write!(f, "DOM call failed: {msg}"),
            Self::Config(err) => write!(f, "invalid page config: {err}"),
        }
    }
}

impl std::error::Error for WebError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for WebError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Parse the page config block. A missing or blank block means defaults.
pub fn parse_config(raw: Option<&str>) -> Result<PageConfig, WebError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(json) => Ok(PageConfig::from_json(json)?),
        None => Ok(PageConfig::default()),
    }
}

/// Like [`parse_config`], but falls back to defaults with a warning.
#[must_use]
pub fn load_config(raw: Option<&str>) -> PageConfig {
    parse_config(raw).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "falling back to default page config");
        PageConfig::default()
    })
}

/// Convert a JS `Date` reading into a zoned timestamp.
///
/// `tz_offset_minutes` is `Date#getTimezoneOffset()`, which counts minutes
/// *behind* UTC (Brasília gives `180`).
#[must_use]
pub fn timestamp_from_js(epoch_ms: f64, tz_offset_minutes: f64) -> Option<DateTime<FixedOffset>> {
    if !epoch_ms.is_finite() || !tz_offset_minutes.is_finite() {
        return None;
    }
    let offset_secs = (tz_offset_minutes.round() as i32)
        .checked_mul(60)?
        .checked_neg()?;
    let offset = FixedOffset::east_opt(offset_secs)?;
    let utc = DateTime::from_timestamp_millis(epoch_ms as i64)?;
    Some(utc.with_timezone(&offset))
}

/// Map `FormData` entries onto [`FormFields`], skipping non-string values
/// (file inputs).
pub fn fields_from_entries<I>(entries: I) -> FormFields
where
    I: IntoIterator<Item = (String, Option<String>)>,
{
    entries
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect()
}

/// Uniform index in `0..len` from a `Math.random()` sample in `[0, 1)`.
#[must_use]
pub fn index_from_unit(sample: f64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let idx = (sample.clamp(0.0, 1.0) * len as f64).floor() as usize;
    idx.min(len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_is_default() {
        assert_eq!(parse_config(None).unwrap(), PageConfig::default());
        assert_eq!(parse_config(Some("   ")).unwrap(), PageConfig::default());
    }

    #[test]
    fn config_overrides_phone() {
        let config = parse_config(Some(r#"{"whatsapp":{"phone_number":"5511999990000"}}"#)).unwrap();
        assert_eq!(config.whatsapp.phone_number, "5511999990000");
        assert_eq!(config.timings, PageConfig::default().timings);
    }

    #[test]
    fn broken_config_falls_back() {
        assert!(matches!(parse_config(Some("{")), Err(WebError::Config(_))));
        assert_eq!(load_config(Some("{")), PageConfig::default());
    }

    #[test]
    fn timestamp_uses_browser_offset() {
        // 2024-05-17T17:03:09Z
        let ts = timestamp_from_js(1_715_965_389_000.0, 180.0).unwrap();
        assert_eq!(ts.format("%d/%m/%Y %H:%M:%S").to_string(), "17/05/2024 14:03:09");
        assert_eq!(ts.offset().local_minus_utc(), -3 * 3600);
    }

    #[test]
    fn timestamp_rejects_nan() {
        assert!(timestamp_from_js(f64::NAN, 0.0).is_none());
        assert!(timestamp_from_js(0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn entries_skip_blobs() {
        let fields = fields_from_entries([
            ("name".to_string(), Some("Maria".to_string())),
            ("photo".to_string(), None),
        ]);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("name"), Some("Maria"));
    }

    #[test]
    fn random_index_bounds() {
        assert_eq!(index_from_unit(0.0, 4), 0);
        assert_eq!(index_from_unit(0.999_999, 4), 3);
        assert_eq!(index_from_unit(1.0, 4), 3);
        assert_eq!(index_from_unit(0.5, 0), 0);
    }
}
