#![forbid(unsafe_code)]

//! Testimonial records and form field extraction.

use chrono::{DateTime, FixedOffset};

use crate::config::MessageCatalog;

/// Field keys, modal names first, inline names as fallback.
pub const NAME_KEYS: [&str; 2] = ["name", "testimonial-name"];
pub const SERVICE_KEYS: [&str; 2] = ["service", "testimonial-service"];
pub const MESSAGE_KEYS: [&str; 2] = ["message", "testimonial-message"];

/// Ordered `(key, value)` pairs read from a submitted form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    entries: Vec<(String, String)>,
}

impl FormFields {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field. Duplicate keys are kept in order.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Builder form of [`push`](Self::push).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    /// First non-empty value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, v)| k == key && !v.is_empty())
            .map(|(_, v)| v.as_str())
    }

    /// First non-empty value across `keys`, tried in order.
    #[must_use]
    pub fn first_of(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.get(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A structured record extracted from one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Testimonial {
    pub name: String,
    pub service: String,
    /// Required; empty when the form had no message.
    pub message: String,
    /// `0` means "not rated".
    pub rating: u8,
    pub timestamp: DateTime<FixedOffset>,
}

impl Testimonial {
    /// Extract a testimonial from form fields, applying the catalog defaults
    /// for `name` and `service`.
    #[must_use]
    pub fn extract(
        fields: &FormFields,
        rating: u8,
        timestamp: DateTime<FixedOffset>,
        catalog: &MessageCatalog,
    ) -> Self {
        Self {
            name: fields
                .first_of(&NAME_KEYS)
                .unwrap_or(catalog.anonymous_name.as_str())
                .to_string(),
            service: fields
                .first_of(&SERVICE_KEYS)
                .unwrap_or(catalog.general_service.as_str())
                .to_string(),
            message: fields.first_of(&MESSAGE_KEYS).unwrap_or_default().to_string(),
            rating,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<FixedOffset> {
        FixedOffset::west_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 17, 14, 3, 9)
            .unwrap()
    }

    #[test]
    fn modal_keys_take_precedence() {
        let fields = FormFields::new()
            .with("testimonial-name", "Inline")
            .with("name", "Modal");
        let t = Testimonial::extract(&fields, 3, ts(), &MessageCatalog::default());
        assert_eq!(t.name, "Modal");
    }

    #[test]
    fn inline_keys_are_fallback() {
        let fields = FormFields::new()
            .with("testimonial-name", "Maria")
            .with("testimonial-service", "Limpeza Espiritual")
            .with("testimonial-message", "Grata");
        let t = Testimonial::extract(&fields, 5, ts(), &MessageCatalog::default());
        assert_eq!(t.name, "Maria");
        assert_eq!(t.service, "Limpeza Espiritual");
        assert_eq!(t.message, "Grata");
        assert_eq!(t.rating, 5);
    }

    #[test]
    fn empty_values_fall_through_to_defaults() {
        let fields = FormFields::new().with("name", "").with("service", "");
        let t = Testimonial::extract(&fields, 0, ts(), &MessageCatalog::default());
        assert_eq!(t.name, "Anônimo");
        assert_eq!(t.service, "Experiência Geral");
        assert_eq!(t.message, "");
    }

    #[test]
    fn empty_modal_value_falls_back_to_inline_key() {
        let fields = FormFields::new()
            .with("message", "")
            .with("testimonial-message", "Axé");
        assert_eq!(fields.first_of(&MESSAGE_KEYS), Some("Axé"));
    }

    #[test]
    fn from_iterator_preserves_order() {
        let fields: FormFields = [("name", "a"), ("name", "b")].into_iter().collect();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("name"), Some("a"));
    }
}
