#![forbid(unsafe_code)]

//! Page configuration.
//!
//! Every field has a default matching the production page, so an empty JSON
//! object (or no config block at all) yields a working controller. Hosts may
//! override any subset through [`PageConfig::from_json`].

use core::time::Duration;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of blessing lines, one per star.
pub const BLESSING_COUNT: usize = 5;

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    Parse(serde_json::Error),
    /// The outbound phone number is empty or contains non-digits.
    InvalidPhone(String),
    /// A message pool that must not be empty is empty.
    EmptyPool(&'static str),
    /// The blessing list does not have one entry per star.
    BlessingCount(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid page config: {err}"),
            Self::InvalidPhone(phone) => {
                write!(f, "phone number must be digits only (got {phone:?})")
            }
            Self::EmptyPool(name) => write!(f, "message pool `{name}` is empty"),
            Self::BlessingCount(n) => {
                write!(f, "expected {BLESSING_COUNT} blessing lines, got {n}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

/// Top-level page configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub whatsapp: WhatsAppConfig,
    pub timings: Timings,
    pub messages: MessageCatalog,
}

impl PageConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let phone = &self.whatsapp.phone_number;
        if phone.is_empty() || !phone.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::InvalidPhone(phone.clone()));
        }
        if self.messages.blessings.len() != BLESSING_COUNT {
            return Err(ConfigError::BlessingCount(self.messages.blessings.len()));
        }
        if self.messages.success.is_empty() {
            return Err(ConfigError::EmptyPool("success"));
        }
        Ok(())
    }
}

/// Outbound messaging target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhatsAppConfig {
    /// International phone number, digits only.
    pub phone_number: String,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            phone_number: "5571981962425".to_string(),
        }
    }
}

/// Timer settings, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub floating_reveal_ms: u64,
    pub pulse_interval_ms: u64,
    pub pulse_restart_ms: u64,
    pub toast_timeout_ms: u64,
    pub toast_exit_ms: u64,
    pub auto_close_ms: u64,
    pub outbound_confirm_ms: u64,
    pub copy_restore_ms: u64,
    /// How often the web host pumps the scheduler.
    pub pump_interval_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            floating_reveal_ms: 3000,
            pulse_interval_ms: 30_000,
            pulse_restart_ms: 100,
            toast_timeout_ms: 4000,
            toast_exit_ms: 500,
            auto_close_ms: 2000,
            outbound_confirm_ms: 1000,
            copy_restore_ms: 2000,
            pump_interval_ms: 50,
        }
    }
}

impl Timings {
    pub fn floating_reveal(&self) -> Duration {
        Duration::from_millis(self.floating_reveal_ms)
    }

    pub fn pulse_interval(&self) -> Duration {
        Duration::from_millis(self.pulse_interval_ms)
    }

    pub fn pulse_restart(&self) -> Duration {
        Duration::from_millis(self.pulse_restart_ms)
    }

    pub fn toast_timeout(&self) -> Duration {
        Duration::from_millis(self.toast_timeout_ms)
    }

    pub fn toast_exit(&self) -> Duration {
        Duration::from_millis(self.toast_exit_ms)
    }

    pub fn auto_close(&self) -> Duration {
        Duration::from_millis(self.auto_close_ms)
    }

    pub fn outbound_confirm(&self) -> Duration {
        Duration::from_millis(self.outbound_confirm_ms)
    }

    pub fn copy_restore(&self) -> Duration {
        Duration::from_millis(self.copy_restore_ms)
    }

    pub fn pump_interval(&self) -> Duration {
        Duration::from_millis(self.pump_interval_ms.max(1))
    }
}

/// User-facing strings. The page is pt-BR only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageCatalog {
    /// Shown on star click, indexed by `rating - 1`.
    pub blessings: Vec<String>,
    /// Pool for the post-submit success toast.
    pub success: Vec<String>,
    pub modal_opened: String,
    pub validation_warning: String,
    pub outbound_confirmed: String,
    pub copy_succeeded: String,
    pub copy_failed: String,
    /// Button label while the "copied" face is shown.
    pub copied_label: String,
    pub anonymous_name: String,
    pub general_service: String,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self {
            blessings: vec![
                "Que os Orixás nos ajudem a melhorar! 🙏".into(),
                "Agradecemos sua sinceridade, irmão! ✨".into(),
                "Sua opinião nos fortalece! 💙".into(),
                "Que alegria saber de sua satisfação! 🌟".into(),
                "Gratidão eterna por suas palavras! 🕊️".into(),
            ],
            success: vec![
                "Seu testemunho foi enviado com muito amor! Que os Orixás abençoem sua jornada! 🕊️"
                    .into(),
                "Gratidão eterna por compartilhar sua experiência espiritual conosco! ✨".into(),
                "Que a luz divina continue iluminando seu caminho! Axé! 🌟".into(),
                "Seu testemunho fortalece nossa corrente de fé e caridade! 💙".into(),
            ],
            modal_opened: "Que os Orixás abençoem seu testemunho! 🕊️".into(),
            validation_warning: "Por favor, preencha sua experiência e avaliação para que possamos receber sua bênção.".into(),
            outbound_confirmed:
                "Testemunho enviado para nosso WhatsApp! Que os Orixás abençoem! 📱🕊️".into(),
            copy_succeeded: "Chave PIX copiada com sucesso! 📋✨".into(),
            copy_failed: "Erro ao copiar. Tente selecionar manualmente.".into(),
            copied_label: "<i class=\"fas fa-check\"></i> Copiado!".into(),
            anonymous_name: "Anônimo".into(),
            general_service: "Experiência Geral".into(),
        }
    }
}

impl MessageCatalog {
    /// Blessing line for a rating in `1..=5`.
    #[must_use]
    pub fn blessing(&self, rating: u8) -> Option<&str> {
        let idx = usize::from(rating).checked_sub(1)?;
        self.blessings.get(idx).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(PageConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_object_yields_defaults() {
        let config = PageConfig::from_json("{}").unwrap();
        assert_eq!(config, PageConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config =
            PageConfig::from_json(r#"{"timings": {"auto_close_ms": 500}, "whatsapp": {"phone_number": "5511999990000"}}"#)
                .unwrap();
        assert_eq!(config.timings.auto_close(), Duration::from_millis(500));
        assert_eq!(config.timings.toast_timeout_ms, 4000);
        assert_eq!(config.whatsapp.phone_number, "5511999990000");
    }

    #[test]
    fn rejects_non_digit_phone() {
        let err = PageConfig::from_json(r#"{"whatsapp": {"phone_number": "+55 71"}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPhone(_)));
    }

    #[test]
    fn rejects_wrong_blessing_count() {
        let err = PageConfig::from_json(r#"{"messages": {"blessings": ["a", "b"]}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::BlessingCount(2)));
    }

    #[test]
    fn rejects_empty_success_pool() {
        let err = PageConfig::from_json(r#"{"messages": {"success": []}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyPool("success")));
    }

    #[test]
    fn parse_error_has_source() {
        let err = PageConfig::from_json("{not json").unwrap_err();
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("invalid page config"));
    }

    #[test]
    fn blessing_lookup_bounds() {
        let catalog = MessageCatalog::default();
        assert_eq!(catalog.blessing(0), None);
        assert_eq!(catalog.blessing(1), Some("Que os Orixás nos ajudem a melhorar! 🙏"));
        assert!(catalog.blessing(5).is_some());
        assert_eq!(catalog.blessing(6), None);
    }

    #[test]
    fn defaults_round_trip_through_json() {
        let json = serde_json::to_string(&PageConfig::default()).unwrap();
        assert_eq!(PageConfig::from_json(&json).unwrap(), PageConfig::default());
    }

    #[test]
    fn pump_interval_never_zero() {
        let timings = Timings {
            pump_interval_ms: 0,
            ..Timings::default()
        };
        assert_eq!(timings.pump_interval(), Duration::from_millis(1));
    }
}
