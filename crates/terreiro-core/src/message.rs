#![forbid(unsafe_code)]

//! Outbound message formatting and the WhatsApp deep link.
//!
//! The text layout is a contract with the people reading the messages on the
//! other end: field order, emoji and markdown markers must stay exactly as
//! produced here.

use std::fmt;
use std::fmt::Write as _;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::testimonial::Testimonial;
use crate::validation::MAX_RATING;

/// Filled rating glyph.
pub const STAR_FILLED: &str = "⭐";
/// Empty rating glyph.
pub const STAR_EMPTY: &str = "☆";

const WHATSAPP_BASE: &str = "https://wa.me/";

/// Characters `encodeURIComponent` leaves untouched.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// `rating` filled glyphs followed by `5 - rating` empty ones.
///
/// Ratings above five are clamped so the empty count never goes negative.
#[must_use]
pub fn rating_bar(rating: u8) -> String {
    let filled = usize::from(rating.min(MAX_RATING));
    let empty = usize::from(MAX_RATING) - filled;
    let mut bar = String::with_capacity(filled * STAR_FILLED.len() + empty * STAR_EMPTY.len());
    bar.push_str(&STAR_FILLED.repeat(filled));
    bar.push_str(&STAR_EMPTY.repeat(empty));
    bar
}

/// Render the outbound text block for a testimonial.
///
/// Date and time come from the timestamp's own offset, in pt-BR order.
#[must_use]
pub fn format_testimonial_message(testimonial: &Testimonial) -> String {
    let mut out = String::with_capacity(256 + testimonial.message.len());
    // Writing into a String cannot fail.
    let _ = write!(
        out,
        "🕊️ *NOVO TESTEMUNHO ESPIRITUAL* 🕊️\n\n\
         👤 *Nome:* {name}\n\
         ⭐ *Avaliação:* {bar} ({rating}/5)\n\
         🙏 *Tipo de Trabalho:* {service}\n\
         💬 *Testemunho:*\n\"{message}\"\n\n\
         📅 *Data:* {date}\n\
         🕐 *Horário:* {time}\n\n\
         🌟 _Que a luz dos Orixás continue abençoando este irmão!_\n\
         ✨ _Axé!_",
        name = testimonial.name,
        bar = rating_bar(testimonial.rating),
        rating = testimonial.rating,
        service = testimonial.service,
        message = testimonial.message,
        date = testimonial.timestamp.format("%d/%m/%Y"),
        time = testimonial.timestamp.format("%H:%M:%S"),
    );
    out
}

/// A pre-filled WhatsApp deep link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundLink {
    url: String,
}

impl OutboundLink {
    /// `https://wa.me/<phone>?text=<encoded text>`.
    #[must_use]
    pub fn whatsapp(phone_number: &str, text: &str) -> Self {
        let encoded = utf8_percent_encode(text, URI_COMPONENT);
        Self {
            url: format!("{WHATSAPP_BASE}{phone_number}?text={encoded}"),
        }
    }

    /// Format a testimonial and wrap it in a link.
    #[must_use]
    pub fn for_testimonial(phone_number: &str, testimonial: &Testimonial) -> Self {
        Self::whatsapp(phone_number, &format_testimonial_message(testimonial))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.url
    }
}

impl fmt::Display for OutboundLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use pretty_assertions::assert_eq;

    fn maria(rating: u8) -> Testimonial {
        Testimonial {
            name: "Maria".into(),
            service: "Limpeza Espiritual".into(),
            message: "Grata".into(),
            rating,
            timestamp: FixedOffset::west_opt(3 * 3600)
                .unwrap()
                .with_ymd_and_hms(2024, 5, 7, 9, 3, 5)
                .unwrap(),
        }
    }

    #[test]
    fn rating_bar_counts() {
        assert_eq!(rating_bar(0), "☆☆☆☆☆");
        assert_eq!(rating_bar(3), "⭐⭐⭐☆☆");
        assert_eq!(rating_bar(5), "⭐⭐⭐⭐⭐");
        assert_eq!(rating_bar(9), "⭐⭐⭐⭐⭐");
    }

    #[test]
    fn formats_full_block() {
        let expected = "🕊️ *NOVO TESTEMUNHO ESPIRITUAL* 🕊️\n\n\
                        👤 *Nome:* Maria\n\
                        ⭐ *Avaliação:* ⭐⭐⭐⭐⭐ (5/5)\n\
                        🙏 *Tipo de Trabalho:* Limpeza Espiritual\n\
                        💬 *Testemunho:*\n\"Grata\"\n\n\
                        📅 *Data:* 07/05/2024\n\
                        🕐 *Horário:* 09:03:05\n\n\
                        🌟 _Que a luz dos Orixás continue abençoando este irmão!_\n\
                        ✨ _Axé!_";
        assert_eq!(format_testimonial_message(&maria(5)), expected);
    }

    #[test]
    fn five_star_block_has_no_empty_glyphs() {
        let text = format_testimonial_message(&maria(5));
        assert!(!text.contains(STAR_EMPTY));
    }

    #[test]
    fn uses_timestamp_offset_for_date() {
        let mut t = maria(1);
        t.timestamp = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 12, 31, 23, 59, 59)
            .unwrap();
        let text = format_testimonial_message(&t);
        assert!(text.contains("📅 *Data:* 31/12/2024\n"));
        assert!(text.contains("🕐 *Horário:* 23:59:59\n"));
    }

    #[test]
    fn link_encodes_like_encode_uri_component() {
        let link = OutboundLink::whatsapp("5571981962425", "Olá (mãe)! a+b=c/d?*~'_.-");
        assert_eq!(
            link.as_str(),
            "https://wa.me/5571981962425?text=Ol%C3%A1%20(m%C3%A3e)!%20a%2Bb%3Dc%2Fd%3F*~'_.-"
        );
    }

    #[test]
    fn link_encodes_newlines_and_quotes() {
        let link = OutboundLink::whatsapp("1", "a\n\"b\"");
        assert_eq!(link.to_string(), "https://wa.me/1?text=a%0A%22b%22");
    }

    #[test]
    fn testimonial_link_starts_with_base() {
        let link = OutboundLink::for_testimonial("5571981962425", &maria(4));
        assert!(link.as_str().starts_with("https://wa.me/5571981962425?text=%F0%9F%95%8A"));
        assert!(!link.as_str().contains(' '));
    }
}
