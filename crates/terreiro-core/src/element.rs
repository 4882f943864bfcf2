#![forbid(unsafe_code)]

//! Logical page elements and the startup element cache.

use std::fmt;

/// Logical names for the page elements the controller cares about.
///
/// Collections (star groups, feedback links, nav links, in-page anchors) are
/// not listed here: hosts bind them individually and report them through
/// events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UiElement {
    /// `#floatingFeedback`
    FloatingTrigger,
    /// `#feedbackModal`
    Modal,
    /// `.close-modal`
    CloseModal,
    /// `.testimonial-form`
    InlineForm,
    /// `.modal-feedback-form`
    ModalForm,
    /// `.nav-toggle`
    NavToggle,
    /// `.nav-menu`
    NavMenu,
    /// `#pixKey`
    PixKey,
    /// `.copy-btn-compact`
    CopyButton,
}

impl UiElement {
    /// Every element, in cache order.
    pub const ALL: [Self; 9] = [
        Self::FloatingTrigger,
        Self::Modal,
        Self::CloseModal,
        Self::InlineForm,
        Self::ModalForm,
        Self::NavToggle,
        Self::NavMenu,
        Self::PixKey,
        Self::CopyButton,
    ];

    /// CSS selector used by DOM hosts to locate the element.
    #[must_use]
    pub const fn selector(self) -> &'static str {
        match self {
            Self::FloatingTrigger => "#floatingFeedback",
            Self::Modal => "#feedbackModal",
            Self::CloseModal => ".close-modal",
            Self::InlineForm => ".testimonial-form",
            Self::ModalForm => ".modal-feedback-form",
            Self::NavToggle => ".nav-toggle",
            Self::NavMenu => ".nav-menu",
            Self::PixKey => "#pixKey",
            Self::CopyButton => ".copy-btn-compact",
        }
    }

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for UiElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}

/// Which testimonial form a submission came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormSource {
    /// The form embedded in the page body.
    Inline,
    /// The form inside the feedback modal.
    Modal,
}

impl FormSource {
    /// The element hosting this form.
    #[must_use]
    pub const fn element(self) -> UiElement {
        match self {
            Self::Inline => UiElement::InlineForm,
            Self::Modal => UiElement::ModalForm,
        }
    }
}

/// Which page elements exist, probed once at startup.
///
/// Elements are never re-queried: a feature whose elements were absent at
/// startup stays disabled for the lifetime of the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementCache {
    present: u16,
    star_groups: Vec<usize>,
}

impl ElementCache {
    /// Build a cache by probing each element once.
    pub fn probe(mut has: impl FnMut(UiElement) -> bool, star_groups: Vec<usize>) -> Self {
        let present = UiElement::ALL
            .iter()
            .filter(|el| has(**el))
            .fold(0u16, |acc, el| acc | el.bit());
        Self {
            present,
            star_groups,
        }
    }

    /// A cache where every element exists.
    #[must_use]
    pub fn full(star_groups: Vec<usize>) -> Self {
        Self::probe(|_| true, star_groups)
    }

    #[must_use]
    pub fn has(&self, element: UiElement) -> bool {
        self.present & element.bit() != 0
    }

    #[must_use]
    pub fn has_all(&self, elements: &[UiElement]) -> bool {
        elements.iter().all(|el| self.has(*el))
    }

    /// Star count of each rendered star group, in document order.
    #[must_use]
    pub fn star_groups(&self) -> &[usize] {
        &self.star_groups
    }

    /// Elements the probe did not find.
    pub fn missing(&self) -> impl Iterator<Item = UiElement> + '_ {
        UiElement::ALL.into_iter().filter(|el| !self.has(*el))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_records_presence() {
        let cache = ElementCache::probe(
            |el| matches!(el, UiElement::Modal | UiElement::PixKey),
            vec![5],
        );
        assert!(cache.has(UiElement::Modal));
        assert!(cache.has(UiElement::PixKey));
        assert!(!cache.has(UiElement::CopyButton));
        assert!(!cache.has_all(&[UiElement::PixKey, UiElement::CopyButton]));
        assert_eq!(cache.star_groups(), &[5]);
    }

    #[test]
    fn full_cache_has_everything() {
        let cache = ElementCache::full(vec![]);
        assert!(UiElement::ALL.iter().all(|el| cache.has(*el)));
        assert_eq!(cache.missing().count(), 0);
    }

    #[test]
    fn missing_lists_absent_elements_in_order() {
        let cache = ElementCache::probe(|el| el != UiElement::NavMenu, vec![]);
        assert_eq!(cache.missing().collect::<Vec<_>>(), vec![UiElement::NavMenu]);
    }

    #[test]
    fn probe_queries_each_element_once() {
        let mut calls = 0;
        let _ = ElementCache::probe(
            |_| {
                calls += 1;
                false
            },
            vec![],
        );
        assert_eq!(calls, UiElement::ALL.len());
    }

    #[test]
    fn form_source_maps_to_element() {
        assert_eq!(FormSource::Inline.element(), UiElement::InlineForm);
        assert_eq!(FormSource::Modal.element(), UiElement::ModalForm);
    }
}
