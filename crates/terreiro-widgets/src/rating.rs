#![forbid(unsafe_code)]

//! Star rating group.
//!
//! A group is one `.stars` container with its ordered star icons. Each star
//! carries two independent pieces of visual state:
//!
//! - `active`: the persisted selection class, set on click and cleared on reset.
//! - `highlight`: the inline preview color/scale driven by hover and leave.
//!
//! The selected rating itself lives in the controller and is shared by every
//! group on the page.

/// Hover color for lit stars.
pub const LIT_COLOR: &str = "#f39c12";
/// Color for unlit stars.
pub const DIM_COLOR: &str = "#ddd";

/// Preview styling of a single star.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StarHighlight {
    /// Neutral color, normal scale.
    #[default]
    Dim,
    /// Highlight color, normal scale.
    Lit,
    /// Highlight color, enlarged while hovered.
    Hovered,
}

impl StarHighlight {
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Dim => DIM_COLOR,
            Self::Lit | Self::Hovered => LIT_COLOR,
        }
    }

    #[must_use]
    pub const fn transform(self) -> &'static str {
        match self {
            Self::Hovered => "scale(1.1)",
            Self::Dim | Self::Lit => "scale(1)",
        }
    }

    #[must_use]
    pub const fn is_lit(self) -> bool {
        !matches!(self, Self::Dim)
    }
}

/// Full visual state of one star.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StarVisual {
    pub active: bool,
    pub highlight: StarHighlight,
}

/// Visual state of one star group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarGroup {
    stars: Vec<StarVisual>,
}

impl StarGroup {
    /// A group of `len` neutral stars.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            stars: vec![StarVisual::default(); len],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    #[must_use]
    pub fn stars(&self) -> &[StarVisual] {
        &self.stars
    }

    /// Indices of stars carrying the `active` class.
    pub fn active_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.stars
            .iter()
            .enumerate()
            .filter(|(_, s)| s.active)
            .map(|(i, _)| i)
    }

    /// Indices of stars currently lit by the preview styling.
    pub fn lit_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.stars
            .iter()
            .enumerate()
            .filter(|(_, s)| s.highlight.is_lit())
            .map(|(i, _)| i)
    }

    /// Click on star `index`. Returns the new rating, or `None` when the
    /// index is outside the group.
    pub fn click(&mut self, index: usize) -> Option<u8> {
        if index >= self.stars.len() {
            return None;
        }
        let rating = u8::try_from(index + 1).ok()?;
        self.apply_rating(rating);
        Some(rating)
    }

    /// Mark stars `0..rating` active, the rest inactive.
    pub fn apply_rating(&mut self, rating: u8) {
        let rating = usize::from(rating);
        for (i, star) in self.stars.iter_mut().enumerate() {
            star.active = i < rating;
        }
    }

    /// Preview stars `0..=index` without touching the selection.
    pub fn hover(&mut self, index: usize) {
        if index >= self.stars.len() {
            return;
        }
        for (i, star) in self.stars.iter_mut().enumerate() {
            star.highlight = if i <= index {
                StarHighlight::Hovered
            } else {
                StarHighlight::Dim
            };
        }
    }

    /// Pointer left the group: the preview snaps back to `rating`.
    pub fn leave(&mut self, rating: u8) {
        let rating = usize::from(rating);
        for (i, star) in self.stars.iter_mut().enumerate() {
            star.highlight = if i < rating {
                StarHighlight::Lit
            } else {
                StarHighlight::Dim
            };
        }
    }

    /// Drop selection and preview.
    pub fn clear(&mut self) {
        self.stars.fill(StarVisual::default());
    }
}
