//! Property-based invariants for the star rating group.
//!
//! Verifies:
//! 1. Clicking star `i` yields rating `i + 1` and exactly stars `0..=i` active.
//! 2. Leaving without a click leaves every star neutral.
//! 3. Leaving after clicking `i` lights exactly stars `0..=i`, whatever was hovered.
//! 4. Hover never changes the active set.

use proptest::prelude::*;
use terreiro_widgets::StarGroup;

proptest! {
    #[test]
    fn click_sets_prefix(index in 0usize..5) {
        let mut group = StarGroup::new(5);
        prop_assert_eq!(group.click(index), Some(index as u8 + 1));
        let active: Vec<usize> = group.active_indices().collect();
        prop_assert_eq!(active, (0..=index).collect::<Vec<_>>());
    }

    #[test]
    fn leave_without_click_is_neutral(hovers in prop::collection::vec(0usize..5, 0..10)) {
        let mut group = StarGroup::new(5);
        for h in hovers {
            group.hover(h);
        }
        group.leave(0);
        prop_assert_eq!(group.lit_indices().count(), 0);
        prop_assert_eq!(group.active_indices().count(), 0);
    }

    #[test]
    fn leave_restores_clicked(index in 0usize..5, hovers in prop::collection::vec(0usize..5, 0..10)) {
        let mut group = StarGroup::new(5);
        let rating = group.click(index).unwrap();
        for h in hovers {
            group.hover(h);
        }
        group.leave(rating);
        let lit: Vec<usize> = group.lit_indices().collect();
        prop_assert_eq!(lit, (0..=index).collect::<Vec<_>>());
    }

    #[test]
    fn hover_keeps_active_set(index in 0usize..5, hover in 0usize..5) {
        let mut group = StarGroup::new(5);
        group.click(index);
        let before: Vec<usize> = group.active_indices().collect();
        group.hover(hover);
        let after: Vec<usize> = group.active_indices().collect();
        prop_assert_eq!(before, after);
    }
}
