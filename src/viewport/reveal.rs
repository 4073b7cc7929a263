//! Scroll-triggered reveal of content cards.

use crate::view::View;

pub const CARD_CLASS: &str = "glass-card";
pub const REVEAL_ANIMATION: &str = "fadeInUp 0.8s ease forwards";

/// Start the reveal animation on every card whose top edge has risen above
/// the lower quarter of the viewport. Returns how many cards qualified.
pub fn reveal_cards(view: &dyn View) -> usize {
    let threshold = view.viewport().height / 1.3;
    let mut revealed = 0;
    for card in view.elements_with_class(CARD_CLASS) {
        let Some(rect) = view.bounding_rect(card) else {
            continue;
        };
        if rect.y0 < threshold {
            view.set_style(card, "animation", REVEAL_ANIMATION);
            revealed += 1;
        }
    }
    revealed
}

#[cfg(test)]
#[path = "../../tests/unit/viewport/reveal.rs"]
mod tests;
