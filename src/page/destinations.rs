//! Search form conveniences: date floors and popular-destination cards.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::view::{ElementId, View};

pub const CARD_CLASS: &str = "destination-card";
pub const SEARCH_FORM_CLASS: &str = "search-form";
pub const DESTINATION_ATTR: &str = "data-destination";

/// Forbid picking dates before `today` on every date input.
pub fn set_min_dates(view: &dyn View, today: NaiveDate) -> usize {
    let today = today.format("%Y-%m-%d").to_string();
    let inputs = view.inputs_of_type("date");
    for input in &inputs {
        view.set_attribute(*input, "min", &today);
    }
    inputs.len()
}

/// Copy a card's `ORIGIN-DEST` route into the search form and bring the form
/// into view.
pub fn choose_destination(view: &dyn View, card: ElementId) -> ClientResult<(String, String)> {
    let route = view
        .attribute(card, DESTINATION_ATTR)
        .ok_or_else(|| ClientError::decode("destination card without route"))?;
    let mut parts = route.split('-');
    let origin = parts.next().unwrap_or_default().to_string();
    let destination = parts.next().unwrap_or_default().to_string();

    let origin_input = view.element_by_id("origin").ok_or_else(|| ClientError::missing("origin"))?;
    let destination_input = view
        .element_by_id("destination")
        .ok_or_else(|| ClientError::missing("destination"))?;
    view.set_value(origin_input, &origin);
    view.set_value(destination_input, &destination);

    if let Some(form) = view.elements_with_class(SEARCH_FORM_CLASS).first() {
        view.scroll_into_view(*form);
    }

    debug!("[PAGE] destination picked: {} → {}", origin, destination);
    Ok((origin, destination))
}

#[cfg(test)]
#[path = "../../tests/unit/page/destinations.rs"]
mod tests;
