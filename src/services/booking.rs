//! Flight booking and ticket download.

use tracing::{error, info};

use super::{Submission, BOOKING_FAILED};
use crate::backend_client::client::BackendClient;
use crate::types::backend::{BookingRequest, StatusResponse};
use crate::view::View;

/// Session key set once the user is signed in
pub const SESSION_USER: &str = "user_id";

pub async fn book_flight(view: &dyn View, backend: &BackendClient, flight: &BookingRequest) -> Submission {
    if view.session_item(SESSION_USER).is_none() {
        view.navigate("/login");
        return Submission::Navigated("/login".into());
    }

    match backend
        .post_json::<_, StatusResponse>("/api/book", flight)
        .await
    {
        Ok(reply) if reply.is_success() => {
            let reference = reply.booking_reference.unwrap_or_default();
            info!("[FORM] booked {} → {} ref={}", flight.origin, flight.destination, reference);
            let url = format!("/confirmation?ref={}", reference);
            view.navigate(&url);
            Submission::Navigated(url)
        }
        Ok(reply) => {
            let message = reply.message_or_default();
            view.alert(&message);
            Submission::Alerted(message)
        }
        Err(e) => {
            error!("[FORM] booking failed: {}", e);
            view.alert(BOOKING_FAILED);
            Submission::Alerted(BOOKING_FAILED.into())
        }
    }
}

/// Ticket generation lives on the server; the page only announces it.
pub fn download_ticket(view: &dyn View, booking_ref: &str) -> Submission {
    let message = format!("The ticket for booking {} will be downloaded", booking_ref);
    view.alert(&message);
    Submission::Alerted(message)
}
