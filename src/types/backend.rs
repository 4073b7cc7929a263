//! Booking backend request/response types

use serde::{Deserialize, Serialize};

/// Common `{status, message}` envelope returned by the JSON endpoints
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub booking_reference: Option<String>,
}

impl StatusResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    pub fn message_or_default(&self) -> String {
        self.message.clone().unwrap_or_default()
    }
}

/// Price alert subscription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
    pub route: String,
}

/// Flight chosen on the results page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub airline: String,
    pub origin: String,
    pub destination: String,
    pub depart_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
    pub price: i64,
    pub passengers: u32,
}

/// Outcome of posting an HTML form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormReply {
    /// The server redirected; the final URL to navigate to
    Redirected(String),
    /// Rendered page to replace the current document
    Document(String),
}
