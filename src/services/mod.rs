//! Form submission handlers backed by the booking server.
//!
//! Transport failures are logged and surfaced through a generic alert; no
//! handler retries.

pub mod auth;
pub mod booking;
pub mod search;
pub mod subscribe;

pub const LOGIN_FAILED: &str = "An error occurred while signing in";
pub const REGISTER_FAILED: &str = "An error occurred during registration";
pub const BOOKING_FAILED: &str = "An error occurred while booking";
pub const SEARCH_FAILED: &str = "An error occurred while searching. Please try again.";
pub const SUBSCRIBE_FAILED: &str = "An error occurred while subscribing";

/// Outcome of a form handler, as seen by the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The page navigated away
    Navigated(String),
    /// A message was shown and the page stayed
    Alerted(String),
    /// The document was replaced by the server's page
    Replaced,
    /// Nothing to submit
    Skipped,
}
