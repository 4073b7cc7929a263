//! Client-side controller for the goneflight booking page.
//!
//! The core is the lazy image pipeline: [`viewport::scanner::Scanner`] finds
//! placeholders that overlap the viewport and asks
//! [`cache::image::ImageCache`] for their images, painting either the image
//! or a fallback gradient. [`page::Page`] wires it to page lifecycle events
//! and to the backend form handlers in [`services`]. All page access goes
//! through the injected [`view::View`].

pub mod backend_client;
pub mod cache;
pub mod config;
pub mod error;
pub mod page;
pub mod services;
pub mod types;
pub mod view;
pub mod viewport;

pub use error::{ClientError, ClientResult};

#[cfg(test)]
#[path = "../tests/unit/support.rs"]
pub(crate) mod test_support;
