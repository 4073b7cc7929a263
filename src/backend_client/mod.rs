pub mod client;
pub mod fetcher;
