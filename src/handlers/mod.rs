//! Service-level HTTP handlers and shared state.

pub mod http;

pub use http::{fallback, health, root, AppState};
