//! HTTP handlers. Each one extracts the caller, delegates to a service on
//! [`AppState`](crate::state::AppState), and wraps the result in a response
//! envelope.

pub mod leads;
pub mod templates;
