//! Request extractors shared by every protected route.
//!
//! - [`auth::AuthUser`] -- the calling account, from a JWT Bearer token.

pub mod auth;
