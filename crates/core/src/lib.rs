//! Domain core for the influencer lead engine.
//!
//! Holds the lead/message/template types, the pure validation rules, the
//! template substitution engine, the storage ports, and the stateless
//! services (lifecycle, conversation, template library) that sit on top of
//! an injected store.

pub mod conversation;
pub mod error;
pub mod lead;
pub mod lifecycle;
pub mod memory;
pub mod message;
pub mod render;
pub mod store;
pub mod template;
pub mod template_library;
pub mod types;
pub mod validation;
