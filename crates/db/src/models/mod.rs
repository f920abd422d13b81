//! Row structs for the lead and template tables.
//!
//! Each submodule contains a `FromRow` struct matching the table columns and
//! the conversion into the domain type from `influence_core`. Stored enum
//! text that no longer parses surfaces as a persistence failure.

pub mod lead;
pub mod template;
