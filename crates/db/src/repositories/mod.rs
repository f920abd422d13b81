//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument and return raw rows.

pub mod lead_repo;
pub mod template_repo;

pub use lead_repo::LeadRepo;
pub use template_repo::TemplateRepo;
