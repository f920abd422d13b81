//! Rows from the `templates` table.

use influence_core::error::CoreError;
use influence_core::template::{Template, TemplateCategory};
use influence_core::types::{DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct TemplateRow {
    pub id: DbId,
    pub name: String,
    pub category: String,
    pub subject: Option<String>,
    pub content: String,
    pub variables: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<TemplateRow> for Template {
    type Error = CoreError;

    fn try_from(row: TemplateRow) -> Result<Self, Self::Error> {
        let category = TemplateCategory::parse(&row.category).map_err(|_| {
            CoreError::Persistence(format!(
                "template {} has unknown category '{}'",
                row.id, row.category
            ))
        })?;

        Ok(Template {
            id: row.id,
            name: row.name,
            category,
            subject: row.subject,
            content: row.content,
            variables: row.variables,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
