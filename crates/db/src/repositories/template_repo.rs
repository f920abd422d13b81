//! Repository for the `templates` table.

use influence_core::template::{NewTemplate, TemplateChanges};
use influence_core::types::DbId;
use sqlx::PgPool;

use crate::models::template::TemplateRow;

const COLUMNS: &str = "id, name, category, subject, content, variables, created_at, updated_at";

pub struct TemplateRepo;

impl TemplateRepo {
    pub async fn create(pool: &PgPool, input: &NewTemplate) -> Result<TemplateRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO templates (name, category, subject, content, variables)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TemplateRow>(&query)
            .bind(&input.name)
            .bind(input.category.as_str())
            .bind(&input.subject)
            .bind(&input.content)
            .bind(&input.variables)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TemplateRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM templates WHERE id = $1");
        sqlx::query_as::<_, TemplateRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All templates ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<TemplateRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM templates ORDER BY name, id");
        sqlx::query_as::<_, TemplateRow>(&query).fetch_all(pool).await
    }

    /// Update a template. Only non-`None` fields in `changes` are applied;
    /// `subject: Some(None)` clears the subject.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        changes: &TemplateChanges,
    ) -> Result<Option<TemplateRow>, sqlx::Error> {
        let query = format!(
            "UPDATE templates SET
                name = COALESCE($2, name),
                category = COALESCE($3, category),
                subject = CASE WHEN $7 THEN $4 ELSE subject END,
                content = COALESCE($5, content),
                variables = COALESCE($6, variables),
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TemplateRow>(&query)
            .bind(id)
            .bind(&changes.name)
            .bind(changes.category.map(|c| c.as_str()))
            .bind(changes.subject.as_ref().and_then(|subject| subject.as_deref()))
            .bind(&changes.content)
            .bind(&changes.variables)
            .bind(changes.subject.is_some())
            .fetch_optional(pool)
            .await
    }

    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM templates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
