//! Template CRUD service. Variables are always re-derived from content here,
//! never taken from the caller.

use std::sync::Arc;

use crate::error::CoreError;
use crate::store::TemplateStore;
use crate::template::{
    default_templates, validate_create_template, validate_update_template, CreateTemplate,
    Template, UpdateTemplate,
};
use crate::types::DbId;

/// Entity name used in not-found errors.
pub const TEMPLATE_ENTITY: &str = "Template";

pub(crate) fn template_not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: TEMPLATE_ENTITY,
        id,
    }
}

#[derive(Clone)]
pub struct TemplateLibrary {
    store: Arc<dyn TemplateStore>,
}

impl TemplateLibrary {
    pub fn new(store: Arc<dyn TemplateStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Template>, CoreError> {
        self.store.list().await
    }

    pub async fn get(&self, id: DbId) -> Result<Template, CoreError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| template_not_found(id))
    }

    pub async fn create(&self, input: &CreateTemplate) -> Result<Template, CoreError> {
        let template = validate_create_template(input)?;
        let created = self.store.create(&template).await?;

        tracing::info!(
            template_id = created.id,
            category = created.category.as_str(),
            variables = ?created.variables,
            "Template created"
        );
        Ok(created)
    }

    pub async fn update(&self, id: DbId, input: &UpdateTemplate) -> Result<Template, CoreError> {
        let changes = validate_update_template(input)?;
        let updated = self
            .store
            .update(id, &changes)
            .await?
            .ok_or_else(|| template_not_found(id))?;

        tracing::info!(template_id = id, "Template updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        if !self.store.delete(id).await? {
            return Err(template_not_found(id));
        }

        tracing::info!(template_id = id, "Template deleted");
        Ok(())
    }

    /// Insert the built-in templates if the store is empty. Returns how many
    /// were inserted.
    pub async fn seed_defaults(&self) -> Result<usize, CoreError> {
        if !self.store.list().await?.is_empty() {
            return Ok(0);
        }

        let defaults = default_templates();
        for template in &defaults {
            self.store.create(template).await?;
        }

        tracing::info!(count = defaults.len(), "Seeded default templates");
        Ok(defaults.len())
    }
}
