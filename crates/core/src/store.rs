//! Storage ports for leads and templates.
//!
//! Services in this crate depend only on these traits. Every lead operation
//! takes the owning account id and must treat a lead owned by someone else
//! exactly like a missing one. Implementations receive already-validated
//! input and never re-validate it.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::lead::{Lead, LeadChanges, NewLead};
use crate::message::NewMessage;
use crate::template::{NewTemplate, Template, TemplateChanges};
use crate::types::DbId;

#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Insert a lead with status `new`, no messages, and `last_activity = now`.
    async fn create(&self, owner_id: DbId, lead: &NewLead) -> Result<Lead, CoreError>;

    async fn get(&self, owner_id: DbId, lead_id: DbId) -> Result<Option<Lead>, CoreError>;

    /// All of the owner's leads, most recent activity first (ties: newest id first).
    async fn list_all(&self, owner_id: DbId) -> Result<Vec<Lead>, CoreError>;

    /// Apply `changes` and refresh `last_activity` in one atomic step.
    async fn update(
        &self,
        owner_id: DbId,
        lead_id: DbId,
        changes: &LeadChanges,
    ) -> Result<Option<Lead>, CoreError>;

    /// Append one message and refresh `last_activity` in one atomic step.
    /// Never rewrites existing messages.
    async fn append_message(
        &self,
        owner_id: DbId,
        lead_id: DbId,
        message: &NewMessage,
    ) -> Result<Option<Lead>, CoreError>;

    /// Remove the lead and its messages. Returns `true` if a lead was removed.
    async fn delete(&self, owner_id: DbId, lead_id: DbId) -> Result<bool, CoreError>;

    /// Report whether the backing storage is reachable.
    async fn health_check(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// All templates ordered by name.
    async fn list(&self) -> Result<Vec<Template>, CoreError>;

    async fn get(&self, id: DbId) -> Result<Option<Template>, CoreError>;

    async fn create(&self, template: &NewTemplate) -> Result<Template, CoreError>;

    async fn update(
        &self,
        id: DbId,
        changes: &TemplateChanges,
    ) -> Result<Option<Template>, CoreError>;

    async fn delete(&self, id: DbId) -> Result<bool, CoreError>;
}
