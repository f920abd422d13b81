//! PostgreSQL implementations of the `influence_core` storage ports.

use std::collections::HashMap;

use async_trait::async_trait;
use influence_core::error::CoreError;
use influence_core::lead::{Lead, LeadChanges, NewLead};
use influence_core::message::{Message, NewMessage};
use influence_core::store::{LeadStore, TemplateStore};
use influence_core::template::{NewTemplate, Template, TemplateChanges};
use influence_core::types::DbId;

use crate::models::lead::{LeadRow, MessageRow};
use crate::repositories::{LeadRepo, TemplateRepo};
use crate::DbPool;

fn persistence(err: sqlx::Error) -> CoreError {
    CoreError::Persistence(err.to_string())
}

fn to_messages(rows: Vec<MessageRow>) -> Result<Vec<Message>, CoreError> {
    rows.into_iter().map(Message::try_from).collect()
}

fn assemble(found: Option<(LeadRow, Vec<MessageRow>)>) -> Result<Option<Lead>, CoreError> {
    match found {
        Some((row, messages)) => row.into_lead(to_messages(messages)?).map(Some),
        None => Ok(None),
    }
}

/// [`LeadStore`] backed by the `leads` and `lead_messages` tables.
#[derive(Clone)]
pub struct PgLeadStore {
    pool: DbPool,
}

impl PgLeadStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeadStore for PgLeadStore {
    async fn create(&self, owner_id: DbId, lead: &NewLead) -> Result<Lead, CoreError> {
        let row = LeadRepo::create(&self.pool, owner_id, lead)
            .await
            .map_err(persistence)?;
        row.into_lead(Vec::new())
    }

    async fn get(&self, owner_id: DbId, lead_id: DbId) -> Result<Option<Lead>, CoreError> {
        let found = LeadRepo::find_with_messages(&self.pool, owner_id, lead_id)
            .await
            .map_err(persistence)?;
        assemble(found)
    }

    async fn list_all(&self, owner_id: DbId) -> Result<Vec<Lead>, CoreError> {
        let rows = LeadRepo::list_by_owner(&self.pool, owner_id)
            .await
            .map_err(persistence)?;
        let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();
        let message_rows = LeadRepo::list_messages_for_leads(&self.pool, &ids)
            .await
            .map_err(persistence)?;

        let mut threads: HashMap<DbId, Vec<Message>> = HashMap::new();
        for row in message_rows {
            let lead_id = row.lead_id;
            threads
                .entry(lead_id)
                .or_default()
                .push(Message::try_from(row)?);
        }

        rows.into_iter()
            .map(|row| {
                let messages = threads.remove(&row.id).unwrap_or_default();
                row.into_lead(messages)
            })
            .collect()
    }

    async fn update(
        &self,
        owner_id: DbId,
        lead_id: DbId,
        changes: &LeadChanges,
    ) -> Result<Option<Lead>, CoreError> {
        let found = LeadRepo::update(&self.pool, owner_id, lead_id, changes)
            .await
            .map_err(persistence)?;
        assemble(found)
    }

    async fn append_message(
        &self,
        owner_id: DbId,
        lead_id: DbId,
        message: &NewMessage,
    ) -> Result<Option<Lead>, CoreError> {
        let found = LeadRepo::append_message(&self.pool, owner_id, lead_id, message)
            .await
            .map_err(persistence)?;
        assemble(found)
    }

    async fn delete(&self, owner_id: DbId, lead_id: DbId) -> Result<bool, CoreError> {
        LeadRepo::delete(&self.pool, owner_id, lead_id)
            .await
            .map_err(persistence)
    }

    async fn health_check(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool).await.map_err(persistence)
    }
}

/// [`TemplateStore`] backed by the `templates` table.
#[derive(Clone)]
pub struct PgTemplateStore {
    pool: DbPool,
}

impl PgTemplateStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateStore for PgTemplateStore {
    async fn list(&self) -> Result<Vec<Template>, CoreError> {
        TemplateRepo::list(&self.pool)
            .await
            .map_err(persistence)?
            .into_iter()
            .map(Template::try_from)
            .collect()
    }

    async fn get(&self, id: DbId) -> Result<Option<Template>, CoreError> {
        TemplateRepo::find_by_id(&self.pool, id)
            .await
            .map_err(persistence)?
            .map(Template::try_from)
            .transpose()
    }

    async fn create(&self, template: &NewTemplate) -> Result<Template, CoreError> {
        let row = TemplateRepo::create(&self.pool, template)
            .await
            .map_err(persistence)?;
        Template::try_from(row)
    }

    async fn update(
        &self,
        id: DbId,
        changes: &TemplateChanges,
    ) -> Result<Option<Template>, CoreError> {
        TemplateRepo::update(&self.pool, id, changes)
            .await
            .map_err(persistence)?
            .map(Template::try_from)
            .transpose()
    }

    async fn delete(&self, id: DbId) -> Result<bool, CoreError> {
        TemplateRepo::delete(&self.pool, id)
            .await
            .map_err(persistence)
    }
}
