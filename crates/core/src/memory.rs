//! In-process implementations of the storage ports.
//!
//! Each operation holds one write guard for its whole read-modify-write, which
//! gives the same per-lead atomicity the PostgreSQL adapter gets from row
//! locks. Used by tests and by the server's `memory` backend.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::CoreError;
use crate::lead::{Lead, LeadChanges, LeadStatus, NewLead};
use crate::message::{Message, NewMessage};
use crate::store::{LeadStore, TemplateStore};
use crate::template::{NewTemplate, Template, TemplateChanges};
use crate::types::{DbId, Timestamp};

/// Next activity timestamp for a lead; never earlier than the previous one.
fn next_activity(previous: Timestamp) -> Timestamp {
    Utc::now().max(previous)
}

// ---------------------------------------------------------------------------
// Leads
// ---------------------------------------------------------------------------

#[derive(Default)]
struct LeadTable {
    last_lead_id: DbId,
    last_message_id: DbId,
    leads: HashMap<DbId, Lead>,
}

impl LeadTable {
    fn owned_mut(&mut self, owner_id: DbId, lead_id: DbId) -> Option<&mut Lead> {
        self.leads
            .get_mut(&lead_id)
            .filter(|lead| lead.owner_id == owner_id)
    }
}

#[derive(Default)]
pub struct InMemoryLeadStore {
    table: RwLock<LeadTable>,
}

impl InMemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeadStore for InMemoryLeadStore {
    async fn create(&self, owner_id: DbId, lead: &NewLead) -> Result<Lead, CoreError> {
        let mut table = self.table.write().await;
        table.last_lead_id += 1;
        let now = Utc::now();
        let created = Lead {
            id: table.last_lead_id,
            owner_id,
            brand_name: lead.brand_name.clone(),
            brand_logo: lead.brand_logo.clone(),
            collaboration_type: lead.collaboration_type.clone(),
            budget_range: lead.budget_range.clone(),
            status: LeadStatus::New,
            last_activity: now,
            ai_confidence: lead.ai_confidence,
            extracted_info: lead.extracted_info.clone(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        table.leads.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get(&self, owner_id: DbId, lead_id: DbId) -> Result<Option<Lead>, CoreError> {
        let table = self.table.read().await;
        Ok(table
            .leads
            .get(&lead_id)
            .filter(|lead| lead.owner_id == owner_id)
            .cloned())
    }

    async fn list_all(&self, owner_id: DbId) -> Result<Vec<Lead>, CoreError> {
        let table = self.table.read().await;
        let mut leads: Vec<Lead> = table
            .leads
            .values()
            .filter(|lead| lead.owner_id == owner_id)
            .cloned()
            .collect();
        leads.sort_by(|a, b| {
            b.last_activity
                .cmp(&a.last_activity)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(leads)
    }

    async fn update(
        &self,
        owner_id: DbId,
        lead_id: DbId,
        changes: &LeadChanges,
    ) -> Result<Option<Lead>, CoreError> {
        let mut table = self.table.write().await;
        let Some(lead) = table.owned_mut(owner_id, lead_id) else {
            return Ok(None);
        };

        if let Some(brand_name) = &changes.brand_name {
            lead.brand_name = brand_name.clone();
        }
        if let Some(brand_logo) = &changes.brand_logo {
            lead.brand_logo = brand_logo.clone();
        }
        if let Some(collaboration_type) = &changes.collaboration_type {
            lead.collaboration_type = collaboration_type.clone();
        }
        if let Some(budget_range) = &changes.budget_range {
            lead.budget_range = budget_range.clone();
        }
        if let Some(status) = changes.status {
            lead.status = status;
        }
        if let Some(ai_confidence) = changes.ai_confidence {
            lead.ai_confidence = ai_confidence;
        }
        if let Some(extracted_info) = &changes.extracted_info {
            lead.extracted_info = Some(extracted_info.clone());
        }
        lead.last_activity = next_activity(lead.last_activity);
        lead.updated_at = Utc::now();

        Ok(Some(lead.clone()))
    }

    async fn append_message(
        &self,
        owner_id: DbId,
        lead_id: DbId,
        message: &NewMessage,
    ) -> Result<Option<Lead>, CoreError> {
        let mut table = self.table.write().await;
        let message_id = table.last_message_id + 1;
        let Some(lead) = table.owned_mut(owner_id, lead_id) else {
            return Ok(None);
        };

        lead.messages.push(Message {
            id: message_id,
            sender: message.sender,
            content: message.content.clone(),
            timestamp: Utc::now(),
            is_read: message.is_read,
        });
        lead.last_activity = next_activity(lead.last_activity);
        lead.updated_at = Utc::now();
        let updated = lead.clone();

        table.last_message_id = message_id;
        Ok(Some(updated))
    }

    async fn delete(&self, owner_id: DbId, lead_id: DbId) -> Result<bool, CoreError> {
        let mut table = self.table.write().await;
        if table.owned_mut(owner_id, lead_id).is_none() {
            return Ok(false);
        }
        Ok(table.leads.remove(&lead_id).is_some())
    }
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

#[derive(Default)]
struct TemplateTable {
    last_id: DbId,
    templates: HashMap<DbId, Template>,
}

#[derive(Default)]
pub struct InMemoryTemplateStore {
    table: RwLock<TemplateTable>,
}

impl InMemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TemplateStore for InMemoryTemplateStore {
    async fn list(&self) -> Result<Vec<Template>, CoreError> {
        let table = self.table.read().await;
        let mut templates: Vec<Template> = table.templates.values().cloned().collect();
        templates.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(templates)
    }

    async fn get(&self, id: DbId) -> Result<Option<Template>, CoreError> {
        Ok(self.table.read().await.templates.get(&id).cloned())
    }

    async fn create(&self, template: &NewTemplate) -> Result<Template, CoreError> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let now = Utc::now();
        let created = Template {
            id: table.last_id,
            name: template.name.clone(),
            category: template.category,
            subject: template.subject.clone(),
            content: template.content.clone(),
            variables: template.variables.clone(),
            created_at: now,
            updated_at: now,
        };
        table.templates.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: DbId,
        changes: &TemplateChanges,
    ) -> Result<Option<Template>, CoreError> {
        let mut table = self.table.write().await;
        let Some(template) = table.templates.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = &changes.name {
            template.name = name.clone();
        }
        if let Some(category) = changes.category {
            template.category = category;
        }
        if let Some(subject) = &changes.subject {
            template.subject = subject.clone();
        }
        if let (Some(content), Some(variables)) = (&changes.content, &changes.variables) {
            template.content = content.clone();
            template.variables = variables.clone();
        }
        template.updated_at = Utc::now();

        Ok(Some(template.clone()))
    }

    async fn delete(&self, id: DbId) -> Result<bool, CoreError> {
        Ok(self.table.write().await.templates.remove(&id).is_some())
    }
}
