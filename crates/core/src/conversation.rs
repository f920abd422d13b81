//! Conversation service: appending to a lead's thread and composing replies
//! from templates.

use std::sync::Arc;

use crate::error::CoreError;
use crate::lead::Lead;
use crate::lifecycle::lead_not_found;
use crate::message::{validate_post_message, validate_response, NewMessage, PostMessage, RespondToLead};
use crate::render::render;
use crate::store::{LeadStore, TemplateStore};
use crate::template_library::template_not_found;
use crate::types::DbId;

#[derive(Clone)]
pub struct ConversationManager {
    leads: Arc<dyn LeadStore>,
    templates: Arc<dyn TemplateStore>,
}

impl ConversationManager {
    pub fn new(leads: Arc<dyn LeadStore>, templates: Arc<dyn TemplateStore>) -> Self {
        Self { leads, templates }
    }

    /// Append a message from either party to the lead's thread.
    pub async fn append_message(
        &self,
        owner_id: DbId,
        lead_id: DbId,
        input: &PostMessage,
    ) -> Result<Lead, CoreError> {
        let message = validate_post_message(input)?;
        self.append(owner_id, lead_id, &message).await
    }

    /// Append an influencer reply. `template_id` is logged for traceability;
    /// the text is expected to be rendered already.
    pub async fn respond(
        &self,
        owner_id: DbId,
        lead_id: DbId,
        input: &RespondToLead,
    ) -> Result<Lead, CoreError> {
        let message = validate_response(input)?;
        let lead = self.append(owner_id, lead_id, &message).await?;

        tracing::info!(
            owner_id,
            lead_id,
            template_id = ?input.template_id,
            "Response sent"
        );
        Ok(lead)
    }

    /// Render a template against one of the caller's leads without storing
    /// anything.
    pub async fn compose(
        &self,
        owner_id: DbId,
        lead_id: DbId,
        template_id: DbId,
    ) -> Result<String, CoreError> {
        let lead = self
            .leads
            .get(owner_id, lead_id)
            .await?
            .ok_or_else(|| lead_not_found(lead_id))?;
        let template = self
            .templates
            .get(template_id)
            .await?
            .ok_or_else(|| template_not_found(template_id))?;

        Ok(render(&template.content, &lead))
    }

    async fn append(
        &self,
        owner_id: DbId,
        lead_id: DbId,
        message: &NewMessage,
    ) -> Result<Lead, CoreError> {
        let lead = self
            .leads
            .append_message(owner_id, lead_id, message)
            .await?
            .ok_or_else(|| lead_not_found(lead_id))?;

        tracing::info!(
            owner_id,
            lead_id,
            sender = message.sender.as_str(),
            message_count = lead.messages.len(),
            "Message appended"
        );
        Ok(lead)
    }
}
