//! Rows from the `leads` and `lead_messages` tables.

use influence_core::error::CoreError;
use influence_core::lead::{ExtractedInfo, Lead, LeadStatus};
use influence_core::message::{Message, Sender};
use influence_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `leads` table, without its messages.
#[derive(Debug, Clone, FromRow)]
pub struct LeadRow {
    pub id: DbId,
    pub owner_id: DbId,
    pub brand_name: String,
    pub brand_logo: Option<String>,
    pub collaboration_type: String,
    pub budget_range: String,
    pub status: String,
    pub last_activity: Timestamp,
    pub ai_confidence: i32,
    pub extracted_info: Option<Json<ExtractedInfo>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl LeadRow {
    /// Attach the thread and convert into the domain type.
    pub fn into_lead(self, messages: Vec<Message>) -> Result<Lead, CoreError> {
        let status = LeadStatus::parse(&self.status).map_err(|_| {
            CoreError::Persistence(format!(
                "lead {} has unknown status '{}'",
                self.id, self.status
            ))
        })?;

        Ok(Lead {
            id: self.id,
            owner_id: self.owner_id,
            brand_name: self.brand_name,
            brand_logo: self.brand_logo,
            collaboration_type: self.collaboration_type,
            budget_range: self.budget_range,
            status,
            last_activity: self.last_activity,
            ai_confidence: self.ai_confidence,
            extracted_info: self.extracted_info.map(|Json(info)| info),
            messages,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// A row from the `lead_messages` table.
#[derive(Debug, Clone, FromRow)]
pub struct MessageRow {
    pub id: DbId,
    pub lead_id: DbId,
    pub sender: String,
    pub content: String,
    pub is_read: bool,
    pub created_at: Timestamp,
}

impl TryFrom<MessageRow> for Message {
    type Error = CoreError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let sender = Sender::parse(&row.sender).map_err(|_| {
            CoreError::Persistence(format!(
                "message {} has unknown sender '{}'",
                row.id, row.sender
            ))
        })?;

        Ok(Message {
            id: row.id,
            sender,
            content: row.content,
            timestamp: row.created_at,
            is_read: row.is_read,
        })
    }
}
