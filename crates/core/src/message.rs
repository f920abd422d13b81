//! Conversation thread entries and the rules for appending them.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};
use crate::validation::{check_constraints, non_empty};

/// Maximum length of a single message body in characters.
pub const MAX_MESSAGE_CONTENT_LENGTH: usize = 10_000;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Brand,
    Influencer,
}

/// All valid sender strings.
pub const VALID_SENDERS: &[&str] = &["brand", "influencer"];

impl Sender {
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "brand" => Ok(Self::Brand),
            "influencer" => Ok(Self::Influencer),
            _ => Err(CoreError::Validation(format!(
                "Invalid sender '{s}'. Must be one of: {}",
                VALID_SENDERS.join(", ")
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Brand => "brand",
            Self::Influencer => "influencer",
        }
    }
}

/// One immutable entry in a lead's thread.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: DbId,
    pub sender: Sender,
    pub content: String,
    pub timestamp: Timestamp,
    pub is_read: bool,
}

/// A validated message ready to be appended. The store stamps the id and
/// timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub sender: Sender,
    pub content: String,
    pub is_read: bool,
}

impl NewMessage {
    /// Outbound (influencer) messages start read; inbound (brand) messages
    /// start unread. The flag is never changed afterwards.
    pub fn new(sender: Sender, content: String) -> Self {
        Self {
            sender,
            content,
            is_read: sender == Sender::Influencer,
        }
    }
}

/// Request body for appending a message from either party.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PostMessage {
    pub sender: Option<String>,
    #[validate(length(
        max = 10000,
        message = "content exceeds maximum length of 10000 characters"
    ))]
    pub content: Option<String>,
}

/// Request body for the influencer reply shortcut.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RespondToLead {
    #[validate(length(
        max = 10000,
        message = "message exceeds maximum length of 10000 characters"
    ))]
    pub message: Option<String>,
    /// The template the reply was composed from, kept for traceability only.
    pub template_id: Option<DbId>,
}

/// Message bodies are stored verbatim; only blankness is checked.
fn non_blank(content: &Option<String>) -> Option<String> {
    content.clone().filter(|c| !c.trim().is_empty())
}

pub fn validate_post_message(input: &PostMessage) -> Result<NewMessage, CoreError> {
    let sender = non_empty(input.sender.as_deref());
    let content = non_blank(&input.content);

    let (Some(sender), Some(content)) = (sender, content) else {
        return Err(CoreError::Validation(
            "Sender and content are required".to_string(),
        ));
    };

    check_constraints(input)?;
    let sender = Sender::parse(sender)?;
    Ok(NewMessage::new(sender, content))
}

pub fn validate_response(input: &RespondToLead) -> Result<NewMessage, CoreError> {
    let Some(content) = non_blank(&input.message) else {
        return Err(CoreError::Validation("Message is required".to_string()));
    };

    check_constraints(input)?;
    Ok(NewMessage::new(Sender::Influencer, content))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn post(sender: Option<&str>, content: Option<&str>) -> PostMessage {
        PostMessage {
            sender: sender.map(str::to_string),
            content: content.map(str::to_string),
        }
    }

    #[test]
    fn brand_messages_start_unread() {
        let msg = validate_post_message(&post(Some("brand"), Some("Hello!"))).unwrap();
        assert_eq!(msg.sender, Sender::Brand);
        assert!(!msg.is_read);
    }

    #[test]
    fn influencer_messages_start_read() {
        let msg = validate_post_message(&post(Some("influencer"), Some("Thanks"))).unwrap();
        assert!(msg.is_read);
    }

    #[test]
    fn missing_sender_or_content_is_rejected() {
        for input in [
            post(None, Some("hi")),
            post(Some("brand"), None),
            post(Some("brand"), Some("   ")),
            post(Some(""), Some("hi")),
        ] {
            assert_matches!(
                validate_post_message(&input),
                Err(CoreError::Validation(ref m)) if m == "Sender and content are required"
            );
        }
    }

    #[test]
    fn unknown_sender_is_rejected() {
        let err = validate_post_message(&post(Some("agency"), Some("hi"))).unwrap_err();
        assert_matches!(err, CoreError::Validation(ref m) if m.contains("brand, influencer"));
    }

    #[test]
    fn padded_sender_is_rejected() {
        let err = validate_post_message(&post(Some(" brand "), Some("hi"))).unwrap_err();
        assert_matches!(err, CoreError::Validation(ref m) if m.starts_with("Invalid sender ' brand '"));
    }

    #[test]
    fn overlong_content_is_rejected() {
        let long = "x".repeat(MAX_MESSAGE_CONTENT_LENGTH + 1);
        assert!(validate_post_message(&post(Some("brand"), Some(&long))).is_err());
    }

    #[test]
    fn response_requires_message() {
        let input = RespondToLead {
            message: None,
            template_id: Some(3),
        };
        assert_matches!(
            validate_response(&input),
            Err(CoreError::Validation(ref m)) if m == "Message is required"
        );
    }

    #[test]
    fn response_is_an_influencer_message() {
        let input: RespondToLead = serde_json::from_value(serde_json::json!({
            "message": "Sounds great",
            "templateId": 2
        }))
        .unwrap();
        let msg = validate_response(&input).unwrap();
        assert_eq!(msg.sender, Sender::Influencer);
        assert_eq!(msg.content, "Sounds great");
        assert!(msg.is_read);
    }
}
