//! Response envelopes for the lead and template endpoints.
//!
//! Every success body carries `"success": true` next to its payload so
//! clients can branch on one field for both outcomes.

use influence_core::lead::Lead;
use influence_core::template::Template;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LeadListResponse {
    pub success: bool,
    pub leads: Vec<Lead>,
}

/// `{ success, lead }`, plus a confirmation message on mutations.
#[derive(Debug, Serialize)]
pub struct LeadResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub lead: Lead,
}

impl LeadResponse {
    pub fn found(lead: Lead) -> Self {
        Self {
            success: true,
            message: None,
            lead,
        }
    }

    pub fn changed(message: &'static str, lead: Lead) -> Self {
        Self {
            success: true,
            message: Some(message),
            lead,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub success: bool,
    pub templates: Vec<Template>,
}

#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub template: Template,
}

impl TemplateResponse {
    pub fn found(template: Template) -> Self {
        Self {
            success: true,
            message: None,
            template,
        }
    }

    pub fn changed(message: &'static str, template: Template) -> Self {
        Self {
            success: true,
            message: Some(message),
            template,
        }
    }
}

/// Confirmation for operations with nothing to return, such as deletes.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

impl MessageResponse {
    pub fn ok(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}

/// A rendered template body, not yet sent.
#[derive(Debug, Serialize)]
pub struct ComposeResponse {
    pub success: bool,
    pub content: String,
}
