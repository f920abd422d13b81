//! Lead types, status values, and lead validation rules.
//!
//! A lead is one inbound brand-partnership opportunity owned by a single
//! account. The input DTOs here are what callers send; the `validate_*`
//! functions turn them into the already-validated shapes the storage ports
//! accept, so nothing reaches a store without passing these rules.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::message::Message;
use crate::types::{DbId, Timestamp};
use crate::validation::{
    check_constraints, check_max_chars, clearable_text, non_empty, normalize_text, nullable,
};

/// Inclusive bounds for the caller-supplied confidence score.
pub const MIN_AI_CONFIDENCE: i32 = 0;
pub const MAX_AI_CONFIDENCE: i32 = 100;

/// Maximum length of a brand logo URL in characters.
pub const MAX_BRAND_LOGO_LENGTH: usize = 2048;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle stage of a lead.
///
/// Every status may move to every other status; `New` is the only initial
/// state and none of them is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Qualified,
    Negotiating,
    Accepted,
    Rejected,
}

/// All valid status strings, in lifecycle order.
pub const VALID_STATUSES: &[&str] = &["new", "qualified", "negotiating", "accepted", "rejected"];

impl LeadStatus {
    /// Parse a status string (as sent by clients or stored in the database).
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "new" => Ok(Self::New),
            "qualified" => Ok(Self::Qualified),
            "negotiating" => Ok(Self::Negotiating),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(CoreError::Validation(format!(
                "Invalid status '{s}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Qualified => "qualified",
            Self::Negotiating => "negotiating",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

/// Validate a requested status transition target.
///
/// The transition graph is fully permissive, so the only failures are a
/// missing value and a value outside the status domain. Values are matched
/// exactly, so surrounding whitespace is a domain error.
pub fn validate_status(status: Option<&str>) -> Result<LeadStatus, CoreError> {
    match non_empty(status) {
        Some(s) => LeadStatus::parse(s),
        None => Err(CoreError::Validation("Status is required".to_string())),
    }
}

// ---------------------------------------------------------------------------
// Lead
// ---------------------------------------------------------------------------

/// Structured details pulled out of a brand's pitch. Stored as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deliverables: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requirements: Option<Vec<String>>,
}

/// A brand-partnership opportunity together with its conversation thread.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: DbId,
    pub owner_id: DbId,
    pub brand_name: String,
    pub brand_logo: Option<String>,
    pub collaboration_type: String,
    pub budget_range: String,
    pub status: LeadStatus,
    pub last_activity: Timestamp,
    pub ai_confidence: i32,
    pub extracted_info: Option<ExtractedInfo>,
    /// Arrival order; append-only.
    pub messages: Vec<Message>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for creating a lead. Required fields are optional here so a
/// missing field surfaces as a validation error naming it.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLead {
    pub brand_name: Option<String>,
    #[validate(length(
        max = 2048,
        message = "brandLogo exceeds maximum length of 2048 characters"
    ))]
    pub brand_logo: Option<String>,
    pub collaboration_type: Option<String>,
    pub budget_range: Option<String>,
    #[validate(range(min = 0, max = 100, message = "aiConfidence must be between 0 and 100"))]
    pub ai_confidence: Option<i32>,
    pub extracted_info: Option<ExtractedInfo>,
}

/// A lead that passed creation validation. Status always starts at `New`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLead {
    pub brand_name: String,
    pub brand_logo: Option<String>,
    pub collaboration_type: String,
    pub budget_range: String,
    pub ai_confidence: i32,
    pub extracted_info: Option<ExtractedInfo>,
}

/// Request body for patching a lead. Identity, ownership, and the message
/// thread are deliberately absent; unknown keys are ignored. `brandLogo` may
/// be sent as `null` or `""` to clear it.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLead {
    pub brand_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub brand_logo: Option<Option<String>>,
    pub collaboration_type: Option<String>,
    pub budget_range: Option<String>,
    pub status: Option<String>,
    #[validate(range(min = 0, max = 100, message = "aiConfidence must be between 0 and 100"))]
    pub ai_confidence: Option<i32>,
    pub extracted_info: Option<ExtractedInfo>,
}

/// A validated patch. `None` leaves the stored value untouched; for
/// `brand_logo`, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadChanges {
    pub brand_name: Option<String>,
    pub brand_logo: Option<Option<String>>,
    pub collaboration_type: Option<String>,
    pub budget_range: Option<String>,
    pub status: Option<LeadStatus>,
    pub ai_confidence: Option<i32>,
    pub extracted_info: Option<ExtractedInfo>,
}

impl LeadChanges {
    /// A patch that only moves the lead to `status`.
    pub fn status(status: LeadStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Validate a create request, reporting every missing required field at once.
pub fn validate_create_lead(input: &CreateLead) -> Result<NewLead, CoreError> {
    let brand_name = normalize_text(input.brand_name.as_deref());
    let collaboration_type = normalize_text(input.collaboration_type.as_deref());
    let budget_range = normalize_text(input.budget_range.as_deref());

    let missing: Vec<&str> = [
        ("brandName", brand_name.is_none()),
        ("collaborationType", collaboration_type.is_none()),
        ("budgetRange", budget_range.is_none()),
    ]
    .into_iter()
    .filter_map(|(field, absent)| absent.then_some(field))
    .collect();

    if !missing.is_empty() {
        return Err(CoreError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    check_constraints(input)?;

    Ok(NewLead {
        brand_name: brand_name.unwrap_or_default(),
        brand_logo: normalize_text(input.brand_logo.as_deref()),
        collaboration_type: collaboration_type.unwrap_or_default(),
        budget_range: budget_range.unwrap_or_default(),
        ai_confidence: input.ai_confidence.unwrap_or(MIN_AI_CONFIDENCE),
        extracted_info: input.extracted_info.clone(),
    })
}

/// Validate a patch request. Provided required-string fields may not be
/// blank, and a provided status must be in the status domain.
pub fn validate_update_lead(input: &UpdateLead) -> Result<LeadChanges, CoreError> {
    let mut blank = Vec::new();
    let mut required = |field: &'static str, value: &Option<String>| match value {
        Some(v) => match normalize_text(Some(v)) {
            Some(trimmed) => Some(trimmed),
            None => {
                blank.push(field);
                None
            }
        },
        None => None,
    };

    let brand_name = required("brandName", &input.brand_name);
    let collaboration_type = required("collaborationType", &input.collaboration_type);
    let budget_range = required("budgetRange", &input.budget_range);

    if !blank.is_empty() {
        return Err(CoreError::Validation(format!(
            "Fields cannot be empty: {}",
            blank.join(", ")
        )));
    }

    check_constraints(input)?;
    check_max_chars(
        input.brand_logo.as_ref().and_then(|logo| logo.as_deref()),
        MAX_BRAND_LOGO_LENGTH,
        "brandLogo exceeds maximum length of 2048 characters",
    )?;

    let status = match input.status.as_deref() {
        Some(s) => Some(LeadStatus::parse(s)?),
        None => None,
    };

    Ok(LeadChanges {
        brand_name,
        brand_logo: clearable_text(&input.brand_logo),
        collaboration_type,
        budget_range,
        status,
        ai_confidence: input.ai_confidence,
        extracted_info: input.extracted_info.clone(),
    })
}
