//! Response templates: categories, validation, `{{variable}}` extraction, and
//! the built-in starter set.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};
use crate::validation::{
    check_constraints, check_max_chars, clearable_text, non_empty, normalize_text, nullable,
};

/// Maximum length of a template name.
pub const MAX_TEMPLATE_NAME_LENGTH: usize = 200;

/// Maximum length of a template subject line.
pub const MAX_TEMPLATE_SUBJECT_LENGTH: usize = 200;

/// Maximum length of a template body.
pub const MAX_TEMPLATE_CONTENT_LENGTH: usize = 10_000;

/// Matches `{{name}}` placeholders; single-brace markers are not variables.
static VARIABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("valid regex"));

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Stage of the conversation a template is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateCategory {
    Initial,
    Qualifying,
    Negotiation,
    Acceptance,
    Decline,
}

/// All valid category strings.
pub const VALID_CATEGORIES: &[&str] = &[
    "initial",
    "qualifying",
    "negotiation",
    "acceptance",
    "decline",
];

impl TemplateCategory {
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "initial" => Ok(Self::Initial),
            "qualifying" => Ok(Self::Qualifying),
            "negotiation" => Ok(Self::Negotiation),
            "acceptance" => Ok(Self::Acceptance),
            "decline" => Ok(Self::Decline),
            _ => Err(CoreError::Validation(format!(
                "Invalid category '{s}'. Must be one of: {}",
                VALID_CATEGORIES.join(", ")
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Qualifying => "qualifying",
            Self::Negotiation => "negotiation",
            Self::Acceptance => "acceptance",
            Self::Decline => "decline",
        }
    }
}

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: DbId,
    pub name: String,
    pub category: TemplateCategory,
    pub subject: Option<String>,
    pub content: String,
    /// Derived from `content`; never written independently.
    pub variables: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for creating a template. Any `variables` key is ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateTemplate {
    #[validate(length(max = 200, message = "name exceeds maximum length of 200 characters"))]
    pub name: Option<String>,
    pub category: Option<String>,
    #[validate(length(max = 200, message = "subject exceeds maximum length of 200 characters"))]
    pub subject: Option<String>,
    #[validate(length(
        max = 10000,
        message = "content exceeds maximum length of 10000 characters"
    ))]
    pub content: Option<String>,
}

/// Request body for updating a template. All fields are optional; `subject`
/// may be sent as `null` or `""` to clear it.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTemplate {
    #[validate(length(max = 200, message = "name exceeds maximum length of 200 characters"))]
    pub name: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub subject: Option<Option<String>>,
    #[validate(length(
        max = 10000,
        message = "content exceeds maximum length of 10000 characters"
    ))]
    pub content: Option<String>,
}

/// A validated template with its variables already derived.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTemplate {
    pub name: String,
    pub category: TemplateCategory,
    pub subject: Option<String>,
    pub content: String,
    pub variables: Vec<String>,
}

/// A validated template patch. `variables` is `Some` exactly when `content` is,
/// and `subject: Some(None)` clears the subject.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateChanges {
    pub name: Option<String>,
    pub category: Option<TemplateCategory>,
    pub subject: Option<Option<String>>,
    pub content: Option<String>,
    pub variables: Option<Vec<String>>,
}

/// Collect the distinct `{{name}}` placeholders in first-appearance order.
pub fn extract_variables(content: &str) -> Vec<String> {
    let mut variables: Vec<String> = Vec::new();
    for caps in VARIABLE_RE.captures_iter(content) {
        let name = caps[1].trim();
        if !name.is_empty() && !variables.iter().any(|v| v == name) {
            variables.push(name.to_string());
        }
    }
    variables
}

pub fn validate_create_template(input: &CreateTemplate) -> Result<NewTemplate, CoreError> {
    let name = normalize_text(input.name.as_deref());
    let category = non_empty(input.category.as_deref());
    let content = input.content.clone().filter(|c| !c.trim().is_empty());

    let missing: Vec<&str> = [
        ("name", name.is_none()),
        ("category", category.is_none()),
        ("content", content.is_none()),
    ]
    .into_iter()
    .filter_map(|(field, absent)| absent.then_some(field))
    .collect();

    let (Some(name), Some(category), Some(content)) = (name, category, content) else {
        return Err(CoreError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    };

    check_constraints(input)?;
    let category = TemplateCategory::parse(category)?;
    let variables = extract_variables(&content);

    Ok(NewTemplate {
        name,
        category,
        subject: normalize_text(input.subject.as_deref()),
        content,
        variables,
    })
}

pub fn validate_update_template(input: &UpdateTemplate) -> Result<TemplateChanges, CoreError> {
    let mut blank = Vec::new();
    if input.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        blank.push("name");
    }
    if input.content.as_deref().is_some_and(|c| c.trim().is_empty()) {
        blank.push("content");
    }
    if !blank.is_empty() {
        return Err(CoreError::Validation(format!(
            "Fields cannot be empty: {}",
            blank.join(", ")
        )));
    }

    check_constraints(input)?;
    check_max_chars(
        input.subject.as_ref().and_then(|subject| subject.as_deref()),
        MAX_TEMPLATE_SUBJECT_LENGTH,
        "subject exceeds maximum length of 200 characters",
    )?;

    let category = match input.category.as_deref() {
        Some(c) => Some(TemplateCategory::parse(c)?),
        None => None,
    };

    Ok(TemplateChanges {
        name: normalize_text(input.name.as_deref()),
        category,
        subject: clearable_text(&input.subject),
        variables: input.content.as_deref().map(extract_variables),
        content: input.content.clone(),
    })
}

// ---------------------------------------------------------------------------
// Built-in templates
// ---------------------------------------------------------------------------

/// The starter templates offered to a fresh installation.
pub fn default_templates() -> Vec<NewTemplate> {
    let defaults: [(&str, TemplateCategory, &str); 5] = [
        (
            "Initial Interest Response",
            TemplateCategory::Initial,
            "Hi {{brand_name}}! Thank you for reaching out. I'm interested in learning more \
             about this collaboration opportunity. Could you please share more details about \
             the campaign requirements and timeline?",
        ),
        (
            "Rate Card Request",
            TemplateCategory::Qualifying,
            "Thank you for your interest in collaborating with me! I'd love to work with \
             {{brand_name}}. Please find my rate card attached. For {{collaboration_type}}, my \
             rate is typically in the range mentioned. Let me know if you'd like to discuss \
             further! {rate_card}",
        ),
        (
            "Counter Offer",
            TemplateCategory::Negotiation,
            "Hi {{brand_name}}, thank you for the offer! I'm very interested in this \
             collaboration. Based on the scope of work and deliverables, I would like to \
             propose a rate of {{proposed_rate}}. This includes {{deliverables}}. Looking \
             forward to your response!",
        ),
        (
            "Collaboration Acceptance",
            TemplateCategory::Acceptance,
            "Hi {{brand_name}}! I'm excited to confirm our collaboration for \
             {{collaboration_type}}. I accept the terms discussed and look forward to creating \
             amazing content for your brand. When would you like to schedule a brief call to \
             discuss the next steps?",
        ),
        (
            "Polite Decline",
            TemplateCategory::Decline,
            "Hi {{brand_name}}, thank you for thinking of me for this collaboration \
             opportunity. Unfortunately, this doesn't align with my current content strategy \
             and brand partnerships. I appreciate your interest and wish you the best with \
             your campaign!",
        ),
    ];

    defaults
        .into_iter()
        .map(|(name, category, content)| NewTemplate {
            name: name.to_string(),
            category,
            subject: None,
            content: content.to_string(),
            variables: extract_variables(content),
        })
        .collect()
}
