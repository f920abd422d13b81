//! Placeholder substitution for composing a reply from a template.
//!
//! Substitution is purely textual on the single-brace markers below. A
//! double-brace `{{brand_name}}` therefore keeps its outer braces.

use crate::lead::Lead;

pub const BRAND_NAME_PLACEHOLDER: &str = "{brand_name}";
pub const COLLABORATION_TYPE_PLACEHOLDER: &str = "{collaboration_type}";
pub const BUDGET_RANGE_PLACEHOLDER: &str = "{budget_range}";
pub const RATE_CARD_PLACEHOLDER: &str = "{rate_card}";

/// Static rate summary expanded in place of `{rate_card}`.
///
/// Not read from the account's configured rates.
pub const RATE_CARD_BLOCK: &str = "
📋 My Rate Card:
• Instagram Post: $500-1,000
• Instagram Story (3 slides): $300-500
• Instagram Reel: $800-1,200
• TikTok Video: $600-1,000
• YouTube Integration: $1,500-2,500
• Long-term Partnership: Custom pricing available

Package deals and bulk collaborations are available with discounts.";

/// Substitute the lead's fields and the rate card into `content`.
///
/// Unknown placeholders are left verbatim; there is no failure path.
pub fn render(content: &str, lead: &Lead) -> String {
    let mut rendered = content
        .replace(BRAND_NAME_PLACEHOLDER, &lead.brand_name)
        .replace(COLLABORATION_TYPE_PLACEHOLDER, &lead.collaboration_type)
        .replace(BUDGET_RANGE_PLACEHOLDER, &lead.budget_range);

    if content.contains(RATE_CARD_PLACEHOLDER) {
        rendered = rendered.replace(RATE_CARD_PLACEHOLDER, RATE_CARD_BLOCK);
    }

    rendered
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::lead::LeadStatus;

    fn lead(brand_name: &str) -> Lead {
        let now = Utc::now();
        Lead {
            id: 1,
            owner_id: 1,
            brand_name: brand_name.to_string(),
            brand_logo: None,
            collaboration_type: "Instagram Reel".to_string(),
            budget_range: "$1,000-2,000".to_string(),
            status: LeadStatus::New,
            last_activity: now,
            ai_confidence: 0,
            extracted_info: None,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn replaces_brand_and_expands_rate_card() {
        let out = render("Hi {brand_name}! {rate_card}", &lead("Acme"));
        assert!(out.starts_with("Hi Acme! \n📋 My Rate Card:"));
        assert!(out.contains("• YouTube Integration: $1,500-2,500"));
        assert!(out.ends_with("available with discounts."));
        assert!(!out.contains('{'));
    }

    #[test]
    fn unknown_placeholders_stay_verbatim() {
        let out = render("Hi {brand_name}, re {proposed_rate}", &lead("Acme"));
        assert_eq!(out, "Hi Acme, re {proposed_rate}");
    }

    #[test]
    fn every_occurrence_is_replaced() {
        let out = render(
            "{brand_name}/{brand_name} {collaboration_type} for {budget_range}",
            &lead("Acme"),
        );
        assert_eq!(out, "Acme/Acme Instagram Reel for $1,000-2,000");
    }

    #[test]
    fn rate_card_repeats_expand_each_time() {
        let out = render("{rate_card}{rate_card}", &lead("Acme"));
        assert_eq!(out.matches("📋 My Rate Card:").count(), 2);
    }

    #[test]
    fn double_brace_variables_keep_outer_braces() {
        let out = render("Hi {{brand_name}}", &lead("Acme"));
        assert_eq!(out, "Hi {Acme}");
    }

    #[test]
    fn rendering_is_idempotent_once_markers_are_gone() {
        let once = render("Hi {brand_name}! {rate_card}", &lead("Acme"));
        assert_eq!(render(&once, &lead("Acme")), once);
    }
}
