//! Lead lifecycle service: creation, status transitions, field patches, and
//! deletion, all scoped to the calling account.

use std::sync::Arc;

use crate::error::CoreError;
use crate::lead::{
    validate_create_lead, validate_status, validate_update_lead, CreateLead, Lead, LeadChanges,
    UpdateLead,
};
use crate::store::LeadStore;
use crate::types::DbId;

/// Entity name used in not-found errors.
pub const LEAD_ENTITY: &str = "Lead";

pub(crate) fn lead_not_found(lead_id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: LEAD_ENTITY,
        id: lead_id,
    }
}

/// Stateless façade over an injected [`LeadStore`]. Cheap to clone.
#[derive(Clone)]
pub struct LeadLifecycle {
    store: Arc<dyn LeadStore>,
}

impl LeadLifecycle {
    pub fn new(store: Arc<dyn LeadStore>) -> Self {
        Self { store }
    }

    /// Validate and persist a new lead. Nothing is written on failure.
    pub async fn create_lead(&self, owner_id: DbId, input: &CreateLead) -> Result<Lead, CoreError> {
        let new_lead = validate_create_lead(input)?;
        let lead = self.store.create(owner_id, &new_lead).await?;

        tracing::info!(
            owner_id,
            lead_id = lead.id,
            brand_name = %lead.brand_name,
            "Lead created"
        );
        Ok(lead)
    }

    pub async fn get_lead(&self, owner_id: DbId, lead_id: DbId) -> Result<Lead, CoreError> {
        self.store
            .get(owner_id, lead_id)
            .await?
            .ok_or_else(|| lead_not_found(lead_id))
    }

    pub async fn list_leads(&self, owner_id: DbId) -> Result<Vec<Lead>, CoreError> {
        let leads = self.store.list_all(owner_id).await?;
        tracing::debug!(owner_id, count = leads.len(), "Listed leads");
        Ok(leads)
    }

    /// Move a lead to `status`. Any status may follow any other.
    pub async fn set_status(
        &self,
        owner_id: DbId,
        lead_id: DbId,
        status: Option<&str>,
    ) -> Result<Lead, CoreError> {
        let status = validate_status(status)?;
        let lead = self
            .store
            .update(owner_id, lead_id, &LeadChanges::status(status))
            .await?
            .ok_or_else(|| lead_not_found(lead_id))?;

        tracing::info!(owner_id, lead_id, status = status.as_str(), "Lead status updated");
        Ok(lead)
    }

    /// Merge the mutable fields of `input` into the lead.
    pub async fn update_fields(
        &self,
        owner_id: DbId,
        lead_id: DbId,
        input: &UpdateLead,
    ) -> Result<Lead, CoreError> {
        let changes = validate_update_lead(input)?;
        let lead = self
            .store
            .update(owner_id, lead_id, &changes)
            .await?
            .ok_or_else(|| lead_not_found(lead_id))?;

        tracing::info!(owner_id, lead_id, "Lead updated");
        Ok(lead)
    }

    /// Permanently remove a lead and its thread.
    pub async fn delete_lead(&self, owner_id: DbId, lead_id: DbId) -> Result<(), CoreError> {
        if !self.store.delete(owner_id, lead_id).await? {
            return Err(lead_not_found(lead_id));
        }

        tracing::info!(owner_id, lead_id, "Lead deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::lead::LeadStatus;
    use crate::memory::InMemoryLeadStore;

    fn lifecycle() -> LeadLifecycle {
        LeadLifecycle::new(Arc::new(InMemoryLeadStore::new()))
    }

    fn acme() -> CreateLead {
        CreateLead {
            brand_name: Some("Acme".to_string()),
            collaboration_type: Some("Instagram Reel".to_string()),
            budget_range: Some("$500-1,000".to_string()),
            ..CreateLead::default()
        }
    }

    #[tokio::test]
    async fn create_starts_new_with_empty_thread() {
        let service = lifecycle();
        let before = chrono::Utc::now();
        let lead = service.create_lead(1, &acme()).await.unwrap();

        assert_eq!(lead.status, LeadStatus::New);
        assert!(lead.messages.is_empty());
        assert_eq!(lead.owner_id, 1);
        assert!(lead.last_activity >= before);
        assert!(lead.last_activity <= chrono::Utc::now());
    }

    #[tokio::test]
    async fn failed_create_persists_nothing() {
        let service = lifecycle();
        let mut input = acme();
        input.collaboration_type = None;

        assert_matches!(
            service.create_lead(1, &input).await,
            Err(CoreError::Validation(_))
        );
        assert!(service.list_leads(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_status_leaves_lead_unchanged() {
        let service = lifecycle();
        let lead = service.create_lead(1, &acme()).await.unwrap();

        assert_matches!(
            service.set_status(1, lead.id, Some("won")).await,
            Err(CoreError::Validation(_))
        );
        let stored = service.get_lead(1, lead.id).await.unwrap();
        assert_eq!(stored.status, LeadStatus::New);
        assert_eq!(stored.last_activity, lead.last_activity);
    }

    #[tokio::test]
    async fn any_status_can_follow_any_other() {
        let service = lifecycle();
        let lead = service.create_lead(1, &acme()).await.unwrap();

        for status in ["rejected", "new", "accepted", "qualified", "negotiating", "rejected"] {
            let updated = service.set_status(1, lead.id, Some(status)).await.unwrap();
            assert_eq!(updated.status.as_str(), status);
        }
    }

    #[tokio::test]
    async fn mutations_never_move_activity_backwards() {
        let service = lifecycle();
        let lead = service.create_lead(1, &acme()).await.unwrap();

        let after_status = service
            .set_status(1, lead.id, Some("qualified"))
            .await
            .unwrap();
        assert!(after_status.last_activity >= lead.last_activity);

        let patch = UpdateLead {
            ai_confidence: Some(75),
            ..UpdateLead::default()
        };
        let after_patch = service.update_fields(1, lead.id, &patch).await.unwrap();
        assert!(after_patch.last_activity >= after_status.last_activity);
        assert_eq!(after_patch.ai_confidence, 75);
        assert_eq!(after_patch.status, LeadStatus::Qualified);
    }

    #[tokio::test]
    async fn padded_status_is_rejected() {
        let service = lifecycle();
        let lead = service.create_lead(1, &acme()).await.unwrap();
        assert_matches!(
            service.set_status(1, lead.id, Some(" accepted ")).await,
            Err(CoreError::Validation(_))
        );
        let unchanged = service.get_lead(1, lead.id).await.unwrap();
        assert_eq!(unchanged.status, LeadStatus::New);
    }

    #[tokio::test]
    async fn blank_logo_clears_the_stored_one() {
        let service = lifecycle();
        let mut input = acme();
        input.brand_logo = Some("http://x/logo.png".to_string());
        let lead = service.create_lead(1, &input).await.unwrap();
        assert_eq!(lead.brand_logo.as_deref(), Some("http://x/logo.png"));

        let patch = UpdateLead {
            brand_logo: Some(Some(String::new())),
            ..UpdateLead::default()
        };
        let cleared = service.update_fields(1, lead.id, &patch).await.unwrap();
        assert!(cleared.brand_logo.is_none());
    }

    #[tokio::test]
    async fn status_for_missing_lead_is_not_found() {
        let service = lifecycle();
        assert_matches!(
            service.set_status(1, 42, Some("accepted")).await,
            Err(CoreError::NotFound { entity: "Lead", id: 42 })
        );
    }

    #[tokio::test]
    async fn other_accounts_cannot_touch_a_lead() {
        let service = lifecycle();
        let lead = service.create_lead(1, &acme()).await.unwrap();

        assert_matches!(service.get_lead(2, lead.id).await, Err(CoreError::NotFound { .. }));
        assert_matches!(
            service
                .update_fields(2, lead.id, &UpdateLead::default())
                .await,
            Err(CoreError::NotFound { .. })
        );
        assert_matches!(service.delete_lead(2, lead.id).await, Err(CoreError::NotFound { .. }));
        assert!(service.get_lead(1, lead.id).await.is_ok());
    }

    #[tokio::test]
    async fn deleted_lead_disappears() {
        let service = lifecycle();
        let keep = service.create_lead(1, &acme()).await.unwrap();
        let gone = service.create_lead(1, &acme()).await.unwrap();

        service.delete_lead(1, gone.id).await.unwrap();

        assert_matches!(service.get_lead(1, gone.id).await, Err(CoreError::NotFound { .. }));
        let ids: Vec<DbId> = service
            .list_leads(1)
            .await
            .unwrap()
            .iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(ids, vec![keep.id]);
        assert_matches!(service.delete_lead(1, gone.id).await, Err(CoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn list_orders_by_latest_activity() {
        let service = lifecycle();
        let first = service.create_lead(1, &acme()).await.unwrap();
        let second = service.create_lead(1, &acme()).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        service.set_status(1, first.id, Some("qualified")).await.unwrap();

        let ids: Vec<DbId> = service
            .list_leads(1)
            .await
            .unwrap()
            .iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }
}
