//! Repository for the `leads` and `lead_messages` tables.
//!
//! Every query is filtered by `owner_id`, so a lead owned by another account
//! behaves exactly like a missing row.

use influence_core::lead::{LeadChanges, LeadStatus, NewLead};
use influence_core::message::NewMessage;
use influence_core::types::DbId;
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};

use crate::models::lead::{LeadRow, MessageRow};

/// Column list shared across lead queries.
const COLUMNS: &str = "id, owner_id, brand_name, brand_logo, collaboration_type, budget_range, \
    status, last_activity, ai_confidence, extracted_info, created_at, updated_at";

const MESSAGE_COLUMNS: &str = "id, lead_id, sender, content, is_read, created_at";

pub struct LeadRepo;

impl LeadRepo {
    /// Insert a lead in status `new` with `last_activity` set to now.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &NewLead,
    ) -> Result<LeadRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO leads
                (owner_id, brand_name, brand_logo, collaboration_type, budget_range,
                 status, ai_confidence, extracted_info)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LeadRow>(&query)
            .bind(owner_id)
            .bind(&input.brand_name)
            .bind(&input.brand_logo)
            .bind(&input.collaboration_type)
            .bind(&input.budget_range)
            .bind(LeadStatus::New.as_str())
            .bind(input.ai_confidence)
            .bind(input.extracted_info.clone().map(Json))
            .fetch_one(pool)
            .await
    }

    /// Load a lead and its thread as one consistent snapshot.
    ///
    /// The row is share-locked so an append or delete cannot land between
    /// the two reads.
    pub async fn find_with_messages(
        pool: &PgPool,
        owner_id: DbId,
        id: DbId,
    ) -> Result<Option<(LeadRow, Vec<MessageRow>)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query =
            format!("SELECT {COLUMNS} FROM leads WHERE id = $1 AND owner_id = $2 FOR SHARE");
        let Some(lead) = sqlx::query_as::<_, LeadRow>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };
        let messages = Self::list_messages(&mut *tx, id).await?;

        tx.commit().await?;
        Ok(Some((lead, messages)))
    }

    /// All of the owner's leads, most recent activity first.
    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<LeadRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM leads
             WHERE owner_id = $1
             ORDER BY last_activity DESC, id DESC"
        );
        sqlx::query_as::<_, LeadRow>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Apply the non-`None` fields of `changes` and refresh `last_activity`
    /// in a single statement, then read the thread while the row lock is
    /// still held. `brand_logo` is written whenever it is present in the
    /// patch, so `Some(None)` clears it.
    ///
    /// Returns `None` if the owner has no lead with this id.
    pub async fn update(
        pool: &PgPool,
        owner_id: DbId,
        id: DbId,
        changes: &LeadChanges,
    ) -> Result<Option<(LeadRow, Vec<MessageRow>)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE leads SET
                brand_name = COALESCE($3, brand_name),
                brand_logo = CASE WHEN $10 THEN $4 ELSE brand_logo END,
                collaboration_type = COALESCE($5, collaboration_type),
                budget_range = COALESCE($6, budget_range),
                status = COALESCE($7, status),
                ai_confidence = COALESCE($8, ai_confidence),
                extracted_info = COALESCE($9, extracted_info),
                last_activity = GREATEST(clock_timestamp(), last_activity),
                updated_at = now()
             WHERE id = $1 AND owner_id = $2
             RETURNING {COLUMNS}"
        );
        let lead = sqlx::query_as::<_, LeadRow>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(&changes.brand_name)
            .bind(changes.brand_logo.as_ref().and_then(|logo| logo.as_deref()))
            .bind(&changes.collaboration_type)
            .bind(&changes.budget_range)
            .bind(changes.status.map(|s| s.as_str()))
            .bind(changes.ai_confidence)
            .bind(changes.extracted_info.clone().map(Json))
            .bind(changes.brand_logo.is_some())
            .fetch_optional(&mut *tx)
            .await?;
        let Some(lead) = lead else {
            return Ok(None);
        };
        let messages = Self::list_messages(&mut *tx, id).await?;

        tx.commit().await?;
        Ok(Some((lead, messages)))
    }

    /// Append one message and refresh `last_activity` in one transaction.
    ///
    /// The lead row is locked first so concurrent appends to the same lead
    /// serialize and each sees the previous one's timestamp. Returns the
    /// updated lead with its full thread, or `None` if the owner has no lead
    /// with this id.
    pub async fn append_message(
        pool: &PgPool,
        owner_id: DbId,
        id: DbId,
        message: &NewMessage,
    ) -> Result<Option<(LeadRow, Vec<MessageRow>)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM leads WHERE id = $1 AND owner_id = $2 FOR UPDATE")
                .bind(id)
                .bind(owner_id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(None);
        }

        sqlx::query(
            "INSERT INTO lead_messages (lead_id, sender, content, is_read)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(message.sender.as_str())
        .bind(&message.content)
        .bind(message.is_read)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "UPDATE leads SET
                last_activity = GREATEST(clock_timestamp(), last_activity),
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let lead = sqlx::query_as::<_, LeadRow>(&query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        let messages = Self::list_messages(&mut *tx, id).await?;

        tx.commit().await?;
        Ok(Some((lead, messages)))
    }

    /// The lead's thread in arrival order.
    pub async fn list_messages<'e, E>(
        executor: E,
        lead_id: DbId,
    ) -> Result<Vec<MessageRow>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query =
            format!("SELECT {MESSAGE_COLUMNS} FROM lead_messages WHERE lead_id = $1 ORDER BY id");
        sqlx::query_as::<_, MessageRow>(&query)
            .bind(lead_id)
            .fetch_all(executor)
            .await
    }

    /// Threads for several leads at once, ordered by lead then arrival.
    pub async fn list_messages_for_leads(
        pool: &PgPool,
        lead_ids: &[DbId],
    ) -> Result<Vec<MessageRow>, sqlx::Error> {
        let query = format!(
            "SELECT {MESSAGE_COLUMNS} FROM lead_messages
             WHERE lead_id = ANY($1)
             ORDER BY lead_id, id"
        );
        sqlx::query_as::<_, MessageRow>(&query)
            .bind(lead_ids)
            .fetch_all(pool)
            .await
    }

    /// Permanently delete a lead. Its messages go with it via `ON DELETE CASCADE`.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, owner_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM leads WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
