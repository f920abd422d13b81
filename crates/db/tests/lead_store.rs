//! Integration tests for the PostgreSQL lead store.
//!
//! These need a live database; run with `DATABASE_URL` set and `--ignored`.

use assert_matches::assert_matches;
use influence_core::lead::{LeadChanges, LeadStatus, NewLead};
use influence_core::message::{NewMessage, Sender};
use influence_core::store::LeadStore;
use influence_db::PgLeadStore;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_lead(brand: &str) -> NewLead {
    NewLead {
        brand_name: brand.to_string(),
        brand_logo: None,
        collaboration_type: "Instagram Reel".to_string(),
        budget_range: "$800-1,200".to_string(),
        ai_confidence: 60,
        extracted_info: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn create_then_get_round_trips(pool: PgPool) {
    let store = PgLeadStore::new(pool);
    let created = store.create(1, &new_lead("Acme")).await.unwrap();

    assert_eq!(created.status, LeadStatus::New);
    assert!(created.messages.is_empty());

    let fetched = store.get(1, created.id).await.unwrap().unwrap();
    assert_eq!(fetched.brand_name, "Acme");
    assert_eq!(fetched.ai_confidence, 60);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn foreign_owner_is_treated_as_missing(pool: PgPool) {
    let store = PgLeadStore::new(pool);
    let lead = store.create(1, &new_lead("Acme")).await.unwrap();

    assert!(store.get(2, lead.id).await.unwrap().is_none());
    assert!(store
        .update(2, lead.id, &LeadChanges::status(LeadStatus::Rejected))
        .await
        .unwrap()
        .is_none());
    assert!(store
        .append_message(2, lead.id, &NewMessage::new(Sender::Brand, "hi".into()))
        .await
        .unwrap()
        .is_none());
    assert!(!store.delete(2, lead.id).await.unwrap());

    let untouched = store.get(1, lead.id).await.unwrap().unwrap();
    assert_eq!(untouched.status, LeadStatus::New);
    assert!(untouched.messages.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn update_applies_only_provided_fields(pool: PgPool) {
    let store = PgLeadStore::new(pool);
    let lead = store.create(1, &new_lead("Acme")).await.unwrap();

    let updated = store
        .update(
            1,
            lead.id,
            &LeadChanges {
                budget_range: Some("$2k".to_string()),
                status: Some(LeadStatus::Negotiating),
                ..LeadChanges::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.budget_range, "$2k");
    assert_eq!(updated.status, LeadStatus::Negotiating);
    assert_eq!(updated.brand_name, "Acme");
    assert!(updated.last_activity >= lead.last_activity);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn logo_is_kept_unless_patched(pool: PgPool) {
    let store = PgLeadStore::new(pool);
    let mut input = new_lead("Acme");
    input.brand_logo = Some("https://x/logo.png".to_string());
    let lead = store.create(1, &input).await.unwrap();

    let kept = store
        .update(1, lead.id, &LeadChanges::status(LeadStatus::Qualified))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(kept.brand_logo.as_deref(), Some("https://x/logo.png"));

    let cleared = store
        .update(
            1,
            lead.id,
            &LeadChanges {
                brand_logo: Some(None),
                ..LeadChanges::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert!(cleared.brand_logo.is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn update_returns_the_current_thread(pool: PgPool) {
    let store = PgLeadStore::new(pool);
    let lead = store.create(1, &new_lead("Acme")).await.unwrap();
    store
        .append_message(1, lead.id, &NewMessage::new(Sender::Brand, "Hi".to_string()))
        .await
        .unwrap();

    let updated = store
        .update(1, lead.id, &LeadChanges::status(LeadStatus::Negotiating))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.messages.len(), 1);
    assert_eq!(updated.messages[0].content, "Hi");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn appends_keep_arrival_order(pool: PgPool) {
    let store = PgLeadStore::new(pool);
    let lead = store.create(1, &new_lead("Acme")).await.unwrap();

    let mut last_activity = lead.last_activity;
    for (sender, text) in [
        (Sender::Brand, "First"),
        (Sender::Influencer, "Second"),
        (Sender::Brand, "Third"),
    ] {
        let updated = store
            .append_message(1, lead.id, &NewMessage::new(sender, text.to_string()))
            .await
            .unwrap()
            .unwrap();
        assert!(updated.last_activity >= last_activity);
        last_activity = updated.last_activity;
    }

    let stored = store.get(1, lead.id).await.unwrap().unwrap();
    let contents: Vec<&str> = stored.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["First", "Second", "Third"]);
    assert!(!stored.messages[0].is_read);
    assert!(stored.messages[1].is_read);
    assert!(stored
        .messages
        .windows(2)
        .all(|w| w[0].timestamp <= w[1].timestamp));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn concurrent_appends_are_not_lost(pool: PgPool) {
    let store = PgLeadStore::new(pool);
    let lead_id = store.create(1, &new_lead("Acme")).await.unwrap().id;

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .append_message(1, lead_id, &NewMessage::new(Sender::Brand, format!("m{i}")))
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let stored = store.get(1, lead_id).await.unwrap().unwrap();
    assert_eq!(stored.messages.len(), 10);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn list_is_owner_scoped_and_most_recent_first(pool: PgPool) {
    let store = PgLeadStore::new(pool);
    let older = store.create(1, &new_lead("Older")).await.unwrap();
    let newer = store.create(1, &new_lead("Newer")).await.unwrap();
    store.create(2, &new_lead("Someone else")).await.unwrap();

    store
        .append_message(1, older.id, &NewMessage::new(Sender::Brand, "ping".into()))
        .await
        .unwrap();

    let leads = store.list_all(1).await.unwrap();
    let ids: Vec<i64> = leads.iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![older.id, newer.id]);
    assert_eq!(leads[0].messages.len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn delete_removes_lead_and_thread(pool: PgPool) {
    let store = PgLeadStore::new(pool.clone());
    let lead = store.create(1, &new_lead("Acme")).await.unwrap();
    store
        .append_message(1, lead.id, &NewMessage::new(Sender::Brand, "hi".into()))
        .await
        .unwrap();

    assert!(store.delete(1, lead.id).await.unwrap());
    assert!(store.get(1, lead.id).await.unwrap().is_none());

    let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lead_messages WHERE lead_id = $1")
        .bind(lead.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(orphans, 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn corrupted_status_surfaces_as_persistence_error(pool: PgPool) {
    let store = PgLeadStore::new(pool.clone());
    let lead = store.create(1, &new_lead("Acme")).await.unwrap();

    // Bypass the CHECK constraint to simulate a row written by an older schema.
    sqlx::query("ALTER TABLE leads DROP CONSTRAINT leads_status_check")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("UPDATE leads SET status = 'archived' WHERE id = $1")
        .bind(lead.id)
        .execute(&pool)
        .await
        .unwrap();

    assert_matches!(
        store.get(1, lead.id).await,
        Err(influence_core::error::CoreError::Persistence(_))
    );
}
