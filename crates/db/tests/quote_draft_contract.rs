use std::sync::Arc;

use chrono::{Duration, Utc};
use soundrush_core::advisor::advise;
use soundrush_core::config::PricingConfig;
use soundrush_core::domain::answers::{Answers, AudioSource, EventType, GuestBucket, Venue};
use soundrush_core::quote::{estimate, QuoteDraft, QuotePrefill};
use soundrush_db::{
    connect_with_settings, migrations, InMemoryQuoteDraftRepository, QuoteDraftRepository,
    SqlQuoteDraftRepository,
};

fn draft_for(postal_code: &str, minutes: i64) -> QuoteDraft {
    let answers = Answers {
        event_type: Some(EventType::Association),
        guest_count: Some(GuestBucket::From40To80),
        venue: Some(Venue::Indoor),
        audio_source: Some(AudioSource::BluetoothPhone),
        postal_code: postal_code.to_string(),
        ..Answers::default()
    };
    let advice = advise(&answers);
    let estimate =
        estimate(&QuotePrefill::from_advice(&answers, &advice), &PricingConfig::default());
    let mut draft = QuoteDraft::new(answers, advice, &estimate).expect("complete answers");
    draft.created_at = Utc::now() + Duration::seconds(minutes * 60);
    draft
}

async fn repositories() -> Vec<(&'static str, Arc<dyn QuoteDraftRepository>)> {
    let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
    migrations::run_pending(&pool).await.expect("run migrations");

    vec![
        ("sql", Arc::new(SqlQuoteDraftRepository::new(pool)) as Arc<dyn QuoteDraftRepository>),
        ("memory", Arc::new(InMemoryQuoteDraftRepository::default())),
    ]
}

#[tokio::test]
async fn every_repository_honours_the_same_contract() {
    for (name, repo) in repositories().await {
        let older = draft_for("75015", 0);
        let newer = draft_for("94200", 1);

        repo.save(older.clone()).await.expect("save older");
        repo.save(newer.clone()).await.expect("save newer");

        let found = repo.find_by_id(&newer.id).await.expect("find").expect("draft exists");
        assert_eq!(found.id, newer.id, "{name}");
        assert_eq!(found.answers, newer.answers, "{name}");
        assert_eq!(found.advice, newer.advice, "{name}");
        assert_eq!(found.estimate_total, newer.estimate_total, "{name}");

        let recent = repo.list_recent(10).await.expect("list");
        let ids: Vec<_> = recent.iter().map(|entry| entry.id.clone()).collect();
        assert_eq!(ids, vec![newer.id.clone(), older.id.clone()], "{name}");
    }
}
