use std::collections::HashMap;

use tokio::sync::RwLock;

use soundrush_core::quote::{QuoteDraft, QuoteDraftId};

use super::{QuoteDraftRepository, RepositoryError};

#[derive(Default)]
pub struct InMemoryQuoteDraftRepository {
    drafts: RwLock<HashMap<String, QuoteDraft>>,
}

#[async_trait::async_trait]
impl QuoteDraftRepository for InMemoryQuoteDraftRepository {
    async fn save(&self, draft: QuoteDraft) -> Result<(), RepositoryError> {
        let mut drafts = self.drafts.write().await;
        drafts.insert(draft.id.0.clone(), draft);
        Ok(())
    }

    async fn find_by_id(&self, id: &QuoteDraftId) -> Result<Option<QuoteDraft>, RepositoryError> {
        let drafts = self.drafts.read().await;
        Ok(drafts.get(&id.0).cloned())
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<QuoteDraft>, RepositoryError> {
        let drafts = self.drafts.read().await;
        let mut recent: Vec<QuoteDraft> = drafts.values().cloned().collect();
        recent.sort_by(|left, right| {
            right.created_at.cmp(&left.created_at).then_with(|| right.id.0.cmp(&left.id.0))
        });
        recent.truncate(limit as usize);
        Ok(recent)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;
    use soundrush_core::advisor::advise;
    use soundrush_core::domain::answers::{Answers, EventType, GuestBucket, Venue};
    use soundrush_core::quote::{QuoteDraft, QuoteDraftId, QuoteDraftStatus};

    use crate::repositories::{InMemoryQuoteDraftRepository, QuoteDraftRepository};

    fn draft(id: &str, minutes: i64) -> QuoteDraft {
        let answers = Answers {
            event_type: Some(EventType::Corporate),
            guest_count: Some(GuestBucket::UpTo40),
            venue: Some(Venue::Indoor),
            ..Answers::default()
        };
        QuoteDraft {
            id: QuoteDraftId(id.to_string()),
            status: QuoteDraftStatus::Draft,
            advice: advise(&answers),
            answers,
            estimate_total: Decimal::new(35, 0),
            currency: "EUR".to_string(),
            created_at: Utc::now() + Duration::minutes(minutes),
        }
    }

    #[tokio::test]
    async fn in_memory_repo_round_trip() {
        let repo = InMemoryQuoteDraftRepository::default();
        let saved = draft("QD-memory-1", 0);

        repo.save(saved.clone()).await.expect("save");

        assert_eq!(repo.find_by_id(&saved.id).await.expect("find"), Some(saved));
        assert_eq!(
            repo.find_by_id(&QuoteDraftId("QD-unknown".to_string())).await.expect("find"),
            None
        );
    }

    #[tokio::test]
    async fn in_memory_repo_lists_newest_first() {
        let repo = InMemoryQuoteDraftRepository::default();
        for (id, minutes) in [("QD-a", 0), ("QD-b", 5), ("QD-c", 2)] {
            repo.save(draft(id, minutes)).await.expect("save");
        }

        let ids: Vec<String> =
            repo.list_recent(2).await.expect("list").into_iter().map(|entry| entry.id.0).collect();
        assert_eq!(ids, vec!["QD-b".to_string(), "QD-c".to_string()]);
        assert!(repo.list_recent(0).await.expect("list").is_empty());
    }
}
