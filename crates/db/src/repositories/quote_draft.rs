use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use soundrush_core::quote::{QuoteDraft, QuoteDraftId, QuoteDraftStatus};
use sqlx::{sqlite::SqliteRow, Row};

use super::{QuoteDraftRepository, RepositoryError};
use crate::DbPool;

pub struct SqlQuoteDraftRepository {
    pool: DbPool,
}

impl SqlQuoteDraftRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl QuoteDraftRepository for SqlQuoteDraftRepository {
    async fn save(&self, draft: QuoteDraft) -> Result<(), RepositoryError> {
        let answers_json = serde_json::to_string(&draft.answers)
            .map_err(|error| RepositoryError::Encode(format!("answers: {error}")))?;
        let advice_json = serde_json::to_string(&draft.advice)
            .map_err(|error| RepositoryError::Encode(format!("advice: {error}")))?;

        sqlx::query(
            r#"
            INSERT INTO quote_draft (
                id, status, zone, urgent, postal_code, event_date_time,
                answers_json, advice_json, estimate_total, currency, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                status = excluded.status,
                zone = excluded.zone,
                urgent = excluded.urgent,
                postal_code = excluded.postal_code,
                event_date_time = excluded.event_date_time,
                answers_json = excluded.answers_json,
                advice_json = excluded.advice_json,
                estimate_total = excluded.estimate_total,
                currency = excluded.currency
            "#,
        )
        .bind(&draft.id.0)
        .bind(draft.status.as_str())
        .bind(draft.advice.zone.as_str())
        .bind(draft.advice.urgent)
        .bind(draft.answers.postal_code.trim())
        .bind(draft.answers.event_date_time())
        .bind(answers_json)
        .bind(advice_json)
        .bind(draft.estimate_total.to_string())
        .bind(&draft.currency)
        .bind(draft.created_at.to_rfc3339_opts(SecondsFormat::Micros, true))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &QuoteDraftId) -> Result<Option<QuoteDraft>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, status, answers_json, advice_json, estimate_total, currency, created_at
            FROM quote_draft
            WHERE id = ?
            "#,
        )
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(quote_draft_from_row).transpose()
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<QuoteDraft>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, status, answers_json, advice_json, estimate_total, currency, created_at
            FROM quote_draft
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(quote_draft_from_row).collect()
    }
}

fn quote_draft_from_row(row: &SqliteRow) -> Result<QuoteDraft, RepositoryError> {
    let id: String = row.try_get("id")?;
    let status: String = row.try_get("status")?;
    let answers_json: String = row.try_get("answers_json")?;
    let advice_json: String = row.try_get("advice_json")?;
    let estimate_total: String = row.try_get("estimate_total")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(QuoteDraft {
        id: QuoteDraftId(id),
        status: QuoteDraftStatus::from_str(&status)
            .map_err(|_| RepositoryError::Decode(format!("invalid status: {status}")))?,
        answers: serde_json::from_str(&answers_json)
            .map_err(|error| RepositoryError::Decode(format!("invalid answers_json: {error}")))?,
        advice: serde_json::from_str(&advice_json)
            .map_err(|error| RepositoryError::Decode(format!("invalid advice_json: {error}")))?,
        estimate_total: Decimal::from_str(&estimate_total).map_err(|error| {
            RepositoryError::Decode(format!("invalid estimate_total `{estimate_total}`: {error}"))
        })?,
        currency: row.try_get("currency")?,
        created_at: parse_timestamp("created_at", created_at)?,
    })
}

fn parse_timestamp(column: &str, value: String) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(&value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Decode(format!("invalid timestamp in `{column}`: {e}")))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;
    use soundrush_core::advisor::advise;
    use soundrush_core::domain::answers::{Answers, AudioSource, EventType, GuestBucket, Venue};
    use soundrush_core::logistics::Zone;
    use soundrush_core::quote::{QuoteDraft, QuoteDraftId, QuoteDraftStatus};

    use super::SqlQuoteDraftRepository;
    use crate::repositories::{QuoteDraftRepository, RepositoryError};
    use crate::{connect_with_settings, migrations, DbPool};

    async fn setup_pool() -> DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30)
            .await
            .expect("connect test pool");
        migrations::run_pending(&pool).await.expect("run migrations");
        pool
    }

    fn draft(id: &str, postal_code: &str) -> QuoteDraft {
        let answers = Answers {
            event_type: Some(EventType::Wedding),
            guest_count: Some(GuestBucket::From80To150),
            venue: Some(Venue::Outdoor),
            audio_source: Some(AudioSource::ComputerTablet),
            postal_code: postal_code.to_string(),
            event_date_time: Some("2026-11-14T19:00".to_string()),
            ..Answers::default()
        };
        QuoteDraft {
            id: QuoteDraftId(id.to_string()),
            status: QuoteDraftStatus::Draft,
            advice: advise(&answers),
            answers,
            estimate_total: Decimal::new(39550, 2),
            currency: "EUR".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn sql_repo_round_trips_a_draft() {
        let repo = SqlQuoteDraftRepository::new(setup_pool().await);
        let saved = draft("QD-000000000001", "77300");

        repo.save(saved.clone()).await.expect("save draft");
        let loaded = repo.find_by_id(&saved.id).await.expect("find draft").expect("draft exists");

        assert_eq!(loaded.answers, saved.answers);
        assert_eq!(loaded.advice, saved.advice);
        assert_eq!(loaded.advice.zone, Zone::OuterRing);
        assert_eq!(loaded.estimate_total, Decimal::new(39550, 2));
        assert_eq!(loaded.created_at.timestamp(), saved.created_at.timestamp());
    }

    #[tokio::test]
    async fn sql_repo_returns_none_for_unknown_id() {
        let repo = SqlQuoteDraftRepository::new(setup_pool().await);
        let missing =
            repo.find_by_id(&QuoteDraftId("QD-missing".to_string())).await.expect("query");
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn sql_repo_save_is_an_upsert() {
        let repo = SqlQuoteDraftRepository::new(setup_pool().await);
        let mut saved = draft("QD-000000000002", "75011");
        repo.save(saved.clone()).await.expect("first save");

        saved.estimate_total = Decimal::new(41000, 2);
        repo.save(saved.clone()).await.expect("second save");

        let loaded = repo.find_by_id(&saved.id).await.expect("find").expect("exists");
        assert_eq!(loaded.estimate_total, Decimal::new(41000, 2));
        assert_eq!(repo.list_recent(10).await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn sql_repo_lists_newest_first_with_limit() {
        let repo = SqlQuoteDraftRepository::new(setup_pool().await);
        let now = Utc::now();
        for (offset, id) in ["QD-000000000010", "QD-000000000011", "QD-000000000012"].iter().enumerate()
        {
            let mut entry = draft(id, "92100");
            entry.created_at = now + Duration::minutes(offset as i64);
            repo.save(entry).await.expect("save");
        }

        let recent = repo.list_recent(2).await.expect("list");
        let ids: Vec<&str> = recent.iter().map(|entry| entry.id.0.as_str()).collect();
        assert_eq!(ids, vec!["QD-000000000012", "QD-000000000011"]);
    }

    #[tokio::test]
    async fn corrupt_row_surfaces_decode_error() {
        let pool = setup_pool().await;
        sqlx::query(
            "INSERT INTO quote_draft (id, status, zone, answers_json, advice_json, estimate_total, currency, created_at)
             VALUES ('QD-bad', 'draft', 'paris', '{}', 'not json', '0', 'EUR', '2026-01-01T00:00:00Z')",
        )
        .execute(&pool)
        .await
        .expect("insert corrupt row");
        let repo = SqlQuoteDraftRepository::new(pool);

        let error = repo
            .find_by_id(&QuoteDraftId("QD-bad".to_string()))
            .await
            .expect_err("advice_json is invalid");
        assert!(matches!(error, RepositoryError::Decode(ref message) if message.contains("advice_json")));
    }
}
