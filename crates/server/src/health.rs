use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use soundrush_core::advisor::RecommendationEngine;
use soundrush_db::DbPool;

#[derive(Clone)]
pub struct HealthState {
    db_pool: DbPool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    Ready,
    Degraded,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ComponentHealth {
    pub status: Readiness,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: Readiness,
    pub engine: ComponentHealth,
    pub draft_store: ComponentHealth,
    pub checked_at: String,
}

pub fn router(db_pool: DbPool) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { db_pool })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthReport>) {
    let engine = engine_check();
    let draft_store = draft_store_check(&state.db_pool).await;
    let ready = engine.status == Readiness::Ready && draft_store.status == Readiness::Ready;

    let report = HealthReport {
        status: if ready { Readiness::Ready } else { Readiness::Degraded },
        engine,
        draft_store,
        checked_at: Utc::now().to_rfc3339(),
    };
    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(report))
}

fn engine_check() -> ComponentHealth {
    let rules = RecommendationEngine::new().rule_names();
    if rules.is_empty() {
        return ComponentHealth {
            status: Readiness::Degraded,
            detail: "no sizing rules registered".to_string(),
        };
    }
    ComponentHealth { status: Readiness::Ready, detail: rules.join(" > ") }
}

async fn draft_store_check(pool: &DbPool) -> ComponentHealth {
    match sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM quote_draft").fetch_one(pool).await {
        Ok(count) => {
            ComponentHealth { status: Readiness::Ready, detail: format!("{count} quote drafts stored") }
        }
        Err(error) => ComponentHealth {
            status: Readiness::Degraded,
            detail: format!("draft store query failed: {error}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode, Json};
    use soundrush_db::{connect_with_settings, migrations};

    use crate::health::{health, HealthState, Readiness};

    #[tokio::test]
    async fn ready_once_migrations_have_run() {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("pool should connect");
        migrations::run_pending(&pool).await.expect("migrations");

        let (status, Json(report)) = health(State(HealthState { db_pool: pool.clone() })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(report.status, Readiness::Ready);
        assert_eq!(report.draft_store.detail, "0 quote drafts stored");
        assert!(report.engine.detail.starts_with("guest_count_sizing"));

        pool.close().await;
    }

    #[tokio::test]
    async fn degraded_before_migrations() {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("pool should connect");

        let (status, Json(report)) = health(State(HealthState { db_pool: pool.clone() })).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(report.status, Readiness::Degraded);
        assert_eq!(report.engine.status, Readiness::Ready);
        assert!(report.draft_store.detail.contains("quote_draft"));

        pool.close().await;
    }

    #[tokio::test]
    async fn degraded_when_pool_is_closed() {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("pool should connect");
        pool.close().await;

        let (status, Json(report)) = health(State(HealthState { db_pool: pool })).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(report.draft_store.status, Readiness::Degraded);
    }
}
