use soundrush_core::config::{AppConfig, ConfigError};
use soundrush_db::{connect_from_config, migrations, DbPool};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool =
        connect_from_config(&config.database).await.map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        max_connections = config.database.max_connections,
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    Ok(Application { config, db_pool })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use soundrush_core::config::{AppConfig, ConfigOverrides, LoadOptions};
    use soundrush_core::domain::answers::{Answers, EventType, GuestBucket, Venue};
    use soundrush_core::advise;
    use soundrush_core::quote::{estimate, QuoteDraft, QuotePrefill};
    use soundrush_db::{QuoteDraftRepository, SqlQuoteDraftRepository};

    use crate::bootstrap::{bootstrap_with_config, Application, BootstrapError};

    async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
        let config = AppConfig::load(options)?;
        bootstrap_with_config(config).await
    }

    #[tokio::test]
    async fn bootstrap_fails_fast_when_required_config_file_is_missing() {
        let result = bootstrap(LoadOptions {
            config_path: Some(PathBuf::from("/definitely/missing/soundrush.toml")),
            require_file: true,
            ..LoadOptions::default()
        })
        .await;

        let message = result.err().expect("missing file should fail").to_string();
        assert!(message.contains("soundrush.toml"), "{message}");
    }

    #[tokio::test]
    async fn bootstrap_migrates_and_serves_the_draft_store() {
        let app = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some("sqlite::memory:?cache=shared".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .await
        .expect("bootstrap should succeed with an in-memory database");

        let answers = Answers {
            event_type: Some(EventType::Church),
            guest_count: Some(GuestBucket::From80To150),
            venue: Some(Venue::Indoor),
            postal_code: "91300".to_string(),
            ..Answers::default()
        };
        let advice = advise(&answers);
        let estimate =
            estimate(&QuotePrefill::from_advice(&answers, &advice), &app.config.pricing);
        let draft = QuoteDraft::new(answers, advice, &estimate).expect("complete answers");

        let repository = SqlQuoteDraftRepository::new(app.db_pool.clone());
        repository.save(draft.clone()).await.expect("save draft");
        let stored = repository.find_by_id(&draft.id).await.expect("query").expect("stored");
        assert_eq!(stored.advice, draft.advice);

        app.db_pool.close().await;
    }
}
