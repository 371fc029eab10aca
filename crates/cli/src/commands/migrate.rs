use serde::Serialize;
use soundrush_core::config::{AppConfig, LoadOptions};
use soundrush_db::{connect_from_config, migrations};

use crate::commands::{current_thread_runtime, CommandResult};

#[derive(Debug, Serialize)]
pub struct MigrateReport {
    pub database_url: String,
    pub newly_applied: Vec<i64>,
    pub applied_versions: Vec<i64>,
}

type Failure = (&'static str, String, u8);

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "migrate",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match current_thread_runtime("migrate") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    match runtime.block_on(apply(&config)) {
        Ok(report) => {
            let message = match report.newly_applied.len() {
                0 => "schema already up to date".to_string(),
                count => format!("applied {count} pending migration(s)"),
            };
            CommandResult::success_with_data("migrate", message, report)
        }
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("migrate", error_class, message, exit_code)
        }
    }
}

async fn apply(config: &AppConfig) -> Result<MigrateReport, Failure> {
    let pool = connect_from_config(&config.database)
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4))?;

    // The bookkeeping table is absent on a fresh database.
    let before = migrations::applied_versions(&pool).await.unwrap_or_default();
    migrations::run_pending(&pool).await.map_err(|error| ("migration", error.to_string(), 5))?;
    let after = migrations::applied_versions(&pool)
        .await
        .map_err(|error| ("migration", error.to_string(), 5))?;
    pool.close().await;

    Ok(MigrateReport {
        database_url: config.database.url.clone(),
        newly_applied: after.iter().copied().filter(|version| !before.contains(version)).collect(),
        applied_versions: after,
    })
}
