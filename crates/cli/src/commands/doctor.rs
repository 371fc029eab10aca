use serde::Serialize;
use soundrush_core::advisor::RecommendationEngine;
use soundrush_core::config::{AppConfig, LoadOptions};
use soundrush_core::domain::answers::{Answers, AudioSource, EventType, GuestBucket, Venue};
use soundrush_core::domain::recommendation::SpeakerModel;
use soundrush_core::logistics::{classify_zone, Zone};
use soundrush_db::{connect_from_config, migrations};

use crate::commands::current_thread_runtime;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

impl DoctorReport {
    fn passed(&self) -> bool {
        self.overall_status == CheckStatus::Pass
    }
}

pub struct DoctorOutput {
    pub passed: bool,
    pub output: String,
}

pub fn run(json_output: bool) -> DoctorOutput {
    let report = build_report();
    let passed = report.passed();

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
            )
        })
    } else {
        render_human(&report)
    };

    DoctorOutput { passed, output }
}

fn build_report() -> DoctorReport {
    let mut checks = vec![check_recommendation_engine()];

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_pricing(&config));
            checks.push(check_database_connectivity(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["delivery_pricing", "database_connectivity"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

/// Runs the rule pipeline on a known large outdoor wedding and compares the
/// outcome with the expected rig.
fn check_recommendation_engine() -> DoctorCheck {
    let engine = RecommendationEngine::new();
    let answers = Answers {
        event_type: Some(EventType::Wedding),
        guest_count: Some(GuestBucket::Over150),
        venue: Some(Venue::Outdoor),
        audio_source: Some(AudioSource::DjController),
        ..Answers::default()
    };
    let recommendation = engine.recommend(&answers);

    let expected = (2, 2, "16-channel");
    let actual = (
        recommendation.speaker_count,
        recommendation.subwoofer_count,
        recommendation.console_tier.as_str(),
    );

    if actual == expected
        && recommendation.speaker_model == SpeakerModel::HighPower
        && classify_zone("75011") == Zone::Paris
    {
        DoctorCheck {
            name: "recommendation_engine",
            status: CheckStatus::Pass,
            details: format!("{} sizing rules answered the reference event", engine.rule_names().len()),
        }
    } else {
        DoctorCheck {
            name: "recommendation_engine",
            status: CheckStatus::Fail,
            details: format!("reference event sized as {actual:?}, expected {expected:?}"),
        }
    }
}

fn check_pricing(config: &AppConfig) -> DoctorCheck {
    let served = [Zone::Paris, Zone::InnerRing, Zone::OuterRing];
    let unpriced: Vec<&str> = served
        .iter()
        .filter(|zone| config.pricing.delivery_fee(**zone).is_none())
        .map(|zone| zone.as_str())
        .collect();

    if unpriced.is_empty() {
        DoctorCheck {
            name: "delivery_pricing",
            status: CheckStatus::Pass,
            details: format!(
                "delivery fees {}/{}/{} {}",
                config.pricing.delivery_paris,
                config.pricing.delivery_inner_ring,
                config.pricing.delivery_outer_ring,
                config.pricing.currency
            ),
        }
    } else {
        DoctorCheck {
            name: "delivery_pricing",
            status: CheckStatus::Fail,
            details: format!("no delivery fee for {}", unpriced.join(", ")),
        }
    }
}

fn check_database_connectivity(config: &AppConfig) -> DoctorCheck {
    let runtime = match current_thread_runtime("doctor") {
        Ok(runtime) => runtime,
        Err(_) => {
            return DoctorCheck {
                name: "database_connectivity",
                status: CheckStatus::Fail,
                details: "failed to initialize async runtime".to_string(),
            };
        }
    };

    let result = runtime.block_on(async {
        let pool = connect_from_config(&config.database)
            .await
            .map_err(|error| format!("failed to connect to database: {error}"))?;
        let current = migrations::is_current(&pool).await.unwrap_or(false);
        pool.close().await;
        Ok::<bool, String>(current)
    });

    match result {
        Ok(current) => DoctorCheck {
            name: "database_connectivity",
            status: CheckStatus::Pass,
            details: format!(
                "connected using `{}` (schema {})",
                config.database.url,
                if current { "up to date" } else { "has pending migrations" }
            ),
        },
        Err(error) => {
            DoctorCheck { name: "database_connectivity", status: CheckStatus::Fail, details: error }
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = vec![report.summary.clone()];

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}
