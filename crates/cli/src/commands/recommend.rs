use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Args;
use serde::Serialize;
use soundrush_core::advisor::advise;
use soundrush_core::config::{AppConfig, LoadOptions};
use soundrush_core::domain::answers::{
    Answers, AudioSource, BudgetBand, EventType, GuestBucket, UnknownOption, Venue,
};
use soundrush_core::domain::recommendation::Advice;
use soundrush_core::quote::{estimate, QuoteEstimate, QuotePrefill};

use crate::commands::CommandResult;

#[derive(Debug, Clone, Default, Args)]
pub struct RecommendArgs {
    #[arg(long, help = "JSON file with saved answers; flags override its values")]
    pub answers: Option<PathBuf>,
    #[arg(long, help = "wedding|birthday|association|corporate|church|concert|other")]
    pub event_type: Option<String>,
    #[arg(long, help = "0-40|40-80|80-150|150+")]
    pub guests: Option<String>,
    #[arg(long, help = "indoor|outdoor")]
    pub venue: Option<String>,
    #[arg(
        long,
        help = "bluetooth-phone|wired-phone|computer-tablet|dj-controller|instrument-jack|other"
    )]
    pub source: Option<String>,
    #[arg(long, help = "Number of wired microphones")]
    pub wired_mics: Option<u32>,
    #[arg(long, help = "Number of wireless microphones")]
    pub wireless_mics: Option<u32>,
    #[arg(long, help = "Delivery postal code")]
    pub postal_code: Option<String>,
    #[arg(long, help = "Event local date and time, e.g. 2026-06-14T18:00")]
    pub date: Option<String>,
    #[arg(long, help = "0-300|300-600|600-1000|1000+")]
    pub budget: Option<String>,
    #[arg(long, help = "Explicit config file path")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct RecommendReport {
    pub answers: Answers,
    pub advice: Advice,
    pub estimate: QuoteEstimate,
}

pub fn run(args: RecommendArgs) -> CommandResult {
    let config = match AppConfig::load(LoadOptions {
        config_path: args.config.clone(),
        ..LoadOptions::default()
    }) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "recommend",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let answers = match collect_answers(&args) {
        Ok(answers) => answers,
        Err(message) => return CommandResult::failure("recommend", "invalid_input", message, 1),
    };

    let missing = answers.missing_mandatory();
    if !missing.is_empty() {
        return CommandResult::failure(
            "recommend",
            "incomplete_answers",
            format!("mandatory answers missing: {}", missing.join(", ")),
            1,
        );
    }

    let advice = advise(&answers);
    let estimate = estimate(&QuotePrefill::from_advice(&answers, &advice), &config.pricing);
    let message = summary(&advice, &estimate);

    CommandResult::success_with_data("recommend", message, RecommendReport { answers, advice, estimate })
}

pub fn collect_answers(args: &RecommendArgs) -> Result<Answers, String> {
    let mut answers = match &args.answers {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|error| format!("could not read `{}`: {error}", path.display()))?;
            serde_json::from_str::<Answers>(&raw)
                .map_err(|error| format!("could not parse `{}`: {error}", path.display()))?
        }
        None => Answers::default(),
    };

    if let Some(value) = &args.event_type {
        answers.event_type = Some(parse_option::<EventType>(value)?);
    }
    if let Some(value) = &args.guests {
        answers.guest_count = Some(parse_option::<GuestBucket>(value)?);
    }
    if let Some(value) = &args.venue {
        answers.venue = Some(parse_option::<Venue>(value)?);
    }
    if let Some(value) = &args.source {
        answers.audio_source = Some(parse_option::<AudioSource>(value)?);
    }
    if let Some(value) = args.wired_mics {
        answers.mics.wired = value;
    }
    if let Some(value) = args.wireless_mics {
        answers.mics.wireless = value;
    }
    if let Some(value) = &args.postal_code {
        answers.postal_code = value.clone();
    }
    if let Some(value) = &args.date {
        answers.event_date_time = Some(value.clone());
    }
    if let Some(value) = &args.budget {
        answers.budget = Some(parse_option::<BudgetBand>(value)?);
    }

    Ok(answers)
}

fn parse_option<T>(value: &str) -> Result<T, String>
where
    T: FromStr<Err = UnknownOption>,
{
    value.parse::<T>().map_err(|error| error.to_string())
}

fn summary(advice: &Advice, estimate: &QuoteEstimate) -> String {
    let recommendation = &advice.recommendation;
    format!(
        "{} x {} speaker, {} subwoofer(s), console {}, zone {}{}, estimate {} {}",
        recommendation.speaker_count,
        recommendation.speaker_model.as_str(),
        recommendation.subwoofer_count,
        recommendation.console_tier.as_str(),
        advice.zone.as_str(),
        if advice.urgent { " (urgent)" } else { "" },
        estimate.total,
        estimate.currency,
    )
}

#[cfg(test)]
mod tests {
    use soundrush_core::domain::answers::{EventType, GuestBucket};

    use super::{collect_answers, RecommendArgs};

    #[test]
    fn flags_fill_answers() {
        let answers = collect_answers(&RecommendArgs {
            event_type: Some("wedding".to_string()),
            guests: Some("150+".to_string()),
            wired_mics: Some(2),
            ..RecommendArgs::default()
        })
        .expect("valid flags");

        assert_eq!(answers.event_type, Some(EventType::Wedding));
        assert_eq!(answers.guest_count, Some(GuestBucket::Over150));
        assert_eq!(answers.mics.wired, 2);
        assert_eq!(answers.venue, None);
    }

    #[test]
    fn unknown_option_names_expected_values() {
        let error = collect_answers(&RecommendArgs {
            venue: Some("rooftop".to_string()),
            ..RecommendArgs::default()
        })
        .expect_err("rooftop is not a venue");

        assert!(error.contains("rooftop"));
        assert!(error.contains("indoor|outdoor"));
    }
}
