use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::answers::Answers;
use crate::domain::recommendation::Advice;
use crate::errors::DomainError;
use crate::quote::QuoteEstimate;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteDraftId(pub String);

impl QuoteDraftId {
    pub fn generate() -> Self {
        let simple = Uuid::new_v4().simple().to_string();
        Self(format!("QD-{}", &simple[..12]))
    }
}

impl std::fmt::Display for QuoteDraftId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteDraftStatus {
    Draft,
}

impl QuoteDraftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
        }
    }
}

impl std::str::FromStr for QuoteDraftStatus {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "draft" => Ok(Self::Draft),
            other => {
                Err(DomainError::InvariantViolation(format!("unknown draft status `{other}`")))
            }
        }
    }
}

/// Quote request saved from a finished questionnaire, ready for the sales team.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteDraft {
    pub id: QuoteDraftId,
    pub status: QuoteDraftStatus,
    pub answers: Answers,
    pub advice: Advice,
    pub estimate_total: Decimal,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

impl QuoteDraft {
    /// Fails when the answers cannot yield a recommendation.
    pub fn new(
        answers: Answers,
        advice: Advice,
        estimate: &QuoteEstimate,
    ) -> Result<Self, DomainError> {
        let missing = answers.missing_mandatory();
        if !missing.is_empty() {
            return Err(DomainError::IncompleteAnswers {
                missing: missing.into_iter().map(str::to_string).collect(),
            });
        }

        Ok(Self {
            id: QuoteDraftId::generate(),
            status: QuoteDraftStatus::Draft,
            answers,
            advice,
            estimate_total: estimate.total,
            currency: estimate.currency.clone(),
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{QuoteDraft, QuoteDraftId, QuoteDraftStatus};
    use crate::advisor::advise;
    use crate::config::PricingConfig;
    use crate::domain::answers::{Answers, EventType, GuestBucket, Venue};
    use crate::errors::DomainError;
    use crate::quote::{estimate, QuotePrefill};

    #[test]
    fn generated_ids_are_prefixed_and_distinct() {
        let first = QuoteDraftId::generate();
        let second = QuoteDraftId::generate();
        assert!(first.0.starts_with("QD-"));
        assert_eq!(first.0.len(), 15);
        assert_ne!(first, second);
    }

    #[test]
    fn status_parses_its_own_labels() {
        assert_eq!("draft".parse::<QuoteDraftStatus>(), Ok(QuoteDraftStatus::Draft));
        assert!("sent".parse::<QuoteDraftStatus>().is_err());
        assert!("archived".parse::<QuoteDraftStatus>().is_err());
    }

    #[test]
    fn draft_requires_mandatory_answers() {
        let answers = Answers { event_type: Some(EventType::Birthday), ..Answers::default() };
        let advice = advise(&answers);
        let estimate =
            estimate(&QuotePrefill::from_advice(&answers, &advice), &PricingConfig::default());

        let error = QuoteDraft::new(answers, advice, &estimate).expect_err("incomplete answers");
        assert_eq!(
            error,
            DomainError::IncompleteAnswers {
                missing: vec!["guestCount".to_string(), "venue".to_string()]
            }
        );
    }

    #[test]
    fn draft_copies_estimate_total() {
        let answers = Answers {
            event_type: Some(EventType::Birthday),
            guest_count: Some(GuestBucket::From40To80),
            venue: Some(Venue::Indoor),
            postal_code: "75002".to_string(),
            ..Answers::default()
        };
        let advice = advise(&answers);
        let estimate =
            estimate(&QuotePrefill::from_advice(&answers, &advice), &PricingConfig::default());

        let draft = QuoteDraft::new(answers, advice, &estimate).expect("complete answers");

        assert_eq!(draft.status, QuoteDraftStatus::Draft);
        assert_eq!(draft.estimate_total, estimate.total);
        assert_eq!(draft.currency, "EUR");
    }
}
