//! Hand-off from the advisor to quoting: prefill payload, estimate and persisted drafts.

pub mod draft;
pub mod estimate;

pub use draft::{QuoteDraft, QuoteDraftId, QuoteDraftStatus};
pub use estimate::{estimate, EstimateLine, EstimateTraceStep, QuoteEstimate};

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::domain::answers::{Answers, AudioSource};
use crate::domain::recommendation::{Advice, Recommendation};
use crate::logistics::Zone;

/// What the quote form is prefilled with once the questionnaire reaches its result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotePrefill {
    pub recommendation: Recommendation,
    pub zone: Zone,
    pub urgent: bool,
    pub event_date_time: Option<String>,
    pub postal_code: String,
    pub audio_source: Option<AudioSource>,
}

impl QuotePrefill {
    pub fn new(answers: &Answers, recommendation: Recommendation, zone: Zone, urgent: bool) -> Self {
        Self {
            recommendation,
            zone,
            urgent,
            event_date_time: answers.event_date_time().map(str::to_string),
            postal_code: answers.postal_code.trim().to_string(),
            audio_source: answers.audio_source,
        }
    }

    pub fn from_advice(answers: &Answers, advice: &Advice) -> Self {
        Self::new(answers, advice.recommendation.clone(), advice.zone, advice.urgent)
    }

    pub fn advice(&self) -> Advice {
        Advice { recommendation: self.recommendation.clone(), zone: self.zone, urgent: self.urgent }
    }
}

/// Receives prefills from a finished questionnaire.
pub trait QuotePrefillSink: Send + Sync {
    fn apply_to_quote(&self, prefill: QuotePrefill);
}

#[derive(Clone, Default)]
pub struct InMemoryPrefillSink {
    prefills: Arc<Mutex<Vec<QuotePrefill>>>,
}

impl InMemoryPrefillSink {
    pub fn prefills(&self) -> Vec<QuotePrefill> {
        match self.prefills.lock() {
            Ok(prefills) => prefills.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn last(&self) -> Option<QuotePrefill> {
        self.prefills().pop()
    }
}

impl QuotePrefillSink for InMemoryPrefillSink {
    fn apply_to_quote(&self, prefill: QuotePrefill) {
        match self.prefills.lock() {
            Ok(mut prefills) => prefills.push(prefill),
            Err(poisoned) => poisoned.into_inner().push(prefill),
        }
    }
}
