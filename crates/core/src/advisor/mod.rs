//! Equipment recommendation engine
//!
//! Maps questionnaire answers to an equipment bundle by running an ordered list of
//! sizing rules over an accumulator. Pure and deterministic: the same answers always
//! produce the same bundle and the same reasons, so callers may recompute freely.

mod rules;

pub use rules::{
    BudgetAdvisory, ConsoleSelection, GuestCountSizing, MicrophonePassThrough, SizingRule,
    VenueAdjustment, DEFAULT_RULES, OUTDOOR_SUBWOOFER_REASON,
};

use chrono::{Local, NaiveDateTime};

use crate::domain::answers::Answers;
use crate::domain::recommendation::{Advice, Recommendation};
use crate::logistics::{classify_zone, is_urgent_at};

/// Runs the default rule pipeline.
///
/// Does not check the mandatory answers; callers gate on
/// [`Answers::missing_mandatory`] before asking for a recommendation.
pub fn recommend(answers: &Answers) -> Recommendation {
    run_rules(DEFAULT_RULES.iter().copied(), answers)
}

/// Recommendation plus zone and urgency, evaluated against the local clock.
pub fn advise(answers: &Answers) -> Advice {
    advise_at(answers, Local::now().naive_local())
}

pub fn advise_at(answers: &Answers, now: NaiveDateTime) -> Advice {
    advise_with(answers, recommend(answers), now)
}

/// Attaches zone and urgency to a recommendation that was already computed.
pub fn advise_with(answers: &Answers, recommendation: Recommendation, now: NaiveDateTime) -> Advice {
    Advice {
        recommendation,
        zone: classify_zone(&answers.postal_code),
        urgent: answers.event_date_time().map(|value| is_urgent_at(value, now)).unwrap_or(false),
    }
}

fn run_rules<'a>(
    rules: impl IntoIterator<Item = &'a dyn SizingRule>,
    answers: &Answers,
) -> Recommendation {
    rules.into_iter().fold(Recommendation::default(), |mut draft, rule| {
        rule.apply(answers, &mut draft);
        draft
    })
}

/// Rule pipeline with a caller-chosen rule list.
pub struct RecommendationEngine {
    rules: Vec<Box<dyn SizingRule>>,
}

impl RecommendationEngine {
    pub fn new() -> Self {
        Self::with_rules(vec![
            Box::new(GuestCountSizing),
            Box::new(VenueAdjustment),
            Box::new(ConsoleSelection),
            Box::new(MicrophonePassThrough),
            Box::new(BudgetAdvisory),
        ])
    }

    pub fn with_rules(rules: Vec<Box<dyn SizingRule>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn recommend(&self, answers: &Answers) -> Recommendation {
        run_rules(self.rules.iter().map(|rule| rule.as_ref()), answers)
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RecommendationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecommendationEngine").field("rules", &self.rule_names()).finish()
    }
}
