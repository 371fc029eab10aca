use chrono::{Local, NaiveDateTime};
use thiserror::Error;

use crate::advisor::{advise_with, recommend};
use crate::audit::{AuditCategory, AuditContext, AuditEvent, AuditOutcome, AuditSink};
use crate::domain::answers::Answers;
use crate::domain::recommendation::Recommendation;
use crate::flows::states::{QuestionStep, StepAction, StepEvent, StepOutcome};
use crate::logistics::plausible_postal_country;
use crate::quote::{QuotePrefill, QuotePrefillSink};

pub const MISSING_ANSWER_MESSAGE: &str = "Please answer this question before continuing.";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StepError {
    #[error("step {step:?} has no answer yet")]
    MissingAnswer { step: QuestionStep },
    #[error("postal code `{value}` does not look like a postal code")]
    ImplausiblePostalCode { value: String },
    #[error("invalid transition from {step:?} using event {event:?}")]
    InvalidTransition { step: QuestionStep, event: StepEvent },
    #[error("no recommendation available at step {step:?}")]
    NotAtResult { step: QuestionStep },
}

impl StepError {
    /// Inline message shown under the current question.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingAnswer { .. } => MISSING_ANSWER_MESSAGE,
            Self::ImplausiblePostalCode { .. } => {
                "Please enter a valid postal code (for example 75011)."
            }
            Self::InvalidTransition { .. } | Self::NotAtResult { .. } => {
                "This action is not available at this step."
            }
        }
    }
}

/// Checks that the answer a step asks for is present.
pub fn validate_step(step: QuestionStep, answers: &Answers) -> Result<(), StepError> {
    if !step.requires_answer() {
        return Ok(());
    }

    let answered = match step {
        QuestionStep::EventType => answers.event_type.is_some(),
        QuestionStep::GuestCount => answers.guest_count.is_some(),
        QuestionStep::Venue => answers.venue.is_some(),
        QuestionStep::AudioSource => answers.audio_source.is_some(),
        QuestionStep::Logistics => !answers.postal_code.trim().is_empty(),
        QuestionStep::NeedsAndMics | QuestionStep::Result => true,
    };
    if !answered {
        return Err(StepError::MissingAnswer { step });
    }

    if step == QuestionStep::Logistics && plausible_postal_country(&answers.postal_code).is_none() {
        return Err(StepError::ImplausiblePostalCode { value: answers.postal_code.clone() });
    }
    Ok(())
}

/// Pure transition table of the questionnaire.
pub fn transition(
    current: QuestionStep,
    event: StepEvent,
    answers: &Answers,
) -> Result<StepOutcome, StepError> {
    use StepAction::{ClearAnswers, ClearValidationError, MaterializeRecommendation};

    let (to, actions) = match (current, event) {
        (QuestionStep::Result, StepEvent::Next) => {
            return Err(StepError::InvalidTransition { step: current, event });
        }
        (_, StepEvent::Next) => {
            validate_step(current, answers)?;
            let to = current
                .following()
                .ok_or(StepError::InvalidTransition { step: current, event })?;
            let mut actions = vec![ClearValidationError];
            if to.is_terminal() {
                actions.push(MaterializeRecommendation);
            }
            (to, actions)
        }
        // Going back from the first step stays put.
        (_, StepEvent::Prev) => {
            (current.preceding().unwrap_or(current), vec![ClearValidationError])
        }
        (QuestionStep::Result, StepEvent::Restart) => {
            (QuestionStep::EventType, vec![ClearAnswers, ClearValidationError])
        }
        (_, StepEvent::Restart) => {
            return Err(StepError::InvalidTransition { step: current, event });
        }
    };

    Ok(StepOutcome { from: current, to, event, actions })
}

/// One questionnaire session: current step, accumulated answers, pending inline error
/// and the recommendation materialized on reaching the result step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Questionnaire {
    step: QuestionStep,
    answers: Answers,
    error: Option<String>,
    result: Option<Recommendation>,
}

impl Default for Questionnaire {
    fn default() -> Self {
        Self::with_answers(Answers::default())
    }
}

impl Questionnaire {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resumes a session from previously saved answers, at the first step.
    pub fn with_answers(answers: Answers) -> Self {
        Self { step: QuestionStep::EventType, answers, error: None, result: None }
    }

    pub fn step(&self) -> QuestionStep {
        self.step
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result(&self) -> Option<&Recommendation> {
        self.result.as_ref()
    }

    /// Edits the answers. Any pending validation message is cleared.
    pub fn update<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut Answers),
    {
        edit(&mut self.answers);
        self.error = None;
    }

    /// Live recommendation for the current answers, once the mandatory ones are set.
    pub fn preview(&self) -> Option<Recommendation> {
        self.answers.has_mandatory().then(|| recommend(&self.answers))
    }

    pub fn next(&mut self) -> Result<StepOutcome, StepError> {
        self.apply(StepEvent::Next)
    }

    pub fn prev(&mut self) -> Result<StepOutcome, StepError> {
        self.apply(StepEvent::Prev)
    }

    pub fn restart(&mut self) -> Result<StepOutcome, StepError> {
        self.apply(StepEvent::Restart)
    }

    pub fn apply(&mut self, event: StepEvent) -> Result<StepOutcome, StepError> {
        let outcome = match transition(self.step(), event, &self.answers) {
            Ok(outcome) => outcome,
            Err(error) => {
                self.error = Some(error.user_message().to_string());
                return Err(error);
            }
        };

        for action in &outcome.actions {
            match action {
                StepAction::ClearValidationError => self.error = None,
                StepAction::MaterializeRecommendation => {
                    self.result = Some(recommend(&self.answers));
                }
                StepAction::ClearAnswers => {
                    self.answers = Answers::default();
                    self.result = None;
                }
            }
        }
        if !outcome.to.is_terminal() {
            self.result = None;
        }
        self.step = outcome.to;

        Ok(outcome)
    }

    pub fn apply_with_audit<S>(
        &mut self,
        event: StepEvent,
        sink: &S,
        audit: &AuditContext,
    ) -> Result<StepOutcome, StepError>
    where
        S: AuditSink,
    {
        let result = self.apply(event);
        match &result {
            Ok(outcome) => {
                sink.emit(
                    AuditEvent::new(
                        audit,
                        "questionnaire.transition_applied",
                        AuditCategory::Questionnaire,
                        AuditOutcome::Success,
                    )
                    .with_metadata("from", format!("{:?}", outcome.from))
                    .with_metadata("to", format!("{:?}", outcome.to))
                    .with_metadata("event", format!("{:?}", outcome.event)),
                );
                let materialized =
                    outcome.actions.contains(&StepAction::MaterializeRecommendation);
                if let Some(recommendation) = self.result.as_ref().filter(|_| materialized) {
                    sink.emit(
                        AuditEvent::new(
                            audit,
                            "recommendation.materialized",
                            AuditCategory::Recommendation,
                            AuditOutcome::Success,
                        )
                        .with_metadata("speaker_count", recommendation.speaker_count.to_string())
                        .with_metadata(
                            "subwoofer_count",
                            recommendation.subwoofer_count.to_string(),
                        )
                        .with_metadata("console_tier", recommendation.console_tier.as_str()),
                    );
                }
            }
            Err(error) => {
                sink.emit(
                    AuditEvent::new(
                        audit,
                        "questionnaire.transition_rejected",
                        AuditCategory::Questionnaire,
                        AuditOutcome::Rejected,
                    )
                    .with_metadata("error", error.to_string()),
                );
            }
        }
        result
    }

    /// Builds the quote prefill from the materialized recommendation.
    pub fn prefill_at(&self, now: NaiveDateTime) -> Result<QuotePrefill, StepError> {
        let recommendation = match (self.step(), &self.result) {
            (QuestionStep::Result, Some(recommendation)) => recommendation.clone(),
            _ => return Err(StepError::NotAtResult { step: self.step() }),
        };
        let advice = advise_with(&self.answers, recommendation, now);
        Ok(QuotePrefill::new(&self.answers, advice.recommendation, advice.zone, advice.urgent))
    }

    pub fn prefill(&self) -> Result<QuotePrefill, StepError> {
        self.prefill_at(Local::now().naive_local())
    }

    /// Hands the prefill to the quote collaborator. The session itself is left untouched.
    pub fn apply_to_quote<S>(&self, sink: &S) -> Result<QuotePrefill, StepError>
    where
        S: QuotePrefillSink + ?Sized,
    {
        self.apply_to_quote_at(sink, Local::now().naive_local())
    }

    pub fn apply_to_quote_at<S>(
        &self,
        sink: &S,
        now: NaiveDateTime,
    ) -> Result<QuotePrefill, StepError>
    where
        S: QuotePrefillSink + ?Sized,
    {
        let prefill = self.prefill_at(now)?;
        sink.apply_to_quote(prefill.clone());
        Ok(prefill)
    }
}
