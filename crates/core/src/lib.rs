pub mod advisor;
pub mod audit;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod flows;
pub mod logistics;
pub mod quote;

pub use advisor::{advise, advise_at, advise_with, recommend, RecommendationEngine, SizingRule};
pub use audit::{AuditContext, AuditEvent, AuditSink, InMemoryAuditSink};
pub use domain::answers::{
    Answers, AudioSource, BudgetBand, EventType, GuestBucket, MicCounts, Needs, UnknownOption,
    Venue,
};
pub use domain::recommendation::{Advice, ConsoleTier, Recommendation, SpeakerModel};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use flows::{QuestionStep, Questionnaire, StepError, StepEvent};
pub use logistics::{classify_zone, is_urgent, plausible_postal_country, Zone};
pub use quote::{
    estimate, InMemoryPrefillSink, QuoteDraft, QuoteDraftId, QuoteDraftStatus, QuoteEstimate,
    QuotePrefill, QuotePrefillSink,
};
