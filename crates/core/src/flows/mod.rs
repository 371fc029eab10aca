pub mod engine;
pub mod states;

pub use engine::{transition, validate_step, Questionnaire, StepError, MISSING_ANSWER_MESSAGE};
pub use states::{QuestionStep, StepAction, StepEvent, StepOutcome};
