use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionStep {
    EventType,
    GuestCount,
    Venue,
    AudioSource,
    NeedsAndMics,
    Logistics,
    Result,
}

impl QuestionStep {
    pub const ALL: [QuestionStep; 7] = [
        Self::EventType,
        Self::GuestCount,
        Self::Venue,
        Self::AudioSource,
        Self::NeedsAndMics,
        Self::Logistics,
        Self::Result,
    ];

    pub fn index(&self) -> usize {
        match self {
            Self::EventType => 0,
            Self::GuestCount => 1,
            Self::Venue => 2,
            Self::AudioSource => 3,
            Self::NeedsAndMics => 4,
            Self::Logistics => 5,
            Self::Result => 6,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::EventType => "Event type",
            Self::GuestCount => "Guests",
            Self::Venue => "Venue",
            Self::AudioSource => "Audio source",
            Self::NeedsAndMics => "Needs and microphones",
            Self::Logistics => "Date and place",
            Self::Result => "Recommendation",
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            Self::EventType => "What kind of event are you organising?",
            Self::GuestCount => "How many guests are expected?",
            Self::Venue => "Is the event indoors or outdoors?",
            Self::AudioSource => "What will the music play from?",
            Self::NeedsAndMics => "What do you need the sound for, and how many microphones?",
            Self::Logistics => "Where and when is the event, and what is your budget?",
            Self::Result => "Here is the equipment we recommend.",
        }
    }

    /// Steps whose answer must be present before `next` advances.
    pub fn requires_answer(&self) -> bool {
        matches!(
            self,
            Self::EventType | Self::GuestCount | Self::Venue | Self::AudioSource | Self::Logistics
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Result)
    }

    pub fn following(&self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn preceding(&self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepEvent {
    Next,
    Prev,
    Restart,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepAction {
    ClearValidationError,
    MaterializeRecommendation,
    ClearAnswers,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub from: QuestionStep,
    pub to: QuestionStep,
    pub event: StepEvent,
    pub actions: Vec<StepAction>,
}
