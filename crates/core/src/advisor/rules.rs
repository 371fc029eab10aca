//! Sizing rules, applied in order over a shared accumulator.
//!
//! A later rule may overwrite any field an earlier rule assigned; reasons are only
//! ever appended.

use crate::domain::answers::{Answers, AudioSource, BudgetBand, EventType, GuestBucket, Venue};
use crate::domain::recommendation::{ConsoleTier, Recommendation, SpeakerModel};

pub trait SizingRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, answers: &Answers, draft: &mut Recommendation);
}

pub const OUTDOOR_SUBWOOFER_REASON: &str =
    "outdoor crowds need subwoofer reinforcement beyond 80 guests";

#[derive(Clone, Copy, Debug, Default)]
pub struct GuestCountSizing;

impl SizingRule for GuestCountSizing {
    fn name(&self) -> &'static str {
        "guest_count_sizing"
    }

    fn apply(&self, answers: &Answers, draft: &mut Recommendation) {
        let (speakers, subwoofers, reason) = match answers.guest_count {
            Some(GuestBucket::UpTo40) => {
                (1, 0, "up to 40 guests: a single speaker covers the audience")
            }
            Some(GuestBucket::From40To80) => {
                (2, 0, "40 to 80 guests: a pair of speakers spreads the sound evenly")
            }
            Some(GuestBucket::From80To150) => {
                (2, 1, "80 to 150 guests: a pair of speakers plus a subwoofer for low end")
            }
            Some(GuestBucket::Over150) => {
                (2, 2, "more than 150 guests: a pair of speakers backed by two subwoofers")
            }
            None => return,
        };

        draft.speaker_count = speakers;
        draft.subwoofer_count = subwoofers;
        draft.reasons.push(reason.to_string());
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct VenueAdjustment;

impl SizingRule for VenueAdjustment {
    fn name(&self) -> &'static str {
        "venue_adjustment"
    }

    fn apply(&self, answers: &Answers, draft: &mut Recommendation) {
        match answers.venue {
            Some(Venue::Outdoor) => {
                draft.speaker_model = SpeakerModel::HighPower;
                draft.reasons.push(
                    "outdoor venue: high-power speakers make up for the missing walls".to_string(),
                );

                // Fires from the 40-80 bucket even though the reason mentions 80 guests.
                let from_forty = matches!(
                    answers.guest_count,
                    Some(GuestBucket::From40To80 | GuestBucket::From80To150 | GuestBucket::Over150)
                );
                if from_forty && draft.subwoofer_count == 0 {
                    draft.subwoofer_count = 1;
                    draft.reasons.push(OUTDOOR_SUBWOOFER_REASON.to_string());
                }
            }
            Some(Venue::Indoor) => {
                let (model, reason) = match answers.guest_count {
                    Some(GuestBucket::UpTo40) | None => {
                        (SpeakerModel::Compact, "indoor, small audience: compact speakers")
                    }
                    Some(GuestBucket::From40To80 | GuestBucket::From80To150) => {
                        (SpeakerModel::Mid, "indoor, medium audience: mid-size speakers")
                    }
                    Some(GuestBucket::Over150) => match answers.event_type {
                        Some(EventType::Wedding | EventType::Corporate) => (
                            SpeakerModel::HighPower,
                            "indoor wedding or corporate event above 150 guests: high-power speakers",
                        ),
                        _ => (SpeakerModel::Mid, "indoor, large audience: mid-size speakers"),
                    },
                };
                draft.speaker_model = model;
                draft.reasons.push(reason.to_string());
            }
            None => {}
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSelection;

impl SizingRule for ConsoleSelection {
    fn name(&self) -> &'static str {
        "console_selection"
    }

    fn apply(&self, answers: &Answers, draft: &mut Recommendation) {
        let total_mics = answers.mics.total();

        if answers.audio_source == Some(AudioSource::BluetoothPhone)
            && draft.speaker_model == SpeakerModel::Compact
            && total_mics <= 1
        {
            draft.console_tier = ConsoleTier::None;
            draft.reasons.push(
                "bluetooth playback on compact speakers with at most one mic: no console needed"
                    .to_string(),
            );
        } else {
            match answers.audio_source {
                Some(
                    AudioSource::WiredPhone
                    | AudioSource::ComputerTablet
                    | AudioSource::InstrumentJack,
                ) => {
                    draft.console_tier = ConsoleTier::EightChannel;
                    draft.reasons.push(
                        "wired source: an 8-channel console handles the line inputs".to_string(),
                    );
                }
                Some(AudioSource::DjController) => {
                    draft.console_tier = ConsoleTier::SixteenChannel;
                    draft.reasons.push(
                        "DJ controller: a 16-channel console for decks and effects returns"
                            .to_string(),
                    );
                }
                Some(AudioSource::BluetoothPhone | AudioSource::Other) | None => {}
            }
        }

        if total_mics >= 3 {
            draft.console_tier = ConsoleTier::SixteenChannel;
            draft.reasons.push(format!(
                "{total_mics} microphones: a 16-channel console is required to mix them"
            ));
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MicrophonePassThrough;

impl SizingRule for MicrophonePassThrough {
    fn name(&self) -> &'static str {
        "microphone_pass_through"
    }

    fn apply(&self, answers: &Answers, draft: &mut Recommendation) {
        draft.mic_wired_count = answers.mics.wired;
        draft.mic_wireless_count = answers.mics.wireless;
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BudgetAdvisory;

impl SizingRule for BudgetAdvisory {
    fn name(&self) -> &'static str {
        "budget_advisory"
    }

    fn apply(&self, answers: &Answers, draft: &mut Recommendation) {
        // Advisory only: the bundle itself is never downgraded.
        if answers.budget == Some(BudgetBand::UpTo300)
            && (draft.subwoofer_count > 0 || draft.console_tier.is_assigned())
        {
            draft.reasons.push(
                "budget up to 300: a lighter configuration may fit, to be confirmed with our team"
                    .to_string(),
            );
        }
    }
}

/// Default rule order.
pub const DEFAULT_RULES: &[&dyn SizingRule] =
    &[&GuestCountSizing, &VenueAdjustment, &ConsoleSelection, &MicrophonePassThrough, &BudgetAdvisory];

#[cfg(test)]
mod tests {
    use crate::domain::answers::{Answers, AudioSource, BudgetBand, GuestBucket, MicCounts, Venue};
    use crate::domain::recommendation::{ConsoleTier, Recommendation, SpeakerModel};

    use super::{
        BudgetAdvisory, ConsoleSelection, GuestCountSizing, SizingRule, VenueAdjustment,
        DEFAULT_RULES, OUTDOOR_SUBWOOFER_REASON,
    };

    fn answers(guests: GuestBucket, venue: Venue) -> Answers {
        Answers { guest_count: Some(guests), venue: Some(venue), ..Answers::default() }
    }

    #[test]
    fn guest_sizing_leaves_defaults_when_unset() {
        let mut draft = Recommendation::default();
        GuestCountSizing.apply(&Answers::default(), &mut draft);
        assert_eq!(draft, Recommendation::default());
    }

    #[test]
    fn outdoor_subwoofer_fires_from_the_forty_to_eighty_bucket() {
        let answers = answers(GuestBucket::From40To80, Venue::Outdoor);
        let mut draft = Recommendation::default();
        GuestCountSizing.apply(&answers, &mut draft);
        VenueAdjustment.apply(&answers, &mut draft);

        assert_eq!(draft.subwoofer_count, 1);
        assert_eq!(draft.speaker_model, SpeakerModel::HighPower);
        assert!(draft.reasons.iter().any(|reason| reason == OUTDOOR_SUBWOOFER_REASON));
    }

    #[test]
    fn outdoor_subwoofer_never_fires_for_small_audiences() {
        let answers = answers(GuestBucket::UpTo40, Venue::Outdoor);
        let mut draft = Recommendation::default();
        GuestCountSizing.apply(&answers, &mut draft);
        VenueAdjustment.apply(&answers, &mut draft);

        assert_eq!(draft.subwoofer_count, 0);
        assert!(!draft.reasons.iter().any(|reason| reason == OUTDOOR_SUBWOOFER_REASON));
    }

    #[test]
    fn outdoor_keeps_existing_subwoofers() {
        let answers = answers(GuestBucket::Over150, Venue::Outdoor);
        let mut draft = Recommendation::default();
        GuestCountSizing.apply(&answers, &mut draft);
        VenueAdjustment.apply(&answers, &mut draft);

        assert_eq!(draft.subwoofer_count, 2);
    }

    #[test]
    fn mic_override_wins_over_source_choice() {
        let answers = Answers {
            audio_source: Some(AudioSource::WiredPhone),
            mics: MicCounts::new(2, 1),
            ..Answers::default()
        };
        let mut draft = Recommendation::default();
        ConsoleSelection.apply(&answers, &mut draft);

        assert_eq!(draft.console_tier, ConsoleTier::SixteenChannel);
        assert_eq!(draft.reasons.len(), 2);
    }

    #[test]
    fn bluetooth_on_mid_speakers_keeps_prior_console() {
        let answers = Answers {
            audio_source: Some(AudioSource::BluetoothPhone),
            mics: MicCounts::new(1, 0),
            ..Answers::default()
        };
        let mut draft =
            Recommendation { speaker_model: SpeakerModel::Mid, ..Recommendation::default() };
        ConsoleSelection.apply(&answers, &mut draft);

        assert_eq!(draft.console_tier, ConsoleTier::None);
        assert!(draft.reasons.is_empty());
    }

    #[test]
    fn budget_advisory_only_adds_a_reason() {
        let answers = Answers { budget: Some(BudgetBand::UpTo300), ..Answers::default() };
        let mut draft = Recommendation {
            subwoofer_count: 1,
            console_tier: ConsoleTier::EightChannel,
            ..Recommendation::default()
        };
        let before = draft.clone();
        BudgetAdvisory.apply(&answers, &mut draft);

        assert_eq!(draft.subwoofer_count, before.subwoofer_count);
        assert_eq!(draft.console_tier, before.console_tier);
        assert_eq!(draft.reasons.len(), 1);
        assert!(draft.reasons[0].contains("to be confirmed"));
    }

    #[test]
    fn budget_advisory_is_silent_without_extras() {
        let answers = Answers { budget: Some(BudgetBand::UpTo300), ..Answers::default() };
        let mut draft = Recommendation::default();
        BudgetAdvisory.apply(&answers, &mut draft);
        assert!(draft.reasons.is_empty());
    }

    #[test]
    fn default_rule_order_is_stable() {
        let names: Vec<&str> = DEFAULT_RULES.iter().map(|rule| rule.name()).collect();
        assert_eq!(
            names,
            vec![
                "guest_count_sizing",
                "venue_adjustment",
                "console_selection",
                "microphone_pass_through",
                "budget_advisory",
            ]
        );
    }
}
