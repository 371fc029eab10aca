use serde::{Deserialize, Serialize};

use crate::logistics::Zone;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpeakerModel {
    #[default]
    Compact,
    Mid,
    HighPower,
}

impl SpeakerModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Mid => "mid",
            Self::HighPower => "high-power",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsoleTier {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "8-channel")]
    EightChannel,
    #[serde(rename = "16-channel")]
    SixteenChannel,
}

impl ConsoleTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::EightChannel => "8-channel",
            Self::SixteenChannel => "16-channel",
        }
    }

    pub fn is_assigned(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Equipment bundle derived from a set of answers. Never stored as source of truth.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub speaker_count: u32,
    pub subwoofer_count: u32,
    pub console_tier: ConsoleTier,
    pub mic_wired_count: u32,
    pub mic_wireless_count: u32,
    pub speaker_model: SpeakerModel,
    pub reasons: Vec<String>,
}

impl Default for Recommendation {
    fn default() -> Self {
        Self {
            speaker_count: 1,
            subwoofer_count: 0,
            console_tier: ConsoleTier::None,
            mic_wired_count: 0,
            mic_wireless_count: 0,
            speaker_model: SpeakerModel::Compact,
            reasons: Vec::new(),
        }
    }
}

/// Recommendation together with the logistics classifications computed alongside it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advice {
    pub recommendation: Recommendation,
    pub zone: Zone,
    pub urgent: bool,
}
