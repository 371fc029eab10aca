use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::recommendation::{ConsoleTier, Recommendation, SpeakerModel};

/// Rentable items the advisor can put in a bundle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CatalogItem {
    CompactSpeaker,
    MidSpeaker,
    HighPowerSpeaker,
    Subwoofer,
    EightChannelConsole,
    SixteenChannelConsole,
    WiredMicrophone,
    WirelessMicrophone,
}

impl CatalogItem {
    pub const ALL: [CatalogItem; 8] = [
        Self::CompactSpeaker,
        Self::MidSpeaker,
        Self::HighPowerSpeaker,
        Self::Subwoofer,
        Self::EightChannelConsole,
        Self::SixteenChannelConsole,
        Self::WiredMicrophone,
        Self::WirelessMicrophone,
    ];

    pub fn sku(&self) -> &'static str {
        match self {
            Self::CompactSpeaker => "SPK-COMPACT",
            Self::MidSpeaker => "SPK-MID",
            Self::HighPowerSpeaker => "SPK-HIGH",
            Self::Subwoofer => "SUB-18",
            Self::EightChannelConsole => "MIX-8",
            Self::SixteenChannelConsole => "MIX-16",
            Self::WiredMicrophone => "MIC-WIRED",
            Self::WirelessMicrophone => "MIC-WIRELESS",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::CompactSpeaker => "Compact speaker",
            Self::MidSpeaker => "Mid-size speaker",
            Self::HighPowerSpeaker => "High-power speaker",
            Self::Subwoofer => "Subwoofer",
            Self::EightChannelConsole => "8-channel mixing console",
            Self::SixteenChannelConsole => "16-channel mixing console",
            Self::WiredMicrophone => "Wired microphone",
            Self::WirelessMicrophone => "Wireless microphone",
        }
    }

    /// Rental price for one unit and one day, before delivery.
    pub fn day_rate(&self) -> Decimal {
        let whole = match self {
            Self::CompactSpeaker => 35,
            Self::MidSpeaker => 55,
            Self::HighPowerSpeaker => 85,
            Self::Subwoofer => 70,
            Self::EightChannelConsole => 40,
            Self::SixteenChannelConsole => 75,
            Self::WiredMicrophone => 10,
            Self::WirelessMicrophone => 20,
        };
        Decimal::new(whole, 0)
    }

    pub fn speaker(model: SpeakerModel) -> Self {
        match model {
            SpeakerModel::Compact => Self::CompactSpeaker,
            SpeakerModel::Mid => Self::MidSpeaker,
            SpeakerModel::HighPower => Self::HighPowerSpeaker,
        }
    }

    pub fn console(tier: ConsoleTier) -> Option<Self> {
        match tier {
            ConsoleTier::None => None,
            ConsoleTier::EightChannel => Some(Self::EightChannelConsole),
            ConsoleTier::SixteenChannel => Some(Self::SixteenChannelConsole),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleLine {
    pub item: CatalogItem,
    pub quantity: u32,
}

/// Catalogue lines for a bundle, zero quantities omitted.
pub fn bundle_lines(recommendation: &Recommendation) -> Vec<BundleLine> {
    let console = CatalogItem::console(recommendation.console_tier).map(|item| (item, 1));

    [
        Some((CatalogItem::speaker(recommendation.speaker_model), recommendation.speaker_count)),
        Some((CatalogItem::Subwoofer, recommendation.subwoofer_count)),
        console,
        Some((CatalogItem::WiredMicrophone, recommendation.mic_wired_count)),
        Some((CatalogItem::WirelessMicrophone, recommendation.mic_wireless_count)),
    ]
    .into_iter()
    .flatten()
    .filter(|(_, quantity)| *quantity > 0)
    .map(|(item, quantity)| BundleLine { item, quantity })
    .collect()
}
