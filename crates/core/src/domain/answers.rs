use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    Wedding,
    Birthday,
    Association,
    Corporate,
    Church,
    Concert,
    Other,
}

impl EventType {
    pub const ALL: [EventType; 7] = [
        Self::Wedding,
        Self::Birthday,
        Self::Association,
        Self::Corporate,
        Self::Church,
        Self::Concert,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wedding => "wedding",
            Self::Birthday => "birthday",
            Self::Association => "association",
            Self::Corporate => "corporate",
            Self::Church => "church",
            Self::Concert => "concert",
            Self::Other => "other",
        }
    }
}

/// Guest count, bucketed the way the questionnaire asks it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GuestBucket {
    #[serde(rename = "0-40")]
    UpTo40,
    #[serde(rename = "40-80")]
    From40To80,
    #[serde(rename = "80-150")]
    From80To150,
    #[serde(rename = "150+")]
    Over150,
}

impl GuestBucket {
    pub const ALL: [GuestBucket; 4] =
        [Self::UpTo40, Self::From40To80, Self::From80To150, Self::Over150];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UpTo40 => "0-40",
            Self::From40To80 => "40-80",
            Self::From80To150 => "80-150",
            Self::Over150 => "150+",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Venue {
    Indoor,
    Outdoor,
}

impl Venue {
    pub const ALL: [Venue; 2] = [Self::Indoor, Self::Outdoor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Indoor => "indoor",
            Self::Outdoor => "outdoor",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AudioSource {
    BluetoothPhone,
    WiredPhone,
    ComputerTablet,
    DjController,
    InstrumentJack,
    Other,
}

impl AudioSource {
    pub const ALL: [AudioSource; 6] = [
        Self::BluetoothPhone,
        Self::WiredPhone,
        Self::ComputerTablet,
        Self::DjController,
        Self::InstrumentJack,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BluetoothPhone => "bluetooth-phone",
            Self::WiredPhone => "wired-phone",
            Self::ComputerTablet => "computer-tablet",
            Self::DjController => "dj-controller",
            Self::InstrumentJack => "instrument-jack",
            Self::Other => "other",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BudgetBand {
    #[serde(rename = "0-300")]
    UpTo300,
    #[serde(rename = "300-600")]
    From300To600,
    #[serde(rename = "600-1000")]
    From600To1000,
    #[serde(rename = "1000+")]
    Over1000,
}

impl BudgetBand {
    pub const ALL: [BudgetBand; 4] =
        [Self::UpTo300, Self::From300To600, Self::From600To1000, Self::Over1000];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UpTo300 => "0-300",
            Self::From300To600 => "300-600",
            Self::From600To1000 => "600-1000",
            Self::Over1000 => "1000+",
        }
    }
}

macro_rules! impl_from_str {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl std::str::FromStr for $ty {
                type Err = UnknownOption;

                fn from_str(value: &str) -> Result<Self, Self::Err> {
                    let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
                    Self::ALL
                        .into_iter()
                        .find(|candidate| candidate.as_str() == normalized)
                        .ok_or_else(|| UnknownOption {
                            field: stringify!($ty),
                            value: value.to_string(),
                            expected: Self::ALL
                                .iter()
                                .map(|candidate| candidate.as_str())
                                .collect::<Vec<_>>()
                                .join("|"),
                        })
                }
            }
        )+
    };
}

impl_from_str!(EventType, GuestBucket, Venue, AudioSource, BudgetBand);

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unsupported {field} `{value}` (expected {expected})")]
pub struct UnknownOption {
    pub field: &'static str,
    pub value: String,
    pub expected: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Needs {
    pub music: bool,
    pub speeches: bool,
    pub dj: bool,
}

impl Default for Needs {
    fn default() -> Self {
        Self { music: true, speeches: false, dj: false }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct MicCounts {
    pub wired: u32,
    pub wireless: u32,
}

impl MicCounts {
    pub fn new(wired: u32, wireless: u32) -> Self {
        Self { wired, wireless }
    }

    pub fn total(&self) -> u32 {
        self.wired.saturating_add(self.wireless)
    }
}

/// Questionnaire answers. Unset choices are `None`.
///
/// Every field has a default, so a partially filled questionnaire can be serialized
/// and resumed later.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Answers {
    pub event_type: Option<EventType>,
    pub guest_count: Option<GuestBucket>,
    pub venue: Option<Venue>,
    pub audio_source: Option<AudioSource>,
    pub needs: Needs,
    pub mics: MicCounts,
    pub event_date_time: Option<String>,
    pub postal_code: String,
    pub budget: Option<BudgetBand>,
}

impl Answers {
    /// Names of the mandatory fields that are still unset.
    pub fn missing_mandatory(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.event_type.is_none() {
            missing.push("eventType");
        }
        if self.guest_count.is_none() {
            missing.push("guestCount");
        }
        if self.venue.is_none() {
            missing.push("venue");
        }
        missing
    }

    pub fn has_mandatory(&self) -> bool {
        self.missing_mandatory().is_empty()
    }

    /// Event date with blank input treated as absent.
    pub fn event_date_time(&self) -> Option<&str> {
        self.event_date_time.as_deref().map(str::trim).filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::{Answers, AudioSource, BudgetBand, EventType, GuestBucket, MicCounts, Needs};

    #[test]
    fn partial_json_deserializes_with_neutral_defaults() {
        let answers: Answers =
            serde_json::from_str(r#"{"eventType":"wedding","guestCount":"150+"}"#)
                .expect("partial answers should deserialize");

        assert_eq!(answers.event_type, Some(EventType::Wedding));
        assert_eq!(answers.guest_count, Some(GuestBucket::Over150));
        assert_eq!(answers.venue, None);
        assert_eq!(answers.mics, MicCounts::default());
        assert_eq!(answers.needs, Needs::default());
        assert!(answers.needs.music);
        assert!(answers.postal_code.is_empty());
        assert_eq!(answers.missing_mandatory(), vec!["venue"]);
    }

    #[test]
    fn wire_names_follow_questionnaire_labels() {
        let answers = Answers {
            audio_source: Some(AudioSource::DjController),
            budget: Some(BudgetBand::UpTo300),
            guest_count: Some(GuestBucket::From80To150),
            ..Answers::default()
        };
        let json = serde_json::to_value(&answers).expect("serialize answers");

        assert_eq!(json["audioSource"], "dj-controller");
        assert_eq!(json["budget"], "0-300");
        assert_eq!(json["guestCount"], "80-150");
    }

    #[test]
    fn options_parse_from_cli_spelling() {
        assert_eq!("DJ_Controller".parse::<AudioSource>(), Ok(AudioSource::DjController));
        assert_eq!("150+".parse::<GuestBucket>(), Ok(GuestBucket::Over150));

        let error = "stadium".parse::<GuestBucket>().expect_err("unknown bucket");
        assert!(error.to_string().contains("0-40|40-80|80-150|150+"));
    }

    #[test]
    fn blank_event_date_is_absent() {
        let answers = Answers { event_date_time: Some("   ".to_string()), ..Answers::default() };
        assert_eq!(answers.event_date_time(), None);
    }

    #[test]
    fn mic_total_saturates() {
        assert_eq!(MicCounts::new(u32::MAX, 3).total(), u32::MAX);
    }
}
