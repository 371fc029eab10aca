use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Zone {
    Paris,
    InnerRing,
    OuterRing,
    OutOfArea,
}

impl Zone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paris => "paris",
            Self::InnerRing => "inner-ring",
            Self::OuterRing => "outer-ring",
            Self::OutOfArea => "out-of-area",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Paris => "Paris",
            Self::InnerRing => "Petite couronne",
            Self::OuterRing => "Grande couronne",
            Self::OutOfArea => "Hors zone",
        }
    }

    pub fn is_served(&self) -> bool {
        !matches!(self, Self::OutOfArea)
    }
}

const PARIS_PREFIX: &str = "75";
const INNER_RING_PREFIXES: [&str; 3] = ["92", "93", "94"];
const OUTER_RING_PREFIXES: [&str; 4] = ["77", "78", "91", "95"];

/// Maps a postal code to a delivery zone by department prefix.
pub fn classify_zone(postal_code: &str) -> Zone {
    let compact: String = postal_code.chars().filter(|ch| !ch.is_whitespace()).collect();
    if compact.len() != 5 || !compact.bytes().all(|byte| byte.is_ascii_digit()) {
        return Zone::OutOfArea;
    }

    let department = &compact[..2];
    if department == PARIS_PREFIX {
        Zone::Paris
    } else if INNER_RING_PREFIXES.contains(&department) {
        Zone::InnerRing
    } else if OUTER_RING_PREFIXES.contains(&department) {
        Zone::OuterRing
    } else {
        Zone::OutOfArea
    }
}

#[cfg(test)]
mod tests {
    use super::{classify_zone, Zone};

    #[test]
    fn classifies_reference_postal_codes() {
        assert_eq!(classify_zone("75011"), Zone::Paris);
        assert_eq!(classify_zone("92100"), Zone::InnerRing);
        assert_eq!(classify_zone("77000"), Zone::OuterRing);
        assert_eq!(classify_zone(""), Zone::OutOfArea);
        assert_eq!(classify_zone("99999"), Zone::OutOfArea);
    }

    #[test]
    fn covers_every_ring_department() {
        for code in ["93200", "94300"] {
            assert_eq!(classify_zone(code), Zone::InnerRing, "{code}");
        }
        for code in ["78000", "91000", "95100"] {
            assert_eq!(classify_zone(code), Zone::OuterRing, "{code}");
        }
    }

    #[test]
    fn whitespace_is_ignored() {
        assert_eq!(classify_zone(" 75 011 "), Zone::Paris);
        assert_eq!(classify_zone("9\t2100"), Zone::InnerRing);
    }

    #[test]
    fn malformed_input_degrades_to_out_of_area() {
        for code in ["75", "750111", "7501A", "L-1234", "ÉÉ011", "75-011"] {
            assert_eq!(classify_zone(code), Zone::OutOfArea, "{code}");
        }
    }

    #[test]
    fn out_of_area_is_not_served() {
        assert!(!Zone::OutOfArea.is_served());
        assert!(Zone::OuterRing.is_served());
    }
}
