use serde::Serialize;
use soundrush_core::logistics::{classify_zone, plausible_postal_country, PostalCountry, Zone};

use crate::commands::CommandResult;

#[derive(Debug, Serialize)]
pub struct ZoneReport {
    pub postal_code: String,
    pub zone: Zone,
    pub label: &'static str,
    pub served: bool,
    pub plausible: bool,
    pub country: Option<PostalCountry>,
}

pub fn report(postal_code: &str) -> ZoneReport {
    let zone = classify_zone(postal_code);
    let country = plausible_postal_country(postal_code);

    ZoneReport {
        postal_code: postal_code.trim().to_string(),
        zone,
        label: zone.label(),
        served: zone.is_served(),
        plausible: country.is_some(),
        country,
    }
}

pub fn run(postal_code: &str) -> CommandResult {
    let report = report(postal_code);
    let message = format!("{} -> {}", report.postal_code, report.label);
    CommandResult::success_with_data("zone", message, report)
}
