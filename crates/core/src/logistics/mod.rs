//! Delivery logistics classifiers.
//!
//! Both classifiers are total: malformed input degrades to the neutral answer
//! (`Zone::OutOfArea`, not urgent) instead of failing.

pub mod postal;
pub mod urgency;
pub mod zone;

pub use postal::{plausible_postal_country, PostalCountry};
pub use urgency::{hours_until, is_urgent, is_urgent_at, parse_local_datetime, URGENT_WINDOW_HOURS};
pub use zone::{classify_zone, Zone};
