use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{bundle_lines, CatalogItem};
use crate::config::PricingConfig;
use crate::quote::QuotePrefill;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateLine {
    pub item: CatalogItem,
    pub sku: String,
    pub label: String,
    pub quantity: u32,
    pub day_rate: Decimal,
    pub amount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateTraceStep {
    pub stage: String,
    pub detail: String,
    pub amount: Decimal,
}

/// Indicative one-day price for a prefilled quote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteEstimate {
    pub currency: String,
    pub lines: Vec<EstimateLine>,
    pub equipment_subtotal: Decimal,
    /// `None` outside the delivery area: delivery is quoted on request.
    pub delivery_fee: Option<Decimal>,
    pub urgency_surcharge: Decimal,
    pub total: Decimal,
    pub trace: Vec<EstimateTraceStep>,
}

pub fn estimate(prefill: &QuotePrefill, pricing: &PricingConfig) -> QuoteEstimate {
    let lines: Vec<EstimateLine> = bundle_lines(&prefill.recommendation)
        .into_iter()
        .map(|line| {
            let day_rate = line.item.day_rate();
            EstimateLine {
                item: line.item,
                sku: line.item.sku().to_string(),
                label: line.item.label().to_string(),
                quantity: line.quantity,
                day_rate,
                amount: day_rate * Decimal::from(line.quantity),
            }
        })
        .collect();

    let equipment_subtotal: Decimal = lines.iter().map(|line| line.amount).sum();
    let mut trace = vec![EstimateTraceStep {
        stage: "equipment_subtotal".to_string(),
        detail: "sum(day_rate * quantity)".to_string(),
        amount: equipment_subtotal,
    }];

    let delivery_fee = pricing.delivery_fee(prefill.zone);
    trace.push(EstimateTraceStep {
        stage: "delivery".to_string(),
        detail: match delivery_fee {
            Some(_) => format!("flat fee for zone {}", prefill.zone.as_str()),
            None => format!("zone {} is quoted on request", prefill.zone.as_str()),
        },
        amount: delivery_fee.unwrap_or(Decimal::ZERO),
    });

    let urgency_surcharge = if prefill.urgent {
        let surcharge = (equipment_subtotal * Decimal::from(pricing.urgency_surcharge_pct)
            / Decimal::ONE_HUNDRED)
            .round_dp(2);
        trace.push(EstimateTraceStep {
            stage: "urgency_surcharge".to_string(),
            detail: format!(
                "{}% of equipment subtotal, event within 48 hours",
                pricing.urgency_surcharge_pct
            ),
            amount: surcharge,
        });
        surcharge
    } else {
        Decimal::ZERO
    };

    let total = equipment_subtotal + delivery_fee.unwrap_or(Decimal::ZERO) + urgency_surcharge;
    trace.push(EstimateTraceStep {
        stage: "total".to_string(),
        detail: "equipment + delivery + surcharge".to_string(),
        amount: total,
    });

    QuoteEstimate {
        currency: pricing.currency.clone(),
        lines,
        equipment_subtotal,
        delivery_fee,
        urgency_surcharge,
        total,
        trace,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::estimate;
    use crate::config::PricingConfig;
    use crate::domain::answers::Answers;
    use crate::domain::recommendation::{ConsoleTier, Recommendation, SpeakerModel};
    use crate::logistics::Zone;
    use crate::quote::QuotePrefill;

    fn prefill(recommendation: Recommendation, zone: Zone, urgent: bool) -> QuotePrefill {
        QuotePrefill::new(&Answers::default(), recommendation, zone, urgent)
    }

    #[test]
    fn minimal_bundle_in_paris() {
        let estimate =
            estimate(&prefill(Recommendation::default(), Zone::Paris, false), &PricingConfig::default());

        assert_eq!(estimate.lines.len(), 1);
        assert_eq!(estimate.equipment_subtotal, Decimal::new(35, 0));
        assert_eq!(estimate.delivery_fee, Some(Decimal::new(40, 0)));
        assert_eq!(estimate.urgency_surcharge, Decimal::ZERO);
        assert_eq!(estimate.total, Decimal::new(75, 0));
        assert_eq!(estimate.currency, "EUR");
        assert_eq!(
            estimate.trace.iter().map(|step| step.stage.as_str()).collect::<Vec<_>>(),
            vec!["equipment_subtotal", "delivery", "total"]
        );
    }

    #[test]
    fn urgent_full_rig_in_outer_ring_adds_surcharge() {
        let recommendation = Recommendation {
            speaker_count: 2,
            subwoofer_count: 2,
            console_tier: ConsoleTier::SixteenChannel,
            mic_wired_count: 1,
            mic_wireless_count: 2,
            speaker_model: SpeakerModel::HighPower,
            reasons: Vec::new(),
        };

        let estimate =
            estimate(&prefill(recommendation, Zone::OuterRing, true), &PricingConfig::default());

        // 2*85 + 2*70 + 75 + 10 + 2*20
        assert_eq!(estimate.equipment_subtotal, Decimal::new(435, 0));
        assert_eq!(estimate.urgency_surcharge, Decimal::new(87, 0));
        assert_eq!(estimate.delivery_fee, Some(Decimal::new(90, 0)));
        assert_eq!(estimate.total, Decimal::new(612, 0));
        assert_eq!(
            estimate.trace.last().map(|step| step.amount),
            Some(estimate.total)
        );
    }

    #[test]
    fn out_of_area_delivery_is_left_open() {
        let estimate = estimate(
            &prefill(Recommendation::default(), Zone::OutOfArea, false),
            &PricingConfig::default(),
        );

        assert_eq!(estimate.delivery_fee, None);
        assert_eq!(estimate.total, estimate.equipment_subtotal);
        assert!(estimate.trace[1].detail.contains("on request"));
    }

    #[test]
    fn surcharge_rounds_to_cents() {
        let pricing = PricingConfig { urgency_surcharge_pct: 15, ..PricingConfig::default() };
        let recommendation = Recommendation { mic_wired_count: 1, ..Recommendation::default() };

        let estimate = estimate(&prefill(recommendation, Zone::Paris, true), &pricing);

        // 15% of 45
        assert_eq!(estimate.urgency_surcharge, Decimal::new(675, 2));
    }
}
