//! Fee computation for plot purchases.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::CheckoutConfig;
use crate::models::FeeBreakdown;

fn percent_of(base: Decimal, percent: Decimal) -> Decimal {
    (base * percent / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Price a plot: percentage fees on the base price plus the flat survey fee.
pub fn compute_fees(base: Decimal, config: &CheckoutConfig) -> FeeBreakdown {
    let processing = percent_of(base, config.processing_fee_percent);
    let legal = percent_of(base, config.legal_fee_percent);
    let survey = config.survey_fee;
    FeeBreakdown {
        base,
        processing,
        legal,
        survey,
        total: base + processing + legal + survey,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_default_schedule() {
        let fees = compute_fees(Decimal::from(4_000_000), &CheckoutConfig::default());
        assert_eq!(fees.processing, Decimal::from(100_000));
        assert_eq!(fees.legal, Decimal::from(200_000));
        assert_eq!(fees.survey, Decimal::from(50_000));
        assert_eq!(fees.total, Decimal::from(4_350_000));
    }

    #[test]
    fn test_rounds_to_kobo() {
        let config = CheckoutConfig {
            processing_fee_percent: Decimal::from_str("2.5").unwrap(),
            legal_fee_percent: Decimal::ZERO,
            survey_fee: Decimal::ZERO,
            ..CheckoutConfig::default()
        };
        let fees = compute_fees(Decimal::from_str("1000.10").unwrap(), &config);
        // 25.0025 rounds to 25.00
        assert_eq!(fees.processing, Decimal::from_str("25.00").unwrap());
        assert_eq!(fees.total, Decimal::from_str("1025.10").unwrap());
    }
}
