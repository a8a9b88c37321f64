//! Fractional 7-day rates to rounded percentages.

use crate::chain::{AvgInfoMap, RateValue};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Decimal places kept in the persisted percentage.
pub const APR_DECIMAL_PLACES: u32 = 5;

/// Pool address -> APR percentage. Values are always finite.
pub type AprMap = BTreeMap<String, f64>;

/// `rate * 100` rounded to 5 places, half away from zero.
/// Returns None when the rate is not a plain decimal number or the result is not finite.
pub fn rate_to_percent(rate: &RateValue) -> Option<f64> {
    let text = rate.as_text();
    if !is_plain_number(&text) {
        return None;
    }
    let pct = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
        .and_then(decimal_percent)
        // Outside Decimal's range
        .or_else(|| text.parse::<f64>().ok().map(round_f64_percent))?;
    pct.is_finite().then_some(pct)
}

fn decimal_percent(rate: Decimal) -> Option<f64> {
    rate.checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(APR_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
}

/// `[+-]digits[.digits][(e|E)[+-]digits]`, at least one mantissa digit.
fn is_plain_number(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((m, e)) => (m, Some(e)),
        None => (unsigned, None),
    };
    let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    let mantissa_ok = digits(int) && digits(frac) && !(int.is_empty() && frac.is_empty());
    let exponent_ok = match exponent {
        Some(e) => {
            let e = e.strip_prefix(['+', '-']).unwrap_or(e);
            !e.is_empty() && digits(e)
        }
        None => true,
    };
    mantissa_ok && exponent_ok
}

fn round_f64_percent(rate: f64) -> f64 {
    let pct = rate * 100.0;
    if pct.abs() < 1e15 {
        let scale = 10f64.powi(APR_DECIMAL_PLACES as i32);
        (pct * scale).round() / scale
    } else {
        pct
    }
}

/// Build an AprMap from average info. Entries with no `apr7d`, or whose
/// percentage is not finite, are left out.
pub fn normalize_aprs(avg: &AvgInfoMap) -> AprMap {
    avg.iter()
        .filter_map(|(addr, info)| {
            let rate = info.apr7d.as_ref()?;
            rate_to_percent(rate).map(|pct| (addr.clone(), pct))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::AvgInfo;

    fn text(s: &str) -> RateValue {
        RateValue::Text(s.to_string())
    }

    #[test]
    fn percent_rounds_to_five_places() {
        assert_eq!(rate_to_percent(&text("0.052")), Some(5.2));
        assert_eq!(rate_to_percent(&text("0.123456789")), Some(12.34568));
        assert_eq!(rate_to_percent(&text("0.000000125")), Some(0.00001));
        assert_eq!(rate_to_percent(&RateValue::Number(0.1)), Some(10.0));
        assert_eq!(rate_to_percent(&text("0")), Some(0.0));
        assert_eq!(rate_to_percent(&text("1e-3")), Some(0.1));
    }

    #[test]
    fn non_numbers_dropped() {
        assert_eq!(rate_to_percent(&text("NaN")), None);
        assert_eq!(rate_to_percent(&text("Infinity")), None);
        assert_eq!(rate_to_percent(&text("-inf")), None);
        assert_eq!(rate_to_percent(&text("")), None);
        assert_eq!(rate_to_percent(&text("abc")), None);
        assert_eq!(rate_to_percent(&text("0_5")), None);
        assert_eq!(rate_to_percent(&text("0.0_5")), None);
        assert_eq!(rate_to_percent(&text("1e")), None);
        assert_eq!(rate_to_percent(&text(".")), None);
    }

    #[test]
    fn plain_number_grammar() {
        assert!(is_plain_number("0.052"));
        assert!(is_plain_number("-1.5E+3"));
        assert!(is_plain_number(".5"));
        assert!(is_plain_number("5."));
        assert!(!is_plain_number("1_000"));
        assert!(!is_plain_number("0x10"));
        assert!(!is_plain_number("1e5.5"));
    }

    #[test]
    fn huge_values_outside_decimal_range() {
        let big = rate_to_percent(&RateValue::Number(1e300)).unwrap();
        assert!(big > 9.9e301 && big.is_finite());
        // Parses as Decimal but overflows on the x100
        let near_max = rate_to_percent(&RateValue::Number(1e27)).unwrap();
        assert!(near_max > 9.9e28 && near_max < 1.01e29);
        assert!(rate_to_percent(&RateValue::Number(5e26)).is_some());
        assert_eq!(rate_to_percent(&RateValue::Number(f64::MAX)), None);
    }

    #[test]
    fn normalize_skips_missing_and_non_finite() {
        let mut avg = AvgInfoMap::new();
        avg.insert("0xA".into(), AvgInfo::with_apr7d(text("0.25")));
        avg.insert("0xb".into(), AvgInfo::default());
        avg.insert("0xc".into(), AvgInfo::with_apr7d(text("NaN")));
        avg.insert("0xd".into(), AvgInfo::with_apr7d(RateValue::Number(0.0)));
        let out = normalize_aprs(&avg);
        assert_eq!(out.len(), 2);
        assert_eq!(out["0xA"], 25.0);
        assert_eq!(out["0xd"], 0.0);
        assert!(!out.contains_key("0xb"));
        assert!(!out.contains_key("0xc"));
    }
}
