//! Money calculation utilities using rust_decimal for precision
//!
//! All monetary arithmetic is done in `Decimal`; `f64` exists only at the
//! storage/serialization boundary. Remote payment amounts are integer
//! minor currency units.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
///
/// Non-finite values cannot occur on validated inputs; if one slips through,
/// log and fall back to zero rather than corrupt a financial calculation.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_else(|| {
            tracing::error!(value = %value, "Decimal not representable as f64, defaulting to zero");
            0.0
        })
}

/// Line total: unit price × quantity
#[inline]
pub fn line_total(price: f64, quantity: i32) -> Decimal {
    to_decimal(price) * Decimal::from(quantity)
}

/// Convert a major-unit amount to integer minor currency units (× 100)
///
/// The charge amount sent to the payment gateway.
#[inline]
pub fn amount_minor_units(amount: Decimal) -> i64 {
    (amount * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or_else(|| {
            tracing::error!(amount = %amount, "Amount overflows minor-unit range, defaulting to zero");
            0
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_decimal_precision() {
        // Classic floating point problem: 0.1 + 0.2 != 0.3
        let a = 0.1_f64;
        let b = 0.2_f64;
        assert_ne!(a + b, 0.3);

        let sum_dec = to_decimal(a) + to_decimal(b);
        assert_eq!(to_f64(sum_dec), 0.3);
    }

    #[test]
    fn test_line_total() {
        assert_eq!(to_f64(line_total(10.99, 3)), 32.97);
        assert_eq!(to_f64(line_total(0.0, 5)), 0.0);
    }

    #[test]
    fn test_accumulation_precision() {
        // Sum 0.01 one thousand times
        let mut total = Decimal::ZERO;
        for _ in 0..1000 {
            total += to_decimal(0.01);
        }
        assert_eq!(to_f64(total), 10.0);
    }

    #[test]
    fn test_amount_minor_units() {
        // 2 × 10.00 + 5.00 shipping = 25.00 → 2500 cents
        let total = line_total(10.0, 2) + to_decimal(5.0);
        assert_eq!(amount_minor_units(total), 2500);

        assert_eq!(amount_minor_units(to_decimal(12.34)), 1234);
        assert_eq!(amount_minor_units(to_decimal(0.0)), 0);
        // Sub-cent residue rounds half-up
        assert_eq!(amount_minor_units(to_decimal(0.005)), 1);
    }
}
