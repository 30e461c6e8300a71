use rust_decimal::Decimal;

/// Every amount in the system is whole rupiah. Intermediate percentage
/// arithmetic can produce fractions; this module owns the rounding rules so
/// they are applied in exactly one place.

/// Round an amount to whole rupiah (banker's rounding, same as the UI the
/// original receipts were reconciled against).
pub fn round_rupiah(amount: Decimal) -> Decimal {
    amount.round_dp(0)
}

/// `percent` of `base`, rounded to whole rupiah.
pub fn percent_of(base: Decimal, percent: Decimal) -> Decimal {
    round_rupiah(base * percent / Decimal::ONE_HUNDRED)
}

/// Express `amount` as a percentage of `base`. Kept at full precision:
/// rounding here would let a percent/nominal toggle drift by more than a
/// rupiah on large subtotals. Returns zero when `base` is zero.
pub fn as_percent_of(base: Decimal, amount: Decimal) -> Decimal {
    if base.is_zero() {
        return Decimal::ZERO;
    }
    amount * Decimal::ONE_HUNDRED / base
}

/// Validate a rupiah amount: non-negative and no fractional part.
pub fn validate_rupiah(amount: Decimal) -> Result<(), String> {
    if amount < Decimal::ZERO {
        return Err(format!("Jumlah tidak boleh negatif: {}", amount));
    }
    if amount.normalize().scale() > 0 {
        return Err(format!(
            "Jumlah rupiah harus bilangan bulat, diterima: {}",
            amount
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_round_rupiah() {
        assert_eq!(
            round_rupiah(Decimal::from_str("14500.4").unwrap()),
            Decimal::from(14500)
        );
        // Banker's rounding: .5 goes to even
        assert_eq!(
            round_rupiah(Decimal::from_str("14500.5").unwrap()),
            Decimal::from(14500)
        );
        assert_eq!(
            round_rupiah(Decimal::from_str("14501.5").unwrap()),
            Decimal::from(14502)
        );
    }

    #[test]
    fn test_percent_of() {
        // 10% of 145000 = 14500
        assert_eq!(
            percent_of(Decimal::from(145_000), Decimal::from(10)),
            Decimal::from(14_500)
        );
        assert_eq!(percent_of(Decimal::ZERO, Decimal::from(10)), Decimal::ZERO);
    }

    #[test]
    fn test_as_percent_of() {
        assert_eq!(
            as_percent_of(Decimal::from(145_000), Decimal::from(14_500)),
            Decimal::from(10)
        );
        // Small amounts of large bases keep their precision
        assert!(
            as_percent_of(Decimal::from(100_000_000), Decimal::from(333)) > Decimal::ZERO
        );
        assert_eq!(
            as_percent_of(Decimal::ZERO, Decimal::from(14_500)),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_validate_rupiah() {
        assert!(validate_rupiah(Decimal::from(15_000)).is_ok());
        assert!(validate_rupiah(Decimal::ZERO).is_ok());
        assert!(validate_rupiah(Decimal::from(-1)).is_err());
        assert!(validate_rupiah(Decimal::from_str("100.50").unwrap()).is_err());
    }
}
