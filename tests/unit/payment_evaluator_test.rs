use chrono::{Duration, NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use niaga::core::AppError;
use niaga::modules::checkout::models::{CreditProfile, PaymentStatus};
use niaga::modules::checkout::services::{CheckoutCalculator, DEFAULT_TENOR_HARI};

fn unlimited() -> CreditProfile {
    CreditProfile::new(dec!(0), dec!(0))
}

#[test]
fn overpayment_returns_change() {
    let outcome =
        CheckoutCalculator::evaluate_payment(dec!(130500), dec!(150000), None, None).unwrap();

    assert_eq!(outcome.status, PaymentStatus::Lunas);
    assert_eq!(outcome.kembalian, dec!(19500));
    assert_eq!(outcome.sisa_hutang, dec!(0));
    assert!(outcome.jatuh_tempo.is_none());
}

#[test]
fn shortfall_with_profile_becomes_hutang() {
    let profile = unlimited();
    let outcome = CheckoutCalculator::evaluate_payment(
        dec!(130500),
        dec!(100000),
        Some(&profile),
        None,
    )
    .unwrap();

    assert_eq!(outcome.status, PaymentStatus::Hutang);
    assert_eq!(outcome.sisa_hutang, dec!(30500));
    assert_eq!(outcome.kembalian, dec!(0));
    assert_eq!(
        outcome.jatuh_tempo,
        Some(Utc::now().date_naive() + Duration::days(DEFAULT_TENOR_HARI))
    );
}

#[test]
fn explicit_due_date_wins_over_default() {
    let profile = unlimited();
    let due = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
    let outcome =
        CheckoutCalculator::evaluate_payment(dec!(100000), dec!(1), Some(&profile), Some(due))
            .unwrap();

    assert_eq!(outcome.jatuh_tempo, Some(due));
}

#[test]
fn walk_in_shortfall_is_rejected() {
    let result = CheckoutCalculator::evaluate_payment(dec!(100000), dec!(99999), None, None);
    assert!(matches!(result, Err(AppError::CreditLimit(_))));
}

#[test]
fn shortfall_within_remaining_limit_passes() {
    // limit 1_000_000, outstanding 900_000 -> headroom exactly 100_000
    let profile = CreditProfile::new(dec!(1000000), dec!(900000));
    let outcome = CheckoutCalculator::evaluate_payment(
        dec!(100000),
        dec!(0),
        Some(&profile),
        None,
    )
    .unwrap();

    assert_eq!(outcome.status, PaymentStatus::Hutang);
}

#[test]
fn shortfall_one_rupiah_over_limit_fails() {
    let profile = CreditProfile::new(dec!(1000000), dec!(900000));
    let result =
        CheckoutCalculator::evaluate_payment(dec!(100001), dec!(0), Some(&profile), None);
    assert!(matches!(result, Err(AppError::CreditLimit(_))));
}

#[test]
fn zero_limit_is_unlimited_credit() {
    let profile = CreditProfile::new(dec!(0), dec!(50000000));
    let outcome = CheckoutCalculator::evaluate_payment(
        dec!(25000000),
        dec!(0),
        Some(&profile),
        None,
    )
    .unwrap();

    assert_eq!(outcome.status, PaymentStatus::Hutang);
    assert_eq!(outcome.sisa_hutang, dec!(25000000));
}

#[test]
fn negative_amounts_are_rejected() {
    assert!(CheckoutCalculator::evaluate_payment(dec!(-1), dec!(0), None, None).is_err());
    assert!(CheckoutCalculator::evaluate_payment(dec!(100), dec!(-1), None, None).is_err());
}

proptest! {
    /// Money is conserved: tendered amount splits exactly into the settled
    /// portion, change, and carried debt.
    #[test]
    fn payment_splits_exactly(
        total in 0i64..100_000_000,
        dibayar in 0i64..200_000_000,
    ) {
        let total = Decimal::from(total);
        let dibayar = Decimal::from(dibayar);
        let profile = unlimited();

        let outcome =
            CheckoutCalculator::evaluate_payment(total, dibayar, Some(&profile), None).unwrap();

        prop_assert_eq!(dibayar - outcome.kembalian + outcome.sisa_hutang, total);
        // Never change and debt on the same nota
        prop_assert!(outcome.kembalian.is_zero() || outcome.sisa_hutang.is_zero());
        match outcome.status {
            PaymentStatus::Lunas => {
                prop_assert_eq!(outcome.sisa_hutang, Decimal::ZERO);
                prop_assert!(outcome.jatuh_tempo.is_none());
            }
            PaymentStatus::Hutang => {
                prop_assert!(outcome.sisa_hutang > Decimal::ZERO);
                prop_assert!(outcome.jatuh_tempo.is_some());
            }
        }
    }
}
