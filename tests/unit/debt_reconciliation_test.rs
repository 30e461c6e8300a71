use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use niaga::modules::debts::models::{Debt, DebtKind, DebtStatus};

fn piutang(total: Decimal) -> Debt {
    Debt::new(
        DebtKind::Piutang,
        "trx-1".to_string(),
        "PJ-20260823-AB12CD".to_string(),
        "cst-1".to_string(),
        "Toko Makmur".to_string(),
        total,
        NaiveDate::from_ymd_opt(2026, 9, 22).unwrap(),
    )
    .unwrap()
}

#[test]
fn full_payment_settles_in_one_step() {
    let mut debt = piutang(dec!(30500));
    debt.apply_payment(dec!(30500)).unwrap();

    assert_eq!(debt.status, DebtStatus::Lunas);
    assert_eq!(debt.sisa(), dec!(0));
}

#[test]
fn installments_settle_exactly_at_total() {
    let mut debt = piutang(dec!(100000));

    debt.apply_payment(dec!(40000)).unwrap();
    debt.apply_payment(dec!(40000)).unwrap();
    assert_eq!(debt.status, DebtStatus::BelumLunas);
    assert_eq!(debt.sisa(), dec!(20000));

    debt.apply_payment(dec!(20000)).unwrap();
    assert_eq!(debt.status, DebtStatus::Lunas);
}

#[test]
fn payment_above_remaining_balance_is_rejected() {
    let mut debt = piutang(dec!(100000));
    debt.apply_payment(dec!(99000)).unwrap();

    let result = debt.apply_payment(dec!(1001));
    assert!(result.is_err());
    // A rejected payment leaves the record untouched
    assert_eq!(debt.dibayar, dec!(99000));
    assert_eq!(debt.status, DebtStatus::BelumLunas);
}

#[test]
fn settled_debt_takes_no_more_payments() {
    let mut debt = piutang(dec!(50000));
    debt.apply_payment(dec!(50000)).unwrap();
    assert!(debt.apply_payment(dec!(1)).is_err());
}

#[test]
fn nonpositive_payments_are_rejected() {
    let mut debt = piutang(dec!(50000));
    assert!(debt.apply_payment(dec!(0)).is_err());
    assert!(debt.apply_payment(dec!(-5000)).is_err());
}

/// Two payments taken from the same stored snapshot both pass the
/// in-memory overpayment check, so the persisted write is guarded on the
/// balance the writer started from. After the first write lands, the
/// stored balance no longer matches the second writer's starting value
/// and its guarded update must match zero rows.
#[test]
fn payments_from_the_same_snapshot_share_one_starting_balance() {
    let stored = piutang(dec!(100000));
    let mut first = stored.clone();
    let mut second = stored.clone();

    let guard_first = first.dibayar;
    first.apply_payment(dec!(60000)).unwrap();
    let guard_second = second.dibayar;
    second.apply_payment(dec!(60000)).unwrap();

    assert_eq!(guard_first, guard_second);
    assert_ne!(first.dibayar, guard_second);
}

#[test]
fn past_due_tracks_status_and_date() {
    let mut debt = piutang(dec!(50000));
    debt.set_jatuh_tempo(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
    assert!(debt.is_past_due());

    debt.apply_payment(dec!(50000)).unwrap();
    // Settled debts are never past due
    assert!(!debt.is_past_due());
}

proptest! {
    /// Replaying any sequence of payments keeps the books consistent:
    /// paid plus remaining equals the original total, and the status
    /// flips to LUNAS exactly when the balance hits zero.
    #[test]
    fn payment_sequence_reconciles(
        total in 1i64..10_000_000,
        payments in prop::collection::vec(1i64..5_000_000, 0..10),
    ) {
        let total = Decimal::from(total);
        let mut debt = piutang(total);

        for payment in payments {
            let payment = Decimal::from(payment);
            let before = debt.dibayar;

            match debt.apply_payment(payment) {
                Ok(()) => {
                    prop_assert_eq!(debt.dibayar, before + payment);
                }
                Err(_) => {
                    // Rejected payments must not move the balance
                    prop_assert_eq!(debt.dibayar, before);
                }
            }

            prop_assert_eq!(debt.dibayar + debt.sisa(), total);
            prop_assert!(debt.dibayar <= total);
            let settled = debt.status == DebtStatus::Lunas;
            prop_assert_eq!(settled, debt.sisa().is_zero());
        }
    }
}
