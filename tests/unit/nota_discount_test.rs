use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use niaga::modules::checkout::models::NotaDiscount;

#[test]
fn nominal_resolves_as_entered() {
    assert_eq!(NotaDiscount::Nominal(dec!(5000)).resolve(dec!(100000)), dec!(5000));
}

#[test]
fn nominal_above_subtotal_clamps() {
    assert_eq!(
        NotaDiscount::Nominal(dec!(150000)).resolve(dec!(100000)),
        dec!(100000)
    );
}

#[test]
fn percent_resolves_with_banker_rounding() {
    // 2.5% of 1001 = 25.025 -> 25
    assert_eq!(NotaDiscount::Persen(dec!(2.5)).resolve(dec!(1001)), dec!(25));
}

#[test]
fn percent_out_of_bounds_rejected() {
    assert!(NotaDiscount::Persen(dec!(100.01)).validate().is_err());
    assert!(NotaDiscount::Persen(dec!(-0.01)).validate().is_err());
    assert!(NotaDiscount::Persen(dec!(0)).validate().is_ok());
    assert!(NotaDiscount::Persen(dec!(100)).validate().is_ok());
}

#[test]
fn toggle_worked_example() {
    let subtotal = dec!(145000);
    let persen = NotaDiscount::Persen(dec!(10));

    let nominal = persen.toggled(subtotal);
    assert_eq!(nominal, NotaDiscount::Nominal(dec!(14500)));
    assert_eq!(nominal.toggled(subtotal), NotaDiscount::Persen(dec!(10)));
}

proptest! {
    /// Toggling nominal -> percent -> nominal drifts by at most one rupiah.
    #[test]
    fn toggle_round_trip_within_one_rupiah(
        subtotal in 1i64..100_000_000,
        nominal in 0i64..100_000_000,
    ) {
        let subtotal = Decimal::from(subtotal);
        let nominal = Decimal::from(nominal).min(subtotal);
        let original = NotaDiscount::Nominal(nominal);

        let as_persen = original.toggled(subtotal);
        let back = as_persen.toggled(subtotal);

        let NotaDiscount::Nominal(recovered) = back else {
            return Err(TestCaseError::fail("expected nominal after double toggle"));
        };
        let drift = (recovered - nominal).abs();
        prop_assert!(drift <= Decimal::ONE, "drift {} exceeds one rupiah", drift);
    }

    /// A resolved discount never exceeds the subtotal, so totals cannot go
    /// negative.
    #[test]
    fn resolution_bounded_by_subtotal(
        subtotal in 0i64..100_000_000,
        nilai in 0i64..200_000_000,
        persen in 0i64..=100,
    ) {
        let subtotal = Decimal::from(subtotal);

        let nominal = NotaDiscount::Nominal(Decimal::from(nilai)).resolve(subtotal);
        prop_assert!(nominal <= subtotal);

        let persen = NotaDiscount::Persen(Decimal::from(persen)).resolve(subtotal);
        prop_assert!(persen <= subtotal);
    }
}
