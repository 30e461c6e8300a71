use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use niaga::modules::checkout::models::{CartLine, NotaDiscount};
use niaga::modules::checkout::services::CheckoutCalculator;

fn dus_line(qty: u32, harga: Decimal, diskon: Decimal) -> CartLine {
    CartLine::dus_only(
        "brg-1".to_string(),
        "Barang Uji".to_string(),
        qty,
        12,
        harga,
        diskon,
    )
    .unwrap()
}

/// The reference receipt every flow was reconciled against:
/// 10 dus @ 15000 less 500 per dus, then 10% off the nota, paid 100000.
#[test]
fn worked_example_receipt() {
    let lines = vec![dus_line(10, dec!(15000), dec!(500))];
    let summary =
        CheckoutCalculator::summarize(&lines, NotaDiscount::Persen(dec!(10))).unwrap();

    assert_eq!(summary.subtotal, dec!(145000));
    assert_eq!(summary.total_diskon_item, dec!(5000));
    assert_eq!(summary.diskon_nota, dec!(14500));
    assert_eq!(summary.total, dec!(130500));
}

#[test]
fn multi_line_subtotal_sums_lines() {
    let lines = vec![
        dus_line(10, dec!(15000), dec!(500)),
        CartLine::new(
            "brg-2".to_string(),
            "Sabun".to_string(),
            2,
            5,
            24,
            dec!(24000),
            dec!(2500),
            dec!(1000),
        )
        .unwrap(),
    ];
    let summary = CheckoutCalculator::summarize(&lines, NotaDiscount::default()).unwrap();

    assert_eq!(summary.subtotal, dec!(145000) + dec!(58500));
    assert_eq!(summary.total_diskon_item, dec!(5000) + dec!(2000));
    assert_eq!(summary.total, summary.subtotal);
}

#[test]
fn empty_cart_is_rejected() {
    assert!(CheckoutCalculator::summarize(&[], NotaDiscount::default()).is_err());
}

#[test]
fn oversized_nominal_discount_floors_total_at_zero() {
    let lines = vec![dus_line(1, dec!(10000), dec!(0))];
    let summary =
        CheckoutCalculator::summarize(&lines, NotaDiscount::Nominal(dec!(999999))).unwrap();

    assert_eq!(summary.diskon_nota, dec!(10000));
    assert_eq!(summary.total, dec!(0));
}

#[test]
fn invalid_percent_is_rejected() {
    let lines = vec![dus_line(1, dec!(10000), dec!(0))];
    assert!(CheckoutCalculator::summarize(&lines, NotaDiscount::Persen(dec!(101))).is_err());
}

proptest! {
    /// Receipt-level invariants over arbitrary carts.
    #[test]
    fn summary_invariants(
        carts in prop::collection::vec((1u32..50, 100i64..1_000_000, 0i64..=100), 1..8),
        persen in 0i64..=100,
    ) {
        let lines: Vec<CartLine> = carts
            .iter()
            .map(|(qty, harga, diskon_frac)| {
                let harga = Decimal::from(*harga);
                let diskon = (harga * Decimal::from(*diskon_frac) / dec!(100)).round_dp(0);
                dus_line(*qty, harga, diskon)
            })
            .collect();

        let summary = CheckoutCalculator::summarize(
            &lines,
            NotaDiscount::Persen(Decimal::from(persen)),
        )
        .unwrap();

        let expected_subtotal: Decimal = lines.iter().map(|l| l.total).sum();
        prop_assert_eq!(summary.subtotal, expected_subtotal);
        prop_assert!(summary.diskon_nota <= summary.subtotal);
        prop_assert_eq!(summary.total, summary.subtotal - summary.diskon_nota);
        prop_assert!(summary.total >= Decimal::ZERO);
    }
}
