use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use niaga::modules::checkout::models::CartLine;

fn line(
    qty_dus: u32,
    qty_eceran: u32,
    harga_dus: Decimal,
    harga_eceran: Decimal,
    diskon: Decimal,
) -> Result<CartLine, niaga::core::AppError> {
    CartLine::new(
        "brg-1".to_string(),
        "Barang Uji".to_string(),
        qty_dus,
        qty_eceran,
        12,
        harga_dus,
        harga_eceran,
        diskon,
    )
}

#[test]
fn line_total_decomposes_into_dus_and_eceran() {
    // 3 dus x (20000 - 1500) + 7 eceran x 1800 = 55500 + 12600
    let l = line(3, 7, dec!(20000), dec!(1800), dec!(1500)).unwrap();
    assert_eq!(l.total, dec!(68100));
}

#[test]
fn discount_equal_to_price_gives_free_boxes() {
    let l = line(5, 0, dec!(10000), dec!(0), dec!(10000)).unwrap();
    assert_eq!(l.total, dec!(0));
}

#[test]
fn discount_above_price_is_rejected() {
    assert!(line(1, 0, dec!(10000), dec!(0), dec!(10001)).is_err());
}

#[test]
fn fractional_rupiah_is_rejected() {
    assert!(line(1, 0, dec!(10000.5), dec!(0), dec!(0)).is_err());
    assert!(line(1, 1, dec!(10000), dec!(999.99), dec!(0)).is_err());
}

#[test]
fn negative_price_is_rejected() {
    assert!(line(1, 0, dec!(-1), dec!(0), dec!(0)).is_err());
}

proptest! {
    /// The line formula holds for arbitrary valid inputs.
    #[test]
    fn total_matches_formula(
        qty_dus in 0u32..500,
        qty_eceran in 0u32..500,
        harga_dus in 0i64..10_000_000,
        harga_eceran in 0i64..1_000_000,
        diskon_frac in 0i64..=100,
    ) {
        prop_assume!(qty_dus > 0 || qty_eceran > 0);

        let harga_dus = Decimal::from(harga_dus);
        let harga_eceran = Decimal::from(harga_eceran);
        // Keep the discount within the price bound
        let diskon = harga_dus * Decimal::from(diskon_frac) / dec!(100);
        let diskon = diskon.round_dp(0);

        let l = line(qty_dus, qty_eceran, harga_dus, harga_eceran, diskon).unwrap();

        let expected = Decimal::from(qty_dus) * (harga_dus - diskon)
            + Decimal::from(qty_eceran) * harga_eceran;
        prop_assert_eq!(l.total, expected);
        prop_assert!(l.total >= Decimal::ZERO);
    }

    /// The per-box discount never touches loose pieces.
    #[test]
    fn discount_only_applies_per_box(
        qty_dus in 1u32..100,
        qty_eceran in 1u32..100,
        harga_dus in 1000i64..1_000_000,
        harga_eceran in 100i64..100_000,
    ) {
        let harga_dus = Decimal::from(harga_dus);
        let harga_eceran = Decimal::from(harga_eceran);
        let diskon = dec!(100);

        let with = line(qty_dus, qty_eceran, harga_dus, harga_eceran, diskon).unwrap();
        let without = line(qty_dus, qty_eceran, harga_dus, harga_eceran, dec!(0)).unwrap();

        prop_assert_eq!(without.total - with.total, Decimal::from(qty_dus) * diskon);
        prop_assert_eq!(with.diskon_total(), Decimal::from(qty_dus) * diskon);
    }
}
