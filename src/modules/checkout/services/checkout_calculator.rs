use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::core::{AppError, Result};
use crate::modules::checkout::models::{
    CartLine, CheckoutSummary, CreditProfile, NotaDiscount, PaymentOutcome, PaymentStatus,
};

/// Default tenor when a checkout leaves a shortfall and no due date was
/// supplied.
pub const DEFAULT_TENOR_HARI: i64 = 30;

/// The single implementation of the cart arithmetic and payment rules.
///
/// The original system re-implemented these rules inline in every page's
/// event handlers, with semantics that had already drifted between the
/// purchase and sales flows. Both flows now call this and nothing else.
pub struct CheckoutCalculator;

impl CheckoutCalculator {
    /// Roll a cart up into receipt totals.
    ///
    /// `subtotal` is the sum of line totals (each already net of its
    /// per-item discount); the nota discount resolves against that
    /// subtotal and the amount due floors at zero.
    pub fn summarize(lines: &[CartLine], diskon_nota: NotaDiscount) -> Result<CheckoutSummary> {
        if lines.is_empty() {
            return Err(AppError::validation("Keranjang masih kosong"));
        }

        diskon_nota.validate()?;

        let subtotal: Decimal = lines.iter().map(|l| l.total).sum();
        let total_diskon_item: Decimal = lines.iter().map(|l| l.diskon_total()).sum();
        let diskon_nota = diskon_nota.resolve(subtotal);
        let total = (subtotal - diskon_nota).max(Decimal::ZERO);

        Ok(CheckoutSummary {
            subtotal,
            total_diskon_item,
            diskon_nota,
            total,
        })
    }

    /// Evaluate a payment against the amount due.
    ///
    /// * `dibayar >= total` settles the nota: LUNAS, change returned.
    /// * A shortfall becomes hutang with a due date (default +30 days),
    ///   but only for a registered counterparty within its credit limit.
    ///   A zero limit means unlimited. Walk-in counterparties
    ///   (`profile == None`) must always pay in full.
    pub fn evaluate_payment(
        total: Decimal,
        dibayar: Decimal,
        profile: Option<&CreditProfile>,
        jatuh_tempo: Option<NaiveDate>,
    ) -> Result<PaymentOutcome> {
        if total < Decimal::ZERO {
            return Err(AppError::validation("Total tidak boleh negatif"));
        }
        if dibayar < Decimal::ZERO {
            return Err(AppError::validation("Jumlah bayar tidak boleh negatif"));
        }

        if dibayar >= total {
            return Ok(PaymentOutcome {
                status: PaymentStatus::Lunas,
                kembalian: dibayar - total,
                sisa_hutang: Decimal::ZERO,
                jatuh_tempo: None,
            });
        }

        let sisa_hutang = total - dibayar;

        let Some(profile) = profile else {
            warn!(%sisa_hutang, "Checkout rejected: unregistered counterparty with shortfall");
            return Err(AppError::credit_limit(
                "Pelanggan baru harus membayar lunas",
            ));
        };

        if !profile.is_unlimited() && sisa_hutang > profile.sisa_limit() {
            warn!(
                %sisa_hutang,
                sisa_limit = %profile.sisa_limit(),
                "Checkout rejected: shortfall exceeds remaining credit limit"
            );
            return Err(AppError::credit_limit(format!(
                "Sisa hutang {} melebihi sisa limit {}",
                sisa_hutang,
                profile.sisa_limit()
            )));
        }

        let jatuh_tempo = jatuh_tempo
            .unwrap_or_else(|| Utc::now().date_naive() + Duration::days(DEFAULT_TENOR_HARI));

        info!(%sisa_hutang, %jatuh_tempo, "Checkout carries a shortfall as hutang");

        Ok(PaymentOutcome {
            status: PaymentStatus::Hutang,
            kembalian: Decimal::ZERO,
            sisa_hutang,
            jatuh_tempo: Some(jatuh_tempo),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(v: i64) -> Decimal {
        Decimal::from(v)
    }

    fn line(qty: u32, harga: i64, diskon: i64) -> CartLine {
        CartLine::dus_only(
            "brg-1".to_string(),
            "Barang Uji".to_string(),
            qty,
            12,
            dec(harga),
            dec(diskon),
        )
        .unwrap()
    }

    #[test]
    fn test_summarize_worked_example() {
        // 15000 x 10 dus - 500 x 10 = 145000; nota 10% = 14500; total 130500
        let lines = vec![line(10, 15_000, 500)];
        let summary =
            CheckoutCalculator::summarize(&lines, NotaDiscount::Persen(dec(10))).unwrap();

        assert_eq!(summary.subtotal, dec(145_000));
        assert_eq!(summary.total_diskon_item, dec(5_000));
        assert_eq!(summary.diskon_nota, dec(14_500));
        assert_eq!(summary.total, dec(130_500));
    }

    #[test]
    fn test_summarize_empty_cart_rejected() {
        let result = CheckoutCalculator::summarize(&[], NotaDiscount::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_summarize_total_floors_at_zero() {
        let lines = vec![line(1, 10_000, 0)];
        let summary =
            CheckoutCalculator::summarize(&lines, NotaDiscount::Nominal(dec(50_000))).unwrap();

        assert_eq!(summary.diskon_nota, dec(10_000));
        assert_eq!(summary.total, Decimal::ZERO);
    }

    #[test]
    fn test_exact_payment_is_lunas() {
        let outcome =
            CheckoutCalculator::evaluate_payment(dec(130_500), dec(130_500), None, None).unwrap();

        assert_eq!(outcome.status, PaymentStatus::Lunas);
        assert_eq!(outcome.kembalian, Decimal::ZERO);
        assert_eq!(outcome.sisa_hutang, Decimal::ZERO);
        assert!(outcome.jatuh_tempo.is_none());
    }

    #[test]
    fn test_one_rupiah_short_is_hutang() {
        let profile = CreditProfile::new(Decimal::ZERO, Decimal::ZERO);
        let outcome = CheckoutCalculator::evaluate_payment(
            dec(130_500),
            dec(130_499),
            Some(&profile),
            None,
        )
        .unwrap();

        assert_eq!(outcome.status, PaymentStatus::Hutang);
        assert_eq!(outcome.sisa_hutang, dec(1));
    }

    #[test]
    fn test_default_due_date_is_thirty_days() {
        let profile = CreditProfile::new(Decimal::ZERO, Decimal::ZERO);
        let outcome =
            CheckoutCalculator::evaluate_payment(dec(100_000), dec(50_000), Some(&profile), None)
                .unwrap();

        let expected = Utc::now().date_naive() + Duration::days(30);
        assert_eq!(outcome.jatuh_tempo, Some(expected));
    }

    #[test]
    fn test_shortfall_over_limit_rejected() {
        // limit 1_000_000, outstanding 900_000 -> headroom 100_000
        let profile = CreditProfile::new(dec(1_000_000), dec(900_000));
        let result = CheckoutCalculator::evaluate_payment(
            dec(200_000),
            dec(50_000),
            Some(&profile),
            None,
        );

        assert!(matches!(result, Err(AppError::CreditLimit(_))));
    }

    #[test]
    fn test_zero_limit_means_unlimited() {
        let profile = CreditProfile::new(Decimal::ZERO, dec(99_000_000));
        let outcome = CheckoutCalculator::evaluate_payment(
            dec(10_000_000),
            Decimal::ZERO,
            Some(&profile),
            None,
        )
        .unwrap();

        assert_eq!(outcome.status, PaymentStatus::Hutang);
        assert_eq!(outcome.sisa_hutang, dec(10_000_000));
    }

    #[test]
    fn test_walk_in_must_pay_in_full() {
        let result = CheckoutCalculator::evaluate_payment(dec(100_000), dec(99_999), None, None);
        assert!(matches!(result, Err(AppError::CreditLimit(_))));
    }
}
