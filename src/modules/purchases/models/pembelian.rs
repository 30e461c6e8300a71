use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::nota::generate_nomor;
use crate::core::{AppError, Result};
use crate::modules::checkout::models::{
    CartLine, CheckoutSummary, NotaDiscount, PaymentOutcome, PaymentStatus, TransactionStatus,
};

/// A purchase from a supplier. Starts life as a KERANJANG draft that
/// accumulates items, then checkout snapshots the totals and flips it to
/// SELESAI. Purchases count stock in whole boxes only.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Pembelian {
    pub id: String,
    pub nomor_nota: String,
    pub supplier_id: String,
    pub supplier_nama: String,
    pub tanggal: NaiveDate,
    pub status: TransactionStatus,
    pub subtotal: Decimal,
    pub diskon_nota: Decimal,
    pub total: Decimal,
    pub dibayar: Decimal,
    pub kembalian: Decimal,
    pub sisa_hutang: Decimal,
    /// Set at checkout, `None` while the draft is open
    pub status_pembayaran: Option<PaymentStatus>,
    pub jatuh_tempo: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub items: Vec<PembelianItem>,
}

impl Pembelian {
    pub fn new(supplier_id: String, supplier_nama: String, tanggal: NaiveDate) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            nomor_nota: generate_nomor("PB", tanggal),
            supplier_id,
            supplier_nama,
            tanggal,
            status: TransactionStatus::Keranjang,
            subtotal: Decimal::ZERO,
            diskon_nota: Decimal::ZERO,
            total: Decimal::ZERO,
            dibayar: Decimal::ZERO,
            kembalian: Decimal::ZERO,
            sisa_hutang: Decimal::ZERO,
            status_pembayaran: None,
            jatuh_tempo: None,
            created_at: now,
            updated_at: now,
            items: Vec::new(),
        }
    }

    /// Drafts are the only mutable state; finalized and cancelled notas are
    /// immutable history.
    pub fn ensure_keranjang(&self) -> Result<()> {
        if self.status != TransactionStatus::Keranjang {
            return Err(AppError::conflict(format!(
                "Nota {} berstatus {} dan tidak bisa diubah",
                self.nomor_nota, self.status
            )));
        }
        Ok(())
    }

    /// Snapshot the calculator's verdict onto the header and close it.
    /// `dibayar` is the amount tendered, kept as entered even when change
    /// is returned.
    pub fn apply_checkout(
        &mut self,
        summary: &CheckoutSummary,
        dibayar: Decimal,
        outcome: &PaymentOutcome,
    ) {
        self.subtotal = summary.subtotal;
        self.diskon_nota = summary.diskon_nota;
        self.total = summary.total;
        self.dibayar = dibayar;
        self.kembalian = outcome.kembalian;
        self.sisa_hutang = outcome.sisa_hutang;
        self.status_pembayaran = Some(outcome.status);
        self.jatuh_tempo = outcome.jatuh_tempo;
        self.status = TransactionStatus::Selesai;
        self.updated_at = Utc::now();
    }

    pub fn cancel(&mut self) -> Result<()> {
        self.ensure_keranjang()?;
        self.status = TransactionStatus::Batal;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Rebuild validated cart lines from the stored items. Totals are
    /// recomputed server-side at checkout, never trusted from the client.
    pub fn cart_lines(&self) -> Result<Vec<CartLine>> {
        self.items.iter().map(PembelianItem::to_line).collect()
    }
}

/// One barang line on a purchase nota. Prices and names are snapshotted at
/// entry time so later catalog edits leave history intact.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PembelianItem {
    pub id: String,
    pub pembelian_id: String,
    pub barang_id: String,
    pub nama_barang: String,
    pub qty_dus: u32,
    pub isi_per_dus: u32,
    pub harga_dus: Decimal,
    pub diskon: Decimal,
    pub total: Decimal,
}

impl PembelianItem {
    pub fn from_line(pembelian_id: String, line: &CartLine) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            pembelian_id,
            barang_id: line.barang_id.clone(),
            nama_barang: line.nama_barang.clone(),
            qty_dus: line.qty_dus,
            isi_per_dus: line.isi_per_dus,
            harga_dus: line.harga_dus,
            diskon: line.diskon,
            total: line.total,
        }
    }

    pub fn to_line(&self) -> Result<CartLine> {
        CartLine::dus_only(
            self.barang_id.clone(),
            self.nama_barang.clone(),
            self.qty_dus,
            self.isi_per_dus,
            self.harga_dus,
            self.diskon,
        )
    }

    /// Stock movement in pieces; purchases add to stock.
    pub fn stok_delta(&self) -> i64 {
        i64::from(self.qty_dus) * i64::from(self.isi_per_dus)
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePembelianRequest {
    pub supplier_id: String,
    pub tanggal: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct PembelianItemRequest {
    pub barang_id: String,
    pub qty_dus: u32,
    /// Override of the catalog's purchase price; supplier quotes vary
    pub harga_dus: Option<Decimal>,
    pub diskon: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutPembelianRequest {
    pub dibayar: Decimal,
    pub diskon_nota: Option<NotaDiscount>,
    pub jatuh_tempo: Option<NaiveDate>,
}

/// One-shot nota: header, items, and payment in a single request, written
/// atomically.
#[derive(Debug, Deserialize)]
pub struct CreatePembelianLengkapRequest {
    pub supplier_id: String,
    pub tanggal: Option<NaiveDate>,
    pub items: Vec<PembelianItemRequest>,
    pub dibayar: Decimal,
    pub diskon_nota: Option<NotaDiscount>,
    pub jatuh_tempo: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::checkout::services::CheckoutCalculator;

    fn dec(v: i64) -> Decimal {
        Decimal::from(v)
    }

    fn draft_with_line() -> Pembelian {
        let mut pembelian = Pembelian::new(
            "sup-1".to_string(),
            "UD Maju".to_string(),
            NaiveDate::from_ymd_opt(2026, 8, 23).unwrap(),
        );
        let line = CartLine::dus_only(
            "brg-1".to_string(),
            "Minyak Goreng".to_string(),
            10,
            12,
            dec(15_000),
            dec(500),
        )
        .unwrap();
        pembelian
            .items
            .push(PembelianItem::from_line(pembelian.id.clone(), &line));
        pembelian
    }

    #[test]
    fn test_new_draft_is_empty_keranjang() {
        let pembelian = Pembelian::new(
            "sup-1".to_string(),
            "UD Maju".to_string(),
            NaiveDate::from_ymd_opt(2026, 8, 23).unwrap(),
        );
        assert_eq!(pembelian.status, TransactionStatus::Keranjang);
        assert!(pembelian.nomor_nota.starts_with("PB-20260823-"));
        assert!(pembelian.status_pembayaran.is_none());
    }

    #[test]
    fn test_apply_checkout_snapshots_totals() {
        let mut pembelian = draft_with_line();
        let lines = pembelian.cart_lines().unwrap();
        let summary =
            CheckoutCalculator::summarize(&lines, NotaDiscount::Persen(dec(10))).unwrap();
        let outcome =
            CheckoutCalculator::evaluate_payment(summary.total, dec(130_500), None, None).unwrap();

        pembelian.apply_checkout(&summary, dec(130_500), &outcome);

        assert_eq!(pembelian.status, TransactionStatus::Selesai);
        assert_eq!(pembelian.subtotal, dec(145_000));
        assert_eq!(pembelian.diskon_nota, dec(14_500));
        assert_eq!(pembelian.total, dec(130_500));
        assert_eq!(pembelian.dibayar, dec(130_500));
        assert_eq!(pembelian.sisa_hutang, Decimal::ZERO);
        assert_eq!(pembelian.status_pembayaran, Some(PaymentStatus::Lunas));
    }

    #[test]
    fn test_finalized_nota_rejects_mutation() {
        let mut pembelian = draft_with_line();
        let lines = pembelian.cart_lines().unwrap();
        let summary = CheckoutCalculator::summarize(&lines, NotaDiscount::default()).unwrap();
        let outcome =
            CheckoutCalculator::evaluate_payment(summary.total, summary.total, None, None)
                .unwrap();
        pembelian.apply_checkout(&summary, summary.total, &outcome);

        assert!(pembelian.ensure_keranjang().is_err());
        assert!(pembelian.cancel().is_err());
    }

    #[test]
    fn test_cancel_from_draft() {
        let mut pembelian = draft_with_line();
        pembelian.cancel().unwrap();
        assert_eq!(pembelian.status, TransactionStatus::Batal);
    }

    #[test]
    fn test_item_stock_delta_in_pieces() {
        let pembelian = draft_with_line();
        assert_eq!(pembelian.items[0].stok_delta(), 120);
    }
}
