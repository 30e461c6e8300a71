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

/// Fallback name for walk-in sales without a typed customer name.
pub const PELANGGAN_UMUM: &str = "Umum";

/// A sale. Same draft-then-checkout lifecycle as a purchase, but the
/// customer is optional: walk-in sales carry only a free-typed name and
/// must be paid in full, registered customers may owe piutang within
/// their credit limit.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Penjualan {
    pub id: String,
    pub nomor_nota: String,
    /// `None` for walk-in sales
    pub customer_id: Option<String>,
    pub customer_nama: String,
    pub tanggal: NaiveDate,
    pub status: TransactionStatus,
    pub subtotal: Decimal,
    pub diskon_nota: Decimal,
    pub total: Decimal,
    pub dibayar: Decimal,
    pub kembalian: Decimal,
    pub sisa_hutang: Decimal,
    pub status_pembayaran: Option<PaymentStatus>,
    pub jatuh_tempo: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub items: Vec<PenjualanItem>,
}

impl Penjualan {
    pub fn new(
        customer_id: Option<String>,
        customer_nama: String,
        tanggal: NaiveDate,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            nomor_nota: generate_nomor("PJ", tanggal),
            customer_id,
            customer_nama,
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

    pub fn is_walk_in(&self) -> bool {
        self.customer_id.is_none()
    }

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

    pub fn cart_lines(&self) -> Result<Vec<CartLine>> {
        self.items.iter().map(PenjualanItem::to_line).collect()
    }
}

/// One barang line on a sales nota, split into boxes and loose pieces.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PenjualanItem {
    pub id: String,
    pub penjualan_id: String,
    pub barang_id: String,
    pub nama_barang: String,
    pub qty_dus: u32,
    pub qty_eceran: u32,
    pub isi_per_dus: u32,
    pub harga_dus: Decimal,
    pub harga_eceran: Decimal,
    pub diskon: Decimal,
    pub total: Decimal,
}

impl PenjualanItem {
    pub fn from_line(penjualan_id: String, line: &CartLine) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            penjualan_id,
            barang_id: line.barang_id.clone(),
            nama_barang: line.nama_barang.clone(),
            qty_dus: line.qty_dus,
            qty_eceran: line.qty_eceran,
            isi_per_dus: line.isi_per_dus,
            harga_dus: line.harga_dus,
            harga_eceran: line.harga_eceran,
            diskon: line.diskon,
            total: line.total,
        }
    }

    pub fn to_line(&self) -> Result<CartLine> {
        CartLine::new(
            self.barang_id.clone(),
            self.nama_barang.clone(),
            self.qty_dus,
            self.qty_eceran,
            self.isi_per_dus,
            self.harga_dus,
            self.harga_eceran,
            self.diskon,
        )
    }

    /// Stock movement in pieces; sales take from stock.
    pub fn stok_delta(&self) -> i64 {
        -(i64::from(self.qty_dus) * i64::from(self.isi_per_dus) + i64::from(self.qty_eceran))
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePenjualanRequest {
    /// Registered customer; omit for walk-in sales
    pub customer_id: Option<String>,
    /// Free-typed name for walk-in sales, ignored when customer_id is set
    pub customer_nama: Option<String>,
    pub tanggal: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct PenjualanItemRequest {
    pub barang_id: String,
    #[serde(default)]
    pub qty_dus: u32,
    #[serde(default)]
    pub qty_eceran: u32,
    pub diskon: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutPenjualanRequest {
    pub dibayar: Decimal,
    pub diskon_nota: Option<NotaDiscount>,
    pub jatuh_tempo: Option<NaiveDate>,
}

/// One-shot nota: header, items, and payment in a single request, written
/// atomically.
#[derive(Debug, Deserialize)]
pub struct CreatePenjualanLengkapRequest {
    pub customer_id: Option<String>,
    pub customer_nama: Option<String>,
    pub tanggal: Option<NaiveDate>,
    pub items: Vec<PenjualanItemRequest>,
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

    fn walk_in_draft() -> Penjualan {
        let mut penjualan = Penjualan::new(
            None,
            PELANGGAN_UMUM.to_string(),
            NaiveDate::from_ymd_opt(2026, 8, 23).unwrap(),
        );
        let line = CartLine::new(
            "brg-1".to_string(),
            "Sabun".to_string(),
            2,
            5,
            24,
            dec(24_000),
            dec(2_500),
            dec(1_000),
        )
        .unwrap();
        penjualan
            .items
            .push(PenjualanItem::from_line(penjualan.id.clone(), &line));
        penjualan
    }

    #[test]
    fn test_walk_in_draft() {
        let penjualan = walk_in_draft();
        assert!(penjualan.is_walk_in());
        assert!(penjualan.nomor_nota.starts_with("PJ-20260823-"));
        assert_eq!(penjualan.status, TransactionStatus::Keranjang);
    }

    #[test]
    fn test_item_stock_delta_counts_loose_pieces() {
        let penjualan = walk_in_draft();
        // 2 dus x 24 + 5 eceran, outbound
        assert_eq!(penjualan.items[0].stok_delta(), -53);
    }

    #[test]
    fn test_apply_checkout_with_change() {
        let mut penjualan = walk_in_draft();
        let lines = penjualan.cart_lines().unwrap();
        let summary = CheckoutCalculator::summarize(&lines, NotaDiscount::default()).unwrap();
        let outcome =
            CheckoutCalculator::evaluate_payment(summary.total, dec(60_000), None, None).unwrap();

        penjualan.apply_checkout(&summary, dec(60_000), &outcome);

        assert_eq!(penjualan.status, TransactionStatus::Selesai);
        assert_eq!(penjualan.total, dec(58_500));
        assert_eq!(penjualan.dibayar, dec(60_000));
        assert_eq!(penjualan.kembalian, dec(1_500));
        assert_eq!(penjualan.status_pembayaran, Some(PaymentStatus::Lunas));
    }

    #[test]
    fn test_cancel_only_from_draft() {
        let mut penjualan = walk_in_draft();
        penjualan.cancel().unwrap();
        assert_eq!(penjualan.status, TransactionStatus::Batal);
        assert!(penjualan.cancel().is_err());
    }
}
