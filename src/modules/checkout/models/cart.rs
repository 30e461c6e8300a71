use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::money;
use crate::core::{AppError, Result};

/// A single line in a purchase or sales cart.
///
/// Quantity is split into whole boxes (`qty_dus`) and loose pieces
/// (`qty_eceran`); purchases use boxes only, sales may mix both. The
/// per-item discount applies per box, never per loose piece.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub barang_id: String,
    pub nama_barang: String,
    /// Whole boxes
    pub qty_dus: u32,
    /// Loose pieces
    pub qty_eceran: u32,
    /// Pieces per box, for stock conversion
    pub isi_per_dus: u32,
    /// Price per box
    pub harga_dus: Decimal,
    /// Price per loose piece
    pub harga_eceran: Decimal,
    /// Discount per box (currency, not percent)
    pub diskon: Decimal,
    /// Line total, computed at construction
    pub total: Decimal,
}

impl CartLine {
    /// Create a cart line with validation.
    ///
    /// Enforces `diskon <= harga_dus`, so the line total is always
    /// non-negative. The original left this unguarded; every receipt-level
    /// property downstream depends on the bound.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        barang_id: String,
        nama_barang: String,
        qty_dus: u32,
        qty_eceran: u32,
        isi_per_dus: u32,
        harga_dus: Decimal,
        harga_eceran: Decimal,
        diskon: Decimal,
    ) -> Result<Self> {
        if barang_id.trim().is_empty() {
            return Err(AppError::validation("Barang harus dipilih"));
        }

        if qty_dus == 0 && qty_eceran == 0 {
            return Err(AppError::validation("Jumlah barang tidak boleh nol"));
        }

        if isi_per_dus == 0 {
            return Err(AppError::validation("Isi per dus minimal 1"));
        }

        money::validate_rupiah(harga_dus).map_err(AppError::validation)?;
        money::validate_rupiah(harga_eceran).map_err(AppError::validation)?;
        money::validate_rupiah(diskon).map_err(AppError::validation)?;

        if diskon > harga_dus {
            return Err(AppError::validation(format!(
                "Diskon per dus ({}) melebihi harga ({})",
                diskon, harga_dus
            )));
        }

        let total = Decimal::from(qty_dus) * (harga_dus - diskon)
            + Decimal::from(qty_eceran) * harga_eceran;

        Ok(Self {
            barang_id,
            nama_barang,
            qty_dus,
            qty_eceran,
            isi_per_dus,
            harga_dus,
            harga_eceran,
            diskon,
            total,
        })
    }

    /// Box-only line, as used by the purchase flow.
    pub fn dus_only(
        barang_id: String,
        nama_barang: String,
        qty_dus: u32,
        isi_per_dus: u32,
        harga_dus: Decimal,
        diskon: Decimal,
    ) -> Result<Self> {
        Self::new(
            barang_id,
            nama_barang,
            qty_dus,
            0,
            isi_per_dus,
            harga_dus,
            Decimal::ZERO,
            diskon,
        )
    }

    /// Total quantity in pieces, for stock adjustment.
    pub fn total_pieces(&self) -> i64 {
        i64::from(self.qty_dus) * i64::from(self.isi_per_dus) + i64::from(self.qty_eceran)
    }

    /// Discount contributed by this line (per box times box count).
    pub fn diskon_total(&self) -> Decimal {
        Decimal::from(self.qty_dus) * self.diskon
    }
}

/// Nota-level (receipt-level) discount, entered either as a rupiah amount
/// or as a percentage of the subtotal-after-item-discounts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "jenis", content = "nilai", rename_all = "snake_case")]
pub enum NotaDiscount {
    Nominal(Decimal),
    Persen(Decimal),
}

impl Default for NotaDiscount {
    fn default() -> Self {
        NotaDiscount::Nominal(Decimal::ZERO)
    }
}

impl NotaDiscount {
    pub fn validate(&self) -> Result<()> {
        match self {
            NotaDiscount::Nominal(n) => {
                money::validate_rupiah(*n).map_err(AppError::validation)
            }
            NotaDiscount::Persen(p) => {
                if *p < Decimal::ZERO || *p > Decimal::ONE_HUNDRED {
                    return Err(AppError::validation(format!(
                        "Diskon persen harus 0-100, diterima: {}",
                        p
                    )));
                }
                Ok(())
            }
        }
    }

    /// Resolve to a rupiah amount against the given subtotal. A nominal
    /// discount larger than the subtotal is clamped so the total floors at
    /// zero.
    pub fn resolve(&self, subtotal: Decimal) -> Decimal {
        match self {
            NotaDiscount::Nominal(n) => (*n).min(subtotal),
            NotaDiscount::Persen(p) => money::percent_of(subtotal, *p),
        }
    }

    /// Re-derive the other representation, as the UI toggle does. Rounding
    /// loses precision; repeated toggles stay within one rupiah.
    pub fn toggled(&self, subtotal: Decimal) -> NotaDiscount {
        match self {
            NotaDiscount::Nominal(n) => {
                NotaDiscount::Persen(money::as_percent_of(subtotal, *n))
            }
            NotaDiscount::Persen(p) => NotaDiscount::Nominal(money::percent_of(subtotal, *p)),
        }
    }
}

/// Snapshot of cart totals produced by the calculator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutSummary {
    /// Sum of line totals (already net of per-item discounts)
    pub subtotal: Decimal,
    /// Sum of per-item discounts, reported on the receipt
    pub total_diskon_item: Decimal,
    /// Resolved nota discount
    pub diskon_nota: Decimal,
    /// Amount due
    pub total: Decimal,
}

/// Payment settlement status of a finalized transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    #[serde(rename = "LUNAS")]
    Lunas,
    #[serde(rename = "HUTANG")]
    Hutang,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lunas => "LUNAS",
            Self::Hutang => "HUTANG",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for PaymentStatus {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "LUNAS" => Ok(Self::Lunas),
            "HUTANG" => Ok(Self::Hutang),
            _ => Err(format!("Invalid payment status: {}", value)),
        }
    }
}

/// Transaction header lifecycle: draft cart, finalized receipt, cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    #[serde(rename = "KERANJANG")]
    Keranjang,
    #[serde(rename = "SELESAI")]
    Selesai,
    #[serde(rename = "BATAL")]
    Batal,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keranjang => "KERANJANG",
            Self::Selesai => "SELESAI",
            Self::Batal => "BATAL",
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for TransactionStatus {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "KERANJANG" => Ok(Self::Keranjang),
            "SELESAI" => Ok(Self::Selesai),
            "BATAL" => Ok(Self::Batal),
            _ => Err(format!("Invalid transaction status: {}", value)),
        }
    }
}

/// Credit standing of a registered counterparty (supplier or customer).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreditProfile {
    /// Credit limit; zero means unlimited, per the company's convention
    pub limit: Decimal,
    /// Outstanding debt currently carried
    pub terpakai: Decimal,
}

impl CreditProfile {
    pub fn new(limit: Decimal, terpakai: Decimal) -> Self {
        Self { limit, terpakai }
    }

    pub fn is_unlimited(&self) -> bool {
        self.limit.is_zero()
    }

    /// Remaining headroom, floored at zero.
    pub fn sisa_limit(&self) -> Decimal {
        (self.limit - self.terpakai).max(Decimal::ZERO)
    }
}

/// Outcome of evaluating a payment against the amount due.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentOutcome {
    pub status: PaymentStatus,
    /// Change returned, `max(0, dibayar - total)`
    pub kembalian: Decimal,
    /// Shortfall carried as debt, `max(0, total - dibayar)`
    pub sisa_hutang: Decimal,
    /// Due date, set only when status is HUTANG
    pub jatuh_tempo: Option<NaiveDate>,
}
