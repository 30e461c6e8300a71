use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::money;
use crate::core::{AppError, Result};
use crate::modules::partners::models::PartnerKind;

/// Direction of a debt record: hutang is owed to a supplier (from a
/// purchase), piutang is owed by a customer (from a sale).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebtKind {
    #[serde(rename = "HUTANG")]
    Hutang,
    #[serde(rename = "PIUTANG")]
    Piutang,
}

impl DebtKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hutang => "HUTANG",
            Self::Piutang => "PIUTANG",
        }
    }

    /// Which counterparty table carries the outstanding counter.
    pub fn partner_kind(&self) -> PartnerKind {
        match self {
            Self::Hutang => PartnerKind::Supplier,
            Self::Piutang => PartnerKind::Customer,
        }
    }
}

impl std::fmt::Display for DebtKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for DebtKind {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "HUTANG" => Ok(Self::Hutang),
            "PIUTANG" => Ok(Self::Piutang),
            _ => Err(format!("Invalid debt kind: {}", value)),
        }
    }
}

/// Settlement status of a debt record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebtStatus {
    #[serde(rename = "LUNAS")]
    Lunas,
    #[serde(rename = "BELUM_LUNAS")]
    BelumLunas,
}

impl DebtStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lunas => "LUNAS",
            Self::BelumLunas => "BELUM_LUNAS",
        }
    }
}

impl std::fmt::Display for DebtStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for DebtStatus {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "LUNAS" => Ok(Self::Lunas),
            "BELUM_LUNAS" => Ok(Self::BelumLunas),
            _ => Err(format!("Invalid debt status: {}", value)),
        }
    }
}

/// An outstanding balance created by a checkout shortfall, settled by zero
/// or more partial payments.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Debt {
    pub id: String,
    #[sqlx(try_from = "String")]
    pub kind: DebtKind,
    /// Source transaction (pembelian or penjualan id)
    pub transaksi_id: String,
    pub nomor_nota: String,
    pub partner_id: String,
    pub partner_nama: String,
    pub total: Decimal,
    pub dibayar: Decimal,
    #[sqlx(try_from = "String")]
    pub status: DebtStatus,
    pub jatuh_tempo: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Debt {
    pub fn new(
        kind: DebtKind,
        transaksi_id: String,
        nomor_nota: String,
        partner_id: String,
        partner_nama: String,
        total: Decimal,
        jatuh_tempo: NaiveDate,
    ) -> Result<Self> {
        if total <= Decimal::ZERO {
            return Err(AppError::validation("Nilai hutang harus positif"));
        }
        money::validate_rupiah(total).map_err(AppError::validation)?;

        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            kind,
            transaksi_id,
            nomor_nota,
            partner_id,
            partner_nama,
            total,
            dibayar: Decimal::ZERO,
            status: DebtStatus::BelumLunas,
            jatuh_tempo,
            created_at: now,
            updated_at: now,
        })
    }

    /// Remaining balance.
    pub fn sisa(&self) -> Decimal {
        self.total - self.dibayar
    }

    /// Record a partial or full payment. The amount must be positive and
    /// no more than the remaining balance; status flips to LUNAS exactly
    /// when the balance reaches zero.
    pub fn apply_payment(&mut self, jumlah: Decimal) -> Result<()> {
        if self.status == DebtStatus::Lunas {
            return Err(AppError::conflict("Hutang sudah lunas"));
        }
        if jumlah <= Decimal::ZERO {
            return Err(AppError::validation("Jumlah bayar harus positif"));
        }
        money::validate_rupiah(jumlah).map_err(AppError::validation)?;
        if jumlah > self.sisa() {
            return Err(AppError::validation(format!(
                "Jumlah bayar ({}) melebihi sisa hutang ({})",
                jumlah,
                self.sisa()
            )));
        }

        self.dibayar += jumlah;
        if self.dibayar >= self.total {
            self.status = DebtStatus::Lunas;
        }
        self.updated_at = Utc::now();

        Ok(())
    }

    /// Edit the due date; allowed in any status, administrators correct
    /// dates after the fact.
    pub fn set_jatuh_tempo(&mut self, jatuh_tempo: NaiveDate) {
        self.jatuh_tempo = jatuh_tempo;
        self.updated_at = Utc::now();
    }

    pub fn is_past_due(&self) -> bool {
        self.status != DebtStatus::Lunas && self.jatuh_tempo < Utc::now().date_naive()
    }
}

/// A single repayment against a debt.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DebtPayment {
    pub id: String,
    pub debt_id: String,
    pub jumlah: Decimal,
    pub tanggal: NaiveDate,
    pub keterangan: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DebtPayment {
    pub fn new(
        debt_id: String,
        jumlah: Decimal,
        tanggal: NaiveDate,
        keterangan: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            debt_id,
            jumlah,
            tanggal,
            keterangan,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(v: i64) -> Decimal {
        Decimal::from(v)
    }

    fn sample_debt(total: i64) -> Debt {
        Debt::new(
            DebtKind::Piutang,
            "trx-1".to_string(),
            "PJ-0001".to_string(),
            "cst-1".to_string(),
            "Toko Makmur".to_string(),
            dec(total),
            NaiveDate::from_ymd_opt(2026, 9, 22).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_debt_starts_unpaid() {
        let debt = sample_debt(100_000);
        assert_eq!(debt.status, DebtStatus::BelumLunas);
        assert_eq!(debt.sisa(), dec(100_000));
    }

    #[test]
    fn test_partial_payments_accumulate() {
        let mut debt = sample_debt(100_000);

        debt.apply_payment(dec(30_000)).unwrap();
        assert_eq!(debt.status, DebtStatus::BelumLunas);
        assert_eq!(debt.sisa(), dec(70_000));

        debt.apply_payment(dec(70_000)).unwrap();
        assert_eq!(debt.status, DebtStatus::Lunas);
        assert_eq!(debt.sisa(), Decimal::ZERO);
    }

    #[test]
    fn test_overpayment_rejected() {
        let mut debt = sample_debt(100_000);
        let result = debt.apply_payment(dec(100_001));
        assert!(result.is_err());
        assert_eq!(debt.dibayar, Decimal::ZERO);
    }

    #[test]
    fn test_payment_on_settled_debt_rejected() {
        let mut debt = sample_debt(50_000);
        debt.apply_payment(dec(50_000)).unwrap();
        assert!(debt.apply_payment(dec(1)).is_err());
    }

    #[test]
    fn test_zero_payment_rejected() {
        let mut debt = sample_debt(50_000);
        assert!(debt.apply_payment(Decimal::ZERO).is_err());
    }

    #[test]
    fn test_zero_total_rejected() {
        let result = Debt::new(
            DebtKind::Hutang,
            "trx-1".to_string(),
            "PB-0001".to_string(),
            "sup-1".to_string(),
            "UD Maju".to_string(),
            Decimal::ZERO,
            NaiveDate::from_ymd_opt(2026, 9, 22).unwrap(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_due_date_edit() {
        let mut debt = sample_debt(10_000);
        let new_date = NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();
        debt.set_jatuh_tempo(new_date);
        assert_eq!(debt.jatuh_tempo, new_date);
    }

    #[test]
    fn test_kind_maps_to_partner_table() {
        assert_eq!(DebtKind::Hutang.partner_kind(), PartnerKind::Supplier);
        assert_eq!(DebtKind::Piutang.partner_kind(), PartnerKind::Customer);
    }
}
