use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::money;
use crate::core::{AppError, Result};

/// A free-form operational expense: fuel, repairs, electricity. Kept
/// outside the purchase flow because nothing enters stock.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Pengeluaran {
    pub id: String,
    pub keterangan: String,
    pub jumlah: Decimal,
    pub tanggal: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePengeluaranRequest {
    pub keterangan: String,
    pub jumlah: Decimal,
    pub tanggal: Option<NaiveDate>,
}

impl Pengeluaran {
    pub fn new(req: CreatePengeluaranRequest) -> Result<Self> {
        if req.keterangan.trim().is_empty() {
            return Err(AppError::validation("Keterangan tidak boleh kosong"));
        }
        money::validate_rupiah(req.jumlah).map_err(AppError::validation)?;
        if req.jumlah <= Decimal::ZERO {
            return Err(AppError::validation("Jumlah pengeluaran harus positif"));
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            keterangan: req.keterangan.trim().to_string(),
            jumlah: req.jumlah,
            tanggal: req.tanggal.unwrap_or_else(|| Utc::now().date_naive()),
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_expense() {
        let pengeluaran = Pengeluaran::new(CreatePengeluaranRequest {
            keterangan: " Solar truk ".to_string(),
            jumlah: Decimal::from(350_000),
            tanggal: NaiveDate::from_ymd_opt(2026, 8, 20),
        })
        .unwrap();

        assert_eq!(pengeluaran.keterangan, "Solar truk");
        assert_eq!(
            pengeluaran.tanggal,
            NaiveDate::from_ymd_opt(2026, 8, 20).unwrap()
        );
    }

    #[test]
    fn test_zero_amount_rejected() {
        let result = Pengeluaran::new(CreatePengeluaranRequest {
            keterangan: "Solar".to_string(),
            jumlah: Decimal::ZERO,
            tanggal: None,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_description_rejected() {
        let result = Pengeluaran::new(CreatePengeluaranRequest {
            keterangan: "  ".to_string(),
            jumlah: Decimal::from(10_000),
            tanggal: None,
        });
        assert!(result.is_err());
    }
}
