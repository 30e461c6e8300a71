use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::money;
use crate::core::{AppError, Result};

/// A monthly payroll record. `total` is always derived server-side as
/// `gaji_pokok + bonus - potongan`; one record per employee per period.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Penggajian {
    pub id: String,
    pub karyawan_id: String,
    pub karyawan_nama: String,
    /// Payroll month, "YYYY-MM"
    pub periode: String,
    pub gaji_pokok: Decimal,
    pub bonus: Decimal,
    pub potongan: Decimal,
    pub total: Decimal,
    pub tanggal_bayar: NaiveDate,
    pub keterangan: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePenggajianRequest {
    pub karyawan_id: String,
    pub periode: String,
    /// Defaults to the employee's registered base salary
    pub gaji_pokok: Option<Decimal>,
    #[serde(default)]
    pub bonus: Decimal,
    #[serde(default)]
    pub potongan: Decimal,
    pub tanggal_bayar: Option<NaiveDate>,
    pub keterangan: Option<String>,
}

impl Penggajian {
    pub fn new(
        karyawan_id: String,
        karyawan_nama: String,
        periode: String,
        gaji_pokok: Decimal,
        bonus: Decimal,
        potongan: Decimal,
        tanggal_bayar: NaiveDate,
        keterangan: Option<String>,
    ) -> Result<Self> {
        validate_periode(&periode)?;
        money::validate_rupiah(gaji_pokok).map_err(AppError::validation)?;
        money::validate_rupiah(bonus).map_err(AppError::validation)?;
        money::validate_rupiah(potongan).map_err(AppError::validation)?;

        let total = gaji_pokok + bonus - potongan;
        if total < Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Potongan ({}) melebihi gaji dan bonus ({})",
                potongan,
                gaji_pokok + bonus
            )));
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            karyawan_id,
            karyawan_nama,
            periode,
            gaji_pokok,
            bonus,
            potongan,
            total,
            tanggal_bayar,
            keterangan,
            created_at: Utc::now(),
        })
    }
}

/// Periods are calendar months, "YYYY-MM".
pub fn validate_periode(periode: &str) -> Result<()> {
    let valid = NaiveDate::parse_from_str(&format!("{}-01", periode), "%Y-%m-%d").is_ok()
        && periode.len() == 7;

    if !valid {
        return Err(AppError::validation(format!(
            "Periode '{}' tidak valid, gunakan format YYYY-MM",
            periode
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(v: i64) -> Decimal {
        Decimal::from(v)
    }

    fn build(gaji: i64, bonus: i64, potongan: i64) -> Result<Penggajian> {
        Penggajian::new(
            "kry-1".to_string(),
            "Budi".to_string(),
            "2026-08".to_string(),
            dec(gaji),
            dec(bonus),
            dec(potongan),
            NaiveDate::from_ymd_opt(2026, 8, 28).unwrap(),
            None,
        )
    }

    #[test]
    fn test_total_is_derived() {
        let gaji = build(2_500_000, 300_000, 50_000).unwrap();
        assert_eq!(gaji.total, dec(2_750_000));
    }

    #[test]
    fn test_deduction_above_earnings_rejected() {
        assert!(build(2_500_000, 0, 2_500_001).is_err());
    }

    #[test]
    fn test_zero_total_allowed() {
        let gaji = build(2_500_000, 0, 2_500_000).unwrap();
        assert_eq!(gaji.total, Decimal::ZERO);
    }

    #[test]
    fn test_periode_format() {
        assert!(validate_periode("2026-08").is_ok());
        assert!(validate_periode("2026-13").is_err());
        assert!(validate_periode("08-2026").is_err());
        assert!(validate_periode("2026-8").is_err());
    }
}
