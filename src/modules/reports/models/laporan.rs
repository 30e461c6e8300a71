use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use crate::core::{AppError, Result};

/// Longest reporting window, one leap year.
pub const MAX_RANGE_HARI: i64 = 366;

/// Validated inclusive date range for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub dari: NaiveDate,
    pub sampai: NaiveDate,
}

impl DateRange {
    pub fn new(dari: NaiveDate, sampai: NaiveDate) -> Result<Self> {
        if dari > sampai {
            return Err(AppError::validation(format!(
                "Tanggal awal ({}) harus sebelum tanggal akhir ({})",
                dari, sampai
            )));
        }

        let hari = (sampai - dari).num_days();
        if hari > MAX_RANGE_HARI {
            return Err(AppError::validation(format!(
                "Rentang laporan maksimal {} hari, diminta {} hari",
                MAX_RANGE_HARI, hari
            )));
        }

        Ok(Self { dari, sampai })
    }
}

/// Aggregates over finalized notas in a date range. Cancelled notas and
/// open drafts never count.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TransaksiAggregate {
    pub jumlah_nota: i64,
    /// Sum of subtotals (net of per-item discounts)
    pub bruto: Decimal,
    pub total_diskon_nota: Decimal,
    /// Sum of amounts due
    pub netto: Decimal,
    /// Settled portion, `netto - sisa_hutang`
    pub terbayar: Decimal,
    pub sisa_hutang: Decimal,
}

/// A transaction report: the window plus its aggregates.
#[derive(Debug, Clone, Serialize)]
pub struct LaporanTransaksi {
    pub dari: NaiveDate,
    pub sampai: NaiveDate,
    #[serde(flatten)]
    pub ringkasan: TransaksiAggregate,
}

/// Outstanding-debt aggregates for one direction.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DebtAggregate {
    pub jumlah: i64,
    pub total: Decimal,
    pub dibayar: Decimal,
    pub sisa: Decimal,
    /// Unsettled records already past their due date
    pub jatuh_tempo_terlewat: i64,
}

/// Company-wide debt position: what we owe suppliers and what customers
/// owe us.
#[derive(Debug, Clone, Serialize)]
pub struct LaporanHutangPiutang {
    pub hutang: DebtAggregate,
    pub piutang: DebtAggregate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_single_day_range_allowed() {
        let range = DateRange::new(date(2026, 8, 23), date(2026, 8, 23)).unwrap();
        assert_eq!(range.dari, range.sampai);
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert!(DateRange::new(date(2026, 8, 23), date(2026, 8, 22)).is_err());
    }

    #[test]
    fn test_range_capped_at_one_year() {
        assert!(DateRange::new(date(2025, 1, 1), date(2026, 1, 2)).is_ok());
        assert!(DateRange::new(date(2025, 1, 1), date(2026, 1, 3)).is_err());
    }
}
