use sqlx::MySqlPool;

use crate::core::Result;
use crate::modules::debts::models::DebtKind;
use crate::modules::reports::models::{DateRange, LaporanHutangPiutang, LaporanTransaksi};
use crate::modules::reports::repositories::{LaporanRepository, TransaksiTable};

/// Service for management reports
pub struct LaporanService {
    repo: LaporanRepository,
}

impl LaporanService {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            repo: LaporanRepository::new(pool),
        }
    }

    pub async fn laporan_penjualan(&self, range: DateRange) -> Result<LaporanTransaksi> {
        let ringkasan = self
            .repo
            .transaksi_aggregate(TransaksiTable::Penjualan, range)
            .await?;

        Ok(LaporanTransaksi {
            dari: range.dari,
            sampai: range.sampai,
            ringkasan,
        })
    }

    pub async fn laporan_pembelian(&self, range: DateRange) -> Result<LaporanTransaksi> {
        let ringkasan = self
            .repo
            .transaksi_aggregate(TransaksiTable::Pembelian, range)
            .await?;

        Ok(LaporanTransaksi {
            dari: range.dari,
            sampai: range.sampai,
            ringkasan,
        })
    }

    /// Snapshot of everything still open, both directions.
    pub async fn laporan_hutang_piutang(&self) -> Result<LaporanHutangPiutang> {
        let hutang = self.repo.debt_aggregate(DebtKind::Hutang).await?;
        let piutang = self.repo.debt_aggregate(DebtKind::Piutang).await?;

        Ok(LaporanHutangPiutang { hutang, piutang })
    }
}
