use sqlx::MySqlPool;

use crate::core::Result;
use crate::modules::checkout::models::TransactionStatus;
use crate::modules::debts::models::{DebtKind, DebtStatus};
use crate::modules::reports::models::{DateRange, DebtAggregate, TransaksiAggregate};

/// Read-only aggregate queries over the transaction and debt tables.
/// The pembelian and penjualan headers share the aggregate columns, so
/// one query text serves both via the table name.
pub struct LaporanRepository {
    pool: MySqlPool,
}

#[derive(Debug, Clone, Copy)]
pub enum TransaksiTable {
    Pembelian,
    Penjualan,
}

impl TransaksiTable {
    fn name(&self) -> &'static str {
        match self {
            Self::Pembelian => "pembelian",
            Self::Penjualan => "penjualan",
        }
    }
}

impl LaporanRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn transaksi_aggregate(
        &self,
        table: TransaksiTable,
        range: DateRange,
    ) -> Result<TransaksiAggregate> {
        let sql = format!(
            r#"
            SELECT
                COUNT(*)                            AS jumlah_nota,
                COALESCE(SUM(subtotal), 0)          AS bruto,
                COALESCE(SUM(diskon_nota), 0)       AS total_diskon_nota,
                COALESCE(SUM(total), 0)             AS netto,
                COALESCE(SUM(total - sisa_hutang), 0) AS terbayar,
                COALESCE(SUM(sisa_hutang), 0)       AS sisa_hutang
            FROM {}
            WHERE status = ? AND tanggal BETWEEN ? AND ?
            "#,
            table.name()
        );

        let aggregate = sqlx::query_as::<_, TransaksiAggregate>(&sql)
            .bind(TransactionStatus::Selesai)
            .bind(range.dari)
            .bind(range.sampai)
            .fetch_one(&self.pool)
            .await?;

        Ok(aggregate)
    }

    pub async fn debt_aggregate(&self, kind: DebtKind) -> Result<DebtAggregate> {
        let aggregate = sqlx::query_as::<_, DebtAggregate>(
            r#"
            SELECT
                COUNT(*)                    AS jumlah,
                COALESCE(SUM(total), 0)     AS total,
                COALESCE(SUM(dibayar), 0)   AS dibayar,
                COALESCE(SUM(total - dibayar), 0) AS sisa,
                COUNT(CASE WHEN jatuh_tempo < CURDATE() THEN 1 END) AS jatuh_tempo_terlewat
            FROM debts
            WHERE kind = ? AND status = ?
            "#,
        )
        .bind(kind.as_str())
        .bind(DebtStatus::BelumLunas.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(aggregate)
    }
}
