use rust_decimal::Decimal;
use sqlx::{MySql, MySqlPool, Transaction};

use crate::core::{AppError, Result};
use crate::modules::debts::models::{Debt, DebtKind, DebtPayment, DebtStatus};
use crate::modules::partners::repositories::partner_repository::PartnerRepository;

/// Repository for hutang/piutang records and their payment history
pub struct DebtRepository {
    pool: MySqlPool,
}

impl DebtRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Insert a debt record inside an existing transaction. Called from
    /// checkout, which owns the surrounding transaction.
    pub async fn create_tx(tx: &mut Transaction<'_, MySql>, debt: &Debt) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO debts (
                id, kind, transaksi_id, nomor_nota, partner_id, partner_nama,
                total, dibayar, status, jatuh_tempo, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&debt.id)
        .bind(debt.kind.as_str())
        .bind(&debt.transaksi_id)
        .bind(&debt.nomor_nota)
        .bind(&debt.partner_id)
        .bind(&debt.partner_nama)
        .bind(debt.total)
        .bind(debt.dibayar)
        .bind(debt.status.as_str())
        .bind(debt.jatuh_tempo)
        .bind(debt.created_at)
        .bind(debt.updated_at)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Debt>> {
        let debt = sqlx::query_as::<_, Debt>(
            r#"
            SELECT id, kind, transaksi_id, nomor_nota, partner_id, partner_nama,
                   total, dibayar, status, jatuh_tempo, created_at, updated_at
            FROM debts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(debt)
    }

    /// List debts of one kind, optionally filtered by status, newest first.
    pub async fn list(
        &self,
        kind: DebtKind,
        status: Option<DebtStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Debt>> {
        let limit = limit.clamp(1, 100);
        let offset = offset.max(0);

        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, Debt>(
                    r#"
                    SELECT id, kind, transaksi_id, nomor_nota, partner_id, partner_nama,
                           total, dibayar, status, jatuh_tempo, created_at, updated_at
                    FROM debts
                    WHERE kind = ? AND status = ?
                    ORDER BY created_at DESC
                    LIMIT ? OFFSET ?
                    "#,
                )
                .bind(kind.as_str())
                .bind(status.as_str())
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Debt>(
                    r#"
                    SELECT id, kind, transaksi_id, nomor_nota, partner_id, partner_nama,
                           total, dibayar, status, jatuh_tempo, created_at, updated_at
                    FROM debts
                    WHERE kind = ?
                    ORDER BY created_at DESC
                    LIMIT ? OFFSET ?
                    "#,
                )
                .bind(kind.as_str())
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows)
    }

    pub async fn payments_for(&self, debt_id: &str) -> Result<Vec<DebtPayment>> {
        let rows = sqlx::query_as::<_, DebtPayment>(
            r#"
            SELECT id, debt_id, jumlah, tanggal, keterangan, created_at
            FROM debt_payments
            WHERE debt_id = ?
            ORDER BY created_at
            "#,
        )
        .bind(debt_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Persist one repayment atomically: payment row, updated debt totals,
    /// and the counterparty's outstanding counter move together or not at
    /// all. The header update is guarded on the balance the caller read
    /// (`dibayar_sebelum`), so two payments racing from the same snapshot
    /// cannot both land; the loser gets a conflict and retries.
    pub async fn save_payment(
        &self,
        debt: &Debt,
        dibayar_sebelum: Decimal,
        payment: &DebtPayment,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO debt_payments (id, debt_id, jumlah, tanggal, keterangan, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.debt_id)
        .bind(payment.jumlah)
        .bind(payment.tanggal)
        .bind(&payment.keterangan)
        .bind(payment.created_at)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query(
            r#"
            UPDATE debts
            SET dibayar = ?, status = ?, updated_at = ?
            WHERE id = ? AND dibayar = ?
            "#,
        )
        .bind(debt.dibayar)
        .bind(debt.status.as_str())
        .bind(debt.updated_at)
        .bind(&debt.id)
        .bind(dibayar_sebelum)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::conflict(
                "Hutang berubah saat diproses, ulangi pembayaran",
            ));
        }

        PartnerRepository::adjust_hutang_tx(
            &mut tx,
            debt.kind.partner_kind(),
            &debt.partner_id,
            -payment.jumlah,
        )
        .await?;

        tx.commit().await?;

        Ok(())
    }

    pub async fn update_jatuh_tempo(&self, debt: &Debt) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE debts
            SET jatuh_tempo = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(debt.jatuh_tempo)
        .bind(debt.updated_at)
        .bind(&debt.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Hutang dengan id '{}' tidak ditemukan",
                debt.id
            )));
        }

        Ok(())
    }
}
