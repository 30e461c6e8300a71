use sqlx::{MySql, MySqlPool, Transaction};

use crate::core::{AppError, Result};
use crate::modules::catalog::repositories::BarangRepository;
use crate::modules::checkout::models::TransactionStatus;
use crate::modules::debts::models::Debt;
use crate::modules::debts::repositories::DebtRepository;
use crate::modules::partners::repositories::PartnerRepository;
use crate::modules::sales::models::{Penjualan, PenjualanItem};

const HEADER_COLUMNS: &str = r#"
    id, nomor_nota, customer_id, customer_nama, tanggal, status,
    subtotal, diskon_nota, total, dibayar, kembalian, sisa_hutang,
    status_pembayaran, jatuh_tempo, created_at, updated_at
"#;

/// Repository for sales notas and their items
pub struct PenjualanRepository {
    pool: MySqlPool,
}

impl PenjualanRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, penjualan: &Penjualan) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        Self::insert_header_tx(&mut tx, penjualan).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Header with its items, or `None`.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Penjualan>> {
        let sql = format!("SELECT {} FROM penjualan WHERE id = ?", HEADER_COLUMNS);
        let header = sqlx::query_as::<_, Penjualan>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(mut penjualan) = header else {
            return Ok(None);
        };

        penjualan.items = self.items_for(id).await?;
        Ok(Some(penjualan))
    }

    /// Paginated headers, newest first, optionally filtered by status.
    pub async fn list(
        &self,
        status: Option<TransactionStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Penjualan>> {
        let limit = limit.clamp(1, 100);
        let offset = offset.max(0);

        let rows = match status {
            Some(status) => {
                let sql = format!(
                    "SELECT {} FROM penjualan WHERE status = ? \
                     ORDER BY created_at DESC LIMIT ? OFFSET ?",
                    HEADER_COLUMNS
                );
                sqlx::query_as::<_, Penjualan>(&sql)
                    .bind(status)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM penjualan ORDER BY created_at DESC LIMIT ? OFFSET ?",
                    HEADER_COLUMNS
                );
                sqlx::query_as::<_, Penjualan>(&sql)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows)
    }

    pub async fn items_for(&self, penjualan_id: &str) -> Result<Vec<PenjualanItem>> {
        let rows = sqlx::query_as::<_, PenjualanItem>(
            r#"
            SELECT id, penjualan_id, barang_id, nama_barang, qty_dus, qty_eceran,
                   isi_per_dus, harga_dus, harga_eceran, diskon, total
            FROM penjualan_items
            WHERE penjualan_id = ?
            ORDER BY nama_barang
            "#,
        )
        .bind(penjualan_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Insert an item and resync the draft's running subtotal together.
    pub async fn add_item(&self, item: &PenjualanItem) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        Self::lock_draft_tx(&mut tx, &item.penjualan_id).await?;
        Self::insert_item_tx(&mut tx, item).await?;
        Self::resync_subtotal_tx(&mut tx, &item.penjualan_id).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn update_item(&self, item: &PenjualanItem) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        Self::lock_draft_tx(&mut tx, &item.penjualan_id).await?;

        let result = sqlx::query(
            r#"
            UPDATE penjualan_items
            SET qty_dus = ?, qty_eceran = ?, diskon = ?, total = ?
            WHERE id = ? AND penjualan_id = ?
            "#,
        )
        .bind(item.qty_dus)
        .bind(item.qty_eceran)
        .bind(item.diskon)
        .bind(item.total)
        .bind(&item.id)
        .bind(&item.penjualan_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Item '{}' tidak ditemukan pada nota ini",
                item.id
            )));
        }

        Self::resync_subtotal_tx(&mut tx, &item.penjualan_id).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn delete_item(&self, penjualan_id: &str, item_id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        Self::lock_draft_tx(&mut tx, penjualan_id).await?;

        let result = sqlx::query("DELETE FROM penjualan_items WHERE id = ? AND penjualan_id = ?")
            .bind(item_id)
            .bind(penjualan_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Item '{}' tidak ditemukan pada nota ini",
                item_id
            )));
        }

        Self::resync_subtotal_tx(&mut tx, penjualan_id).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Finalize a checkout in one transaction: close the header, take the
    /// stock out, and record the piutang when payment fell short. Stock
    /// sufficiency is enforced row by row; any shortage rolls the whole
    /// nota back.
    pub async fn finalize(&self, penjualan: &Penjualan, debt: Option<&Debt>) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        Self::close_header_tx(&mut tx, penjualan).await?;
        Self::apply_side_effects_tx(&mut tx, penjualan, debt).await?;
        tx.commit().await?;
        Ok(())
    }

    /// One-shot nota: header, items, stock, and debt written atomically.
    pub async fn create_complete(&self, penjualan: &Penjualan, debt: Option<&Debt>) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        Self::insert_header_tx(&mut tx, penjualan).await?;
        for item in &penjualan.items {
            Self::insert_item_tx(&mut tx, item).await?;
        }
        Self::apply_side_effects_tx(&mut tx, penjualan, debt).await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn cancel(&self, id: &str) -> Result<()> {
        let result = sqlx::query(
            "UPDATE penjualan SET status = ?, updated_at = NOW() \
             WHERE id = ? AND status = ?",
        )
        .bind(TransactionStatus::Batal)
        .bind(id)
        .bind(TransactionStatus::Keranjang)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::conflict(
                "Nota sudah tidak berstatus keranjang",
            ));
        }

        Ok(())
    }

    async fn insert_header_tx(tx: &mut Transaction<'_, MySql>, p: &Penjualan) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO penjualan (
                id, nomor_nota, customer_id, customer_nama, tanggal, status,
                subtotal, diskon_nota, total, dibayar, kembalian, sisa_hutang,
                status_pembayaran, jatuh_tempo, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&p.id)
        .bind(&p.nomor_nota)
        .bind(&p.customer_id)
        .bind(&p.customer_nama)
        .bind(p.tanggal)
        .bind(p.status)
        .bind(p.subtotal)
        .bind(p.diskon_nota)
        .bind(p.total)
        .bind(p.dibayar)
        .bind(p.kembalian)
        .bind(p.sisa_hutang)
        .bind(p.status_pembayaran)
        .bind(p.jatuh_tempo)
        .bind(p.created_at)
        .bind(p.updated_at)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    async fn insert_item_tx(tx: &mut Transaction<'_, MySql>, item: &PenjualanItem) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO penjualan_items (
                id, penjualan_id, barang_id, nama_barang, qty_dus, qty_eceran,
                isi_per_dus, harga_dus, harga_eceran, diskon, total
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&item.id)
        .bind(&item.penjualan_id)
        .bind(&item.barang_id)
        .bind(&item.nama_barang)
        .bind(item.qty_dus)
        .bind(item.qty_eceran)
        .bind(item.isi_per_dus)
        .bind(item.harga_dus)
        .bind(item.harga_eceran)
        .bind(item.diskon)
        .bind(item.total)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Lock the header row for the rest of the transaction and require it
    /// to still be a draft. Item edits racing a checkout of the same nota
    /// serialize on this row lock; whichever commits second sees the
    /// other's status.
    async fn lock_draft_tx(tx: &mut Transaction<'_, MySql>, penjualan_id: &str) -> Result<()> {
        let status: Option<TransactionStatus> =
            sqlx::query_scalar("SELECT status FROM penjualan WHERE id = ? FOR UPDATE")
                .bind(penjualan_id)
                .fetch_optional(&mut **tx)
                .await?;

        draft_guard(status, penjualan_id)
    }

    /// Keep the draft header's subtotal equal to the sum of its items.
    async fn resync_subtotal_tx(tx: &mut Transaction<'_, MySql>, penjualan_id: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE penjualan
            SET subtotal = (
                    SELECT COALESCE(SUM(total), 0)
                    FROM penjualan_items
                    WHERE penjualan_id = ?
                ),
                updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(penjualan_id)
        .bind(penjualan_id)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Overwrite the draft header with its checkout snapshot. The status
    /// guard rejects a concurrent checkout of the same draft.
    async fn close_header_tx(tx: &mut Transaction<'_, MySql>, penjualan: &Penjualan) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE penjualan
            SET status = ?, subtotal = ?, diskon_nota = ?, total = ?, dibayar = ?,
                kembalian = ?, sisa_hutang = ?, status_pembayaran = ?,
                jatuh_tempo = ?, updated_at = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(penjualan.status)
        .bind(penjualan.subtotal)
        .bind(penjualan.diskon_nota)
        .bind(penjualan.total)
        .bind(penjualan.dibayar)
        .bind(penjualan.kembalian)
        .bind(penjualan.sisa_hutang)
        .bind(penjualan.status_pembayaran)
        .bind(penjualan.jatuh_tempo)
        .bind(penjualan.updated_at)
        .bind(&penjualan.id)
        .bind(TransactionStatus::Keranjang)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::conflict(format!(
                "Nota {} sudah diproses",
                penjualan.nomor_nota
            )));
        }

        Ok(())
    }

    async fn apply_side_effects_tx(
        tx: &mut Transaction<'_, MySql>,
        penjualan: &Penjualan,
        debt: Option<&Debt>,
    ) -> Result<()> {
        for item in &penjualan.items {
            BarangRepository::adjust_stok_tx(tx, &item.barang_id, item.stok_delta()).await?;
        }

        if let Some(debt) = debt {
            DebtRepository::create_tx(tx, debt).await?;
            PartnerRepository::adjust_hutang_tx(
                tx,
                debt.kind.partner_kind(),
                &debt.partner_id,
                debt.total,
            )
            .await?;
        }

        Ok(())
    }
}

fn draft_guard(status: Option<TransactionStatus>, penjualan_id: &str) -> Result<()> {
    match status {
        Some(TransactionStatus::Keranjang) => Ok(()),
        Some(_) => Err(AppError::conflict("Nota sudah tidak berstatus keranjang")),
        None => Err(AppError::not_found(format!(
            "Penjualan dengan id '{}' tidak ditemukan",
            penjualan_id
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_guard_passes_keranjang() {
        assert!(draft_guard(Some(TransactionStatus::Keranjang), "pj-1").is_ok());
    }

    #[test]
    fn test_draft_guard_rejects_closed_nota() {
        let err = draft_guard(Some(TransactionStatus::Selesai), "pj-1").unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let err = draft_guard(Some(TransactionStatus::Batal), "pj-1").unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_draft_guard_rejects_missing_nota() {
        let err = draft_guard(None, "pj-404").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
