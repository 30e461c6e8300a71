use sqlx::{MySql, MySqlPool, Transaction};

use crate::core::{AppError, Result};
use crate::modules::catalog::repositories::BarangRepository;
use crate::modules::checkout::models::TransactionStatus;
use crate::modules::debts::models::Debt;
use crate::modules::debts::repositories::DebtRepository;
use crate::modules::partners::repositories::PartnerRepository;
use crate::modules::purchases::models::{Pembelian, PembelianItem};

const HEADER_COLUMNS: &str = r#"
    id, nomor_nota, supplier_id, supplier_nama, tanggal, status,
    subtotal, diskon_nota, total, dibayar, kembalian, sisa_hutang,
    status_pembayaran, jatuh_tempo, created_at, updated_at
"#;

/// Repository for purchase notas and their items
pub struct PembelianRepository {
    pool: MySqlPool,
}

impl PembelianRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, pembelian: &Pembelian) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        Self::insert_header_tx(&mut tx, pembelian).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Header with its items, or `None`.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Pembelian>> {
        let sql = format!("SELECT {} FROM pembelian WHERE id = ?", HEADER_COLUMNS);
        let header = sqlx::query_as::<_, Pembelian>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(mut pembelian) = header else {
            return Ok(None);
        };

        pembelian.items = self.items_for(id).await?;
        Ok(Some(pembelian))
    }

    /// Paginated headers, newest first, optionally filtered by status.
    /// Items are not loaded for lists.
    pub async fn list(
        &self,
        status: Option<TransactionStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Pembelian>> {
        let limit = limit.clamp(1, 100);
        let offset = offset.max(0);

        let rows = match status {
            Some(status) => {
                let sql = format!(
                    "SELECT {} FROM pembelian WHERE status = ? \
                     ORDER BY created_at DESC LIMIT ? OFFSET ?",
                    HEADER_COLUMNS
                );
                sqlx::query_as::<_, Pembelian>(&sql)
                    .bind(status)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM pembelian ORDER BY created_at DESC LIMIT ? OFFSET ?",
                    HEADER_COLUMNS
                );
                sqlx::query_as::<_, Pembelian>(&sql)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows)
    }

    pub async fn items_for(&self, pembelian_id: &str) -> Result<Vec<PembelianItem>> {
        let rows = sqlx::query_as::<_, PembelianItem>(
            r#"
            SELECT id, pembelian_id, barang_id, nama_barang, qty_dus, isi_per_dus,
                   harga_dus, diskon, total
            FROM pembelian_items
            WHERE pembelian_id = ?
            ORDER BY nama_barang
            "#,
        )
        .bind(pembelian_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Insert an item and resync the draft's running subtotal together.
    pub async fn add_item(&self, item: &PembelianItem) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        Self::lock_draft_tx(&mut tx, &item.pembelian_id).await?;
        Self::insert_item_tx(&mut tx, item).await?;
        Self::resync_subtotal_tx(&mut tx, &item.pembelian_id).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn update_item(&self, item: &PembelianItem) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        Self::lock_draft_tx(&mut tx, &item.pembelian_id).await?;

        let result = sqlx::query(
            r#"
            UPDATE pembelian_items
            SET qty_dus = ?, harga_dus = ?, diskon = ?, total = ?
            WHERE id = ? AND pembelian_id = ?
            "#,
        )
        .bind(item.qty_dus)
        .bind(item.harga_dus)
        .bind(item.diskon)
        .bind(item.total)
        .bind(&item.id)
        .bind(&item.pembelian_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Item '{}' tidak ditemukan pada nota ini",
                item.id
            )));
        }

        Self::resync_subtotal_tx(&mut tx, &item.pembelian_id).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn delete_item(&self, pembelian_id: &str, item_id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        Self::lock_draft_tx(&mut tx, pembelian_id).await?;

        let result = sqlx::query("DELETE FROM pembelian_items WHERE id = ? AND pembelian_id = ?")
            .bind(item_id)
            .bind(pembelian_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Item '{}' tidak ditemukan pada nota ini",
                item_id
            )));
        }

        Self::resync_subtotal_tx(&mut tx, pembelian_id).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Finalize a checkout in one transaction: close the header, receive
    /// stock, and record the hutang when payment fell short.
    pub async fn finalize(&self, pembelian: &Pembelian, debt: Option<&Debt>) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        Self::close_header_tx(&mut tx, pembelian).await?;
        Self::apply_side_effects_tx(&mut tx, pembelian, debt).await?;
        tx.commit().await?;
        Ok(())
    }

    /// One-shot nota: header, items, stock, and debt written atomically.
    /// The header arrives already finalized, so there is no draft to close.
    pub async fn create_complete(&self, pembelian: &Pembelian, debt: Option<&Debt>) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        Self::insert_header_tx(&mut tx, pembelian).await?;
        for item in &pembelian.items {
            Self::insert_item_tx(&mut tx, item).await?;
        }
        Self::apply_side_effects_tx(&mut tx, pembelian, debt).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Flip a draft to BATAL. The status guard catches a concurrent
    /// checkout; the caller has already verified the nota exists.
    pub async fn cancel(&self, id: &str) -> Result<()> {
        let result = sqlx::query(
            "UPDATE pembelian SET status = ?, updated_at = NOW() \
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

    async fn insert_header_tx(tx: &mut Transaction<'_, MySql>, p: &Pembelian) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO pembelian (
                id, nomor_nota, supplier_id, supplier_nama, tanggal, status,
                subtotal, diskon_nota, total, dibayar, kembalian, sisa_hutang,
                status_pembayaran, jatuh_tempo, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&p.id)
        .bind(&p.nomor_nota)
        .bind(&p.supplier_id)
        .bind(&p.supplier_nama)
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

    async fn insert_item_tx(tx: &mut Transaction<'_, MySql>, item: &PembelianItem) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO pembelian_items (
                id, pembelian_id, barang_id, nama_barang, qty_dus, isi_per_dus,
                harga_dus, diskon, total
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&item.id)
        .bind(&item.pembelian_id)
        .bind(&item.barang_id)
        .bind(&item.nama_barang)
        .bind(item.qty_dus)
        .bind(item.isi_per_dus)
        .bind(item.harga_dus)
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
    async fn lock_draft_tx(tx: &mut Transaction<'_, MySql>, pembelian_id: &str) -> Result<()> {
        let status: Option<TransactionStatus> =
            sqlx::query_scalar("SELECT status FROM pembelian WHERE id = ? FOR UPDATE")
                .bind(pembelian_id)
                .fetch_optional(&mut **tx)
                .await?;

        draft_guard(status, pembelian_id)
    }

    /// Keep the draft header's subtotal equal to the sum of its items, so
    /// list views show a running total without loading items.
    async fn resync_subtotal_tx(tx: &mut Transaction<'_, MySql>, pembelian_id: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE pembelian
            SET subtotal = (
                    SELECT COALESCE(SUM(total), 0)
                    FROM pembelian_items
                    WHERE pembelian_id = ?
                ),
                updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(pembelian_id)
        .bind(pembelian_id)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Overwrite the draft header with its checkout snapshot. The status
    /// guard rejects a concurrent checkout of the same draft.
    async fn close_header_tx(tx: &mut Transaction<'_, MySql>, pembelian: &Pembelian) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE pembelian
            SET status = ?, subtotal = ?, diskon_nota = ?, total = ?, dibayar = ?,
                kembalian = ?, sisa_hutang = ?, status_pembayaran = ?,
                jatuh_tempo = ?, updated_at = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(pembelian.status)
        .bind(pembelian.subtotal)
        .bind(pembelian.diskon_nota)
        .bind(pembelian.total)
        .bind(pembelian.dibayar)
        .bind(pembelian.kembalian)
        .bind(pembelian.sisa_hutang)
        .bind(pembelian.status_pembayaran)
        .bind(pembelian.jatuh_tempo)
        .bind(pembelian.updated_at)
        .bind(&pembelian.id)
        .bind(TransactionStatus::Keranjang)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::conflict(format!(
                "Nota {} sudah diproses",
                pembelian.nomor_nota
            )));
        }

        Ok(())
    }

    /// Stock movement plus the debt record and counterparty counter when
    /// the payment fell short.
    async fn apply_side_effects_tx(
        tx: &mut Transaction<'_, MySql>,
        pembelian: &Pembelian,
        debt: Option<&Debt>,
    ) -> Result<()> {
        for item in &pembelian.items {
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

fn draft_guard(status: Option<TransactionStatus>, pembelian_id: &str) -> Result<()> {
    match status {
        Some(TransactionStatus::Keranjang) => Ok(()),
        Some(_) => Err(AppError::conflict("Nota sudah tidak berstatus keranjang")),
        None => Err(AppError::not_found(format!(
            "Pembelian dengan id '{}' tidak ditemukan",
            pembelian_id
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_guard_passes_keranjang() {
        assert!(draft_guard(Some(TransactionStatus::Keranjang), "pb-1").is_ok());
    }

    #[test]
    fn test_draft_guard_rejects_closed_nota() {
        let err = draft_guard(Some(TransactionStatus::Selesai), "pb-1").unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let err = draft_guard(Some(TransactionStatus::Batal), "pb-1").unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_draft_guard_rejects_missing_nota() {
        let err = draft_guard(None, "pb-404").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
