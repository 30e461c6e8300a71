use sqlx::{MySql, MySqlPool, Transaction};

use crate::core::{AppError, Result};
use crate::modules::catalog::models::Barang;

/// Repository for barang (goods) database operations
pub struct BarangRepository {
    pool: MySqlPool,
}

impl BarangRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, barang: &Barang) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO barang (
                id, kode, nama, isi_per_dus, harga_beli, harga_jual_dus,
                harga_jual_eceran, stok, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&barang.id)
        .bind(&barang.kode)
        .bind(&barang.nama)
        .bind(barang.isi_per_dus)
        .bind(barang.harga_beli)
        .bind(barang.harga_jual_dus)
        .bind(barang.harga_jual_eceran)
        .bind(barang.stok)
        .bind(barang.created_at)
        .bind(barang.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::conflict(format!(
                        "Barang dengan kode '{}' sudah ada",
                        barang.kode
                    ));
                }
            }
            AppError::Database(e)
        })?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Barang>> {
        let barang = sqlx::query_as::<_, Barang>(
            r#"
            SELECT id, kode, nama, isi_per_dus, harga_beli, harga_jual_dus,
                   harga_jual_eceran, stok, created_at, updated_at
            FROM barang
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(barang)
    }

    pub async fn find_by_kode(&self, kode: &str) -> Result<Option<Barang>> {
        let barang = sqlx::query_as::<_, Barang>(
            r#"
            SELECT id, kode, nama, isi_per_dus, harga_beli, harga_jual_dus,
                   harga_jual_eceran, stok, created_at, updated_at
            FROM barang
            WHERE kode = ?
            "#,
        )
        .bind(kode)
        .fetch_optional(&self.pool)
        .await?;

        Ok(barang)
    }

    /// Paginated list, optionally filtered by a name/code search term.
    pub async fn list(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Barang>> {
        let limit = limit.clamp(1, 100);
        let offset = offset.max(0);

        let rows = match search {
            Some(term) if !term.trim().is_empty() => {
                let pattern = format!("%{}%", term.trim());
                sqlx::query_as::<_, Barang>(
                    r#"
                    SELECT id, kode, nama, isi_per_dus, harga_beli, harga_jual_dus,
                           harga_jual_eceran, stok, created_at, updated_at
                    FROM barang
                    WHERE nama LIKE ? OR kode LIKE ?
                    ORDER BY nama
                    LIMIT ? OFFSET ?
                    "#,
                )
                .bind(&pattern)
                .bind(&pattern)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            _ => {
                sqlx::query_as::<_, Barang>(
                    r#"
                    SELECT id, kode, nama, isi_per_dus, harga_beli, harga_jual_dus,
                           harga_jual_eceran, stok, created_at, updated_at
                    FROM barang
                    ORDER BY nama
                    LIMIT ? OFFSET ?
                    "#,
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows)
    }

    pub async fn update(&self, barang: &Barang) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE barang
            SET nama = ?, isi_per_dus = ?, harga_beli = ?, harga_jual_dus = ?,
                harga_jual_eceran = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&barang.nama)
        .bind(barang.isi_per_dus)
        .bind(barang.harga_beli)
        .bind(barang.harga_jual_dus)
        .bind(barang.harga_jual_eceran)
        .bind(barang.updated_at)
        .bind(&barang.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Barang dengan id '{}' tidak ditemukan",
                barang.id
            )));
        }

        Ok(())
    }

    /// Delete a barang. Refused while transaction items still reference it,
    /// so historical receipts stay resolvable.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let (referenced,): (i64,) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM pembelian_items WHERE barang_id = ?)
              + (SELECT COUNT(*) FROM penjualan_items WHERE barang_id = ?)
            "#,
        )
        .bind(id)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        if referenced > 0 {
            return Err(AppError::conflict(
                "Barang sudah dipakai dalam transaksi dan tidak bisa dihapus",
            ));
        }

        let result = sqlx::query("DELETE FROM barang WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Barang dengan id '{}' tidak ditemukan",
                id
            )));
        }

        Ok(())
    }

    /// Adjust stock (in pieces) inside an existing transaction. Negative
    /// deltas are refused when they would take stock below zero.
    pub async fn adjust_stok_tx(
        tx: &mut Transaction<'_, MySql>,
        barang_id: &str,
        delta: i64,
    ) -> Result<()> {
        if delta < 0 {
            let result = sqlx::query(
                "UPDATE barang SET stok = stok + ?, updated_at = NOW() WHERE id = ? AND stok >= ?",
            )
            .bind(delta)
            .bind(barang_id)
            .bind(-delta)
            .execute(&mut **tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(AppError::conflict(format!(
                    "Stok barang '{}' tidak mencukupi",
                    barang_id
                )));
            }
        } else {
            let result = sqlx::query(
                "UPDATE barang SET stok = stok + ?, updated_at = NOW() WHERE id = ?",
            )
            .bind(delta)
            .bind(barang_id)
            .execute(&mut **tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(AppError::not_found(format!(
                    "Barang dengan id '{}' tidak ditemukan",
                    barang_id
                )));
            }
        }

        Ok(())
    }
}
