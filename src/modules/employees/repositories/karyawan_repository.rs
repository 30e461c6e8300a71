use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::employees::models::Karyawan;

/// Repository for employee records
pub struct KaryawanRepository {
    pool: MySqlPool,
}

impl KaryawanRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, karyawan: &Karyawan) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO karyawan (
                id, nama, jabatan, telepon, gaji_pokok, aktif, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&karyawan.id)
        .bind(&karyawan.nama)
        .bind(&karyawan.jabatan)
        .bind(&karyawan.telepon)
        .bind(karyawan.gaji_pokok)
        .bind(karyawan.aktif)
        .bind(karyawan.created_at)
        .bind(karyawan.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Karyawan>> {
        let karyawan = sqlx::query_as::<_, Karyawan>(
            r#"
            SELECT id, nama, jabatan, telepon, gaji_pokok, aktif, created_at, updated_at
            FROM karyawan
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(karyawan)
    }

    /// Paginated list; by default only active employees, `include_inactive`
    /// widens it for the archive view.
    pub async fn list(
        &self,
        include_inactive: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Karyawan>> {
        let limit = limit.clamp(1, 100);
        let offset = offset.max(0);

        let rows = if include_inactive {
            sqlx::query_as::<_, Karyawan>(
                r#"
                SELECT id, nama, jabatan, telepon, gaji_pokok, aktif, created_at, updated_at
                FROM karyawan
                ORDER BY nama
                LIMIT ? OFFSET ?
                "#,
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, Karyawan>(
                r#"
                SELECT id, nama, jabatan, telepon, gaji_pokok, aktif, created_at, updated_at
                FROM karyawan
                WHERE aktif = TRUE
                ORDER BY nama
                LIMIT ? OFFSET ?
                "#,
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?
        };

        Ok(rows)
    }

    pub async fn update(&self, karyawan: &Karyawan) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE karyawan
            SET nama = ?, jabatan = ?, telepon = ?, gaji_pokok = ?, aktif = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&karyawan.nama)
        .bind(&karyawan.jabatan)
        .bind(&karyawan.telepon)
        .bind(karyawan.gaji_pokok)
        .bind(karyawan.aktif)
        .bind(karyawan.updated_at)
        .bind(&karyawan.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Karyawan dengan id '{}' tidak ditemukan",
                karyawan.id
            )));
        }

        Ok(())
    }
}
