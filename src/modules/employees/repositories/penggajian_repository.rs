use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::employees::models::Penggajian;

/// Repository for payroll records
pub struct PenggajianRepository {
    pool: MySqlPool,
}

impl PenggajianRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Insert, relying on the unique (karyawan_id, periode) index to keep
    /// payroll at one record per employee per month.
    pub async fn create(&self, gaji: &Penggajian) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO penggajian (
                id, karyawan_id, karyawan_nama, periode, gaji_pokok, bonus,
                potongan, total, tanggal_bayar, keterangan, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&gaji.id)
        .bind(&gaji.karyawan_id)
        .bind(&gaji.karyawan_nama)
        .bind(&gaji.periode)
        .bind(gaji.gaji_pokok)
        .bind(gaji.bonus)
        .bind(gaji.potongan)
        .bind(gaji.total)
        .bind(gaji.tanggal_bayar)
        .bind(&gaji.keterangan)
        .bind(gaji.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::conflict(format!(
                        "Gaji {} untuk periode {} sudah dicatat",
                        gaji.karyawan_nama, gaji.periode
                    ));
                }
            }
            AppError::Database(e)
        })?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Penggajian>> {
        let gaji = sqlx::query_as::<_, Penggajian>(
            r#"
            SELECT id, karyawan_id, karyawan_nama, periode, gaji_pokok, bonus,
                   potongan, total, tanggal_bayar, keterangan, created_at
            FROM penggajian
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(gaji)
    }

    /// List payroll records, newest period first, optionally narrowed to
    /// one employee or one period.
    pub async fn list(
        &self,
        karyawan_id: Option<&str>,
        periode: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Penggajian>> {
        let limit = limit.clamp(1, 100);
        let offset = offset.max(0);

        let mut sql = String::from(
            r#"
            SELECT id, karyawan_id, karyawan_nama, periode, gaji_pokok, bonus,
                   potongan, total, tanggal_bayar, keterangan, created_at
            FROM penggajian
            WHERE 1 = 1
            "#,
        );
        if karyawan_id.is_some() {
            sql.push_str(" AND karyawan_id = ?");
        }
        if periode.is_some() {
            sql.push_str(" AND periode = ?");
        }
        sql.push_str(" ORDER BY periode DESC, karyawan_nama LIMIT ? OFFSET ?");

        let mut query = sqlx::query_as::<_, Penggajian>(&sql);
        if let Some(karyawan_id) = karyawan_id {
            query = query.bind(karyawan_id);
        }
        if let Some(periode) = periode {
            query = query.bind(periode);
        }

        let rows = query
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}
