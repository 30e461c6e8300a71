use chrono::NaiveDate;
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::expenses::models::Pengeluaran;

/// Repository for operational expenses
pub struct PengeluaranRepository {
    pool: MySqlPool,
}

impl PengeluaranRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, pengeluaran: &Pengeluaran) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO pengeluaran (id, keterangan, jumlah, tanggal, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&pengeluaran.id)
        .bind(&pengeluaran.keterangan)
        .bind(pengeluaran.jumlah)
        .bind(pengeluaran.tanggal)
        .bind(pengeluaran.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// List newest first, optionally bounded to a date range.
    pub async fn list(
        &self,
        dari: Option<NaiveDate>,
        sampai: Option<NaiveDate>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Pengeluaran>> {
        let limit = limit.clamp(1, 100);
        let offset = offset.max(0);

        let mut sql = String::from(
            r#"
            SELECT id, keterangan, jumlah, tanggal, created_at
            FROM pengeluaran
            WHERE 1 = 1
            "#,
        );
        if dari.is_some() {
            sql.push_str(" AND tanggal >= ?");
        }
        if sampai.is_some() {
            sql.push_str(" AND tanggal <= ?");
        }
        sql.push_str(" ORDER BY tanggal DESC, created_at DESC LIMIT ? OFFSET ?");

        let mut query = sqlx::query_as::<_, Pengeluaran>(&sql);
        if let Some(dari) = dari {
            query = query.bind(dari);
        }
        if let Some(sampai) = sampai {
            query = query.bind(sampai);
        }

        let rows = query
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM pengeluaran WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Pengeluaran dengan id '{}' tidak ditemukan",
                id
            )));
        }

        Ok(())
    }
}
