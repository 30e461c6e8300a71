use rust_decimal::Decimal;
use sqlx::{MySql, MySqlPool, Transaction};

use crate::core::{AppError, Result};
use crate::modules::partners::models::{Partner, PartnerKind};

/// Repository for suppliers and customers. The two tables share a schema,
/// so one repository is parameterized by `PartnerKind` rather than keeping
/// two copies of identical SQL.
pub struct PartnerRepository {
    pool: MySqlPool,
    kind: PartnerKind,
}

impl PartnerRepository {
    pub fn suppliers(pool: MySqlPool) -> Self {
        Self {
            pool,
            kind: PartnerKind::Supplier,
        }
    }

    pub fn customers(pool: MySqlPool) -> Self {
        Self {
            pool,
            kind: PartnerKind::Customer,
        }
    }

    pub fn kind(&self) -> PartnerKind {
        self.kind
    }

    pub async fn create(&self, partner: &Partner) -> Result<()> {
        let sql = format!(
            r#"
            INSERT INTO {} (
                id, nama, alamat, telepon, limit_hutang, total_hutang,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            self.kind.table()
        );

        sqlx::query(&sql)
            .bind(&partner.id)
            .bind(&partner.nama)
            .bind(&partner.alamat)
            .bind(&partner.telepon)
            .bind(partner.limit_hutang)
            .bind(partner.total_hutang)
            .bind(partner.created_at)
            .bind(partner.updated_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Partner>> {
        let sql = format!(
            r#"
            SELECT id, nama, alamat, telepon, limit_hutang, total_hutang,
                   created_at, updated_at
            FROM {}
            WHERE id = ?
            "#,
            self.kind.table()
        );

        let partner = sqlx::query_as::<_, Partner>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(partner)
    }

    pub async fn list(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Partner>> {
        let limit = limit.clamp(1, 100);
        let offset = offset.max(0);

        let rows = match search {
            Some(term) if !term.trim().is_empty() => {
                let sql = format!(
                    r#"
                    SELECT id, nama, alamat, telepon, limit_hutang, total_hutang,
                           created_at, updated_at
                    FROM {}
                    WHERE nama LIKE ?
                    ORDER BY nama
                    LIMIT ? OFFSET ?
                    "#,
                    self.kind.table()
                );
                sqlx::query_as::<_, Partner>(&sql)
                    .bind(format!("%{}%", term.trim()))
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await?
            }
            _ => {
                let sql = format!(
                    r#"
                    SELECT id, nama, alamat, telepon, limit_hutang, total_hutang,
                           created_at, updated_at
                    FROM {}
                    ORDER BY nama
                    LIMIT ? OFFSET ?
                    "#,
                    self.kind.table()
                );
                sqlx::query_as::<_, Partner>(&sql)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows)
    }

    pub async fn update(&self, partner: &Partner) -> Result<()> {
        let sql = format!(
            r#"
            UPDATE {}
            SET nama = ?, alamat = ?, telepon = ?, limit_hutang = ?, updated_at = ?
            WHERE id = ?
            "#,
            self.kind.table()
        );

        let result = sqlx::query(&sql)
            .bind(&partner.nama)
            .bind(&partner.alamat)
            .bind(&partner.telepon)
            .bind(partner.limit_hutang)
            .bind(partner.updated_at)
            .bind(&partner.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "{} dengan id '{}' tidak ditemukan",
                self.kind.label(),
                partner.id
            )));
        }

        Ok(())
    }

    /// Delete, refused while the partner still carries outstanding debt.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let partner = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("{} tidak ditemukan", self.kind.label())))?;

        if partner.total_hutang > Decimal::ZERO {
            return Err(AppError::conflict(format!(
                "{} masih punya hutang berjalan sebesar {}",
                self.kind.label(),
                partner.total_hutang
            )));
        }

        let sql = format!("DELETE FROM {} WHERE id = ?", self.kind.table());
        sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        Ok(())
    }

    /// Move the outstanding-debt counter inside an existing transaction.
    /// Positive deltas come from checkout, negative from debt payments.
    pub async fn adjust_hutang_tx(
        tx: &mut Transaction<'_, MySql>,
        kind: PartnerKind,
        id: &str,
        delta: Decimal,
    ) -> Result<()> {
        let sql = format!(
            "UPDATE {} SET total_hutang = total_hutang + ?, updated_at = NOW() WHERE id = ?",
            kind.table()
        );

        let result = sqlx::query(&sql)
            .bind(delta)
            .bind(id)
            .execute(&mut **tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "{} dengan id '{}' tidak ditemukan",
                kind.label(),
                id
            )));
        }

        Ok(())
    }
}
