use chrono::Utc;
use sqlx::MySqlPool;
use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::employees::models::{CreatePenggajianRequest, Penggajian};
use crate::modules::employees::repositories::{KaryawanRepository, PenggajianRepository};

/// Service for payroll. The total is derived here, never taken from the
/// request, and inactive employees cannot be paid.
pub struct PenggajianService {
    repo: PenggajianRepository,
    karyawan_repo: KaryawanRepository,
}

impl PenggajianService {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            repo: PenggajianRepository::new(pool.clone()),
            karyawan_repo: KaryawanRepository::new(pool),
        }
    }

    pub async fn create(&self, req: CreatePenggajianRequest) -> Result<Penggajian> {
        let karyawan = self
            .karyawan_repo
            .find_by_id(&req.karyawan_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Karyawan '{}' tidak ditemukan", req.karyawan_id))
            })?;

        if !karyawan.aktif {
            return Err(AppError::conflict(format!(
                "Karyawan '{}' sudah nonaktif",
                karyawan.nama
            )));
        }

        let gaji = Penggajian::new(
            karyawan.id.clone(),
            karyawan.nama.clone(),
            req.periode,
            req.gaji_pokok.unwrap_or(karyawan.gaji_pokok),
            req.bonus,
            req.potongan,
            req.tanggal_bayar.unwrap_or_else(|| Utc::now().date_naive()),
            req.keterangan,
        )?;

        self.repo.create(&gaji).await?;

        info!(
            penggajian_id = %gaji.id,
            karyawan = %gaji.karyawan_nama,
            periode = %gaji.periode,
            total = %gaji.total,
            "Payroll recorded"
        );
        Ok(gaji)
    }

    pub async fn get(&self, id: &str) -> Result<Penggajian> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Penggajian '{}' tidak ditemukan", id)))
    }

    pub async fn list(
        &self,
        karyawan_id: Option<&str>,
        periode: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Penggajian>> {
        self.repo.list(karyawan_id, periode, limit, offset).await
    }
}
