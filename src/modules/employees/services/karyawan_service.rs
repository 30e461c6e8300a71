use sqlx::MySqlPool;
use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::employees::models::{
    CreateKaryawanRequest, Karyawan, UpdateKaryawanRequest,
};
use crate::modules::employees::repositories::KaryawanRepository;

/// Service for employee records. There is no hard delete; employees who
/// leave are deactivated so payroll history stays intact.
pub struct KaryawanService {
    repo: KaryawanRepository,
}

impl KaryawanService {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            repo: KaryawanRepository::new(pool),
        }
    }

    pub async fn create(&self, req: CreateKaryawanRequest) -> Result<Karyawan> {
        let karyawan = Karyawan::new(req)?;
        self.repo.create(&karyawan).await?;

        info!(karyawan_id = %karyawan.id, nama = %karyawan.nama, "Employee registered");
        Ok(karyawan)
    }

    pub async fn get(&self, id: &str) -> Result<Karyawan> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Karyawan '{}' tidak ditemukan", id)))
    }

    pub async fn list(
        &self,
        include_inactive: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Karyawan>> {
        self.repo.list(include_inactive, limit, offset).await
    }

    pub async fn update(&self, id: &str, req: UpdateKaryawanRequest) -> Result<Karyawan> {
        let mut karyawan = self.get(id).await?;
        karyawan.apply_update(req)?;
        self.repo.update(&karyawan).await?;
        Ok(karyawan)
    }

    pub async fn deactivate(&self, id: &str) -> Result<Karyawan> {
        let mut karyawan = self.get(id).await?;
        if !karyawan.aktif {
            return Err(AppError::conflict(format!(
                "Karyawan '{}' sudah nonaktif",
                karyawan.nama
            )));
        }

        karyawan.aktif = false;
        karyawan.updated_at = chrono::Utc::now();
        self.repo.update(&karyawan).await?;

        info!(karyawan_id = %karyawan.id, "Employee deactivated");
        Ok(karyawan)
    }
}
