use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::catalog::models::{Barang, CreateBarangRequest, UpdateBarangRequest};
use crate::modules::catalog::repositories::BarangRepository;

/// Service for catalog business logic
pub struct BarangService {
    repo: BarangRepository,
}

impl BarangService {
    pub fn new(repo: BarangRepository) -> Self {
        Self { repo }
    }

    pub async fn create(&self, request: CreateBarangRequest) -> Result<Barang> {
        let barang = Barang::new(request)?;

        if self.repo.find_by_kode(&barang.kode).await?.is_some() {
            return Err(AppError::conflict(format!(
                "Barang dengan kode '{}' sudah ada",
                barang.kode
            )));
        }

        self.repo.create(&barang).await?;
        info!(barang_id = %barang.id, kode = %barang.kode, "Barang created");

        Ok(barang)
    }

    pub async fn get(&self, id: &str) -> Result<Barang> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Barang tidak ditemukan"))
    }

    pub async fn list(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Barang>> {
        self.repo.list(search, limit, offset).await
    }

    pub async fn update(&self, id: &str, request: UpdateBarangRequest) -> Result<Barang> {
        let mut barang = self.get(id).await?;
        barang.apply_update(request)?;
        self.repo.update(&barang).await?;

        Ok(barang)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.repo.delete(id).await?;
        info!(barang_id = %id, "Barang deleted");
        Ok(())
    }
}
