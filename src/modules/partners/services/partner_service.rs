use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::partners::models::{CreatePartnerRequest, Partner, UpdatePartnerRequest};
use crate::modules::partners::repositories::PartnerRepository;

/// CRUD orchestration shared by the supplier and customer surfaces.
pub struct PartnerService {
    repo: PartnerRepository,
}

impl PartnerService {
    pub fn new(repo: PartnerRepository) -> Self {
        Self { repo }
    }

    pub async fn create(&self, request: CreatePartnerRequest) -> Result<Partner> {
        let partner = Partner::new(request)?;
        self.repo.create(&partner).await?;

        info!(
            partner_id = %partner.id,
            kind = %self.repo.kind().label(),
            "Partner created"
        );

        Ok(partner)
    }

    pub async fn get(&self, id: &str) -> Result<Partner> {
        self.repo.find_by_id(id).await?.ok_or_else(|| {
            AppError::not_found(format!("{} tidak ditemukan", self.repo.kind().label()))
        })
    }

    pub async fn list(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Partner>> {
        self.repo.list(search, limit, offset).await
    }

    pub async fn update(&self, id: &str, request: UpdatePartnerRequest) -> Result<Partner> {
        let mut partner = self.get(id).await?;
        partner.apply_update(request)?;
        self.repo.update(&partner).await?;

        Ok(partner)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.repo.delete(id).await
    }
}
