use chrono::NaiveDate;
use sqlx::MySqlPool;
use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::expenses::models::{CreatePengeluaranRequest, Pengeluaran};
use crate::modules::expenses::repositories::PengeluaranRepository;

/// Service for operational expenses
pub struct PengeluaranService {
    repo: PengeluaranRepository,
}

impl PengeluaranService {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            repo: PengeluaranRepository::new(pool),
        }
    }

    pub async fn create(&self, req: CreatePengeluaranRequest) -> Result<Pengeluaran> {
        let pengeluaran = Pengeluaran::new(req)?;
        self.repo.create(&pengeluaran).await?;

        info!(
            pengeluaran_id = %pengeluaran.id,
            jumlah = %pengeluaran.jumlah,
            "Expense recorded"
        );
        Ok(pengeluaran)
    }

    pub async fn list(
        &self,
        dari: Option<NaiveDate>,
        sampai: Option<NaiveDate>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Pengeluaran>> {
        if let (Some(dari), Some(sampai)) = (dari, sampai) {
            if dari > sampai {
                return Err(AppError::validation(
                    "Tanggal awal harus sebelum tanggal akhir",
                ));
            }
        }

        self.repo.list(dari, sampai, limit, offset).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.repo.delete(id).await?;
        info!(pengeluaran_id = %id, "Expense deleted");
        Ok(())
    }
}
