use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::debts::models::{Debt, DebtKind, DebtPayment, DebtStatus};
use crate::modules::debts::repositories::DebtRepository;

#[derive(Debug, Deserialize)]
pub struct BayarRequest {
    pub jumlah: Decimal,
    /// Payment date; defaults to today
    pub tanggal: Option<NaiveDate>,
    pub keterangan: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UbahJatuhTempoRequest {
    pub jatuh_tempo: NaiveDate,
}

/// Debt detail with its payment history.
#[derive(Debug, serde::Serialize)]
pub struct DebtDetail {
    #[serde(flatten)]
    pub debt: Debt,
    pub sisa: Decimal,
    pub pembayaran: Vec<DebtPayment>,
}

/// Service for the hutang/piutang repayment lifecycle
pub struct DebtService {
    repo: DebtRepository,
}

impl DebtService {
    pub fn new(repo: DebtRepository) -> Self {
        Self { repo }
    }

    pub async fn get(&self, id: &str) -> Result<DebtDetail> {
        let debt = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Hutang tidak ditemukan"))?;

        let pembayaran = self.repo.payments_for(id).await?;
        let sisa = debt.sisa();

        Ok(DebtDetail {
            debt,
            sisa,
            pembayaran,
        })
    }

    pub async fn list(
        &self,
        kind: DebtKind,
        status: Option<DebtStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Debt>> {
        self.repo.list(kind, status, limit, offset).await
    }

    /// Record a partial or full repayment and reconcile the debt status.
    pub async fn bayar(&self, id: &str, request: BayarRequest) -> Result<DebtDetail> {
        let mut debt = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Hutang tidak ditemukan"))?;

        let dibayar_sebelum = debt.dibayar;
        debt.apply_payment(request.jumlah)?;

        let payment = DebtPayment::new(
            debt.id.clone(),
            request.jumlah,
            request.tanggal.unwrap_or_else(|| Utc::now().date_naive()),
            request.keterangan,
        );

        self.repo
            .save_payment(&debt, dibayar_sebelum, &payment)
            .await?;

        info!(
            debt_id = %debt.id,
            jumlah = %payment.jumlah,
            status = %debt.status,
            "Debt payment recorded"
        );

        self.get(id).await
    }

    /// Edit the due date of a debt.
    pub async fn ubah_jatuh_tempo(
        &self,
        id: &str,
        request: UbahJatuhTempoRequest,
    ) -> Result<Debt> {
        let mut debt = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Hutang tidak ditemukan"))?;

        debt.set_jatuh_tempo(request.jatuh_tempo);
        self.repo.update_jatuh_tempo(&debt).await?;

        info!(debt_id = %debt.id, jatuh_tempo = %debt.jatuh_tempo, "Due date updated");

        Ok(debt)
    }
}
