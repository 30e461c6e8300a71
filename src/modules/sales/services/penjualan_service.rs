use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::MySqlPool;
use tracing::info;

use crate::core::{money, AppError, Result};
use crate::modules::catalog::models::Barang;
use crate::modules::catalog::repositories::BarangRepository;
use crate::modules::checkout::models::{CartLine, PaymentStatus, TransactionStatus};
use crate::modules::checkout::services::CheckoutCalculator;
use crate::modules::debts::models::{Debt, DebtKind};
use crate::modules::partners::models::Partner;
use crate::modules::partners::repositories::PartnerRepository;
use crate::modules::sales::models::{
    CheckoutPenjualanRequest, CreatePenjualanLengkapRequest, CreatePenjualanRequest, Penjualan,
    PenjualanItem, PenjualanItemRequest, PELANGGAN_UMUM,
};
use crate::modules::sales::repositories::PenjualanRepository;

/// Service for the sales flow. Registered customers may leave piutang
/// within their credit limit; walk-in customers must pay in full, which
/// the calculator enforces by the absence of a credit profile.
pub struct PenjualanService {
    repo: PenjualanRepository,
    barang_repo: BarangRepository,
    customer_repo: PartnerRepository,
    tempo_hutang_hari: i64,
}

impl PenjualanService {
    pub fn new(pool: MySqlPool, tempo_hutang_hari: i64) -> Self {
        Self {
            repo: PenjualanRepository::new(pool.clone()),
            barang_repo: BarangRepository::new(pool.clone()),
            customer_repo: PartnerRepository::customers(pool),
            tempo_hutang_hari,
        }
    }

    pub async fn create(&self, req: CreatePenjualanRequest) -> Result<Penjualan> {
        let tanggal = req.tanggal.unwrap_or_else(|| Utc::now().date_naive());
        let (customer_id, customer_nama) =
            self.resolve_customer(req.customer_id, req.customer_nama).await?;

        let penjualan = Penjualan::new(customer_id, customer_nama, tanggal);
        self.repo.create(&penjualan).await?;

        info!(penjualan_id = %penjualan.id, nomor = %penjualan.nomor_nota, "Sales draft created");
        Ok(penjualan)
    }

    pub async fn get(&self, id: &str) -> Result<Penjualan> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Nota penjualan '{}' tidak ditemukan", id)))
    }

    pub async fn list(
        &self,
        status: Option<TransactionStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Penjualan>> {
        self.repo.list(status, limit, offset).await
    }

    pub async fn add_item(&self, penjualan_id: &str, req: PenjualanItemRequest) -> Result<Penjualan> {
        let penjualan = self.get(penjualan_id).await?;
        penjualan.ensure_keranjang()?;

        let barang = self.find_barang(&req.barang_id).await?;
        let line = Self::line_from_request(&barang, &req)?;
        let item = PenjualanItem::from_line(penjualan.id.clone(), &line);

        self.repo.add_item(&item).await?;
        self.get(penjualan_id).await
    }

    pub async fn update_item(
        &self,
        penjualan_id: &str,
        item_id: &str,
        req: PenjualanItemRequest,
    ) -> Result<Penjualan> {
        let penjualan = self.get(penjualan_id).await?;
        penjualan.ensure_keranjang()?;

        let existing = penjualan
            .items
            .iter()
            .find(|i| i.id == item_id)
            .ok_or_else(|| {
                AppError::not_found(format!("Item '{}' tidak ditemukan pada nota ini", item_id))
            })?;

        let barang = self.find_barang(&req.barang_id).await?;
        if barang.id != existing.barang_id {
            return Err(AppError::validation(
                "Barang pada item tidak bisa diganti, hapus dan tambah ulang",
            ));
        }

        let line = Self::line_from_request(&barang, &req)?;
        let mut item = PenjualanItem::from_line(penjualan.id.clone(), &line);
        item.id = existing.id.clone();

        self.repo.update_item(&item).await?;
        self.get(penjualan_id).await
    }

    pub async fn remove_item(&self, penjualan_id: &str, item_id: &str) -> Result<Penjualan> {
        let penjualan = self.get(penjualan_id).await?;
        penjualan.ensure_keranjang()?;

        self.repo.delete_item(penjualan_id, item_id).await?;
        self.get(penjualan_id).await
    }

    /// Close a draft: recompute totals server-side, evaluate the payment
    /// against the customer's credit profile (none for walk-ins), then
    /// persist the snapshot, stock take, and any piutang in one
    /// transaction.
    pub async fn checkout(
        &self,
        penjualan_id: &str,
        req: CheckoutPenjualanRequest,
    ) -> Result<Penjualan> {
        let mut penjualan = self.get(penjualan_id).await?;
        penjualan.ensure_keranjang()?;

        money::validate_rupiah(req.dibayar).map_err(AppError::validation)?;

        let lines = penjualan.cart_lines()?;
        let summary =
            CheckoutCalculator::summarize(&lines, req.diskon_nota.unwrap_or_default())?;

        let customer = match &penjualan.customer_id {
            Some(id) => Some(self.find_customer(id).await?),
            None => None,
        };
        let profile = customer.as_ref().map(Partner::credit_profile);
        let jatuh_tempo = self.resolve_jatuh_tempo(req.jatuh_tempo);

        let outcome = CheckoutCalculator::evaluate_payment(
            summary.total,
            req.dibayar,
            profile.as_ref(),
            Some(jatuh_tempo),
        )?;

        penjualan.apply_checkout(&summary, req.dibayar, &outcome);
        let debt = Self::debt_for(&penjualan, customer.as_ref())?;

        self.repo.finalize(&penjualan, debt.as_ref()).await?;

        info!(
            penjualan_id = %penjualan.id,
            nomor = %penjualan.nomor_nota,
            total = %penjualan.total,
            status = %outcome.status,
            "Sales checkout finalized"
        );
        Ok(penjualan)
    }

    /// One-shot nota from the quick-entry form.
    pub async fn create_lengkap(&self, req: CreatePenjualanLengkapRequest) -> Result<Penjualan> {
        let tanggal = req.tanggal.unwrap_or_else(|| Utc::now().date_naive());
        money::validate_rupiah(req.dibayar).map_err(AppError::validation)?;

        let (customer_id, customer_nama) =
            self.resolve_customer(req.customer_id, req.customer_nama).await?;
        let customer = match &customer_id {
            Some(id) => Some(self.find_customer(id).await?),
            None => None,
        };

        let mut penjualan = Penjualan::new(customer_id, customer_nama, tanggal);

        for item_req in &req.items {
            let barang = self.find_barang(&item_req.barang_id).await?;
            let line = Self::line_from_request(&barang, item_req)?;
            penjualan
                .items
                .push(PenjualanItem::from_line(penjualan.id.clone(), &line));
        }

        let lines = penjualan.cart_lines()?;
        let summary =
            CheckoutCalculator::summarize(&lines, req.diskon_nota.unwrap_or_default())?;

        let profile = customer.as_ref().map(Partner::credit_profile);
        let jatuh_tempo = self.resolve_jatuh_tempo(req.jatuh_tempo);
        let outcome = CheckoutCalculator::evaluate_payment(
            summary.total,
            req.dibayar,
            profile.as_ref(),
            Some(jatuh_tempo),
        )?;

        penjualan.apply_checkout(&summary, req.dibayar, &outcome);
        let debt = Self::debt_for(&penjualan, customer.as_ref())?;

        self.repo.create_complete(&penjualan, debt.as_ref()).await?;

        info!(
            penjualan_id = %penjualan.id,
            nomor = %penjualan.nomor_nota,
            items = penjualan.items.len(),
            "Sale recorded in one shot"
        );
        Ok(penjualan)
    }

    pub async fn cancel(&self, penjualan_id: &str) -> Result<Penjualan> {
        let mut penjualan = self.get(penjualan_id).await?;
        penjualan.cancel()?;
        self.repo.cancel(penjualan_id).await?;
        Ok(penjualan)
    }

    /// A registered customer id wins over a typed name; with neither, the
    /// nota goes to the generic walk-in name.
    async fn resolve_customer(
        &self,
        customer_id: Option<String>,
        customer_nama: Option<String>,
    ) -> Result<(Option<String>, String)> {
        match customer_id {
            Some(id) => {
                let customer = self.find_customer(&id).await?;
                Ok((Some(customer.id), customer.nama))
            }
            None => {
                let nama = customer_nama
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| PELANGGAN_UMUM.to_string());
                Ok((None, nama))
            }
        }
    }

    async fn find_customer(&self, id: &str) -> Result<Partner> {
        self.customer_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Customer '{}' tidak ditemukan", id)))
    }

    async fn find_barang(&self, id: &str) -> Result<Barang> {
        self.barang_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Barang '{}' tidak ditemukan", id)))
    }

    /// Sales lines always price from the catalog.
    fn line_from_request(barang: &Barang, req: &PenjualanItemRequest) -> Result<CartLine> {
        CartLine::new(
            barang.id.clone(),
            barang.nama.clone(),
            req.qty_dus,
            req.qty_eceran,
            barang.isi_per_dus,
            barang.harga_jual_dus,
            barang.harga_jual_eceran,
            req.diskon.unwrap_or(Decimal::ZERO),
        )
    }

    fn resolve_jatuh_tempo(&self, requested: Option<NaiveDate>) -> NaiveDate {
        requested
            .unwrap_or_else(|| Utc::now().date_naive() + Duration::days(self.tempo_hutang_hari))
    }

    /// Build the piutang record when the checkout left a shortfall. The
    /// calculator has already rejected shortfalls without a registered
    /// customer.
    fn debt_for(penjualan: &Penjualan, customer: Option<&Partner>) -> Result<Option<Debt>> {
        if penjualan.status_pembayaran != Some(PaymentStatus::Hutang) {
            return Ok(None);
        }

        let customer = customer
            .ok_or_else(|| AppError::internal("Nota hutang tanpa pelanggan terdaftar"))?;
        let jatuh_tempo = penjualan
            .jatuh_tempo
            .ok_or_else(|| AppError::internal("Nota hutang tanpa tanggal jatuh tempo"))?;

        let debt = Debt::new(
            DebtKind::Piutang,
            penjualan.id.clone(),
            penjualan.nomor_nota.clone(),
            customer.id.clone(),
            customer.nama.clone(),
            penjualan.sisa_hutang,
            jatuh_tempo,
        )?;

        Ok(Some(debt))
    }
}
