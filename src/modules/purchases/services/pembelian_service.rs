use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::MySqlPool;
use tracing::info;

use crate::core::{money, AppError, Result};
use crate::modules::catalog::models::Barang;
use crate::modules::catalog::repositories::BarangRepository;
use crate::modules::checkout::models::{CartLine, NotaDiscount, PaymentStatus, TransactionStatus};
use crate::modules::checkout::services::CheckoutCalculator;
use crate::modules::debts::models::{Debt, DebtKind};
use crate::modules::partners::models::Partner;
use crate::modules::partners::repositories::PartnerRepository;
use crate::modules::purchases::models::{
    CheckoutPembelianRequest, CreatePembelianLengkapRequest, CreatePembelianRequest, Pembelian,
    PembelianItem, PembelianItemRequest,
};
use crate::modules::purchases::repositories::PembelianRepository;

/// Service for the purchase flow: draft carts, item mutation, and the
/// atomic checkout against the supplier's credit standing.
pub struct PembelianService {
    repo: PembelianRepository,
    barang_repo: BarangRepository,
    supplier_repo: PartnerRepository,
    tempo_hutang_hari: i64,
}

impl PembelianService {
    pub fn new(pool: MySqlPool, tempo_hutang_hari: i64) -> Self {
        Self {
            repo: PembelianRepository::new(pool.clone()),
            barang_repo: BarangRepository::new(pool.clone()),
            supplier_repo: PartnerRepository::suppliers(pool),
            tempo_hutang_hari,
        }
    }

    pub async fn create(&self, req: CreatePembelianRequest) -> Result<Pembelian> {
        let supplier = self.find_supplier(&req.supplier_id).await?;
        let tanggal = req.tanggal.unwrap_or_else(|| Utc::now().date_naive());

        let pembelian = Pembelian::new(supplier.id, supplier.nama, tanggal);
        self.repo.create(&pembelian).await?;

        info!(pembelian_id = %pembelian.id, nomor = %pembelian.nomor_nota, "Purchase draft created");
        Ok(pembelian)
    }

    pub async fn get(&self, id: &str) -> Result<Pembelian> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Nota pembelian '{}' tidak ditemukan", id)))
    }

    pub async fn list(
        &self,
        status: Option<TransactionStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Pembelian>> {
        self.repo.list(status, limit, offset).await
    }

    pub async fn add_item(&self, pembelian_id: &str, req: PembelianItemRequest) -> Result<Pembelian> {
        let pembelian = self.get(pembelian_id).await?;
        pembelian.ensure_keranjang()?;

        let barang = self.find_barang(&req.barang_id).await?;
        let line = Self::line_from_request(&barang, &req)?;
        let item = PembelianItem::from_line(pembelian.id.clone(), &line);

        self.repo.add_item(&item).await?;
        self.get(pembelian_id).await
    }

    pub async fn update_item(
        &self,
        pembelian_id: &str,
        item_id: &str,
        req: PembelianItemRequest,
    ) -> Result<Pembelian> {
        let pembelian = self.get(pembelian_id).await?;
        pembelian.ensure_keranjang()?;

        let existing = pembelian
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
        let mut item = PembelianItem::from_line(pembelian.id.clone(), &line);
        item.id = existing.id.clone();

        self.repo.update_item(&item).await?;
        self.get(pembelian_id).await
    }

    pub async fn remove_item(&self, pembelian_id: &str, item_id: &str) -> Result<Pembelian> {
        let pembelian = self.get(pembelian_id).await?;
        pembelian.ensure_keranjang()?;

        self.repo.delete_item(pembelian_id, item_id).await?;
        self.get(pembelian_id).await
    }

    /// Close a draft: recompute totals server-side, evaluate the payment
    /// against the supplier's credit profile, then persist the snapshot,
    /// stock receipt, and any hutang in one transaction.
    pub async fn checkout(
        &self,
        pembelian_id: &str,
        req: CheckoutPembelianRequest,
    ) -> Result<Pembelian> {
        let mut pembelian = self.get(pembelian_id).await?;
        pembelian.ensure_keranjang()?;

        money::validate_rupiah(req.dibayar).map_err(AppError::validation)?;

        let lines = pembelian.cart_lines()?;
        let summary =
            CheckoutCalculator::summarize(&lines, req.diskon_nota.unwrap_or_default())?;

        let supplier = self.find_supplier(&pembelian.supplier_id).await?;
        let profile = supplier.credit_profile();
        let jatuh_tempo = self.resolve_jatuh_tempo(req.jatuh_tempo);

        let outcome = CheckoutCalculator::evaluate_payment(
            summary.total,
            req.dibayar,
            Some(&profile),
            Some(jatuh_tempo),
        )?;

        pembelian.apply_checkout(&summary, req.dibayar, &outcome);
        let debt = Self::debt_for(&pembelian, &supplier, DebtKind::Hutang)?;

        self.repo.finalize(&pembelian, debt.as_ref()).await?;

        info!(
            pembelian_id = %pembelian.id,
            nomor = %pembelian.nomor_nota,
            total = %pembelian.total,
            status = %outcome.status,
            "Purchase checkout finalized"
        );
        Ok(pembelian)
    }

    /// One-shot nota from the quick-entry form: header, items, and payment
    /// validated and written atomically.
    pub async fn create_lengkap(&self, req: CreatePembelianLengkapRequest) -> Result<Pembelian> {
        let supplier = self.find_supplier(&req.supplier_id).await?;
        let tanggal = req.tanggal.unwrap_or_else(|| Utc::now().date_naive());

        money::validate_rupiah(req.dibayar).map_err(AppError::validation)?;

        let mut pembelian =
            Pembelian::new(supplier.id.clone(), supplier.nama.clone(), tanggal);

        for item_req in &req.items {
            let barang = self.find_barang(&item_req.barang_id).await?;
            let line = Self::line_from_request(&barang, item_req)?;
            pembelian
                .items
                .push(PembelianItem::from_line(pembelian.id.clone(), &line));
        }

        let lines = pembelian.cart_lines()?;
        let summary =
            CheckoutCalculator::summarize(&lines, req.diskon_nota.unwrap_or_default())?;

        let profile = supplier.credit_profile();
        let jatuh_tempo = self.resolve_jatuh_tempo(req.jatuh_tempo);
        let outcome = CheckoutCalculator::evaluate_payment(
            summary.total,
            req.dibayar,
            Some(&profile),
            Some(jatuh_tempo),
        )?;

        pembelian.apply_checkout(&summary, req.dibayar, &outcome);
        let debt = Self::debt_for(&pembelian, &supplier, DebtKind::Hutang)?;

        self.repo.create_complete(&pembelian, debt.as_ref()).await?;

        info!(
            pembelian_id = %pembelian.id,
            nomor = %pembelian.nomor_nota,
            items = pembelian.items.len(),
            "Purchase recorded in one shot"
        );
        Ok(pembelian)
    }

    pub async fn cancel(&self, pembelian_id: &str) -> Result<Pembelian> {
        let mut pembelian = self.get(pembelian_id).await?;
        pembelian.cancel()?;
        self.repo.cancel(pembelian_id).await?;
        Ok(pembelian)
    }

    async fn find_supplier(&self, id: &str) -> Result<Partner> {
        self.supplier_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Supplier '{}' tidak ditemukan", id)))
    }

    async fn find_barang(&self, id: &str) -> Result<Barang> {
        self.barang_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Barang '{}' tidak ditemukan", id)))
    }

    /// Purchase items take the catalog's buy price unless the request
    /// carries a quoted one.
    fn line_from_request(barang: &Barang, req: &PembelianItemRequest) -> Result<CartLine> {
        let harga_dus = req.harga_dus.unwrap_or(barang.harga_beli);
        let diskon = req.diskon.unwrap_or(Decimal::ZERO);

        CartLine::dus_only(
            barang.id.clone(),
            barang.nama.clone(),
            req.qty_dus,
            barang.isi_per_dus,
            harga_dus,
            diskon,
        )
    }

    fn resolve_jatuh_tempo(&self, requested: Option<NaiveDate>) -> NaiveDate {
        requested
            .unwrap_or_else(|| Utc::now().date_naive() + Duration::days(self.tempo_hutang_hari))
    }

    /// Build the hutang record when the checkout left a shortfall.
    fn debt_for(
        pembelian: &Pembelian,
        supplier: &Partner,
        kind: DebtKind,
    ) -> Result<Option<Debt>> {
        if pembelian.status_pembayaran != Some(PaymentStatus::Hutang) {
            return Ok(None);
        }

        let jatuh_tempo = pembelian.jatuh_tempo.ok_or_else(|| {
            AppError::internal("Nota hutang tanpa tanggal jatuh tempo")
        })?;

        let debt = Debt::new(
            kind,
            pembelian.id.clone(),
            pembelian.nomor_nota.clone(),
            supplier.id.clone(),
            supplier.nama.clone(),
            pembelian.sisa_hutang,
            jatuh_tempo,
        )?;

        Ok(Some(debt))
    }
}
