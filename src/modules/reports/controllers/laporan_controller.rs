use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::core::{ApiResponse, AppError};
use crate::modules::reports::models::DateRange;
use crate::modules::reports::services::LaporanService;

#[derive(Debug, Deserialize)]
pub struct LaporanQuery {
    pub dari: NaiveDate,
    pub sampai: NaiveDate,
}

impl LaporanQuery {
    fn range(&self) -> Result<DateRange, AppError> {
        DateRange::new(self.dari, self.sampai)
    }
}

/// GET /laporan/penjualan
pub async fn laporan_penjualan(
    service: web::Data<Arc<LaporanService>>,
    query: web::Query<LaporanQuery>,
) -> Result<HttpResponse, AppError> {
    let laporan = service.laporan_penjualan(query.range()?).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(laporan)))
}

/// GET /laporan/pembelian
pub async fn laporan_pembelian(
    service: web::Data<Arc<LaporanService>>,
    query: web::Query<LaporanQuery>,
) -> Result<HttpResponse, AppError> {
    let laporan = service.laporan_pembelian(query.range()?).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(laporan)))
}

/// GET /laporan/hutang-piutang
pub async fn laporan_hutang_piutang(
    service: web::Data<Arc<LaporanService>>,
) -> Result<HttpResponse, AppError> {
    let laporan = service.laporan_hutang_piutang().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(laporan)))
}

/// Configure report routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/laporan")
            .route("/penjualan", web::get().to(laporan_penjualan))
            .route("/pembelian", web::get().to(laporan_pembelian))
            .route("/hutang-piutang", web::get().to(laporan_hutang_piutang)),
    );
}
