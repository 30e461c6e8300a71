use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::{ApiResponse, AppError, Paginated};
use crate::modules::checkout::models::TransactionStatus;
use crate::modules::sales::models::{
    CheckoutPenjualanRequest, CreatePenjualanLengkapRequest, CreatePenjualanRequest,
    PenjualanItemRequest,
};
use crate::modules::sales::services::PenjualanService;

#[derive(Debug, Deserialize)]
pub struct ListPenjualanQuery {
    /// "KERANJANG", "SELESAI", or "BATAL"
    pub status: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

fn parse_status(raw: Option<&str>) -> Result<Option<TransactionStatus>, AppError> {
    raw.map(|s| TransactionStatus::try_from(s.to_string()).map_err(AppError::validation))
        .transpose()
}

/// POST /penjualan
pub async fn create_penjualan(
    service: web::Data<Arc<PenjualanService>>,
    request: web::Json<CreatePenjualanRequest>,
) -> Result<HttpResponse, AppError> {
    let penjualan = service.create(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(penjualan)))
}

/// POST /penjualan/lengkap
pub async fn create_penjualan_lengkap(
    service: web::Data<Arc<PenjualanService>>,
    request: web::Json<CreatePenjualanLengkapRequest>,
) -> Result<HttpResponse, AppError> {
    let penjualan = service.create_lengkap(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(penjualan)))
}

/// GET /penjualan
pub async fn list_penjualan(
    service: web::Data<Arc<PenjualanService>>,
    query: web::Query<ListPenjualanQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let status = parse_status(query.status.as_deref())?;
    let items = service.list(status, query.limit, query.offset).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(Paginated {
        items,
        limit: query.limit,
        offset: query.offset,
    })))
}

/// GET /penjualan/{id}
pub async fn get_penjualan(
    service: web::Data<Arc<PenjualanService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let penjualan = service.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(penjualan)))
}

/// POST /penjualan/{id}/items
pub async fn add_item(
    service: web::Data<Arc<PenjualanService>>,
    path: web::Path<String>,
    request: web::Json<PenjualanItemRequest>,
) -> Result<HttpResponse, AppError> {
    let penjualan = service
        .add_item(&path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(penjualan)))
}

/// PUT /penjualan/{id}/items/{item_id}
pub async fn update_item(
    service: web::Data<Arc<PenjualanService>>,
    path: web::Path<(String, String)>,
    request: web::Json<PenjualanItemRequest>,
) -> Result<HttpResponse, AppError> {
    let (penjualan_id, item_id) = path.into_inner();
    let penjualan = service
        .update_item(&penjualan_id, &item_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(penjualan)))
}

/// DELETE /penjualan/{id}/items/{item_id}
pub async fn remove_item(
    service: web::Data<Arc<PenjualanService>>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (penjualan_id, item_id) = path.into_inner();
    let penjualan = service.remove_item(&penjualan_id, &item_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(penjualan)))
}

/// POST /penjualan/{id}/checkout
pub async fn checkout_penjualan(
    service: web::Data<Arc<PenjualanService>>,
    path: web::Path<String>,
    request: web::Json<CheckoutPenjualanRequest>,
) -> Result<HttpResponse, AppError> {
    let penjualan = service
        .checkout(&path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(penjualan)))
}

/// POST /penjualan/{id}/batal
pub async fn cancel_penjualan(
    service: web::Data<Arc<PenjualanService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let penjualan = service.cancel(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(penjualan)))
}

/// Configure sales routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/penjualan")
            .route("", web::post().to(create_penjualan))
            .route("", web::get().to(list_penjualan))
            .route("/lengkap", web::post().to(create_penjualan_lengkap))
            .route("/{id}", web::get().to(get_penjualan))
            .route("/{id}/items", web::post().to(add_item))
            .route("/{id}/items/{item_id}", web::put().to(update_item))
            .route("/{id}/items/{item_id}", web::delete().to(remove_item))
            .route("/{id}/checkout", web::post().to(checkout_penjualan))
            .route("/{id}/batal", web::post().to(cancel_penjualan)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status(None).unwrap(), None);
        assert_eq!(
            parse_status(Some("SELESAI")).unwrap(),
            Some(TransactionStatus::Selesai)
        );
        assert!(parse_status(Some("SELESAI ")).is_err());
    }
}
