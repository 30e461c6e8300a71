use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::{ApiResponse, AppError, Paginated};
use crate::modules::checkout::models::TransactionStatus;
use crate::modules::purchases::models::{
    CheckoutPembelianRequest, CreatePembelianLengkapRequest, CreatePembelianRequest,
    PembelianItemRequest,
};
use crate::modules::purchases::services::PembelianService;

#[derive(Debug, Deserialize)]
pub struct ListPembelianQuery {
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

/// POST /pembelian
pub async fn create_pembelian(
    service: web::Data<Arc<PembelianService>>,
    request: web::Json<CreatePembelianRequest>,
) -> Result<HttpResponse, AppError> {
    let pembelian = service.create(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(pembelian)))
}

/// POST /pembelian/lengkap
pub async fn create_pembelian_lengkap(
    service: web::Data<Arc<PembelianService>>,
    request: web::Json<CreatePembelianLengkapRequest>,
) -> Result<HttpResponse, AppError> {
    let pembelian = service.create_lengkap(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(pembelian)))
}

/// GET /pembelian
pub async fn list_pembelian(
    service: web::Data<Arc<PembelianService>>,
    query: web::Query<ListPembelianQuery>,
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

/// GET /pembelian/{id}
pub async fn get_pembelian(
    service: web::Data<Arc<PembelianService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let pembelian = service.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(pembelian)))
}

/// POST /pembelian/{id}/items
pub async fn add_item(
    service: web::Data<Arc<PembelianService>>,
    path: web::Path<String>,
    request: web::Json<PembelianItemRequest>,
) -> Result<HttpResponse, AppError> {
    let pembelian = service
        .add_item(&path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(pembelian)))
}

/// PUT /pembelian/{id}/items/{item_id}
pub async fn update_item(
    service: web::Data<Arc<PembelianService>>,
    path: web::Path<(String, String)>,
    request: web::Json<PembelianItemRequest>,
) -> Result<HttpResponse, AppError> {
    let (pembelian_id, item_id) = path.into_inner();
    let pembelian = service
        .update_item(&pembelian_id, &item_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(pembelian)))
}

/// DELETE /pembelian/{id}/items/{item_id}
pub async fn remove_item(
    service: web::Data<Arc<PembelianService>>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (pembelian_id, item_id) = path.into_inner();
    let pembelian = service.remove_item(&pembelian_id, &item_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(pembelian)))
}

/// POST /pembelian/{id}/checkout
pub async fn checkout_pembelian(
    service: web::Data<Arc<PembelianService>>,
    path: web::Path<String>,
    request: web::Json<CheckoutPembelianRequest>,
) -> Result<HttpResponse, AppError> {
    let pembelian = service
        .checkout(&path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(pembelian)))
}

/// POST /pembelian/{id}/batal
pub async fn cancel_pembelian(
    service: web::Data<Arc<PembelianService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let pembelian = service.cancel(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(pembelian)))
}

/// Configure purchase routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/pembelian")
            .route("", web::post().to(create_pembelian))
            .route("", web::get().to(list_pembelian))
            .route("/lengkap", web::post().to(create_pembelian_lengkap))
            .route("/{id}", web::get().to(get_pembelian))
            .route("/{id}/items", web::post().to(add_item))
            .route("/{id}/items/{item_id}", web::put().to(update_item))
            .route("/{id}/items/{item_id}", web::delete().to(remove_item))
            .route("/{id}/checkout", web::post().to(checkout_pembelian))
            .route("/{id}/batal", web::post().to(cancel_pembelian)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status(None).unwrap(), None);
        assert_eq!(
            parse_status(Some("KERANJANG")).unwrap(),
            Some(TransactionStatus::Keranjang)
        );
        assert!(parse_status(Some("DRAFT")).is_err());
    }
}
