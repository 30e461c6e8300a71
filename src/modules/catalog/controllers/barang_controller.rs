use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::{ApiResponse, AppError, Paginated};
use crate::modules::catalog::models::{CreateBarangRequest, UpdateBarangRequest};
use crate::modules::catalog::services::BarangService;

/// Query parameters for listing barang
#[derive(Debug, Deserialize)]
pub struct ListBarangQuery {
    pub q: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// POST /barang
pub async fn create_barang(
    service: web::Data<Arc<BarangService>>,
    request: web::Json<CreateBarangRequest>,
) -> Result<HttpResponse, AppError> {
    let barang = service.create(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(barang)))
}

/// GET /barang
pub async fn list_barang(
    service: web::Data<Arc<BarangService>>,
    query: web::Query<ListBarangQuery>,
) -> Result<HttpResponse, AppError> {
    let items = service
        .list(query.q.as_deref(), query.limit, query.offset)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(Paginated {
        items,
        limit: query.limit,
        offset: query.offset,
    })))
}

/// GET /barang/{id}
pub async fn get_barang(
    service: web::Data<Arc<BarangService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let barang = service.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(barang)))
}

/// PUT /barang/{id}
pub async fn update_barang(
    service: web::Data<Arc<BarangService>>,
    path: web::Path<String>,
    request: web::Json<UpdateBarangRequest>,
) -> Result<HttpResponse, AppError> {
    let barang = service
        .update(&path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(barang)))
}

/// DELETE /barang/{id}
pub async fn delete_barang(
    service: web::Data<Arc<BarangService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(serde_json::json!({ "deleted": true }))))
}

/// Configure barang routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/barang")
            .route("", web::post().to(create_barang))
            .route("", web::get().to(list_barang))
            .route("/{id}", web::get().to(get_barang))
            .route("/{id}", web::put().to(update_barang))
            .route("/{id}", web::delete().to(delete_barang)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_defaults() {
        let query: ListBarangQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.limit, 50);
        assert_eq!(query.offset, 0);
        assert!(query.q.is_none());
    }
}
