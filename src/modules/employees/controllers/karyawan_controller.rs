use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::{ApiResponse, AppError, Paginated};
use crate::modules::employees::models::{CreateKaryawanRequest, UpdateKaryawanRequest};
use crate::modules::employees::services::KaryawanService;

#[derive(Debug, Deserialize)]
pub struct ListKaryawanQuery {
    #[serde(default)]
    pub include_inactive: bool,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// POST /karyawan
pub async fn create_karyawan(
    service: web::Data<Arc<KaryawanService>>,
    request: web::Json<CreateKaryawanRequest>,
) -> Result<HttpResponse, AppError> {
    let karyawan = service.create(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(karyawan)))
}

/// GET /karyawan
pub async fn list_karyawan(
    service: web::Data<Arc<KaryawanService>>,
    query: web::Query<ListKaryawanQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let items = service
        .list(query.include_inactive, query.limit, query.offset)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(Paginated {
        items,
        limit: query.limit,
        offset: query.offset,
    })))
}

/// GET /karyawan/{id}
pub async fn get_karyawan(
    service: web::Data<Arc<KaryawanService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let karyawan = service.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(karyawan)))
}

/// PUT /karyawan/{id}
pub async fn update_karyawan(
    service: web::Data<Arc<KaryawanService>>,
    path: web::Path<String>,
    request: web::Json<UpdateKaryawanRequest>,
) -> Result<HttpResponse, AppError> {
    let karyawan = service
        .update(&path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(karyawan)))
}

/// DELETE /karyawan/{id} — soft deactivate
pub async fn deactivate_karyawan(
    service: web::Data<Arc<KaryawanService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let karyawan = service.deactivate(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(karyawan)))
}

/// Configure employee routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/karyawan")
            .route("", web::post().to(create_karyawan))
            .route("", web::get().to(list_karyawan))
            .route("/{id}", web::get().to(get_karyawan))
            .route("/{id}", web::put().to(update_karyawan))
            .route("/{id}", web::delete().to(deactivate_karyawan)),
    );
}
