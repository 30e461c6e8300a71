use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::{ApiResponse, AppError, Paginated};
use crate::modules::employees::models::CreatePenggajianRequest;
use crate::modules::employees::services::PenggajianService;

#[derive(Debug, Deserialize)]
pub struct ListPenggajianQuery {
    pub karyawan_id: Option<String>,
    /// "YYYY-MM"
    pub periode: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// POST /penggajian
pub async fn create_penggajian(
    service: web::Data<Arc<PenggajianService>>,
    request: web::Json<CreatePenggajianRequest>,
) -> Result<HttpResponse, AppError> {
    let gaji = service.create(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(gaji)))
}

/// GET /penggajian
pub async fn list_penggajian(
    service: web::Data<Arc<PenggajianService>>,
    query: web::Query<ListPenggajianQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let items = service
        .list(
            query.karyawan_id.as_deref(),
            query.periode.as_deref(),
            query.limit,
            query.offset,
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(Paginated {
        items,
        limit: query.limit,
        offset: query.offset,
    })))
}

/// GET /penggajian/{id}
pub async fn get_penggajian(
    service: web::Data<Arc<PenggajianService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let gaji = service.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(gaji)))
}

/// Configure payroll routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/penggajian")
            .route("", web::post().to(create_penggajian))
            .route("", web::get().to(list_penggajian))
            .route("/{id}", web::get().to(get_penggajian)),
    );
}
