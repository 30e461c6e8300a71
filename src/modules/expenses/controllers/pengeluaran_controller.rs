use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::core::{ApiResponse, AppError, Paginated};
use crate::modules::expenses::models::CreatePengeluaranRequest;
use crate::modules::expenses::services::PengeluaranService;

#[derive(Debug, Deserialize)]
pub struct ListPengeluaranQuery {
    pub dari: Option<NaiveDate>,
    pub sampai: Option<NaiveDate>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// POST /pengeluaran
pub async fn create_pengeluaran(
    service: web::Data<Arc<PengeluaranService>>,
    request: web::Json<CreatePengeluaranRequest>,
) -> Result<HttpResponse, AppError> {
    let pengeluaran = service.create(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(pengeluaran)))
}

/// GET /pengeluaran
pub async fn list_pengeluaran(
    service: web::Data<Arc<PengeluaranService>>,
    query: web::Query<ListPengeluaranQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let items = service
        .list(query.dari, query.sampai, query.limit, query.offset)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(Paginated {
        items,
        limit: query.limit,
        offset: query.offset,
    })))
}

/// DELETE /pengeluaran/{id}
pub async fn delete_pengeluaran(
    service: web::Data<Arc<PengeluaranService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(serde_json::json!({ "deleted": true }))))
}

/// Configure expense routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/pengeluaran")
            .route("", web::post().to(create_pengeluaran))
            .route("", web::get().to(list_pengeluaran))
            .route("/{id}", web::delete().to(delete_pengeluaran)),
    );
}
