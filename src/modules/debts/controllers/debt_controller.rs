use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::{ApiResponse, AppError, Paginated};
use crate::modules::debts::models::{DebtKind, DebtStatus};
use crate::modules::debts::services::debt_service::{
    BayarRequest, DebtService, UbahJatuhTempoRequest,
};

#[derive(Debug, Deserialize)]
pub struct ListDebtQuery {
    /// "LUNAS" or "BELUM_LUNAS"
    pub status: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

fn parse_status(raw: Option<&str>) -> Result<Option<DebtStatus>, AppError> {
    raw.map(|s| DebtStatus::try_from(s.to_string()).map_err(AppError::validation))
        .transpose()
}

async fn list_by_kind(
    service: &DebtService,
    kind: DebtKind,
    query: ListDebtQuery,
) -> Result<HttpResponse, AppError> {
    let status = parse_status(query.status.as_deref())?;
    let items = service.list(kind, status, query.limit, query.offset).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(Paginated {
        items,
        limit: query.limit,
        offset: query.offset,
    })))
}

/// GET /hutang
pub async fn list_hutang(
    service: web::Data<Arc<DebtService>>,
    query: web::Query<ListDebtQuery>,
) -> Result<HttpResponse, AppError> {
    list_by_kind(&service, DebtKind::Hutang, query.into_inner()).await
}

/// GET /piutang
pub async fn list_piutang(
    service: web::Data<Arc<DebtService>>,
    query: web::Query<ListDebtQuery>,
) -> Result<HttpResponse, AppError> {
    list_by_kind(&service, DebtKind::Piutang, query.into_inner()).await
}

/// GET /debts/{id}
pub async fn get_debt(
    service: web::Data<Arc<DebtService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let detail = service.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(detail)))
}

/// POST /debts/{id}/bayar
pub async fn bayar_debt(
    service: web::Data<Arc<DebtService>>,
    path: web::Path<String>,
    request: web::Json<BayarRequest>,
) -> Result<HttpResponse, AppError> {
    let detail = service
        .bayar(&path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(detail)))
}

/// PUT /debts/{id}/jatuh-tempo
pub async fn ubah_jatuh_tempo(
    service: web::Data<Arc<DebtService>>,
    path: web::Path<String>,
    request: web::Json<UbahJatuhTempoRequest>,
) -> Result<HttpResponse, AppError> {
    let debt = service
        .ubah_jatuh_tempo(&path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(debt)))
}

/// Configure debt routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/hutang", web::get().to(list_hutang))
        .route("/piutang", web::get().to(list_piutang))
        .service(
            web::scope("/debts")
                .route("/{id}", web::get().to(get_debt))
                .route("/{id}/bayar", web::post().to(bayar_debt))
                .route("/{id}/jatuh-tempo", web::put().to(ubah_jatuh_tempo)),
        );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status(None).unwrap(), None);
        assert_eq!(
            parse_status(Some("LUNAS")).unwrap(),
            Some(DebtStatus::Lunas)
        );
        assert!(parse_status(Some("APAPUN")).is_err());
    }
}
