use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::{ApiResponse, AppError, Paginated};
use crate::modules::partners::models::{CreatePartnerRequest, UpdatePartnerRequest};
use crate::modules::partners::services::PartnerService;

/// Both partner surfaces registered as one app-data value, since the
/// underlying service type is shared.
pub struct PartnerServices {
    pub suppliers: Arc<PartnerService>,
    pub customers: Arc<PartnerService>,
}

#[derive(Debug, Deserialize)]
pub struct ListPartnerQuery {
    pub q: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

async fn create(
    service: &PartnerService,
    request: CreatePartnerRequest,
) -> Result<HttpResponse, AppError> {
    let partner = service.create(request).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(partner)))
}

async fn list(
    service: &PartnerService,
    query: ListPartnerQuery,
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

async fn get(service: &PartnerService, id: String) -> Result<HttpResponse, AppError> {
    let partner = service.get(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(partner)))
}

async fn update(
    service: &PartnerService,
    id: String,
    request: UpdatePartnerRequest,
) -> Result<HttpResponse, AppError> {
    let partner = service.update(&id, request).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(partner)))
}

async fn delete(service: &PartnerService, id: String) -> Result<HttpResponse, AppError> {
    service.delete(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(serde_json::json!({ "deleted": true }))))
}

// Supplier surface

pub async fn create_supplier(
    services: web::Data<PartnerServices>,
    request: web::Json<CreatePartnerRequest>,
) -> Result<HttpResponse, AppError> {
    create(&services.suppliers, request.into_inner()).await
}

pub async fn list_suppliers(
    services: web::Data<PartnerServices>,
    query: web::Query<ListPartnerQuery>,
) -> Result<HttpResponse, AppError> {
    list(&services.suppliers, query.into_inner()).await
}

pub async fn get_supplier(
    services: web::Data<PartnerServices>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    get(&services.suppliers, path.into_inner()).await
}

pub async fn update_supplier(
    services: web::Data<PartnerServices>,
    path: web::Path<String>,
    request: web::Json<UpdatePartnerRequest>,
) -> Result<HttpResponse, AppError> {
    update(&services.suppliers, path.into_inner(), request.into_inner()).await
}

pub async fn delete_supplier(
    services: web::Data<PartnerServices>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    delete(&services.suppliers, path.into_inner()).await
}

// Customer surface

pub async fn create_customer(
    services: web::Data<PartnerServices>,
    request: web::Json<CreatePartnerRequest>,
) -> Result<HttpResponse, AppError> {
    create(&services.customers, request.into_inner()).await
}

pub async fn list_customers(
    services: web::Data<PartnerServices>,
    query: web::Query<ListPartnerQuery>,
) -> Result<HttpResponse, AppError> {
    list(&services.customers, query.into_inner()).await
}

pub async fn get_customer(
    services: web::Data<PartnerServices>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    get(&services.customers, path.into_inner()).await
}

pub async fn update_customer(
    services: web::Data<PartnerServices>,
    path: web::Path<String>,
    request: web::Json<UpdatePartnerRequest>,
) -> Result<HttpResponse, AppError> {
    update(&services.customers, path.into_inner(), request.into_inner()).await
}

pub async fn delete_customer(
    services: web::Data<PartnerServices>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    delete(&services.customers, path.into_inner()).await
}

/// Configure supplier and customer routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/supplier")
            .route("", web::post().to(create_supplier))
            .route("", web::get().to(list_suppliers))
            .route("/{id}", web::get().to(get_supplier))
            .route("/{id}", web::put().to(update_supplier))
            .route("/{id}", web::delete().to(delete_supplier)),
    );
    cfg.service(
        web::scope("/customer")
            .route("", web::post().to(create_customer))
            .route("", web::get().to(list_customers))
            .route("/{id}", web::get().to(get_customer))
            .route("/{id}", web::put().to(update_customer))
            .route("/{id}", web::delete().to(delete_customer)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_defaults() {
        let query: ListPartnerQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.limit, 50);
        assert_eq!(query.offset, 0);
    }
}
