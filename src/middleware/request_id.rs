use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
    Error, HttpMessage,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";
const MAX_CLIENT_ID_LEN: usize = 64;

/// Correlation id for one request, readable from handlers via request
/// extensions.
#[derive(Debug, Clone)]
pub struct RequestIdValue(pub String);

/// Accepts a client-supplied `x-request-id` (the dashboard UI sends one per
/// page action), generates one otherwise, and echoes it on the response so
/// a failed nota can be matched to its log lines. Request logging itself is
/// `TracingLogger`'s job.
pub struct RequestId;

impl<S, B> Transform<S, ServiceRequest> for RequestId
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestIdMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdMiddleware { service }))
    }
}

pub struct RequestIdMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestIdMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let request_id = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .filter(|id| !id.is_empty() && id.len() <= MAX_CLIENT_ID_LEN)
            .map(str::to_owned)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        req.extensions_mut()
            .insert(RequestIdValue(request_id.clone()));

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;

            if let Ok(value) = HeaderValue::from_str(&request_id) {
                res.headers_mut()
                    .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
            }

            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};

    macro_rules! echo_app {
        () => {
            test::init_service(
                App::new().wrap(RequestId).route(
                    "/test",
                    web::get().to(|| async { HttpResponse::Ok().finish() }),
                ),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_client_id_is_echoed_on_the_response() {
        let app = echo_app!();

        let req = test::TestRequest::get()
            .uri("/test")
            .insert_header(("x-request-id", "kasir-3-nota-42"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("x-request-id").unwrap(),
            "kasir-3-nota-42"
        );
    }

    #[actix_web::test]
    async fn test_id_is_generated_when_absent() {
        let app = echo_app!();

        let req = test::TestRequest::get().uri("/test").to_request();
        let resp = test::call_service(&app, req).await;

        let id = resp.headers().get("x-request-id").unwrap().to_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[actix_web::test]
    async fn test_oversized_client_id_is_replaced() {
        let app = echo_app!();

        let oversized = "x".repeat(MAX_CLIENT_ID_LEN + 1);
        let req = test::TestRequest::get()
            .uri("/test")
            .insert_header(("x-request-id", oversized.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;

        let id = resp.headers().get("x-request-id").unwrap().to_str().unwrap();
        assert_ne!(id, oversized);
        assert!(Uuid::parse_str(id).is_ok());
    }
}
