//! Terminal middleware that stamps permissive CORS headers on every response.
//!
//! The mobile client and its web preview both call the gateway cross-origin,
//! so every exit path — success, auth failure, rate-limit rejection, even a
//! failed body extraction — must carry the headers or the browser hides the
//! result from the caller. Errors are converted into responses inside the
//! middleware for that reason.

use std::future::{ready, Future, Ready};
use std::pin::Pin;

use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue};
use actix_web::Error;

const CORS_HEADERS: [(&str, &str); 4] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "GET, POST, OPTIONS"),
    ("access-control-allow-headers", "Content-Type, Authorization"),
    ("access-control-max-age", "86400"),
];

fn append_cors_headers(headers: &mut HeaderMap) {
    for (name, value) in CORS_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
}

/// Middleware factory. Wrap the app with this once; see module docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorsHeaders;

impl<S, B> Transform<S, ServiceRequest> for CorsHeaders
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Transform = CorsHeadersMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CorsHeadersMiddleware { service }))
    }
}

pub struct CorsHeadersMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for CorsHeadersMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let (http_req, payload) = req.into_parts();
        let fut = self
            .service
            .call(ServiceRequest::from_parts(http_req.clone(), payload));

        Box::pin(async move {
            let mut res = match fut.await {
                Ok(res) => res.map_into_boxed_body(),
                // Downstream errors (e.g. a payload read failure) never
                // bypass the CORS responder.
                Err(err) => ServiceResponse::new(http_req, err.error_response()),
            };
            append_cors_headers(res.headers_mut());
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};

    use crate::error::GatewayError;

    async fn ok() -> HttpResponse {
        HttpResponse::Ok().body("ok")
    }

    async fn unauthorized() -> Result<HttpResponse, GatewayError> {
        Err(GatewayError::Unauthorized("Invalid API token"))
    }

    #[actix_web::test]
    async fn success_responses_carry_all_four_headers() {
        let app = test::init_service(
            App::new()
                .wrap(CorsHeaders)
                .route("/", web::get().to(ok)),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(
            resp.headers().get("Access-Control-Allow-Origin").unwrap(),
            "*"
        );
        assert_eq!(
            resp.headers().get("Access-Control-Allow-Methods").unwrap(),
            "GET, POST, OPTIONS"
        );
        assert_eq!(
            resp.headers().get("Access-Control-Allow-Headers").unwrap(),
            "Content-Type, Authorization"
        );
        assert_eq!(
            resp.headers().get("Access-Control-Max-Age").unwrap(),
            "86400"
        );
    }

    #[actix_web::test]
    async fn error_responses_carry_the_headers_too() {
        let app = test::init_service(
            App::new()
                .wrap(CorsHeaders)
                .route("/", web::get().to(unauthorized)),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status().as_u16(), 401);
        assert_eq!(
            resp.headers().get("Access-Control-Allow-Origin").unwrap(),
            "*"
        );
    }
}
