//! Per-request trace identifiers and access logging.
//!
//! Every request runs inside a [`TraceId::scope`] so domain errors raised by
//! handlers pick the identifier up. The same value is returned in the
//! `trace-id` header, and one completion line is logged per request with its
//! status and latency.

use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{info, warn};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Middleware factory; wrap the whole app with it.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use storefront::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TracedService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TracedService { inner: service }))
    }
}

/// Service produced by [`Trace`].
pub struct TracedService<S> {
    inner: S,
}

/// What the completion log line needs once the inner request is consumed.
struct RequestLine {
    trace_id: TraceId,
    method: String,
    path: String,
    started: Instant,
}

impl RequestLine {
    fn new(req: &ServiceRequest) -> Self {
        Self {
            trace_id: TraceId::generate(),
            method: req.method().to_string(),
            path: req.path().to_owned(),
            started: Instant::now(),
        }
    }

    fn finish(&self, status: u16) {
        let elapsed_ms = self.started.elapsed().as_millis();
        info!(
            trace_id = %self.trace_id,
            method = %self.method,
            path = %self.path,
            status,
            elapsed_ms,
            "request completed"
        );
    }
}

fn stamp_trace_header<B>(res: &mut ServiceResponse<B>, trace_id: &TraceId) {
    match HeaderValue::from_str(&trace_id.to_string()) {
        Ok(value) => {
            res.headers_mut()
                .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
        }
        Err(error) => warn!(%error, trace_id = %trace_id, "trace id is not a valid header"),
    }
}

impl<S, B> Service<ServiceRequest> for TracedService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let line = RequestLine::new(&req);
        let pending = self.inner.call(req);
        Box::pin(TraceId::scope(line.trace_id, async move {
            let mut res = pending.await?;
            stamp_trace_header(&mut res, &line.trace_id);
            line.finish(res.status().as_u16());
            Ok(res)
        }))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{App, HttpResponse, test, web};
    use serde_json::Value;

    use super::*;
    use crate::domain::Error as DomainError;

    async fn echo_trace_id() -> HttpResponse {
        match TraceId::current() {
            Some(id) => HttpResponse::Ok().body(id.to_string()),
            None => HttpResponse::InternalServerError().finish(),
        }
    }

    async fn sold_out() -> Result<HttpResponse, DomainError> {
        Err(DomainError::insufficient_stock("Insufficient stock"))
    }

    fn header_of<B>(res: &ServiceResponse<B>) -> String {
        res.headers()
            .get(TRACE_ID_HEADER)
            .expect("trace id header")
            .to_str()
            .expect("ascii header")
            .to_owned()
    }

    #[actix_web::test]
    async fn handlers_see_the_header_value() {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .route("/api/products", web::get().to(echo_trace_id)),
        )
        .await;
        let res =
            test::call_service(&app, test::TestRequest::get().uri("/api/products").to_request())
                .await;

        let header = header_of(&res);
        let body = test::read_body(res).await;
        assert_eq!(header.as_bytes(), body.as_ref());
    }

    #[actix_web::test]
    async fn error_payloads_quote_the_header_value() {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .route("/api/cart", web::post().to(sold_out)),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::post().uri("/api/cart").to_request())
            .await;

        let header = header_of(&res);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "insufficient_stock");
        assert_eq!(body["traceId"].as_str(), Some(header.as_str()));
    }

    #[actix_web::test]
    async fn each_request_gets_its_own_id() {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .route("/api/products", web::get().to(echo_trace_id)),
        )
        .await;
        let first =
            test::call_service(&app, test::TestRequest::get().uri("/api/products").to_request())
                .await;
        let second =
            test::call_service(&app, test::TestRequest::get().uri("/api/products").to_request())
                .await;
        assert_ne!(header_of(&first), header_of(&second));
    }
}
