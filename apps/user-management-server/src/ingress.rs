//! HTTP middleware wrapped around the module router.

use std::time::Duration;

use axum::http::{HeaderName, Request};
use axum::middleware::from_fn;
use axum::{body::Body, middleware::Next, response::Response, Router};
use runtime::ServerConfig;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::field::Empty;

const BODY_LIMIT_BYTES: usize = 16 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct XRequestId(pub String);

pub fn request_id_header() -> HeaderName {
    HeaderName::from_static("x-request-id")
}

#[derive(Clone, Default)]
pub struct MakeReqId;

impl MakeRequestId for MakeReqId {
    fn make_request_id<B>(&mut self, _req: &Request<B>) -> Option<RequestId> {
        let id = nanoid::nanoid!();
        Some(RequestId::new(id.parse().ok()?))
    }
}

/// Stores the request id in request extensions and records it in the current span
async fn push_req_id_to_extensions(mut req: Request<Body>, next: Next) -> Response {
    let rid = req
        .headers()
        .get(request_id_header())
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| "n/a".to_string());

    req.extensions_mut().insert(XRequestId(rid.clone()));
    tracing::Span::current().record("request_id", tracing::field::display(&rid));

    next.run(req).await
}

fn make_span(req: &Request<Body>) -> tracing::Span {
    tracing::info_span!(
        "http_request",
        method = %req.method(),
        uri = %req.uri().path(),
        version = ?req.version(),
        request_id = Empty,
        status = Empty,
        latency_ms = Empty
    )
}

/// Each `layer` call wraps everything added before it, so layers are added
/// innermost first: body limit, CORS, timeout, propagate id, record id,
/// trace span, set id.
pub fn apply(mut router: Router, server: &ServerConfig) -> Router {
    let header = request_id_header();

    router = router.layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES));

    if server.cors_enabled {
        router = router.layer(CorsLayer::permissive());
    }

    if server.request_timeout_sec > 0 {
        router = router.layer(TimeoutLayer::new(Duration::from_secs(
            server.request_timeout_sec,
        )));
    }

    router = router.layer(PropagateRequestIdLayer::new(header.clone()));
    router = router.layer(from_fn(push_req_id_to_extensions));
    router = router.layer(TraceLayer::new_for_http().make_span_with(make_span));
    router.layer(SetRequestIdLayer::new(header, MakeReqId))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get};
    use tower::ServiceExt;

    fn app() -> Router {
        let router = Router::new().route(
            "/ping",
            get(|axum::Extension(rid): axum::Extension<XRequestId>| async move { rid.0 }),
        );
        apply(router, &ServerConfig::default())
    }

    #[tokio::test]
    async fn generates_request_id_when_missing() {
        let resp = app()
            .oneshot(Request::get("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let header = resp.headers().get("x-request-id").unwrap().to_str().unwrap();
        assert_eq!(header.len(), 21);
    }

    #[tokio::test]
    async fn propagates_client_request_id() {
        let resp = app()
            .oneshot(
                Request::get("/ping")
                    .header("x-request-id", "client-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.headers()["x-request-id"], "client-42");
        let body = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"client-42");
    }
}
