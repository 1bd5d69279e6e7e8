use std::time::Duration;

use axum::{
    body::Body,
    http::{HeaderName, Request, StatusCode},
    routing::get,
    Router,
};
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::field::Empty;

pub fn request_id_header() -> HeaderName {
    HeaderName::from_static("x-request-id")
}

#[derive(Clone, Default)]
pub struct MakeReqId;

impl MakeRequestId for MakeReqId {
    fn make_request_id<B>(&mut self, _req: &Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        Some(RequestId::new(id.parse().ok()?))
    }
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Wrap the module routes with the server middleware stack.
///
/// Layers run outermost first: SetRequestId, PropagateRequestId, Trace,
/// Timeout. `None` leaves requests without a deadline.
pub fn build_router(storefront: &storefront::Storefront, timeout: Option<Duration>) -> Router {
    let router = Router::new().route("/health", get(health_check));
    let router = storefront.register_rest(router);
    let router = match timeout {
        Some(t) => router.layer(TimeoutLayer::new(t)),
        None => router,
    };

    let x_request_id = request_id_header();
    router
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                let rid = req
                    .headers()
                    .get(request_id_header())
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("n/a");
                tracing::info_span!(
                    "http_request",
                    method = %req.method(),
                    uri = %req.uri().path(),
                    version = ?req.version(),
                    request_id = %rid,
                    status = Empty,
                    latency_ms = Empty
                )
            }),
        )
        // Propagate sits inside Set so a generated id reaches the response too
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(SetRequestIdLayer::new(x_request_id, MakeReqId))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower::ServiceExt;

    async fn test_router() -> Router {
        let db = db::DbHandle::connect("sqlite::memory:", db::ConnectOpts::default())
            .await
            .unwrap();
        let sf = storefront::Storefront::init(&db, Default::default())
            .await
            .unwrap();
        build_router(&sf, Some(Duration::from_secs(5)))
    }

    #[tokio::test]
    async fn generates_request_id_when_missing() {
        let router = test_router().await;
        let resp = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let rid = resp
            .headers()
            .get(request_id_header())
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(uuid::Uuid::parse_str(rid).is_ok());
    }

    #[tokio::test]
    async fn propagates_client_request_id() {
        let router = test_router().await;
        let resp = router
            .oneshot(
                Request::get("/stock-items")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get(request_id_header()).unwrap(), "abc-123");
    }
}
