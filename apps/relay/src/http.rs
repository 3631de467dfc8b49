use std::sync::Arc;

use axum::{
    Json, Router,
    body::{Body, Bytes},
    extract::{Extension, rejection::BytesRejection},
    http::{HeaderMap, HeaderValue, Method, Request, header::CONTENT_TYPE, header::HeaderName},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{any, get},
};
use dispo_core::{cors_headers, now_iso, relay_headers};
use serde_json::json;
use uuid::Uuid;

use crate::relay::{Relay, RelayReply, parse_body};

pub const DISPOSITION_PATH: &str = "/disposition-handler";
pub const SERVICE_NAME: &str = "Call Disposition Relay";

/// Builds the router for the long-running server deployment.
///
/// Preflights are answered on every path, and every response, including
/// ones axum produces itself, carries the CORS headers.
pub fn build_router(relay: Relay) -> Router {
    Router::new()
        .route("/", get(health))
        .route(DISPOSITION_PATH, any(disposition))
        .layer(middleware::from_fn(answer_preflight))
        .layer(middleware::map_response(with_cors))
        .layer(middleware::from_fn(with_request_id))
        .layer(Extension(Arc::new(relay)))
}

async fn disposition(
    Extension(relay): Extension<Arc<Relay>>,
    method: Method,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> RelayReply {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!(
                status = %rejection.status(),
                "unreadable request body treated as empty"
            );
            Bytes::new()
        }
    };
    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    let record = parse_body(content_type, &body);
    relay.handle(&method, record).await
}

async fn answer_preflight(req: Request<Body>, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        return RelayReply::preflight().into_response();
    }
    next.run(req).await
}

async fn with_cors(mut res: Response) -> Response {
    for (name, value) in cors_headers() {
        res.headers_mut().entry(name).or_insert(value);
    }
    res
}

async fn health() -> impl IntoResponse {
    (
        relay_headers(),
        Json(json!({
            "status": "ok",
            "service": SERVICE_NAME,
            "timestamp": now_iso(),
        })),
    )
}

impl IntoResponse for RelayReply {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body_string()));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers();
        response
    }
}

async fn with_request_id(mut req: Request<Body>, next: Next) -> Response {
    let rid = Uuid::new_v4().to_string();
    req.extensions_mut().insert(rid.clone());

    let span = tracing::info_span!(
        "http.request",
        request_id = %rid,
        method = %req.method(),
        path = %req.uri().path()
    );
    let mut res = tracing::Instrument::instrument(next.run(req), span).await;
    if let Ok(value) = HeaderValue::from_str(&rid) {
        res.headers_mut()
            .insert(HeaderName::from_static("x-request-id"), value);
    }
    res
}
