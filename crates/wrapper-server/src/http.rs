//! HTTP/JSON front: `POST /api/v1/generate` plus the static OpenAPI docs.
//!
//! CORS wraps the whole router, so every path (including unknown ones)
//! answers preflight `OPTIONS` with 200 and carries the permissive headers.

use std::path::Path;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower::Layer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use wrapper_core::context::parse_grpc_timeout;
use wrapper_core::{ErrorCode, GatewayError, GenerateRequest, GenerateResponse, RequestContext};

use crate::service::GenerateService;

/// nginx's "client closed request".
const CLIENT_CLOSED_REQUEST: u16 = 499;

#[derive(Debug, Clone)]
pub struct HttpState {
    service: Arc<GenerateService>,
    force: CancellationToken,
}

impl HttpState {
    pub fn new(service: Arc<GenerateService>, force: CancellationToken) -> Self {
        Self { service, force }
    }

    fn request_context(&self, headers: &HeaderMap) -> RequestContext {
        let ctx = RequestContext::new(self.force.child_token());
        match headers
            .get("grpc-timeout")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_grpc_timeout)
        {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx,
        }
    }
}

/// Routes without the CORS wrapper. See [`serve`].
pub fn router(state: HttpState, docs_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/api/v1/generate", post(generate_text))
        .nest_service("/swagger", ServeDir::new(docs_dir.as_ref()))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn generate_text(
    State(state): State<HttpState>,
    headers: HeaderMap,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, HttpError> {
    let Json(request) =
        payload.map_err(|e| GatewayError::invalid_argument(e.body_text()))?;
    let ctx = state.request_context(&headers);
    let response = state.service.generate_text(&ctx, request).await?;
    Ok(Json(response))
}

/// Adds the CORS headers to every response and short-circuits preflight.
pub async fn cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization"),
    );
    response
}

/// Serve `router` (wrapped in [`cors`]) until `shutdown` is cancelled, then
/// drain open connections.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("HTTP server listening on {addr}");
    }

    let app = middleware::from_fn(cors).layer(router);
    axum::serve(
        listener,
        axum::ServiceExt::<Request>::into_make_service(app),
    )
    .with_graceful_shutdown(shutdown.cancelled_owned())
    .await
}

// ─────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────

/// JSON error body: `{"code": <grpc code>, "message": "..."}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    code: i32,
    message: String,
}

#[derive(Debug)]
pub struct HttpError(pub GatewayError);

impl From<GatewayError> for HttpError {
    fn from(err: GatewayError) -> Self {
        Self(err)
    }
}

pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidArgument => StatusCode::BAD_REQUEST,
        ErrorCode::Canceled => {
            StatusCode::from_u16(CLIENT_CLOSED_REQUEST).unwrap_or(StatusCode::REQUEST_TIMEOUT)
        }
        ErrorCode::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let code = self.0.code();
        let body = ErrorBody {
            code: code.as_i32(),
            message: self.0.to_string(),
        };
        (status_for(code), Json(body)).into_response()
    }
}
