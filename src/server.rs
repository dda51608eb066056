//! Thin HTTP listener in front of the tokenizer.
//!
//! One endpoint: `POST /parse-discord-markdown` takes a raw text body and
//! returns the JSON-serialized AST. No authentication, no content
//! negotiation; whatever the body bytes decode to as UTF-8 is the message.

use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::tokenizer::tokenize;

/// Assembles the router. Separated from [`serve`] so tests can drive it
/// directly with `tower::ServiceExt::oneshot`.
pub fn build_router() -> Router {
    Router::new()
        .route("/parse-discord-markdown", post(parse_markdown))
        .layer(TraceLayer::new_for_http())
}

/// Binds `addr` and serves requests until the process exits.
pub async fn serve(addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "chatmark listening");
    axum::serve(listener, build_router()).await
}

async fn parse_markdown(body: String) -> Response {
    match tokenize(&body) {
        Ok(ast) => Json(ast).into_response(),
        // Tokenize failures are rule-table defects, not bad requests.
        Err(e) => {
            tracing::error!(error = %e, "tokenize failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
