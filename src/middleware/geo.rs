//! Location tagger stage: attaches a `LocationTag` to the request.
//!
//! The peer address comes from `ConnectInfo<SocketAddr>`, present when the
//! server is started with `into_make_service_with_connect_info`.

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

pub async fn tag_location(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let tag = state.tagger.tag_request(req.headers(), peer);
    tracing::debug!(location = %tag, "request location tagged");

    req.extensions_mut().insert(tag);
    next.run(req).await
}
