//! Bearer access-token gate -> `AuthCtx` in request extensions.
//!
//! The gate runs before the handler's extractors. A rejection short-circuits
//! with the matching `AppError`; on success the handler sees the resolved
//! identity through `AuthCtxExtractor`.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

/// Put the gate in front of every route of `router`.
///
/// ```ignore
/// let protected = Router::new().route("/posts", post(create_post));
/// let protected = middleware::auth::access::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // route_layer: unmatched paths still 404 instead of 401
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let identity = match state.gate.authorize(req.headers()).await {
        Ok(identity) => identity,
        Err(rejection) => {
            tracing::warn!(
                reason = rejection.as_str(),
                method = %req.method(),
                path = %req.uri().path(),
                "request rejected by access gate"
            );
            return Err(rejection.into());
        }
    };

    tracing::debug!(user_id = %identity.id, "request authorized");

    // middleware -> extractor
    req.extensions_mut().insert(AuthCtx::from(identity));

    Ok(next.run(req).await)
}
