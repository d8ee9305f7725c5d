/*
 * Responsibility
 * - URL layout of v1
 * - which routes sit behind the access gate and which get a location tag
 *
 * Stage order per request: [gate] -> [tagger] -> handler
 */
use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::{
    api::v1::handlers::{
        health::health,
        posts::{create_post, delete_post, get_post, list_posts, update_post},
        users::{create_user, get_user, list_users},
    },
    middleware::{auth::access, geo},
    state::AppState,
};

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/health", get(health))
        .route(
            "/posts",
            get(list_posts).route_layer(middleware::from_fn_with_state(
                state.clone(),
                geo::tag_location,
            )),
        )
        .route("/posts/{post_id}", get(get_post))
        .route("/users", get(list_users).post(create_user))
        .route("/users/{user_id}", get(get_user));

    let protected = Router::new()
        .route("/posts", post(create_post))
        .route("/posts/{post_id}", put(update_post).delete(delete_post));

    public.merge(access::apply(protected, state))
}
