/*
 * Responsibility
 * - /posts CRUD handlers
 * - path ids arrive decoded through PublicPostId
 * - create/update/delete run behind the access gate and receive AuthCtx;
 *   ownership (requester == author) is checked here before any write
 * - list reads the LocationTag the tagger stage attached
 */
use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::posts::{
            AuthorSummary, CreatePostRequest, DeletedResponse, ListPostsQuery,
            PostDetailResponse, PostResponse, UpdatePostRequest,
        },
        extractors::{AppJson, AppQuery, AuthCtxExtractor, public_id::PublicPostId},
    },
    error::AppError,
    repos::post_repo::{PostRow, PostWithAuthorRow},
    services::geo::LocationTag,
    state::AppState,
};

fn public_id(state: &AppState, post_id: i64) -> Result<String, AppError> {
    state.id_codec.encode(post_id).map_err(|e| {
        tracing::error!(error = %e, post_id, "failed to encode post id");
        AppError::Internal
    })
}

fn row_to_response(state: &AppState, row: PostRow) -> Result<PostResponse, AppError> {
    Ok(PostResponse {
        id: public_id(state, row.post_id)?,
        title: row.title,
        content: row.content,
        author_id: row.author_id,
        location: row.location,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn row_to_detail(state: &AppState, row: PostWithAuthorRow) -> Result<PostDetailResponse, AppError> {
    let post = row.post;
    Ok(PostDetailResponse {
        id: public_id(state, post.post_id)?,
        title: post.title,
        content: post.content,
        author: AuthorSummary {
            username: row.author_name,
        },
        location: post.location,
        created_at: post.created_at,
        updated_at: post.updated_at,
    })
}

pub async fn list_posts(
    State(state): State<AppState>,
    Extension(tag): Extension<LocationTag>,
    AppQuery(pairs): AppQuery<Vec<(String, String)>>,
) -> Result<Json<Vec<PostDetailResponse>>, AppError> {
    let query = ListPostsQuery::from_pairs(pairs);

    // an explicit ?location= wins over the address-derived tag
    let location = query.explicit_location().unwrap_or(tag.as_str());

    let rows = state.posts.list_by_location(location).await?;

    let res = rows
        .into_iter()
        .map(|row| row_to_detail(&state, row))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(res))
}

pub async fn create_post(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    AppJson(req): AppJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    req.validate().map_err(AppError::validation)?;

    // stamped from the author's stored location, not the request address
    let row = state
        .posts
        .create(
            &req.title,
            &req.content,
            auth.user_id,
            auth.location.as_deref(),
        )
        .await?;

    tracing::info!(post_id = row.post_id, author_id = %auth.user_id, "post created");

    let res = row_to_response(&state, row)?;
    Ok((StatusCode::CREATED, Json(res)))
}

pub async fn get_post(
    State(state): State<AppState>,
    post_id: PublicPostId,
) -> Result<Json<PostDetailResponse>, AppError> {
    let row = state
        .posts
        .get_with_author(post_id.id)
        .await?
        .ok_or(AppError::not_found("post"))?;

    Ok(Json(row_to_detail(&state, row)?))
}

pub async fn update_post(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    post_id: PublicPostId,
    AppJson(req): AppJson<UpdatePostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    let existing = state
        .posts
        .get(post_id.id)
        .await?
        .ok_or(AppError::not_found("post"))?;

    if !auth.owns(existing.author_id) {
        tracing::warn!(post_id = post_id.id, user_id = %auth.user_id, "update by non-owner refused");
        return Err(AppError::forbidden("update", "post"));
    }

    // order: 404, 403, then body checks
    req.validate().map_err(AppError::validation)?;

    // the store re-checks the author; a row gone since the read is a 404
    let row = state
        .posts
        .update(post_id.id, auth.user_id, &req.title, &req.content)
        .await?
        .ok_or(AppError::not_found("post"))?;

    Ok(Json(row_to_response(&state, row)?))
}

pub async fn delete_post(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    post_id: PublicPostId,
) -> Result<Json<DeletedResponse>, AppError> {
    let existing = state
        .posts
        .get(post_id.id)
        .await?
        .ok_or(AppError::not_found("post"))?;

    if !auth.owns(existing.author_id) {
        tracing::warn!(post_id = post_id.id, user_id = %auth.user_id, "delete by non-owner refused");
        return Err(AppError::forbidden("delete", "post"));
    }

    if !state.posts.delete(post_id.id, auth.user_id).await? {
        return Err(AppError::not_found("post"));
    }

    tracing::info!(post_id = post_id.id, author_id = %auth.user_id, "post deleted");

    Ok(Json(DeletedResponse {
        message: "Post deleted successfully",
    }))
}
