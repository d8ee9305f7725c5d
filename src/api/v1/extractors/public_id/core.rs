/*
 * Responsibility
 * - take the path segment as a public id and decode it to the internal key
 * - an id that does not decode names nothing: 404, same as a missing row
 * - generic over a tag type so post ids can't be mixed with other ids
 */
use std::marker::PhantomData;

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::AppError;
use crate::state::AppState;

/// A resource addressed by public id; `NAME` is used in not-found messages.
pub trait PublicResource {
    const NAME: &'static str;
}

pub struct PublicId<T> {
    pub id: i64,
    _marker: PhantomData<T>,
}

impl<T> PublicId<T> {
    fn new(id: i64) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }
}

impl<T> FromRequestParts<AppState> for PublicId<T>
where
    T: PublicResource + Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(public_id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::not_found(T::NAME))?;

        let id = state.id_codec.decode(&public_id).map_err(|err| {
            tracing::debug!(error = %err, public_id = %public_id, "undecodable public id");
            AppError::not_found(T::NAME)
        })?;

        Ok(Self::new(id))
    }
}

impl<T> std::fmt::Debug for PublicId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicId").field("id", &self.id).finish()
    }
}
