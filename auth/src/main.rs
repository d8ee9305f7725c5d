//! Token issuer: checks a user's password and signs the HS256 access token
//! the resource server accepts.
mod api;
mod app;
mod config;
mod error;
mod repos;
mod services;
mod state;

use crate::error::AppError;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    app::run().await
}
