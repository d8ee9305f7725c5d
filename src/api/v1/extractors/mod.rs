pub mod auth_ctx;
pub mod input;
pub mod public_id;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
pub use input::{AppJson, AppPath, AppQuery};
