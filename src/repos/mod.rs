pub mod error;
pub mod post_repo;
pub mod user_repo;

pub use post_repo::{PgPostRepo, PostStore};
pub use user_repo::{PgUserRepo, UserStore};
