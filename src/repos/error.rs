/**
 * Responsibility
 * - the meaning a repo passes upward (conflict vs. backend failure)
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    #[error("conflict: {0}")]
    Conflict(&'static str),
}

impl RepoError {
    /// Map a unique violation (SQLSTATE 23505) to `Conflict`, everything else to `Db`.
    pub fn from_sqlx(e: sqlx::Error, what: &'static str) -> Self {
        if let sqlx::Error::Database(dbe) = &e
            && dbe.code().as_deref() == Some("23505")
        {
            return RepoError::Conflict(what);
        }
        RepoError::Db(e)
    }
}

pub type RepoResult<T> = Result<T, RepoError>;
