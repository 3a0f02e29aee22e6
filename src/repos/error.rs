/**
 * Responsibility
 * - What a repo reports upward (mapped to AppError in crate::error)
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("duplicate value for unique field `{field}`")]
    Duplicate { field: &'static str },
    #[error("collection `{collection}` lock poisoned")]
    Poisoned { collection: &'static str },
}
