use crate::core::ports::{PublishError, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("validation rejected: {0}")]
    Validation(String),

    #[error("order {id} already exists")]
    AlreadyExists { id: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error("unexpected: {0}")]
    Unexpected(String),
}
