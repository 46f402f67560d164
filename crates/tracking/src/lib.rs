use thiserror::Error;

pub mod assembler;
pub mod client;
pub mod database;
pub mod memory;
pub mod validation;
pub mod window;

pub use validation::ValidationError;

use database::DatabaseError;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("insert failed: {0}")]
    InsertFailed(#[source] DatabaseError),

    #[error("query failed: {0}")]
    QueryFailed(#[source] DatabaseError),

    #[error("composition failed: {0}")]
    Composition(#[source] serde_json::Error),
}

pub type RequestResult<O> = Result<O, RequestError>;
