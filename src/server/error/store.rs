use std::time::Duration;

use thiserror::Error;

/// Failures raised by the document store and the repository layer.
///
/// "No matching document" is never one of these; lookups return `Ok(None)`.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store was unreachable or rejected the statement.
    ///
    /// Covers connection failures, constraint violations (e.g. a duplicate
    /// `_id` on insert) and malformed SQL produced by an aggregation pipeline.
    #[error("document store unavailable: {0}")]
    Unavailable(#[from] sea_orm::DbErr),

    /// The per-call deadline attached by the repository elapsed.
    #[error("document store call timed out after {0:?}")]
    Timeout(Duration),

    /// An entity or stored body could not be converted to or from JSON.
    #[error("failed to (de)serialize document: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A serialized entity is not a JSON object, or tries to change its `_id`.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// A filter, sort or update names a field that is not a valid path.
    #[error("invalid field path '{0}'")]
    InvalidField(String),

    /// An update expression is empty or touches the same field twice.
    #[error("invalid update: {0}")]
    InvalidUpdate(String),

    /// A value that should be an object id is not 24 hex characters.
    #[error("invalid object id '{0}'")]
    InvalidObjectId(String),
}
