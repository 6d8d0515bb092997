//! Error types for the storefront engine.
//!
//! One enum per domain:
//!
//! - [`HandleError`] - rejected catalog handles
//! - [`StorageError`] - persistent key/value store writes
//! - [`FetchError`] - remote catalog requests
//! - [`CacheError`] - catalog cache lookups and persistence
//! - [`RenderError`] - missing mounts in the page shell
//! - [`NavigationError`] - everything a router transition can hit

use thiserror::Error;

use crate::storage::Namespace;

/// A string that is not a valid catalog handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandleError {
    #[error("handle is empty")]
    Empty,
    #[error("handle '{0}' is not a URL-safe slug")]
    Invalid(String),
}

/// Persistent store write errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// localStorage not available (private mode, disabled storage).
    #[error("persistent storage not available")]
    Unavailable,
    /// Failed to serialize a namespace to JSON.
    #[error("failed to serialize {0}")]
    Serialize(String),
    /// Failed to write to storage (quota exceeded, security error).
    #[error("failed to write '{key}' to storage")]
    WriteFailed { key: String },
}

/// Remote catalog request errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Browser window not available
    #[error("browser window not available")]
    NoWindow,
    /// Failed to build the HTTP request
    #[error("failed to create request")]
    RequestCreationFailed,
    /// Network request failed (CORS, offline, etc.)
    #[error("network error: {0}")]
    Network(String),
    /// HTTP error response (non-2xx status)
    #[error("HTTP error: {0}")]
    Http(u16),
    /// Request timed out
    #[error("request timed out")]
    Timeout,
    /// Failed to read or decode the response body
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// The API answered with GraphQL errors
    #[error("catalog API error: {0}")]
    Graphql(String),
    /// The API answered but the entity does not exist
    #[error("{kind} '{handle}' not found")]
    NotFound { kind: &'static str, handle: String },
}

/// Catalog cache errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// `get` was called for a handle the namespace does not hold.
    #[error("{namespace} has no entry for '{handle}'")]
    Miss { namespace: Namespace, handle: String },
    /// The in-memory write succeeded but could not be persisted.
    #[error("cache write not persisted: {0}")]
    Persist(#[from] StorageError),
}

/// Page shell integration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// A mount the templates expect is not in the document.
    #[error("mount '{0}' missing from the page shell")]
    MissingMount(&'static str),
}

/// Errors a router transition can end with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error(transparent)]
    Render(#[from] RenderError),
}
