//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent lookups against the layer model that cannot be satisfied.
/// The toggle engine itself never fails; these come from addressing services,
/// layers and menu entries that do not exist.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown service: {0}")]
    UnknownService(String),

    #[error("unknown layer {layer} in service {service}")]
    UnknownLayer { service: String, layer: i64 },

    #[error("menu entry is not checkable: {0}")]
    NotCheckable(String),

    #[error("stale menu entry")]
    StaleEntry,

    #[error("invalid map document: {0}")]
    InvalidDocument(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
