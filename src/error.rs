use thiserror::Error;

use crate::Id;

/// An error raised while building or loading map elements.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The data does not satisfy the structure required by an element.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A constructor is already registered for this subtype.
    #[error("Regulatory element subtype already registered: {0}")]
    AlreadyRegistered(String),

    /// Two elements, or two primitives of the same kind, share the same ID.
    #[error("Duplicate element ID: {0}")]
    DuplicateId(Id),

    /// A persisted element or primitive refers to a primitive that does not exist.
    #[error("Unknown {kind} {id}")]
    UnknownPrimitive { kind: &'static str, id: Id },
}

pub type Result<T> = std::result::Result<T, Error>;
