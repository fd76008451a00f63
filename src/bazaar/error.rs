use crate::model::ListingStatus;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// A single template-validation failure, carrying enough structure for
/// callers to render per-field messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub kind: ViolationKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    UnknownField,
    MissingRequiredField,
    InvalidOption,
    InvalidType,
}

impl Violation {
    pub fn new(field: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self.kind {
            ViolationKind::UnknownField => "not part of this category's schema",
            ViolationKind::MissingRequiredField => "required field is missing",
            ViolationKind::InvalidOption => "value is not one of the allowed options",
            ViolationKind::InvalidType => "value has the wrong type",
        };
        write!(f, "{}: {}", self.field, reason)
    }
}

/// The complete set of violations from one validation pass. Validation never
/// stops at the first failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violations(pub Vec<Violation>);

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for v in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}", v)?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum MarketError {
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Category slug is already taken: {0}")]
    CategorySlugTaken(String),

    #[error("Moving category {0} under that parent would create a cycle")]
    CategoryCycle(Uuid),

    #[error("Category nesting is limited to {max} levels")]
    CategoryTooDeep { max: usize },

    #[error("Category {0} still has child categories or listings bound to it")]
    CategoryNotEmpty(String),

    #[error("Listing not found: {0}")]
    ListingNotFound(Uuid),

    #[error("Invalid specifications: {0}")]
    Validation(Violations),

    #[error("Listing {0} already carries a live promotion")]
    AlreadyPromoted(Uuid),

    #[error("Listing {0} is not active")]
    ListingNotActive(Uuid),

    #[error("Unknown promotion tier: {0}")]
    UnknownTier(String),

    #[error("Cannot {action} a listing in state {from}")]
    InvalidTransition {
        action: &'static str,
        from: ListingStatus,
    },

    #[error("Retention window has not elapsed for listing {0}")]
    RetentionWindowNotElapsed(Uuid),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, MarketError>;
