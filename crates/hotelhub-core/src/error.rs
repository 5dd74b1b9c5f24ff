//! Error types for the HotelHub system.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// The gateway operation that failed, used in [`HotelError::Remote`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayOp {
    List,
    GetById,
    Create,
    Update,
    Delete,
}

impl fmt::Display for GatewayOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GatewayOp::List => "list",
            GatewayOp::GetById => "fetch",
            GatewayOp::Create => "create",
            GatewayOp::Update => "update",
            GatewayOp::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Field-level validation messages, keyed by form field name.
///
/// Collects every violation of a form at once so the caller can show
/// them all together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation. A later message for the same field replaces
    /// the earlier one.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum HotelError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Failed to {operation} {entity}: {cause}")]
    Remote {
        operation: GatewayOp,
        entity: String,
        cause: String,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("A {entity} request is already in progress")]
    Busy { entity: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Normalization error: {0}")]
    Normalize(String),
}

impl HotelError {
    /// True for failures that originate from the record store rather
    /// than from local input.
    pub fn is_remote(&self) -> bool {
        matches!(self, HotelError::Remote { .. } | HotelError::Transport(_))
    }
}

pub type HotelResult<T> = Result<T, HotelError>;

/// A batch write where the store accepted some rows and rejected others.
///
/// Never returned to callers while at least one row succeeded; the
/// gateway logs it and hands back the accepted rows only.
#[derive(Debug, Error)]
#[error("{operation} on {entity}: {rejected} of {total} records rejected ({messages})", total = .accepted + .rejected, messages = .messages.join(", "))]
pub struct PartialWriteError {
    pub operation: GatewayOp,
    pub entity: &'static str,
    pub accepted: usize,
    pub rejected: usize,
    pub messages: Vec<String>,
}
