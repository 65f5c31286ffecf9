//! Error types for the fieldmap engine.
//!
//! Every failure surfaces synchronously to the caller that triggered it:
//! construction problems come back from `MapperContainer::new`, synthesis
//! problems from the first lookup (or batch registration) of a record type,
//! and coercion or carrier problems from the mapping call itself.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::plan::Direction;
use crate::value::{FieldType, ValueKind};

/// Boxed error type accepted from carriers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for fieldmap operations.
#[derive(Debug, Error)]
pub enum MapperError {
    /// The accessor supplied at construction has the wrong shape.
    #[error("{0}")]
    ContractViolation(#[from] ContractViolation),

    /// A field plan could not be turned into a mapper.
    #[error("{0}")]
    Synthesis(#[from] SynthesisError),

    /// A carrier value did not match the declared field type.
    #[error("{0}")]
    Coercion(#[from] CoercionError),

    /// The accessor itself failed.
    #[error(transparent)]
    Carrier(#[from] CarrierError),

    /// A mapper was applied in the direction it was not built for.
    #[error("Mapper for '{record}' maps {actual}, but was applied as {expected}")]
    DirectionMismatch {
        /// The record type name.
        record: &'static str,
        /// The direction the caller asked for.
        expected: Direction,
        /// The direction the mapper was synthesized for.
        actual: Direction,
    },
}

impl MapperError {
    /// Returns the stable error code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ContractViolation(_) => codes::CONTRACT,
            Self::Synthesis(_) => codes::SYNTHESIS,
            Self::Coercion(_) => codes::COERCION,
            Self::Carrier(_) => codes::CARRIER,
            Self::DirectionMismatch { .. } => codes::DIRECTION,
        }
    }

    /// Builds structured diagnostics for this error.
    #[must_use]
    pub fn info(&self) -> ErrorInfo {
        let info = ErrorInfo::new(self.code(), self.to_string());
        let info = match suggestion(self.code()) {
            Some(hint) => info.with_fix_hint(hint),
            None => info,
        };

        match self {
            Self::ContractViolation(err) => info
                .with_context("direction", serde_json::json!(err.direction.to_string()))
                .with_context("signature", serde_json::json!(err.signature)),
            Self::Synthesis(err) => info.with_context("record", serde_json::json!(err.record)),
            Self::Coercion(err) => info
                .with_context("record", serde_json::json!(err.record))
                .with_context("field", serde_json::json!(err.field))
                .with_context("expected", serde_json::json!(err.expected.to_string()))
                .with_context("found", serde_json::json!(err.found.to_string())),
            Self::Carrier(err) => match err.key() {
                Some(key) => info.with_context("key", serde_json::json!(key)),
                None => info,
            },
            Self::DirectionMismatch { record, .. } => {
                info.with_context("record", serde_json::json!(record))
            }
        }
    }

    /// Returns true if the error was raised while applying a mapper.
    #[must_use]
    pub const fn is_per_call(&self) -> bool {
        matches!(
            self,
            Self::Coercion(_) | Self::Carrier(_) | Self::DirectionMismatch { .. }
        )
    }
}

/// Error raised when an accessor does not take exactly one string key.
#[derive(Debug, Clone, Error)]
#[error("Invalid {direction} accessor {signature}: {reason}")]
pub struct ContractViolation {
    /// Direction of the rejected accessor.
    pub direction: Direction,
    /// Rendered key signature of the rejected accessor.
    pub signature: String,
    /// Why the accessor was rejected.
    pub reason: String,
}

impl ContractViolation {
    /// Creates a new contract violation.
    #[must_use]
    pub fn new(
        direction: Direction,
        signature: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            direction,
            signature: signature.into(),
            reason: reason.into(),
        }
    }
}

/// Error raised when a field plan cannot be turned into a mapper.
#[derive(Debug, Clone, Error)]
#[error("Cannot synthesize mapper for '{record}': {reason}")]
pub struct SynthesisError {
    /// The record type name.
    pub record: &'static str,
    /// Why synthesis failed.
    pub reason: String,
}

impl SynthesisError {
    /// Creates a new synthesis error.
    #[must_use]
    pub fn new(record: &'static str, reason: impl Into<String>) -> Self {
        Self {
            record,
            reason: reason.into(),
        }
    }
}

/// Error raised when a carrier value cannot be cast to the declared field type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Field '{record}.{field}' expects {expected}, carrier yielded {found}")]
pub struct CoercionError {
    /// The record type name.
    pub record: &'static str,
    /// The field being mapped.
    pub field: &'static str,
    /// The declared field type.
    pub expected: FieldType,
    /// The kind of value the carrier produced.
    pub found: ValueKind,
}

impl CoercionError {
    /// Creates a new coercion error.
    #[must_use]
    pub const fn new(
        record: &'static str,
        field: &'static str,
        expected: FieldType,
        found: ValueKind,
    ) -> Self {
        Self {
            record,
            field,
            expected,
            found,
        }
    }
}

/// Errors raised by carriers through their accessor.
#[derive(Debug, Error)]
pub enum CarrierError {
    /// The carrier has no value under the key.
    #[error("Key not found in carrier: {key}")]
    MissingKey {
        /// The missing key.
        key: String,
    },

    /// The carrier refused the read or write.
    #[error("Carrier rejected key '{key}': {reason}")]
    Rejected {
        /// The key involved.
        key: String,
        /// The reason given by the carrier.
        reason: String,
    },

    /// Any other carrier failure.
    #[error(transparent)]
    Other(#[from] BoxError),
}

impl CarrierError {
    /// Creates a missing key error.
    #[must_use]
    pub fn missing_key(key: impl Into<String>) -> Self {
        Self::MissingKey { key: key.into() }
    }

    /// Creates a rejected error.
    #[must_use]
    pub fn rejected(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Returns the key involved, when known.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::MissingKey { key } | Self::Rejected { key, .. } => Some(key),
            Self::Other(_) => None,
        }
    }
}

/// Structured metadata for surfaced mapper errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorInfo {
    /// Stable error code.
    pub code: String,
    /// Human-readable description of the issue.
    pub summary: String,
    /// Optional remediation guidance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix_hint: Option<String>,
    /// Structured data about the failure.
    #[serde(default)]
    pub context: HashMap<String, serde_json::Value>,
}

impl ErrorInfo {
    /// Creates a new error info.
    #[must_use]
    pub fn new(code: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            summary: summary.into(),
            fix_hint: None,
            context: HashMap::new(),
        }
    }

    /// Adds a fix hint.
    #[must_use]
    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }

    /// Adds context data.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.context.insert(key.into(), value);
        self
    }

    /// Serialize the metadata for logging or API responses.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut dict = HashMap::new();
        dict.insert("code".to_string(), serde_json::json!(self.code));
        dict.insert("summary".to_string(), serde_json::json!(self.summary));
        dict.insert("fix_hint".to_string(), serde_json::json!(self.fix_hint));
        dict.insert("context".to_string(), serde_json::json!(self.context));
        dict
    }
}

/// Stable mapper error codes.
pub mod codes {
    /// Accessor shape rejected at construction.
    pub const CONTRACT: &str = "MAPPER-001-CONTRACT";
    /// Mapper synthesis failed.
    pub const SYNTHESIS: &str = "MAPPER-002-SYNTHESIS";
    /// Field value did not match the declared type.
    pub const COERCION: &str = "MAPPER-003-COERCION";
    /// Accessor raised an error.
    pub const CARRIER: &str = "MAPPER-004-CARRIER";
    /// Mapper applied in the wrong direction.
    pub const DIRECTION: &str = "MAPPER-005-DIRECTION";
}

fn suggestion(code: &str) -> Option<&'static str> {
    match code {
        codes::CONTRACT => Some(
            "Pass an accessor that takes the carrier and a single string key, \
             e.g. `Accessor::read_fn(|row, key| row.get(key))`.",
        ),
        codes::SYNTHESIS => Some(
            "Check the record's field descriptors: read mappers need setters, \
             write mappers need getters.",
        ),
        codes::COERCION => Some(
            "Make the carrier yield the field's declared kind, or declare the \
             field as Option<_> if the carrier can yield Null.",
        ),
        codes::DIRECTION => Some(
            "Use read_into for containers built with a read accessor and \
             write_from for containers built with a write accessor.",
        ),
        _ => None,
    }
}
