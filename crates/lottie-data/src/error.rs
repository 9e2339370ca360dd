//! Error types for Lottie document decoding.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// The JSON shape a field was found with (or was expected to have).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    Null,
    Boolean,
    Number,
    Integer,
    String,
    Array,
    Object,
}

impl JsonKind {
    /// Classify a parsed JSON value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => JsonKind::Null,
            Value::Bool(_) => JsonKind::Boolean,
            Value::Number(n) if n.is_i64() || n.is_u64() => JsonKind::Integer,
            Value::Number(_) => JsonKind::Number,
            Value::String(_) => JsonKind::String,
            Value::Array(_) => JsonKind::Array,
            Value::Object(_) => JsonKind::Object,
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JsonKind::Null => "null",
            JsonKind::Boolean => "boolean",
            JsonKind::Number => "number",
            JsonKind::Integer => "integer",
            JsonKind::String => "string",
            JsonKind::Array => "array",
            JsonKind::Object => "object",
        };
        f.write_str(name)
    }
}

/// Main error type for decoding operations.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// A required key is absent
    #[error("Missing required key `{key}`")]
    MissingKey { key: String },

    /// A required key is present with the wrong JSON shape
    #[error("Key `{key}` has the wrong type: expected {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: JsonKind,
        found: JsonKind,
    },

    /// Discriminator outside the closed set of a variant family
    #[error("Unrecognized {family} discriminator {tag}")]
    UnrecognizedVariant { family: &'static str, tag: i64 },

    /// Structural failure at the top level
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// Input is not valid JSON
    #[error("Invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),
}

/// Comparable classification of a [`DecodeError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    MissingKey(String),
    TypeMismatch(String),
    UnrecognizedVariant(&'static str),
    MalformedDocument,
    Syntax,
}

impl DecodeError {
    pub fn missing(key: impl Into<String>) -> Self {
        Self::MissingKey { key: key.into() }
    }

    pub fn mismatch(key: impl Into<String>, expected: JsonKind, found: JsonKind) -> Self {
        Self::TypeMismatch {
            key: key.into(),
            expected,
            found,
        }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedDocument(msg.into())
    }

    /// Error class plus the offending key, without the free-form detail.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::MissingKey { key } => ErrorKind::MissingKey(key.clone()),
            DecodeError::TypeMismatch { key, .. } => ErrorKind::TypeMismatch(key.clone()),
            DecodeError::UnrecognizedVariant { family, .. } => {
                ErrorKind::UnrecognizedVariant(family)
            }
            DecodeError::MalformedDocument(_) => ErrorKind::MalformedDocument,
            DecodeError::Syntax(_) => ErrorKind::Syntax,
        }
    }
}

/// Result type alias for decoding operations.
pub type Result<T> = std::result::Result<T, DecodeError>;
