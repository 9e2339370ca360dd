//! Typed reads out of an untyped JSON object.
//!
//! Used by the dynamic decoder. A read either yields the requested type,
//! reports the key as absent, or reports it as present with the wrong shape.
//! Soft reads collapse both failures to `None` so the caller can substitute
//! its default.

use crate::error::{DecodeError, JsonKind, Result};
use serde_json::{Map, Value};

pub type JsonMap = Map<String, Value>;

/// A type that can be borrowed or copied out of a JSON value.
pub trait FromJson<'a>: Sized {
    const EXPECTED: JsonKind;

    fn from_json(value: &'a Value) -> Option<Self>;
}

impl<'a> FromJson<'a> for f64 {
    const EXPECTED: JsonKind = JsonKind::Number;

    fn from_json(value: &'a Value) -> Option<Self> {
        // Whole numbers are valid wherever a float is expected.
        value.as_f64()
    }
}

impl<'a> FromJson<'a> for i64 {
    const EXPECTED: JsonKind = JsonKind::Integer;

    fn from_json(value: &'a Value) -> Option<Self> {
        value.as_i64()
    }
}

impl<'a> FromJson<'a> for bool {
    const EXPECTED: JsonKind = JsonKind::Boolean;

    fn from_json(value: &'a Value) -> Option<Self> {
        value.as_bool()
    }
}

impl<'a> FromJson<'a> for String {
    const EXPECTED: JsonKind = JsonKind::String;

    fn from_json(value: &'a Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl<'a> FromJson<'a> for &'a JsonMap {
    const EXPECTED: JsonKind = JsonKind::Object;

    fn from_json(value: &'a Value) -> Option<Self> {
        value.as_object()
    }
}

impl<'a> FromJson<'a> for &'a [Value] {
    const EXPECTED: JsonKind = JsonKind::Array;

    fn from_json(value: &'a Value) -> Option<Self> {
        value.as_array().map(Vec::as_slice)
    }
}

pub trait FieldAccess {
    /// Hard read: absence and wrong shape are both errors.
    fn required<'a, T: FromJson<'a>>(&'a self, key: &str) -> Result<T>;

    /// Soft read: any failure becomes `None`.
    fn optional<'a, T: FromJson<'a>>(&'a self, key: &str) -> Option<T>;

    /// The value under `key`, whatever its shape.
    fn raw(&self, key: &str) -> Result<&Value>;
}

impl FieldAccess for JsonMap {
    fn required<'a, T: FromJson<'a>>(&'a self, key: &str) -> Result<T> {
        let value = self.raw(key)?;
        T::from_json(value)
            .ok_or_else(|| DecodeError::mismatch(key, T::EXPECTED, JsonKind::of(value)))
    }

    fn optional<'a, T: FromJson<'a>>(&'a self, key: &str) -> Option<T> {
        match self.required(key) {
            Ok(value) => Some(value),
            Err(DecodeError::MissingKey { .. }) => None,
            Err(err) => {
                tracing::trace!(%err, "soft field replaced by default");
                None
            }
        }
    }

    fn raw(&self, key: &str) -> Result<&Value> {
        self.get(key).ok_or_else(|| DecodeError::missing(key))
    }
}
