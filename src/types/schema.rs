//! All-or-nothing structural validation
//!
//! A [`Schema`] type declares its field rules against a [`Checker`]. The
//! checker records every violation it finds instead of stopping at the
//! first one; only a payload with no violations is deserialized.
//!
//! ```
//! use serde::Deserialize;
//! use userdesk_sdk::types::{Checker, Schema, parse};
//!
//! #[derive(Deserialize)]
//! struct Tag {
//!     name: String,
//! }
//!
//! impl Schema for Tag {
//!     fn check(v: &mut Checker<'_>) {
//!         v.string_min("name", 1, "Name is required");
//!     }
//! }
//!
//! let err = parse::<Tag>(serde_json::json!({})).err().unwrap();
//! assert!(err.has_violation("name"));
//! ```

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{FieldViolation, SchemaError};

/// A payload type with declarative field rules
pub trait Schema: DeserializeOwned {
    /// Declare the rules for this type's fields
    fn check(v: &mut Checker<'_>);
}

/// Validate `raw` against `T`'s rules, then deserialize it
///
/// # Errors
///
/// Returns a [`SchemaError`] listing every violation when `raw` does not
/// conform.
pub fn parse<T: Schema>(raw: Value) -> Result<T, SchemaError> {
    let mut violations = Vec::new();
    {
        let mut checker = Checker::root(&raw, &mut violations);
        T::check(&mut checker);
    }
    if !violations.is_empty() {
        return Err(SchemaError { violations });
    }

    serde_json::from_value(raw).map_err(|e| SchemaError {
        violations: vec![FieldViolation {
            path: String::new(),
            message: e.to_string(),
        }],
    })
}

/// Collects violations for one object in a payload
pub struct Checker<'a> {
    object: Option<&'a Map<String, Value>>,
    prefix: String,
    violations: &'a mut Vec<FieldViolation>,
}

impl<'a> Checker<'a> {
    fn root(raw: &'a Value, violations: &'a mut Vec<FieldViolation>) -> Self {
        let object = raw.as_object();
        if object.is_none() {
            violations.push(FieldViolation {
                path: String::new(),
                message: "Expected object".to_string(),
            });
        }
        Self {
            object,
            prefix: String::new(),
            violations,
        }
    }

    fn path(&self, field: &str) -> String {
        if self.prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{field}", self.prefix)
        }
    }

    /// Record a violation against `field`
    pub fn violation(&mut self, field: &str, message: impl Into<String>) {
        let path = self.path(field);
        self.violations.push(FieldViolation {
            path,
            message: message.into(),
        });
    }

    /// The field's value, treating `null` as absent
    #[must_use]
    pub fn value(&self, field: &str) -> Option<&'a Value> {
        self.object
            .and_then(|o| o.get(field))
            .filter(|v| !v.is_null())
    }

    fn required(&mut self, field: &str) -> Option<&'a Value> {
        // A non-object parent has already been reported
        self.object?;
        let value = self.value(field);
        if value.is_none() {
            self.violation(field, "Required");
        }
        value
    }

    fn typed<T>(
        &mut self,
        field: &str,
        expected: &str,
        extract: impl Fn(&'a Value) -> Option<T>,
    ) -> Option<T> {
        let value = self.required(field)?;
        let extracted = extract(value);
        if extracted.is_none() {
            self.violation(field, format!("Expected {expected}"));
        }
        extracted
    }

    /// Required string
    pub fn string(&mut self, field: &str) -> Option<&'a str> {
        self.typed(field, "string", Value::as_str)
    }

    /// Required string of at least `min` characters
    pub fn string_min(&mut self, field: &str, min: usize, message: &str) -> Option<&'a str> {
        let s = self.string(field)?;
        if s.chars().count() < min {
            self.violation(field, message);
            return None;
        }
        Some(s)
    }

    /// Optional string; type checked when present
    pub fn optional_string(&mut self, field: &str) -> Option<&'a str> {
        self.value(field)?;
        self.string(field)
    }

    /// Required number
    pub fn number(&mut self, field: &str) -> Option<f64> {
        self.typed(field, "number", Value::as_f64)
    }

    /// Required whole number that fits in a `u64`
    pub fn unsigned(&mut self, field: &str) -> Option<u64> {
        self.typed(field, "non-negative integer", Value::as_u64)
    }

    /// Required whole number that fits in a `u32`
    pub fn unsigned32(&mut self, field: &str) -> Option<u32> {
        self.typed(field, "non-negative integer", |v| {
            v.as_u64().and_then(|n| u32::try_from(n).ok())
        })
    }

    /// Optional whole number that fits in a `u32`; checked when present
    pub fn optional_unsigned32(&mut self, field: &str) -> Option<u32> {
        self.value(field)?;
        self.unsigned32(field)
    }

    /// Required `u32` no smaller than `min`
    pub fn unsigned32_min(&mut self, field: &str, min: u32, message: &str) -> Option<u32> {
        let n = self.unsigned32(field)?;
        if n < min {
            self.violation(field, message);
            return None;
        }
        Some(n)
    }

    /// `u32` given either as a JSON number or a numeric string, no smaller
    /// than `min`
    pub fn coerced_unsigned32_min(&mut self, field: &str, min: u32, message: &str) -> Option<u32> {
        let n = self.typed(field, "non-negative integer", coerce_u32)?;
        if n < min {
            self.violation(field, message);
            return None;
        }
        Some(n)
    }

    /// Required boolean
    pub fn boolean(&mut self, field: &str) -> Option<bool> {
        self.typed(field, "boolean", Value::as_bool)
    }

    /// Required boolean that must be `true`
    pub fn must_be_true(&mut self, field: &str, message: &str) {
        if self.boolean(field) == Some(false) {
            self.violation(field, message);
        }
    }

    /// Required email address
    pub fn email(&mut self, field: &str, message: &str) -> Option<&'a str> {
        let s = self.string(field)?;
        if !is_email(s) {
            self.violation(field, message);
            return None;
        }
        Some(s)
    }

    /// Required absolute URL
    pub fn url(&mut self, field: &str) -> Option<&'a str> {
        let s = self.string(field)?;
        if url::Url::parse(s).is_err() {
            self.violation(field, "Invalid url");
            return None;
        }
        Some(s)
    }

    /// Required string drawn from `allowed`
    pub fn one_of(&mut self, field: &str, allowed: &[&str]) -> Option<&'a str> {
        let s = self.string(field)?;
        if !allowed.contains(&s) {
            let expected = allowed
                .iter()
                .map(|a| format!("'{a}'"))
                .collect::<Vec<_>>()
                .join(" | ");
            self.violation(
                field,
                format!("Invalid enum value. Expected {expected}, received '{s}'"),
            );
            return None;
        }
        Some(s)
    }

    /// Optional string drawn from `allowed`; checked when present
    pub fn optional_one_of(&mut self, field: &str, allowed: &[&str]) -> Option<&'a str> {
        self.value(field)?;
        self.one_of(field, allowed)
    }

    /// Required nested object, checked with `rules`
    pub fn object(&mut self, field: &str, rules: impl FnOnce(&mut Checker<'_>)) {
        let Some(value) = self.required(field) else {
            return;
        };
        let Some(object) = value.as_object() else {
            self.violation(field, "Expected object");
            return;
        };
        let prefix = self.path(field);
        let mut nested = Checker {
            object: Some(object),
            prefix,
            violations: &mut *self.violations,
        };
        rules(&mut nested);
    }

    /// Optional nested object; checked with `rules` when present
    pub fn optional_object(&mut self, field: &str, rules: impl FnOnce(&mut Checker<'_>)) {
        if self.value(field).is_some() {
            self.object(field, rules);
        }
    }

    /// Required array whose elements each satisfy `T`'s rules
    pub fn array_of<T: Schema>(&mut self, field: &str) {
        let Some(items) = self.typed(field, "array", Value::as_array) else {
            return;
        };
        let base = self.path(field);
        for (index, item) in items.iter().enumerate() {
            let prefix = format!("{base}.{index}");
            match item.as_object() {
                Some(object) => {
                    let mut nested = Checker {
                        object: Some(object),
                        prefix,
                        violations: &mut *self.violations,
                    };
                    T::check(&mut nested);
                }
                None => self.violations.push(FieldViolation {
                    path: prefix,
                    message: "Expected object".to_string(),
                }),
            }
        }
    }

    /// Required array of strings with at least `min` elements
    pub fn string_array_min(&mut self, field: &str, min: usize, message: &str) {
        let Some(items) = self.typed(field, "array", Value::as_array) else {
            return;
        };
        if items.iter().any(|i| !i.is_string()) {
            self.violation(field, "Expected array of strings");
        } else if items.len() < min {
            self.violation(field, message);
        }
    }
}

/// Read a `u32` from a JSON number, numeric string or boolean
///
/// A blank string reads as zero.
#[must_use]
pub fn coerce_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) if s.trim().is_empty() => Some(0),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(u32::from(*b)),
        _ => None,
    }
}

/// Loose structural email check: `local@domain.tld`, no whitespace
#[must_use]
pub fn is_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}
