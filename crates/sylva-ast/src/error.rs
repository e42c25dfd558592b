//! Error types for node validation and decoding

use thiserror::Error;

/// What the mismatching value was checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A single value
    Value,
    /// A sequence was expected but something else was given
    Array,
    /// A sequence was given but one of its elements is not allowed
    ArrayElement,
}

/// A validated setter received a value outside its allowed variant set.
///
/// Raised at the point of the call and never deferred; the target keeps its
/// previous state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "argument passed to {operation} must be {}, {} given",
    expected_phrase(.allowed, .allow_null, .shape),
    actual_phrase(.actual, .shape)
)]
pub struct TypeMismatch {
    /// The operation that rejected the value, e.g. `BinaryExpression.left`
    pub operation: String,
    /// Names of the permitted variants
    pub allowed: Vec<String>,
    /// Whether null would have been accepted
    pub allow_null: bool,
    /// Runtime type of the rejected value (or element)
    pub actual: String,
    pub shape: Shape,
}

impl TypeMismatch {
    pub fn new(
        operation: impl Into<String>,
        allowed: &[&str],
        allow_null: bool,
        actual: impl Into<String>,
        shape: Shape,
    ) -> Self {
        Self {
            operation: operation.into(),
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
            allow_null,
            actual: actual.into(),
            shape,
        }
    }

    /// True when an element of a sequence was rejected
    pub fn is_element_mismatch(&self) -> bool {
        self.shape == Shape::ArrayElement
    }

    pub fn code(&self) -> &'static str {
        match self.shape {
            Shape::Value => "E-TYPE-001",
            Shape::Array => "E-TYPE-002",
            Shape::ArrayElement => "E-TYPE-003",
        }
    }
}

fn expected_phrase(allowed: &[String], allow_null: &bool, shape: &Shape) -> String {
    let mut phrase = String::new();
    if *shape != Shape::Value {
        phrase.push_str("an array of ");
    }
    phrase.push_str(&allowed.join(" or "));
    if *allow_null {
        phrase.push_str(" or null");
    }
    phrase
}

fn actual_phrase(actual: &str, shape: &Shape) -> String {
    match shape {
        Shape::ArrayElement => format!("array of {}", actual),
        _ => actual.to_string(),
    }
}

/// Errors from building a tree out of untyped JSON
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error(transparent)]
    TypeMismatch(#[from] TypeMismatch),

    /// The value has the right type but is not one of the accepted values
    #[error("invalid value for {operation}: {value}")]
    InvalidValue { operation: String, value: String },
}

impl DecodeError {
    pub fn code(&self) -> &'static str {
        match self {
            DecodeError::TypeMismatch(e) => e.code(),
            DecodeError::InvalidValue { .. } => "E-DECODE-001",
        }
    }

    pub fn operation(&self) -> &str {
        match self {
            DecodeError::TypeMismatch(e) => &e.operation,
            DecodeError::InvalidValue { operation, .. } => operation,
        }
    }
}
