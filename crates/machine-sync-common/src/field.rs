//! Field paths and field-scoped validation errors
//!
//! A [`Path`] names a field inside a resource (e.g. `spec.network` or
//! `metadata.labels[tier]`). A [`FieldError`] pairs a path with the kind of
//! failure, the offending value and a human-readable detail. Errors for
//! independent fields are collected into an [`ErrorList`] rather than
//! returned one at a time.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// A list of field errors collected across independent fields
pub type ErrorList = Vec<FieldError>;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Field(String),
    Key(String),
}

/// Path to a field within a resource
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// Create a root path (e.g. `Path::new("spec")`)
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::Field(name.into())],
        }
    }

    /// Path of a named child field
    pub fn child(&self, name: impl Into<String>) -> Self {
        self.with(Segment::Field(name.into()))
    }

    /// Path of a map entry
    pub fn key(&self, key: impl Into<String>) -> Self {
        self.with(Segment::Key(key.into()))
    }

    fn with(&self, segment: Segment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Field(name) if i == 0 => f.write_str(name)?,
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Key(key) => write!(f, "[{key}]")?,
            }
        }
        Ok(())
    }
}

/// Category of a field error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldErrorType {
    /// The value is present but cannot be used
    Invalid,
    /// The value is not one of the supported values
    NotSupported,
}

impl FieldErrorType {
    /// Human-readable description used when rendering errors
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldErrorType::Invalid => "Invalid value",
            FieldErrorType::NotSupported => "Unsupported value",
        }
    }
}

impl fmt::Display for FieldErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validation error scoped to a single field
#[derive(Clone, Debug, PartialEq)]
pub struct FieldError {
    /// Rendered path of the offending field (e.g. "spec.network")
    pub field: String,
    /// Category of the failure
    pub error_type: FieldErrorType,
    /// The offending value, `Value::Null` when absent
    pub bad_value: Value,
    /// Description of what is wrong
    pub detail: String,
}

impl FieldError {
    /// The value at `path` is present but cannot be converted
    pub fn invalid(path: &Path, value: impl Serialize, detail: impl Into<String>) -> Self {
        Self::new(FieldErrorType::Invalid, path, to_value(value), detail)
    }

    /// The value at `path` is not one of `supported`
    pub fn not_supported(path: &Path, value: impl Serialize, supported: &[&str]) -> Self {
        let detail = format!(
            "supported values: {}",
            supported
                .iter()
                .map(|s| format!("\"{s}\""))
                .collect::<Vec<_>>()
                .join(", ")
        );
        Self::new(FieldErrorType::NotSupported, path, to_value(value), detail)
    }

    fn new(
        error_type: FieldErrorType,
        path: &Path,
        bad_value: Value,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            field: path.to_string(),
            error_type,
            bad_value,
            detail: detail.into(),
        }
    }
}

fn to_value(value: impl Serialize) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.field, self.error_type, self.bad_value)?;
        if !self.detail.is_empty() {
            write!(f, ": {}", self.detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldError {}
