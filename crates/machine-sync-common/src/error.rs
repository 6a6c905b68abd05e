//! Error types for machine-sync conversions
//!
//! Conversions never stop at the first bad field. Field-level failures are
//! collected as [`FieldError`]s and handed to the caller as a single
//! [`Aggregate`], which can be queried for each constituent error. The only
//! fail-fast case is a missing input object ([`Error::Precondition`]).

use std::fmt;

use thiserror::Error;

use crate::field::FieldError;

/// Main error type for machine-sync operations
#[derive(Debug, Error)]
pub enum Error {
    /// A required input object was not provided
    #[error("{message}")]
    Precondition {
        /// Which inputs were required
        message: String,
    },

    /// A single field could not be converted
    #[error(transparent)]
    Field(#[from] FieldError),

    /// The provider config could not be serialized into its envelope
    #[error("error marshalling providerSpec: {source}")]
    Encoding {
        /// The underlying serializer error
        #[source]
        source: serde_json::Error,
    },

    /// Serialization/deserialization error outside of payload encoding
    #[error("serialization error: {message}")]
    Serialization {
        /// Description of what failed
        message: String,
        /// The resource kind being (de)serialized, if known
        kind: Option<String>,
    },

    /// Several independent errors reported together
    #[error("{0}")]
    Aggregate(Aggregate),
}

impl Error {
    /// Create a precondition error with the given message
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition {
            message: msg.into(),
        }
    }

    /// Wrap a provider config serialization failure
    pub fn encoding(source: serde_json::Error) -> Self {
        Self::Encoding { source }
    }

    /// Create a serialization error with resource kind context
    pub fn serialization_for_kind(kind: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
            kind: Some(kind.into()),
        }
    }

    /// Merge `errors` into one aggregate error
    ///
    /// Nested aggregates are flattened so that every constituent is a leaf
    /// error. An empty list yields `None`: "no errors" is never represented
    /// as an empty aggregate.
    pub fn aggregate(errors: Vec<Error>) -> Option<Self> {
        Aggregate::new(errors).map(Self::Aggregate)
    }

    /// Returns true if this is a missing-input precondition failure
    pub fn is_precondition(&self) -> bool {
        matches!(self, Error::Precondition { .. })
    }

    /// Every field error carried by this error, in collection order
    pub fn field_errors(&self) -> Vec<&FieldError> {
        match self {
            Error::Field(err) => vec![err],
            Error::Aggregate(agg) => agg.field_errors().collect(),
            _ => Vec::new(),
        }
    }
}

/// A non-empty, flat list of errors reported as one
#[derive(Debug)]
pub struct Aggregate {
    errors: Vec<Error>,
}

impl Aggregate {
    /// Build an aggregate, flattening nested aggregates; `None` when empty
    pub fn new(errors: Vec<Error>) -> Option<Self> {
        let mut flat = Vec::with_capacity(errors.len());
        for err in errors {
            match err {
                Error::Aggregate(inner) => flat.extend(inner.errors),
                other => flat.push(other),
            }
        }
        if flat.is_empty() {
            None
        } else {
            Some(Self { errors: flat })
        }
    }

    /// The constituent errors
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    /// Number of constituent errors
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Constituent errors that are field errors
    pub fn field_errors(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter().filter_map(|err| match err {
            Error::Field(field) => Some(field),
            _ => None,
        })
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let [only] = self.errors.as_slice() {
            return write!(f, "{only}");
        }
        f.write_str("[")?;
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{err}")?;
        }
        f.write_str("]")
    }
}

impl IntoIterator for Aggregate {
    type Item = Error;
    type IntoIter = std::vec::IntoIter<Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}
