//! Error types for Ligand container operations.
//!
//! On-demand resolution fails fast with a [`LigandError`]. Bulk lifecycle
//! operations (bootstrap, destroy) collect their failures into a
//! [`LifecycleReport`](crate::lifecycle::LifecycleReport) instead.

use std::fmt;

use ligand_support::rendering::render_path;

use crate::key::TypeKey;

/// Error type returned by user constructors and lifecycle hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for all Ligand operations.
#[derive(Debug, thiserror::Error)]
pub enum LigandError {
    /// A binding was required but none matches the requested type.
    #[error("{}", .0)]
    NoBindingFound(NotBoundError),

    /// Neither an injectable nor a zero-argument constructor exists.
    #[error("No injectable constructor found for {key}\n  Hint: mark one constructor with .injectable() or declare a zero-argument one")]
    NoInjectableConstructor { key: TypeKey },

    /// More than one constructor carries the inject mark.
    #[error("Multiple injectable constructors found for {key} ({count} marked)")]
    AmbiguousConstructor { key: TypeKey, count: usize },

    /// No constructor accepts the explicit arguments.
    #[error("No suitable constructor found for {key} taking {arity} argument(s)")]
    NoSuitableConstructor { key: TypeKey, arity: usize },

    /// A constructor of the same type was re-entered in one resolution chain.
    #[error("{}", .0)]
    CircularDependency(CircularDependencyError),

    /// The resolution chain grew past the configured maximum.
    #[error("Resolution depth {depth} exceeded while resolving {key}")]
    DepthExceeded { key: TypeKey, depth: usize },

    /// A resolved object could not be viewed as the requested type.
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: TypeKey, actual: TypeKey },

    /// A constructor read an argument slot that holds no value.
    #[error("Missing argument {index} for a constructor of {key}")]
    MissingArgument { key: TypeKey, index: usize },

    /// A user constructor or factory returned an error.
    #[error("Failed to construct {key}: {source}")]
    ConstructionFailed {
        key: TypeKey,
        #[source]
        source: BoxError,
    },

    /// A lifecycle hook (post-construct, post-inject, pre-destroy) failed.
    #[error("Failed to invoke {key}::{member}: {source}")]
    InvocationFailed {
        key: TypeKey,
        member: &'static str,
        #[source]
        source: BoxError,
    },
}

impl LigandError {
    /// Wraps an error raised by user code while constructing `key`.
    ///
    /// Errors that are already a [`LigandError`] pass through unchanged so
    /// the root cause of a nested resolution stays visible.
    pub fn construction(key: TypeKey, source: BoxError) -> Self {
        match source.downcast::<LigandError>() {
            Ok(inner) => *inner,
            Err(source) => LigandError::ConstructionFailed { key, source },
        }
    }

    /// Wraps an error raised by the lifecycle hook `member` of `key`.
    pub fn invocation(key: TypeKey, member: &'static str, source: BoxError) -> Self {
        match source.downcast::<LigandError>() {
            Ok(inner) => *inner,
            Err(source) => LigandError::InvocationFailed { key, member, source },
        }
    }
}

/// Error when no binding matches a requested type.
#[derive(Debug)]
pub struct NotBoundError {
    /// The type that was requested
    pub requested: TypeKey,
    /// The type whose injection site asked for it (if any)
    pub required_by: Option<TypeKey>,
    /// Bound types with similar names
    pub suggestions: Vec<TypeKey>,
}

impl fmt::Display for NotBoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No binding found for {}", self.requested)?;

        if let Some(ref parent) = self.required_by {
            write!(f, "\n  Required by: {parent}")?;
        }

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        write!(
            f,
            "\n  Hint: bind it in a module with binder.bind_opaque::<{}>()",
            self.requested.simple_name()
        )
    }
}

/// Error when a constructor is re-entered within one resolution chain.
#[derive(Debug)]
pub struct CircularDependencyError {
    /// Types under construction, outermost first, ending with the
    /// type that closed the cycle.
    pub chain: Vec<TypeKey>,
}

impl fmt::Display for CircularDependencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.chain.iter().map(TypeKey::simple_name).collect();
        write!(f, "Circular constructor dependency detected:\n  {}", render_path(&names))?;
        write!(
            f,
            "\n  Hint: move one side of the cycle to an injected field"
        )
    }
}

/// Convenient Result type for Ligand operations.
pub type Result<T> = std::result::Result<T, LigandError>;
