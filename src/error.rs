//! Error types for the host bridge.
//!
//! ## Error Hierarchy
//!
//! ```text
//! BridgeError (surfaced to the engine as a TypeError)
//! ├── ConversionError - a value cannot take the requested host/script shape
//! ├── InvocationError - no matching member/constructor/method, illegal mutation
//! └── HostError       - raised by host-side closures at the call boundary
//! ```
//!
//! Every failure is scoped to the current script operation; nothing here is
//! fatal to the hosting process.

use thiserror::Error;

/// Result alias used across the bridge.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// A value cannot be represented as the requested host or script shape.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// Shape conflict between a value and the requested type.
    #[error("cannot convert {from} to type {to}")]
    Incompatible { from: String, to: String },

    /// Numeric value outside the target kind's range.
    #[error("integer overflow: {value} doesn't fit in {target_type}")]
    Overflow { value: String, target_type: String },

    /// Text that does not parse as the target kind.
    #[error("cannot parse '{text}' as {target_type}")]
    Parse { text: String, target_type: String },
}

impl ConversionError {
    pub(crate) fn incompatible(from: impl Into<String>, to: impl Into<String>) -> Self {
        ConversionError::Incompatible {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Member access or invocation could not be carried out.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvocationError {
    /// Strict write to a name that resolves to nothing.
    #[error("Unknown member: {name}")]
    UnknownMember { name: String },

    /// Strict write to a non-writable slot.
    #[error("cannot assign to read-only member '{name}'")]
    ReadOnly { name: String },

    /// Every constructor candidate failed or none matched the arguments.
    #[error("no public constructor of '{type_name}' matches the specified arguments")]
    NoMatchingConstructor { type_name: String },

    /// Every overload in a method group failed or none matched the arguments.
    #[error("no public method '{type_name}.{name}' matches the specified arguments")]
    NoMatchingMethod { type_name: String, name: String },

    /// Own properties cannot be defined on a type reference.
    #[error("can't define property '{name}' on type reference '{type_name}'")]
    DefineOnTypeReference { type_name: String, name: String },

    /// The callee is not a function.
    #[error("{what} is not a function")]
    NotCallable { what: String },

    /// The callee cannot be used with `new`.
    #[error("{what} is not a constructor")]
    NotConstructor { what: String },

    /// Iteration was requested on an object that is not array-like.
    #[error("{what} is not array-like")]
    NotArrayLike { what: String },

    /// A plain property could not be deleted.
    #[error("cannot delete non-configurable property '{name}'")]
    NotConfigurable { name: String },
}

/// Failures raised by host code while it runs on behalf of a script.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    /// Free-form failure reported by a host member.
    #[error("{0}")]
    Message(String),

    /// The instance handed to a member is not of the type it was registered for.
    #[error("host target mismatch: expected {expected}, got {actual}")]
    TargetMismatch { expected: String, actual: String },

    /// The instance is already borrowed further up the call stack.
    #[error("host instance of '{type_name}' is busy in an outer call")]
    Busy { type_name: String },

    /// A keyed lookup (indexer) found nothing.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// An argument was missing from a native call.
    #[error("missing argument {index}")]
    MissingArgument { index: usize },

    /// Host code panicked; the panic was contained at the call boundary.
    #[error("host member panicked: {0}")]
    Panicked(String),

    /// Argument extraction inside a host member failed.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

impl HostError {
    /// Convenience constructor for [`HostError::Message`].
    pub fn message(msg: impl Into<String>) -> Self {
        HostError::Message(msg.into())
    }
}

/// Umbrella error surfaced to the engine.
///
/// Every variant is reported as the engine's generic type-mismatch error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BridgeError {
    #[error("TypeError: {0}")]
    Conversion(#[from] ConversionError),

    #[error("TypeError: {0}")]
    Invocation(#[from] InvocationError),

    #[error("TypeError: {0}")]
    Host(#[from] HostError),
}

impl BridgeError {
    /// All bridge failures map to the engine's type-mismatch error.
    pub fn is_type_error(&self) -> bool {
        true
    }

    /// Get the conversion error if this is one.
    pub fn as_conversion(&self) -> Option<&ConversionError> {
        match self {
            BridgeError::Conversion(e) => Some(e),
            BridgeError::Host(HostError::Conversion(e)) => Some(e),
            _ => None,
        }
    }

    /// Get the invocation error if this is one.
    pub fn as_invocation(&self) -> Option<&InvocationError> {
        match self {
            BridgeError::Invocation(e) => Some(e),
            _ => None,
        }
    }
}
