//! Error types for container operations.
//!
//! Every failure names the binding key it concerns and, where possible,
//! what to do about it.

use crate::key::BindingKey;
use std::fmt;

/// Main error type for all container operations.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// A required key has no binding.
    #[error("{}", .0)]
    NotBound(NotBoundError),

    /// A binding was configured twice, or resolved without a value source.
    #[error("{}", .0)]
    InvalidConfiguration(InvalidConfigurationError),

    /// The resolution stack revisited a key that is still in progress.
    #[error("{}", .0)]
    CycleDetected(CycleError),

    /// A constructor or provider returned an error.
    #[error("Failed to construct {key}: {source}")]
    ConstructionFailed {
        key: BindingKey,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A resolved instance could not be downcast to the requested type.
    #[error(
        "Type mismatch for {key}: expected {}",
        rabita_support::rendering::shorten_type_name(.expected)
    )]
    TypeMismatch {
        key: BindingKey,
        expected: &'static str,
    },
}

/// Error when a required key has no binding.
///
/// Includes "did you mean?" suggestions drawn from the registered keys.
#[derive(Debug)]
pub struct NotBoundError {
    /// The key that was requested
    pub requested: BindingKey,
    /// The binding whose resolution needed this key (if any)
    pub required_by: Option<BindingKey>,
    /// Registered keys with similar names
    pub suggestions: Vec<BindingKey>,
}

impl fmt::Display for NotBoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key not bound: {}", self.requested)?;

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
            "\n  Hint: Did you forget to call container.bind({:?})?",
            self.requested.name()
        )
    }
}

/// Error when a binding's configuration is inconsistent.
///
/// Raised when a second `to_*` source is set on one binding, and when a
/// binding with no source at all is resolved.
#[derive(Debug)]
pub struct InvalidConfigurationError {
    /// The misconfigured binding
    pub key: BindingKey,
    /// What went wrong
    pub detail: String,
}

impl fmt::Display for InvalidConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid binding configuration for {}: {}",
            self.key, self.detail,
        )?;
        write!(
            f,
            "\n  Hint: A binding takes exactly one of to_class, to_value, or to_provider"
        )
    }
}

/// Error when a dependency cycle is detected during resolution.
///
/// Shows the full chain so you can see WHERE the cycle closes.
#[derive(Debug)]
pub struct CycleError {
    /// The chain of keys that forms the cycle.
    /// Example: ["a", "b", "c", "a"]
    pub chain: Vec<BindingKey>,
}

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chain: Vec<&str> = self.chain.iter().map(|k| k.name()).collect();
        write!(
            f,
            "Cyclic dependency detected:\n  {}",
            rabita_support::rendering::render_chain(&chain)
        )?;
        write!(
            f,
            "\n  Hint: Break the cycle with a provider or restructure the dependencies"
        )
    }
}

/// Convenient Result type for container operations.
pub type Result<T> = std::result::Result<T, ContainerError>;
