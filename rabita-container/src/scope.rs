//! Binding lifecycle scopes.
//!
//! A scope determines how long a resolved instance lives:
//! - [`BindingScope::Singleton`] — resolved once, cached on the binding
//! - [`BindingScope::Transient`] — a fresh instance on every resolution

use std::fmt;

/// Defines the lifetime of a binding's resolved instance.
///
/// # Examples
/// ```
/// use rabita_container::scope::BindingScope;
///
/// assert!(BindingScope::Singleton.is_cached());
/// assert!(!BindingScope::Transient.is_cached());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingScope {
    /// One instance shared for the lifetime of the container.
    ///
    /// Created on first resolution, cached on the binding, released only
    /// when the container itself is dropped.
    Singleton,

    /// A new instance created on every resolution. Never cached.
    Transient,
}

impl BindingScope {
    /// Returns `true` if this scope caches resolved instances.
    #[inline]
    pub fn is_cached(&self) -> bool {
        matches!(self, BindingScope::Singleton)
    }
}

/// An un-scoped binding resolves as [`BindingScope::Transient`].
///
/// Sharing is always opted into explicitly with
/// `set_scope(BindingScope::Singleton)`; a binding that never asked for
/// caching gets a fresh instance per resolution.
impl Default for BindingScope {
    fn default() -> Self {
        BindingScope::Transient
    }
}

impl fmt::Display for BindingScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingScope::Singleton => write!(f, "Singleton"),
            BindingScope::Transient => write!(f, "Transient"),
        }
    }
}
