//! Binding identification keys.
//!
//! [`BindingKey`] uniquely addresses one binding within a container.
//! Keys are opaque strings; booted artifacts follow the
//! `"{namespace}.{ClassName}"` convention (e.g. `repositories.UserRepository`).

use std::fmt;
use std::sync::Arc;

/// Addresses a single [`Binding`](crate::binding::Binding) in a container.
///
/// Keys are cheap to clone and compare by name. Within one container a
/// key is unique; binding the same key again replaces the old binding.
///
/// # Examples
/// ```
/// use rabita_container::key::BindingKey;
///
/// let key = BindingKey::new("config");
/// assert_eq!(key.name(), "config");
///
/// // Artifact keys follow the "{namespace}.{ClassName}" convention
/// let key = BindingKey::for_artifact("repositories", "UserRepository");
/// assert_eq!(key.name(), "repositories.UserRepository");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingKey {
    name: Arc<str>,
}

impl BindingKey {
    /// Creates a key from a name.
    #[inline]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self { name: name.into() }
    }

    /// Creates the conventional key for a booted artifact class.
    ///
    /// # Examples
    /// ```
    /// use rabita_container::key::BindingKey;
    ///
    /// let key = BindingKey::for_artifact("services", "MailerService");
    /// assert_eq!(key.name(), "services.MailerService");
    /// ```
    pub fn for_artifact(namespace: &str, class_name: &str) -> Self {
        Self {
            name: format!("{namespace}.{class_name}").into(),
        }
    }

    /// Returns the key name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<&str> for BindingKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for BindingKey {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl fmt::Debug for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BindingKey({:?})", self.name)
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
