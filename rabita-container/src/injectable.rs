//! The injectable-class contract.
//!
//! Languages with native annotations harvest injection metadata from
//! decorators; here a class declares it explicitly. Implementing
//! [`Injectable`] gives the container everything it needs to build an
//! instance: [`metadata`](Injectable::metadata) describes the injection
//! sites, [`construct`](Injectable::construct) consumes the resolved
//! constructor arguments, and [`inject`](Injectable::inject) receives
//! resolved property values after construction.
//!
//! # Examples
//! ```rust,ignore
//! struct UserRepository {
//!     db: Arc<Database>,
//! }
//!
//! impl Injectable for UserRepository {
//!     fn metadata() -> ClassMetadata {
//!         ClassMetadata::new().constructor_arg("datasources.db")
//!     }
//!
//!     fn construct(args: &mut ResolvedArguments<'_>) -> Result<Self> {
//!         Ok(Self { db: args.take(0)? })
//!     }
//! }
//! ```

use std::any::type_name;
use std::sync::Arc;

use crate::binding::Instance;
use crate::error::{ContainerError, Result};
use crate::key::BindingKey;
use crate::metadata::ClassMetadata;

/// A class the container can instantiate from injection metadata.
pub trait Injectable: Send + Sync + Sized + 'static {
    /// Declares this class's injection sites and binding defaults.
    fn metadata() -> ClassMetadata;

    /// Builds an instance from the resolved constructor arguments.
    ///
    /// Arguments arrive in the order declared by [`Self::metadata`];
    /// take them positionally with [`ResolvedArguments::take`] or
    /// [`ResolvedArguments::take_optional`].
    fn construct(args: &mut ResolvedArguments<'_>) -> Result<Self>;

    /// Assigns resolved property values after construction.
    ///
    /// Only called when the class declares property sites. The default
    /// implementation does nothing.
    fn inject(&mut self, props: &mut ResolvedProperties<'_>) -> Result<()> {
        let _ = props;
        Ok(())
    }
}

/// Constructor arguments resolved for one instantiation, positional.
///
/// A slot holds `None` when its site was optional and the key unbound.
pub struct ResolvedArguments<'a> {
    key: &'a BindingKey,
    slots: Vec<Option<Instance>>,
}

impl<'a> ResolvedArguments<'a> {
    pub(crate) fn new(key: &'a BindingKey, slots: Vec<Option<Instance>>) -> Self {
        Self { key, slots }
    }

    /// Takes the required argument at `index`.
    pub fn take<T: Send + Sync + 'static>(&mut self, index: usize) -> Result<Arc<T>> {
        match self.take_optional(index)? {
            Some(value) => Ok(value),
            None => Err(ContainerError::ConstructionFailed {
                key: self.key.clone(),
                source: format!("missing required constructor argument at index {index}").into(),
            }),
        }
    }

    /// Takes the optional argument at `index`; `None` if it was unbound.
    pub fn take_optional<T: Send + Sync + 'static>(
        &mut self,
        index: usize,
    ) -> Result<Option<Arc<T>>> {
        let slot = self.slots.get_mut(index).ok_or_else(|| {
            ContainerError::ConstructionFailed {
                key: self.key.clone(),
                source: format!("no constructor argument declared at index {index}").into(),
            }
        })?;

        match slot.take() {
            None => Ok(None),
            Some(instance) => instance
                .downcast::<T>()
                .map(Some)
                .map_err(|_| ContainerError::TypeMismatch {
                    key: self.key.clone(),
                    expected: type_name::<T>(),
                }),
        }
    }

    /// Number of declared argument slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no arguments were declared.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Property values resolved for one instantiation, by field name.
pub struct ResolvedProperties<'a> {
    key: &'a BindingKey,
    slots: Vec<(&'static str, Option<Instance>)>,
}

impl<'a> ResolvedProperties<'a> {
    pub(crate) fn new(key: &'a BindingKey, slots: Vec<(&'static str, Option<Instance>)>) -> Self {
        Self { key, slots }
    }

    pub(crate) fn key(&self) -> &BindingKey {
        self.key
    }

    /// Takes the required property value for `name`.
    pub fn take<T: Send + Sync + 'static>(&mut self, name: &str) -> Result<Arc<T>> {
        match self.take_optional(name)? {
            Some(value) => Ok(value),
            None => Err(ContainerError::ConstructionFailed {
                key: self.key.clone(),
                source: format!("missing required property {name:?}").into(),
            }),
        }
    }

    /// Takes the optional property value for `name`; `None` if unbound.
    pub fn take_optional<T: Send + Sync + 'static>(
        &mut self,
        name: &str,
    ) -> Result<Option<Arc<T>>> {
        let slot = self
            .slots
            .iter_mut()
            .find(|(slot_name, _)| *slot_name == name)
            .ok_or_else(|| ContainerError::ConstructionFailed {
                key: self.key.clone(),
                source: format!("no property declared with name {name:?}").into(),
            })?;

        match slot.1.take() {
            None => Ok(None),
            Some(instance) => instance
                .downcast::<T>()
                .map(Some)
                .map_err(|_| ContainerError::TypeMismatch {
                    key: self.key.clone(),
                    expected: type_name::<T>(),
                }),
        }
    }
}
