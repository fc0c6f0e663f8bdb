//! # The Container — registry and resolver
//!
//! Maps [`BindingKey`]s to [`Binding`]s and resolves dependency graphs
//! recursively: constructor arguments first, property injections after
//! construction, singleton instances cached on their binding.
//!
//! # Examples
//! ```rust
//! use std::sync::Arc;
//! use rabita_container::prelude::*;
//!
//! struct Greeter {
//!     greeting: Arc<String>,
//! }
//!
//! impl Injectable for Greeter {
//!     fn metadata() -> ClassMetadata {
//!         ClassMetadata::new().constructor_arg("config.greeting")
//!     }
//!
//!     fn construct(args: &mut ResolvedArguments<'_>) -> Result<Self> {
//!         Ok(Self { greeting: args.take(0)? })
//!     }
//! }
//!
//! let container = Container::new();
//! container.bind("config.greeting").to_value("hello".to_string())?;
//! container.bind("services.Greeter").to_class::<Greeter>()?;
//!
//! let greeter: Arc<Greeter> = container.get("services.Greeter")?;
//! assert_eq!(*greeter.greeting, "hello");
//! # Ok::<(), rabita_container::ContainerError>(())
//! ```

use std::any::type_name;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::binding::{Binding, BindingRef, BindingSource, ClassSource, Instance};
use crate::context::{ResolutionContext, ResolutionStack};
use crate::error::{
    ContainerError, InvalidConfigurationError, NotBoundError, Result,
};
use crate::key::BindingKey;
use crate::metadata::MetadataRegistry;

// ═══════════════════════════════════════════
// Container
// ═══════════════════════════════════════════

struct ContainerInner {
    bindings: RwLock<HashMap<BindingKey, Arc<Binding>>>,
    metadata: Arc<MetadataRegistry>,
}

/// Thread-safe dependency injection container.
///
/// Cloning is cheap and yields a handle to the same binding map, so the
/// container can be shared with booters that register artifacts into it
/// while the application resolves from it.
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

impl Container {
    /// Creates a container with its own fresh [`MetadataRegistry`].
    pub fn new() -> Self {
        Self::with_metadata(Arc::new(MetadataRegistry::new()))
    }

    /// Creates a container over an existing metadata registry.
    ///
    /// Applications that run several containers share one registry by
    /// passing the same handle here.
    pub fn with_metadata(metadata: Arc<MetadataRegistry>) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                bindings: RwLock::new(HashMap::new()),
                metadata,
            }),
        }
    }

    /// The metadata registry this container resolves classes against.
    pub fn metadata(&self) -> &Arc<MetadataRegistry> {
        &self.inner.metadata
    }

    /// Creates (or replaces) the binding for `key` and returns it
    /// unconfigured for fluent chaining.
    pub fn bind(&self, key: impl Into<BindingKey>) -> BindingRef {
        let key = key.into();
        let binding = Arc::new(Binding::new(key.clone()));

        let replaced = self
            .inner
            .bindings
            .write()
            .insert(key.clone(), binding.clone());
        if replaced.is_some() {
            debug!(key = %key, "Replaced binding");
        } else {
            debug!(key = %key, "Created binding");
        }

        BindingRef::new(binding, self.inner.metadata.clone())
    }

    /// Returns `true` if `key` has a binding.
    pub fn contains(&self, key: &BindingKey) -> bool {
        self.inner.bindings.read().contains_key(key)
    }

    /// Looks up the binding for `key` without resolving it.
    pub fn binding(&self, key: &BindingKey) -> Option<Arc<Binding>> {
        self.inner.bindings.read().get(key).cloned()
    }

    /// Number of registered bindings.
    pub fn len(&self) -> usize {
        self.inner.bindings.read().len()
    }

    /// Returns `true` if no bindings are registered.
    pub fn is_empty(&self) -> bool {
        self.inner.bindings.read().is_empty()
    }

    /// Resolves a required key.
    ///
    /// # Errors
    /// [`ContainerError::NotBound`] if the key has no binding;
    /// [`ContainerError::CycleDetected`] if the dependency graph
    /// revisits a key already being resolved;
    /// [`ContainerError::TypeMismatch`] if the instance is not a `T`.
    pub fn get<T: Send + Sync + 'static>(&self, key: impl Into<BindingKey>) -> Result<Arc<T>> {
        let key = key.into();
        let mut stack = ResolutionStack::new();
        match self.resolve_instance(&key, false, &mut stack)? {
            Some(instance) => downcast_instance(&key, instance),
            None => Err(self.not_bound(&key, None)),
        }
    }

    /// Resolves an optional key; `Ok(None)` when it is unbound.
    pub fn get_optional<T: Send + Sync + 'static>(
        &self,
        key: impl Into<BindingKey>,
    ) -> Result<Option<Arc<T>>> {
        let key = key.into();
        let mut stack = ResolutionStack::new();
        match self.resolve_instance(&key, true, &mut stack)? {
            Some(instance) => downcast_instance(&key, instance).map(Some),
            None => Ok(None),
        }
    }

    /// Returns every binding tagged with `tag`, sorted by key.
    ///
    /// An empty result is valid, not an error.
    pub fn find_by_tag(&self, tag: &str) -> Vec<Arc<Binding>> {
        self.find_by_tag_excluding(tag, &[])
    }

    /// Returns bindings tagged with `tag` whose keys are not in
    /// `exclude`, sorted by key.
    pub fn find_by_tag_excluding(&self, tag: &str, exclude: &[BindingKey]) -> Vec<Arc<Binding>> {
        let mut found: Vec<Arc<Binding>> = {
            let bindings = self.inner.bindings.read();
            bindings
                .values()
                .filter(|binding| binding.has_tag(tag) && !exclude.contains(binding.key()))
                .cloned()
                .collect()
        };
        found.sort_by(|a, b| a.key().cmp(b.key()));
        found
    }

    /// Internal resolve: the full algorithm over the type-erased
    /// [`Instance`] currency.
    pub(crate) fn resolve_instance(
        &self,
        key: &BindingKey,
        optional: bool,
        stack: &mut ResolutionStack,
    ) -> Result<Option<Instance>> {
        trace!(key = %key, optional, "Resolving");

        // Clone the binding out so the read lock is released before any
        // recursive resolution re-enters the map.
        let binding = self.binding(key);
        let Some(binding) = binding else {
            if optional {
                trace!(key = %key, "Unbound optional key");
                return Ok(None);
            }
            return Err(self.not_bound(key, stack.current().cloned()));
        };

        let source = binding.source().ok_or_else(|| {
            ContainerError::InvalidConfiguration(InvalidConfigurationError {
                key: key.clone(),
                detail: "no value source configured".to_string(),
            })
        })?;

        match source {
            BindingSource::Value(value) => Ok(Some(value.clone())),

            BindingSource::Class(class) => {
                if binding.scope().is_cached() {
                    if let Some(cached) = binding.cached_instance() {
                        trace!(key = %key, "Returning cached singleton");
                        return Ok(Some(cached));
                    }
                }

                stack.enter(key)?;
                let produced = self.instantiate(key, class, stack);
                stack.exit();
                let mut instance = produced?;

                if binding.scope().is_cached() {
                    instance = binding.cache_instance(instance);
                }
                Ok(Some(instance))
            }

            BindingSource::Provider(provider) => {
                if binding.scope().is_cached() {
                    if let Some(cached) = binding.cached_instance() {
                        trace!(key = %key, "Returning cached provider result");
                        return Ok(Some(cached));
                    }
                }

                let provider = provider.clone();
                stack.enter(key)?;
                let produced = {
                    let mut context = ResolutionContext::new(self, stack);
                    provider(&mut context)
                };
                stack.exit();
                let mut instance = produced?;

                if binding.scope().is_cached() {
                    instance = binding.cache_instance(instance);
                }
                Ok(Some(instance))
            }
        }
    }

    /// Constructs a class instance: resolve constructor sites, build,
    /// then resolve and assign property sites.
    fn instantiate(
        &self,
        key: &BindingKey,
        class: &ClassSource,
        stack: &mut ResolutionStack,
    ) -> Result<Instance> {
        let sites = self.inner.metadata.get_inject_metadata(class.type_id);

        let slot_count = sites.iter().map(|site| site.index + 1).max().unwrap_or(0);
        let mut slots: Vec<Option<Instance>> = Vec::new();
        slots.resize_with(slot_count, || None);
        for site in &sites {
            slots[site.index] = self.resolve_instance(&site.key, site.optional, stack)?;
        }

        let mut args = crate::injectable::ResolvedArguments::new(key, slots);
        let mut value = (class.construct)(&mut args)?;

        let property_sites = self.inner.metadata.get_property_metadata(class.type_id);
        if !property_sites.is_empty() {
            let mut resolved = Vec::with_capacity(property_sites.len());
            for site in &property_sites {
                resolved.push((
                    site.name,
                    self.resolve_instance(&site.key, site.optional, stack)?,
                ));
            }
            let mut props = crate::injectable::ResolvedProperties::new(key, resolved);
            (class.inject)(value.as_mut(), &mut props)?;
        }

        debug!(key = %key, class = class.type_name, "Constructed instance");
        Ok(Arc::from(value))
    }

    pub(crate) fn not_bound(
        &self,
        key: &BindingKey,
        required_by: Option<BindingKey>,
    ) -> ContainerError {
        ContainerError::NotBound(NotBoundError {
            requested: key.clone(),
            required_by,
            suggestions: self.suggestions(key),
        })
    }

    fn suggestions(&self, key: &BindingKey) -> Vec<BindingKey> {
        let names: Vec<String> = {
            let bindings = self.inner.bindings.read();
            bindings.keys().map(|k| k.name().to_string()).collect()
        };
        let candidates: Vec<&str> = names.iter().map(String::as_str).collect();

        rabita_support::rendering::suggest_similar(key.name(), &candidates, 3)
            .into_iter()
            .map(BindingKey::new)
            .collect()
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("bindings", &self.len())
            .finish()
    }
}

// ═══════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════

/// Downcasts a resolved instance to the requested type.
pub(crate) fn downcast_instance<T: Send + Sync + 'static>(
    key: &BindingKey,
    instance: Instance,
) -> Result<Arc<T>> {
    instance
        .downcast::<T>()
        .map_err(|_| ContainerError::TypeMismatch {
            key: key.clone(),
            expected: type_name::<T>(),
        })
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

/// One import for application wiring code.
pub mod prelude {
    pub use super::Container;
    pub use crate::binding::{Binding, BindingRef, Instance, ValueKind};
    pub use crate::context::ResolutionContext;
    pub use crate::error::{ContainerError, Result};
    pub use crate::injectable::{Injectable, ResolvedArguments, ResolvedProperties};
    pub use crate::key::BindingKey;
    pub use crate::metadata::{ClassMetadata, MetadataRegistry};
    pub use crate::scope::BindingScope;
}
