//! Resolution state threaded through one `get` call.
//!
//! [`ResolutionStack`] is the explicit guard against cyclic dependency
//! graphs: every in-progress key is pushed before its dependencies are
//! resolved, and revisiting a key still on the stack raises
//! [`ContainerError::CycleDetected`] with the full chain.
//! [`ResolutionContext`] is the resolver view handed to provider
//! functions, so provider-caused cycles hit the same guard.

use std::sync::Arc;

use tracing::warn;

use crate::container::Container;
use crate::error::{ContainerError, CycleError, Result};
use crate::key::BindingKey;

/// The stack of keys currently being resolved.
#[derive(Debug, Default)]
pub struct ResolutionStack {
    frames: Vec<BindingKey>,
}

impl ResolutionStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Pushes `key`, or raises [`ContainerError::CycleDetected`] if it
    /// is already in progress.
    pub(crate) fn enter(&mut self, key: &BindingKey) -> Result<()> {
        if let Some(position) = self.frames.iter().position(|frame| frame == key) {
            let mut chain: Vec<BindingKey> = self.frames[position..].to_vec();
            chain.push(key.clone());

            warn!(cycle = ?chain, "Cyclic dependency detected");
            return Err(ContainerError::CycleDetected(CycleError { chain }));
        }

        self.frames.push(key.clone());
        Ok(())
    }

    pub(crate) fn exit(&mut self) {
        self.frames.pop();
    }

    /// The key whose resolution is currently in progress, if any.
    pub(crate) fn current(&self) -> Option<&BindingKey> {
        self.frames.last()
    }
}

/// Resolver view over a container and an in-progress resolution stack.
///
/// Providers receive one of these to resolve their own dependencies:
///
/// ```rust,ignore
/// container.bind("services.geocoder").to_provider(|ctx| {
///     let config: Arc<GeocoderConfig> = ctx.resolve("config.geocoder")?;
///     Ok(Geocoder::new(&config))
/// })?;
/// ```
pub struct ResolutionContext<'a> {
    container: &'a Container,
    stack: &'a mut ResolutionStack,
}

impl<'a> ResolutionContext<'a> {
    pub(crate) fn new(container: &'a Container, stack: &'a mut ResolutionStack) -> Self {
        Self { container, stack }
    }

    /// Resolves a required key.
    pub fn resolve<T: Send + Sync + 'static>(
        &mut self,
        key: impl Into<BindingKey>,
    ) -> Result<Arc<T>> {
        let key = key.into();
        match self.container.resolve_instance(&key, false, self.stack)? {
            Some(instance) => crate::container::downcast_instance(&key, instance),
            None => Err(self.container.not_bound(&key, self.stack.current().cloned())),
        }
    }

    /// Resolves an optional key; `Ok(None)` when it is unbound.
    pub fn resolve_optional<T: Send + Sync + 'static>(
        &mut self,
        key: impl Into<BindingKey>,
    ) -> Result<Option<Arc<T>>> {
        let key = key.into();
        match self.container.resolve_instance(&key, true, self.stack)? {
            Some(instance) => crate::container::downcast_instance(&key, instance).map(Some),
            None => Ok(None),
        }
    }
}
