//! Bindings — resolution rules.
//!
//! A [`Binding`] describes how one key resolves: from a class
//! constructor, a pre-built value, or a provider function. Bindings are
//! configured fluently through the [`BindingRef`] handle returned by
//! [`Container::bind`](crate::container::Container::bind) and are
//! immutable once their value source is set.

use std::any::{Any, TypeId, type_name};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use tracing::debug;

use crate::context::ResolutionContext;
use crate::error::{ContainerError, InvalidConfigurationError, Result};
use crate::injectable::{Injectable, ResolvedArguments, ResolvedProperties};
use crate::key::BindingKey;
use crate::metadata::MetadataRegistry;
use crate::scope::BindingScope;

/// The type-erased, shared currency of resolution.
///
/// Every resolved value travels as a shared handle; singleton identity
/// is handle identity (`Arc::ptr_eq`).
pub type Instance = Arc<dyn Any + Send + Sync>;

/// A provider function: custom production logic with resolver access.
pub type ProviderFn =
    Arc<dyn Fn(&mut ResolutionContext<'_>) -> Result<Instance> + Send + Sync>;

/// What kind of value source a binding resolves from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// A class constructed from injection metadata.
    Class,
    /// A pre-built value.
    Value,
    /// A provider function.
    Provider,
}

type ConstructFn = fn(&mut ResolvedArguments<'_>) -> Result<Box<dyn Any + Send + Sync>>;
type InjectFn = fn(&mut (dyn Any + Send + Sync), &mut ResolvedProperties<'_>) -> Result<()>;

/// Type-erased handle to an [`Injectable`] class.
pub(crate) struct ClassSource {
    pub type_id: TypeId,
    pub type_name: &'static str,
    pub construct: ConstructFn,
    pub inject: InjectFn,
}

fn construct_class<T: Injectable>(
    args: &mut ResolvedArguments<'_>,
) -> Result<Box<dyn Any + Send + Sync>> {
    Ok(Box::new(T::construct(args)?))
}

fn inject_class<T: Injectable>(
    target: &mut (dyn Any + Send + Sync),
    props: &mut ResolvedProperties<'_>,
) -> Result<()> {
    let Some(value) = target.downcast_mut::<T>() else {
        return Err(ContainerError::TypeMismatch {
            key: props.key().clone(),
            expected: type_name::<T>(),
        });
    };
    value.inject(props)
}

/// The configured value source of a binding.
pub(crate) enum BindingSource {
    Class(ClassSource),
    Value(Instance),
    Provider(ProviderFn),
}

impl BindingSource {
    pub(crate) fn kind(&self) -> ValueKind {
        match self {
            BindingSource::Class(_) => ValueKind::Class,
            BindingSource::Value(_) => ValueKind::Value,
            BindingSource::Provider(_) => ValueKind::Provider,
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            BindingSource::Class(_) => "class",
            BindingSource::Value(_) => "value",
            BindingSource::Provider(_) => "provider",
        }
    }
}

// ═══════════════════════════════════════════
// Binding
// ═══════════════════════════════════════════

/// One resolution rule: key, value source, scope, and tags.
///
/// The container is the sole owner of its bindings; a singleton binding
/// additionally owns its cached instance, released only when the
/// container is dropped.
pub struct Binding {
    key: BindingKey,
    source: OnceCell<BindingSource>,
    scope: RwLock<Option<BindingScope>>,
    tags: RwLock<HashSet<String>>,
    instance: OnceCell<Instance>,
}

impl Binding {
    pub(crate) fn new(key: BindingKey) -> Self {
        Self {
            key,
            source: OnceCell::new(),
            scope: RwLock::new(None),
            tags: RwLock::new(HashSet::new()),
            instance: OnceCell::new(),
        }
    }

    /// The key this binding is registered under.
    #[inline]
    pub fn key(&self) -> &BindingKey {
        &self.key
    }

    /// The kind of value source configured, if any.
    pub fn value_kind(&self) -> Option<ValueKind> {
        self.source.get().map(BindingSource::kind)
    }

    /// The effective scope: explicitly set, or the default.
    pub fn scope(&self) -> BindingScope {
        self.scope.read().unwrap_or_default()
    }

    /// Returns `true` if this binding carries `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.read().contains(tag)
    }

    /// The binding's tags, sorted for stable output.
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.tags.read().iter().cloned().collect();
        tags.sort();
        tags
    }

    pub(crate) fn explicit_scope(&self) -> Option<BindingScope> {
        *self.scope.read()
    }

    pub(crate) fn apply_scope(&self, scope: BindingScope) {
        *self.scope.write() = Some(scope);
    }

    pub(crate) fn apply_tags<I, S>(&self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.write().extend(tags.into_iter().map(Into::into));
    }

    pub(crate) fn set_source(&self, source: BindingSource) -> Result<()> {
        let attempted = source.kind_name();
        self.source.set(source).map_err(|_| {
            let existing = self
                .source
                .get()
                .map(BindingSource::kind_name)
                .unwrap_or("none");
            ContainerError::InvalidConfiguration(InvalidConfigurationError {
                key: self.key.clone(),
                detail: format!(
                    "source already configured as {existing}; cannot set {attempted}"
                ),
            })
        })
    }

    pub(crate) fn source(&self) -> Option<&BindingSource> {
        self.source.get()
    }

    pub(crate) fn cached_instance(&self) -> Option<Instance> {
        self.instance.get().cloned()
    }

    /// Caches `instance` and returns the cached handle. The first
    /// writer wins; a concurrent loser observes the winner's instance.
    pub(crate) fn cache_instance(&self, instance: Instance) -> Instance {
        self.instance.get_or_init(|| instance).clone()
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("key", &self.key)
            .field("kind", &self.value_kind())
            .field("scope", &self.scope())
            .field("tags", &self.tags())
            .finish()
    }
}

// ═══════════════════════════════════════════
// BindingRef
// ═══════════════════════════════════════════

/// Fluent configuration handle for one binding.
///
/// Returned by [`Container::bind`](crate::container::Container::bind);
/// chain `to_class`/`to_value`/`to_provider` with `set_scope` and
/// `set_tags`. Setting a second value source fails fast with
/// [`ContainerError::InvalidConfiguration`].
pub struct BindingRef {
    binding: Arc<Binding>,
    metadata: Arc<MetadataRegistry>,
}

impl std::fmt::Debug for BindingRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingRef").finish_non_exhaustive()
    }
}

impl BindingRef {
    pub(crate) fn new(binding: Arc<Binding>, metadata: Arc<MetadataRegistry>) -> Self {
        Self { binding, metadata }
    }

    /// Resolves this key by constructing `T` from its injection metadata.
    ///
    /// Records `T`'s [`ClassMetadata`](crate::metadata::ClassMetadata)
    /// into the container's registry and applies the class's scope/tag
    /// defaults; explicit `set_scope`/`set_tags` calls win over them.
    pub fn to_class<T: Injectable>(self) -> Result<Self> {
        self.metadata.record::<T>();

        if let Some(defaults) = self.metadata.get_injectable_metadata(TypeId::of::<T>()) {
            if self.binding.explicit_scope().is_none() {
                if let Some(scope) = defaults.scope {
                    self.binding.apply_scope(scope);
                }
            }
            if !defaults.tags.is_empty() {
                self.binding.apply_tags(defaults.tags);
            }
        }

        self.binding.set_source(BindingSource::Class(ClassSource {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            construct: construct_class::<T>,
            inject: inject_class::<T>,
        }))?;
        debug!(key = %self.binding.key(), class = type_name::<T>(), "Bound to class");
        Ok(self)
    }

    /// Resolves this key to a pre-built value.
    ///
    /// The value is stored once and shared by every resolution.
    pub fn to_value<V: Send + Sync + 'static>(self, value: V) -> Result<Self> {
        self.binding
            .set_source(BindingSource::Value(Arc::new(value)))?;
        debug!(key = %self.binding.key(), "Bound to value");
        Ok(self)
    }

    /// Resolves this key by invoking a provider function.
    ///
    /// The provider resolves its own dependencies through the
    /// [`ResolutionContext`] it receives. Provider results are not
    /// cached unless the binding's scope is explicitly
    /// [`Singleton`](BindingScope::Singleton).
    pub fn to_provider<V, F>(self, provider: F) -> Result<Self>
    where
        V: Send + Sync + 'static,
        F: Fn(&mut ResolutionContext<'_>) -> Result<V> + Send + Sync + 'static,
    {
        let provider: ProviderFn =
            Arc::new(move |ctx| provider(ctx).map(|value| Arc::new(value) as Instance));
        self.binding.set_source(BindingSource::Provider(provider))?;
        debug!(key = %self.binding.key(), "Bound to provider");
        Ok(self)
    }

    /// Sets the binding's scope. Idempotent; the last call wins.
    pub fn set_scope(self, scope: BindingScope) -> Self {
        self.binding.apply_scope(scope);
        self
    }

    /// Adds tags to the binding. Idempotent set insertion.
    pub fn set_tags<I, S>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.binding.apply_tags(tags);
        self
    }

    /// Returns `true` if the binding carries `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.binding.has_tag(tag)
    }

    /// The key being configured.
    pub fn key(&self) -> &BindingKey {
        self.binding.key()
    }

    /// The underlying binding.
    pub fn binding(&self) -> &Arc<Binding> {
        &self.binding
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::ClassMetadata;

    fn binding_ref(key: &str) -> BindingRef {
        BindingRef::new(
            Arc::new(Binding::new(BindingKey::new(key))),
            Arc::new(MetadataRegistry::new()),
        )
    }

    struct Plain;

    impl Injectable for Plain {
        fn metadata() -> ClassMetadata {
            ClassMetadata::new()
        }

        fn construct(_args: &mut ResolvedArguments<'_>) -> Result<Self> {
            Ok(Plain)
        }
    }

    struct Tagged;

    impl Injectable for Tagged {
        fn metadata() -> ClassMetadata {
            ClassMetadata::new()
                .in_scope(BindingScope::Singleton)
                .tagged(["greeter"])
        }

        fn construct(_args: &mut ResolvedArguments<'_>) -> Result<Self> {
            Ok(Tagged)
        }
    }

    #[test]
    fn second_source_fails_fast() {
        let binding = binding_ref("config").to_value(42i32).unwrap();
        let result = binding.to_provider(|_| Ok(1i32));

        assert!(matches!(
            result.unwrap_err(),
            ContainerError::InvalidConfiguration(_)
        ));
    }

    #[test]
    fn value_kind_reflects_source() {
        let binding = binding_ref("config");
        assert_eq!(binding.binding().value_kind(), None);

        let binding = binding.to_value("hello").unwrap();
        assert_eq!(binding.binding().value_kind(), Some(ValueKind::Value));
    }

    #[test]
    fn unscoped_binding_defaults_to_transient() {
        let binding = binding_ref("config").to_class::<Plain>().unwrap();
        assert_eq!(binding.binding().scope(), BindingScope::Transient);
    }

    #[test]
    fn class_defaults_apply_scope_and_tags() {
        let binding = binding_ref("greeters.Tagged").to_class::<Tagged>().unwrap();
        assert_eq!(binding.binding().scope(), BindingScope::Singleton);
        assert!(binding.has_tag("greeter"));
    }

    #[test]
    fn explicit_scope_wins_over_class_default() {
        let binding = binding_ref("greeters.Tagged")
            .set_scope(BindingScope::Transient)
            .to_class::<Tagged>()
            .unwrap();
        assert_eq!(binding.binding().scope(), BindingScope::Transient);
    }

    #[test]
    fn set_tags_is_idempotent() {
        let binding = binding_ref("b")
            .set_tags(["booter"])
            .set_tags(["booter", "extra"]);

        assert_eq!(binding.binding().tags(), vec!["booter", "extra"]);
    }

    #[test]
    fn debug_shows_key_and_scope() {
        let binding = binding_ref("config")
            .to_value(1i32)
            .unwrap()
            .set_scope(BindingScope::Singleton);

        let debug = format!("{:?}", binding.binding());
        assert!(debug.contains("config"));
        assert!(debug.contains("Singleton"));
    }
}
