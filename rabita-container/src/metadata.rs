//! Class injection metadata.
//!
//! [`MetadataRegistry`] records, per class, where each constructor
//! argument and property should be injected from, plus class-level
//! scope/tag defaults. It is an explicit object — the container owns one
//! (or shares one passed to [`Container::with_metadata`]) instead of
//! consulting hidden global state.
//!
//! Classes declare their metadata through the
//! [`Injectable`](crate::injectable::Injectable) contract; the registry
//! is populated when a class is bound and read during resolution.
//!
//! [`Container::with_metadata`]: crate::container::Container::with_metadata

use std::any::TypeId;

use dashmap::DashMap;
use tracing::trace;

use crate::injectable::Injectable;
use crate::key::BindingKey;
use crate::scope::BindingScope;

/// One constructor-argument injection site.
#[derive(Debug, Clone)]
pub struct ConstructorInjection {
    /// Position of the argument in the constructor's argument list.
    pub index: usize,
    /// The key to resolve the argument from.
    pub key: BindingKey,
    /// Whether an unbound key yields `None` instead of an error.
    pub optional: bool,
}

/// One property injection site, assigned after construction.
#[derive(Debug, Clone)]
pub struct PropertyInjection {
    /// The field the resolved value is assigned to.
    pub name: &'static str,
    /// The key to resolve the value from.
    pub key: BindingKey,
    /// Whether an unbound key leaves the property unset instead of erroring.
    pub optional: bool,
}

/// Class-level binding defaults, applied when the class is bound.
#[derive(Debug, Clone, Default)]
pub struct InjectableDefaults {
    /// Default scope for bindings of this class.
    pub scope: Option<BindingScope>,
    /// Tags added to every binding of this class.
    pub tags: Vec<String>,
}

/// Fluent descriptor of a class's injection sites and binding defaults.
///
/// Built by [`Injectable::metadata`] implementations:
///
/// ```rust,ignore
/// fn metadata() -> ClassMetadata {
///     ClassMetadata::new()
///         .constructor_arg("datasources.db")
///         .optional_arg("config")
///         .property("logger", "logging.logger")
///         .in_scope(BindingScope::Singleton)
///         .tagged(["repository"])
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClassMetadata {
    constructor: Vec<ConstructorInjection>,
    properties: Vec<PropertyInjection>,
    defaults: InjectableDefaults,
}

impl ClassMetadata {
    /// Creates an empty descriptor (no injection sites, no defaults).
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the next required constructor argument.
    pub fn constructor_arg(mut self, key: impl Into<BindingKey>) -> Self {
        let index = self.constructor.len();
        self.constructor.push(ConstructorInjection {
            index,
            key: key.into(),
            optional: false,
        });
        self
    }

    /// Declares the next optional constructor argument.
    pub fn optional_arg(mut self, key: impl Into<BindingKey>) -> Self {
        let index = self.constructor.len();
        self.constructor.push(ConstructorInjection {
            index,
            key: key.into(),
            optional: true,
        });
        self
    }

    /// Declares a required property injection site.
    pub fn property(mut self, name: &'static str, key: impl Into<BindingKey>) -> Self {
        self.properties.push(PropertyInjection {
            name,
            key: key.into(),
            optional: false,
        });
        self
    }

    /// Declares an optional property injection site.
    pub fn optional_property(mut self, name: &'static str, key: impl Into<BindingKey>) -> Self {
        self.properties.push(PropertyInjection {
            name,
            key: key.into(),
            optional: true,
        });
        self
    }

    /// Sets the default scope for bindings of this class.
    pub fn in_scope(mut self, scope: BindingScope) -> Self {
        self.defaults.scope = Some(scope);
        self
    }

    /// Adds default tags for bindings of this class.
    pub fn tagged<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.defaults.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// The declared constructor sites, in argument order.
    pub fn constructor_sites(&self) -> &[ConstructorInjection] {
        &self.constructor
    }

    /// The declared property sites.
    pub fn property_sites(&self) -> &[PropertyInjection] {
        &self.properties
    }

    /// The class-level binding defaults.
    pub fn defaults(&self) -> &InjectableDefaults {
        &self.defaults
    }
}

/// Per-class store of injection metadata, keyed by exact type.
///
/// Records are written at wiring time and read during resolution, which
/// may run concurrently once the application serves requests; the
/// backing maps are concurrency-safe. Metadata is never torn down — one
/// record per class ever bound, not per request.
///
/// Records are per exact [`TypeId`]: a type never inherits another
/// type's injection sites.
#[derive(Debug, Default)]
pub struct MetadataRegistry {
    constructors: DashMap<TypeId, Vec<ConstructorInjection>>,
    properties: DashMap<TypeId, Vec<PropertyInjection>>,
    injectables: DashMap<TypeId, InjectableDefaults>,
}

impl MetadataRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one constructor injection site for `target`.
    ///
    /// Declaring the same index again replaces the earlier site.
    pub fn set_inject_metadata(&self, target: TypeId, site: ConstructorInjection) {
        let mut sites = self.constructors.entry(target).or_default();
        match sites.iter().position(|s| s.index == site.index) {
            Some(pos) => sites[pos] = site,
            None => {
                sites.push(site);
                sites.sort_by_key(|s| s.index);
            }
        }
    }

    /// Returns `target`'s constructor sites ordered by argument index.
    ///
    /// A class with no recorded sites has no injected arguments.
    pub fn get_inject_metadata(&self, target: TypeId) -> Vec<ConstructorInjection> {
        self.constructors
            .get(&target)
            .map(|sites| sites.value().clone())
            .unwrap_or_default()
    }

    /// Records one property injection site for `target`.
    ///
    /// Declaring the same property name again replaces the earlier site.
    pub fn set_property_metadata(&self, target: TypeId, site: PropertyInjection) {
        let mut sites = self.properties.entry(target).or_default();
        match sites.iter().position(|s| s.name == site.name) {
            Some(pos) => sites[pos] = site,
            None => sites.push(site),
        }
    }

    /// Returns `target`'s property sites.
    pub fn get_property_metadata(&self, target: TypeId) -> Vec<PropertyInjection> {
        self.properties
            .get(&target)
            .map(|sites| sites.value().clone())
            .unwrap_or_default()
    }

    /// Records `target`'s class-level binding defaults.
    pub fn set_injectable_metadata(&self, target: TypeId, defaults: InjectableDefaults) {
        self.injectables.insert(target, defaults);
    }

    /// Returns `target`'s class-level binding defaults, if recorded.
    pub fn get_injectable_metadata(&self, target: TypeId) -> Option<InjectableDefaults> {
        self.injectables.get(&target).map(|defaults| defaults.value().clone())
    }

    /// Returns `true` once `target` has been recorded.
    pub fn has_class(&self, target: TypeId) -> bool {
        self.injectables.contains_key(&target)
    }

    /// Expands `T`'s declared [`ClassMetadata`] into the registry.
    ///
    /// Recording is one-shot per class: later calls are no-ops, so a
    /// class bound under several keys is recorded exactly once.
    pub fn record<T: Injectable>(&self) {
        let target = TypeId::of::<T>();
        if self.has_class(target) {
            return;
        }

        trace!(class = std::any::type_name::<T>(), "Recording class metadata");
        let metadata = T::metadata();
        for site in metadata.constructor {
            self.set_inject_metadata(target, site);
        }
        for site in metadata.properties {
            self.set_property_metadata(target, site);
        }
        self.set_injectable_metadata(target, metadata.defaults);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::injectable::ResolvedArguments;

    struct Widget;

    #[test]
    fn inject_metadata_ordered_by_index() {
        let registry = MetadataRegistry::new();
        let target = TypeId::of::<Widget>();

        // Declared out of order
        registry.set_inject_metadata(
            target,
            ConstructorInjection { index: 1, key: BindingKey::new("b"), optional: false },
        );
        registry.set_inject_metadata(
            target,
            ConstructorInjection { index: 0, key: BindingKey::new("a"), optional: true },
        );

        let sites = registry.get_inject_metadata(target);
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].index, 0);
        assert_eq!(sites[0].key.name(), "a");
        assert!(sites[0].optional);
        assert_eq!(sites[1].key.name(), "b");
    }

    #[test]
    fn inject_metadata_replaces_same_index() {
        let registry = MetadataRegistry::new();
        let target = TypeId::of::<Widget>();

        registry.set_inject_metadata(
            target,
            ConstructorInjection { index: 0, key: BindingKey::new("old"), optional: false },
        );
        registry.set_inject_metadata(
            target,
            ConstructorInjection { index: 0, key: BindingKey::new("new"), optional: false },
        );

        let sites = registry.get_inject_metadata(target);
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].key.name(), "new");
    }

    #[test]
    fn unknown_class_has_no_sites() {
        let registry = MetadataRegistry::new();
        assert!(registry.get_inject_metadata(TypeId::of::<Widget>()).is_empty());
        assert!(registry.get_property_metadata(TypeId::of::<Widget>()).is_empty());
        assert!(registry.get_injectable_metadata(TypeId::of::<Widget>()).is_none());
    }

    #[test]
    fn property_metadata_replaces_same_name() {
        let registry = MetadataRegistry::new();
        let target = TypeId::of::<Widget>();

        registry.set_property_metadata(
            target,
            PropertyInjection { name: "logger", key: BindingKey::new("old"), optional: false },
        );
        registry.set_property_metadata(
            target,
            PropertyInjection { name: "logger", key: BindingKey::new("new"), optional: true },
        );

        let sites = registry.get_property_metadata(target);
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].key.name(), "new");
        assert!(sites[0].optional);
    }

    struct Recorded;

    impl Injectable for Recorded {
        fn metadata() -> ClassMetadata {
            ClassMetadata::new()
                .constructor_arg("dep")
                .property("logger", "logging.logger")
                .in_scope(BindingScope::Singleton)
                .tagged(["widget"])
        }

        fn construct(_args: &mut ResolvedArguments<'_>) -> Result<Self> {
            Ok(Recorded)
        }
    }

    #[test]
    fn record_expands_class_metadata() {
        let registry = MetadataRegistry::new();
        registry.record::<Recorded>();

        let target = TypeId::of::<Recorded>();
        assert!(registry.has_class(target));
        assert_eq!(registry.get_inject_metadata(target).len(), 1);
        assert_eq!(registry.get_property_metadata(target).len(), 1);

        let defaults = registry.get_injectable_metadata(target).unwrap();
        assert_eq!(defaults.scope, Some(BindingScope::Singleton));
        assert_eq!(defaults.tags, vec!["widget".to_string()]);
    }

    #[test]
    fn record_is_one_shot() {
        let registry = MetadataRegistry::new();
        registry.record::<Recorded>();
        registry.record::<Recorded>();

        let sites = registry.get_inject_metadata(TypeId::of::<Recorded>());
        assert_eq!(sites.len(), 1);
    }

    #[test]
    fn class_metadata_indexes_sequentially() {
        let metadata = ClassMetadata::new()
            .constructor_arg("a")
            .optional_arg("b")
            .constructor_arg("c");

        let sites = metadata.constructor_sites();
        assert_eq!(sites.len(), 3);
        assert_eq!(sites[1].index, 1);
        assert!(sites[1].optional);
        assert_eq!(sites[2].index, 2);
        assert!(!sites[2].optional);
    }
}
