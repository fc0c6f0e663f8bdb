//! # rabita — metadata-driven DI with phased artifact boot
//!
//! A dependency-injection container in the IoC style: bindings map keys
//! to classes, values, or providers; classes declare their injection
//! sites through the [`Injectable`] contract; booters discover artifact
//! files on disk, map them to link-time-registered classes, and bind
//! them into the container under conventional keys.
//!
//! The usual entry points:
//! - [`Container`] — `bind` / `get` / `find_by_tag`
//! - [`Bootstrapper`] — drives registered booters and returns a
//!   [`BootReport`]
//! - [`prelude`] — one import for application wiring code

pub use rabita_container::binding::{Binding, BindingRef, Instance, ValueKind};
pub use rabita_container::container::Container;
pub use rabita_container::context::ResolutionContext;
pub use rabita_container::injectable::{Injectable, ResolvedArguments, ResolvedProperties};
pub use rabita_container::metadata::{ClassMetadata, MetadataRegistry};
pub use rabita_container::prelude;
pub use rabita_container::{BindingKey, BindingScope, ContainerError};

pub use rabita_boot::{
    ArtifactBooter, ArtifactConventions, ArtifactOptions, ArtifactRegistration, ArtifactSource,
    ArtifactStats, BOOTER_TAG, BootError, BootOptions, BootPhase, BootReport, Booter,
    Bootstrapper, PhaseStats, StaticRegistry, discover_files, register_artifact_class,
    register_booter,
};

pub use rabita_support as support;
