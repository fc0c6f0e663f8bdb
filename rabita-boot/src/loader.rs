//! The static artifact registry — this target's module loader.
//!
//! An ahead-of-time-compiled program cannot import arbitrary code units
//! by path at runtime, so artifact classes announce themselves at link
//! time instead: next to each injectable artifact class, the crate
//! submits an [`ArtifactRegistration`] naming the file stem the class
//! lives in and how to bind it. Discovery still walks the filesystem;
//! "loading" a discovered file means looking its stem up in this
//! registry.
//!
//! ```rust,ignore
//! inventory::submit! {
//!     ArtifactRegistration::new(
//!         "repositories",
//!         "UserRepository",
//!         "user.repository",
//!         register_artifact_class::<UserRepository>,
//!     )
//! }
//! ```

use std::path::{Path, PathBuf};

use rabita_container::injectable::Injectable;
use rabita_container::prelude::{BindingKey, Container};
use tracing::trace;

use crate::error::{BootError, Result};

/// Binds one registration into a container. Implementations almost
/// always go through [`register_artifact_class`].
pub type RegisterFn = fn(&Container, &BindingKey) -> rabita_container::Result<()>;

/// A link-time record of one bootable artifact class.
#[derive(Debug)]
pub struct ArtifactRegistration {
    /// The artifact namespace the class belongs to (e.g. `repositories`).
    pub namespace: &'static str,
    /// The class name used in the binding key (e.g. `UserRepository`).
    pub class_name: &'static str,
    /// The stem of the source file the class lives in
    /// (e.g. `user.repository` for `user.repository.rs`).
    pub file_stem: &'static str,
    /// Binds the class into a container under the given key.
    pub register: RegisterFn,
}

inventory::collect!(ArtifactRegistration);

impl ArtifactRegistration {
    pub const fn new(
        namespace: &'static str,
        class_name: &'static str,
        file_stem: &'static str,
        register: RegisterFn,
    ) -> Self {
        Self {
            namespace,
            class_name,
            file_stem,
            register,
        }
    }

    /// The conventional `"{namespace}.{ClassName}"` binding key.
    pub fn binding_key(&self) -> BindingKey {
        BindingKey::for_artifact(self.namespace, self.class_name)
    }

    /// Returns `true` if `path`'s file stem names this registration.
    pub fn matches_file(&self, path: &Path) -> bool {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .is_some_and(|stem| stem == self.file_stem)
    }
}

/// Maps discovered files to artifact classes.
///
/// This is the seam to the host runtime's module loader; the default
/// implementation is the link-time [`StaticRegistry`], tests substitute
/// their own.
pub trait ArtifactSource: Send + Sync {
    /// Loads the artifact classes for `files`.
    ///
    /// A file that maps to nothing fails the whole call — loading is
    /// fail-fast within one discovery pass.
    fn load(&self, files: &[PathBuf]) -> Result<Vec<&'static ArtifactRegistration>>;
}

/// The inventory-backed artifact source.
#[derive(Debug, Default)]
pub struct StaticRegistry;

impl ArtifactSource for StaticRegistry {
    fn load(&self, files: &[PathBuf]) -> Result<Vec<&'static ArtifactRegistration>> {
        let mut loaded = Vec::new();
        for file in files {
            let mut matched = false;
            for registration in inventory::iter::<ArtifactRegistration> {
                if registration.matches_file(file) {
                    trace!(
                        file = %file.display(),
                        class = registration.class_name,
                        "Matched artifact registration"
                    );
                    loaded.push(registration);
                    matched = true;
                }
            }
            if !matched {
                return Err(BootError::Load {
                    file: file.clone(),
                    reason: "no artifact class registered for this file".to_string(),
                });
            }
        }
        Ok(loaded)
    }
}

/// The canonical [`RegisterFn`]: bind `T` as a class under `key`.
pub fn register_artifact_class<T: Injectable>(
    container: &Container,
    key: &BindingKey,
) -> rabita_container::Result<()> {
    container.bind(key.clone()).to_class::<T>()?;
    Ok(())
}
