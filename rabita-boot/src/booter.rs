//! Booters — per-category discovery/load drivers.
//!
//! A booter walks one artifact category through the phase sequence
//! Configured → Discovered → Loaded → Bound. The three phases are
//! overridable trait methods so categories with unusual needs can
//! replace any one of them; [`ArtifactBooter`] is the conventional
//! implementation every built-in category uses.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info};

use rabita_container::prelude::Container;

use crate::discovery::discover_files;
use crate::error::{BootError, Result};
use crate::loader::{ArtifactSource, StaticRegistry};
use crate::options::{ArtifactConventions, ArtifactOptions};

/// One of the three globally-ordered boot phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum BootPhase {
    Configure,
    Discover,
    Load,
}

impl BootPhase {
    /// The canonical phase order.
    pub const ALL: [BootPhase; 3] = [BootPhase::Configure, BootPhase::Discover, BootPhase::Load];
}

impl std::fmt::Display for BootPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BootPhase::Configure => write!(f, "configure"),
            BootPhase::Discover => write!(f, "discover"),
            BootPhase::Load => write!(f, "load"),
        }
    }
}

/// What one booter did during a boot run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ArtifactStats {
    /// Files matched during discovery.
    pub discovered: usize,
    /// Artifact classes bound during load.
    pub loaded: usize,
    /// Errors attributed to this booter.
    pub errors: usize,
    /// The discovered file paths.
    pub files: Vec<PathBuf>,
    /// Messages for the attributed errors.
    pub error_messages: Vec<String>,
}

/// A phase-driven component booting one artifact category.
#[async_trait]
pub trait Booter: Send + Sync {
    /// The artifact namespace this booter owns (e.g. `repositories`).
    fn name(&self) -> &str;

    /// Merges caller options with category conventions into the
    /// effective discovery pattern.
    async fn configure(&self) -> Result<()>;

    /// Expands the effective pattern into the artifact file list.
    async fn discover(&self) -> Result<()>;

    /// Loads the discovered files' classes and binds them into the
    /// container under conventional keys.
    async fn load(&self) -> Result<()>;

    /// This booter's stats for the boot report.
    fn stats(&self) -> ArtifactStats;
}

#[derive(Default)]
struct BooterState {
    pattern: Option<String>,
    files: Option<Vec<PathBuf>>,
    stats: ArtifactStats,
}

/// The conventional per-category booter.
///
/// Category constructors carry the category's conventions:
///
/// ```rust,ignore
/// let booter = ArtifactBooter::repositories(container, project_root, ArtifactOptions::default());
/// ```
pub struct ArtifactBooter {
    namespace: &'static str,
    conventions: ArtifactConventions,
    options: ArtifactOptions,
    project_root: PathBuf,
    container: Container,
    source: Arc<dyn ArtifactSource>,
    state: RwLock<BooterState>,
}

impl ArtifactBooter {
    /// A booter for `namespace` with explicit conventions.
    pub fn new(
        namespace: &'static str,
        conventions: ArtifactConventions,
        container: Container,
        project_root: impl Into<PathBuf>,
        options: ArtifactOptions,
    ) -> Self {
        Self {
            namespace,
            conventions,
            options,
            project_root: project_root.into(),
            container,
            source: Arc::new(StaticRegistry),
            state: RwLock::new(BooterState::default()),
        }
    }

    /// Replaces the artifact source (tests substitute their own loader).
    pub fn with_source(mut self, source: Arc<dyn ArtifactSource>) -> Self {
        self.source = source;
        self
    }

    pub fn controllers(
        container: Container,
        project_root: impl Into<PathBuf>,
        options: ArtifactOptions,
    ) -> Self {
        Self::new(
            "controllers",
            ArtifactConventions::controllers(),
            container,
            project_root,
            options,
        )
    }

    pub fn repositories(
        container: Container,
        project_root: impl Into<PathBuf>,
        options: ArtifactOptions,
    ) -> Self {
        Self::new(
            "repositories",
            ArtifactConventions::repositories(),
            container,
            project_root,
            options,
        )
    }

    pub fn services(
        container: Container,
        project_root: impl Into<PathBuf>,
        options: ArtifactOptions,
    ) -> Self {
        Self::new(
            "services",
            ArtifactConventions::services(),
            container,
            project_root,
            options,
        )
    }

    pub fn datasources(
        container: Container,
        project_root: impl Into<PathBuf>,
        options: ArtifactOptions,
    ) -> Self {
        Self::new(
            "datasources",
            ArtifactConventions::datasources(),
            container,
            project_root,
            options,
        )
    }
}

#[async_trait]
impl Booter for ArtifactBooter {
    fn name(&self) -> &str {
        self.namespace
    }

    async fn configure(&self) -> Result<()> {
        let pattern = self.options.effective_glob(&self.conventions);
        debug!(booter = self.namespace, pattern = %pattern, "Configured discovery pattern");
        self.state.write().pattern = Some(pattern);
        Ok(())
    }

    async fn discover(&self) -> Result<()> {
        let pattern = self.state.read().pattern.clone().ok_or(BootError::PhaseOrder {
            phase: "discover",
            requires: "configure",
        })?;

        let files = discover_files(&pattern, &self.project_root)?;
        info!(booter = self.namespace, discovered = files.len(), "Discovered artifacts");

        let mut state = self.state.write();
        state.stats.discovered = files.len();
        state.stats.files = files.clone();
        state.files = Some(files);
        Ok(())
    }

    async fn load(&self) -> Result<()> {
        let files = self.state.read().files.clone().ok_or(BootError::PhaseOrder {
            phase: "load",
            requires: "discover",
        })?;

        let registrations = self.source.load(&files)?;
        for registration in registrations {
            let key = registration.binding_key();
            (registration.register)(&self.container, &key)?;
            debug!(booter = self.namespace, key = %key, "Bound artifact class");
            self.state.write().stats.loaded += 1;
        }

        info!(
            booter = self.namespace,
            loaded = self.state.read().stats.loaded,
            "Loaded artifacts"
        );
        Ok(())
    }

    fn stats(&self) -> ArtifactStats {
        self.state.read().stats.clone()
    }
}
