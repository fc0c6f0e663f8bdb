//! Phased artifact discovery and boot pipeline for rabita.
//!
//! Booters scan the project tree for artifact files, map them to
//! link-time-registered classes, and bind those classes into the
//! container; the [`Bootstrapper`] drives every registered booter
//! through the phases and aggregates a [`BootReport`].
//!
//! ```text
//! Bootstrapper ──find_by_tag("booter")──> [Booter, Booter, ...]
//!      │
//!      ├─ configure()  on all booters   (merge options + conventions)
//!      ├─ discover()   on all booters   (glob the project tree)
//!      └─ load()       on all booters   (registry lookup + bind)
//!                                            │
//!                                            ▼
//!                                        Container
//! ```

pub mod booter;
pub mod bootstrapper;
pub mod discovery;
pub mod error;
pub mod loader;
pub mod options;
pub mod report;

pub use booter::{ArtifactBooter, ArtifactStats, BootPhase, Booter};
pub use bootstrapper::{BOOTER_TAG, BootOptions, Bootstrapper, register_booter};
pub use discovery::discover_files;
pub use error::{BootError, Result};
pub use loader::{
    ArtifactRegistration, ArtifactSource, StaticRegistry, register_artifact_class,
};
pub use options::{ArtifactConventions, ArtifactOptions};
pub use report::{BootReport, PhaseStats};
