//! End-to-end boot pipeline: fixture project trees booted through the
//! bootstrapper, with cross-booter failure isolation and phase/booter
//! subsetting.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rabita_boot::{
    ArtifactBooter, ArtifactOptions, ArtifactRegistration, ArtifactSource, BootOptions,
    BootPhase, Bootstrapper, register_artifact_class, register_booter,
};
use rabita_container::prelude::*;

struct Model1Repository;

impl Injectable for Model1Repository {
    fn metadata() -> ClassMetadata {
        ClassMetadata::new()
    }

    fn construct(_args: &mut ResolvedArguments<'_>) -> Result<Self> {
        Ok(Model1Repository)
    }
}

struct Model2Repository;

impl Injectable for Model2Repository {
    fn metadata() -> ClassMetadata {
        ClassMetadata::new()
    }

    fn construct(_args: &mut ResolvedArguments<'_>) -> Result<Self> {
        Ok(Model2Repository)
    }
}

inventory::submit! {
    ArtifactRegistration::new(
        "repositories",
        "Model1Repository",
        "model1.repository",
        register_artifact_class::<Model1Repository>,
    )
}

inventory::submit! {
    ArtifactRegistration::new(
        "repositories",
        "Model2Repository",
        "model2.repository",
        register_artifact_class::<Model2Repository>,
    )
}

fn repository_fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("repositories")).unwrap();
    fs::write(dir.path().join("repositories/model1.repository.rs"), "").unwrap();
    fs::write(dir.path().join("repositories/model2.repository.rs"), "").unwrap();
    dir
}

fn wire_repositories(container: &Container, root: &Path) {
    let booter =
        ArtifactBooter::repositories(container.clone(), root, ArtifactOptions::default());
    register_booter(container, "repositories", Arc::new(booter)).unwrap();
}

#[tokio::test]
async fn boots_repositories_end_to_end() {
    let dir = repository_fixture();
    let container = Container::new();
    wire_repositories(&container, dir.path());

    let report = Bootstrapper::new(container.clone())
        .boot(BootOptions::default())
        .await
        .unwrap();

    assert!(report.is_success());
    assert_eq!(report.total_loaded, 2);
    assert_eq!(report.artifacts["repositories"].discovered, 2);

    let model1 = container
        .get_optional::<Model1Repository>("repositories.Model1Repository")
        .unwrap();
    let model2 = container
        .get_optional::<Model2Repository>("repositories.Model2Repository")
        .unwrap();
    assert!(model1.is_some());
    assert!(model2.is_some());
}

#[tokio::test]
async fn failing_booter_does_not_abort_siblings() {
    let dir = repository_fixture();
    let container = Container::new();
    wire_repositories(&container, dir.path());

    // A services booter with an invalid explicit glob: its discover()
    // fails, the repositories booter must still complete.
    let services = ArtifactBooter::services(
        container.clone(),
        dir.path(),
        ArtifactOptions {
            glob: Some("services/[".to_string()),
            ..Default::default()
        },
    );
    register_booter(&container, "services", Arc::new(services)).unwrap();

    let report = Bootstrapper::new(container.clone())
        .boot(BootOptions::default())
        .await
        .unwrap();

    assert!(!report.is_success());
    assert_eq!(report.total_errors, 1);
    assert_eq!(report.total_loaded, 2);

    // The error is attributed to the services entry only
    assert_eq!(report.artifacts["services"].errors, 1);
    assert!(report.artifacts["services"].error_messages[0].contains("services/["));
    assert_eq!(report.artifacts["repositories"].errors, 0);
    assert_eq!(report.artifacts["repositories"].loaded, 2);

    let discover_errors = &report.phases[&BootPhase::Discover].errors;
    assert_eq!(discover_errors.len(), 1);
    assert!(discover_errors[0].starts_with("services:"));

    // The services booter sat out the load phase; its discovery failure
    // is not re-reported there.
    assert!(report.phases[&BootPhase::Load].errors.is_empty());

    let model1 = container
        .get_optional::<Model1Repository>("repositories.Model1Repository")
        .unwrap();
    assert!(model1.is_some());
}

#[tokio::test]
async fn phase_subset_stops_before_load() {
    let dir = repository_fixture();
    let container = Container::new();
    wire_repositories(&container, dir.path());

    let report = Bootstrapper::new(container.clone())
        .boot(BootOptions {
            phases: Some(vec![BootPhase::Configure, BootPhase::Discover]),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(report.is_success());
    assert_eq!(report.artifacts["repositories"].discovered, 2);
    assert_eq!(report.total_loaded, 0);
    assert_eq!(report.phases.len(), 2);

    let model1 = container
        .get_optional::<Model1Repository>("repositories.Model1Repository")
        .unwrap();
    assert!(model1.is_none());
}

#[tokio::test]
async fn phase_subset_never_reorders() {
    let dir = repository_fixture();
    let container = Container::new();
    wire_repositories(&container, dir.path());

    // Requested back to front; the canonical order still applies, so
    // the full pipeline works.
    let report = Bootstrapper::new(container.clone())
        .boot(BootOptions {
            phases: Some(vec![BootPhase::Load, BootPhase::Discover, BootPhase::Configure]),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(report.is_success());
    assert_eq!(report.total_loaded, 2);
}

#[tokio::test]
async fn booter_subset_restricts_by_name() {
    let dir = repository_fixture();
    let container = Container::new();
    wire_repositories(&container, dir.path());

    let datasources =
        ArtifactBooter::datasources(container.clone(), dir.path(), ArtifactOptions::default());
    register_booter(&container, "datasources", Arc::new(datasources)).unwrap();

    let report = Bootstrapper::new(container.clone())
        .boot(BootOptions {
            booters: Some(vec!["repositories".to_string()]),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(report.artifacts.contains_key("repositories"));
    assert!(!report.artifacts.contains_key("datasources"));
}

static PINNED_REGISTRATION: ArtifactRegistration = ArtifactRegistration::new(
    "repositories",
    "PinnedRepository",
    "pinned.repository",
    register_artifact_class::<Model1Repository>,
);

struct PinnedSource;

impl ArtifactSource for PinnedSource {
    fn load(
        &self,
        _files: &[PathBuf],
    ) -> rabita_boot::Result<Vec<&'static ArtifactRegistration>> {
        Ok(vec![&PINNED_REGISTRATION])
    }
}

#[tokio::test]
async fn custom_artifact_source_replaces_the_registry() {
    let dir = repository_fixture();
    let container = Container::new();

    let booter = ArtifactBooter::repositories(
        container.clone(),
        dir.path(),
        ArtifactOptions::default(),
    )
    .with_source(Arc::new(PinnedSource));
    register_booter(&container, "repositories", Arc::new(booter)).unwrap();

    let report = Bootstrapper::new(container.clone())
        .boot(BootOptions::default())
        .await
        .unwrap();

    assert!(report.is_success());
    let pinned = container
        .get_optional::<Model1Repository>("repositories.PinnedRepository")
        .unwrap();
    assert!(pinned.is_some());
}
