//! The bootstrapper — global phase orchestration.
//!
//! Drives every booter registered in the container (tag `"booter"`)
//! through the phases globally: `configure` on all booters, then
//! `discover` on all, then `load` on all. All discovery results are
//! known before any artifact class is bound, which bounds the blast
//! radius of a partial failure.
//!
//! Failure containment has two levels: an error inside one booter's
//! phase is caught and recorded without touching sibling booters, while
//! inside a single booter's `load()` the first bad file aborts the rest
//! of that call. A booter that errors sits out the remaining phases, so
//! every root failure is recorded exactly once. `boot()` itself resolves
//! under partial failure — callers check [`BootReport::is_success`].

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument, warn};

use rabita_container::prelude::{BindingKey, Container};

use crate::booter::{BootPhase, Booter};
use crate::error::Result;
use crate::report::{BootReport, PhaseStats};

/// The tag that marks a binding as a booter.
pub const BOOTER_TAG: &str = "booter";

/// Restricts what a boot run executes; both fields default to "all".
#[derive(Debug, Clone, Default)]
pub struct BootOptions {
    /// Which phases run. A subset never reorders the canonical
    /// configure → discover → load sequence.
    pub phases: Option<Vec<BootPhase>>,
    /// Which booters participate, by name.
    pub booters: Option<Vec<String>>,
}

/// Binds `booter` under `"booters.{name}"` tagged [`BOOTER_TAG`] so the
/// bootstrapper finds it.
pub fn register_booter(
    container: &Container,
    name: &str,
    booter: Arc<dyn Booter>,
) -> rabita_container::Result<()> {
    container
        .bind(BindingKey::for_artifact("booters", name))
        .to_value(booter)?
        .set_tags([BOOTER_TAG]);
    Ok(())
}

/// Orchestrates all registered booters through the boot phases.
pub struct Bootstrapper {
    container: Container,
}

impl Bootstrapper {
    pub fn new(container: Container) -> Self {
        Self { container }
    }

    /// The container this bootstrapper registers artifacts into.
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Runs the boot sequence and returns the aggregated report.
    ///
    /// Per-booter phase errors are caught into the report; the returned
    /// future only fails when the booter bindings themselves cannot be
    /// resolved — that is wiring misconfiguration, not a boot failure.
    #[instrument(skip(self, options), name = "boot")]
    pub async fn boot(&self, options: BootOptions) -> Result<BootReport> {
        let started = Instant::now();

        let booters = self.booters(&options)?;
        let phases: Vec<BootPhase> = BootPhase::ALL
            .into_iter()
            .filter(|phase| match &options.phases {
                Some(requested) => requested.contains(phase),
                None => true,
            })
            .collect();
        info!(booters = booters.len(), phases = phases.len(), "Booting");

        let mut caught: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut failed: BTreeSet<String> = BTreeSet::new();
        let mut phase_reports: BTreeMap<BootPhase, PhaseStats> = BTreeMap::new();

        for phase in phases {
            let phase_started = Instant::now();
            let mut errors = Vec::new();

            for booter in &booters {
                // A booter that errored in an earlier phase sits out the
                // rest of the run; re-driving it would only re-report the
                // same root failure.
                if failed.contains(booter.name()) {
                    continue;
                }

                let outcome = match phase {
                    BootPhase::Configure => booter.configure().await,
                    BootPhase::Discover => booter.discover().await,
                    BootPhase::Load => booter.load().await,
                };

                if let Err(error) = outcome {
                    warn!(
                        booter = booter.name(),
                        phase = %phase,
                        error = %error,
                        "Booter phase failed"
                    );
                    caught
                        .entry(booter.name().to_string())
                        .or_default()
                        .push(error.to_string());
                    errors.push(format!("{}: {error}", booter.name()));
                    failed.insert(booter.name().to_string());
                }
            }

            phase_reports.insert(
                phase,
                PhaseStats {
                    duration: phase_started.elapsed(),
                    errors,
                },
            );
        }

        let mut artifacts = BTreeMap::new();
        for booter in &booters {
            let mut stats = booter.stats();
            if let Some(messages) = caught.remove(booter.name()) {
                stats.errors += messages.len();
                stats.error_messages.extend(messages);
            }
            artifacts.insert(booter.name().to_string(), stats);
        }

        let report = BootReport::new(started.elapsed(), artifacts, phase_reports);
        info!(
            loaded = report.total_loaded,
            errors = report.total_errors,
            "Boot finished"
        );
        Ok(report)
    }

    /// Resolves the participating booters from the container.
    fn booters(&self, options: &BootOptions) -> Result<Vec<Arc<dyn Booter>>> {
        let bindings = self.container.find_by_tag(BOOTER_TAG);

        let mut booters = Vec::new();
        for binding in bindings {
            let resolved = self.container.get::<Arc<dyn Booter>>(binding.key().clone())?;
            let booter: Arc<dyn Booter> = Arc::clone(&*resolved);

            let participates = match &options.booters {
                Some(wanted) => wanted.iter().any(|name| name == booter.name()),
                None => true,
            };
            if participates {
                booters.push(booter);
            }
        }
        Ok(booters)
    }
}
