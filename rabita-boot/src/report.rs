//! The boot report.
//!
//! Created fresh for every `boot()` call and handed back for the
//! caller to inspect; `is_success()` is the one-line health check.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use crate::booter::{ArtifactStats, BootPhase};

/// What one phase did across all booters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PhaseStats {
    /// Wall time the phase took across all booters.
    pub duration: Duration,
    /// Errors caught during the phase, prefixed with the booter name.
    pub errors: Vec<String>,
}

/// Aggregated outcome of one boot run.
#[derive(Debug, Clone, Serialize)]
pub struct BootReport {
    /// Total wall time of the run.
    pub duration: Duration,
    /// Per-artifact-category stats, keyed by booter name.
    pub artifacts: BTreeMap<String, ArtifactStats>,
    /// Per-phase stats in canonical phase order.
    pub phases: BTreeMap<BootPhase, PhaseStats>,
    /// Artifact classes bound across all booters.
    pub total_loaded: usize,
    /// Errors caught across all booters.
    pub total_errors: usize,
}

impl BootReport {
    pub(crate) fn new(
        duration: Duration,
        artifacts: BTreeMap<String, ArtifactStats>,
        phases: BTreeMap<BootPhase, PhaseStats>,
    ) -> Self {
        let total_loaded = artifacts.values().map(|stats| stats.loaded).sum();
        let total_errors = artifacts.values().map(|stats| stats.errors).sum();
        Self {
            duration,
            artifacts,
            phases,
            total_loaded,
            total_errors,
        }
    }

    /// `true` iff no errors were caught anywhere in the run.
    pub fn is_success(&self) -> bool {
        self.total_errors == 0
    }

    /// Renders a human-readable summary.
    ///
    /// ```text
    /// boot finished in 12ms: 5 loaded, 0 errors
    /// controllers   discovered 1  loaded 1  errors 0
    /// repositories  discovered 4  loaded 4  errors 0
    /// ```
    pub fn render(&self) -> String {
        let mut out = format!(
            "boot finished in {:?}: {} loaded, {} errors\n",
            self.duration, self.total_loaded, self.total_errors,
        );

        let rows: Vec<(String, Vec<(&'static str, usize)>)> = self
            .artifacts
            .iter()
            .map(|(name, stats)| {
                (
                    name.clone(),
                    vec![
                        ("discovered", stats.discovered),
                        ("loaded", stats.loaded),
                        ("errors", stats.errors),
                    ],
                )
            })
            .collect();
        out.push_str(&rabita_support::rendering::render_count_table(&rows));

        for (phase, stats) in &self.phases {
            for error in &stats.errors {
                out.push_str(&format!("{phase}: {error}\n"));
            }
        }
        out
    }
}
