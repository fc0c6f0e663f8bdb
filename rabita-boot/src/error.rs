//! Error types for the boot pipeline.

use std::path::PathBuf;

use rabita_container::ContainerError;

/// Main error type for discovery, loading, and boot orchestration.
#[derive(Debug, thiserror::Error)]
pub enum BootError {
    /// A glob pattern failed to compile or the filesystem walk failed.
    #[error("Artifact discovery failed for pattern {pattern:?} under {}: {source}", root.display())]
    Discovery {
        pattern: String,
        root: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A discovered file could not be mapped to a registered artifact
    /// class, or binding the class failed.
    #[error("Failed to load artifact file {}: {reason}", file.display())]
    Load { file: PathBuf, reason: String },

    /// A booter phase ran out of order.
    #[error("Boot phase {phase} requires {requires} to have run first")]
    PhaseOrder {
        phase: &'static str,
        requires: &'static str,
    },

    /// A container operation failed during boot.
    #[error(transparent)]
    Container(#[from] ContainerError),
}

/// Convenient Result type for boot operations.
pub type Result<T> = std::result::Result<T, BootError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_error_names_pattern_and_root() {
        let err = BootError::Discovery {
            pattern: "repositories/**/*.repository.rs".to_string(),
            root: PathBuf::from("/srv/app"),
            source: "permission denied".into(),
        };

        let msg = format!("{err}");
        assert!(msg.contains("repositories/**/*.repository.rs"));
        assert!(msg.contains("/srv/app"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn load_error_names_the_file() {
        let err = BootError::Load {
            file: PathBuf::from("/srv/app/repositories/user.repository.rs"),
            reason: "no artifact class registered for this file".to_string(),
        };

        let msg = format!("{err}");
        assert!(msg.contains("user.repository.rs"));
        assert!(msg.contains("no artifact class registered"));
    }

    #[test]
    fn container_errors_convert() {
        let inner = ContainerError::TypeMismatch {
            key: rabita_container::BindingKey::new("k"),
            expected: "i32",
        };
        let err: BootError = inner.into();
        assert!(matches!(err, BootError::Container(_)));
    }
}
