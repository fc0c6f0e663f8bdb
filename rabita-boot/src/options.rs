//! Discovery configuration for one artifact category.
//!
//! [`ArtifactOptions`] is what an application supplies (all fields
//! optional, config-file friendly); [`ArtifactConventions`] is what a
//! category's booter defaults to. The two merge at `configure()` time
//! into the effective glob pattern.

use serde::Deserialize;

/// Caller-supplied discovery options, merged over category conventions.
///
/// An explicit [`glob`](ArtifactOptions::glob) overrides pattern
/// derivation entirely.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ArtifactOptions {
    /// Directories to scan, relative to the project root.
    pub dirs: Option<Vec<String>>,
    /// File extensions to match (e.g. `".repository.rs"`).
    pub extensions: Option<Vec<String>>,
    /// Whether to descend into nested directories.
    pub nested: Option<bool>,
    /// Full glob pattern; set it to bypass derivation.
    pub glob: Option<String>,
}

impl ArtifactOptions {
    /// The effective glob pattern after merging over `conventions`.
    ///
    /// Derivation: `{dirs}/**/*{extensions}` when nested, else
    /// `{dirs}/*{extensions}`, with `{a,b}` alternation for
    /// multi-entry lists.
    pub fn effective_glob(&self, conventions: &ArtifactConventions) -> String {
        if let Some(glob) = &self.glob {
            return glob.clone();
        }

        let dirs = self.dirs.as_ref().unwrap_or(&conventions.dirs);
        let extensions = self.extensions.as_ref().unwrap_or(&conventions.extensions);
        let nested = self.nested.unwrap_or(conventions.nested);

        let dir_part = alternation(dirs);
        let extension_part = alternation(extensions);
        if nested {
            format!("{dir_part}/**/*{extension_part}")
        } else {
            format!("{dir_part}/*{extension_part}")
        }
    }
}

/// A category's default discovery pattern pieces.
#[derive(Debug, Clone)]
pub struct ArtifactConventions {
    /// Default directories, relative to the project root.
    pub dirs: Vec<String>,
    /// Default file extensions.
    pub extensions: Vec<String>,
    /// Whether nested directories are scanned by default.
    pub nested: bool,
}

impl ArtifactConventions {
    /// Conventions with the given dirs and extensions, nested scanning on.
    pub fn new<D, E>(dirs: D, extensions: E) -> Self
    where
        D: IntoIterator<Item = &'static str>,
        E: IntoIterator<Item = &'static str>,
    {
        Self {
            dirs: dirs.into_iter().map(str::to_string).collect(),
            extensions: extensions.into_iter().map(str::to_string).collect(),
            nested: true,
        }
    }

    pub fn controllers() -> Self {
        Self::new(["controllers"], [".controller.rs"])
    }

    pub fn repositories() -> Self {
        Self::new(["repositories"], [".repository.rs"])
    }

    pub fn services() -> Self {
        Self::new(["services"], [".service.rs"])
    }

    pub fn datasources() -> Self {
        Self::new(["datasources"], [".datasource.rs"])
    }
}

fn alternation(items: &[String]) -> String {
    match items {
        [single] => single.clone(),
        many => format!("{{{}}}", many.join(",")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_nested_pattern_from_conventions() {
        let options = ArtifactOptions::default();
        let pattern = options.effective_glob(&ArtifactConventions::repositories());
        assert_eq!(pattern, "repositories/**/*.repository.rs");
    }

    #[test]
    fn derives_flat_pattern_when_not_nested() {
        let options = ArtifactOptions {
            nested: Some(false),
            ..Default::default()
        };
        let pattern = options.effective_glob(&ArtifactConventions::controllers());
        assert_eq!(pattern, "controllers/*.controller.rs");
    }

    #[test]
    fn options_override_convention_dirs() {
        let options = ArtifactOptions {
            dirs: Some(vec!["src/repositories".to_string()]),
            ..Default::default()
        };
        let pattern = options.effective_glob(&ArtifactConventions::repositories());
        assert_eq!(pattern, "src/repositories/**/*.repository.rs");
    }

    #[test]
    fn multiple_entries_use_alternation() {
        let options = ArtifactOptions {
            dirs: Some(vec!["repositories".to_string(), "repos".to_string()]),
            extensions: Some(vec![".repository.rs".to_string(), ".repo.rs".to_string()]),
            ..Default::default()
        };
        let pattern = options.effective_glob(&ArtifactConventions::repositories());
        assert_eq!(
            pattern,
            "{repositories,repos}/**/*{.repository.rs,.repo.rs}"
        );
    }

    #[test]
    fn explicit_glob_overrides_derivation() {
        let options = ArtifactOptions {
            dirs: Some(vec!["ignored".to_string()]),
            glob: Some("custom/**/*.rs".to_string()),
            ..Default::default()
        };
        let pattern = options.effective_glob(&ArtifactConventions::repositories());
        assert_eq!(pattern, "custom/**/*.rs");
    }

    #[test]
    fn options_deserialize_with_all_fields_optional() {
        let options: ArtifactOptions = serde_json::from_str("{}").unwrap();
        assert!(options.dirs.is_none());

        let options: ArtifactOptions =
            serde_json::from_str(r#"{"dirs": ["repos"], "nested": false}"#).unwrap();
        assert_eq!(options.dirs.as_deref(), Some(&["repos".to_string()][..]));
        assert_eq!(options.nested, Some(false));
    }
}
