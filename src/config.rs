//! User settings: a YAML file plus `GITREE_*` environment overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::adapters::live::GitOptions;
use crate::protocol::{ColorThemeKind, WebviewConfig};

/// Settings file looked up in the working directory.
pub const DEFAULT_FILE_NAME: &str = ".gitree.yaml";

/// Failure to assemble [`Settings`].
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings file {}: {source}", path.display())]
    Read {
        /// File that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The settings file is not valid YAML for [`Settings`].
    #[error("failed to parse settings file {}: {source}", path.display())]
    Parse {
        /// File that was parsed.
        path: PathBuf,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },
    /// An environment override has an unusable value.
    #[error("invalid {var}={value:?}: {reason}")]
    Invalid {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
        /// What was expected.
        reason: String,
    },
}

/// Effective settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// How git is run.
    pub git: GitSettings,
    /// How pages look.
    pub appearance: AppearanceSettings,
    /// Where page assets are served from.
    pub assets: AssetSettings,
}

/// The `git` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitSettings {
    /// Git binary, looked up on `PATH` when relative.
    pub path: PathBuf,
    /// Per-invocation timeout in seconds.
    pub timeout_secs: u64,
    /// Upper bound on commits loaded into the graph.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_count: Option<usize>,
}

impl Default for GitSettings {
    fn default() -> Self {
        Self { path: PathBuf::from("git"), timeout_secs: 30, max_count: None }
    }
}

/// The `appearance` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppearanceSettings {
    /// Host color theme kind.
    pub color_theme: ColorThemeKind,
    /// Display language tag.
    pub language: String,
}

impl Default for AppearanceSettings {
    fn default() -> Self {
        Self { color_theme: ColorThemeKind::Dark, language: "en".into() }
    }
}

/// The `assets` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetSettings {
    /// Base URI of the bundled `css/` and `js/` directories.
    pub resource_uri: String,
    /// Base URI of the localization bundles.
    pub l10n_uri: String,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self { resource_uri: "assets".into(), l10n_uri: "l10n".into() }
    }
}

impl Settings {
    /// Reads `explicit`, or `<workdir>/.gitree.yaml` when it exists, or
    /// falls back to defaults. Returns the file that was used.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed. An explicit
    /// file must exist.
    pub fn load(
        explicit: Option<&Path>,
        workdir: &Path,
    ) -> Result<(Self, Option<PathBuf>), SettingsError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = workdir.join(DEFAULT_FILE_NAME);
                if !candidate.is_file() {
                    debug!(path = %candidate.display(), "no settings file; using defaults");
                    return Ok((Self::default(), None));
                }
                candidate
            }
        };
        let content = std::fs::read_to_string(&path)
            .map_err(|source| SettingsError::Read { path: path.clone(), source })?;
        let settings = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(&content)
                .map_err(|source| SettingsError::Parse { path: path.clone(), source })?
        };
        debug!(path = %path.display(), "settings loaded");
        Ok((settings, Some(path)))
    }

    /// Applies `GITREE_*` overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error for unparsable values.
    pub fn apply_env(&mut self) -> Result<(), SettingsError> {
        self.apply_overrides(|var| std::env::var(var).ok())
    }

    /// Applies `GITREE_*` overrides read through `lookup`. Empty values
    /// count as unset.
    ///
    /// # Errors
    ///
    /// Returns an error for unparsable values.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), SettingsError> {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

        if let Some(path) = get("GITREE_GIT_PATH") {
            self.git.path = PathBuf::from(path);
        }
        if let Some(value) = get("GITREE_GIT_TIMEOUT") {
            self.git.timeout_secs = value.trim().parse().map_err(|e| SettingsError::Invalid {
                var: "GITREE_GIT_TIMEOUT",
                value: value.clone(),
                reason: format!("expected whole seconds: {e}"),
            })?;
        }
        if let Some(value) = get("GITREE_MAX_COUNT") {
            let count: usize = value.trim().parse().map_err(|e| SettingsError::Invalid {
                var: "GITREE_MAX_COUNT",
                value: value.clone(),
                reason: format!("expected a commit count: {e}"),
            })?;
            self.git.max_count = (count > 0).then_some(count);
        }
        if let Some(value) = get("GITREE_THEME") {
            self.appearance.color_theme = value.parse().map_err(|reason| SettingsError::Invalid {
                var: "GITREE_THEME",
                value: value.clone(),
                reason,
            })?;
        }
        if let Some(language) = get("GITREE_LANGUAGE") {
            self.appearance.language = language;
        }
        if let Some(uri) = get("GITREE_RESOURCE_URI") {
            self.assets.resource_uri = uri;
        }
        if let Some(uri) = get("GITREE_L10N_URI") {
            self.assets.l10n_uri = uri;
        }
        Ok(())
    }

    /// Git invocation options for a repository in `workdir`. A zero
    /// timeout is raised to one second.
    #[must_use]
    pub fn git_options(&self, workdir: &Path) -> GitOptions {
        GitOptions {
            binary: self.git.path.clone(),
            workdir: workdir.to_path_buf(),
            timeout: Duration::from_secs(self.git.timeout_secs.max(1)),
        }
    }

    /// Configuration embedded into rendered pages.
    #[must_use]
    pub fn webview_config(&self) -> WebviewConfig {
        WebviewConfig {
            theme: self.appearance.color_theme.page_theme().to_string(),
            language: self.appearance.language.clone(),
            l10n_uri: self.assets.l10n_uri.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |var| map.get(var).cloned()
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gitree_settings_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_default_file_yields_defaults() {
        let dir = temp_dir("missing");
        let (settings, path) = Settings::load(None, &dir).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(path, None);
        assert_eq!(settings.git_options(&dir).timeout, Duration::from_secs(30));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = temp_dir("partial");
        std::fs::write(
            dir.join(DEFAULT_FILE_NAME),
            "git:\n  max_count: 200\nappearance:\n  color_theme: high_contrast_light\n",
        )
        .unwrap();

        let (settings, path) = Settings::load(None, &dir).unwrap();
        assert_eq!(path, Some(dir.join(DEFAULT_FILE_NAME)));
        assert_eq!(settings.git.max_count, Some(200));
        assert_eq!(settings.git.path, PathBuf::from("git"));
        assert_eq!(settings.webview_config().theme, "white");
        assert_eq!(settings.webview_config().language, "en");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn unknown_keys_and_missing_explicit_files_are_errors() {
        let dir = temp_dir("invalid");
        let file = dir.join("custom.yaml");
        std::fs::write(&file, "git:\n  binary: /usr/bin/git\n").unwrap();

        assert!(matches!(Settings::load(Some(&file), &dir), Err(SettingsError::Parse { .. })));
        assert!(matches!(
            Settings::load(Some(&dir.join("absent.yaml")), &dir),
            Err(SettingsError::Read { .. })
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut settings = Settings::default();
        settings
            .apply_overrides(env(&[
                ("GITREE_GIT_PATH", "/opt/git/bin/git"),
                ("GITREE_GIT_TIMEOUT", "5"),
                ("GITREE_MAX_COUNT", "0"),
                ("GITREE_THEME", "light"),
                ("GITREE_LANGUAGE", "de"),
                ("GITREE_RESOURCE_URI", "https://cdn.example/assets"),
                ("GITREE_L10N_URI", ""),
            ]))
            .unwrap();

        let options = settings.git_options(Path::new("/repo"));
        assert_eq!(options.binary, PathBuf::from("/opt/git/bin/git"));
        assert_eq!(options.timeout, Duration::from_secs(5));
        assert_eq!(settings.git.max_count, None);
        assert_eq!(settings.appearance.color_theme, ColorThemeKind::Light);
        assert_eq!(settings.assets.resource_uri, "https://cdn.example/assets");
        assert_eq!(settings.assets.l10n_uri, "l10n");
        assert_eq!(settings.webview_config().language, "de");
    }

    #[test]
    fn bad_override_names_the_variable() {
        let mut settings = Settings::default();
        let err = settings.apply_overrides(env(&[("GITREE_GIT_TIMEOUT", "soon")])).unwrap_err();
        assert!(err.to_string().starts_with("invalid GITREE_GIT_TIMEOUT=\"soon\""), "{err}");

        let err = settings.apply_overrides(env(&[("GITREE_THEME", "sepia")])).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { var: "GITREE_THEME", .. }));
    }
}
