//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/famtree/famtree.toml`
//! 3. Local config: `<dir>/.famtree.toml` (usually the working directory)
//! 4. Environment variables: `FAMTREE_*` prefix

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{expand_env_vars, ParseOptions};

/// How strictly tree files are parsed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ParseSettings {
    /// Accept a child name that already exists in the tree
    pub allow_duplicates: bool,
    /// Accept a line whose parent name is empty
    pub allow_empty_parent: bool,
    /// Skip blank and `#` comment lines
    pub skip_blank_lines: bool,
}

impl Default for ParseSettings {
    fn default() -> Self {
        let options = ParseOptions::default();
        Self {
            allow_duplicates: options.allow_duplicates,
            allow_empty_parent: options.allow_empty_parent,
            skip_blank_lines: options.skip_blank_lines,
        }
    }
}

impl From<&ParseSettings> for ParseOptions {
    fn from(settings: &ParseSettings) -> Self {
        Self {
            allow_duplicates: settings.allow_duplicates,
            allow_empty_parent: settings.allow_empty_parent,
            skip_blank_lines: settings.skip_blank_lines,
        }
    }
}

/// Raw parse settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawParseSettings {
    pub allow_duplicates: Option<bool>,
    pub allow_empty_parent: Option<bool>,
    pub skip_blank_lines: Option<bool>,
}

impl ParseSettings {
    fn overlay(&self, raw: &RawParseSettings) -> Self {
        Self {
            allow_duplicates: raw.allow_duplicates.unwrap_or(self.allow_duplicates),
            allow_empty_parent: raw.allow_empty_parent.unwrap_or(self.allow_empty_parent),
            skip_blank_lines: raw.skip_blank_lines.unwrap_or(self.skip_blank_lines),
        }
    }
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_dir: Option<PathBuf>,
    pub extensions: Option<Vec<String>>,
    #[serde(default)]
    pub parse: RawParseSettings,
}

/// Unified configuration for famtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory offered for interactive tree file selection (default: data)
    pub data_dir: PathBuf,
    /// File extensions considered tree files (default: ["txt"])
    pub extensions: Vec<String>,
    /// Parser strictness
    pub parse: ParseSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            extensions: vec!["txt".into()],
            parse: ParseSettings::default(),
        }
    }
}

/// Get the XDG config directory for famtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "famtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("famtree.toml"))
}

/// Get the path to the local config file in `dir`.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".famtree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge arrays with union semantics and negation support.
    ///
    /// - Items from overlay are added to base
    /// - Items prefixed with `!` remove the corresponding item from the result
    /// - Duplicates are de-duplicated
    ///
    /// # Examples
    /// ```ignore
    /// merge_array(&["txt"], &["tree"])         // → ["tree", "txt"]
    /// merge_array(&["txt", "fam"], &["!txt"])  // → ["fam"]
    /// ```
    pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
        let mut result: HashSet<String> = base.iter().cloned().collect();

        for pattern in overlay {
            if let Some(negated) = pattern.strip_prefix('!') {
                result.remove(negated);
            } else {
                result.insert(pattern.clone());
            }
        }

        let mut vec: Vec<String> = result.into_iter().collect();
        vec.sort();
        vec
    }

    /// Expand `~`, `$VAR` and `${VAR}` in the data directory.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.data_dir.to_string_lossy().as_ref());
        self.data_dir = PathBuf::from(expanded);
    }

    /// Apply global config onto defaults: everything specified replaces.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            data_dir: global
                .data_dir
                .clone()
                .unwrap_or_else(|| self.data_dir.clone()),
            extensions: global
                .extensions
                .clone()
                .unwrap_or_else(|| self.extensions.clone()),
            parse: self.parse.overlay(&global.parse),
        }
    }

    /// Merge local config onto self: scalars replace, extensions union with
    /// `!ext` negation.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_dir: overlay
                .data_dir
                .clone()
                .unwrap_or_else(|| self.data_dir.clone()),
            extensions: overlay
                .extensions
                .as_ref()
                .map(|o| Self::merge_array(&self.extensions, o))
                .unwrap_or_else(|| self.extensions.clone()),
            parse: self.parse.overlay(&overlay.parse),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.famtree.toml`
    ///
    /// # Array Merge Semantics
    /// - Defaults → Global: REPLACE
    /// - Global → Local: UNION with negation support
    /// - Any → Env vars: REPLACE
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply FAMTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("FAMTREE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("extensions"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("data_dir") {
            settings.data_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get::<Vec<String>>("extensions") {
            settings.extensions = val;
        }
        if let Ok(val) = config.get_bool("parse.allow_duplicates") {
            settings.parse.allow_duplicates = val;
        }
        if let Ok(val) = config.get_bool("parse.allow_empty_parent") {
            settings.parse.allow_empty_parent = val;
        }
        if let Ok(val) = config.get_bool("parse.skip_blank_lines") {
            settings.parse.skip_blank_lines = val;
        }

        Ok(settings)
    }

    /// Parser options derived from these settings.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::from(&self.parse)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# famtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/famtree/famtree.toml
#   Local:  ./.famtree.toml
#   Env:    FAMTREE_* environment variables (FAMTREE_PARSE__SKIP_BLANK_LINES=true)
#
# Local extensions are merged with global ones; "!ext" removes an inherited one.

# Directory offered when no tree file is given
# data_dir = "data"

# Extensions of tree files
# extensions = ["txt"]

[parse]
# Allow a name to appear more than once (lookups pick the first in pre-order)
# allow_duplicates = false

# Accept lines like ": Child" with an empty parent name
# allow_empty_parent = true

# Skip blank lines and lines starting with '#'
# skip_blank_lines = false
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
