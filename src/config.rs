//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/legendtoc/legendtoc.toml`
//! 3. Local config: `<project_dir>/.legendtoc.toml`
//! 4. Environment variables: `LEGENDTOC_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::util::path::{expand_env_vars, resolve_against};

/// Menu presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MenuSettings {
    /// Label of the menu bar button
    pub title: String,
    /// Name of the element the menu bar is attached to
    pub anchor: String,
    /// Label shown for legend swatches without a label
    pub empty_label: String,
    /// MIME type for swatch images without their own content type
    pub image_mime: String,
}

impl Default for MenuSettings {
    fn default() -> Self {
        Self {
            title: "Layers".into(),
            anchor: "tools-menu".into(),
            empty_label: "...".into(),
            image_mime: "image/png".into(),
        }
    }
}

/// Raw menu settings for intermediate parsing (`None` = not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawMenuSettings {
    pub title: Option<String>,
    pub anchor: Option<String>,
    pub empty_label: Option<String>,
    pub image_mime: Option<String>,
}

impl MenuSettings {
    /// Overlay wins where specified.
    pub fn merge(&self, overlay: &RawMenuSettings) -> Self {
        Self {
            title: overlay.title.clone().unwrap_or_else(|| self.title.clone()),
            anchor: overlay.anchor.clone().unwrap_or_else(|| self.anchor.clone()),
            empty_label: overlay
                .empty_label
                .clone()
                .unwrap_or_else(|| self.empty_label.clone()),
            image_mime: overlay
                .image_mime
                .clone()
                .unwrap_or_else(|| self.image_mime.clone()),
        }
    }
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub map_file: Option<PathBuf>,
    pub legend_dir: Option<PathBuf>,
    pub operational: Option<Vec<String>>,
    #[serde(default)]
    pub menu: RawMenuSettings,
}

/// Unified configuration for legendtoc.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Map document with the operational services (default: map.json)
    pub map_file: PathBuf,
    /// Directory with one legend response per service (default: legends)
    pub legend_dir: PathBuf,
    /// Service ids shown in the menu, in order; empty shows all services
    pub operational: Vec<String>,
    /// Menu presentation
    pub menu: MenuSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            map_file: PathBuf::from("map.json"),
            legend_dir: PathBuf::from("legends"),
            operational: Vec::new(),
            menu: MenuSettings::default(),
        }
    }
}

/// Get the XDG config directory for legendtoc.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "legendtoc").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("legendtoc.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".legendtoc.toml")
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
    /// Merge lists with union semantics and negation support, keeping order.
    ///
    /// - Items from overlay are appended to base
    /// - Items prefixed with `!` remove the corresponding item from the result
    /// - Duplicates are dropped
    ///
    /// # Examples
    /// ```ignore
    /// merge_array(&["a", "b"], &["c"])       // → ["a", "b", "c"]
    /// merge_array(&["a", "b"], &["!a", "c"]) // → ["b", "c"]
    /// ```
    pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
        let mut result: Vec<String> = Vec::with_capacity(base.len() + overlay.len());
        for item in base {
            if !result.contains(item) {
                result.push(item.clone());
            }
        }
        for pattern in overlay {
            if let Some(negated) = pattern.strip_prefix('!') {
                result.retain(|item| item != negated);
            } else if !result.contains(pattern) {
                result.push(pattern.clone());
            }
        }
        result
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.map_file = PathBuf::from(expand_env_vars(&self.map_file.to_string_lossy()));
        self.legend_dir = PathBuf::from(expand_env_vars(&self.legend_dir.to_string_lossy()));
    }

    /// Anchor relative `map_file` and `legend_dir` at `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        self.map_file = resolve_against(base, &self.map_file);
        self.legend_dir = resolve_against(base, &self.legend_dir);
    }

    /// Merge overlay config onto self (base) with union semantics for `operational`.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            map_file: overlay
                .map_file
                .clone()
                .unwrap_or_else(|| self.map_file.clone()),
            legend_dir: overlay
                .legend_dir
                .clone()
                .unwrap_or_else(|| self.legend_dir.clone()),
            operational: overlay
                .operational
                .as_ref()
                .map(|o| Self::merge_array(&self.operational, o))
                .unwrap_or_else(|| self.operational.clone()),
            menu: self.menu.merge(&overlay.menu),
        }
    }

    /// Apply global config onto defaults with REPLACE semantics for arrays.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            operational: global
                .operational
                .clone()
                .unwrap_or_else(|| self.operational.clone()),
            ..self.merge_with(&RawSettings {
                operational: None,
                ..global.clone()
            })
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory holding a local `.legendtoc.toml`
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config (arrays REPLACE defaults)
    /// 3. Local config (arrays UNION with global, `!item` removes)
    /// 4. Environment variables: `LEGENDTOC_*` prefix (REPLACES)
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        if let Some(project) = project_dir {
            let local_path = local_config_path(project);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply LEGENDTOC_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("LEGENDTOC")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("operational"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("map_file") {
            settings.map_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("legend_dir") {
            settings.legend_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get::<Vec<String>>("operational") {
            settings.operational = val;
        }
        if let Ok(val) = config.get_string("menu.title") {
            settings.menu.title = val;
        }
        if let Ok(val) = config.get_string("menu.anchor") {
            settings.menu.anchor = val;
        }
        if let Ok(val) = config.get_string("menu.empty_label") {
            settings.menu.empty_label = val;
        }
        if let Ok(val) = config.get_string("menu.image_mime") {
            settings.menu.image_mime = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# legendtoc configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/legendtoc/legendtoc.toml  (defines your baseline)
#   Local:  <project>/.legendtoc.toml           (project-specific additions)
#   Env:    LEGENDTOC_* environment variables   (explicit overrides)
#
# Array Merge Semantics:
#   Global config REPLACES compiled defaults.
#   Local config UNIONS with global. Use "!id" to REMOVE an inherited service:
#     operational = ["parcels", "!imagery"]

# Map document listing the operational services
# map_file = "map.json"

# Directory holding one legend response per service (<service id>.json)
# legend_dir = "legends"

# Services shown in the menu, in order (empty: all services of the map document)
# operational = ["parcels", "utilities"]

[menu]
# Label of the menu bar button
# title = "Layers"

# Element the menu bar is attached to
# anchor = "tools-menu"

# Label for legend swatches without a label
# empty_label = "..."

# MIME type of swatch images
# image_mime = "image/png"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
