//! Viewer configuration.
//!
//! Handles loading, validating, and merging `gallery.toml`. Stock defaults are
//! serialized to a TOML table and the user file is merged on top of it key by
//! key, so a config file only needs the values it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [server]
//! base_url = "http://localhost:8080/gallery/"
//! timeout_secs = 30          # 0 disables the timeout
//! cache_bust = true          # Append a random query value to every request
//! cache_bust_param = "dummy"
//!
//! [render]
//! on_failure = "show-error"  # or "keep-previous"
//! # asset_base = "https://cdn.example/gallery/"   # Export only
//!
//! [theme]
//! thumbnail_size = "150px"
//! thumbnail_gap = "0.5rem"
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#111111"
//! text_muted = "#666666"
//! accent = "#2b6cb0"
//!
//! [colors.dark]
//! background = "#111111"
//! text = "#eeeeee"
//! text_muted = "#999999"
//! accent = "#90cdf4"
//!
//! [export]
//! # max_workers = 4          # Omit for auto = CPU cores
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::viewer::FailurePolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILENAME: &str = "gallery.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Where the gallery endpoints live and how requests are made.
    pub server: ServerConfig,
    /// Rendering behavior.
    pub render: RenderConfig,
    /// Layout values for the generated stylesheet.
    pub theme: ThemeConfig,
    /// Light and dark color schemes for the generated stylesheet.
    pub colors: ColorConfig,
    /// Static export settings.
    pub export: ExportConfig,
}

impl ViewerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.server.base_url).map_err(|e| {
            ConfigError::Validation(format!("server.base_url is not a URL: {e}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(
                "server.base_url must use http or https".into(),
            ));
        }
        if self.server.cache_bust_param.is_empty() {
            return Err(ConfigError::Validation(
                "server.cache_bust_param must not be empty".into(),
            ));
        }
        if self.theme.thumbnail_size.is_empty() {
            return Err(ConfigError::Validation(
                "theme.thumbnail_size must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Base for `thumbnail?name=` and `image?name=` links in exported pages.
    pub fn export_asset_base(&self) -> &str {
        self.render
            .asset_base
            .as_deref()
            .unwrap_or(&self.server.base_url)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Gallery application root; endpoints are resolved relative to it.
    pub base_url: String,
    /// Per-request timeout in seconds. `0` waits indefinitely.
    pub timeout_secs: u64,
    /// Whether to append a random query value to every request.
    pub cache_bust: bool,
    /// Name of the cache-bust query parameter.
    pub cache_bust_param: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/gallery/".to_string(),
            timeout_secs: 30,
            cache_bust: true,
            cache_bust_param: "dummy".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// What a region shows when its fetch fails.
    pub on_failure: FailurePolicy,
    /// Absolute base for asset links in exported pages. Falls back to
    /// `server.base_url`.
    pub asset_base: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Edge length of the square thumbnail box (CSS value).
    pub thumbnail_size: String,
    /// Gap between thumbnails and tag buttons (CSS value).
    pub thumbnail_gap: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            thumbnail_size: "150px".to_string(),
            thumbnail_gap: "0.5rem".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Labels, captions and error text.
    pub text_muted: String,
    /// Tag buttons and thumbnail hover outline.
    pub accent: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#111111".to_string(),
            text_muted: "#666666".to_string(),
            accent: "#2b6cb0".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#111111".to_string(),
            text: "#eeeeee".to_string(),
            text_muted: "#999999".to_string(),
            accent: "#90cdf4".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Maximum parallel fetches during export. `None` uses all cores;
    /// larger values are clamped to the core count.
    pub max_workers: Option<usize>,
}

/// Resolve the effective worker count for export.
pub fn effective_workers(config: &ExportConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_workers
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Stock default config as a `toml::Value::Table`, the base layer for merging.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(ViewerConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key by key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, deserialize, validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<ViewerConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ViewerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`.
///
/// A missing file yields the stock defaults when `required` is false (the
/// implicit `gallery.toml` lookup) and an IO error otherwise.
pub fn load_config(path: &Path, required: bool) -> Result<ViewerConfig, ConfigError> {
    if !path.exists() && !required {
        return resolve_config(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(value))
}

/// A fully-commented stock `gallery.toml`. Printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# gallery-view configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Server
# ---------------------------------------------------------------------------
[server]
# Gallery application root. Endpoints resolve relative to it:
#   rest/gallery, rest/gallery/tag/{tag}, rest/gallery/image/{name}
base_url = "http://localhost:8080/gallery/"

# Per-request timeout in seconds. 0 waits indefinitely.
timeout_secs = 30

# Append a random query value to every request so caches never answer
# with a stale listing.
cache_bust = true
cache_bust_param = "dummy"

# ---------------------------------------------------------------------------
# Rendering
# ---------------------------------------------------------------------------
[render]
# What a region shows when its fetch fails:
#   "show-error"    - replace it with a visible error message
#   "keep-previous" - leave whatever it showed before
on_failure = "show-error"

# Absolute base for thumbnail/image links in exported pages.
# Defaults to server.base_url.
# asset_base = "https://cdn.example/gallery/"

# ---------------------------------------------------------------------------
# Theme
# ---------------------------------------------------------------------------
[theme]
thumbnail_size = "150px"
thumbnail_gap = "0.5rem"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#111111"
text_muted = "#666666"
accent = "#2b6cb0"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#111111"
text = "#eeeeee"
text_muted = "#999999"
accent = "#90cdf4"

# ---------------------------------------------------------------------------
# Export
# ---------------------------------------------------------------------------
[export]
# Maximum parallel fetches. Omit to use every CPU core.
# max_workers = 4
"##
}

/// CSS custom properties for colors and layout.
pub fn generate_css_variables(colors: &ColorConfig, theme: &ThemeConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-text: {light_text};
    --color-text-muted: {light_muted};
    --color-accent: {light_accent};
    --thumbnail-size: {thumbnail_size};
    --thumbnail-gap: {thumbnail_gap};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --color-bg: {dark_bg};
        --color-text: {dark_text};
        --color-text-muted: {dark_muted};
        --color-accent: {dark_accent};
    }}
}}"#,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_muted = colors.light.text_muted,
        light_accent = colors.light.accent,
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_muted = colors.dark.text_muted,
        dark_accent = colors.dark.accent,
        thumbnail_size = theme.thumbnail_size,
        thumbnail_gap = theme.thumbnail_gap,
    )
}
