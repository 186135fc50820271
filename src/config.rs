//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! serialized to a TOML table, the user's file is merged over it key by key,
//! and the result is deserialized with unknown keys rejected.
//!
//! ## Config File Location
//!
//! ```text
//! content/
//! ├── config.toml              # Optional, overrides stock defaults
//! ├── 010-beginner/
//! └── 020-intermediate/
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! site_title = "MongoDB Guide"
//!
//! [theme]
//! sidebar_width = "16rem"   # Level/topic navigation column
//! toc_width = "14rem"       # "On this page" column
//! content_width = "46rem"   # Max article width
//! header_height = "3.5rem"  # Sticky header; keep below toc.scroll_threshold
//!
//! [toc]
//! scroll_threshold = 200.0  # Reading line, px from viewport top
//! retry_interval_ms = 100   # Wait between anchor lookups on navigation
//! max_retries = 5           # Lookups after the first before giving up
//!
//! [search]
//! min_query_len = 2
//! max_results = 20
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#1c2127"
//! text_muted = "#5c6c75"    # Sidebar, breadcrumbs, TOC
//! border = "#e8edeb"
//! link = "#016bf8"
//! link_hover = "#0498ec"
//! accent = "#00684a"        # Active TOC entry
//! code_background = "#f9fbfa"
//!
//! [colors.dark]
//! background = "#001e2b"
//! text = "#e8edeb"
//! text_muted = "#889397"
//! border = "#1c2d38"
//! link = "#0498ec"
//! link_hover = "#c3e7fe"
//! accent = "#00ed64"
//! code_background = "#112733"
//!
//! [processing]
//! max_processes = 4         # Max parallel render workers (omit for auto)
//! ```
//!
//! Config files are sparse: override only the values you need. Unknown keys
//! are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Shown in the header, the home page and every `<title>`.
    pub site_title: String,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
    /// Layout sizes.
    pub theme: ThemeConfig,
    /// Table-of-contents tracking.
    pub toc: TocConfig,
    /// Search behavior.
    pub search: SearchConfig,
    /// Parallel rendering settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_title: "MongoDB Guide".to_string(),
            colors: ColorConfig::default(),
            theme: ThemeConfig::default(),
            toc: TocConfig::default(),
            search: SearchConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.toc.scroll_threshold.is_finite() || self.toc.scroll_threshold < 0.0 {
            return Err(ConfigError::Validation(
                "toc.scroll_threshold must be a non-negative number".into(),
            ));
        }
        if self.toc.retry_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "toc.retry_interval_ms must be greater than 0".into(),
            ));
        }
        if self.toc.max_retries > 50 {
            return Err(ConfigError::Validation(
                "toc.max_retries must be at most 50".into(),
            ));
        }
        if self.search.min_query_len == 0 {
            return Err(ConfigError::Validation(
                "search.min_query_len must be at least 1".into(),
            ));
        }
        if self.search.max_results == 0 {
            return Err(ConfigError::Validation(
                "search.max_results must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Table-of-contents tracking, shared by the Rust tracker and `toc.js`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TocConfig {
    /// A heading counts as reached once its top is within this many pixels
    /// of the viewport top.
    pub scroll_threshold: f64,
    /// Milliseconds between anchor lookups while a navigation waits.
    pub retry_interval_ms: u64,
    /// Lookups after the first one before a navigation is dropped.
    pub max_retries: u32,
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            scroll_threshold: crate::tracker::DEFAULT_SCROLL_THRESHOLD,
            retry_interval_ms: crate::tracker::DEFAULT_RETRY_INTERVAL.as_millis() as u64,
            max_retries: crate::tracker::DEFAULT_MAX_RETRIES,
        }
    }
}

/// Search settings for the CLI and the generated search box.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Queries shorter than this (after trimming) return nothing.
    pub min_query_len: usize,
    /// Cap on hits returned.
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_len: 2,
            max_results: 20,
        }
    }
}

/// Parallel rendering settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel render workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Layout settings, emitted as CSS custom properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    pub sidebar_width: String,
    pub toc_width: String,
    pub content_width: String,
    pub header_height: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            sidebar_width: "16rem".to_string(),
            toc_width: "14rem".to_string(),
            content_width: "46rem".to_string(),
            header_height: "3.5rem".to_string(),
        }
    }
}

/// Color configuration for light and dark modes.
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

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Sidebar, breadcrumbs and inactive TOC entries.
    pub text_muted: String,
    pub border: String,
    pub link: String,
    pub link_hover: String,
    /// Highlight for the active TOC entry.
    pub accent: String,
    pub code_background: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#1c2127".to_string(),
            text_muted: "#5c6c75".to_string(),
            border: "#e8edeb".to_string(),
            link: "#016bf8".to_string(),
            link_hover: "#0498ec".to_string(),
            accent: "#00684a".to_string(),
            code_background: "#f9fbfa".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#001e2b".to_string(),
            text: "#e8edeb".to_string(),
            text_muted: "#889397".to_string(),
            border: "#1c2d38".to_string(),
            link: "#0498ec".to_string(),
            link_hover: "#c3e7fe".to_string(),
            accent: "#00ed64".to_string(),
            code_background: "#112733".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
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

/// Load config from `config.toml` in the given directory.
///
/// Missing file means stock defaults. Merges user values on top of the
/// defaults, rejects unknown keys, and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let config_path = root.join("config.toml");
    let base = stock_defaults_value();
    let merged = if config_path.exists() {
        let content = fs::read_to_string(&config_path)?;
        let overlay: toml::Value = toml::from_str(&content)?;
        merge_toml(base, overlay)
    } else {
        log::debug!("no config.toml in {}, using defaults", root.display());
        base
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# MongoDB Guide Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# Shown in the header, on the home page and in every page title.
site_title = "MongoDB Guide"

# ---------------------------------------------------------------------------
# Layout
# ---------------------------------------------------------------------------
[theme]
# Width of the level/topic navigation column.
sidebar_width = "16rem"
# Width of the "On this page" column.
toc_width = "14rem"
# Maximum width of the article text.
content_width = "46rem"
# Height of the sticky header. Keep it below toc.scroll_threshold.
header_height = "3.5rem"

# ---------------------------------------------------------------------------
# Table of contents
# ---------------------------------------------------------------------------
[toc]
# A heading becomes active once its top edge is within this many pixels of
# the top of the window.
scroll_threshold = 200.0
# When a TOC link targets a heading that is not on screen yet, look for it
# again every retry_interval_ms, at most max_retries more times.
retry_interval_ms = 100
max_retries = 5

# ---------------------------------------------------------------------------
# Search
# ---------------------------------------------------------------------------
[search]
# Shorter queries return no results.
min_query_len = 2
# Maximum number of matching lines shown.
max_results = 20

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#1c2127"
text_muted = "#5c6c75"    # Sidebar, breadcrumbs, TOC
border = "#e8edeb"
link = "#016bf8"
link_hover = "#0498ec"
accent = "#00684a"        # Active TOC entry
code_background = "#f9fbfa"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#001e2b"
text = "#e8edeb"
text_muted = "#889397"
border = "#1c2d38"
link = "#0498ec"
link_hover = "#c3e7fe"
accent = "#00ed64"
code_background = "#112733"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel page-render workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

fn scheme_properties(scheme: &ColorScheme, indent: &str) -> String {
    [
        ("--color-bg", &scheme.background),
        ("--color-text", &scheme.text),
        ("--color-text-muted", &scheme.text_muted),
        ("--color-border", &scheme.border),
        ("--color-link", &scheme.link),
        ("--color-link-hover", &scheme.link_hover),
        ("--color-accent", &scheme.accent),
        ("--color-code-bg", &scheme.code_background),
    ]
    .iter()
    .map(|(name, value)| format!("{indent}{name}: {value};"))
    .collect::<Vec<_>>()
    .join("\n")
}

/// Generate CSS custom properties from color config.
///
/// The OS preference picks the scheme unless the reader forced one with the
/// theme toggle, which sets `data-theme` on `<html>`.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    let light = scheme_properties(&colors.light, "    ");
    let dark = scheme_properties(&colors.dark, "    ");
    let dark_nested = scheme_properties(&colors.dark, "        ");
    format!(
        r#":root {{
{light}
}}

@media (prefers-color-scheme: dark) {{
    :root:not([data-theme="light"]) {{
{dark_nested}
    }}
}}

:root[data-theme="dark"] {{
{dark}
}}"#
    )
}

/// Generate CSS custom properties from theme config.
pub fn generate_theme_css(theme: &ThemeConfig) -> String {
    format!(
        r#":root {{
    --sidebar-width: {sidebar};
    --toc-width: {toc};
    --content-width: {content};
    --header-height: {header};
}}"#,
        sidebar = theme.sidebar_width,
        toc = theme.toc_width,
        content = theme.content_width,
        header = theme.header_height,
    )
}
