//! Configuration parsing for `.scry.toml`.
//!
//! Every section is optional; a missing file, or a file that sets only a
//! few keys, falls back to the defaults below.
//!
//! # Example
//!
//! ```toml
//! [search]
//! limit = 20
//!
//! [ask]
//! max_evidence = 2
//! snippet_chars = 240
//! min_score = 1.0
//! candidate_limit = 50
//!
//! [[ask.boost]]
//! terms = ["ignore", "scan"]
//! paths = ["pkg/ignore/", "pkg/scan/"]
//! bonus = 2.0
//!
//! [index]
//! extra_ignore = ["vendor/", "*.pb.go"]
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use scry_core::ask::{default_boost_rules, default_whitelist_rules, AskOptions, PathRule};

/// File name looked up in the repository root when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = ".scry.toml";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub ask: AskConfig,
    pub index: IndexConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum results; `<= 0` means unlimited.
    pub limit: i64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { limit: 20 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AskConfig {
    pub max_evidence: i64,
    pub snippet_chars: i64,
    pub min_score: f64,
    /// How many search results feed the ranking pipeline.
    pub candidate_limit: i64,
    /// `None` uses the built-in rules; `Some(vec![])` disables the stage.
    pub boost: Option<Vec<PathRule>>,
    pub whitelist: Option<Vec<PathRule>>,
}

impl Default for AskConfig {
    fn default() -> Self {
        Self {
            max_evidence: 2,
            snippet_chars: 240,
            min_score: 1.0,
            candidate_limit: 50,
            boost: None,
            whitelist: None,
        }
    }
}

impl AskConfig {
    /// Ranking options with built-in rules filled in where none are configured.
    pub fn options(&self) -> AskOptions {
        AskOptions {
            max_evidence: self.max_evidence,
            snippet_chars: self.snippet_chars,
            min_score: self.min_score,
            boost_rules: self.boost.clone().unwrap_or_else(default_boost_rules),
            whitelist_rules: self.whitelist.clone().unwrap_or_else(default_whitelist_rules),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct IndexConfig {
    /// Ignore patterns applied after `.gitignore` and `.scryignore`.
    pub extra_ignore: Vec<String>,
}

/// Parse and validate the config file at `path`.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    validate(&config)?;
    Ok(config)
}

/// Pick the config for a run.
///
/// An explicit path must exist. Otherwise `<root>/.scry.toml` is read if
/// present and defaults are used if not.
pub fn resolve_config(explicit: Option<&Path>, root: &Path) -> Result<Config> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    let implicit: PathBuf = root.join(DEFAULT_CONFIG_FILE);
    if implicit.is_file() {
        tracing::debug!(path = %implicit.display(), "loading config");
        return load_config(&implicit);
    }
    Ok(Config::default())
}

fn validate(config: &Config) -> Result<()> {
    if config.ask.max_evidence < 1 {
        bail!("ask.max_evidence must be >= 1");
    }
    if config.ask.snippet_chars < 1 {
        bail!("ask.snippet_chars must be >= 1");
    }
    if !config.ask.min_score.is_finite() {
        bail!("ask.min_score must be a finite number");
    }

    let sections = [
        ("ask.boost", &config.ask.boost),
        ("ask.whitelist", &config.ask.whitelist),
    ];
    for (name, rules) in sections {
        for (i, rule) in rules.iter().flatten().enumerate() {
            if !rule.bonus.is_finite() {
                bail!("{}[{}].bonus must be a finite number", name, i);
            }
            if rule.terms.is_empty() {
                bail!("{}[{}].terms must not be empty", name, i);
            }
            if rule.paths.is_empty() {
                bail!("{}[{}].paths must not be empty", name, i);
            }
        }
    }
    Ok(())
}
