//! Run configuration (TOML)

use crate::algorithms::Damping;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything a `compute` run needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Probability of following a link each step
    #[serde(default = "default_damping")]
    pub damping: f64,

    /// Upper bound on power iterations
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Stop early once one step changes the scores by less than this (L1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,

    /// How many top pages to log after each iteration
    #[serde(default = "default_report_top")]
    pub report_top: usize,

    /// File locations
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Input dumps, caches and output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// `page` table dump, gzipped if the name ends in `.gz`
    #[serde(default = "default_page_sql")]
    pub page_sql: PathBuf,

    /// `pagelinks` table dump, gzipped if the name ends in `.gz`
    #[serde(default = "default_page_links_sql")]
    pub page_links_sql: PathBuf,

    /// Parquet cache of the title map
    #[serde(default = "default_titles_cache")]
    pub titles_cache: PathBuf,

    /// Raw cache of the packed links
    #[serde(default = "default_links_cache")]
    pub links_cache: PathBuf,

    /// Raw score vector written at the end of the run
    #[serde(default = "default_scores")]
    pub scores: PathBuf,
}

// ── defaults ──

const fn default_damping() -> f64 {
    Damping::STANDARD
}
const fn default_max_iterations() -> usize {
    1000
}
const fn default_report_top() -> usize {
    30
}
fn default_page_sql() -> PathBuf {
    PathBuf::from("page.sql.gz")
}
fn default_page_links_sql() -> PathBuf {
    PathBuf::from("pagelinks.sql.gz")
}
fn default_titles_cache() -> PathBuf {
    PathBuf::from("wikipedia-pagerank-page-id-title.parquet")
}
fn default_links_cache() -> PathBuf {
    PathBuf::from("wikipedia-pagerank-page-links.raw")
}
fn default_scores() -> PathBuf {
    PathBuf::from("wikipedia-pageranks.raw")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            damping: default_damping(),
            max_iterations: default_max_iterations(),
            tolerance: None,
            report_top: default_report_top(),
            paths: PathsConfig::default(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            page_sql: default_page_sql(),
            page_links_sql: default_page_links_sql(),
            titles_cache: default_titles_cache(),
            links_cache: default_links_cache(),
            scores: default_scores(),
        }
    }
}

impl Config {
    /// Default config file name, in the working directory
    pub const DEFAULT_FILE: &'static str = "wiki-pagerank.toml";

    /// Load config from `path`, falling back to defaults when it is missing
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            let cfg: Self =
                toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
            Ok(cfg)
        } else {
            log::debug!("{} not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Write the default config to `path`, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns error if the directory or file cannot be written
    pub fn write_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let text = toml::to_string_pretty(&Self::default()).context("serialising default config")?;
        std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Validated damping factor
    ///
    /// # Errors
    ///
    /// Returns error if `damping` is outside (0, 1]
    pub fn damping(&self) -> Result<Damping> {
        Damping::new(self.damping).context("invalid `damping` in config")
    }
}
