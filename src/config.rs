//! Configuration handling for the vendor funnel

use crate::state::FormOptions;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the config file location
pub const CONFIG_PATH_ENV: &str = "VENDOR_FUNNEL_CONFIG";

const DEFAULT_SUBMISSION_DELAY_MS: u64 = 1000;

/// Service tags offered when the config does not provide a catalog
const DEFAULT_SERVICES: [&str; 12] = [
    "Training",
    "Curriculum Development",
    "Books, Curriculum",
    "Instructional Design",
    "Voice Talent",
    "Translation",
    "Mentoring",
    "Facilities",
    "Consulting",
    "e-Learning Development",
    "Lab Machine Creation",
    "Other",
];

pub fn default_services() -> Vec<String> {
    DEFAULT_SERVICES.iter().map(|s| s.to_string()).collect()
}

/// Which country/state table feeds the selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionSource {
    /// Three countries with a handful of states each
    Static,
    /// Bundled reference table
    #[default]
    Reference,
}

/// User configuration for the funnel
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FunnelConfig {
    /// Require the CAPTCHA challenge on submit
    pub captcha_enabled: Option<bool>,
    /// Simulated delivery latency in milliseconds
    pub submission_delay_ms: Option<u64>,
    /// Country/state data source
    pub region_source: Option<RegionSource>,
    /// Service catalog offered as checkboxes
    pub services: Option<Vec<String>>,
}

impl FunnelConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }
        ProjectDirs::from("net", "vendor-funnel", "vendor-funnel")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file, falling back to defaults when absent
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: FunnelConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Loaded funnel config");
        Ok(config)
    }

    pub fn captcha_enabled(&self) -> bool {
        self.captcha_enabled.unwrap_or(true)
    }

    pub fn submission_delay(&self) -> Duration {
        Duration::from_millis(
            self.submission_delay_ms
                .unwrap_or(DEFAULT_SUBMISSION_DELAY_MS),
        )
    }

    pub fn region_source(&self) -> RegionSource {
        self.region_source.unwrap_or_default()
    }

    pub fn services(&self) -> Vec<String> {
        self.services.clone().unwrap_or_else(default_services)
    }

    /// Engine options derived from this config
    pub fn form_options(&self) -> FormOptions {
        FormOptions {
            captcha_enabled: self.captcha_enabled(),
            services: self.services(),
        }
    }
}
