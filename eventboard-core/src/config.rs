//! User configuration.

use std::path::{Path, PathBuf};

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::{EventBoardError, EventBoardResult};
use crate::ics::ExportOptions;
use crate::month::parse_weekday;
use crate::zone::ZonePolicy;

static DEFAULT_WEEK_START: &str = "mon";
static DEFAULT_TIMEZONE: &str = "local";

fn default_week_start() -> String {
    DEFAULT_WEEK_START.to_string()
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

/// Configuration at ~/.config/eventboard/config.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// Default event source: a path (`~` is expanded) or an http(s) URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default = "default_week_start")]
    pub week_start: String,

    /// "local", "utc" or an IANA zone name.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ExportConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prodid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_name: Option<String>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            source: None,
            week_start: default_week_start(),
            timezone: default_timezone(),
            export: ExportConfig::default(),
        }
    }
}

impl BoardConfig {
    pub fn config_path() -> EventBoardResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| EventBoardError::Config("Could not determine config directory".into()))?
            .join("eventboard");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config at the default path, or defaults if it does not exist.
    pub fn load() -> EventBoardResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> EventBoardResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| EventBoardError::Config(format!("{}: {e}", path.display())))
    }

    pub fn first_day_of_week(&self) -> EventBoardResult<Weekday> {
        parse_weekday(&self.week_start)
    }

    pub fn zone(&self) -> EventBoardResult<ZonePolicy> {
        self.timezone.parse()
    }

    /// The configured source with `~` expanded for local paths.
    pub fn source(&self) -> Option<String> {
        self.source.as_deref().map(expand_source)
    }

    pub fn export_options(&self) -> ExportOptions {
        let defaults = ExportOptions::default();
        ExportOptions {
            prodid: self.export.prodid.clone().unwrap_or(defaults.prodid),
            uid_domain: self.export.uid_domain.clone().unwrap_or(defaults.uid_domain),
            calendar_name: self.export.calendar_name.clone(),
        }
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> EventBoardResult<()> {
        let contents = format!(
            "\
# eventboard configuration

# Where events are loaded from (JSON file path or http(s) URL):
# source = \"~/events.json\"

# First column of the month calendar:
# week_start = \"{}\"

# Zone used to place events on calendar days (\"local\", \"utc\" or e.g. \"Europe/Copenhagen\"):
# timezone = \"{}\"

# [export]
# uid_domain = \"eventboard\"
# calendar_name = \"Events\"
",
            DEFAULT_WEEK_START, DEFAULT_TIMEZONE
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                EventBoardError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| EventBoardError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

/// Expand `~` in local paths; URLs pass through untouched.
pub fn expand_source(source: &str) -> String {
    if is_url(source) {
        source.to_string()
    } else {
        shellexpand::tilde(source).into_owned()
    }
}

pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
