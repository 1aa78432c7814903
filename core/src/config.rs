//! Handles the configuration of the dashboard.
//!
//! this module is responsible for parsing the Trackdash.toml file, and applying
//! the overrides given on the command line.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use std::{path::PathBuf, str::FromStr};

use crate::{
    chart::stream::StackOffset,
    select::{MIN_TRACK_COUNT, TOP_ARTISTS, TOP_GENRES},
};

pub static DEFAULT_CONFIG: &str = include_str!("../Trackdash.toml");

#[derive(Clone, Debug, Deserialize, Default, PartialEq, Eq)]
pub struct Settings {
    /// General Dashboard Settings
    #[serde(default)]
    pub dashboard: DashboardSettings,
    /// Settings for the artist bar chart
    #[serde(default)]
    pub bar_chart: BarChartSettings,
    /// Settings for the year/genre heatmap
    #[serde(default)]
    pub heatmap: HeatmapSettings,
    /// Settings for the duration stream chart
    #[serde(default)]
    pub stream_chart: StreamChartSettings,
}

impl Settings {
    /// Load settings from the config file, environment variables, and CLI arguments.
    ///
    /// The environment variables are prefixed with `TRACKDASH_`, and nested keys are separated with `__`.
    ///
    /// # Arguments
    ///
    /// * `config` - The path to the config file.
    /// * `data_path` - Overrides `dashboard.data_path` if given.
    /// * `log_level` - Overrides `dashboard.log_level` if given.
    ///
    /// # Errors
    ///
    /// This function will return an error if the config file is not found or if the config file is
    /// invalid.
    #[inline]
    pub fn init(
        config: PathBuf,
        data_path: Option<PathBuf>,
        log_level: Option<log::LevelFilter>,
    ) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::from(config))
            .add_source(
                Environment::with_prefix("TRACKDASH")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let mut settings: Self = s.try_deserialize()?;

        if let Some(data_path) = data_path {
            settings.dashboard.data_path = data_path;
        }
        settings.dashboard.data_path = expand_tilde(&settings.dashboard.data_path);
        settings.dashboard.log_file = settings.dashboard.log_file.as_deref().map(expand_tilde);

        if let Some(log_level) = log_level {
            settings.dashboard.log_level = log_level;
        }

        Ok(settings)
    }

    /// Get the (default) path to the config file.
    /// If the config file does not exist at this path, it will be created with the default config.
    ///
    /// See [`crate::get_config_dir`] for more information about where this default path is located.
    ///
    /// # Errors
    ///
    /// This function will return an error if the system config directory (e.g., `~/.config` on linux) could not be found, or if the config file was missing and could not be created.
    #[inline]
    pub fn get_config_path() -> Result<PathBuf, std::io::Error> {
        match crate::get_config_dir() {
            Ok(config_dir) => {
                // if the config directory does not exist, create it
                if !config_dir.exists() {
                    std::fs::create_dir_all(&config_dir)?;
                }
                let config_file = config_dir.join("Trackdash.toml");

                if !config_file.exists() {
                    std::fs::write(&config_file, DEFAULT_CONFIG)?;
                }

                Ok(config_file)
            }
            Err(e) => {
                eprintln!("Error: {e}");
                Err(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Unable to find the config directory for trackdash.",
                ))
            }
        }
    }
}

fn expand_tilde(path: &std::path::Path) -> PathBuf {
    shellexpand::tilde(&path.to_string_lossy())
        .into_owned()
        .into()
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct DashboardSettings {
    /// The CSV file to visualize.
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    /// What level of logging to use.
    /// Default is "info".
    #[serde(default = "default_log_level")]
    #[serde(deserialize_with = "de_log_level")]
    pub log_level: log::LevelFilter,
    /// Where to write logs to, defaults to `trackdash.log` in the data directory.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn de_log_level<'de, D>(deserializer: D) -> Result<log::LevelFilter, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(log::LevelFilter::from_str(&s).unwrap_or_else(|_| default_log_level()))
}

fn default_data_path() -> PathBuf {
    shellexpand::tilde("~/.local/share/trackdash/spotify_data.csv")
        .into_owned()
        .into()
}

const fn default_log_level() -> log::LevelFilter {
    log::LevelFilter::Info
}

impl Default for DashboardSettings {
    #[inline]
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            log_level: default_log_level(),
            log_file: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct BarChartSettings {
    /// How many artists to rank.
    /// Default is 10.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// The minimum number of tracks an artist needs to be ranked at all,
    /// keeps single-track outliers from dominating the chart.
    /// Default is 5.
    #[serde(default = "default_min_track_count")]
    pub min_track_count: usize,
}

const fn default_top_n() -> usize {
    TOP_ARTISTS
}

const fn default_min_track_count() -> usize {
    MIN_TRACK_COUNT
}

impl Default for BarChartSettings {
    #[inline]
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            min_track_count: default_min_track_count(),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct HeatmapSettings {
    /// How many genres to show.
    /// Default is 12.
    #[serde(default = "default_genre_count")]
    pub genre_count: usize,
    /// Duration of the reveal animation in milliseconds.
    /// Default is 400.
    #[serde(default = "default_reveal_transition_ms")]
    pub reveal_transition_ms: u64,
}

const fn default_genre_count() -> usize {
    TOP_GENRES
}

const fn default_reveal_transition_ms() -> u64 {
    400
}

impl Default for HeatmapSettings {
    #[inline]
    fn default() -> Self {
        Self {
            genre_count: default_genre_count(),
            reveal_transition_ms: default_reveal_transition_ms(),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Default, PartialEq, Eq)]
pub struct StreamChartSettings {
    /// How the bands are stacked.
    /// Default is "zero".
    #[serde(default)]
    pub offset: StackOffset,
}
