use std::{path::PathBuf, time::Duration};

use errors::DirectoryError;

pub mod aggregate;
pub mod chart;
pub mod config;
pub mod dataset;
pub mod errors;
pub mod logger;
pub mod pipeline;
pub mod select;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod track;

/// Formats a duration as `seconds.millis`, e.g. `12.034`.
#[must_use]
pub fn format_duration(duration: &Duration) -> String {
    format!("{}.{:03}", duration.as_secs(), duration.subsec_millis())
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "trackdash")
}

/// Get the directory trackdash stores its config file in.
///
/// - Linux: `$XDG_CONFIG_HOME/trackdash` or `$HOME/.config/trackdash`
/// - macOS: `$HOME/Library/Application Support/trackdash`
/// - Windows: `{FOLDERID_RoamingAppData}\trackdash\config`
///
/// # Errors
///
/// Fails if no valid home directory can be found for the current user.
pub fn get_config_dir() -> Result<PathBuf, DirectoryError> {
    project_dirs()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(DirectoryError::Config)
}

/// Get the directory trackdash writes its data (e.g. log files) to.
///
/// # Errors
///
/// Fails if no valid home directory can be found for the current user.
pub fn get_data_dir() -> Result<PathBuf, DirectoryError> {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(DirectoryError::Data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_str_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Duration::from_millis(0), "0.000")]
    #[case(Duration::from_millis(1_500), "1.500")]
    #[case(Duration::from_millis(61_042), "61.042")]
    fn test_format_duration(#[case] duration: Duration, #[case] expected: &str) {
        assert_str_eq!(format_duration(&duration), expected);
    }
}
