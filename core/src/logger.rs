//----------------------------------------------------------------------------------------- std lib
use std::io::Write;
use std::path::Path;
use std::time::Instant;
//--------------------------------------------------------------------------------- other libraries
use env_logger::fmt::style::{AnsiColor, Style};
use log::info;
use once_cell::sync::Lazy;

use crate::format_duration;

// This will get initialized below.
/// Returns the init [`Instant`]
pub static INIT_INSTANT: Lazy<Instant> = Lazy::new(Instant::now);

/// Returns the seconds since [`INIT_INSTANT`].
#[cfg(not(tarpaulin_include))]
pub fn uptime() -> u64 {
    INIT_INSTANT.elapsed().as_secs()
}

/// The filter used when `RUST_LOG` is not set:
/// disables all library crate logs except for trackdash and its sub-crates.
#[must_use]
pub fn default_filter(filter: log::LevelFilter) -> String {
    format!("off,trackdash={filter}")
}

const fn level_style(level: log::Level) -> (Style, &'static str) {
    let (color, letter) = match level {
        log::Level::Debug => (AnsiColor::Blue, "D"),
        log::Level::Trace => (AnsiColor::Magenta, "T"),
        log::Level::Info => (AnsiColor::White, "I"),
        log::Level::Warn => (AnsiColor::Yellow, "W"),
        log::Level::Error => (AnsiColor::Red, "E"),
    };
    (
        Style::new().fg_color(Some(anstyle_color(color))).bold(),
        letter,
    )
}

const fn anstyle_color(color: AnsiColor) -> env_logger::fmt::style::Color {
    env_logger::fmt::style::Color::Ansi(color)
}

//---------------------------------------------------------------------------------------------------- Logger init function
#[allow(clippy::module_name_repetitions)]
/// Initializes the logger.
///
/// This enables logging on all the internals of trackdash.
///
/// Functionality is provided by [`log`].
///
/// The levels are:
/// - ERROR
/// - WARN
/// - INFO
/// - DEBUG
/// - TRACE
///
/// If `log_file` is given, output is appended to that file instead of stderr,
/// the terminal dashboard owns the terminal while it runs.
///
/// # Errors
///
/// Fails if the log file cannot be opened.
///
/// # Panics
/// This must only be called _once_.
#[cfg(not(tarpaulin_include))]
pub fn init_logger(filter: log::LevelFilter, log_file: Option<&Path>) -> std::io::Result<()> {
    // Initialize timer.
    let now = Lazy::force(&INIT_INSTANT);

    // `RUST_LOG` wins if it is set.
    let env = std::env::var("RUST_LOG").unwrap_or_default();
    let filters = if env.is_empty() {
        default_filter(filter)
    } else {
        env.clone()
    };

    let mut builder = env_logger::Builder::new();
    builder
        .format(move |buf, record| {
            let (style, level) = level_style(record.level());
            let dimmed = Style::new().dimmed();
            writeln!(
                buf,
                // Longest PATH in the repo: `core/src/aggregate/duration.rs` - `30` characters
                // Longest file in the repo: `tui/src/ui/app.rs`              - `3` digits
                //
                //      Longest PATH ---|        |--- Longest file
                //                      |        |
                //                      v        v
                "| {style}{level}{style:#} | {dimmed}{}{dimmed:#} | {dimmed}{: >30} @ {: <4}{dimmed:#} | {}",
                format_duration(&now.elapsed()),
                record.file_static().unwrap_or("???"),
                record.line().unwrap_or(0),
                record.args(),
            )
        })
        .parse_filters(&filters);

    if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        builder
            .target(env_logger::Target::Pipe(Box::new(file)))
            .write_style(env_logger::WriteStyle::Never);
    } else {
        builder.write_style(env_logger::WriteStyle::Always);
    }

    builder.init();

    if env.is_empty() {
        info!("Log Level (Flag) ... {filter}");
    } else {
        info!("Log Level (RUST_LOG) ... {env}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_str_eq;

    #[test]
    fn test_default_filter() {
        assert_str_eq!(
            default_filter(log::LevelFilter::Debug),
            "off,trackdash=debug"
        );
    }

    #[test]
    fn test_level_letters() {
        assert_eq!(level_style(log::Level::Error).1, "E");
        assert_eq!(level_style(log::Level::Warn).1, "W");
        assert_eq!(level_style(log::Level::Info).1, "I");
        assert_eq!(level_style(log::Level::Debug).1, "D");
        assert_eq!(level_style(log::Level::Trace).1, "T");
    }
}
