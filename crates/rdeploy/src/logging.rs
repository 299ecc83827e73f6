use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};

use crate::paths::AppPaths;

fn logger_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_allow_str("rdeploy")
        .build()
}

/// Global ceiling for a run. Individual loggers accept everything.
fn level_for(debug_enabled: bool) -> LevelFilter {
    if debug_enabled {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Stderr always; the log file only when one could be opened.
fn build_loggers(config: &Config, log_file: Option<File>) -> Vec<Box<dyn SharedLogger>> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Debug,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    if let Some(file) = log_file {
        loggers.push(WriteLogger::new(LevelFilter::Debug, config.clone(), file));
    }

    loggers
}

/// The newest whole lines of an oversized log, at most half of `max_len`.
fn recent_tail(contents: &[u8], max_len: u64) -> Option<&[u8]> {
    if u64::try_from(contents.len()).is_ok_and(|len| len <= max_len) {
        return None;
    }

    let keep = usize::try_from(max_len / 2).unwrap_or(usize::MAX);
    let start = contents.len().saturating_sub(keep);
    if start == 0 || contents[start - 1] == b'\n' {
        return Some(&contents[start..]);
    }

    let tail = contents[start..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(&[][..], |pos| &contents[start + pos + 1..]);
    Some(tail)
}

fn open_log_file(path: &Path, max_len: u64) -> io::Result<File> {
    if let Ok(contents) = std::fs::read(path)
        && let Some(tail) = recent_tail(&contents, max_len)
    {
        std::fs::write(path, tail)?;
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Log to stderr and, when the data directory is usable, to `rdeploy.log`.
pub fn init_logging(debug_enabled: bool, max_log_size: u64) {
    let log_path = AppPaths::new().ok().and_then(|paths| {
        paths.ensure_dirs().ok()?;
        Some(paths.log_file())
    });
    let log_file = log_path
        .as_deref()
        .and_then(|path| open_log_file(path, max_log_size).ok());
    let file_enabled = log_file.is_some();

    let _ = CombinedLogger::init(build_loggers(&logger_config(), log_file));

    set_logging_enabled(debug_enabled);

    if file_enabled && let Some(log_path) = log_path {
        log::debug!("Logging to {}", log_path.display());
    }
}

pub fn set_logging_enabled(enabled: bool) {
    log::set_max_level(level_for(enabled));
}
