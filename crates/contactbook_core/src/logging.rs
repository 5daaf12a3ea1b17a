//! Process logger setup.
//!
//! The logger is started once per process. Repeating the call with the same
//! options is a no-op; asking for a different level or destination afterwards
//! is an error, since `log` only allows one global backend.
//!
//! Log lines are `key=value` metadata. Contact field values are never logged.

use flexi_logger::{
    default_format, detailed_format, Cleanup, Criterion, Duplicate, FileSpec, Logger,
    LoggerHandle, Naming, WriteMode,
};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "contactbook";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_ROTATED_FILES: usize = 5;
const PANIC_MESSAGE_LIMIT: usize = 200;
const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

/// Where and how verbosely to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingOptions {
    /// One of `trace|debug|info|warn|error`, case-insensitive.
    pub level: String,
    /// Absolute directory for rotating log files. `None` logs to stderr.
    pub log_dir: Option<PathBuf>,
    /// Mirror file output on stderr.
    pub echo_stderr: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            log_dir: None,
            echo_stderr: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LogTarget {
    Stderr,
    Files { dir: PathBuf, echo_stderr: bool },
}

impl LogTarget {
    fn dir(&self) -> Option<&Path> {
        match self {
            Self::Stderr => None,
            Self::Files { dir, .. } => Some(dir),
        }
    }

    fn describe(&self) -> String {
        self.dir()
            .map_or_else(|| "stderr".to_string(), |dir| dir.display().to_string())
    }
}

struct ActiveLogger {
    level: &'static str,
    target: LogTarget,
    _handle: LoggerHandle,
}

/// Starts the process logger, or checks that the running one matches.
///
/// # Errors
/// Returns a readable message for an unknown level, a relative or
/// uncreatable `log_dir`, a backend failure, or a conflicting second call.
pub fn init_logging(options: &LoggingOptions) -> Result<(), String> {
    let level = parse_level(&options.level)?;
    let target = resolve_target(options)?;

    let active = ACTIVE.get_or_try_init(|| {
        let handle = start_backend(level, &target)?;
        install_panic_hook();
        info!(
            "event=logging_ready module=core status=ok level={level} target={} version={}",
            target.describe(),
            env!("CARGO_PKG_VERSION")
        );
        Ok::<_, String>(ActiveLogger {
            level,
            target: target.clone(),
            _handle: handle,
        })
    })?;

    if active.target.dir() != target.dir() {
        return Err(format!(
            "logger already writes to `{}`, cannot switch to `{}`",
            active.target.describe(),
            target.describe()
        ));
    }
    if active.level != level {
        return Err(format!(
            "logger already runs at `{}`, cannot switch to `{level}`",
            active.level
        ));
    }
    Ok(())
}

/// Level and log directory of the running logger, if any.
pub fn logging_status() -> Option<(&'static str, Option<PathBuf>)> {
    ACTIVE
        .get()
        .map(|active| (active.level, active.target.dir().map(Path::to_path_buf)))
}

/// `debug` in debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn parse_level(raw: &str) -> Result<&'static str, String> {
    let wanted = raw.trim().to_ascii_lowercase();
    let wanted = if wanted == "warning" { "warn".to_string() } else { wanted };
    LEVELS
        .iter()
        .copied()
        .find(|level| *level == wanted)
        .ok_or_else(|| format!("unknown log level `{raw}`, use one of {}", LEVELS.join("|")))
}

fn resolve_target(options: &LoggingOptions) -> Result<LogTarget, String> {
    let Some(dir) = options.log_dir.as_deref() else {
        return Ok(LogTarget::Stderr);
    };
    if dir.as_os_str().is_empty() || !dir.is_absolute() {
        return Err(format!(
            "log_dir must be an absolute path, got `{}`",
            dir.display()
        ));
    }
    Ok(LogTarget::Files {
        dir: dir.to_path_buf(),
        echo_stderr: options.echo_stderr,
    })
}

fn start_backend(level: &str, target: &LogTarget) -> Result<LoggerHandle, String> {
    let logger =
        Logger::try_with_str(level).map_err(|err| format!("bad log spec `{level}`: {err}"))?;

    let logger = match target {
        LogTarget::Stderr => logger.log_to_stderr().format_for_stderr(detailed_format),
        LogTarget::Files { dir, echo_stderr } => {
            std::fs::create_dir_all(dir)
                .map_err(|err| format!("cannot create `{}`: {err}", dir.display()))?;
            let files = FileSpec::default()
                .directory(dir)
                .basename(LOG_FILE_BASENAME);
            let logger = logger
                .log_to_file(files)
                .rotate(
                    Criterion::Size(ROTATE_AT_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(KEEP_ROTATED_FILES),
                )
                .write_mode(WriteMode::BufferAndFlush)
                .append()
                .format_for_files(detailed_format);
            if *echo_stderr {
                logger
                    .duplicate_to_stderr(Duplicate::All)
                    .format_for_stderr(default_format)
            } else {
                logger
            }
        }
    };

    logger
        .start()
        .map_err(|err| format!("logger backend failed to start: {err}"))
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map_or_else(|| "unknown".to_string(), |loc| format!("{}:{}", loc.file(), loc.line()));
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "<non-string payload>".to_string());
        error!(
            "event=panic module=core status=error location={location} message={}",
            one_line(&payload, PANIC_MESSAGE_LIMIT)
        );
        previous(info);
    }));
}

/// Flattens newlines and caps the length at `limit` chars.
fn one_line(value: &str, limit: usize) -> String {
    let flat: String = value
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if flat.chars().count() <= limit {
        return flat;
    }
    let mut cut: String = flat.chars().take(limit).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::{init_logging, logging_status, one_line, parse_level, resolve_target, LoggingOptions};
    use std::path::PathBuf;

    #[test]
    fn levels_are_case_insensitive() {
        assert_eq!(parse_level("INFO").unwrap(), "info");
        assert_eq!(parse_level(" Warning ").unwrap(), "warn");
        assert!(parse_level("loud").unwrap_err().contains("unknown log level"));
    }

    #[test]
    fn relative_log_dir_is_rejected() {
        let options = LoggingOptions {
            log_dir: Some(PathBuf::from("logs/dev")),
            ..LoggingOptions::default()
        };
        assert!(resolve_target(&options).unwrap_err().contains("absolute"));
    }

    #[test]
    fn one_line_flattens_and_truncates() {
        assert_eq!(one_line("a\nb", 10), "a b");
        let cut = one_line("line1\nline2\rline3", 8);
        assert_eq!(cut, "line1 li...");
    }

    #[test]
    fn second_init_must_match_the_first() {
        let dir = tempfile::tempdir().unwrap();
        let options = LoggingOptions {
            level: "info".to_string(),
            log_dir: Some(dir.path().to_path_buf()),
            echo_stderr: false,
        };

        init_logging(&options).unwrap();
        init_logging(&options).unwrap();

        let level_error = init_logging(&LoggingOptions {
            level: "debug".to_string(),
            ..options.clone()
        })
        .unwrap_err();
        assert!(level_error.contains("cannot switch"));

        let target_error = init_logging(&LoggingOptions {
            log_dir: None,
            ..options.clone()
        })
        .unwrap_err();
        assert!(target_error.contains("cannot switch"));

        let (level, active_dir) = logging_status().unwrap();
        assert_eq!(level, "info");
        assert_eq!(active_dir.as_deref(), Some(dir.path()));
    }
}
