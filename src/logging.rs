// SPDX-License-Identifier: MIT
//
// Developer logging for the quill binary.
//
// The library crates only talk to the `log` facade. This is the backend:
// lines go to stderr and, when QUILL_LOG_FILE is set, are appended to that
// file as well. QUILL_LOG picks the level (off, error, warn, info, debug,
// trace) and defaults to warn so normal runs stay quiet.

use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

use log::{LevelFilter, Log, Metadata, Record};

const LEVEL_VAR: &str = "QUILL_LOG";
const FILE_VAR: &str = "QUILL_LOG_FILE";

#[derive(Debug, Clone)]
pub struct Logger {
    level: LevelFilter,
    output_stderr: bool,
    output_file: Option<PathBuf>,
}

impl Logger {
    pub const fn new(level: LevelFilter) -> Self {
        Self {
            level,
            output_stderr: true,
            output_file: None,
        }
    }

    /// Level and file from the environment.
    pub fn from_env() -> Self {
        let level = env::var(LEVEL_VAR)
            .ok()
            .and_then(|v| LevelFilter::from_str(v.trim()).ok())
            .unwrap_or(LevelFilter::Warn);
        let mut logger = Self::new(level);
        if let Some(path) = env::var_os(FILE_VAR) {
            logger = logger.with_file_output(path);
        }
        logger
    }

    pub fn with_file_output<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_file = Some(path.into());
        self
    }

    #[cfg(test)]
    pub const fn without_stderr(mut self) -> Self {
        self.output_stderr = false;
        self
    }

    /// Install as the global logger. A second call is a no-op.
    pub fn install(self) {
        let level = self.level;
        if log::set_boxed_logger(Box::new(self)).is_ok() {
            log::set_max_level(level);
        }
    }

    fn format(record: &Record<'_>) -> String {
        format!(
            "{:<5} [{}] {}",
            record.level(),
            record.target(),
            record.args()
        )
    }

    fn write_line(&self, line: &str) {
        if self.output_stderr {
            eprintln!("{line}");
        }
        if let Some(path) = &self.output_file {
            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
                let _ = writeln!(file, "{line}");
            }
        }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            self.write_line(&Self::format(record));
        }
    }

    fn flush(&self) {}
}

/// Install the environment-configured logger.
pub fn init() {
    Logger::from_env().install();
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn respects_level() {
        let logger = Logger::new(LevelFilter::Info).without_stderr();
        let info = Metadata::builder().level(Level::Info).build();
        let debug = Metadata::builder().level(Level::Debug).build();
        assert!(logger.enabled(&info));
        assert!(!logger.enabled(&debug));
    }

    #[test]
    fn writes_to_file() {
        let path = env::temp_dir().join(format!("quill-log-{}.txt", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let logger = Logger::new(LevelFilter::Debug)
            .without_stderr()
            .with_file_output(&path);
        logger.log(
            &Record::builder()
                .level(Level::Debug)
                .target("quill_text::storage")
                .args(format_args!("edit 0..1"))
                .build(),
        );

        let written = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(written, "DEBUG [quill_text::storage] edit 0..1\n");
    }
}
