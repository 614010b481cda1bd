use std::sync::OnceLock;

use chrono::Local;
use serde::{Deserialize, Serialize};

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// How much the process reports while playing.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    #[default]
    Off,
    /// Only the solver's per-step lines.
    Solver,
    /// Engine events: generate, match, build, scramble, offer changes.
    Events,
    /// Events plus the rendered grid after each step.
    Grid,
}

impl Verbosity {
    pub fn allows(self, level: Verbosity) -> bool {
        match level {
            Verbosity::Off => false,
            Verbosity::Solver => self == Verbosity::Solver,
            Verbosity::Events => matches!(self, Verbosity::Events | Verbosity::Grid),
            Verbosity::Grid => self == Verbosity::Grid,
        }
    }
}

pub struct Logger {
    prefix: Option<String>,
    verbosity: Verbosity,
}

impl Logger {
    fn new(prefix: Option<String>, verbosity: Verbosity) -> Self {
        Self { prefix, verbosity }
    }

    pub fn log(&self, file: &str, line: u32, message: &str) {
        let timestamp = Local::now().format("%H:%M:%S%.6f");
        let file_name = file.rsplit(['/', '\\']).next().unwrap_or(file);
        for text in message.lines() {
            if let Some(ref prefix) = self.prefix {
                println!("[{}][{}][{}:{}] {}", timestamp, prefix, file_name, line, text);
            } else {
                println!("[{}][{}:{}] {}", timestamp, file_name, line, text);
            }
        }
    }
}

pub fn init_logger(prefix: Option<String>, verbosity: Verbosity) {
    LOGGER.get_or_init(|| Logger::new(prefix, verbosity));
}

/// Whether a message at `level` would be printed. Always false before
/// [`init_logger`] runs, so library users and tests stay silent.
pub fn enabled(level: Verbosity) -> bool {
    LOGGER
        .get()
        .is_some_and(|logger| logger.verbosity.allows(level))
}

pub fn log(level: Verbosity, file: &str, line: u32, message: &str) {
    if let Some(logger) = LOGGER.get()
        && logger.verbosity.allows(level)
    {
        logger.log(file, line, message);
    }
}

#[macro_export]
macro_rules! log {
    ($level:expr, $($arg:tt)*) => {
        if $crate::logger::enabled($level) {
            $crate::logger::log($level, file!(), line!(), &format!($($arg)*))
        }
    };
}
