//! Minimal, dependency-free logging for the Fen toolchain.
//!
//! Provides a global, atomically level-filtered logger with ANSI-colored
//! output on stderr and automatic capture of the calling module path.
//!
//! # Example
//!
//! ```
//! use fen_log::{info, debug, Level};
//!
//! fen_log::set_level(Level::Debug);
//!
//! info!("runtime starting");
//! debug!("pool limits: {} strings, {} builders", 4096, 256);
//! ```
//!
//! The level can also be taken from the environment at startup:
//!
//! ```
//! // Respects FEN_LOG=error|warn|info|debug|trace, defaults to info.
//! fen_log::init_from_env();
//! ```

use std::fmt::Arguments;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

/// Environment variable consulted by [`init_from_env`].
pub const LEVEL_ENV_VAR: &str = "FEN_LOG";

/// Severity of a log record, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Unrecoverable or contract-violating conditions.
    Error = 0,
    /// Degraded but defined behavior, e.g. a table at its ceiling.
    Warn = 1,
    /// High-level lifecycle events.
    Info = 2,
    /// Per-operation diagnostics.
    Debug = 3,
    /// Hot-path detail such as reallocation events.
    Trace = 4,
}

impl Level {
    /// Upper-case label used in the output line.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        }
    }

    const fn color(self) -> &'static str {
        match self {
            Level::Error => "\x1b[31m",
            Level::Warn => "\x1b[33m",
            Level::Info => "\x1b[32m",
            Level::Debug => "\x1b[36m",
            Level::Trace => "\x1b[35m",
        }
    }

    const fn from_u8(raw: u8) -> Level {
        match raw {
            0 => Level::Error,
            1 => Level::Warn,
            2 => Level::Info,
            3 => Level::Debug,
            _ => Level::Trace,
        }
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("error") {
            Ok(Level::Error)
        } else if s.eq_ignore_ascii_case("warn") {
            Ok(Level::Warn)
        } else if s.eq_ignore_ascii_case("info") {
            Ok(Level::Info)
        } else if s.eq_ignore_ascii_case("debug") {
            Ok(Level::Debug)
        } else if s.eq_ignore_ascii_case("trace") {
            Ok(Level::Trace)
        } else {
            Err(ParseLevelError(s.to_string()))
        }
    }
}

/// Error returned when a level string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError(String);

impl std::fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown log level: {:?}", self.0)
    }
}

impl std::error::Error for ParseLevelError {}

/// Currently active maximum level, stored as its discriminant.
static ACTIVE_LEVEL: AtomicU8 = AtomicU8::new(Level::Info as u8);

/// Sets the maximum level that will be emitted.
pub fn set_level(level: Level) {
    ACTIVE_LEVEL.store(level as u8, Ordering::SeqCst);
}

/// Returns the currently active maximum level.
#[must_use]
pub fn level() -> Level {
    Level::from_u8(ACTIVE_LEVEL.load(Ordering::Relaxed))
}

/// Returns true if a record at `level` would currently be emitted.
#[must_use]
pub fn enabled(level: Level) -> bool {
    level as u8 <= ACTIVE_LEVEL.load(Ordering::Relaxed)
}

/// Initializes the level from the `FEN_LOG` environment variable.
///
/// Unset or unparsable values leave the level at its default (`Info`).
pub fn init_from_env() {
    if let Ok(value) = std::env::var(LEVEL_ENV_VAR)
        && let Ok(parsed) = value.parse::<Level>()
    {
        set_level(parsed);
    }
}

/// Emits a single record. Called by the macros after the level check.
#[doc(hidden)]
pub fn __emit(level: Level, target: &str, args: Arguments<'_>) {
    const RESET: &str = "\x1b[0m";
    eprintln!("{}[{}]{RESET} {target}: {args}", level.color(), level.label());
}

/// Logs at an explicit level, capturing the caller's module path.
#[macro_export]
macro_rules! log {
    ($level:expr, $($arg:tt)*) => {
        if $crate::enabled($level) {
            $crate::__emit($level, module_path!(), format_args!($($arg)*));
        }
    };
}

/// Logs at [`Level::Error`].
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => { $crate::log!($crate::Level::Error, $($arg)*) };
}

/// Logs at [`Level::Warn`].
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => { $crate::log!($crate::Level::Warn, $($arg)*) };
}

/// Logs at [`Level::Info`].
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => { $crate::log!($crate::Level::Info, $($arg)*) };
}

/// Logs at [`Level::Debug`].
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => { $crate::log!($crate::Level::Debug, $($arg)*) };
}

/// Logs at [`Level::Trace`].
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => { $crate::log!($crate::Level::Trace, $($arg)*) };
}
