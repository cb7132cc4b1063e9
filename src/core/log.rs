//! Diagnostics on stderr
//!
//! stdout carries machine-readable results only. Everything else goes to
//! stderr with a colored `[module]` prefix:
//!
//! ```ignore
//! log!("render"; "{} links in {}", links, path);
//! warning!("render"; "{} was truncated", path);
//! ```

use colored::Colorize;
use once_cell::sync::OnceCell;

/// How chatty stderr is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        }
    }
}

static VERBOSITY: OnceCell<Verbosity> = OnceCell::new();

/// Configure diagnostics once at startup
pub fn init(verbosity: Verbosity, color: bool) {
    if !color {
        colored::control::set_override(false);
    }
    let _ = VERBOSITY.set(verbosity);
}

pub fn verbosity() -> Verbosity {
    VERBOSITY.get().copied().unwrap_or(Verbosity::Normal)
}

/// Verbose-only progress message
pub fn log(module: &str, message: &str) {
    if verbosity() >= Verbosity::Verbose {
        eprintln!("{} {}", format!("[{}]", module).cyan(), message);
    }
}

/// Warning, shown unless quiet
pub fn warn(module: &str, message: &str) {
    if verbosity() >= Verbosity::Normal {
        eprintln!("{} {}", format!("[{}]", module).yellow().bold(), message);
    }
}

#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::core::log::log($module, &format!($($arg)*))
    }};
}

#[macro_export]
macro_rules! warning {
    ($module:expr; $($arg:tt)*) => {{
        $crate::core::log::warn($module, &format!($($arg)*))
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
    }

    #[test]
    fn test_verbosity_ordering() {
        assert!(Verbosity::Verbose > Verbosity::Normal);
        assert!(Verbosity::Normal > Verbosity::Quiet);
    }
}
