//! A `log`-crate backend that writes colorized lines to the console.
//!
//! Installed once from [`crate::rust_main`]. The level filter is chosen at
//! compile time via the `LOG` environment variable, the same convention the
//! teaching kernel this crate grew from uses.

use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::console::Color;
use crate::color_println;

struct KernelLogger;

static LOGGER: KernelLogger = KernelLogger;

/// Installs the kernel logger as the global `log` backend.
///
/// # Panics
/// Panics if a logger has already been installed. Must be called exactly
/// once, early in [`crate::rust_main`].
pub fn init() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(match option_env!("LOG") {
        Some("ERROR") => LevelFilter::Error,
        Some("WARN") => LevelFilter::Warn,
        Some("INFO") => LevelFilter::Info,
        Some("DEBUG") => LevelFilter::Debug,
        Some("TRACE") => LevelFilter::Trace,
        _ => LevelFilter::Info,
    });
}

impl Log for KernelLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        color_println!(
            level_to_color(record.level()),
            "[KERNEL][{:>5}] {}",
            record.level(),
            record.args(),
        );
    }

    fn flush(&self) {}
}

fn level_to_color(level: Level) -> Color {
    match level {
        Level::Error => Color::Red,
        Level::Warn => Color::BrightYellow,
        Level::Info => Color::Blue,
        Level::Debug => Color::Green,
        Level::Trace => Color::BrightBlack,
    }
}
