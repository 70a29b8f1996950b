//! Character-at-a-time console output on top of the firmware write-character
//! call, plus the `print!`/`println!` macros built on it.
//!
//! Writes are serialised by [`PRINT_LOCK`] (`spec.md §5`: "Printing to the
//! console is protected by a spin lock so that log lines do not interleave
//! ... today it serialises kernel prints against any reentrant printing from
//! a nested panic path"), grounded on `original_source`'s `io.hpp`
//! `format_lock`/`spinlock_guard`.

use core::fmt::{self, Write};

use crate::sbi;
use crate::sync::SpinMutex;

static PRINT_LOCK: SpinMutex<()> = SpinMutex::new(());

struct Stdout;

impl Write for Stdout {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            sbi::console_putchar(c as usize);
        }
        Ok(())
    }
}

#[doc(hidden)]
pub fn print(args: fmt::Arguments) {
    let _guard = PRINT_LOCK.lock();
    Stdout.write_fmt(args).unwrap();
}

/// ANSI color codes used to tag log output by level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red = 31,
    Green = 32,
    Yellow = 33,
    Blue = 34,
    BrightBlack = 90,
    BrightYellow = 93,
}

#[doc(hidden)]
pub fn color_print(color: Color, args: fmt::Arguments) {
    let _guard = PRINT_LOCK.lock();
    Stdout.write_fmt(format_args!("\x1B[{}m", color as u8)).unwrap();
    Stdout.write_fmt(args).unwrap();
    Stdout.write_fmt(format_args!("\x1B[0m")).unwrap();
}

#[macro_export]
macro_rules! print {
    ($fmt: literal $(, $($arg: tt)+)?) => {
        $crate::console::print(format_args!($fmt $(, $($arg)+)?));
    };
}

#[macro_export]
macro_rules! println {
    ($fmt: literal $(, $($arg: tt)+)?) => {
        $crate::console::print(format_args!(concat!($fmt, "\n") $(, $($arg)+)?));
    };
}

#[macro_export]
macro_rules! color_println {
    ($color:expr, $fmt:literal $(, $($arg:tt)+)?) => {
        $crate::console::color_print(
            $color,
            format_args!(concat!($fmt, "\n") $(, $($arg)+)?)
        )
    };
}
