//! Compile-time constants for the static system image.
//!
//! Everything here is a knob the offline harden tool would otherwise bake
//! into a generated build: table sizes, the scheduling rate, and the
//! console/log formatting defaults. Board timing (clock frequency) lives in
//! [`crate::boards`] since it varies with the target board rather than the
//! kernel's own policy.

/// Number of threads in the static thread table.
pub const NUM_THREADS: usize = 4;

/// Number of processes in the static process table.
pub const NUM_PROCESSES: usize = 4;

/// Number of statically allocated kernel objects.
pub const NUM_KOBJECTS: usize = 7;

/// Maximum number of statically allocated virtual interrupts.
pub const NUM_VIRQS: usize = 1;

/// Target number of scheduling decisions per second.
///
/// The repository this is modeled on runs at roughly 128 Hz; kept as the
/// default here.
pub const SCHEDULE_RATE_HZ: usize = 128;

/// Capacity, in bytes, of a single log object's line buffer.
pub const LOG_LINE_BUFFER_CAPACITY: usize = 80;

/// Default prefix used by a log object when none is configured.
pub const DEFAULT_LOG_PREFIX: &str = "UU";
