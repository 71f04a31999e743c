//! Standard exit codes (BSD sysexits.h compatible)

/// Successful termination
pub const OK: i32 = 0;

/// Generic failure (query without answer, selection cancelled)
pub const FAILURE: i32 = 1;

/// Data format error (malformed tree file)
pub const DATAERR: i32 = 65;

/// Cannot open input (no tree files to choose from)
pub const NOINPUT: i32 = 66;

/// Internal software error
pub const SOFTWARE: i32 = 70;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;
