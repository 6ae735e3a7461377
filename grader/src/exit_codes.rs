//! Stable exit codes for grader CLI commands.

/// Every step succeeded.
pub const OK: i32 = 0;
/// Invalid configuration, missing directories, or other I/O errors.
pub const INVALID: i32 = 1;
/// Compiling the comparator or building the submission failed.
pub const BUILD_FAILED: i32 = 2;
/// The submission executable exited non-zero (or could not be started).
pub const RUN_FAILED: i32 = 3;
/// `grader compare` ran, but at least one case directory was malformed.
pub const INVALID_CASES: i32 = 4;
/// Removing a build artifact failed.
pub const CLEANUP_FAILED: i32 = 5;
