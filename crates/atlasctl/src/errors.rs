//! Exit codes for atlasctl
//!
//! Only `atlasctl test` signals probe failures through the exit code; the
//! debug transcript completes with success even when individual steps fail.

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code when the minimal connection test hits a connection or
/// configuration failure
pub const EXIT_PROBE_FAILED: i32 = 1;
