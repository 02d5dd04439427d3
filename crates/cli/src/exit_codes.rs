//! CLI Exit Code Registry
//!
//! Single source of truth for `kirzach` exit codes. Scripts rely on them.
//!
//! | Range   | Domain        | Description                                 |
//! |---------|---------------|---------------------------------------------|
//! | 0       | Universal     | Success                                     |
//! | 1       | Universal     | General error                               |
//! | 2       | Universal     | Usage error (bad args, unreadable input)    |
//! | 3-9     | settings      | Storage and import codes                    |
//! | 10-19   | notify        | Permission, subscription and dispatch codes |
//! | 20-29   | worker        | Pre-cache and push codes                    |

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing input file.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Settings (3-9)
// =============================================================================

/// Storage or output file could not be read or written.
pub const EXIT_IO: u8 = 3;

/// `settings import` input was not a valid settings object.
/// Current settings are left unchanged.
pub const EXIT_IMPORT_REJECTED: u8 = 4;

// =============================================================================
// Notify (10-19)
// =============================================================================

/// Platform lacks notifications or background registration.
pub const EXIT_NOTIFY_UNSUPPORTED: u8 = 10;

/// Permission was not granted (denied now or earlier).
pub const EXIT_NOTIFY_DENIED: u8 = 11;

/// Push subscription could not be created.
pub const EXIT_NOTIFY_SUBSCRIBE: u8 = 12;

/// Notification was not dispatched (disabled, no permission, or filtered).
pub const EXIT_NOTIFY_SUPPRESSED: u8 = 13;

// =============================================================================
// Worker (20-29)
// =============================================================================

/// Pre-caching failed; nothing was stored.
pub const EXIT_PRECACHE: u8 = 20;

/// Push message could not be displayed.
pub const EXIT_PUSH: u8 = 21;
