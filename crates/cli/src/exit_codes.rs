//! CLI exit codes. Scripts rely on these.
//!
//! | Code | Meaning                                   |
//! |------|-------------------------------------------|
//! | 0    | Success                                   |
//! | 1    | Runtime error (terminal, out-of-range)    |
//! | 2    | Usage error (bad arguments)               |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Runtime failure while running a command.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unreadable config passed explicitly.
pub const EXIT_USAGE: u8 = 2;
