//! Process exit codes.

pub const SUCCESS: i32 = 0;

/// Invalid input, configuration or engine failure.
pub const ERROR: i32 = 2;

/// The user quit an interactive game.
pub const INTERRUPTED: i32 = 130;
