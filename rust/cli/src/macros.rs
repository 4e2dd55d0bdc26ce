//! Macros for the exit-code plumbing in [`crate::run`].

/// Write a line to a stream, returning the error exit code from the
/// enclosing function if the write fails.
///
/// ```ignore
/// write_or_exit!(err, "Error: {}", message);
/// ```
#[macro_export]
macro_rules! write_or_exit {
    ($dest:expr, $($arg:tt)*) => {
        if writeln!($dest, $($arg)*).is_err() {
            return $crate::exit_code::ERROR;
        }
    };
}

/// Map a command handler's result to its exit code, reporting failures on
/// the error stream.
///
/// ```ignore
/// let code = exit_code_for!(err, handle_cfg_command(out, err));
/// ```
#[macro_export]
macro_rules! exit_code_for {
    ($err:expr, $result:expr) => {
        match $result {
            Ok(()) => $crate::exit_code::SUCCESS,
            Err($crate::CliError::Interrupted(msg)) => {
                $crate::write_or_exit!($err, "Interrupted: {}", msg);
                $crate::exit_code::INTERRUPTED
            }
            Err(e) => {
                $crate::write_or_exit!($err, "Error: {}", e);
                $crate::exit_code::ERROR
            }
        }
    };
}
