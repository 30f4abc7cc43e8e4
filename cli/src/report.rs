#![deny(missing_docs)]

//! # Status Reporting
//!
//! Stateless colored status lines for the CLI; no process-wide state.

use colored::Colorize;

/// Outcome of a combine run, for display purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The combined document was written.
    Success,
    /// The run aborted before writing any output.
    Failure,
}

/// Formats a status line for the terminal.
pub fn status_line(status: Status, message: &str) -> String {
    match status {
        Status::Success => format!("{} {}", "Done!".green().bold(), message.yellow()),
        Status::Failure => {
            format!("{}\n{}", "Something went wrong:".red().bold(), message.red())
        }
    }
}
