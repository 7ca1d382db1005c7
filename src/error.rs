//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `contributors-txt` application. It uses the `thiserror` library to
//! create a comprehensive `Error` enum that covers all anticipated failure
//! modes, providing clear and descriptive error messages.
//!
//! ## Error Taxonomy
//!
//! - *Configuration errors* (`AliasParse`): a malformed alias file or a
//!   record missing required fields. Fatal, reported with the offending
//!   record and an optional fix-it hint.
//! - *Aggregation conflicts* (`AggregationConflict`): two commit-log
//!   entries resolve to the same name but differing non-null mails. Fatal,
//!   reported with both mails and a ready-to-paste alias suggestion.
//! - *Placement conflicts* (`PlacementConflict`): during an update, a
//!   member's mail exists in the document outside its expected team
//!   section. Fatal data-integrity guard, never auto-resolved.
//! - *Input errors* (`Shortlog`, `GitCommand`): a malformed commit-log
//!   line or a failed commit-log invocation.
//!
//! Soft conditions (a member without a mail, the legacy alias format) are
//! logged with the `log` crate instead of surfacing here.
//!
//! All fatal errors abort before the output file is mutated: callers
//! compute the full new document text first and only then write it.

use thiserror::Error;

/// Main error type for contributors-txt operations
#[derive(Error, Debug)]
pub enum Error {
    /// The alias configuration file could not be parsed or a record is
    /// missing required fields.
    ///
    /// This error includes the specific parsing issue and optionally a hint
    /// about how to fix it.
    #[error("Alias configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    AliasParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A commit-log line did not match the `<count>\t<name> <mail>` shape.
    #[error("Malformed commit-log line {line:?}: {message}")]
    Shortlog { line: String, message: String },

    /// The external commit-log command failed.
    #[error("Git command failed: {command} - {stderr}")]
    GitCommand { command: String, stderr: String },

    /// Two commit-log entries resolved to the same name with differing
    /// non-null mails. The suggestion is a ready-to-paste alias record
    /// that merges the two identities.
    #[error(
        "Mails are not the same: {left_mail} != {right_mail} for {name}, \
         add an alias such as:\n{suggestion}"
    )]
    AggregationConflict {
        name: String,
        left_mail: String,
        right_mail: String,
        suggestion: String,
    },

    /// During an update, a member's mail was found in the document outside
    /// the section of the team the roster assigns them to.
    #[error(
        "{mail} of {name} found outside of the '{team}' section, \
         please fix the document manually before updating"
    )]
    PlacementConflict {
        name: String,
        mail: String,
        team: String,
    },

    /// Two commit-log entries resolved to the same name but to different
    /// teams.
    #[error(
        "Teams are not the same: {left_team} != {right_team} for {name}, \
         fix the alias configuration"
    )]
    TeamMismatch {
        name: String,
        left_team: String,
        right_team: String,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A JSON parsing error, wrapped from `serde_json::Error`.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
