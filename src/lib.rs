//! # contributors-txt
//!
//! This library derives a human-readable contributor roster from a
//! version-control commit log, resolving contributor aliases and grouping
//! by team. It is designed to be used by the `contributors-txt`
//! command-line tool but can also be integrated into other applications
//! that maintain a generated-yet-hand-edited contributor file.
//!
//! ## Quick Example
//!
//! ```
//! use contributors_txt::aliases::AliasResolver;
//! use contributors_txt::render::{create_content, ShowPolicy};
//! use contributors_txt::roster::roster_from_shortlog;
//!
//! let resolver = AliasResolver::default();
//! let shortlog = "     5\tAlice <a@x.com>\n     3\tBob <b@x.com>\n";
//! let roster = roster_from_shortlog(&resolver, shortlog).unwrap();
//!
//! let content = create_content(&roster, &ShowPolicy::default(), "aliases.json");
//! assert!(content.contains("- Alice <a@x.com>"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Alias resolution (`aliases`)**: maps raw commit-author mails to
//!   canonical (name, mail, team) records configured in a JSON file.
//! - **Roster building (`roster`)**: folds shortlog lines into an
//!   aggregated, deduplicated roster and partitions it into teams.
//! - **Fresh rendering (`render`)**: produces a full document from the
//!   roster alone.
//! - **Incremental update (`update`)**: reconciles an existing, possibly
//!   hand-edited document with a fresh roster, preserving manual content
//!   where safe and rejecting unsafe merges.
//! - **Commit-log capture (`shortlog`)**: runs the external git command
//!   whose output feeds the roster builder.
//!
//! ## Execution Flow
//!
//! A run reads all inputs, computes the full new document text, and only
//! then writes it in one atomic step:
//!
//! 1.  Load and validate the alias configuration.
//! 2.  Capture the commit log and fold it into the roster.
//! 3.  Render fresh, or update the existing document against the roster.
//! 4.  Write the result to a temporary file and rename it into place.

pub mod aliases;
pub mod defaults;
pub mod error;
pub mod render;
pub mod roster;
pub mod shortlog;
pub mod update;

#[cfg(test)]
mod roster_proptest;
