//! Default values for contributors-txt configuration.
//!
//! This module provides centralized default values used across the crate,
//! ensuring consistency and avoiding duplication.

/// The team assigned to contributors that no alias record claims.
///
/// Members of this team are rendered as a flat list at the end of the
/// document, without a section title.
pub const DEFAULT_TEAM: &str = "contributors";

/// Default output file, relative to the repository root.
pub const DEFAULT_OUTPUT: &str = "CONTRIBUTORS.txt";

/// Arguments of the commit-log command whose captured output feeds the
/// roster builder. One line per distinct author identity, of the shape
/// `<count>\t<name> <mail>`. HEAD is pinned explicitly: without a
/// revision, `git shortlog` reads the commit log from stdin when stdin is
/// not a terminal.
pub const GIT_SHORTLOG: [&str; 5] = ["shortlog", "--summary", "--numbered", "--email", "HEAD"];

/// Sentinel mail emitted by the commit log for anonymized authors.
pub const NO_MAIL_SENTINEL: &str = "none@none";

/// Mails that are never shown in the contributor list.
pub const NO_SHOW_MAIL: [&str; 1] = ["bot@noreply.github.com"];

/// Names that are never shown in the contributor list.
pub const NO_SHOW_NAME: [&str; 1] = ["root"];

/// Comment block opening a freshly generated document.
pub fn create_header(configuration_file: &str) -> String {
    format!(
        "# This file is autogenerated by 'contributors-txt',\n\
         # using the configuration in '{configuration_file}'\n\
         # please do not modify manually\n\n"
    )
}

/// Comment block opening an incrementally updated document.
pub fn update_header(configuration_file: &str) -> String {
    format!(
        "# This file is autocompleted by 'contributors-txt',\n\
         # using the configuration in '{configuration_file}'\n\
         # please verify that your change are stable if you\n\
         # modify manually\n\n"
    )
}
