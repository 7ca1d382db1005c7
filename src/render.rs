//! # Fresh Document Rendering
//!
//! Produces the full contributor document from the roster alone, with no
//! prior document to reconcile against: a header comment block naming the
//! configuration source, one section per named team (title, dashed
//! underline, blank line, member list, trailing blank line), then the
//! default team as a flat list with no title.

use std::collections::HashSet;

use crate::defaults::{create_header, NO_SHOW_MAIL, NO_SHOW_NAME};
use crate::roster::{teams_of, Contributor, Roster, Team};

/// Contributors that are computed but never rendered.
///
/// Passed explicitly into the rendering and update passes; the built-in
/// lists cover CI bots and root commits.
#[derive(Debug, Clone)]
pub struct ShowPolicy {
    /// Bare mail addresses (no angle brackets) that are never shown.
    pub excluded_mails: HashSet<String>,
    /// Names that are never shown.
    pub excluded_names: HashSet<String>,
}

impl Default for ShowPolicy {
    fn default() -> Self {
        Self {
            excluded_mails: NO_SHOW_MAIL.iter().map(|m| m.to_string()).collect(),
            excluded_names: NO_SHOW_NAME.iter().map(|n| n.to_string()).collect(),
        }
    }
}

impl ShowPolicy {
    /// Whether the contributor belongs in the rendered list at all.
    pub fn should_show(&self, person: &Contributor) -> bool {
        let bare_mail = person
            .mail
            .as_deref()
            .map(|m| m.trim_start_matches('<').trim_end_matches('>'));
        if bare_mail.is_some_and(|m| self.excluded_mails.contains(m)) {
            return false;
        }
        !self.excluded_names.contains(&person.name)
    }
}

/// One `- name <mail>` entry line.
pub fn line_for_person(person: &Contributor) -> String {
    format!("- {}\n", person.display())
}

/// The title line and its dashed underline of equal length.
pub fn team_title(team_name: &str) -> String {
    format!("{}\n{}\n", team_name, "-".repeat(team_name.len()))
}

/// Render one named team section: title, underline, blank line, member
/// list, trailing blank line.
pub fn team_section(team: &Team<'_>, policy: &ShowPolicy) -> String {
    let mut section = team_title(team.name);
    section.push('\n');
    for member in &team.members {
        if !policy.should_show(member) {
            continue;
        }
        if member.mail.is_none() {
            log::warn!("{} does not have a proper email", member.name);
            continue;
        }
        section.push_str(&line_for_person(member));
    }
    section.push('\n');
    section
}

/// Render the default-team members as a flat list with no title.
pub fn default_list(members: &[&Contributor], policy: &ShowPolicy) -> String {
    let mut list = String::new();
    for member in members {
        if member.mail.is_none() {
            log::warn!("{} does not have a proper email", member.name);
            continue;
        }
        if !policy.should_show(member) {
            continue;
        }
        list.push_str(&line_for_person(member));
    }
    list
}

/// Produce the whole document from the roster alone.
pub fn create_content(roster: &Roster, policy: &ShowPolicy, configuration_file: &str) -> String {
    let mut result = create_header(configuration_file);
    for team in teams_of(roster, false) {
        result.push_str(&team_section(&team, policy));
    }
    let default_members: Vec<&Contributor> = teams_of(roster, true)
        .into_iter()
        .filter(|team| team.is_default())
        .flat_map(|team| team.members)
        .collect();
    result.push_str(&default_list(&default_members, policy));
    result
}
