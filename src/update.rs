//! # Incremental Document Update
//!
//! This module re-synchronizes a previously generated, manually-edited
//! contributor document with a freshly computed roster, without destroying
//! manual annotations and without reordering or corrupting content it
//! cannot confidently interpret.
//!
//! The document is semi-structured: there is no grammar to parse, only
//! section-title string search. The updater therefore works in five
//! passes over one recomputed boundary table:
//!
//! 1. **Header normalization** - the canonical header comment block is
//!    prepended when it is not already a prefix of the document.
//! 2. **Boundary detection** - each named team's title block (title line
//!    plus dashed underline) is located and the text between consecutive
//!    titles becomes that team's boundary. The default team renders
//!    without a title, so its region starts at the first line holding one
//!    of its members' mails after the last named title.
//! 3. **Placement guard and email backfill** - a member's mail found
//!    outside its team's boundary is a fatal conflict; a member whose name
//!    is present but whose mail is missing gets the mail inserted after
//!    the name.
//! 4. **Reorder by commit count** - each boundary body is split into
//!    per-entry fragments; fragments matching a roster member's mail are
//!    reused verbatim in roster order, missing members are synthesized,
//!    and unmatched fragments are appended unchanged.
//! 5. **Assembly** - header text, then each team body in roster order,
//!    separated by normalized blank lines. Teams absent from the document
//!    are rendered fresh at their roster position.
//!
//! Re-running the updater on its own output with an unchanged roster is a
//! fixed point: the second pass is byte-identical.

use crate::defaults::update_header;
use crate::error::{Error, Result};
use crate::render::{default_list, line_for_person, team_section, team_title, ShowPolicy};
use crate::roster::{teams_of, Roster, Team};

/// The computed text span of one section within the document.
///
/// Boundaries are recomputed on every update call from the title strings'
/// positions; they are never stored or mutated in place. The synthetic
/// `"Header"` entry covers the text before the first team title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionBoundary {
    pub name: String,
    pub start: usize,
    pub end: usize,
    /// Whether the section exists in the document. A missing section gets
    /// the empty span at end-of-document and is rendered fresh during
    /// assembly.
    pub found: bool,
}

impl SectionBoundary {
    fn span<'d>(&self, document: &'d str) -> &'d str {
        &document[self.start..self.end]
    }
}

/// Update the existing document text against the freshly computed roster.
///
/// The roster is consumed teamed, default team included and last. The
/// returned text is complete; the caller decides when and how to write it.
///
/// # Errors
///
/// Returns `Error::PlacementConflict` when a member's mail appears in the
/// document outside the section of the team the roster assigns them to.
/// The document is never partially rewritten on failure.
pub fn update_content(
    existing: &str,
    roster: &Roster,
    policy: &ShowPolicy,
    configuration_file: &str,
) -> Result<String> {
    let header = update_header(configuration_file);
    let document = if existing.starts_with(&header) {
        existing.to_string()
    } else {
        let mut prefixed = header;
        prefixed.push_str(existing);
        prefixed
    };

    let teams = teams_of(roster, true);
    let boundaries = detect_boundaries(&document, &teams, policy);

    // Passes 3 and 4, per team: placement guard, backfill, reorder. The
    // conflict check always runs against the unmodified document so that
    // backfilled mails cannot mask a pre-existing misplacement.
    let mut bodies: Vec<Option<String>> = Vec::with_capacity(teams.len());
    for (team, boundary) in teams.iter().zip(boundaries.iter().skip(1)) {
        check_placement(&document, boundary, team)?;
        if !boundary.found {
            bodies.push(None);
            continue;
        }
        let section = backfill_mails(boundary.span(&document), team, policy);
        bodies.push(Some(reorder_section(&section, team, policy)));
    }

    // Pass 5: assembly.
    let mut result = boundaries[0].span(&document).to_string();
    for (team, body) in teams.iter().zip(bodies) {
        match body {
            Some(text) => {
                result.push_str(&text);
                if !team.is_default() {
                    result.push('\n');
                }
            }
            None if team.is_default() => result.push_str(&default_list(&team.members, policy)),
            None => result.push_str(&team_section(team, policy)),
        }
    }
    Ok(result)
}

/// Compute the ordered boundary table for the document.
///
/// The first entry is always the synthetic `"Header"` section; the rest
/// follow the team order given (named teams, default last). Named titles
/// are searched as the full two-line block so that a team name occurring
/// inside a contributor line does not split a section.
pub fn detect_boundaries(
    document: &str,
    teams: &[Team<'_>],
    policy: &ShowPolicy,
) -> Vec<SectionBoundary> {
    let end = document.len();

    // Locate each named title's first occurrence, keeping document order.
    let mut located: Vec<(usize, usize, usize)> = Vec::new(); // (team index, start, title length)
    for (index, team) in teams.iter().enumerate() {
        if team.is_default() {
            continue;
        }
        let title = team_title(team.name);
        let Some(start) = document.find(&title) else {
            continue;
        };
        if document[start + title.len()..].contains(&title) {
            log::warn!(
                "team title '{}' occurs more than once in the document, \
                 using the first occurrence",
                team.name
            );
        }
        located.push((index, start, title.len()));
    }
    located.sort_by_key(|&(_, start, _)| start);

    // The default team has no title: its region starts at the first line
    // holding one of its members' mails after the last named title.
    let search_from = located
        .last()
        .map(|&(_, start, len)| start + len)
        .unwrap_or(0);
    let default_start = teams
        .iter()
        .find(|team| team.is_default())
        .and_then(|team| default_region_start(document, search_from, team, policy));

    let tail_start = default_start.unwrap_or(end);
    let header_end = located
        .first()
        .map(|&(_, start, _)| start)
        .unwrap_or(tail_start);

    let mut boundaries = vec![SectionBoundary {
        name: "Header".to_string(),
        start: 0,
        end: header_end,
        found: true,
    }];
    for (index, team) in teams.iter().enumerate() {
        let position = located.iter().position(|&(i, _, _)| i == index);
        let boundary = if team.is_default() {
            SectionBoundary {
                name: team.name.to_string(),
                start: tail_start,
                end,
                found: default_start.is_some(),
            }
        } else if let Some(at) = position {
            let start = located[at].1;
            let section_end = located
                .get(at + 1)
                .map(|&(_, next, _)| next)
                .unwrap_or(tail_start);
            SectionBoundary {
                name: team.name.to_string(),
                start,
                end: section_end,
                found: true,
            }
        } else {
            // Absent from the document: an empty span at end-of-document,
            // rendered fresh during assembly.
            SectionBoundary {
                name: team.name.to_string(),
                start: end,
                end,
                found: false,
            }
        };
        boundaries.push(boundary);
    }
    boundaries
}

/// Fail when a member's mail occurs in the document outside the boundary
/// of the team the roster assigns them to.
///
/// This is a data-integrity guard: an entry is never silently moved
/// between sections, the user has to resolve the placement manually.
fn check_placement(document: &str, boundary: &SectionBoundary, team: &Team<'_>) -> Result<()> {
    for member in &team.members {
        let Some(mail) = &member.mail else { continue };
        let outside_occurrence = document[..boundary.start].contains(mail.as_str())
            || document[boundary.end..].contains(mail.as_str());
        if outside_occurrence {
            return Err(Error::PlacementConflict {
                name: member.name.clone(),
                mail: mail.clone(),
                team: team.name.to_string(),
            });
        }
    }
    Ok(())
}

/// Insert missing mails after names that already appear in the section.
///
/// Only names of at least two space-separated tokens are completed; a
/// single ambiguous token is too likely to match unrelated text.
fn backfill_mails(section: &str, team: &Team<'_>, policy: &ShowPolicy) -> String {
    let mut text = section.to_string();
    for member in &team.members {
        if !policy.should_show(member) {
            continue;
        }
        let Some(mail) = &member.mail else { continue };
        if text.contains(mail.as_str()) || member.name.split(' ').count() < 2 {
            continue;
        }
        if let Some(at) = text.find(&member.name) {
            text.insert_str(at + member.name.len(), &format!(" {mail}"));
        }
    }
    text
}

/// Reorder one section body to roster order, reusing existing entry
/// fragments verbatim.
fn reorder_section(section: &str, team: &Team<'_>, policy: &ShowPolicy) -> String {
    let body = normalize_trailing(section);
    let (preamble, fragments) = split_fragments(body);
    let mut consumed = vec![false; fragments.len()];

    let mut result = preamble;
    for member in &team.members {
        if !policy.should_show(member) {
            continue;
        }
        let Some(mail) = &member.mail else {
            log::warn!("{} does not have a proper email", member.name);
            continue;
        };
        let reusable =
            (0..fragments.len()).find(|&i| !consumed[i] && fragments[i].contains(mail.as_str()));
        match reusable {
            Some(index) => {
                consumed[index] = true;
                result.push_str(&fragments[index]);
            }
            None => result.push_str(&line_for_person(member)),
        }
    }
    // Content the roster does not know about is appended in its original
    // relative order, never deleted.
    for (index, fragment) in fragments.iter().enumerate() {
        if !consumed[index] {
            result.push_str(fragment);
        }
    }
    result
}

/// Split a section body into the preamble (title block, comments) and the
/// per-entry fragments, each starting at a `- ` line and carrying its
/// continuation lines.
fn split_fragments(body: &str) -> (String, Vec<String>) {
    let mut preamble = String::new();
    let mut fragments: Vec<String> = Vec::new();
    for line in body.split_inclusive('\n') {
        if line.starts_with("- ") {
            fragments.push(line.to_string());
        } else if let Some(last) = fragments.last_mut() {
            last.push_str(line);
        } else {
            preamble.push_str(line);
        }
    }
    (preamble, fragments)
}

/// Drop trailing blank lines; the assembly pass re-adds the canonical
/// single blank-line separator.
fn normalize_trailing(text: &str) -> &str {
    let mut trimmed = text;
    while trimmed.ends_with("\n\n") {
        trimmed = &trimmed[..trimmed.len() - 1];
    }
    trimmed
}

/// Earliest line start holding a default member's mail at or after
/// `search_from`.
fn default_region_start(
    document: &str,
    search_from: usize,
    team: &Team<'_>,
    policy: &ShowPolicy,
) -> Option<usize> {
    let tail = &document[search_from..];
    let earliest = team
        .members
        .iter()
        .filter(|member| policy.should_show(member))
        .filter_map(|member| member.mail.as_deref())
        .filter_map(|mail| tail.find(mail))
        .min()?;
    let line_start = tail[..earliest].rfind('\n').map(|at| at + 1).unwrap_or(0);
    Some(search_from + line_start)
}
