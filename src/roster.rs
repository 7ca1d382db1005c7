//! # Roster Building and Team Grouping
//!
//! This module folds raw shortlog-style commit-log lines into an
//! aggregated, deduplicated contributor roster, and partitions that roster
//! into named teams plus the default bucket.
//!
//! ## Key Components
//!
//! - **`Contributor`**: the merged record of one resolved contributor's
//!   name, mail, team, and total commit count.
//! - **`Roster`**: the name-keyed accumulation of contributors, built as a
//!   pure fold over the commit-log lines.
//! - **`Team`**: one named group of roster members, ordered descending by
//!   commit count.
//!
//! Aggregation is order-independent: folding the same lines in any order
//! yields the same roster (same names, mails, counts).

use regex::Regex;

use crate::aliases::AliasResolver;
use crate::defaults::{DEFAULT_TEAM, NO_MAIL_SENTINEL};
use crate::error::{Error, Result};

/// The merged record of one resolved contributor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contributor {
    /// Canonical name, the merge key.
    pub name: String,
    /// Mail formatted as `<address>`, or `None` for anonymized
    /// contributors.
    pub mail: Option<String>,
    /// Total number of commits across all merged identities.
    pub commit_count: u64,
    /// Team the contributor belongs to.
    pub team: String,
}

impl Contributor {
    /// Render the contributor the way document entry lines show them:
    /// `name <mail>`, or just `name` when anonymized.
    pub fn display(&self) -> String {
        match &self.mail {
            Some(mail) => format!("{} {}", self.name, mail),
            None => self.name.clone(),
        }
    }
}

/// Merge two aggregates for the same contributor into a new one.
///
/// Pure step function of the roster fold: commit counts sum, the mail of
/// either side wins when the other is anonymized.
///
/// # Errors
///
/// - `Error::AggregationConflict` when both mails are present and differ
///   (ambiguous identity, carries a ready-to-paste alias suggestion).
/// - `Error::TeamMismatch` when the teams differ.
pub fn merge_contributor(left: &Contributor, right: &Contributor) -> Result<Contributor> {
    debug_assert_eq!(left.name, right.name);
    let mail = match (&left.mail, &right.mail) {
        (Some(a), Some(b)) if a != b => {
            return Err(Error::AggregationConflict {
                name: left.name.clone(),
                left_mail: a.clone(),
                right_mail: b.clone(),
                suggestion: alias_suggestion(left, right),
            });
        }
        (Some(a), _) => Some(a.clone()),
        (None, other) => other.clone(),
    };
    if left.team != right.team {
        return Err(Error::TeamMismatch {
            name: left.name.clone(),
            left_team: left.team.clone(),
            right_team: right.team.clone(),
        });
    }
    Ok(Contributor {
        name: left.name.clone(),
        mail,
        commit_count: left.commit_count + right.commit_count,
        team: left.team.clone(),
    })
}

/// Build the alias record a user could paste to merge two conflicting
/// identities.
fn alias_suggestion(left: &Contributor, right: &Contributor) -> String {
    let mut suggestion = format!(
        "\"{}\": {{\n    \"mails\": [\"{}\", \"{}\"],\n    \"name\": \"{}\"",
        bare_mail(&left.mail),
        bare_mail(&left.mail),
        bare_mail(&right.mail),
        left.name,
    );
    if left.team != DEFAULT_TEAM {
        suggestion.push_str(&format!(",\n    \"team\": \"{}\"", left.team));
    }
    suggestion.push_str("\n}");
    suggestion
}

/// Strip the angle brackets of a formatted mail, empty string when
/// anonymized.
fn bare_mail(mail: &Option<String>) -> &str {
    mail.as_deref()
        .map(|m| m.trim_start_matches('<').trim_end_matches('>'))
        .unwrap_or("")
}

/// The aggregated contributor roster, keyed by resolved name.
///
/// Insertion order is first-encountered order; it only becomes meaningful
/// after the commit-count sort in [`Roster::sorted_members`].
#[derive(Debug, Default)]
pub struct Roster {
    members: Vec<Contributor>,
}

impl Roster {
    /// Fold one contributor into the roster, merging by name.
    pub fn merge(&mut self, contributor: Contributor) -> Result<()> {
        match self
            .members
            .iter()
            .position(|member| member.name == contributor.name)
        {
            Some(at) => {
                let merged = merge_contributor(&self.members[at], &contributor)?;
                self.members[at] = merged;
            }
            None => self.members.push(contributor),
        }
        Ok(())
    }

    /// Members in first-encountered order.
    pub fn members(&self) -> &[Contributor] {
        &self.members
    }

    /// Members ordered descending by commit count, ties keeping
    /// first-encountered order.
    pub fn sorted_members(&self) -> Vec<&Contributor> {
        let mut sorted: Vec<&Contributor> = self.members.iter().collect();
        sorted.sort_by(|a, b| b.commit_count.cmp(&a.commit_count));
        sorted
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// One named group of roster members.
#[derive(Debug)]
pub struct Team<'a> {
    pub name: &'a str,
    /// Members ordered descending by commit count.
    pub members: Vec<&'a Contributor>,
}

impl Team<'_> {
    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_TEAM
    }
}

/// Partition the roster into teams.
///
/// Teams appear in order of their first member in the commit-count-sorted
/// sequence; member lists inherit that sort. When `include_default` is
/// set, the default team is included and moved to the last position;
/// otherwise only named teams are returned.
pub fn teams_of(roster: &Roster, include_default: bool) -> Vec<Team<'_>> {
    let mut teams: Vec<Team<'_>> = Vec::new();
    for member in roster.sorted_members() {
        if member.team == DEFAULT_TEAM && !include_default {
            continue;
        }
        match teams.iter().position(|team| team.name == member.team) {
            Some(at) => teams[at].members.push(member),
            None => teams.push(Team {
                name: &member.team,
                members: vec![member],
            }),
        }
    }
    if include_default {
        if let Some(index) = teams.iter().position(|team| team.is_default()) {
            let default_team = teams.remove(index);
            teams.push(default_team);
        }
    }
    teams
}

/// Parses `<count>\t<name> <mail>` commit-log lines.
#[derive(Debug)]
pub struct ShortlogParser {
    line_re: Regex,
}

impl ShortlogParser {
    pub fn new() -> Result<Self> {
        // Leading whitespace and the count/name separator vary between
        // git versions, the trailing `<mail>` does not.
        let line_re = Regex::new(r"^\s*(\d+)\s+(.*?)\s*<([^<>]*)>\s*$")?;
        Ok(Self { line_re })
    }

    /// Parse one commit-log line into a resolved [`Contributor`].
    ///
    /// The mail is resolved through the alias records: a match overrides
    /// the name and team and replaces the mail with the record's
    /// authoritative mail (which may be absent, anonymizing the
    /// contributor). The `<none@none>` sentinel anonymizes directly.
    pub fn parse_contributor(&self, line: &str, resolver: &AliasResolver) -> Result<Contributor> {
        let captures = self.line_re.captures(line).ok_or_else(|| Error::Shortlog {
            line: line.to_string(),
            message: "expected '<count>\\t<name> <mail>'".to_string(),
        })?;
        let commit_count: u64 =
            captures[1]
                .parse()
                .map_err(|e: std::num::ParseIntError| Error::Shortlog {
                    line: line.to_string(),
                    message: e.to_string(),
                })?;
        let mut name = captures[2].to_string();
        let mut mail = match &captures[3] {
            NO_MAIL_SENTINEL => None,
            raw => Some(raw.to_string()),
        };
        let mut team = DEFAULT_TEAM.to_string();
        if let Some(record) = mail.as_deref().and_then(|m| resolver.resolve(m)) {
            log::debug!("Found an alias: {:?} -> {}", mail, record.name);
            mail = record.authoritative_mail.clone();
            name = record.name.clone();
            team = record.team.clone();
        }
        Ok(Contributor {
            name,
            mail: mail.map(|m| format!("<{m}>")),
            commit_count,
            team,
        })
    }
}

/// Fold the captured commit-log output into a roster.
///
/// Empty lines are skipped; any malformed line is fatal.
pub fn roster_from_shortlog(resolver: &AliasResolver, shortlog_output: &str) -> Result<Roster> {
    let parser = ShortlogParser::new()?;
    let mut roster = Roster::default();
    for line in shortlog_output.lines() {
        if line.trim().is_empty() {
            continue;
        }
        log::debug!("Handling {line:?}");
        let contributor = parser.parse_contributor(line, resolver)?;
        roster.merge(contributor)?;
    }
    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliases::AliasRecord;

    fn contributor(name: &str, mail: Option<&str>, count: u64, team: &str) -> Contributor {
        Contributor {
            name: name.to_string(),
            mail: mail.map(|m| m.to_string()),
            commit_count: count,
            team: team.to_string(),
        }
    }

    fn no_aliases() -> AliasResolver {
        AliasResolver::default()
    }

    #[test]
    fn test_parse_simple_line() {
        let parser = ShortlogParser::new().unwrap();
        let person = parser
            .parse_contributor("   120\tAlice <a@x.com>", &no_aliases())
            .unwrap();
        assert_eq!(person.name, "Alice");
        assert_eq!(person.mail.as_deref(), Some("<a@x.com>"));
        assert_eq!(person.commit_count, 120);
        assert_eq!(person.team, DEFAULT_TEAM);
    }

    #[test]
    fn test_parse_multi_word_name() {
        let parser = ShortlogParser::new().unwrap();
        let person = parser
            .parse_contributor("7\tJane van der Doe <j@x.com>", &no_aliases())
            .unwrap();
        assert_eq!(person.name, "Jane van der Doe");
    }

    #[test]
    fn test_parse_none_mail_sentinel_anonymizes() {
        let parser = ShortlogParser::new().unwrap();
        let person = parser
            .parse_contributor("7\tJane Doe <none@none>", &no_aliases())
            .unwrap();
        assert_eq!(person.name, "Jane Doe");
        assert_eq!(person.mail, None);
        assert_eq!(person.commit_count, 7);
        assert_eq!(person.team, DEFAULT_TEAM);
    }

    #[test]
    fn test_parse_malformed_line() {
        let parser = ShortlogParser::new().unwrap();
        let error = parser
            .parse_contributor("not a shortlog line", &no_aliases())
            .unwrap_err();
        assert!(format!("{}", error).contains("Malformed commit-log line"));
    }

    #[test]
    fn test_alias_overrides_name_mail_and_team() {
        let resolver = AliasResolver::new(vec![AliasRecord {
            mails: vec!["old@x.com".to_string()],
            authoritative_mail: Some("new@x.com".to_string()),
            name: "Jane Doe".to_string(),
            team: "maintainers".to_string(),
        }]);
        let parser = ShortlogParser::new().unwrap();
        let person = parser
            .parse_contributor("3\tjdoe <old@x.com>", &resolver)
            .unwrap();
        assert_eq!(person.name, "Jane Doe");
        assert_eq!(person.mail.as_deref(), Some("<new@x.com>"));
        assert_eq!(person.team, "maintainers");
    }

    #[test]
    fn test_alias_without_authoritative_mail_anonymizes() {
        let resolver = AliasResolver::new(vec![AliasRecord {
            mails: vec!["old@x.com".to_string()],
            authoritative_mail: None,
            name: "Jane Doe".to_string(),
            team: DEFAULT_TEAM.to_string(),
        }]);
        let parser = ShortlogParser::new().unwrap();
        let person = parser
            .parse_contributor("3\tjdoe <old@x.com>", &resolver)
            .unwrap();
        assert_eq!(person.mail, None);
    }

    #[test]
    fn test_roster_merges_same_name() {
        let resolver = AliasResolver::new(vec![AliasRecord {
            mails: vec!["a@x.com".to_string(), "b@x.com".to_string()],
            authoritative_mail: Some("a@x.com".to_string()),
            name: "Jane".to_string(),
            team: DEFAULT_TEAM.to_string(),
        }]);
        let roster =
            roster_from_shortlog(&resolver, "5\tJane <a@x.com>\n3\tJ. Doe <b@x.com>\n").unwrap();
        assert_eq!(roster.members().len(), 1);
        assert_eq!(roster.members()[0].commit_count, 8);
        assert_eq!(roster.members()[0].mail.as_deref(), Some("<a@x.com>"));
    }

    #[test]
    fn test_merge_conflicting_mails_is_fatal() {
        let left = contributor("Jane", Some("<a@x.com>"), 5, DEFAULT_TEAM);
        let right = contributor("Jane", Some("<b@x.com>"), 3, DEFAULT_TEAM);
        let error = merge_contributor(&left, &right).unwrap_err();
        let display = format!("{}", error);
        assert!(display.contains("Mails are not the same"));
        assert!(display.contains("\"mails\": [\"a@x.com\", \"b@x.com\"]"));
        assert!(display.contains("\"name\": \"Jane\""));
    }

    #[test]
    fn test_merge_suggestion_names_non_default_team() {
        let left = contributor("Jane", Some("<a@x.com>"), 5, "maintainers");
        let right = contributor("Jane", Some("<b@x.com>"), 3, "maintainers");
        let error = merge_contributor(&left, &right).unwrap_err();
        assert!(format!("{}", error).contains("\"team\": \"maintainers\""));
    }

    #[test]
    fn test_merge_anonymized_side_is_tolerated() {
        let left = contributor("Jane", None, 5, DEFAULT_TEAM);
        let right = contributor("Jane", Some("<a@x.com>"), 3, DEFAULT_TEAM);
        let merged = merge_contributor(&left, &right).unwrap();
        assert_eq!(merged.commit_count, 8);
        assert_eq!(merged.mail.as_deref(), Some("<a@x.com>"));
    }

    #[test]
    fn test_merge_team_mismatch_is_fatal() {
        let left = contributor("Jane", Some("<a@x.com>"), 5, "core");
        let right = contributor("Jane", Some("<a@x.com>"), 3, "docs");
        let error = merge_contributor(&left, &right).unwrap_err();
        assert!(format!("{}", error).contains("Teams are not the same"));
    }

    #[test]
    fn test_sorted_members_descending_stable() {
        let mut roster = Roster::default();
        roster
            .merge(contributor("Bob", Some("<b@x.com>"), 3, DEFAULT_TEAM))
            .unwrap();
        roster
            .merge(contributor("Alice", Some("<a@x.com>"), 5, DEFAULT_TEAM))
            .unwrap();
        roster
            .merge(contributor("Carol", Some("<c@x.com>"), 3, DEFAULT_TEAM))
            .unwrap();
        let names: Vec<&str> = roster
            .sorted_members()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        // Bob before Carol: equal counts keep first-encountered order.
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn test_teams_of_excludes_default_by_default() {
        let mut roster = Roster::default();
        roster
            .merge(contributor("Alice", Some("<a@x.com>"), 5, "core"))
            .unwrap();
        roster
            .merge(contributor("Jane", Some("<j@x.com>"), 9, DEFAULT_TEAM))
            .unwrap();
        let teams = teams_of(&roster, false);
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].name, "core");
    }

    #[test]
    fn test_teams_of_include_default_puts_it_last() {
        let mut roster = Roster::default();
        roster
            .merge(contributor("Jane", Some("<j@x.com>"), 9, DEFAULT_TEAM))
            .unwrap();
        roster
            .merge(contributor("Alice", Some("<a@x.com>"), 5, "core"))
            .unwrap();
        let teams = teams_of(&roster, true);
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].name, "core");
        assert!(teams[1].is_default());
    }

    #[test]
    fn test_team_members_sorted_by_commit_count() {
        let mut roster = Roster::default();
        roster
            .merge(contributor("Bob", Some("<b@x.com>"), 3, "core"))
            .unwrap();
        roster
            .merge(contributor("Alice", Some("<a@x.com>"), 5, "core"))
            .unwrap();
        let teams = teams_of(&roster, false);
        let names: Vec<&str> = teams[0].members.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
    }
}
