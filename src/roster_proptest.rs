//! Property-based tests for roster aggregation and document update.
//!
//! These tests use proptest to generate random inputs and verify that the
//! crate's central invariants hold for all possible inputs: aggregation is
//! order-independent, and the updater is a fixed point on its own output.

#[cfg(test)]
mod proptest_tests {
    use std::collections::BTreeMap;

    use proptest::prelude::*;

    use crate::aliases::AliasResolver;
    use crate::render::{create_content, ShowPolicy};
    use crate::roster::{roster_from_shortlog, Contributor, Roster};
    use crate::update::update_content;

    /// Distinct contributors: two-token name, commit count, team.
    fn contributors() -> impl Strategy<Value = Vec<(String, u64, &'static str)>> {
        let name = "[A-Z][a-z]{2,8} [A-Z][a-z]{2,8}";
        let team = prop::sample::select(vec!["core", "docs", "contributors"]);
        proptest::collection::btree_map(name, (1u64..=500, team), 1..8).prop_map(|entries| {
            entries
                .into_iter()
                .map(|(name, (count, team))| (name, count, team))
                .collect()
        })
    }

    /// Derive a mail from the name; distinct names give distinct mails.
    fn mail_of(name: &str) -> String {
        format!("{}@x.com", name.to_lowercase().replace(' ', "."))
    }

    fn shortlog_line(name: &str, count: u64) -> String {
        format!("{:6}\t{} <{}>\n", count, name, mail_of(name))
    }

    fn counts_by_name(roster: &Roster) -> BTreeMap<String, u64> {
        roster
            .members()
            .iter()
            .map(|person| (person.name.clone(), person.commit_count))
            .collect()
    }

    fn roster_of(entries: &[(String, u64, &'static str)]) -> Roster {
        let mut roster = Roster::default();
        for (name, count, team) in entries {
            roster
                .merge(Contributor {
                    name: name.clone(),
                    mail: Some(format!("<{}>", mail_of(name))),
                    commit_count: *count,
                    team: team.to_string(),
                })
                .unwrap();
        }
        roster
    }

    proptest! {
        /// Property: aggregating the same commit-log lines in any order
        /// yields the same roster (same names, mails, counts).
        #[test]
        fn aggregation_is_order_independent(entries in contributors()) {
            let resolver = AliasResolver::default();
            let forward: String = entries
                .iter()
                .map(|(name, count, _)| shortlog_line(name, *count))
                .collect();
            let backward: String = entries
                .iter()
                .rev()
                .map(|(name, count, _)| shortlog_line(name, *count))
                .collect();
            let left = roster_from_shortlog(&resolver, &forward).unwrap();
            let right = roster_from_shortlog(&resolver, &backward).unwrap();
            prop_assert_eq!(counts_by_name(&left), counts_by_name(&right));
        }

        /// Property: duplicated author identities merge by summing commit
        /// counts, independently of how the counts are split.
        #[test]
        fn merge_sums_commit_counts(
            name in "[A-Z][a-z]{2,8} [A-Z][a-z]{2,8}",
            first in 1u64..=500,
            second in 1u64..=500,
        ) {
            let resolver = AliasResolver::default();
            let text = format!(
                "{}{}",
                shortlog_line(&name, first),
                shortlog_line(&name, second)
            );
            let roster = roster_from_shortlog(&resolver, &text).unwrap();
            prop_assert_eq!(roster.members().len(), 1);
            prop_assert_eq!(roster.members()[0].commit_count, first + second);
        }

        /// Property: updating the updater's own output with an unchanged
        /// roster is byte-identical (fixed point).
        #[test]
        fn update_is_idempotent(entries in contributors()) {
            let roster = roster_of(&entries);
            let policy = ShowPolicy::default();
            let once = update_content("", &roster, &policy, "aliases.json").unwrap();
            let twice = update_content(&once, &roster, &policy, "aliases.json").unwrap();
            prop_assert_eq!(once, twice);
        }

        /// Property: updating an empty document yields the same contributor
        /// content as rendering fresh, modulo header wording.
        #[test]
        fn update_of_empty_matches_fresh_render(entries in contributors()) {
            let roster = roster_of(&entries);
            let policy = ShowPolicy::default();
            let updated = update_content("", &roster, &policy, "aliases.json").unwrap();
            let fresh = create_content(&roster, &policy, "aliases.json");
            let updated_body = updated.split_once("\n\n").unwrap().1;
            let fresh_body = fresh.split_once("\n\n").unwrap().1;
            prop_assert_eq!(updated_body, fresh_body);
        }
    }
}
