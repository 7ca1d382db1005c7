//! # Alias Configuration and Resolution
//!
//! This module defines the data structures that represent the alias
//! configuration file, as well as the logic for parsing it. An alias maps
//! one or more raw commit-author mails to a canonical identity and team.
//!
//! ## Parsing
//!
//! The `load_aliases` function is the main entry point for parsing a JSON
//! alias file. It is designed to be backward compatible and supports two
//! shapes:
//!
//! 1.  **Normalized shape**: a JSON object mapping a canonical identity
//!     string to `{mails, name?, authoritative_mail?, team?}`. When the
//!     payload carries a `name`, the key is the authoritative mail; when
//!     it carries an `authoritative_mail`, the key is the name. This is
//!     the recommended shape.
//!
//! 2.  **Legacy shape**: a flat JSON list of
//!     `{mails, name, authoritative_mail?, team?}` objects. Accepted for
//!     backward compatibility; using it emits a deprecation warning.
//!
//! Both shapes validate into the single canonical [`AliasRecord`] type, so
//! resolution semantics never depend on the input shape.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::defaults::DEFAULT_TEAM;
use crate::error::{Error, Result};

/// A validated alias rule: a set of variant mails resolving to one
/// canonical identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasRecord {
    /// The variant mails claimed by this record. Never empty.
    pub mails: Vec<String>,
    /// The mail rendered in the document, or `None` to anonymize the
    /// contributor.
    pub authoritative_mail: Option<String>,
    /// Canonical contributor name.
    pub name: String,
    /// Team the contributor belongs to.
    pub team: String,
}

/// The alias file content before validation, tagged by input shape.
#[derive(Debug)]
pub enum AliasInput {
    /// Canonical-identity-keyed mapping (normalized shape).
    Normalized(serde_json::Map<String, Value>),
    /// Flat record list (legacy shape).
    Legacy(Vec<Value>),
}

/// Raw payload of one alias entry, shared by both input shapes.
#[derive(Debug, Deserialize)]
struct RawAlias {
    #[serde(default)]
    mails: Vec<String>,
    name: Option<String>,
    authoritative_mail: Option<String>,
    team: Option<String>,
}

/// Load and validate the alias configuration file.
///
/// `None` means no alias file was configured and yields an empty list.
///
/// # Errors
///
/// Returns `Error::AliasParse` if the file is not valid JSON, is neither
/// an object nor a list at the top level, or contains a record missing
/// required fields. Returns `Error::Io` if the file cannot be read.
pub fn load_aliases(aliases_file: Option<&Path>) -> Result<Vec<AliasRecord>> {
    let Some(path) = aliases_file else {
        return Ok(Vec::new());
    };
    let content = fs::read_to_string(path)?;
    let input = parse_input(&content)?;
    let records = match input {
        AliasInput::Normalized(map) => from_normalized(map)?,
        AliasInput::Legacy(list) => {
            log::warn!(
                "Using old copyrite format, you should use the configuration \
                 normalization with 'contributors-txt-normalize-configuration'"
            );
            from_legacy(list)?
        }
    };
    check_mail_overlap(&records)?;
    Ok(records)
}

/// Sniff the top-level JSON shape into a tagged [`AliasInput`].
fn parse_input(content: &str) -> Result<AliasInput> {
    match serde_json::from_str::<Value>(content)? {
        Value::Object(map) => Ok(AliasInput::Normalized(map)),
        Value::Array(list) => Ok(AliasInput::Legacy(list)),
        other => Err(Error::AliasParse {
            message: format!(
                "expected an object or a list at the top level, found {}",
                json_kind(&other)
            ),
            hint: None,
        }),
    }
}

/// Validate the normalized shape into canonical records.
///
/// The mapping key fills in whichever of `name` and `authoritative_mail`
/// the payload omits.
fn from_normalized(map: serde_json::Map<String, Value>) -> Result<Vec<AliasRecord>> {
    let mut records = Vec::with_capacity(map.len());
    for (key, value) in map {
        let raw = raw_alias(&key, value)?;
        let (name, authoritative_mail) = match (raw.name, raw.authoritative_mail) {
            (Some(name), mail) => (name, mail.or_else(|| Some(key.clone()))),
            (None, Some(mail)) => (key.clone(), Some(mail)),
            (None, None) => {
                return Err(Error::AliasParse {
                    message: format!(
                        "record for '{key}' has neither 'name' nor 'authoritative_mail'"
                    ),
                    hint: Some(
                        "the mapping key stands in for exactly one of the two, \
                         the other must be in the record"
                            .to_string(),
                    ),
                });
            }
        };
        records.push(validated(raw.mails, authoritative_mail, name, raw.team)?);
    }
    Ok(records)
}

/// Validate the legacy shape into canonical records.
fn from_legacy(list: Vec<Value>) -> Result<Vec<AliasRecord>> {
    let mut records = Vec::with_capacity(list.len());
    for (index, value) in list.into_iter().enumerate() {
        let raw = raw_alias(&format!("#{index}"), value)?;
        let Some(name) = raw.name else {
            return Err(Error::AliasParse {
                message: format!("record #{index} is missing the required field 'name'"),
                hint: None,
            });
        };
        records.push(validated(raw.mails, raw.authoritative_mail, name, raw.team)?);
    }
    Ok(records)
}

fn raw_alias(context: &str, value: Value) -> Result<RawAlias> {
    serde_json::from_value(value).map_err(|e| Error::AliasParse {
        message: format!("record for '{context}': {e}"),
        hint: None,
    })
}

fn validated(
    mails: Vec<String>,
    authoritative_mail: Option<String>,
    name: String,
    team: Option<String>,
) -> Result<AliasRecord> {
    if mails.is_empty() {
        return Err(Error::AliasParse {
            message: format!("record for '{name}' has an empty 'mails' list"),
            hint: Some("every alias needs at least one variant mail to match on".to_string()),
        });
    }
    Ok(AliasRecord {
        mails,
        authoritative_mail,
        name,
        team: team.unwrap_or_else(|| DEFAULT_TEAM.to_string()),
    })
}

/// Reject configurations where two records claim the same mail.
///
/// Resolution is first-match-wins, so an overlap would make the outcome
/// depend on record order.
fn check_mail_overlap(records: &[AliasRecord]) -> Result<()> {
    for (i, record) in records.iter().enumerate() {
        for other in &records[i + 1..] {
            if let Some(mail) = record.mails.iter().find(|m| other.mails.contains(*m)) {
                return Err(Error::AliasParse {
                    message: format!(
                        "mail '{}' is claimed by both '{}' and '{}'",
                        mail, record.name, other.name
                    ),
                    hint: Some("remove the mail from one of the two records".to_string()),
                });
            }
        }
    }
    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Resolves raw commit-author mails against the configured alias records.
#[derive(Debug, Default)]
pub struct AliasResolver {
    records: Vec<AliasRecord>,
}

impl AliasResolver {
    pub fn new(records: Vec<AliasRecord>) -> Self {
        Self { records }
    }

    /// Load the resolver straight from an optional alias file path.
    pub fn from_file(aliases_file: Option<&Path>) -> Result<Self> {
        Ok(Self::new(load_aliases(aliases_file)?))
    }

    /// Return the first record whose mail set contains `mail`.
    ///
    /// `None` means the author's own mail, name, and the default team are
    /// used unchanged.
    pub fn resolve(&self, mail: &str) -> Option<&AliasRecord> {
        self.records
            .iter()
            .find(|record| record.mails.iter().any(|m| m == mail))
    }
}
