//! CLI argument parsing and command dispatch

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use contributors_txt::aliases::AliasResolver;
use contributors_txt::defaults::DEFAULT_OUTPUT;
use contributors_txt::render::{create_content, ShowPolicy};
use contributors_txt::roster::roster_from_shortlog;
use contributors_txt::shortlog::shortlog_output;
use contributors_txt::update::update_content;

/// Create a file listing the contributors of a git repository
#[derive(Parser, Debug)]
#[command(name = "contributors-txt")]
#[command(version, long_about = None)]
pub struct Cli {
    /// The path to the aliases file
    #[arg(short, long, value_name = "PATH", env = "CONTRIBUTORS_TXT_ALIASES")]
    aliases: Option<PathBuf>,

    /// Where to output the contributor list
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Display logging messages
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(self.verbose);

        let resolver = AliasResolver::from_file(self.aliases.as_deref())?;
        let configuration_file = self
            .aliases
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "none".to_string());

        let shortlog = shortlog_output(Path::new("."))?;
        let roster = roster_from_shortlog(&resolver, &shortlog)?;
        let policy = ShowPolicy::default();

        // The full new text is computed and validated before the output
        // file is touched; a failing update leaves the prior file intact.
        let content = if self.output.exists() {
            log::debug!("Updating existing {}", self.output.display());
            let existing = fs::read_to_string(&self.output)
                .with_context(|| format!("Failed to read {}", self.output.display()))?;
            update_content(&existing, &roster, &policy, &configuration_file)?
        } else {
            log::debug!("Creating {}", self.output.display());
            create_content(&roster, &policy, &configuration_file)
        };

        write_atomic(&self.output, &content)
            .with_context(|| format!("Failed to write {}", self.output.display()))
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Write the content to a temporary file in the target directory and
/// rename it into place, so a crash mid-write cannot truncate the
/// previous document.
fn write_atomic(output: &Path, content: &str) -> Result<()> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(content.as_bytes())?;
    temp.persist(output)?;
    Ok(())
}
