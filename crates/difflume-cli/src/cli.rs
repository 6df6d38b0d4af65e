use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use difflume_diff::DiffType;
use difflume_source::SourceKind;

#[derive(Parser)]
#[command(
    name = "difflume",
    about = "DiffLume: diff documents from files, URLs, and CouchDB",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file with `[source]` and `[diff]` settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds, overriding the config file
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Diff two documents or two revisions
    Diff(DiffArgs),
    /// Print a document as it will be diffed
    Show(ShowArgs),
    /// List the revisions of a document, newest first
    Revisions(RevisionsArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    pub left: String,
    pub right: String,
    #[arg(long)]
    pub left_rev: Option<String>,
    #[arg(long)]
    pub right_rev: Option<String>,
    #[arg(long, default_value = "auto")]
    pub left_kind: SourceKind,
    #[arg(long, default_value = "auto")]
    pub right_kind: SourceKind,
    /// Diff variant: ndiff or ndiff_collapsed
    #[arg(long = "type", value_name = "TYPE")]
    pub diff_type: Option<DiffType>,
    #[arg(long)]
    pub preserve_rows: Option<usize>,
    #[arg(long)]
    pub delimiter: Option<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    pub source: String,
    #[arg(long)]
    pub rev: Option<String>,
    #[arg(long, default_value = "auto")]
    pub kind: SourceKind,
}

#[derive(Args)]
pub struct RevisionsArgs {
    pub source: String,
    #[arg(long, default_value = "auto")]
    pub kind: SourceKind,
}
