use anyhow::Context;
use colored::Colorize;
use difflume_diff::{DiffConfig, DiffResult};
use difflume_source::{
    Content, ContentSource, ReadResult, RevisionId, SourceConfig, SourceKind, SourceTarget,
};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

use crate::cli::*;
use crate::config::AppConfig;
use crate::render::{label, render_diff, summary};

pub async fn run_command(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    let config = config.with_timeout(cli.timeout);
    let format = cli.format;
    match cli.command {
        Command::Diff(args) => cmd_diff(args, &config, format).await,
        Command::Show(args) => cmd_show(args, &config.source, format).await,
        Command::Revisions(args) => cmd_revisions(args, &config.source, format).await,
    }
}

/// Everything the `diff` command prints.
pub struct DiffReport {
    pub left: String,
    pub right: String,
    pub diff: DiffConfig,
    pub result: DiffResult,
}

/// Load both sides concurrently and diff them.
pub async fn diff_targets(
    left: (&SourceTarget, Option<RevisionId>),
    right: (&SourceTarget, Option<RevisionId>),
    source_config: &SourceConfig,
    diff: DiffConfig,
) -> anyhow::Result<DiffReport> {
    let client = source_config.client().context("building HTTP client")?;
    let left_source = left.0.open(&client);
    let right_source = right.0.open(&client);

    let (left_content, right_content) = tokio::try_join!(
        fetch(&left_source, left.1.as_ref()),
        fetch(&right_source, right.1.as_ref()),
    )?;

    debug!(
        left = %left_source.location(),
        right = %right_source.location(),
        diff_type = %diff.diff_type,
        "diffing"
    );
    let result = diff
        .engine()
        .create_diff(left_content.text(), right_content.text());

    Ok(DiffReport {
        left: left_source.location(),
        right: right_source.location(),
        diff,
        result,
    })
}

/// Load `source` and return the content of `revision`, or the latest.
async fn fetch(
    source: &ContentSource,
    revision: Option<&RevisionId>,
) -> anyhow::Result<Arc<Content>> {
    source.load().await?;
    load_revision(source, revision).await?;
    Ok(source.get_content(revision)?)
}

async fn load_revision(source: &ContentSource, revision: Option<&RevisionId>) -> ReadResult<()> {
    match revision {
        Some(revision) => source.load_revision(revision).await,
        None => Ok(()),
    }
}

async fn cmd_diff(args: DiffArgs, config: &AppConfig, format: OutputFormat) -> anyhow::Result<()> {
    let left = SourceTarget::new(args.left_kind, args.left.clone());
    let right = SourceTarget::new(args.right_kind, args.right.clone());
    let diff = config.diff_for(&args);
    let left_rev = args.left_rev.map(RevisionId::from);
    let right_rev = args.right_rev.map(RevisionId::from);

    let report = diff_targets((&left, left_rev), (&right, right_rev), &config.source, diff).await?;

    match format {
        OutputFormat::Json => {
            let value = json!({
                "left": report.left,
                "right": report.right,
                "diff_type": report.diff.diff_type,
                "added": report.result.added_lines(),
                "removed": report.result.removed_lines(),
                "text": report.result.text,
                "highlights": report.result.highlights,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            println!("{} {}", "---".red().bold(), label(&report.left));
            println!("{} {}", "+++".green().bold(), label(&report.right));
            if !report.result.is_empty() {
                println!("{}", render_diff(&report.result, true)?);
            }
            println!("{}", summary(&report.result).dimmed());
        }
    }
    Ok(())
}

async fn cmd_show(args: ShowArgs, config: &SourceConfig, format: OutputFormat) -> anyhow::Result<()> {
    let client = config.client().context("building HTTP client")?;
    let source = SourceTarget::new(args.kind, args.source).open(&client);
    let revision = args.rev.map(RevisionId::from);
    let content = fetch(&source, revision.as_ref()).await?;

    match format {
        OutputFormat::Json => {
            let value = json!({
                "location": source.location(),
                "revision": revision,
                "text_type": content.text_type(),
                "text": content.text(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => println!("{}", content.text()),
    }
    Ok(())
}

async fn cmd_revisions(
    args: RevisionsArgs,
    config: &SourceConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let client = config.client().context("building HTTP client")?;
    let target = SourceTarget::new(args.kind, args.source);
    let source = target.open(&client);
    source.load().await?;
    let revisions = source.revisions();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&revisions)?),
        OutputFormat::Text if revisions.is_empty() => {
            let note = match target.resolved_kind() {
                SourceKind::CouchDb => "No revisions available.",
                _ => "This source has no revision history.",
            };
            println!("{}", note.dimmed());
        }
        OutputFormat::Text => {
            for (i, revision) in revisions.iter().enumerate() {
                if i == 0 {
                    println!("{} {}", revision.as_str().yellow().bold(), "(latest)".green());
                } else {
                    println!("{}", revision.as_str().yellow());
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use difflume_diff::DiffType;
    use pretty_assertions::assert_eq;

    fn write(dir: &tempfile::TempDir, name: &str, text: &str) -> SourceTarget {
        let path = dir.path().join(name);
        std::fs::write(&path, text).unwrap();
        SourceTarget::auto(path.display().to_string())
    }

    #[tokio::test]
    async fn diffs_canonicalized_json_files() {
        let dir = tempfile::tempdir().unwrap();
        let left = write(&dir, "left.json", r#"{"name": "John", "age": 30}"#);
        let right = write(&dir, "right.json", r#"{"age": 31, "name": "John"}"#);

        let report = diff_targets(
            (&left, None),
            (&right, None),
            &SourceConfig::default(),
            DiffConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(
            report.result.text,
            "  {\n-   \"age\": 30,\n?           ^\n+   \"age\": 31,\n?           ^\n    \"name\": \"John\"\n  }"
        );
        assert_eq!(report.left, left.location);
    }

    #[tokio::test]
    async fn key_order_alone_is_no_difference() {
        let dir = tempfile::tempdir().unwrap();
        let left = write(&dir, "left.json", r#"{"a": 1, "b": [1, 2]}"#);
        let right = write(&dir, "right.json", "{\"b\":[1,2],\n\"a\":1}");

        let diff = DiffConfig {
            diff_type: DiffType::NdiffCollapsed,
            ..DiffConfig::default()
        };
        let report = diff_targets((&left, None), (&right, None), &SourceConfig::default(), diff)
            .await
            .unwrap();
        assert!(report.result.is_empty());
    }

    #[tokio::test]
    async fn missing_side_fails_the_diff() {
        let dir = tempfile::tempdir().unwrap();
        let left = write(&dir, "left.txt", "a");
        let right = SourceTarget::auto(dir.path().join("absent.txt").display().to_string());

        let err = diff_targets(
            (&left, None),
            (&right, None),
            &SourceConfig::default(),
            DiffConfig::default(),
        )
        .await
        .err()
        .unwrap();
        assert!(err.to_string().starts_with("Could not read file"));
    }

    #[tokio::test]
    async fn revision_of_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let left = write(&dir, "left.txt", "a");
        let right = write(&dir, "right.txt", "b");

        let err = diff_targets(
            (&left, Some("1-a".into())),
            (&right, None),
            &SourceConfig::default(),
            DiffConfig::default(),
        )
        .await
        .err()
        .unwrap();
        assert_eq!(err.to_string(), "Could not find revision 1-a");
    }
}
