use std::io::Write;

use anyhow::Context;
use colored::Colorize;
use serde::Serialize;
use tracing::debug;

use cmis_repository::{DocumentRepository, RepositoryConfig};
use cmis_store::{DocumentStore, InMemoryDocumentStore};

use crate::cli::*;
use crate::render;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let fixture = cli
        .fixture
        .as_deref()
        .context("--fixture <json> is required")?;
    let config = match cli.config.as_deref() {
        Some(path) => RepositoryConfig::load(path)?,
        None => RepositoryConfig::default(),
    };
    let store = InMemoryDocumentStore::load_fixture(fixture)
        .with_context(|| format!("loading fixture {}", fixture.display()))?;
    debug!(repository = %config.repository_id, "repository ready");
    let repo = DocumentRepository::new(store, config);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(&repo, cli.command, cli.format, &mut out)?;
    out.flush()?;
    Ok(())
}

pub fn execute<S: DocumentStore>(
    repo: &DocumentRepository<S>,
    command: Command,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Command::Info => cmd_info(repo, format, out),
        Command::Types(args) => cmd_types(repo, args, format, out),
        Command::Type(args) => cmd_type(repo, args, format, out),
        Command::Children(args) => cmd_children(repo, args, format, out),
        Command::Object(args) => {
            let object = repo.object(&args.id, args.filter.as_deref())?;
            emit(out, format, &object, |out| render::object(out, &object))
        }
        Command::Path(args) => {
            let object = repo.object_by_path(&args.path, args.filter.as_deref())?;
            emit(out, format, &object, |out| render::object(out, &object))
        }
        Command::Tree(args) => cmd_tree(repo, args, format, out),
        Command::Content(args) => cmd_content(repo, args, format, out),
    }
}

/// Write `value` as pretty JSON, or run the text renderer.
fn emit<W: Write, T: Serialize>(
    out: &mut W,
    format: OutputFormat,
    value: &T,
    text: impl FnOnce(&mut W) -> std::io::Result<()>,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
        }
        OutputFormat::Text => text(out)?,
    }
    Ok(())
}

fn cmd_info<S: DocumentStore>(
    repo: &DocumentRepository<S>,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let info = repo.repository_info();
    emit(out, format, info, |out| render::repository_info(out, info))
}

fn cmd_types<S: DocumentStore>(
    repo: &DocumentRepository<S>,
    args: TypesArgs,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let forest = repo.type_descendants(args.type_id.as_deref(), args.depth, false)?;
    emit(out, format, &forest, |out| render::type_tree(out, &forest))
}

fn cmd_type<S: DocumentStore>(
    repo: &DocumentRepository<S>,
    args: TypeArgs,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let def = repo.type_definition(&args.type_id)?;
    emit(out, format, &def, |out| render::type_definition(out, &def))
}

fn cmd_children<S: DocumentStore>(
    repo: &DocumentRepository<S>,
    args: ChildrenArgs,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let page = repo.children(
        &args.folder,
        args.filter.as_deref(),
        args.path_segments,
        args.max_items,
        args.skip_count,
    )?;
    emit(out, format, &page, |out| {
        for entry in &page.objects {
            let data = &entry.object;
            let segment = entry
                .path_segment
                .as_deref()
                .map(|s| format!(" ({s})"))
                .unwrap_or_default();
            writeln!(
                out,
                "{}  {}  {}{}",
                data.id().yellow(),
                data.info.type_id.cyan(),
                data.info.name,
                segment
            )?;
        }
        let more = if page.has_more_items { "more available".green() } else { "no more".dimmed() };
        writeln!(out, "{} of {} items, {}", page.objects.len(), page.num_items, more)
    })
}

fn cmd_tree<S: DocumentStore>(
    repo: &DocumentRepository<S>,
    args: TreeArgs,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let forest = repo.descendants(&args.folder, args.depth, args.filter.as_deref(), true)?;
    emit(out, format, &forest, |out| {
        if forest.is_empty() {
            writeln!(out, "{}", "(no subfolders)".dimmed())
        } else {
            render::object_tree(out, &forest)
        }
    })
}

#[derive(Serialize)]
struct ContentSummary<'a> {
    file_name: &'a str,
    length: u64,
    mime_type: &'a str,
    content: String,
}

fn cmd_content<S: DocumentStore>(
    repo: &DocumentRepository<S>,
    args: ContentArgs,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let content = repo.content_stream(&args.id, None, None)?;
    match format {
        OutputFormat::Text => {
            std::io::copy(&mut content.reader(), out)?;
        }
        OutputFormat::Json => {
            let summary = ContentSummary {
                file_name: &content.file_name,
                length: content.length,
                mime_type: &content.mime_type,
                content: String::from_utf8_lossy(&content.stream).into_owned(),
            };
            serde_json::to_writer_pretty(&mut *out, &summary)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
