//! # tablestyle
//!
//! Render styled HTML tables from JSON table definitions.
//!
//! ## Overview
//!
//! tablestyle is built on top of tablestylelib. Each definition file lists a
//! table's columns and the styling operations to replay against it; the CLI
//! builds a `Styler` per file and writes one HTML page with every table, or
//! prints a single table for inspection.
//!
//! ## Usage
//!
//! ```bash
//! # Render every definition into tables.html
//! tablestyle render demos/*.json
//!
//! # Choose the output file and page title
//! tablestyle render demos/t_000.json --out /tmp/page.html --title "Demo"
//!
//! # Print one table's HTML fragment
//! tablestyle show demos/t_001.json
//!
//! # Print the rendered cells as JSON
//! tablestyle show demos/t_001.json --output json
//! ```

mod document;
mod recipe;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use console::Style;
use outstanding::cli::{App, CommandContext, HandlerResult, Output, RunResult};
use outstanding::Theme;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::document::{render_document, Section};
use crate::recipe::Recipe;

/// Include templates at compile time
const RENDER_TEMPLATE: &str = include_str!("../templates/render_summary.jinja");
const SHOW_TEMPLATE: &str = include_str!("../templates/show_table.jinja");

const DEFAULT_OUTPUT: &str = "tables.html";
const DEFAULT_TITLE: &str = "Styled tables";

/// One rendered definition in the `render` summary
#[derive(Debug, Serialize)]
struct TableSummary {
    name: String,
    definition: String,
    rows: usize,
    columns: usize,
}

/// Data context for the render summary template
#[derive(Debug, Serialize)]
struct RenderSummary {
    output: String,
    tables: Vec<TableSummary>,
}

/// Data context for the show template
#[derive(Debug, Serialize)]
struct ShowContext {
    name: String,
    rows: usize,
    columns: usize,
    html: String,
}

fn build_command() -> Command {
    Command::new("tablestyle")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Arthur Debert")
        .about("Render styled HTML tables from JSON table definitions")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Log progress to stderr (repeat for more detail)"),
        )
        .subcommand(
            Command::new("render")
                .about("Render definitions into a single HTML page")
                .arg(
                    Arg::new("definitions")
                        .required(true)
                        .num_args(1..)
                        .help("JSON table definition files"),
                )
                .arg(
                    Arg::new("out")
                        .short('o')
                        .long("out")
                        .default_value(DEFAULT_OUTPUT)
                        .help("HTML file to write"),
                )
                .arg(
                    Arg::new("title")
                        .long("title")
                        .default_value(DEFAULT_TITLE)
                        .help("Page title"),
                ),
        )
        .subcommand(
            Command::new("show")
                .about("Print the HTML fragment for one definition")
                .arg(
                    Arg::new("definition")
                        .required(true)
                        .help("JSON table definition file"),
                ),
        )
}

/// Read `-v` occurrences before the app takes over argument handling.
fn verbosity() -> u8 {
    build_command()
        .ignore_errors(true)
        .try_get_matches_from(std::env::args())
        .map(|matches| matches.get_count("verbose"))
        .unwrap_or(0)
}

fn init_logging(verbosity: u8) {
    let default_filter = match verbosity {
        0 => "warn",
        1 => "tablestyle=debug,tablestylelib=debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

fn display_name(recipe: &Recipe, path: &Path) -> String {
    recipe.title.clone().unwrap_or_else(|| {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    })
}

fn render_handler(matches: &ArgMatches, _ctx: &CommandContext) -> HandlerResult<serde_json::Value> {
    let definitions: Vec<PathBuf> = matches
        .get_many::<String>("definitions")
        .map(|values| values.map(PathBuf::from).collect())
        .unwrap_or_default();
    let out = matches
        .get_one::<String>("out")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    let title = matches
        .get_one::<String>("title")
        .map(|s| s.as_str())
        .unwrap_or(DEFAULT_TITLE);

    let mut sections = Vec::with_capacity(definitions.len());
    let mut tables = Vec::with_capacity(definitions.len());

    for path in &definitions {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let recipe = Recipe::parse(&source)
            .with_context(|| format!("invalid definition {}", path.display()))?;
        let table = recipe
            .styler()
            .and_then(|styler| Ok(styler.to_table()?))
            .with_context(|| format!("failed to render {}", path.display()))?;

        let name = display_name(&recipe, path);
        debug!(definition = %path.display(), rows = table.rows.len(), "rendered table");

        tables.push(TableSummary {
            name: name.clone(),
            definition: path.display().to_string(),
            rows: table.rows.len(),
            columns: table.labels.len(),
        });
        sections.push(Section {
            title: name,
            source,
            table: table.to_html(),
        });
    }

    fs::write(&out, render_document(title, &sections))
        .with_context(|| format!("failed to write {}", out.display()))?;
    info!(output = %out.display(), tables = tables.len(), "wrote document");

    let summary = RenderSummary {
        output: out.display().to_string(),
        tables,
    };
    Ok(Output::Render(serde_json::to_value(&summary)?))
}

fn show_handler(matches: &ArgMatches, ctx: &CommandContext) -> HandlerResult<serde_json::Value> {
    let path = matches
        .get_one::<String>("definition")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow::anyhow!("a definition file is required"))?;

    let recipe = Recipe::load(&path)?;
    let table = recipe
        .styler()
        .and_then(|styler| Ok(styler.to_table()?))
        .with_context(|| format!("failed to render {}", path.display()))?;

    // Structured output exposes the rendered cells themselves
    if ctx.output_mode.is_structured() {
        return Ok(Output::Render(serde_json::to_value(&table)?));
    }

    let context = ShowContext {
        name: display_name(&recipe, &path),
        rows: table.rows.len(),
        columns: table.labels.len(),
        html: table.to_html(),
    };
    Ok(Output::Render(serde_json::to_value(&context)?))
}

/// Usage text for a bare invocation.
fn print_usage(out: &mut impl Write) -> io::Result<()> {
    build_command().write_help(out)?;
    writeln!(out)
}

fn create_theme() -> Theme {
    Theme::new()
        .add("title", Style::new().bold())
        .add("name", Style::new().cyan())
        .add("muted", Style::new().dim())
        .add("ok", Style::new().green())
}

fn main() -> ExitCode {
    init_logging(verbosity());

    let cmd = build_command();
    let theme = create_theme();

    let result = App::builder()
        .theme(theme)
        .command("render", render_handler, RENDER_TEMPLATE)
        .command("show", show_handler, SHOW_TEMPLATE)
        .run_to_string(cmd, std::env::args());

    match result {
        RunResult::Handled(output) => {
            if !output.is_empty() {
                // Handler errors come back as rendered text
                if output.starts_with("Error:") {
                    eprintln!("{}", output);
                    return ExitCode::FAILURE;
                }
                print!("{}", output);
            }
            ExitCode::SUCCESS
        }
        RunResult::Binary(_, _) => ExitCode::SUCCESS,
        RunResult::NoMatch(_) => {
            // No subcommand given
            if let Err(e) = print_usage(&mut io::stdout().lock()) {
                eprintln!("Error: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}
