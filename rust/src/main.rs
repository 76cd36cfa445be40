use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use futures::executor::block_on;
use serde_json::json;
use tracing::level_filters::LevelFilter;

use guid::{
    GenerateMode, Guid, InsertOutcome, NAME_PLACEHOLDER, PickCandidate, Selection, Settings,
    Style, TextBuffer, candidates, has_tokens, insert,
};

#[derive(Debug, Parser)]
#[command(
    name = "insert-guid",
    version,
    about = "Generate GUIDs and insert them into text files"
)]
struct Cli {
    /// Log debug events to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render an identifier in one or more styles.
    Format(FormatArgs),
    /// List the numbered candidates offered for insertion.
    List(ListArgs),
    /// Insert one identifier at every position.
    Insert(InsertArgs),
    /// Insert a unique identifier at every position.
    InsertMany(InsertArgs),
    /// Insert the empty identifier at every position.
    InsertEmpty(InsertArgs),
    /// Fill the `formats` setting from the show* flags.
    SeedSettings {
        /// Settings file (created if missing).
        path: PathBuf,
    },
}

#[derive(Debug, Args)]
struct FormatArgs {
    /// Hex-bearing input to parse; a random identifier when omitted.
    input: Option<String>,
    /// Style key (braced, b, no-hyphen, n, struct, x, x0..x10; uppercase for
    /// uppercase output). Repeatable.
    #[arg(short, long = "style")]
    styles: Vec<String>,
    /// Template with {x0}..{x10}, {nl}, {d}, {b}, {n}, {x} tokens.
    #[arg(short, long)]
    template: Option<String>,
    /// Render the empty identifier.
    #[arg(long, conflicts_with = "input")]
    empty: bool,
    /// Number of random identifiers to render.
    #[arg(short = 'n', long, default_value_t = 1, conflicts_with_all = ["input", "empty"])]
    count: usize,
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Hex-bearing input to parse; a random identifier when omitted.
    input: Option<String>,
    #[arg(long)]
    settings: Option<PathBuf>,
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct InsertArgs {
    /// File to edit.
    file: PathBuf,
    /// Byte offset (caret) or START..END (selection). Repeatable.
    #[arg(long = "at", required = true)]
    at: Vec<Selection>,
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Choose candidate LABEL instead of prompting.
    #[arg(long, value_name = "LABEL")]
    pick: Option<usize>,
    /// Insert this template without prompting.
    #[arg(long, value_name = "TEMPLATE")]
    paste: Option<String>,
    /// Print the edited text instead of writing the file.
    #[arg(long)]
    stdout: bool,
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display())),
        None => Ok(Settings::default()),
    }
}

fn input_guid(input: Option<&str>) -> Guid {
    input.map_or_else(Guid::generate, Guid::parse)
}

fn render_one(guid: &Guid, args: &FormatArgs) -> Vec<String> {
    let mut out: Vec<String> = if args.styles.is_empty() && args.template.is_none() {
        vec![guid.to_string()]
    } else {
        args.styles.iter().map(|s| guid.format(s)).collect()
    };
    if let Some(template) = &args.template {
        out.push(guid.substitute(template));
    }
    out
}

fn run_format(args: &FormatArgs) -> Result<()> {
    for style in &args.styles {
        if Style::parse(style).is_none() {
            tracing::warn!(style = %style, "unknown style, rendering canonical form");
        }
    }
    if let Some(template) = args.template.as_deref().filter(|t| !has_tokens(t)) {
        tracing::warn!(template, "template has no recognized tokens, copying it as is");
    }

    let guids: Vec<Guid> = if args.empty {
        vec![Guid::EMPTY]
    } else if let Some(input) = &args.input {
        vec![Guid::parse(input)]
    } else {
        (0..args.count).map(|_| Guid::generate()).collect()
    };

    for g in &guids {
        let rendered = render_one(g, args);
        if args.json {
            let payload = json!({
                "guid": g.to_string(),
                "bytes": g.as_bytes().to_vec(),
                "renderings": rendered,
            });
            println!("{}", serde_json::to_string(&payload)?);
        } else {
            for line in rendered {
                println!("{line}");
            }
        }
    }
    Ok(())
}

fn run_list(args: &ListArgs) -> Result<()> {
    let settings = load_settings(args.settings.as_deref())?;
    let g = input_guid(args.input.as_deref());
    let items = candidates(&g, &settings.render_formats());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for item in &items {
            println!("{:>3}  {}", item.label, item.description);
        }
    }
    Ok(())
}

/// Print the candidates to `out` and read a label from `input`. An empty or
/// unrecognized answer dismisses the list.
fn prompt(
    items: &[PickCandidate],
    out: &mut impl Write,
    input: &mut impl BufRead,
) -> io::Result<Option<usize>> {
    for item in items {
        writeln!(out, "{:>3}  {}", item.label, item.description)?;
    }
    write!(out, "format [1-{}, empty to cancel]: ", items.len())?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim();
    Ok(items.iter().position(|item| item.label == answer))
}

/// Prompt on the terminal; an I/O failure cancels.
fn prompt_terminal(items: &[PickCandidate]) -> Option<usize> {
    prompt(items, &mut io::stderr().lock(), &mut io::stdin().lock()).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "prompt failed, cancelling");
        None
    })
}

fn run_insert(args: &InsertArgs, mode: GenerateMode) -> Result<()> {
    let mut settings = load_settings(args.settings.as_deref())?;
    if let Some(paste) = &args.paste {
        settings.paste_automatically = paste.clone();
    }

    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let mut buffer = TextBuffer::new(text).with_selections(args.at.clone());

    let outcome = match args.pick {
        Some(label) => {
            let mut by_label = move |items: &[PickCandidate]| {
                items.iter().position(|item| item.label == label.to_string())
            };
            block_on(insert(&mut buffer, &mut by_label, &settings, mode))?
        }
        None => {
            let mut terminal = |items: &[PickCandidate]| prompt_terminal(items);
            block_on(insert(&mut buffer, &mut terminal, &settings, mode))?
        }
    };

    match outcome {
        InsertOutcome::Cancelled => {
            tracing::info!("cancelled, {} left unchanged", args.file.display());
            return Ok(());
        }
        InsertOutcome::Applied { insertions, named } => {
            if named {
                eprintln!("note: rename {NAME_PLACEHOLDER} in the inserted snippet");
            }
            tracing::info!(insertions, "applied");
        }
    }

    if args.stdout {
        print!("{}", buffer.text());
        io::stdout().flush()?;
    } else {
        fs::write(&args.file, buffer.into_text())
            .with_context(|| format!("failed to write {}", args.file.display()))?;
    }
    Ok(())
}

fn run_seed_settings(path: &Path) -> Result<()> {
    let mut settings = Settings::load(path)
        .with_context(|| format!("failed to load settings from {}", path.display()))?;
    if !settings.seed_formats() {
        println!("formats already configured");
        return Ok(());
    }
    settings.save(path)?;
    let count = settings.formats.as_ref().map_or(0, Vec::len);
    println!("seeded {count} formats into {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if cli.verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::WARN
        })
        .init();

    match &cli.command {
        Command::Format(args) => run_format(args),
        Command::List(args) => run_list(args),
        Command::Insert(args) => run_insert(args, GenerateMode::Single),
        Command::InsertMany(args) => run_insert(args, GenerateMode::Multiple),
        Command::InsertEmpty(args) => run_insert(args, GenerateMode::Empty),
        Command::SeedSettings { path } => run_seed_settings(path),
    }
}
