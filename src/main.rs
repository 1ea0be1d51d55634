//! Markwright - render and round-trip markdown documents.
//!
//! # Usage
//!
//! ```bash
//! markwright README.md                # print the rendered markup
//! markwright --check README.md        # verify the file survives editing
//! markwright --endpoint README.md < request.json
//! ```

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use markwright::app::App;
use markwright::config::{
    ConfigFlags, EditorOptions, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use markwright::document::render_document;
use markwright::editor::extract;
use markwright::gateway::{FileStore, handle_request};
use markwright::perf;
use markwright::surface::Surface;

/// Render and round-trip markdown documents
#[derive(Parser, Debug)]
#[command(name = "markwright", version, about, long_about = None)]
struct Cli {
    /// Markdown file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Check that FILE survives a render/extract round trip
    #[arg(long)]
    check: bool,

    /// Serve one JSON save request read from stdin
    #[arg(long, conflicts_with = "check")]
    endpoint: bool,

    /// Write saves to PATH instead of FILE
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Disable debounced auto-save
    #[arg(long)]
    no_auto_save: bool,

    /// Idle time before an auto-save
    #[arg(long, value_name = "MS")]
    debounce_ms: Option<u64>,

    /// Hold time that opens raw edit mode
    #[arg(long, value_name = "MS")]
    long_press_ms: Option<u64>,

    /// Largest document a save accepts
    #[arg(long, value_name = "BYTES")]
    max_bytes: Option<usize>,

    /// Enable performance logging
    #[arg(long)]
    perf: bool,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

/// First line where two texts differ, 1-based.
fn first_difference(left: &str, right: &str) -> usize {
    left.lines()
        .zip(right.lines())
        .position(|(a, b)| a != b)
        .unwrap_or_else(|| left.lines().count().min(right.lines().count()))
        + 1
}

fn round_trip(text: &str) -> String {
    extract(&Surface::from_blocks(&render_document(text)))
}

fn check(cli: &Cli, text: &str) -> Result<()> {
    let once = round_trip(text);
    let twice = round_trip(&once);
    if once != twice {
        anyhow::bail!(
            "{}: extraction is not stable (line {})",
            cli.file.display(),
            first_difference(&once, &twice)
        );
    }
    if once != text.trim() {
        anyhow::bail!(
            "{}: changes after one round trip (line {})",
            cli.file.display(),
            first_difference(text.trim(), &once)
        );
    }
    println!("{}: ok", cli.file.display());
    Ok(())
}

fn serve(cli: &Cli, options: &EditorOptions, output: Option<PathBuf>) -> Result<()> {
    let mut body = Vec::new();
    std::io::stdin()
        .read_to_end(&mut body)
        .context("Failed to read request from stdin")?;
    let target = output.unwrap_or_else(|| cli.file.clone());
    let store = FileStore::new(target).with_max_bytes(options.max_bytes);
    let reply = handle_request(&store, &body);
    println!("{}", reply.status);
    println!("{}", serde_json::to_string(&reply.body)?);
    Ok(())
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    perf::set_enabled(effective.perf);
    let options = EditorOptions::from_flags(&effective);

    if cli.endpoint {
        return serve(&cli, &options, effective.output);
    }

    if !cli.file.exists() {
        anyhow::bail!("File not found: {}", cli.file.display());
    }
    let text = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("Failed to read {}", cli.file.display()))?;

    if cli.check {
        return check(&cli, &text);
    }

    let app = App::new(&text).with_options(options);
    println!("{}", app.html());
    Ok(())
}
