//! CLI Application logic
//!
//! Reads a pandoc JSON AST from standard input and writes an HWPX file.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, LevelFilter};

use hwpx_ast::Document;
use hwpx_writer::{HwpxWriter, LayoutConfig, Template};

#[derive(Parser, Debug, Clone)]
#[command(name = "pandoc-hwpx")]
#[command(author, version, about = "Convert pandoc JSON to HWPX", long_about = None)]
pub struct Cli {
    /// Output HWPX file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Directory relative image paths are resolved against
    #[arg(long, default_value = ".")]
    pub input_dir: PathBuf,

    /// Reference HWPX document providing styles and page setup
    #[arg(long)]
    pub reference_doc: Option<PathBuf>,

    /// Insert a table of contents before the body
    #[arg(long)]
    pub toc: bool,

    /// Layout configuration (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report conversion progress
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run the CLI application
///
/// Parses arguments, reads the document from standard input and converts
/// it.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut json = String::new();
    std::io::stdin()
        .read_to_string(&mut json)
        .context("Failed to read standard input")?;
    convert_command(&cli, &json)
}

/// Initialise logging; `RUST_LOG` overrides the default `warn` filter
fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder
            .filter_module("hwpx_writer", LevelFilter::Info)
            .filter_module("hwpx_cli", LevelFilter::Info);
    }
    let _ = builder.format_timestamp(None).try_init();
}

/// Convert a JSON document as configured by `cli`
pub fn convert_command(cli: &Cli, json: &str) -> Result<()> {
    if json.trim().is_empty() {
        bail!("No JSON AST received on stdin");
    }
    let doc = Document::from_json(json).context("Failed to parse JSON AST")?;
    debug!("{} top-level blocks", doc.blocks.len());

    let config = match &cli.config {
        Some(path) => LayoutConfig::load(path)
            .with_context(|| format!("Failed to load layout config: {}", path.display()))?,
        None => LayoutConfig::default(),
    };
    let template = Template::load_or_builtin(cli.reference_doc.as_deref(), &config)
        .context("Failed to prepare the package template")?;

    let mut writer = HwpxWriter::with_config(config);
    writer.set_input_dir(&cli.input_dir);
    writer.set_toc(cli.toc);
    writer
        .write_to_file(&doc, template, &cli.output)
        .with_context(|| format!("Failed to write output file: {}", cli.output.display()))?;
    Ok(())
}
