//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use capslide_pptx::{AppendSummary, ConfigFile, ProcessorOptions, ProcessorSection, SubtitlesProcessor};

#[derive(Parser, Debug)]
#[command(name = "capslide")]
#[command(author, version, about = "CapSlide: Convert subtitles into PPT slides.", long_about = None)]
pub struct Cli {
    /// Path to the input subtitle file (.json/.txt)
    pub input: PathBuf,

    /// Path for the generated PPTX file (default: output.pptx)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to the template PPTX file
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// Placeholder filled by each line of a .txt file (default: subtitle)
    #[arg(short, long)]
    pub placeholder: Option<String>,

    /// Template slide number; 0 selects the last slide (default: 0)
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    pub template_slide: Option<i64>,

    /// Strip punctuation marks from the inserted subtitles
    #[arg(short, long)]
    pub ignore_marks: bool,

    /// Display detailed processing logs
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file (default: ./capslide.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Flags given on the command line, as a layer over the config file
    pub fn overrides(&self) -> ProcessorSection {
        ProcessorSection {
            output: self.output.clone(),
            template: self.template.clone(),
            placeholder: self.placeholder.clone(),
            template_slide: self.template_slide,
            ignore_marks: self.ignore_marks.then_some(true),
            verbose: self.verbose.then_some(true),
        }
    }
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    /// Slides and subtitles added
    pub summary: AppendSummary,
    /// Where the presentation was written
    pub output: PathBuf,
}

/// Run the CLI application
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("Failed to read the working directory")?;
    let options = resolve_options(&cli, &cwd)?;
    init_tracing(options.verbose);

    generate_command(&cli.input, options)?;
    Ok(())
}

/// Merge command-line flags over the configuration file found from `dir`
pub fn resolve_options(cli: &Cli, dir: &Path) -> Result<ProcessorOptions> {
    let config = ConfigFile::discover(cli.config.as_deref(), dir)
        .context("Failed to load configuration")?
        .unwrap_or_default();

    config
        .resolve(&cli.overrides())
        .context("Invalid options")
}

/// Generate slides from `input` and save the presentation
pub fn generate_command(input: &Path, options: ProcessorOptions) -> Result<Generated> {
    info!("Status: Processing file '{}'...", input.display());

    let template = options.template.clone();
    let mut processor = SubtitlesProcessor::new(options).map_err(|err| {
        let context = if err.is_template_error() {
            format!("Invalid template: {}", template.display())
        } else {
            format!("Failed to load template: {}", template.display())
        };
        anyhow::Error::new(err).context(context)
    })?;

    let summary = processor
        .append_slides_from_file(input)
        .with_context(|| format!("Failed to read subtitles from {}", input.display()))?;

    let output = processor
        .save()
        .context("Failed to save the presentation")?;

    Ok(Generated { summary, output })
}

fn init_tracing(verbose: bool) {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    // Ignore the error when a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref(), verbose))
        .with_writer(std::io::stdout)
        .with_target(false)
        .without_time()
        .try_init();
}

/// `RUST_LOG`-style directives win over the `--verbose` level
fn log_filter(directives: Option<&str>, verbose: bool) -> EnvFilter {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(level.as_str()))
}
