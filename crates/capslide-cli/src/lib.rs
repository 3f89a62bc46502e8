//! capslide CLI - Command-line interface library
//!
//! Turns a subtitle file into slides using a PPTX template:
//! - Reads `.json` (array of objects) or `.txt` (one subtitle per line)
//! - Layers command-line flags over an optional `capslide.toml`
//! - Logs progress through `tracing` to standard output
//!
//! # Library Usage
//!
//! ```ignore
//! use capslide_cli::{generate_command, resolve_options, Cli};
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! let options = resolve_options(&cli, &std::env::current_dir()?)?;
//! let generated = generate_command(&cli.input, options)?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # One slide per line of subtitles.txt, using the last slide of template.pptx
//! capslide subtitles.txt --template template.pptx --output episode1.pptx
//!
//! # Use slide 3 as the template and strip punctuation
//! capslide rows.json -t template.pptx -n 3 -i
//! ```

pub mod app;

// Re-export main entry point and types
pub use app::{generate_command, resolve_options, run_cli, Cli, Generated};
