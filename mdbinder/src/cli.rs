use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line interface for mdbinder
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "Bind Markdown files into one paginated HTML document"
)]
pub struct Cli {
  /// Subcommand to execute, `build` when omitted (see [`Commands`])
  #[command(subcommand)]
  pub command: Option<Commands>,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to the configuration file (JSON or TOML). Falls back to
  /// md2pdf.json in the working directory when the file does not exist
  #[arg(short = 'c', long = "config-file", global = true)]
  pub config_file: Option<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", action = clap::ArgAction::Append, global = true)]
  pub config_overrides: Vec<String>,
}

/// All supported subcommands for the mdbinder CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Create a default md2pdf.json configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "md2pdf.json")]
    output: PathBuf,

    /// Force overwrite if files already exist
    #[arg(short, long)]
    force: bool,

    /// Also write starter header, footer and stylesheet files into .md2pdf/
    #[arg(short, long)]
    assets: bool,
  },

  /// Assemble the configured Markdown files into one HTML document
  Build {
    /// Print the assembled HTML to stdout
    #[arg(long = "dump-html")]
    dump_html: bool,
  },
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
