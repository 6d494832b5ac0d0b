use std::{env, path::Path};

use color_eyre::eyre::{Context, Result};
use log::{LevelFilter, info};
use mdbinder::{
  build,
  cli::{Cli, Commands},
};
use mdbinder_config::Config;

/// Directory receiving the starter files of `init --assets`.
const ASSET_DIR: &str = ".md2pdf";

fn main() -> Result<()> {
  color_eyre::install()?;

  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  let cwd = env::current_dir().wrap_err("Failed to read working directory")?;

  match cli.command {
    Some(Commands::Init {
      ref output,
      force,
      assets,
    }) => init(&cwd, output, force, assets),
    Some(Commands::Build { dump_html }) => run_build(&cli, &cwd, dump_html),
    None => run_build(&cli, &cwd, false),
  }
}

fn init(cwd: &Path, output: &Path, force: bool, assets: bool) -> Result<()> {
  let output = cwd.join(output);
  Config::generate_default_config(&output, force).wrap_err_with(|| {
    format!("Failed to generate configuration file: {}", output.display())
  })?;

  if assets {
    let asset_dir = cwd.join(ASSET_DIR);
    Config::export_assets(&asset_dir, force).wrap_err_with(|| {
      format!("Failed to write starter files to {}", asset_dir.display())
    })?;
  }

  info!(
    "Configuration file created successfully. Edit it to choose the output \
     file and the Markdown sources."
  );
  Ok(())
}

fn run_build(cli: &Cli, cwd: &Path, dump_html: bool) -> Result<()> {
  let config =
    Config::load(cli.config_file.as_deref(), &cli.config_overrides, cwd)
      .wrap_err("Failed to load configuration")?;

  let output = build::run(&config, cwd)?;

  if dump_html {
    #[allow(
      clippy::print_stdout,
      reason = "Printing the document is what --dump-html asks for"
    )]
    {
      println!("{}", output.html);
    }
  }

  Ok(())
}
