//! The `build` command: assemble, render and write the document.
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result, eyre};
use log::info;
use mdbinder_config::Config;
use mdbinder_core::{
  Assembler,
  Document,
  OutlineBuilder,
  outline,
  syntax::create_default_manager,
};

use crate::{
  html::template,
  utils::{resolve_sources, run_pdf_command, write_output},
};

/// Result of a finished build.
#[derive(Debug, Clone)]
pub struct BuildOutput {
  /// The complete HTML document.
  pub html:      String,
  /// Where the HTML was written.
  pub html_path: PathBuf,
  /// The PDF file, when a PDF command ran.
  pub pdf_path:  Option<PathBuf>,
}

/// Assemble the configured sources below `cwd`.
///
/// # Errors
///
/// Returns an error if no sources are found or any of them cannot be read.
pub fn assemble(config: &Config, cwd: &Path) -> Result<Document> {
  let sources = resolve_sources(config, cwd);
  if sources.is_empty() {
    return Err(eyre!("No Markdown files found in {}", cwd.display()));
  }

  let syntax = create_default_manager(Some(config.highlight_theme.clone()))
    .inspect_err(|e| log::warn!("Code blocks will not be highlighted: {e}"))
    .ok();
  let assembler = Assembler::new(cwd).with_syntax_manager(syntax);

  info!("Processing {} Markdown files", sources.len());
  Ok(assembler.assemble_files(&sources)?)
}

/// Render the table of contents of an assembled document.
#[must_use]
pub fn table_of_contents(config: &Config, document: &Document) -> Option<String> {
  if !config.is_toc_enabled() {
    return None;
  }

  let outline = OutlineBuilder::new(1, config.toc_max_level)
    .build(&document.markup());
  Some(outline::render(&outline)).filter(|toc| !toc.is_empty())
}

/// Produce the HTML document without writing anything.
///
/// # Errors
///
/// Returns an error if assembly or template rendering fails.
pub fn render_html(config: &Config, cwd: &Path) -> Result<String> {
  let document = assemble(config, cwd)?;
  let toc = table_of_contents(config, &document);
  template::render(config, cwd, &document, toc.as_deref())
    .wrap_err("Failed to render the document template")
}

/// Run a complete build: render, write the HTML and run the PDF command.
///
/// Nothing is written when rendering fails.
///
/// # Errors
///
/// Returns an error if any step fails.
pub fn run(config: &Config, cwd: &Path) -> Result<BuildOutput> {
  let html = render_html(config, cwd)?;

  let html_path = cwd.join(
    config
      .html_output_path()
      .ok_or_else(|| eyre!("Missing required setting 'outputFile'"))?,
  );
  write_output(&html_path, &html)?;

  let pdf_path = if config.pdf_command.is_empty() {
    None
  } else {
    let pdf_path = config
      .output_file
      .as_ref()
      .map(|path| cwd.join(path))
      .filter(|path| *path != html_path)
      .unwrap_or_else(|| html_path.with_extension("pdf"));
    run_pdf_command(&config.pdf_command, &html_path, &pdf_path)?;
    Some(pdf_path)
  };

  Ok(BuildOutput {
    html,
    html_path,
    pdf_path,
  })
}
