use std::{fs, path::Path, process::Command};

use color_eyre::eyre::{Context, Result, bail};
use log::info;

/// Write the assembled document, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the directory or the file cannot be written.
pub fn write_output(path: &Path, html: &str) -> Result<()> {
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory: {}", parent.display())
    })?;
  }

  fs::write(path, html)
    .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
  info!("Wrote {}", path.display());
  Ok(())
}

/// Run the configured PDF command on the written HTML file.
///
/// `{input}` and `{output}` are replaced in every argument.
///
/// # Errors
///
/// Returns an error if the command cannot be started or exits unsuccessfully.
pub fn run_pdf_command(
  command: &[String],
  input: &Path,
  output: &Path,
) -> Result<()> {
  let input = input.to_string_lossy();
  let output = output.to_string_lossy();
  let mut args = command.iter().map(|arg| {
    arg
      .replace("{input}", &input)
      .replace("{output}", &output)
  });

  let Some(program) = args.next() else {
    bail!("pdfCommand is empty");
  };
  let args: Vec<String> = args.collect();

  info!("Running {program} {}", args.join(" "));
  let status = Command::new(&program)
    .args(&args)
    .status()
    .wrap_err_with(|| format!("Failed to start PDF command '{program}'"))?;

  if !status.success() {
    bail!("PDF command '{program}' failed with {status}");
  }

  info!("The output PDF file \"{output}\" was successfully generated");
  Ok(())
}

#[cfg(all(test, unix))]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_pdf_command_placeholders() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("doc.html");
    let output = dir.path().join("doc.pdf");
    write_output(&input, "<p>x</p>").unwrap();

    let command = ["cp", "{input}", "{output}"].map(String::from);
    run_pdf_command(&command, &input, &output).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), "<p>x</p>");
  }

  #[test]
  fn test_pdf_command_failure() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("missing.html");
    let command = ["cp", "{input}", "{output}"].map(String::from);
    assert!(
      run_pdf_command(&command, &input, &dir.path().join("o.pdf")).is_err()
    );
  }

  #[test]
  fn test_empty_pdf_command() {
    assert!(
      run_pdf_command(&[], Path::new("a.html"), Path::new("a.pdf")).is_err()
    );
  }
}
