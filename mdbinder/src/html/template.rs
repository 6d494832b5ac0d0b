use std::{fs, path::Path};

use color_eyre::eyre::{Context, Result};
use html_escape::{encode_double_quoted_attribute, encode_text};
use log::{debug, warn};
use mdbinder_config::Config;
use mdbinder_core::Document;
use mdbinder_templates::{DEFAULT_CSS, DOCUMENT_TEMPLATE};
use tera::Tera;

/// Page width and side margins in millimeters.
const PAGE_MARGIN: u32 = 20;

/// Render the complete HTML document.
///
/// # Errors
///
/// Returns an error if a template or the header/footer file cannot be read or
/// rendered.
pub fn render(
  config: &Config,
  cwd: &Path,
  document: &Document,
  toc: Option<&str>,
) -> Result<String> {
  let mut tera = Tera::default();
  let template_content =
    get_template_content(config, "document.html", DOCUMENT_TEMPLATE)?;
  tera.add_raw_template("document", &template_content)?;

  let header = config
    .header
    .as_deref()
    .map(|path| render_page_chrome(config, cwd, path))
    .transpose()?;
  let footer = config
    .footer
    .as_deref()
    .map(|path| render_page_chrome(config, cwd, path))
    .transpose()?;

  let mut tera_context = tera::Context::new();
  tera_context.insert("language", &encode_double_quoted_attribute(&config.language));
  tera_context.insert("title", &encode_text(&config.document_title));
  tera_context.insert("stylesheet", &stylesheet(config, document)?);
  tera_context.insert("user_stylesheets", &user_stylesheets(config, cwd));
  tera_context.insert("header", &header.unwrap_or_default());
  tera_context.insert("footer", &footer.unwrap_or_default());
  tera_context.insert("toc_title", &encode_text(&config.toc_title));
  tera_context.insert("toc", toc.unwrap_or_default());
  tera_context.insert("content", &document.markup());

  Ok(tera.render("document", &tera_context)?)
}

/// Base stylesheet, page geometry and the collected highlighting rules.
///
/// # Errors
///
/// Returns an error if an overriding `default.css` cannot be read.
pub fn stylesheet(config: &Config, document: &Document) -> Result<String> {
  let mut css = get_template_content(config, "default.css", DEFAULT_CSS)?;
  css.push('\n');
  css.push_str(&page_rule(config));

  let highlight = document.highlight_css();
  if !highlight.is_empty() {
    css.push('\n');
    css.push_str(&highlight);
  }
  Ok(css)
}

/// The `@page` rule for A4 pages, with running header and footer boxes when
/// they are used.
#[must_use]
pub fn page_rule(config: &Config) -> String {
  let mut rule = format!(
    "@page {{\n  size: A4;\n  margin: {}mm {PAGE_MARGIN}mm {PAGE_MARGIN}mm \
     {PAGE_MARGIN}mm;\n",
    config.margin_top()
  );
  if config.header.is_some() {
    rule.push_str("  @top-center { content: element(pageHeader); }\n");
  }
  if config.footer.is_some() {
    rule.push_str("  @bottom-center { content: element(pageFooter); }\n");
  }
  rule.push('}');
  rule
}

/// `file:///` links for the configured user stylesheets.
///
/// Relative paths are resolved against `cwd`; stylesheets that do not exist
/// are skipped.
#[must_use]
pub fn user_stylesheets(config: &Config, cwd: &Path) -> Vec<String> {
  config
    .user_css
    .iter()
    .filter_map(|path| {
      let raw = path.to_string_lossy().replace('\\', "/");
      let mut chars = raw.chars();
      let has_drive = matches!(
        (chars.next(), chars.next()),
        (Some(letter), Some(':')) if letter.is_ascii_alphabetic()
      );
      let is_absolute = raw.starts_with('/') || has_drive;
      let resolved = if is_absolute {
        raw
      } else {
        match cwd.join(path).canonicalize() {
          Ok(abs) => abs.to_string_lossy().replace('\\', "/"),
          Err(e) => {
            warn!("Skipping user stylesheet {}: {e}", path.display());
            return None;
          },
        }
      };
      let href = format!("file:///{}", resolved.trim_start_matches('/'));
      Some(encode_double_quoted_attribute(&href).into_owned())
    })
    .collect()
}

/// Render a header or footer file.
///
/// The file is a tera template receiving `cwd` and `title`. The
/// `{CWD}` and `{TITLE}` placeholders of older templates work as well.
///
/// # Errors
///
/// Returns an error if the file cannot be read or rendered.
pub fn render_page_chrome(
  config: &Config,
  cwd: &Path,
  path: &Path,
) -> Result<String> {
  let path = cwd.join(path);
  let content = fs::read_to_string(&path)
    .wrap_err_with(|| format!("Failed to read template {}", path.display()))?
    .replace("{CWD}", "{{ cwd }}")
    .replace("{TITLE}", "{{ title }}");

  let mut tera = Tera::default();
  tera.add_raw_template("chrome", &content).wrap_err_with(|| {
    format!("Failed to parse template {}", path.display())
  })?;

  let mut tera_context = tera::Context::new();
  tera_context.insert("cwd", &encode_text(&cwd.to_string_lossy()));
  tera_context.insert("title", &encode_text(&config.page_title));

  tera.render("chrome", &tera_context).wrap_err_with(|| {
    format!("Failed to render template {}", path.display())
  })
}

/// Read a template from `templateDir`, falling back to the embedded one.
///
/// # Errors
///
/// Returns an error if an existing override cannot be read.
pub fn get_template_content(
  config: &Config,
  name: &str,
  fallback: &str,
) -> Result<String> {
  config.get_template_file(name).map_or_else(
    || Ok(fallback.to_string()),
    |path| {
      debug!("Using template override {}", path.display());
      fs::read_to_string(&path)
        .wrap_err_with(|| format!("Failed to read template {}", path.display()))
    },
  )
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]
  use std::path::PathBuf;

  use mdbinder_core::Page;
  use tempfile::TempDir;

  use super::*;

  fn document() -> Document {
    Document {
      pages:       vec![Page {
        page_id:     "a".to_string(),
        body_markup: "<div id=\"a\" class=\"page\"></div>".to_string(),
      }],
      stylesheets: [("php".to_string(), "pre.php .x { color: red; }".to_string())]
        .into_iter()
        .collect(),
    }
  }

  #[test]
  fn test_page_rule_margins() {
    let mut config = Config::default();
    assert!(page_rule(&config).contains("margin: 20mm 20mm 20mm 20mm;"));
    config.header = Some(PathBuf::from("header.html"));
    config.page_margin_top_if_header = 30;
    let rule = page_rule(&config);
    assert!(rule.contains("margin: 30mm 20mm 20mm 20mm;"));
    assert!(rule.contains("element(pageHeader)"));
    assert!(!rule.contains("element(pageFooter)"));
  }

  #[test]
  fn test_stylesheet_appends_highlighting() {
    let css = stylesheet(&Config::default(), &document()).unwrap();
    assert!(css.starts_with(DEFAULT_CSS));
    assert!(css.ends_with("}\npre.php .x { color: red; }"));
  }

  #[test]
  fn test_user_stylesheets() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("mine.css"), "").unwrap();
    let config = Config {
      user_css: vec![
        PathBuf::from("mine.css"),
        PathBuf::from("/srv/shared.css"),
        PathBuf::from("missing.css"),
      ],
      ..Config::default()
    };

    let links = user_stylesheets(&config, dir.path());
    assert_eq!(links.len(), 2);
    assert!(links[0].starts_with("file:///"));
    assert!(links[0].ends_with("/mine.css"));
    assert_eq!(links[1], "file:///srv/shared.css");
  }

  #[test]
  fn test_page_chrome_placeholders() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("header.html"), "<b>{TITLE}</b> {{ title }}")
      .unwrap();
    let config = Config {
      page_title: "A & B".to_string(),
      ..Config::default()
    };

    let html =
      render_page_chrome(&config, dir.path(), Path::new("header.html")).unwrap();
    assert_eq!(html, "<b>A &amp; B</b> A &amp; B");
  }

  #[test]
  fn test_render_document() {
    let dir = TempDir::new().unwrap();
    let config = Config {
      document_title: "Guide".to_string(),
      ..Config::default()
    };

    let html =
      render(&config, dir.path(), &document(), Some("<ul></ul>")).unwrap();
    assert!(html.contains("<title>Guide</title>"));
    assert!(html.contains(
      "<div id=\"Page\">\n<div class=\"md2pdfToc\">\n<h1>Contents</h1>\n<ul></ul>"
    ));
    assert!(html.contains("<div id=\"a\" class=\"page\"></div>"));
    assert!(!html.contains("pageHeader\">"));
  }

  #[test]
  fn test_template_dir_override() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("document.html"), "{{ title }}|{{ content }}")
      .unwrap();
    let config = Config {
      template_dir: Some(dir.path().to_path_buf()),
      ..Config::default()
    };

    let html = render(&config, dir.path(), &document(), None).unwrap();
    assert_eq!(html, "Documentation|<div id=\"a\" class=\"page\"></div>");
  }
}
