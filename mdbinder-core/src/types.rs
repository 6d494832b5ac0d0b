//! Types shared by the assembly pipeline.
use std::path::Path;

use indexmap::IndexMap;

use crate::{
  slug,
  utils::{normalize_lexically, to_slash},
};

/// Marker inserted between pages and for manual page breaks.
pub const PAGE_BREAK: &str = r#"<div class="pageBreakAfter"></div>"#;

/// One Markdown input file of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
  /// Project-root-relative path with `/` separators.
  pub path:     String,
  /// Anchor of the page container, derived from `path`.
  pub page_id:  String,
  /// Raw Markdown text.
  pub markdown: String,
}

impl SourceDocument {
  /// Create a document from its root-relative path and Markdown text.
  pub fn new(path: impl AsRef<Path>, markdown: impl Into<String>) -> Self {
    let path = to_slash(&normalize_lexically(path.as_ref()));
    let page_id = slug::page_id(&path);
    Self {
      path,
      page_id,
      markdown: markdown.into(),
    }
  }

  /// Directory of the document, relative to the project root.
  #[must_use]
  pub fn directory(&self) -> &Path {
    Path::new(&self.path).parent().unwrap_or_else(|| Path::new(""))
  }
}

/// One document after anchor assignment and reference rewriting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
  pub page_id:     String,
  /// Page container markup, `<div class="page">` included.
  pub body_markup: String,
}

/// The merged result of an assembly run.
#[derive(Debug, Clone, Default)]
pub struct Document {
  /// Pages in input order.
  pub pages:       Vec<Page>,
  /// Highlighting stylesheet per language, in order of first use.
  pub stylesheets: IndexMap<String, String>,
}

impl Document {
  /// Concatenate all pages, separated by page breaks.
  #[must_use]
  pub fn markup(&self) -> String {
    self
      .pages
      .iter()
      .map(|page| page.body_markup.as_str())
      .collect::<Vec<_>>()
      .join(PAGE_BREAK)
  }

  /// Join the collected highlighting stylesheets.
  #[must_use]
  pub fn highlight_css(&self) -> String {
    self
      .stylesheets
      .values()
      .map(String::as_str)
      .collect::<Vec<_>>()
      .join("\n/**/\n")
  }
}

/// An anchor placed inside a heading element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingAnchor {
  /// Heading level (1-6).
  pub level:        u8,
  /// Run-unique anchor id.
  pub id:           String,
  /// Heading text as it appears in the document.
  pub display_text: String,
}
