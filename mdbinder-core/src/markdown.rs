//! Markdown to HTML conversion.
use comrak::{Options, markdown_to_html};

/// Converts Markdown text into an HTML fragment.
pub trait MarkdownRenderer {
  fn render(&self, markdown: &str) -> String;
}

/// Renderer backed by comrak with GitHub Flavored Markdown extensions.
#[derive(Debug, Clone, Copy)]
pub struct ComrakRenderer {
  /// Enable tables, footnotes, strikethrough, task lists and autolinks.
  pub gfm: bool,
}

impl Default for ComrakRenderer {
  fn default() -> Self {
    Self { gfm: true }
  }
}

impl ComrakRenderer {
  fn options(&self) -> Options<'_> {
    let mut options = Options::default();
    if self.gfm {
      options.extension.table = true;
      options.extension.footnotes = true;
      options.extension.strikethrough = true;
      options.extension.tasklist = true;
      options.extension.superscript = true;
      options.extension.autolink = true;
    }
    // Raw HTML passes through and headings stay bare; anchors are assigned
    // later for the whole run
    options.render.r#unsafe = true;
    options.extension.header_id_prefix = None;
    options
  }
}

impl MarkdownRenderer for ComrakRenderer {
  fn render(&self, markdown: &str) -> String {
    markdown_to_html(markdown, &self.options())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_headings_have_no_generated_ids() {
    let html = ComrakRenderer::default().render("# Hello World\n\n## Next");
    assert!(html.contains("<h1>Hello World</h1>"));
    assert!(html.contains("<h2>Next</h2>"));
  }

  #[test]
  fn test_fenced_code_keeps_language_class() {
    let html = ComrakRenderer::default().render("```rust\nfn main() {}\n```\n");
    assert!(html.contains(r#"<pre><code class="language-rust">"#));
  }

  #[test]
  fn test_raw_html_passes_through() {
    let html = ComrakRenderer::default().render("<div class=\"x\">raw</div>\n");
    assert!(html.contains(r#"<div class="x">raw</div>"#));
  }
}
