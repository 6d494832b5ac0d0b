//! Rendering of an [`Outline`] as nested lists.
use std::fmt::Write;

use super::Outline;

/// Render the outline as nested `<ul>` lists.
///
/// Filler nodes become an unlinked `<li>` wrapping their children. An outline
/// without entries renders to an empty string.
#[must_use]
pub fn render(outline: &Outline) -> String {
  let mut out = String::new();
  render_children(outline, Outline::ROOT, &mut out);
  out
}

fn render_children(outline: &Outline, index: usize, out: &mut String) {
  let mut children = outline.children(index).peekable();
  if children.peek().is_none() {
    return;
  }

  out.push_str("<ul>");
  for (child_index, child) in children {
    out.push_str("<li>");
    if let Some(id) = &child.target_id {
      let _ = write!(
        out,
        r##"<a href="#{}">{}</a>"##,
        html_escape::encode_double_quoted_attribute(id),
        html_escape::encode_text(&child.label)
      );
    }
    render_children(outline, child_index, out);
    out.push_str("</li>");
  }
  out.push_str("</ul>");
}
