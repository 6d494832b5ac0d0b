//! Parsing and serialization of page fragments.
use std::io;

use kuchikikiki::{NodeRef, parse_html};
use tendril::TendrilSink;

/// Parse an HTML fragment into a document whose `body` holds the fragment.
///
/// The fragment is placed after an explicit `<body>` so elements that
/// normally belong in `head` stay where they were written.
#[must_use]
pub fn parse_fragment(html: &str) -> NodeRef {
  parse_html().one(format!(
    "<!DOCTYPE html><html><head></head><body>{html}</body></html>"
  ))
}

/// Serialize the children of the document's `body`.
///
/// # Errors
///
/// Returns an error if writing the markup fails.
pub fn serialize_body(document: &NodeRef) -> io::Result<String> {
  let mut buf = Vec::new();
  if let Ok(body) = document.select_first("body") {
    for child in body.as_node().children() {
      child.serialize(&mut buf)?;
    }
  }
  Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Replace the children of `target` with the nodes parsed from `html`.
pub fn replace_children(target: &NodeRef, html: &str) {
  for child in target.children().collect::<Vec<_>>() {
    child.detach();
  }

  let fragment = parse_fragment(&format!("<div>{html}</div>"));
  let Ok(wrapper) = fragment.select_first("body > div") else {
    return;
  };
  for child in wrapper.as_node().children().collect::<Vec<_>>() {
    target.append(child);
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]
  use super::*;

  #[test]
  fn test_round_trip_keeps_fragment_only() {
    let document = parse_fragment("<h1>Title</h1><p>text</p>");
    let html = serialize_body(&document).expect("serialization");
    assert_eq!(html, "<h1>Title</h1><p>text</p>");
  }

  #[test]
  fn test_head_elements_stay_in_body() {
    let document = parse_fragment(r#"<link rel="x" href="y"><p>a</p>"#);
    let html = serialize_body(&document).expect("serialization");
    assert!(html.starts_with("<link"));
  }

  #[test]
  fn test_replace_children() {
    let document = parse_fragment("<pre class=\"c\">int x;</pre>");
    let pre = document.select_first("pre").expect("pre element");
    replace_children(pre.as_node(), r#"<span class="hl-kw">int</span> x;"#);
    let html = serialize_body(&document).expect("serialization");
    assert_eq!(
      html,
      r#"<pre class="c"><span class="hl-kw">int</span> x;</pre>"#
    );
  }
}
