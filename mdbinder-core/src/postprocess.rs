//! String-level passes over a rendered page fragment.
use std::{borrow::Cow, sync::LazyLock};

use regex::{Captures, Regex};

use crate::{
  slug::SlugAssigner,
  types::{HeadingAnchor, PAGE_BREAK},
  utils::never_matching_regex,
};

static CODE_OPEN_WITH_CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"<pre>\s?<code\s+class="(?:language-)?([^"]+)">"#)
    .unwrap_or_else(|e| {
      log::error!("Failed to compile CODE_OPEN_WITH_CLASS_RE regex: {e}");
      never_matching_regex()
    })
});

static CODE_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"<pre>\s?<code>").unwrap_or_else(|e| {
    log::error!("Failed to compile CODE_OPEN_RE regex: {e}");
    never_matching_regex()
  })
});

static CODE_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"</code>\s?</pre>").unwrap_or_else(|e| {
    log::error!("Failed to compile CODE_CLOSE_RE regex: {e}");
    never_matching_regex()
  })
});

static PAGE_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)<p>\s*!!!?PAGEBREAK!!!?\s*</p>").unwrap_or_else(|e| {
    log::error!("Failed to compile PAGE_BREAK_RE regex: {e}");
    never_matching_regex()
  })
});

// Opening and closing levels are compared by hand, the regex crate has no
// backreferences
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"<h([1-6])>([^<\r\n]+)</h([1-6])>").unwrap_or_else(|e| {
    log::error!("Failed to compile HEADING_RE regex: {e}");
    never_matching_regex()
  })
});

/// Fold `<pre><code>` pairs into a single `pre` carrying the language class.
#[must_use]
pub fn collapse_code_blocks(html: &str) -> String {
  let html = CODE_OPEN_WITH_CLASS_RE.replace_all(html, r#"<pre class="$1">"#);
  let html = CODE_OPEN_RE.replace_all(&html, "<pre>");
  CODE_CLOSE_RE.replace_all(&html, "</pre>").into_owned()
}

/// Replace manual page break paragraphs with the page break marker.
#[must_use]
pub fn replace_page_breaks(html: &str) -> Cow<'_, str> {
  PAGE_BREAK_RE.replace_all(html, PAGE_BREAK)
}

/// Give every plain-text heading a run-unique anchor.
///
/// Headings with mismatched levels or blank text are left as they are.
pub fn assign_heading_anchors(
  html: &str,
  slugs: &mut SlugAssigner,
) -> (String, Vec<HeadingAnchor>) {
  let mut anchors = Vec::new();

  let html = HEADING_RE.replace_all(html, |caps: &Captures| {
    let whole = caps[0].to_string();
    if caps[1] != caps[3] {
      log::trace!("Skipping asymmetric heading: {whole}");
      return whole;
    }

    let text = &caps[2];
    let plain = html_escape::decode_html_entities(text);
    if plain.trim().is_empty() {
      return whole;
    }

    let level = caps[1].parse::<u8>().unwrap_or(1);
    let id = slugs.assign(&plain);
    let markup = format!(
      r#"<h{level} id="{id}"><a name="{id}">{text}</a></h{level}>"#
    );
    anchors.push(HeadingAnchor {
      level,
      id,
      display_text: plain.trim().to_string(),
    });
    markup
  });

  (html.into_owned(), anchors)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_collapse_language_class() {
    assert_eq!(
      collapse_code_blocks(
        "<pre><code class=\"language-php\">echo 1;\n</code></pre>"
      ),
      "<pre class=\"php\">echo 1;\n</pre>"
    );
    assert_eq!(
      collapse_code_blocks("<pre> <code class=\"json\">{}</code>\n</pre>"),
      "<pre class=\"json\">{}</pre>"
    );
  }

  #[test]
  fn test_collapse_plain_block() {
    assert_eq!(
      collapse_code_blocks("<pre><code>plain\n</code></pre>"),
      "<pre>plain\n</pre>"
    );
  }

  #[test]
  fn test_page_breaks() {
    let html = "<p>a</p>\n<p>!!!PAGEBREAK!!!</p>\n<p> !!pagebreak!! </p>";
    assert_eq!(
      replace_page_breaks(html),
      format!("<p>a</p>\n{PAGE_BREAK}\n{PAGE_BREAK}")
    );
    assert_eq!(
      replace_page_breaks("<p>!PAGEBREAK!</p>"),
      "<p>!PAGEBREAK!</p>"
    );
  }

  #[test]
  fn test_heading_anchors() {
    let mut slugs = SlugAssigner::new();
    let (html, anchors) =
      assign_heading_anchors("<h1>Intro</h1>\n<h2>Set &amp; Go</h2>", &mut slugs);
    assert_eq!(
      html,
      "<h1 id=\"intro\"><a name=\"intro\">Intro</a></h1>\n<h2 \
       id=\"set__go\"><a name=\"set__go\">Set &amp; Go</a></h2>"
    );
    assert_eq!(anchors.len(), 2);
    assert_eq!(anchors[1].level, 2);
    assert_eq!(anchors[1].display_text, "Set & Go");
  }

  #[test]
  fn test_heading_anchors_share_run_state() {
    let mut slugs = SlugAssigner::new();
    let (first, _) = assign_heading_anchors("<h1>Überblick</h1>", &mut slugs);
    let (second, _) = assign_heading_anchors("<h2>Überblick</h2>", &mut slugs);
    assert!(first.contains("id=\"ueberblick\""));
    assert!(second.contains("id=\"ueberblick1\""));
  }

  #[test]
  fn test_malformed_headings_untouched() {
    let mut slugs = SlugAssigner::new();
    let input = "<h1>Open</h2><h3>   </h3><h2>With <em>markup</em></h2>";
    let (html, anchors) = assign_heading_anchors(input, &mut slugs);
    assert_eq!(html, input);
    assert!(anchors.is_empty());
    assert!(slugs.is_empty());
  }
}
