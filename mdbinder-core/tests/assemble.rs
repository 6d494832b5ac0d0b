#![allow(clippy::expect_used, reason = "Fine in tests")]
use std::{fs, path::Path};

use mdbinder_core::{
  AssembleError,
  Assembler,
  OutlineBuilder,
  PAGE_BREAK,
  outline,
  syntax::{Highlighted, SyntaxHighlighter, SyntaxManager, SyntaxResult},
};
use tempfile::TempDir;

/// Highlighter that wraps code in one span and knows two languages.
struct MarkerHighlighter;

impl SyntaxHighlighter for MarkerHighlighter {
  fn supports_language(&self, language: &str) -> bool {
    matches!(language, "php" | "javascript")
  }

  fn highlight(
    &self,
    code: &str,
    language: &str,
    _theme: Option<&str>,
  ) -> SyntaxResult<Highlighted> {
    Ok(Highlighted {
      html: format!(
        r#"<span class="hl-{language}">{}</span>"#,
        html_escape::encode_text(code)
      ),
      css:  format!(".hl-{language} {{\n color: red;\n}}\n"),
    })
  }
}

fn write(root: &Path, path: &str, content: &str) {
  let path = root.join(path);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).expect("create parent dir");
  }
  fs::write(path, content).expect("write fixture");
}

fn assembler(root: &Path) -> Assembler {
  Assembler::new(root).with_syntax_manager(Some(SyntaxManager::with_highlighter(
    Box::new(MarkerHighlighter),
  )))
}

#[test]
fn test_pages_follow_input_order() {
  let dir = TempDir::new().expect("temp dir");
  write(dir.path(), "b.md", "# Second");
  write(dir.path(), "a.md", "# First");
  write(dir.path(), "docs/c.md", "# Third");

  let document = assembler(dir.path())
    .assemble_files(&["b.md", "a.md", "docs/c.md"])
    .expect("assembly succeeds");

  let ids: Vec<_> = document.pages.iter().map(|p| p.page_id.as_str()).collect();
  assert_eq!(ids, ["b", "a", "docs_c"]);

  let markup = document.markup();
  assert_eq!(markup.matches(PAGE_BREAK).count(), 2);
  assert!(markup.starts_with(r#"<div id="b" class="page"><a name="b"></a>"#));
  assert!(markup.contains(r#"<h1 id="second"><a name="second">Second</a></h1>"#));
}

#[test]
fn test_heading_ids_are_unique_across_pages() {
  let dir = TempDir::new().expect("temp dir");
  write(dir.path(), "one.md", "# Überblick\n\n## Setup");
  write(dir.path(), "two.md", "# Überblick\n\n## Setup");

  let markup = assembler(dir.path())
    .assemble_files(&["one.md", "two.md"])
    .expect("assembly succeeds")
    .markup();

  for id in ["ueberblick", "ueberblick1", "setup", "setup1"] {
    assert!(markup.contains(&format!(r#"id="{id}""#)), "missing id {id}");
  }
}

#[test]
fn test_heading_ids_never_reuse_page_ids() {
  let dir = TempDir::new().expect("temp dir");
  write(dir.path(), "notes.md", "# Notes");
  write(dir.path(), "intro.md", "# Intro");
  write(dir.path(), "other.md", "# Intro");

  let markup = assembler(dir.path())
    .assemble_files(&["notes.md", "other.md", "intro.md"])
    .expect("assembly succeeds")
    .markup();

  assert!(markup.contains(r#"<div id="notes" class="page">"#));
  assert!(markup.contains(r#"<h1 id="notes1"><a name="notes1">Notes</a></h1>"#));
  assert!(markup.contains(r#"<h1 id="intro1"><a name="intro1">Intro</a></h1>"#));
  assert!(markup.contains(r#"<h1 id="intro2"><a name="intro2">Intro</a></h1>"#));
  assert_eq!(markup.matches(r#"id="intro""#).count(), 1);

  let toc = outline::render(&OutlineBuilder::new(1, 1).build(&markup));
  assert!(toc.contains(r##"<a href="#intro1">Intro</a>"##));
  assert!(!toc.contains(r##"href="#intro""##));
}

#[test]
fn test_links_between_documents() {
  let dir = TempDir::new().expect("temp dir");
  write(dir.path(), "notes.md", "# Notes");
  write(
    dir.path(),
    "docs/guide.md",
    "[notes](../notes.md) [sec](notes.md#section) [abs](/etc/x) \
     [gone](missing/x.md) [web](https://example.org)",
  );

  let document = assembler(dir.path())
    .assemble_files(&["notes.md", "docs/guide.md"])
    .expect("assembly succeeds");
  let guide = &document.pages[1].body_markup;

  assert!(guide.contains(r##"<a href="#notes">notes</a>"##));
  assert!(guide.contains(r##"<a href="#section">sec</a>"##));
  assert!(guide.contains(r#"<a href="file:///etc/x">abs</a>"#));
  assert!(guide.contains("<a>gone</a>"));
  assert!(guide.contains(r#"<a href="https://example.org">web</a>"#));
}

#[test]
fn test_images_are_resolved_or_hidden() {
  let dir = TempDir::new().expect("temp dir");
  write(dir.path(), "img/logo.png", "png");
  write(
    dir.path(),
    "index.md",
    "![logo](img/logo.png|width=40) ![none](img/none.png)",
  );

  let document = assembler(dir.path())
    .assemble_files(&["index.md"])
    .expect("assembly succeeds");
  let page = &document.pages[0].body_markup;

  assert!(page.contains(r#"width="40""#));
  assert!(page.contains(r#"style="display:inline-block;""#));
  assert!(page.contains("/img/logo.png\""));
  assert!(page.contains(r#"src="" style="display:none;""#));
}

#[test]
fn test_stylesheets_are_collected_once_per_language() {
  let dir = TempDir::new().expect("temp dir");
  write(
    dir.path(),
    "a.md",
    "```php\necho 1;\n```\n\n```json\n{}\n```\n\n```php\necho 2;\n```\n",
  );
  write(dir.path(), "b.md", "```php\necho 3;\n```\n\n```text\nplain\n```\n");

  let document = assembler(dir.path())
    .assemble_files(&["a.md", "b.md"])
    .expect("assembly succeeds");

  let languages: Vec<_> = document.stylesheets.keys().cloned().collect();
  assert_eq!(languages, ["php", "javascript"]);
  assert_eq!(
    document.highlight_css(),
    "pre.php .hl-php { color: red; }\n/**/\npre.javascript .hl-javascript { \
     color: red; }"
  );

  let markup = document.markup();
  assert!(markup.contains(r#"<pre class="php"><span class="hl-php">echo 1;"#));
  assert!(markup.contains(r#"<pre class="javascript"><span"#));
  assert!(markup.contains(">plain\n</pre>"));
}

#[test]
fn test_page_breaks_are_replaced() {
  let dir = TempDir::new().expect("temp dir");
  write(dir.path(), "a.md", "before\n\n!!!PAGEBREAK!!!\n\nafter\n");

  let document = assembler(dir.path())
    .assemble_files(&["a.md"])
    .expect("assembly succeeds");
  assert!(document.pages[0].body_markup.contains(PAGE_BREAK));
  assert!(!document.pages[0].body_markup.contains("PAGEBREAK"));
}

#[test]
fn test_unreadable_source_aborts() {
  let dir = TempDir::new().expect("temp dir");
  write(dir.path(), "a.md", "# A");

  let result = assembler(dir.path()).assemble_files(&["a.md", "missing.md"]);
  assert!(matches!(
    result,
    Err(AssembleError::SourceRead { ref path, .. }) if path.ends_with("missing.md")
  ));
}

#[test]
fn test_outline_of_merged_document() {
  let dir = TempDir::new().expect("temp dir");
  write(dir.path(), "a.md", "# Intro\n\n### Detail\n");
  write(dir.path(), "b.md", "## Usage\n\n# Reference\n");

  let markup = assembler(dir.path())
    .assemble_files(&["a.md", "b.md"])
    .expect("assembly succeeds")
    .markup();

  let toc = outline::render(&OutlineBuilder::new(1, 2).build(&markup));
  assert_eq!(
    toc,
    r##"<ul><li><a href="#intro">Intro</a><ul><li><a href="#usage">Usage</a></li></ul></li><li><a href="#reference">Reference</a></li></ul>"##
  );
}
