//! The page assembly pipeline.
use std::{
  fs,
  path::{Path, PathBuf},
};

use indexmap::IndexMap;
use kuchikikiki::NodeRef;
use log::{debug, info, warn};
use markup5ever::local_name;

use crate::{
  dom,
  error::{AssembleError, AssembleResult},
  markdown::{ComrakRenderer, MarkdownRenderer},
  postprocess,
  resolve::{ResolveContext, resolve_references},
  slug::SlugAssigner,
  syntax::SyntaxManager,
  types::{Document, Page, SourceDocument},
};

/// State shared by all pages of one run.
#[derive(Debug, Default)]
pub struct RunContext {
  /// Heading ids handed out so far.
  pub slugs:       SlugAssigner,
  /// Highlighting stylesheet per language, first occurrence wins.
  pub stylesheets: IndexMap<String, String>,
}

impl RunContext {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }
}

/// Map a code block class to the language name used for highlighting.
#[must_use]
pub fn block_language(class: &str) -> String {
  let class = class.trim().to_lowercase();
  match class.as_str() {
    "json" => "javascript".to_string(),
    "html" => "html5".to_string(),
    "less" | "scss" => "sass".to_string(),
    _ => class,
  }
}

/// Normalize the language class of every `pre` element and highlight it.
///
/// Without a manager, or for languages it does not know, only the class is
/// rewritten. The stylesheet of a language is recorded the first time it is
/// seen.
pub fn highlight_blocks(
  document: &NodeRef,
  syntax: Option<&SyntaxManager>,
  stylesheets: &mut IndexMap<String, String>,
) {
  let Ok(blocks) = document.select("pre[class]") else {
    return;
  };

  // Collect first, the DOM is modified below
  let blocks: Vec<_> = blocks.collect();
  for block in blocks {
    let Some(class) = block
      .attributes
      .borrow()
      .get(local_name!("class"))
      .map(str::to_string)
    else {
      continue;
    };
    let language = block_language(&class);
    if language.is_empty() {
      continue;
    }
    block
      .attributes
      .borrow_mut()
      .insert(local_name!("class"), language.clone());

    let Some(syntax) = syntax else {
      continue;
    };
    if !syntax.recognizes(&language) {
      debug!("No highlighting available for '{language}' blocks");
      continue;
    }

    let code = block.text_contents();
    match syntax.highlight_code(&code, &language) {
      Ok(highlighted) => {
        dom::replace_children(block.as_node(), &highlighted.html);
        stylesheets.entry(language).or_insert(highlighted.css);
      },
      Err(e) => warn!("Failed to highlight '{language}' block: {e}"),
    }
  }
}

/// Turns an ordered list of Markdown sources into one [`Document`].
pub struct Assembler {
  root:     PathBuf,
  renderer: Box<dyn MarkdownRenderer>,
  syntax:   Option<SyntaxManager>,
}

impl Assembler {
  /// Create an assembler for sources below `root`, rendering with comrak.
  ///
  /// Code blocks are not highlighted until a manager is set with
  /// [`Self::with_syntax_manager`].
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      root:     root.into(),
      renderer: Box::new(ComrakRenderer::default()),
      syntax:   None,
    }
  }

  #[must_use]
  pub fn with_renderer(mut self, renderer: Box<dyn MarkdownRenderer>) -> Self {
    self.renderer = renderer;
    self
  }

  /// Replace the highlighter, `None` disables highlighting.
  #[must_use]
  pub fn with_syntax_manager(mut self, syntax: Option<SyntaxManager>) -> Self {
    self.syntax = syntax;
    self
  }

  #[must_use]
  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Read every source file before any processing happens.
  ///
  /// Relative paths are taken from the root.
  ///
  /// # Errors
  ///
  /// Returns [`AssembleError::SourceRead`] for the first file that cannot be
  /// read.
  pub fn read_sources<P: AsRef<Path>>(
    &self,
    paths: &[P],
  ) -> AssembleResult<Vec<SourceDocument>> {
    paths
      .iter()
      .map(|path| {
        let path = path.as_ref();
        let full_path = self.root.join(path);
        let markdown = fs::read_to_string(&full_path).map_err(|source| {
          AssembleError::SourceRead {
            path: full_path.clone(),
            source,
          }
        })?;
        let relative = full_path.strip_prefix(&self.root).unwrap_or(path);
        Ok(SourceDocument::new(relative, markdown))
      })
      .collect()
  }

  /// Read and assemble the given files.
  ///
  /// # Errors
  ///
  /// Fails if any source cannot be read or the root cannot be resolved.
  pub fn assemble_files<P: AsRef<Path>>(
    &self,
    paths: &[P],
  ) -> AssembleResult<Document> {
    let documents = self.read_sources(paths)?;
    self.assemble(&documents)
  }

  /// Assemble documents into pages, in input order.
  ///
  /// # Errors
  ///
  /// Fails if the root cannot be canonicalized or a page cannot be
  /// serialized.
  pub fn assemble(
    &self,
    documents: &[SourceDocument],
  ) -> AssembleResult<Document> {
    let root =
      self
        .root
        .canonicalize()
        .map_err(|source| AssembleError::Root {
          path: self.root.clone(),
          source,
        })?;

    // Page ids and heading ids share the document's id namespace
    let mut ctx = RunContext::new();
    for source in documents {
      ctx.slugs.reserve(&source.page_id);
    }

    let mut pages = Vec::with_capacity(documents.len());
    for source in documents {
      pages.push(self.assemble_page(source, &root, &mut ctx)?);
    }

    info!("Assembled {} pages", pages.len());

    Ok(Document {
      pages,
      stylesheets: ctx.stylesheets,
    })
  }

  /// Run one document through the pipeline.
  ///
  /// # Errors
  ///
  /// Returns [`AssembleError::Serialize`] if the page markup cannot be
  /// written.
  pub fn assemble_page(
    &self,
    source: &SourceDocument,
    root: &Path,
    ctx: &mut RunContext,
  ) -> AssembleResult<Page> {
    debug!("Assembling {} as #{}", source.path, source.page_id);

    let html = self.renderer.render(&source.markdown);
    let html = postprocess::collapse_code_blocks(&html);
    let html = postprocess::replace_page_breaks(&html);
    let (html, anchors) =
      postprocess::assign_heading_anchors(&html, &mut ctx.slugs);
    debug!("{} headings anchored in {}", anchors.len(), source.path);

    let document = dom::parse_fragment(&html);
    highlight_blocks(&document, self.syntax.as_ref(), &mut ctx.stylesheets);
    resolve_references(
      &document,
      &ResolveContext::new(root, source.directory()),
    );

    let body = dom::serialize_body(&document).map_err(|source_err| {
      AssembleError::Serialize {
        page_id: source.page_id.clone(),
        source:  source_err,
      }
    })?;

    let page_id = &source.page_id;
    Ok(Page {
      page_id:     page_id.clone(),
      body_markup: format!(
        r#"<div id="{page_id}" class="page"><a name="{page_id}"></a>{body}</div>"#
      ),
    })
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_new_assembler_does_not_highlight() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join("a.md"), "```rust
fn main() {}
```
")
      .expect("write source");

    fs::write(dir.path().join("b.md"), "```json\n[1]\n```\n")
      .expect("write source");

    let document = Assembler::new(dir.path())
      .assemble_files(&["a.md", "b.md"])
      .expect("assembly succeeds");
    assert!(document.stylesheets.is_empty());
    assert!(
      document.pages[0]
        .body_markup
        .contains("<pre class=\"rust\">fn main() {}\n</pre>")
    );
    assert!(
      document.pages[1]
        .body_markup
        .contains("<pre class=\"javascript\">[1]\n</pre>")
    );
  }

  #[test]
  fn test_block_language_aliases() {
    assert_eq!(block_language("json"), "javascript");
    assert_eq!(block_language("HTML"), "html5");
    assert_eq!(block_language("less"), "sass");
    assert_eq!(block_language("scss"), "sass");
    assert_eq!(block_language("rust"), "rust");
  }
}
