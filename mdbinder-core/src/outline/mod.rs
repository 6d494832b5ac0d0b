//! Outline (table of contents) reconstruction from heading levels.
//!
//! Headings rarely form a clean hierarchy: a document may jump from `h1`
//! straight to `h3` or start below `h1`. The builder keeps a cursor on the
//! last inserted node and walks up or synthesizes empty filler nodes so that
//! every node's parent is exactly one level shallower.

mod render;

use std::ops::RangeInclusive;

use markup5ever::local_name;

pub use render::render;

use crate::{dom::parse_fragment, types::HeadingAnchor};

/// A node of the outline arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineNode {
  /// Outline level, `0` for the root.
  pub level:     u8,
  /// Display label, empty for fillers and the root.
  pub label:     String,
  /// Anchor the entry links to, `None` for fillers and the root.
  pub target_id: Option<String>,
  pub parent:    Option<usize>,
  pub children:  Vec<usize>,
}

impl OutlineNode {
  /// Whether this node was synthesized for a skipped level.
  #[must_use]
  pub const fn is_filler(&self) -> bool {
    self.level > 0 && self.target_id.is_none()
  }
}

/// Arena-backed outline tree. Index `0` is the synthetic root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
  nodes: Vec<OutlineNode>,
}

impl Default for Outline {
  fn default() -> Self {
    Self::new()
  }
}

impl Outline {
  pub const ROOT: usize = 0;

  /// Create an outline holding only the root.
  #[must_use]
  pub fn new() -> Self {
    Self {
      nodes: vec![OutlineNode {
        level:     0,
        label:     String::new(),
        target_id: None,
        parent:    None,
        children:  Vec::new(),
      }],
    }
  }

  #[must_use]
  pub fn root(&self) -> &OutlineNode {
    &self.nodes[Self::ROOT]
  }

  #[must_use]
  pub fn node(&self, index: usize) -> Option<&OutlineNode> {
    self.nodes.get(index)
  }

  /// All nodes in insertion order, the root first.
  #[must_use]
  pub fn nodes(&self) -> &[OutlineNode] {
    &self.nodes
  }

  /// Whether the root has no children.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.root().children.is_empty()
  }

  /// Children of `index` in document order.
  pub fn children(
    &self,
    index: usize,
  ) -> impl Iterator<Item = (usize, &OutlineNode)> {
    self
      .nodes
      .get(index)
      .map(|node| node.children.as_slice())
      .unwrap_or_default()
      .iter()
      .map(|&child| (child, &self.nodes[child]))
  }

  fn level_of(&self, index: usize) -> u8 {
    self.nodes[index].level
  }

  fn push(
    &mut self,
    parent: usize,
    level: u8,
    label: String,
    target_id: Option<String>,
  ) -> usize {
    let index = self.nodes.len();
    self.nodes.push(OutlineNode {
      level,
      label,
      target_id,
      parent: Some(parent),
      children: Vec::new(),
    });
    self.nodes[parent].children.push(index);
    index
  }

  /// Insert an entry relative to `cursor` and return its index, which
  /// becomes the next cursor.
  pub fn insert_at(&mut self, cursor: usize, entry: OutlineEntry) -> usize {
    let level = entry.level.max(1);

    let mut parent = cursor.min(self.nodes.len() - 1);
    while self.level_of(parent) >= level {
      match self.nodes[parent].parent {
        Some(up) => parent = up,
        None => break,
      }
    }

    while self.level_of(parent) + 1 < level {
      let filler_level = self.level_of(parent) + 1;
      parent = self.push(parent, filler_level, String::new(), None);
    }

    self.push(parent, level, entry.label, Some(entry.id))
  }
}

/// A heading eligible for the outline, with its level already re-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
  pub level: u8,
  pub id:    String,
  pub label: String,
}

/// Find every heading of `html` that carries an anchor.
///
/// The id comes from the heading's `id` attribute or an inner `a[name]`; the
/// label from its `title` attribute or its text.
#[must_use]
pub fn collect_headings(html: &str) -> Vec<HeadingAnchor> {
  let document = parse_fragment(html);
  let Ok(headings) = document.select("h1, h2, h3, h4, h5, h6") else {
    return Vec::new();
  };

  headings
    .filter_map(|heading| {
      let level = heading
        .name
        .local
        .strip_prefix('h')
        .and_then(|digit| digit.parse::<u8>().ok())?;

      let attributes = heading.attributes.borrow();
      let id = attributes
        .get(local_name!("id"))
        .map(str::to_string)
        .or_else(|| {
          heading
            .as_node()
            .select_first("a[name]")
            .ok()
            .and_then(|anchor| {
              anchor
                .attributes
                .borrow()
                .get(local_name!("name"))
                .map(str::to_string)
            })
        })
        .filter(|id| !id.is_empty())?;

      let display_text = attributes
        .get(local_name!("title"))
        .map_or_else(|| heading.text_contents(), str::to_string)
        .trim()
        .to_string();

      Some(HeadingAnchor {
        level,
        id,
        display_text,
      })
    })
    .collect()
}

/// Builds an [`Outline`] from a window of heading levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutlineBuilder {
  top_level: u8,
  max_depth: u8,
}

impl Default for OutlineBuilder {
  fn default() -> Self {
    Self::new(1, 6)
  }
}

impl OutlineBuilder {
  /// Both arguments are clamped to `1..=6`.
  #[must_use]
  pub fn new(top_level: u8, max_depth: u8) -> Self {
    Self {
      top_level: top_level.clamp(1, 6),
      max_depth: max_depth.clamp(1, 6),
    }
  }

  /// Heading levels that make it into the outline.
  #[must_use]
  pub fn levels(&self) -> RangeInclusive<u8> {
    self.top_level..=(self.top_level + self.max_depth - 1).min(6)
  }

  /// Build the outline of merged document markup.
  #[must_use]
  pub fn build(&self, html: &str) -> Outline {
    self.build_from_headings(collect_headings(html))
  }

  /// Build the outline from headings in document order.
  #[must_use]
  pub fn build_from_headings(
    &self,
    headings: impl IntoIterator<Item = HeadingAnchor>,
  ) -> Outline {
    let levels = self.levels();
    let mut outline = Outline::new();
    let mut cursor = Outline::ROOT;

    for heading in headings {
      if !levels.contains(&heading.level) {
        continue;
      }
      cursor = outline.insert_at(cursor, OutlineEntry {
        level: heading.level - self.top_level + 1,
        id:    heading.id,
        label: heading.display_text,
      });
    }

    log::debug!("Built outline with {} nodes", outline.nodes.len() - 1);
    outline
  }
}
