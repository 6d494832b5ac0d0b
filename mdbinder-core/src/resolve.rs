//! Rewriting of link and image references inside one page.
//!
//! Links are matched against an ordered rule table where the first matching
//! rule decides. Images follow a fixed sequence of checks after their inline
//! parameters (`path|width=100|class=wide`) are split off.
use std::{
  path::{Path, PathBuf},
  sync::LazyLock,
};

use kuchikikiki::NodeRef;
use markup5ever::local_name;
use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::{
  slug,
  utils::{never_matching_regex, to_slash},
};

/// Extension of Markdown sources that links may point to.
pub const MARKDOWN_EXTENSION: &str = "md";

static EXTERNAL_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^(https?://|file:/)").unwrap_or_else(|e| {
    log::error!("Failed to compile EXTERNAL_RE regex: {e}");
    never_matching_regex()
  })
});

static WINDOWS_DRIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)^[a-z]:").unwrap_or_else(|e| {
    log::error!("Failed to compile WINDOWS_DRIVE_RE regex: {e}");
    never_matching_regex()
  })
});

/// Where the references of one page are resolved from.
#[derive(Debug, Clone)]
pub struct ResolveContext {
  /// Canonical project root; Markdown targets must lie below it.
  pub root:         PathBuf,
  /// Absolute directory of the page's source document.
  pub document_dir: PathBuf,
}

impl ResolveContext {
  /// Build the context for a document at `relative_dir` below `root`.
  #[must_use]
  pub fn new(root: &Path, relative_dir: &Path) -> Self {
    Self {
      root:         root.to_path_buf(),
      document_dir: root.join(relative_dir),
    }
  }
}

/// Outcome of a link rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefAction {
  /// Leave the attribute as written.
  Keep,
  /// Set the attribute to a new value.
  Replace(String),
  /// Remove the attribute.
  Clear,
}

/// One row of the link rule table.
pub struct LinkRule {
  pub name:    &'static str,
  pub matches: fn(&str) -> bool,
  pub apply:   fn(&str, &ResolveContext) -> RefAction,
}

/// Link rules in priority order.
pub static LINK_RULES: &[LinkRule] = &[
  LinkRule {
    name:    "empty",
    matches: str::is_empty,
    apply:   |_, _| RefAction::Keep,
  },
  LinkRule {
    name:    "fragment",
    matches: |href| href.starts_with('#'),
    apply:   |_, _| RefAction::Keep,
  },
  LinkRule {
    name:    "external",
    matches: |href| EXTERNAL_RE.is_match(href),
    apply:   |_, _| RefAction::Keep,
  },
  LinkRule {
    name:    "unix-absolute",
    matches: |href| href.starts_with('/'),
    apply:   |href, _| RefAction::Replace(format!("file://{href}")),
  },
  LinkRule {
    name:    "windows-absolute",
    matches: |href| WINDOWS_DRIVE_RE.is_match(href),
    apply:   |href, _| RefAction::Replace(format!("file:///{href}")),
  },
  LinkRule {
    name:    "cross-document-fragment",
    matches: |href| href.contains('#'),
    apply:   |href, _| {
      RefAction::Replace(
        href
          .find('#')
          .map_or_else(String::new, |pos| href[pos..].to_string()),
      )
    },
  },
  LinkRule {
    name:    "relative",
    matches: |href| href.starts_with('.'),
    apply:   resolve_markdown_target,
  },
  LinkRule {
    name:    "markdown",
    matches: has_markdown_extension,
    apply:   resolve_markdown_target,
  },
  LinkRule {
    name:    "other",
    matches: |_| true,
    apply:   |_, _| RefAction::Keep,
  },
];

fn has_markdown_extension(href: &str) -> bool {
  Path::new(href)
    .extension()
    .is_some_and(|ext| ext.eq_ignore_ascii_case(MARKDOWN_EXTENSION))
}

/// Decode percent-escapes of a reference that names a local file.
fn decode_path(reference: &str) -> String {
  percent_decode_str(reference).decode_utf8_lossy().into_owned()
}

/// Point a link at the page container of the Markdown file it names.
fn resolve_markdown_target(href: &str, ctx: &ResolveContext) -> RefAction {
  let Ok(target) = ctx.document_dir.join(decode_path(href)).canonicalize()
  else {
    log::debug!("Link target '{href}' does not exist, removing link");
    return RefAction::Clear;
  };

  if !has_markdown_extension(&target.to_string_lossy()) {
    log::debug!("Link target '{href}' is not a Markdown file, removing link");
    return RefAction::Clear;
  }

  match target.strip_prefix(&ctx.root) {
    Ok(relative) => {
      RefAction::Replace(format!("#{}", slug::page_id(&to_slash(relative))))
    },
    Err(_) => {
      log::debug!("Link target '{href}' lies outside the project root");
      RefAction::Clear
    },
  }
}

/// Trim and unify separators. Escapes stay encoded so they never change
/// which rule matches.
fn clean_reference(raw: &str) -> String {
  raw.trim().replace('\\', "/")
}

/// Apply the first matching rule to a raw `href` value.
#[must_use]
pub fn resolve_link(raw_href: &str, ctx: &ResolveContext) -> RefAction {
  let href = clean_reference(raw_href);
  LINK_RULES
    .iter()
    .find(|rule| (rule.matches)(&href))
    .map_or(RefAction::Keep, |rule| {
      let action = (rule.apply)(&href, ctx);
      log::trace!("Link '{raw_href}' matched rule '{}': {action:?}", rule.name);
      action
    })
}

/// Attributes an image reference resolves to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageRef {
  /// New `src`, `None` when the attribute stays as written.
  pub src:    Option<String>,
  pub style:  Option<&'static str>,
  pub width:  Option<String>,
  pub height: Option<String>,
  pub class:  Option<String>,
}

/// Split inline parameters off and resolve a raw `src` value.
#[must_use]
pub fn resolve_image(raw_src: &str, ctx: &ResolveContext) -> ImageRef {
  let src = clean_reference(raw_src);
  let mut parts = src.split('|');
  let base = parts.next().unwrap_or_default().trim();

  let mut image = ImageRef::default();
  for param in parts {
    let Some((key, value)) = param.split_once('=') else {
      continue;
    };
    let value = Some(value.trim().to_string());
    match key.trim().to_ascii_lowercase().as_str() {
      "width" => image.width = value,
      "height" => image.height = value,
      "class" => image.class = value,
      _ => {},
    }
  }

  if base.is_empty() {
    return image;
  }

  if EXTERNAL_RE.is_match(base) {
    image.src = Some(base.to_string());
    return image;
  }

  let resolved = if base.starts_with('/') {
    Some(format!("file://{base}"))
  } else if WINDOWS_DRIVE_RE.is_match(base) {
    Some(format!("file:///{base}"))
  } else {
    ctx
      .document_dir
      .join(decode_path(base))
      .canonicalize()
      .ok()
      .map(|abs| {
        let abs = abs.to_string_lossy().replace('\\', "/");
        format!("file:///{}", abs.trim_start_matches('/'))
      })
  };

  if let Some(src) = resolved {
    image.src = Some(src);
    image.style = Some("display:inline-block;");
  } else {
    log::debug!("Image '{base}' cannot be resolved, hiding it");
    image.src = Some(String::new());
    image.style = Some("display:none;");
  }
  image
}

/// Rewrite every `a[href]` and `img[src]` below `document`.
pub fn resolve_references(document: &NodeRef, ctx: &ResolveContext) {
  if let Ok(links) = document.select("a[href]") {
    for link in links.collect::<Vec<_>>() {
      let mut attributes = link.attributes.borrow_mut();
      let Some(href) = attributes.get(local_name!("href")).map(str::to_string)
      else {
        continue;
      };
      match resolve_link(&href, ctx) {
        RefAction::Keep => {},
        RefAction::Replace(value) => {
          attributes.insert(local_name!("href"), value);
        },
        RefAction::Clear => {
          attributes.remove(local_name!("href"));
        },
      }
    }
  }

  if let Ok(images) = document.select("img[src]") {
    for image in images.collect::<Vec<_>>() {
      let mut attributes = image.attributes.borrow_mut();
      let Some(src) = attributes.get(local_name!("src")).map(str::to_string)
      else {
        continue;
      };
      let resolved = resolve_image(&src, ctx);
      if let Some(width) = resolved.width {
        attributes.insert(local_name!("width"), width);
      }
      if let Some(height) = resolved.height {
        attributes.insert(local_name!("height"), height);
      }
      if let Some(class) = resolved.class {
        attributes.insert(local_name!("class"), class);
      }
      if let Some(src) = resolved.src {
        attributes.insert(local_name!("src"), src);
      }
      if let Some(style) = resolved.style {
        attributes.insert(local_name!("style"), style.to_string());
      }
    }
  }
}
