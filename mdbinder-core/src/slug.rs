//! Anchor identifiers for headings and pages.
//!
//! Heading ids are unique for the lifetime of one [`SlugAssigner`], which is
//! shared by every document of an assembly run. Page ids are derived from the
//! source path and are not deduplicated.
use std::{collections::HashSet, path::Path, sync::LazyLock};

use log::trace;
use regex::Regex;

use crate::utils::never_matching_regex;

static SEPARATOR_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"[\s./+~:-]+").unwrap_or_else(|e| {
    log::error!("Failed to compile SEPARATOR_RUN_RE regex: {e}");
    never_matching_regex()
  })
});

/// ASCII replacement for the characters that have one.
const fn transliterate(c: char) -> Option<&'static str> {
  let replacement = match c {
    'Ä' => "Ae",
    'ä' => "ae",
    'Ö' => "Oe",
    'ö' => "oe",
    'Ü' => "Ue",
    'ü' => "ue",
    'ß' => "ss",
    'ë' | 'ê' | 'è' | 'é' => "e",
    'Ë' | 'Ê' | 'È' | 'É' => "E",
    'ž' => "z",
    'Ž' => "Z",
    'û' | 'ù' | 'ú' => "u",
    'Û' | 'Ù' | 'Ú' => "U",
    'ï' | 'î' | 'ì' | 'í' => "i",
    'Ï' | 'Î' | 'Ì' | 'Í' => "I",
    'ô' | 'ò' | 'ó' => "o",
    'Ô' | 'Ò' | 'Ó' => "O",
    'ø' => "oe",
    'Ø' => "Oe",
    'â' | 'à' | 'á' => "a",
    'Â' | 'À' | 'Á' => "A",
    'æ' => "ae",
    'Æ' => "Ae",
    'š' => "s",
    'Š' => "S",
    'ý' | 'ÿ' => "y",
    'Ý' | 'Ÿ' => "Y",
    'ç' => "c",
    'Ç' => "C",
    'ñ' => "n",
    'Ñ' => "N",
    '€' => "EUR",
    '£' => "L",
    '¥' => "Yen",
    '–' | ' ' | '.' | ':' | '-' | '/' | '$' => "_",
    _ => return None,
  };
  Some(replacement)
}

/// Turn arbitrary text into an anchor-safe word made of `[A-Za-z0-9_]`.
///
/// Case is preserved; heading ids lower-case the result, page ids do not.
#[must_use]
pub fn to_word(text: &str) -> String {
  let joined = SEPARATOR_RUN_RE.replace_all(text.trim(), "_");

  let mut word = String::with_capacity(joined.len());
  for c in joined.chars() {
    if let Some(replacement) = transliterate(c) {
      word.push_str(replacement);
    } else if c.is_ascii_alphanumeric() || c == '_' {
      word.push(c);
    }
  }
  word
}

/// Normalize heading text into a lower-cased base id.
///
/// Applying this to its own output returns the output unchanged.
#[must_use]
pub fn normalize(text: &str) -> String {
  to_word(text).to_ascii_lowercase()
}

/// Derive the page anchor of a source document from its root-relative path.
///
/// The extension is dropped and `\` is treated like `/`.
#[must_use]
pub fn page_id(path: &str) -> String {
  let path = path.replace('\\', "/");
  let stem = Path::new(&path)
    .extension()
    .and_then(|ext| ext.to_str())
    .map_or(path.as_str(), |ext| &path[..path.len() - ext.len() - 1]);
  to_word(stem)
}

/// Run-scoped generator of unique heading ids.
#[derive(Debug, Default, Clone)]
pub struct SlugAssigner {
  used: HashSet<String>,
}

impl SlugAssigner {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Assign the id for the next heading of the run.
  ///
  /// Collisions get an increasing numeric suffix, so two `Überblick`
  /// headings become `ueberblick` and `ueberblick1`. A base that normalizes
  /// to nothing starts at suffix `1`.
  pub fn assign(&mut self, heading_text: &str) -> String {
    let base = normalize(heading_text);

    let mut candidate = base.clone();
    let mut suffix = 0_u64;
    while candidate.is_empty() || self.used.contains(&candidate) {
      suffix += 1;
      candidate = format!("{base}{suffix}");
    }

    if suffix > 0 {
      trace!("Heading id '{base}' already taken, using '{candidate}'");
    }
    self.used.insert(candidate.clone());
    candidate
  }

  /// Mark `id` as taken without handing it out, so no heading receives it.
  pub fn reserve(&mut self, id: &str) {
    self.used.insert(id.to_string());
  }

  /// Whether `id` was handed out or reserved during this run.
  #[must_use]
  pub fn is_used(&self, id: &str) -> bool {
    self.used.contains(id)
  }

  /// Number of ids taken so far.
  #[must_use]
  pub fn len(&self) -> usize {
    self.used.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.used.is_empty()
  }
}
