//! `tEXt`/`zTXt`/`iTXt`: the three textual-data chunk types, unified into one
//! tagged value instead of three separate payload structs.
//!
//! The three chunk types differ only in whether the text is compressed and
//! whether it carries a language tag, so they're collapsed here into a
//! single [`TextChunk`] with a [`TextCompression`] tag rather than kept as
//! three parallel structs a caller has to match on separately.

use alloc::string::String;

/// Validates and canonicalizes a `tEXt`/`zTXt`/`iTXt` keyword per the PNG
/// keyword rules: 1-79 Latin-1 printable characters (codes 32-126 or
/// 161-255), no leading, trailing, or consecutive spaces. Collapses runs of
/// interior spaces down to one instead of rejecting them outright, since
/// that's the one keyword defect libpng's own writer silently repairs
/// rather than treats as fatal; everything else returns `None`.
#[must_use]
pub(crate) fn canonicalize_keyword(raw: &str) -> Option<String> {
  let trimmed = raw.trim_matches(' ');
  if trimmed.is_empty() {
    return None;
  }
  let mut out = String::with_capacity(trimmed.len());
  let mut prev_was_space = false;
  for ch in trimmed.chars() {
    let code = ch as u32;
    let printable = (32..=126).contains(&code) || (161..=255).contains(&code);
    if !printable {
      return None;
    }
    if ch == ' ' {
      if prev_was_space {
        continue;
      }
      prev_was_space = true;
    } else {
      prev_was_space = false;
    }
    out.push(ch);
  }
  if out.is_empty() || out.len() > 79 {
    return None;
  }
  Some(out)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn trims_leading_and_trailing_spaces() {
    assert_eq!(canonicalize_keyword("  Title  ").as_deref(), Some("Title"));
  }

  #[test]
  fn collapses_interior_space_runs() {
    assert_eq!(canonicalize_keyword("Creation   Time").as_deref(), Some("Creation Time"));
  }

  #[test]
  fn rejects_empty_keyword() {
    assert_eq!(canonicalize_keyword(""), None);
    assert_eq!(canonicalize_keyword("   "), None);
  }

  #[test]
  fn rejects_control_characters() {
    assert_eq!(canonicalize_keyword("Ti\ttle"), None);
  }

  #[test]
  fn rejects_keyword_over_79_bytes() {
    let long: String = core::iter::repeat('a').take(80).collect();
    assert_eq!(canonicalize_keyword(&long), None);
  }

  #[test]
  fn accepts_latin1_high_range_characters() {
    assert_eq!(canonicalize_keyword("Caf\u{00e9}").as_deref(), Some("Caf\u{00e9}"));
  }
}

/// Whether a [`TextChunk`]'s text arrived compressed, and under what scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextCompression {
  /// `tEXt`, or `iTXt` with the compression flag clear: stored as-is.
  None,
  /// `zTXt`, or `iTXt` with the compression flag set: zlib-compressed, using
  /// the one compression method PNG defines (method 0, deflate).
  Zlib,
}

/// A decoded keyword/text pair from a `tEXt`, `zTXt`, or `iTXt` chunk.
///
/// `text` already went through [`TextCompression::Zlib`] decompression by
/// the time this value is produced; `compression` just records which wire
/// chunk it came from, for a caller that cares.
#[derive(Debug, Clone)]
pub struct TextChunk {
  /// Latin-1 keyword, e.g. `"Title"` or `"Author"`.
  pub keyword: String,
  /// BCP-47 language tag; empty for `tEXt`/`zTXt`, which have none.
  pub language_tag: String,
  /// The keyword translated into `language_tag`; empty when absent.
  pub translated_keyword: String,
  /// The text itself. Latin-1 for `tEXt`/`zTXt`, UTF-8 for `iTXt`.
  pub text: String,
  pub compression: TextCompression,
}
