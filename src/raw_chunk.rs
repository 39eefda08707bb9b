//! Unparsed chunk framing: the signature, the length/type/data/CRC layout,
//! and the four naming-convention bits every chunk type carries.

use crate::{Crc32, PngError};
use core::fmt::{self, Debug, Write as _};

/// The first eight bytes of every PNG byte stream.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// A four-byte chunk type name, with the naming-convention bits broken out.
///
/// Each byte's case encodes a property of the chunk: ancillary/critical,
/// private/public, reserved, safe-to-copy. See the GLOSSARY entry for
/// "ancillary chunk" in the design notes this crate was built from.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ChunkName(pub [u8; 4]);
impl ChunkName {
  /// True if this chunk must be understood for the image to be valid
  /// (uppercase first letter).
  #[inline]
  #[must_use]
  pub const fn is_critical(self) -> bool {
    self.0[0].is_ascii_uppercase()
  }

  /// True if this chunk is defined by the core PNG spec rather than a
  /// vendor extension (uppercase second letter).
  #[inline]
  #[must_use]
  pub const fn is_public(self) -> bool {
    self.0[1].is_ascii_uppercase()
  }

  /// Must currently always be uppercase; reserved for future use.
  #[inline]
  #[must_use]
  pub const fn is_reserved_bit_set(self) -> bool {
    self.0[2].is_ascii_lowercase()
  }

  /// True if an editor that doesn't understand this chunk may still copy it
  /// unmodified into a derived image (lowercase fourth letter).
  #[inline]
  #[must_use]
  pub const fn is_safe_to_copy(self) -> bool {
    self.0[3].is_ascii_lowercase()
  }

  #[inline]
  #[must_use]
  pub const fn as_bytes(self) -> [u8; 4] {
    self.0
  }
}
impl Debug for ChunkName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for &b in &self.0 {
      f.write_char(b as char)?;
    }
    Ok(())
  }
}
impl PartialEq<&[u8; 4]> for ChunkName {
  #[inline]
  fn eq(&self, other: &&[u8; 4]) -> bool {
    &self.0 == *other
  }
}

/// An unparsed chunk straight off the wire: type name, data, and the CRC-32
/// the encoder claimed for `type ++ data`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RawChunk<'b> {
  pub name: ChunkName,
  pub data: &'b [u8],
  pub declared_crc: u32,
}
impl Debug for RawChunk<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RawChunk")
      .field("name", &self.name)
      .field("data_len", &self.data.len())
      .field("declared_crc", &self.declared_crc)
      .finish()
  }
}
impl<'b> RawChunk<'b> {
  /// Recomputes the CRC-32 over this chunk's name and data and compares it
  /// against [`Self::declared_crc`].
  #[inline]
  #[must_use]
  pub fn crc_is_valid(&self) -> bool {
    Crc32::of_chunk(self.name.as_bytes(), self.data) == self.declared_crc
  }
}

/// Splits a PNG byte stream into successive [`RawChunk`]s.
///
/// The signature is checked once, up front, by [`RawChunkIter::new`]; after
/// that the iterator yields `Err(PngError::TruncatedChunk)` once and then
/// stops if the remaining bytes don't form a complete chunk.
#[derive(Debug, Clone)]
pub struct RawChunkIter<'b> {
  rest: &'b [u8],
  done: bool,
}
impl<'b> RawChunkIter<'b> {
  /// Checks the PNG signature and returns an iterator over the chunks that
  /// follow it.
  pub fn new(bytes: &'b [u8]) -> Result<Self, PngError> {
    match bytes {
      [s0, s1, s2, s3, s4, s5, s6, s7, rest @ ..]
        if [*s0, *s1, *s2, *s3, *s4, *s5, *s6, *s7] == PNG_SIGNATURE =>
      {
        Ok(Self { rest, done: false })
      }
      _ => Err(PngError::NotAPngFile),
    }
  }
}
impl<'b> Iterator for RawChunkIter<'b> {
  type Item = Result<RawChunk<'b>, PngError>;
  fn next(&mut self) -> Option<Self::Item> {
    if self.done {
      return None;
    }
    if self.rest.is_empty() {
      return None;
    }
    let mut truncated = || {
      self.done = true;
      Some(Err(PngError::TruncatedChunk))
    };
    let Some((len_bytes, after_len)) = split_at_checked(self.rest, 4) else {
      return truncated();
    };
    let len = u32::from_be_bytes(len_bytes.try_into().unwrap());
    if len > 0x7FFF_FFFF {
      self.done = true;
      return Some(Err(PngError::ChunkLengthTooLarge));
    }
    let Some((name_bytes, after_name)) = split_at_checked(after_len, 4) else {
      return truncated();
    };
    let name = ChunkName(name_bytes.try_into().unwrap());
    let Some((data, after_data)) = split_at_checked(after_name, len as usize) else {
      return truncated();
    };
    let Some((crc_bytes, after_crc)) = split_at_checked(after_data, 4) else {
      return truncated();
    };
    let declared_crc = u32::from_be_bytes(crc_bytes.try_into().unwrap());
    self.rest = after_crc;
    if name == b"IEND" {
      self.done = true;
    }
    Some(Ok(RawChunk { name, data, declared_crc }))
  }
}

fn split_at_checked(bytes: &[u8], mid: usize) -> Option<(&[u8], &[u8])> {
  if bytes.len() >= mid {
    Some(bytes.split_at(mid))
  } else {
    None
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rejects_bad_signature() {
    assert_eq!(RawChunkIter::new(b"not a png"), Err(PngError::NotAPngFile));
  }

  #[test]
  fn name_bit_classification() {
    let ihdr = ChunkName(*b"IHDR");
    assert!(ihdr.is_critical());
    assert!(ihdr.is_public());
    assert!(!ihdr.is_safe_to_copy());

    let unknown_private_safe = ChunkName(*b"prIV");
    assert!(!unknown_private_safe.is_critical());
    assert!(!unknown_private_safe.is_public());
    assert!(unknown_private_safe.is_safe_to_copy());
  }

  #[test]
  fn rejects_a_length_above_the_2_31_minus_1_cap() {
    let mut bytes = PNG_SIGNATURE.to_vec();
    bytes.extend_from_slice(&0x8000_0000_u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    let mut it = RawChunkIter::new(&bytes).unwrap();
    assert_eq!(it.next(), Some(Err(PngError::ChunkLengthTooLarge)));
    assert_eq!(it.next(), None);
  }

  #[test]
  fn iterates_two_chunks_then_stops_at_iend() {
    let mut bytes = PNG_SIGNATURE.to_vec();
    // IHDR with empty data (not valid PNG, fine for this structural test)
    bytes.extend_from_slice(&0_u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&Crc32::of_chunk(*b"IHDR", &[]).to_be_bytes());
    bytes.extend_from_slice(&0_u32.to_be_bytes());
    bytes.extend_from_slice(b"IEND");
    bytes.extend_from_slice(&Crc32::of_chunk(*b"IEND", &[]).to_be_bytes());

    let chunks: Vec<_> = RawChunkIter::new(&bytes).unwrap().collect::<Result<_, _>>().unwrap();
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].name, b"IHDR");
    assert_eq!(chunks[1].name, b"IEND");
  }
}
