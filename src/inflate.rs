//! The zlib/DEFLATE glue between `IDAT`/`iCCP`/compressed-text chunk bytes
//! and the raw filtered scanline bytes those chunks decompress to.
//!
//! Two modes, matching the two situations a PNG decoder actually needs:
//!
//! - **Streamed** ([`InflateOwner::streamed`]): the `IDAT` chunk bytes are
//!   fed in as they arrive and decompressed straight into a caller-sized
//!   buffer computed from the image dimensions. No guessing at an output
//!   size; the buffer is exactly as large as the unfiltered image requires.
//! - **Two-pass** ([`InflateOwner::two_pass`]): used for `iCCP` and
//!   compressed text, where the decompressed size isn't known up front.
//!   Capped by a size limit so a hostile chunk can't force an unbounded
//!   allocation, mirroring the cap libpng added to `png_inflate` after CVEs
//!   from runaway `zTXt`/`iCCP` chunks.

use alloc::vec::Vec;
use miniz_oxide::inflate::{
  core::{
    decompress,
    inflate_flags::{
      TINFL_FLAG_HAS_MORE_INPUT, TINFL_FLAG_IGNORE_ADLER32, TINFL_FLAG_PARSE_ZLIB_HEADER,
      TINFL_FLAG_USING_NON_WRAPPING_OUTPUT_BUF,
    },
    DecompressorOxide,
  },
  TINFLStatus,
};

/// What went wrong while inflating a zlib stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InflateError {
  /// The stream is malformed (bad header, bad Huffman tables, bad block).
  Corrupt,
  /// The stream decompressed to more bytes than the destination buffer
  /// holds.
  Overflow,
  /// Input ran out mid-stream with no more chunks to feed.
  Truncated,
  /// A two-pass decompression exceeded its configured size cap.
  SizeLimitExceeded,
}

/// Owns the claim on a `DecompressorOxide` instance across however many
/// input chunks a stream is split into ([`IDAT`] contiguity means this is
/// usually all of them at once, but the streamed API doesn't require that).
pub struct InflateOwner {
  inner: DecompressorOxide,
  zlib_header_pending: bool,
}
impl Default for InflateOwner {
  fn default() -> Self {
    Self::new()
  }
}
impl InflateOwner {
  #[must_use]
  pub fn new() -> Self {
    Self { inner: DecompressorOxide::new(), zlib_header_pending: true }
  }

  /// Feeds one more input buffer, decompressing into `out` starting at
  /// `out_pos`. Returns the number of bytes written this call. Call with
  /// `has_more = false` on the final input buffer.
  pub fn feed(&mut self, in_buf: &[u8], out: &mut [u8], out_pos: usize, has_more: bool) -> Result<usize, InflateError> {
    let flags = if self.zlib_header_pending { TINFL_FLAG_PARSE_ZLIB_HEADER } else { 0 }
      | TINFL_FLAG_USING_NON_WRAPPING_OUTPUT_BUF
      | TINFL_FLAG_IGNORE_ADLER32
      | if has_more { TINFL_FLAG_HAS_MORE_INPUT } else { 0 };
    let (status, _input_read, bytes_written) = decompress(&mut self.inner, in_buf, out, out_pos, flags);
    self.zlib_header_pending = false;
    match status {
      TINFLStatus::Done | TINFLStatus::Adler32Mismatch => Ok(bytes_written),
      TINFLStatus::NeedsMoreInput | TINFLStatus::FailedCannotMakeProgress => {
        if has_more {
          Ok(bytes_written)
        } else {
          Err(InflateError::Truncated)
        }
      }
      TINFLStatus::BadParam | TINFLStatus::Failed => Err(InflateError::Corrupt),
      TINFLStatus::HasMoreOutput => Err(InflateError::Overflow),
    }
  }

  /// Decompresses a complete sequence of input chunks into an exactly-sized
  /// output buffer (the streamed mode). This is the `IDAT` path: the image
  /// dimensions already tell us exactly how many filtered bytes to expect.
  pub fn streamed<'a>(out: &mut [u8], chunks: impl Iterator<Item = &'a [u8]>) -> Result<usize, InflateError> {
    let mut owner = Self::new();
    let mut chunks = chunks.peekable();
    let mut out_pos = 0;
    while let Some(in_buf) = chunks.next() {
      let has_more = chunks.peek().is_some();
      out_pos += owner.feed(in_buf, out, out_pos, has_more)?;
    }
    Ok(out_pos)
  }

  /// Decompresses a single zlib buffer of unknown output size (the
  /// `iCCP`/compressed-text path), growing a `Vec` up to `size_cap` bytes.
  pub fn two_pass(zlib_data: &[u8], size_cap: usize) -> Result<Vec<u8>, InflateError> {
    let mut out = Vec::new();
    let mut capacity = (zlib_data.len() * 4).clamp(256, size_cap);
    loop {
      out.clear();
      out.resize(capacity, 0);
      let mut owner = Self::new();
      match owner.feed(zlib_data, &mut out, 0, false) {
        Ok(written) => {
          out.truncate(written);
          return Ok(out);
        }
        Err(InflateError::Overflow) if capacity < size_cap => {
          capacity = (capacity * 2).min(size_cap);
        }
        Err(InflateError::Overflow) => return Err(InflateError::SizeLimitExceeded),
        Err(e) => return Err(e),
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn zlib_compress(data: &[u8]) -> Vec<u8> {
    miniz_oxide::deflate::compress_to_vec_zlib(data, 6)
  }

  #[test]
  fn streamed_round_trips_small_buffer() {
    let plain = b"the quick brown fox jumps over the lazy dog";
    let compressed = zlib_compress(plain);
    let mut out = [0_u8; 64];
    let written = InflateOwner::streamed(&mut out, core::iter::once(compressed.as_slice())).unwrap();
    assert_eq!(&out[..written], plain.as_slice());
  }

  #[test]
  fn streamed_detects_undersized_buffer() {
    let plain = vec![7_u8; 1000];
    let compressed = zlib_compress(&plain);
    let mut out = [0_u8; 16];
    assert_eq!(
      InflateOwner::streamed(&mut out, core::iter::once(compressed.as_slice())),
      Err(InflateError::Overflow)
    );
  }

  #[test]
  fn two_pass_recovers_unknown_size() {
    let plain = vec![42_u8; 10_000];
    let compressed = zlib_compress(&plain);
    let out = InflateOwner::two_pass(&compressed, 1 << 20).unwrap();
    assert_eq!(out, plain);
  }

  #[test]
  fn two_pass_enforces_size_cap() {
    let plain = vec![1_u8; 10_000];
    let compressed = zlib_compress(&plain);
    assert_eq!(InflateOwner::two_pass(&compressed, 100), Err(InflateError::SizeLimitExceeded));
  }
}
