//! Precomputed gamma-correction tables.
//!
//! Gamma correction is the one transform step expensive enough per-sample
//! that it's always done through a lookup table rather than a `powf` call
//! per pixel. Tables are built eagerly, once, when a gamma pair is known
//! (file gamma plus the caller's assumed display gamma) rather than lazily
//! on first use, since a decoder always needs the 8-bit table by the time
//! the first row is unfiltered and the extra laziness would just move the
//! cost without removing it.

use alloc::vec::Vec;

/// Default sRGB-ish screen gamma assumed when a caller doesn't specify
/// their own display gamma, matching the value libpng treats as its
/// built-in default (2.2, matching CRT and most modern sRGB-calibrated
/// displays closely enough for this crate's non-ICC-managed gamma path).
pub const DEFAULT_SCREEN_GAMMA: f32 = 2.2;

/// Precomputed gamma lookup tables for 8-bit and 16-bit samples.
///
/// Built from `file_gamma` (usually from a `gAMA` chunk, or `1.0` if none is
/// present and the caller chose not to assume one) and `screen_gamma` (the
/// caller's display, defaulting to [`DEFAULT_SCREEN_GAMMA`]).
///
/// Besides the combined `file_gamma * screen_gamma` correction tables
/// (`table_8`/`table_16`), this also keeps a `file_gamma`-only pair of
/// to-linear/from-linear tables, so alpha compositing can happen in linear
/// light (see [`crate::transform::composite::composite_over_linear`])
/// before the combined correction runs.
#[derive(Debug, Clone)]
pub struct GammaTables {
  /// `table_8[sample] -> corrected sample`, for 8-bit channels.
  pub table_8: [u8; 256],
  /// `table_16[sample >> shift] -> corrected sample`, for 16-bit channels.
  /// Built at reduced resolution (`shift` bits trimmed) since a 65536-entry
  /// table buys negligible accuracy over one with far fewer entries, and
  /// costs 128 KiB to build for every image.
  pub table_16: Vec<u16>,
  pub shift_16: u32,
  /// `file_gamma`-only encode-to-linear table, 8-bit domain.
  to_linear_8_table: [u8; 256],
  /// `1/file_gamma`-only linear-to-encode table, 8-bit domain.
  from_linear_8_table: [u8; 256],
  /// `file_gamma`-only encode-to-linear table, reduced-resolution 16-bit
  /// domain (same `shift_16` trim as `table_16`).
  to_linear_16_table: Vec<u16>,
  /// `1/file_gamma`-only linear-to-encode table, same reduced resolution.
  from_linear_16_table: Vec<u16>,
}
impl GammaTables {
  /// Number of bits trimmed off a 16-bit sample before indexing `table_16`.
  const SHIFT_16: u32 = 8;

  /// Builds both the combined correction tables and the linear-light
  /// compositing tables.
  ///
  /// (`file_gamma / screen_gamma`, composed into one combined exponent as
  /// `screen_gamma * file_gamma` since PNG gamma values already are the
  /// reciprocal convention: a `gAMA` of `1/2.2` describes how the samples
  /// were encoded, and correcting for display requires raising to the
  /// `file_gamma * screen_gamma` power). The linear-light tables use
  /// `file_gamma` alone: they only undo/redo the file's own encoding, not
  /// the display correction, since that still has to run afterward.
  #[must_use]
  pub fn build(file_gamma: f32, screen_gamma: f32) -> Self {
    let exponent = file_gamma * screen_gamma;
    let mut table_8 = [0_u8; 256];
    for (i, slot) in table_8.iter_mut().enumerate() {
      let normalized = i as f32 / 255.0;
      *slot = (normalized.powf(exponent) * 255.0 + 0.5) as u8;
    }
    let shift = Self::SHIFT_16;
    let entries = (1_usize << (16 - shift)) + 1;
    let mut table_16 = Vec::with_capacity(entries);
    for i in 0..entries {
      let sample = (i << shift).min(65535) as f32;
      let normalized = sample / 65535.0;
      table_16.push((normalized.powf(exponent) * 65535.0 + 0.5) as u16);
    }

    let mut to_linear_8_table = [0_u8; 256];
    let mut from_linear_8_table = [0_u8; 256];
    for i in 0..256 {
      let normalized = i as f32 / 255.0;
      to_linear_8_table[i] = (normalized.powf(file_gamma) * 255.0 + 0.5) as u8;
      from_linear_8_table[i] = (normalized.powf(1.0 / file_gamma) * 255.0 + 0.5) as u8;
    }
    let mut to_linear_16_table = Vec::with_capacity(entries);
    let mut from_linear_16_table = Vec::with_capacity(entries);
    for i in 0..entries {
      let sample = (i << shift).min(65535) as f32;
      let normalized = sample / 65535.0;
      to_linear_16_table.push((normalized.powf(file_gamma) * 65535.0 + 0.5) as u16);
      from_linear_16_table.push((normalized.powf(1.0 / file_gamma) * 65535.0 + 0.5) as u16);
    }

    Self {
      table_8,
      table_16,
      shift_16: shift,
      to_linear_8_table,
      from_linear_8_table,
      to_linear_16_table,
      from_linear_16_table,
    }
  }

  /// An identity pair of tables, for when no gamma correction is needed.
  #[must_use]
  pub fn identity() -> Self {
    Self::build(1.0, 1.0)
  }

  #[inline]
  #[must_use]
  pub fn apply_8(&self, sample: u8) -> u8 {
    self.table_8[sample as usize]
  }

  #[inline]
  #[must_use]
  pub fn apply_16(&self, sample: u16) -> u16 {
    self.table_16[(sample >> self.shift_16) as usize]
  }

  #[inline]
  #[must_use]
  pub fn to_linear_8(&self, sample: u8) -> u8 {
    self.to_linear_8_table[sample as usize]
  }

  #[inline]
  #[must_use]
  pub fn from_linear_8(&self, sample: u8) -> u8 {
    self.from_linear_8_table[sample as usize]
  }

  #[inline]
  #[must_use]
  pub fn to_linear_16(&self, sample: u16) -> u16 {
    self.to_linear_16_table[(sample >> self.shift_16) as usize]
  }

  #[inline]
  #[must_use]
  pub fn from_linear_16(&self, sample: u16) -> u16 {
    self.from_linear_16_table[(sample >> self.shift_16) as usize]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn identity_tables_round_trip_exactly() {
    let tables = GammaTables::identity();
    assert_eq!(tables.apply_8(0), 0);
    assert_eq!(tables.apply_8(255), 255);
    assert_eq!(tables.apply_8(128), 128);
  }

  #[test]
  fn table_8_is_monotonic() {
    let tables = GammaTables::build(1.0 / 2.2, 2.2 * 1.1);
    for w in tables.table_8.windows(2) {
      assert!(w[0] <= w[1]);
    }
  }

  #[test]
  fn table_16_endpoints_match_table_8_endpoints() {
    let tables = GammaTables::build(0.45455, 2.2);
    assert_eq!(tables.apply_16(0), 0);
    assert_eq!(tables.apply_16(65535), 65535);
  }

  #[test]
  fn identity_linear_tables_round_trip_exactly() {
    let tables = GammaTables::identity();
    assert_eq!(tables.to_linear_8(128), 128);
    assert_eq!(tables.from_linear_8(128), 128);
    assert_eq!(tables.to_linear_16(40000), tables.apply_16(40000));
  }

  #[test]
  fn linear_round_trip_is_close_to_identity() {
    let tables = GammaTables::build(0.45455, 2.2);
    for &sample in &[0_u8, 10, 64, 128, 200, 255] {
      let round_tripped = tables.from_linear_8(tables.to_linear_8(sample));
      assert!((round_tripped as i32 - sample as i32).abs() <= 2, "sample={sample} round_tripped={round_tripped}");
    }
  }
}
