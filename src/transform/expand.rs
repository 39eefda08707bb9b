//! Expansion steps: sub-byte samples to one-per-byte, palette indices to
//! RGB(A), and `tRNS` keys to an explicit alpha channel.

use crate::{ColorType, Ihdr, Palette, Transparency};
use alloc::vec::Vec;
use bitfrob::{u8_bit_split_1x8_rev, u8_bit_split_2x4_rev, u8_bit_split_4x2_rev};

/// Expands a packed sub-8-bit grayscale or indexed scanline (as produced by
/// unfiltering) into one sample per byte, left-to-right.
#[must_use]
pub fn expand_packed_samples(bit_depth: u8, width: u32, packed: &[u8]) -> Vec<u8> {
  let width = width as usize;
  let mut out = Vec::with_capacity(width);
  match bit_depth {
    1 => {
      for byte in packed {
        out.extend(u8_bit_split_1x8_rev(*byte));
      }
    }
    2 => {
      for byte in packed {
        out.extend(u8_bit_split_2x4_rev(*byte));
      }
    }
    4 => {
      for byte in packed {
        out.extend(u8_bit_split_4x2_rev(*byte));
      }
    }
    8 => out.extend_from_slice(packed),
    _ => unreachable!("expand_packed_samples only handles sub-8-bit and 8-bit depths"),
  }
  out.truncate(width);
  out
}

/// Scales a sub-8-bit sample up to fill a full byte (`0..=15` at 4-bit
/// depth becomes `0..=255`, evenly spread, rather than left-shifted and
/// left with black in the low bits). Matches the PNG spec's required
/// "bit replication" expansion, not a naive shift.
#[must_use]
pub fn replicate_to_byte(bit_depth: u8, sample: u8) -> u8 {
  bitfrob::u8_replicate_bits(bit_depth as u32, sample)
}

/// Looks up a palette index, returning the RGB triple (and `255` alpha,
/// since the caller applies `tRNS` separately).
#[must_use]
pub fn palette_lookup(palette: &Palette, index: u8) -> Option<crate::chunks::Rgb8> {
  palette.entries.get(index as usize).copied()
}

/// The alpha value a `tRNS` chunk implies for one gray/RGB/indexed sample.
#[must_use]
pub fn transparency_alpha(
  trns: &Transparency, color_type: ColorType, gray_or_index: u16, rgb: Option<(u16, u16, u16)>,
) -> u8 {
  match (trns, color_type) {
    (Transparency::Gray { gray }, ColorType::Gray) => {
      if *gray == gray_or_index {
        0
      } else {
        255
      }
    }
    (Transparency::Rgb { r, g, b }, ColorType::Rgb) => {
      if let Some((rr, gg, bb)) = rgb {
        if *r == rr && *g == gg && *b == bb {
          0
        } else {
          255
        }
      } else {
        255
      }
    }
    (Transparency::Palette { alphas }, ColorType::Indexed) => {
      alphas.get(gray_or_index as usize).copied().unwrap_or(255)
    }
    _ => 255,
  }
}

/// Whether `ihdr`'s color type/bit depth combination needs sub-byte
/// expansion at all.
#[must_use]
pub fn needs_bit_expansion(ihdr: &Ihdr) -> bool {
  ihdr.bit_depth < 8 && matches!(ihdr.color_type, ColorType::Gray | ColorType::Indexed)
}
