//! Palette quantization: reducing a truecolor image to indexed color, or
//! reducing an oversized palette to a caller's target size.
//!
//! Two pieces, matching libpng's `png_do_quantize`/`png_set_quantize`:
//! building a reduced palette from a histogram (nearest-pair merge rather
//! than a full clustering algorithm), and a fixed 5-bits-per-channel cube
//! used to map arbitrary RGB samples to their nearest reduced-palette entry
//! without a linear scan per pixel.

use crate::chunks::Rgb8;
use alloc::vec::Vec;

/// Distance-squared between two colors in RGB space.
#[inline]
fn distance2(a: Rgb8, b: Rgb8) -> u32 {
  let dr = a.r as i32 - b.r as i32;
  let dg = a.g as i32 - b.g as i32;
  let db = a.b as i32 - b.b as i32;
  (dr * dr + dg * dg + db * db) as u32
}

/// Reduces a palette (with per-entry usage counts from a histogram, or a
/// uniform count of `1` if no histogram is available) to at most
/// `max_colors` entries by repeatedly merging the least-used entry into its
/// nearest remaining neighbor.
///
/// Returns the reduced palette and a remap table from old index to new
/// index, the same shape libpng's quantization pass produces so that
/// pixel data can be re-indexed in a single second pass.
#[must_use]
pub fn reduce_palette(entries: &[Rgb8], counts: &[u32], max_colors: usize) -> (Vec<Rgb8>, Vec<u8>) {
  assert_eq!(entries.len(), counts.len());
  let mut colors: Vec<Rgb8> = entries.to_vec();
  let mut weights: Vec<u32> = counts.to_vec();
  let mut remap: Vec<u8> = (0..entries.len() as u8).collect();

  while colors.len() > max_colors {
    let (least_idx, _) = weights
      .iter()
      .enumerate()
      .min_by_key(|&(_, &w)| w)
      .expect("colors is non-empty while len > max_colors >= 0");
    let least_color = colors[least_idx];
    let nearest_idx = colors
      .iter()
      .enumerate()
      .filter(|&(i, _)| i != least_idx)
      .min_by_key(|&(_, &c)| distance2(c, least_color))
      .map(|(i, _)| i)
      .expect("at least two colors remain while merging");

    let merged_weight = weights[least_idx] + weights[nearest_idx];
    weights[nearest_idx] = merged_weight;
    colors.remove(least_idx);
    weights.remove(least_idx);

    for slot in remap.iter_mut() {
      let cur = *slot as usize;
      if cur == least_idx {
        *slot = if nearest_idx > least_idx { nearest_idx - 1 } else { nearest_idx } as u8;
      } else if cur > least_idx {
        *slot -= 1;
      }
    }
  }
  (colors, remap)
}

/// Bits per channel in the nearest-color lookup cube. 5 bits (32 levels)
/// per channel keeps the cube at 32KiB while staying well under visible
/// quantization error for photographic content, matching libpng's default.
const CUBE_BITS: u32 = 5;
const CUBE_SIZE: usize = 1 << CUBE_BITS;

/// A precomputed nearest-neighbor lookup from a coarse RGB cube to a
/// reduced palette's indices, avoiding an O(palette size) scan per pixel.
#[derive(Debug, Clone)]
pub struct QuantizeCube {
  table: Vec<u8>,
}
impl QuantizeCube {
  #[must_use]
  pub fn build(palette: &[Rgb8]) -> Self {
    let mut table = alloc::vec![0_u8; CUBE_SIZE * CUBE_SIZE * CUBE_SIZE];
    let shift = 8 - CUBE_BITS;
    for r in 0..CUBE_SIZE {
      for g in 0..CUBE_SIZE {
        for b in 0..CUBE_SIZE {
          let sample =
            Rgb8 { r: (r << shift) as u8, g: (g << shift) as u8, b: (b << shift) as u8 };
          let nearest = palette
            .iter()
            .enumerate()
            .min_by_key(|&(_, &c)| distance2(c, sample))
            .map_or(0, |(i, _)| i as u8);
          table[(r << (2 * CUBE_BITS)) | (g << CUBE_BITS) | b] = nearest;
        }
      }
    }
    Self { table }
  }

  #[inline]
  #[must_use]
  pub fn nearest_index(&self, color: Rgb8) -> u8 {
    let shift = 8 - CUBE_BITS;
    let r = (color.r as usize) >> shift;
    let g = (color.g as usize) >> shift;
    let b = (color.b as usize) >> shift;
    self.table[(r << (2 * CUBE_BITS)) | (g << CUBE_BITS) | b]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reduce_palette_is_noop_under_target() {
    let entries = [Rgb8 { r: 0, g: 0, b: 0 }, Rgb8 { r: 255, g: 255, b: 255 }];
    let counts = [10, 5];
    let (reduced, remap) = reduce_palette(&entries, &counts, 4);
    assert_eq!(reduced.len(), 2);
    assert_eq!(remap, alloc::vec![0, 1]);
  }

  #[test]
  fn reduce_palette_merges_down_to_target() {
    let entries = [
      Rgb8 { r: 0, g: 0, b: 0 },
      Rgb8 { r: 1, g: 0, b: 0 },
      Rgb8 { r: 255, g: 255, b: 255 },
    ];
    let counts = [1, 100, 50];
    let (reduced, remap) = reduce_palette(&entries, &counts, 2);
    assert_eq!(reduced.len(), 2);
    assert_eq!(remap.len(), 3);
    // Entry 0 (the least used) should merge into entry 1 (its nearest neighbor).
    assert_eq!(remap[0], remap[1]);
  }

  #[test]
  fn cube_finds_exact_palette_colors() {
    let palette = [Rgb8 { r: 0, g: 0, b: 0 }, Rgb8 { r: 255, g: 0, b: 0 }];
    let cube = QuantizeCube::build(&palette);
    assert_eq!(cube.nearest_index(Rgb8 { r: 0, g: 0, b: 0 }), 0);
    assert_eq!(cube.nearest_index(Rgb8 { r: 255, g: 0, b: 0 }), 1);
  }
}
