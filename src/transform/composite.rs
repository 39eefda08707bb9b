//! Color-space steps: RGB<->grayscale conversion and alpha compositing.

/// ITU-R BT.601 luma weights, matching what libpng's `png_do_rgb_to_gray`
/// uses by default in the absence of `cHRM`-derived weights.
const LUMA_R: u32 = 6968;
const LUMA_G: u32 = 23434;
const LUMA_B: u32 = 2366;
const LUMA_SHIFT: u32 = 15;

/// Converts one RGB sample (any bit depth, as a widened value) to
/// grayscale luminance at the same bit width.
#[must_use]
pub fn rgb_to_gray(r: u16, g: u16, b: u16) -> u16 {
  let sum = (r as u32) * LUMA_R + (g as u32) * LUMA_G + (b as u32) * LUMA_B;
  (sum >> LUMA_SHIFT) as u16
}

/// Composites one premultiplied-nothing (straight alpha) sample over a
/// background sample, in the sample's own bit depth (8 or 16).
///
/// `max` is the sample's maximum value (`255` or `65535`); compositing
/// happens in the sample's own gamma space per this crate's non-ICC gamma
/// model (§9's open question on 16-bit compositing: resolved by operating
/// on the raw stored sample, not a linearized one, matching libpng's
/// default `png_do_compose` behavior when no gamma table is active).
#[must_use]
pub fn composite_over(sample: u32, alpha: u32, background: u32, max: u32) -> u16 {
  let composited = (sample * alpha + background * (max - alpha)) / max;
  composited as u16
}

/// Composites one sample over a background sample in linear light: both
/// are brought out of the file's own gamma encoding via
/// [`crate::GammaTables::to_linear_8`]/`to_linear_16` first, blended, then
/// brought back via the matching `from_linear_*` table. This is what
/// `composite_over` alone can't do: blending directly on gamma-encoded
/// samples darkens partially-transparent edges relative to how the image
/// was actually authored.
#[must_use]
pub fn composite_over_linear(
  sample: u16, alpha: u32, background: u16, max: u32, tables: &crate::GammaTables, is_16_bit: bool,
) -> u16 {
  if is_16_bit {
    let lin_sample = tables.to_linear_16(sample) as u32;
    let lin_bg = tables.to_linear_16(background) as u32;
    let composited = (lin_sample * alpha + lin_bg * (max - alpha)) / max;
    tables.from_linear_16(composited as u16)
  } else {
    let lin_sample = tables.to_linear_8(sample as u8) as u32;
    let lin_bg = tables.to_linear_8(background as u8) as u32;
    let composited = (lin_sample * alpha + lin_bg * (max - alpha)) / max;
    tables.from_linear_8(composited as u8) as u16
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fully_opaque_keeps_foreground() {
    assert_eq!(composite_over(200, 255, 0, 255), 200);
  }

  #[test]
  fn linear_compose_matches_raw_compose_under_identity_gamma() {
    let tables = crate::GammaTables::identity();
    assert_eq!(composite_over_linear(200, 128, 50, 255, &tables, false), composite_over(200, 128, 50, 255));
  }

  #[test]
  fn linear_compose_fully_opaque_keeps_foreground() {
    let tables = crate::GammaTables::build(0.45455, 2.2);
    let result = composite_over_linear(200, 255, 0, 255, &tables, false);
    assert!((result as i32 - 200).abs() <= 2, "result={result}");
  }

  #[test]
  fn fully_transparent_shows_background() {
    assert_eq!(composite_over(200, 0, 50, 255), 50);
  }

  #[test]
  fn white_rgb_is_full_luminance() {
    assert_eq!(rgb_to_gray(255, 255, 255), 255);
  }

  #[test]
  fn black_rgb_is_zero_luminance() {
    assert_eq!(rgb_to_gray(0, 0, 0), 0);
  }
}
