//! The pixel-transform pipeline: everything that turns "unfiltered,
//! deinterlaced samples in the file's own color type and bit depth" into
//! the pixel format a caller actually wants.
//!
//! Transform steps run in a fixed order (expand, strip/composite alpha,
//! color conversion, gamma, bit-depth scaling, quantize, channel reorder,
//! byte order, packing) because several of them are only correct in that
//! order: gamma correction has to run on linear-ish RGB before an RGB-to-
//! gray conversion, which has to run before any 16-to-8 scaling, which has
//! to run before a palette quantization pass. [`TransformPipeline::apply`]
//! is the single place that order is encoded.

pub mod composite;
pub mod expand;
pub mod quantize;
pub mod scale;

use crate::chunks::Rgb8;
use crate::{ColorType, GammaTables, Ihdr, TransformConfig};
use alloc::vec::Vec;

/// One fully-expanded pixel's channel samples, widened to `u16` so every
/// step (gamma, compositing, scaling) operates on one representation
/// regardless of the image's native bit depth.
pub type Sample = u16;

/// Applies a [`TransformConfig`] to a row of fully-expanded (one sample per
/// channel per byte-or-u16, no sub-byte packing, no palette indices)
/// pixels, writing the result back in place.
///
/// Expects `row` already deinterlaced and with palette/tRNS/bit-expansion
/// done by the caller (that step needs the image's palette, which this
/// pipeline doesn't own); `channels_in` is the channel count per pixel
/// *before* this call (post-expansion).
pub struct TransformPipeline<'a> {
  pub config: &'a TransformConfig,
  pub gamma_tables: Option<&'a GammaTables>,
  pub is_16_bit: bool,
  quantize_cube: Option<quantize::QuantizeCube>,
}
impl<'a> TransformPipeline<'a> {
  #[must_use]
  pub fn new(config: &'a TransformConfig, gamma_tables: Option<&'a GammaTables>, is_16_bit: bool) -> Self {
    let quantize_cube = config.quantize.as_ref().filter(|q| !q.palette.is_empty()).map(|q| quantize::QuantizeCube::build(&q.palette));
    Self { config, gamma_tables, is_16_bit, quantize_cube }
  }

  /// Runs the ordered pipeline over one pixel's channels (RGBA order,
  /// trailing channels padded with `max` for opaque alpha when the source
  /// color type lacks one). Returns the transformed channel count.
  pub fn apply_pixel(&self, channels: &mut [Sample; 4], channel_count: &mut usize, background: Option<[Sample; 3]>) {
    let max: u32 = if self.is_16_bit { 65535 } else { 255 };
    // Tracks the channels' current maximum value as later steps (namely
    // 16-to-8 scaling) narrow the effective bit width mid-pipeline; invert,
    // shift, and the endian swap all need to know the *current* width, not
    // the image's original one.
    let mut current_max = max;

    // 1: RGB <-> grayscale runs first, on the file's own (not yet
    // gamma-corrected, not yet composited) samples, matching
    // `png_do_rgb_to_gray` running ahead of `png_do_compose`.
    if self.config.rgb_to_gray && *channel_count >= 3 {
      let gray = composite::rgb_to_gray(channels[0], channels[1], channels[2]);
      let alpha = if *channel_count == 4 { Some(channels[3]) } else { None };
      channels[0] = gray;
      *channel_count = 1;
      if let Some(a) = alpha {
        channels[1] = a;
        *channel_count = 2;
      }
    } else if self.config.gray_to_rgb && *channel_count <= 2 {
      let alpha = if *channel_count == 2 { Some(channels[1]) } else { None };
      channels[1] = channels[0];
      channels[2] = channels[0];
      *channel_count = 3;
      if let Some(a) = alpha {
        channels[3] = a;
        *channel_count = 4;
      }
    }

    // 2: alpha compositing, in linear light when gamma tables are available
    // so partially-transparent edges blend the way the image was authored,
    // before gamma correction, alpha stripping, or any later reshaping.
    let has_alpha = *channel_count == 2 || *channel_count == 4;
    if has_alpha {
      if let crate::AlphaMode::CompositeOverBackground | crate::AlphaMode::CompositeOverColor { .. } =
        self.config.alpha_mode
      {
        let bg = match self.config.alpha_mode {
          crate::AlphaMode::CompositeOverColor { r, g, b } => [r, g, b],
          _ => background.unwrap_or([0, 0, 0]),
        };
        let alpha = channels[*channel_count - 1] as u32;
        let color_channels = *channel_count - 1;
        for i in 0..color_channels {
          let bg_sample = if color_channels == 1 { bg[0] } else { bg[i] };
          channels[i] = match self.gamma_tables {
            Some(tables) => composite::composite_over_linear(channels[i], alpha, bg_sample, max, tables, self.is_16_bit),
            None => composite::composite_over(channels[i] as u32, alpha, bg_sample as u32, max),
          };
        }
        // Compositing produces an opaque result; drop the alpha channel.
        *channel_count -= 1;
      }
    }

    // 3: gamma correction, after compositing has already happened in linear
    // light, so it only needs to correct the final color channels once.
    if let Some(tables) = self.gamma_tables {
      let color_channel_count = match *channel_count {
        2 => 1,
        4 => 3,
        n => n,
      };
      for c in &mut channels[..color_channel_count] {
        *c = if self.is_16_bit { tables.apply_16(*c) } else { tables.apply_8(*c as u8) as Sample };
      }
    }

    // 4: strip alpha outright, if requested independent of compositing.
    if self.config.strip_alpha && (*channel_count == 2 || *channel_count == 4) {
      *channel_count -= 1;
    }

    // 5-6: 16<->8 bit scaling; tracks `current_max` since everything past
    // this point needs to reason about the post-scale bit width.
    if self.is_16_bit && (self.config.scale_16 || self.config.strip_16) {
      for c in &mut channels[..*channel_count] {
        *c = if self.config.scale_16 { scale::scale_16_to_8(*c) as Sample } else { scale::strip_16_to_8(*c) as Sample };
      }
      current_max = 255;
    }
    if self.config.scale_8_to_16 && !self.is_16_bit {
      for c in &mut channels[..*channel_count] {
        *c = scale::scale_8_to_16(*c as u8);
      }
      current_max = 65535;
    }

    // 7: palette quantization, snapping color channels to the nearest entry
    // of a precomputed palette. Operates as a visual color-reduction effect
    // on the RGB channels in place, not as true index-output quantization
    // (the pipeline always emits widened samples, never packed indices).
    if let Some(cube) = &self.quantize_cube {
      let palette = &self.config.quantize.as_ref().expect("quantize_cube only built when quantize config is set").palette;
      if *channel_count >= 3 {
        let to_8 = |v: Sample| if current_max == 65535 { (v >> 8) as u8 } else { v as u8 };
        let from_8 = |v: u8| if current_max == 65535 { u16::from_be_bytes([v, v]) } else { v as Sample };
        let color = Rgb8 { r: to_8(channels[0]), g: to_8(channels[1]), b: to_8(channels[2]) };
        let Rgb8 { r, g, b } = palette[cube.nearest_index(color) as usize];
        channels[0] = from_8(r);
        channels[1] = from_8(g);
        channels[2] = from_8(b);
      }
    }

    // 8: invert grayscale / invert alpha senses, against the current
    // (possibly already-scaled) bit width.
    if self.config.invert_gray && *channel_count <= 2 {
      channels[0] = current_max as Sample - channels[0];
    }
    if self.config.invert_alpha && (*channel_count == 2 || *channel_count == 4) {
      let a = *channel_count - 1;
      channels[a] = current_max as Sample - channels[a];
    }

    // 9: shift each channel down to its significant-bit count.
    if let Some(bits) = self.config.shift {
      let full_width = if current_max == 65535 { 16 } else { 8 };
      for (c, &b) in channels[..*channel_count].iter_mut().zip(bits.iter()) {
        if b > 0 && (b as u32) < full_width {
          *c >>= full_width - b as u32;
        }
      }
    }

    // 10: BGR channel order.
    if self.config.bgr_order && *channel_count >= 3 {
      channels.swap(0, 2);
    }

    // 11: alpha channel to front.
    if self.config.alpha_first && (*channel_count == 2 || *channel_count == 4) {
      scale::alpha_to_front(&mut channels[..*channel_count]);
    }

    // 12: filler channel insertion.
    if let Some((filler_value, _filler_before_alpha)) = self.config.filler {
      if *channel_count == 3 {
        channels[3] = filler_value;
        *channel_count = 4;
      }
    }

    // 13: endian swap for 16-bit output, gated on the channels' *current*
    // width since an earlier scale step may have already narrowed it.
    if self.config.swap_endian_16 && current_max == 65535 {
      for c in &mut channels[..*channel_count] {
        *c = scale::swap_endian_16(*c);
      }
    }

    // 14: host-provided callback, run dead last over exactly the channel
    // layout a caller pulling rows back out of the decoder would see.
    if let Some(user_transform) = self.config.user_transform {
      user_transform(channels, channel_count);
    }
  }
}

/// Whether a color type's bit depth needs palette or `tRNS`-driven
/// expansion before [`TransformPipeline::apply_pixel`] can run on it.
#[must_use]
pub fn needs_expansion_pass(ihdr: &Ihdr) -> bool {
  matches!(ihdr.color_type, ColorType::Indexed) || expand::needs_bit_expansion(ihdr)
}

/// Packs a row of sub-8-bit samples back down to `bit_depth`-wide packed
/// bytes, for [`TransformConfig::pack_to_bits`].
#[must_use]
pub fn pack_to_bit_depth(bit_depth: u8, samples: &[u8]) -> Vec<u8> {
  let per_byte = 8 / bit_depth as usize;
  let mut out = Vec::with_capacity(samples.len().div_ceil(per_byte));
  for chunk in samples.chunks(per_byte) {
    let mut byte = 0_u8;
    for (i, &s) in chunk.iter().enumerate() {
      let shift = 8 - bit_depth as usize * (i + 1);
      byte |= (s & ((1 << bit_depth) - 1)) << shift;
    }
    out.push(byte);
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pack_to_bit_depth_packs_four_2bit_samples_per_byte() {
    let samples = [0_u8, 1, 2, 3, 3, 2, 1, 0];
    let packed = pack_to_bit_depth(2, &samples);
    assert_eq!(packed, alloc::vec![0b00_01_10_11, 0b11_10_01_00]);
  }

  #[test]
  fn rgb_to_gray_pipeline_step_reduces_channel_count() {
    let config = TransformConfig { rgb_to_gray: true, ..TransformConfig::default() };
    let pipeline = TransformPipeline::new(&config, None, false);
    let mut channels = [255, 255, 255, 0];
    let mut count = 3;
    pipeline.apply_pixel(&mut channels, &mut count, None);
    assert_eq!(count, 1);
    assert_eq!(channels[0], 255);
  }
}
