//! The `IHDR` chunk: image dimensions, color type, bit depth, and the
//! derived quantities (channel count, bits per pixel, bytes per filtered
//! scanline) everything downstream needs.

use crate::PngError;

/// The five pixel color arrangements PNG supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ColorType {
  /// Grayscale, one channel.
  Gray = 0,
  /// Red, green, blue.
  Rgb = 2,
  /// Index into the image's [`crate::chunks::Palette`].
  Indexed = 3,
  /// Grayscale plus alpha.
  GrayAlpha = 4,
  /// Red, green, blue, alpha.
  Rgba = 6,
}
impl ColorType {
  /// The number of channels stored per pixel before any transform runs.
  #[inline]
  #[must_use]
  pub const fn channel_count(self) -> u8 {
    match self {
      Self::Gray | Self::Indexed => 1,
      Self::GrayAlpha => 2,
      Self::Rgb => 3,
      Self::Rgba => 4,
    }
  }

  /// True if this color type carries an alpha channel already (as opposed
  /// to alpha arriving only via a `tRNS` chunk).
  #[inline]
  #[must_use]
  pub const fn has_alpha_channel(self) -> bool {
    matches!(self, Self::GrayAlpha | Self::Rgba)
  }

  /// The bit depths legal for this color type, per the PNG spec's table.
  #[inline]
  #[must_use]
  pub const fn legal_bit_depths(self) -> &'static [u8] {
    match self {
      Self::Gray => &[1, 2, 4, 8, 16],
      Self::Rgb | Self::GrayAlpha | Self::Rgba => &[8, 16],
      Self::Indexed => &[1, 2, 4, 8],
    }
  }
}
impl TryFrom<u8> for ColorType {
  type Error = PngError;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => Self::Gray,
      2 => Self::Rgb,
      3 => Self::Indexed,
      4 => Self::GrayAlpha,
      6 => Self::Rgba,
      _ => return Err(PngError::IllegalIHDR),
    })
  }
}

/// The parsed `IHDR` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ihdr {
  pub width: u32,
  pub height: u32,
  pub bit_depth: u8,
  pub color_type: ColorType,
  pub is_interlaced: bool,
}
impl Ihdr {
  /// Parses a 13-byte `IHDR` chunk body.
  ///
  /// Rejects zero dimensions, illegal bit-depth/color-type pairs, and
  /// unknown compression/filter/interlace method bytes, matching the PNG
  /// spec's validity rules (compression and filter methods have exactly one
  /// legal value each; there is no forward-compatible "unknown method").
  pub fn parse(data: &[u8], max_dimension: u32) -> Result<Self, PngError> {
    let [w0, w1, w2, w3, h0, h1, h2, h3, bit_depth, color_type, compression_method, filter_method, interlace_method] =
      data
    else {
      return Err(PngError::IllegalIHDR);
    };
    let width = u32::from_be_bytes([*w0, *w1, *w2, *w3]);
    let height = u32::from_be_bytes([*h0, *h1, *h2, *h3]);
    if width == 0 || height == 0 {
      return Err(PngError::WidthOrHeightZero);
    }
    if width > max_dimension || height > max_dimension {
      return Err(PngError::DimensionsTooLarge);
    }
    let color_type = ColorType::try_from(*color_type)?;
    if !color_type.legal_bit_depths().contains(bit_depth) {
      return Err(PngError::IllegalIHDR);
    }
    if *compression_method != 0 || *filter_method != 0 {
      return Err(PngError::IllegalIHDR);
    }
    let is_interlaced = match interlace_method {
      0 => false,
      1 => true,
      _ => return Err(PngError::IllegalIHDR),
    };
    Ok(Self { width, height, bit_depth: *bit_depth, color_type, is_interlaced })
  }

  /// Bits per pixel, before any sub-byte packing is undone.
  #[inline]
  #[must_use]
  pub const fn bits_per_pixel(&self) -> usize {
    (self.bit_depth as usize) * (self.color_type.channel_count() as usize)
  }

  /// Bytes in one filtered scanline (the filter-type byte plus packed pixel
  /// data), for a reduced image of the given width.
  #[inline]
  #[must_use]
  pub const fn bytes_per_filterline(&self, width: u32) -> usize {
    1 + ((self.bits_per_pixel() * (width as usize)) + 7) / 8
  }

  /// Bytes per pixel once sub-byte depths are expanded to one byte per
  /// sample; this is the stride the row filters operate on (never less
  /// than 1, since PNG always filters whole bytes).
  #[inline]
  #[must_use]
  pub const fn filter_stride(&self) -> usize {
    let channels = self.color_type.channel_count() as usize;
    if self.bit_depth >= 8 {
      channels * (self.bit_depth as usize / 8)
    } else {
      1
    }
  }

  /// Total bytes of filtered scanline data the decompressed `IDAT` stream
  /// must produce: one pass's worth for a non-interlaced image, or the sum
  /// over all seven Adam7 passes (skipping any pass whose reduced image has
  /// zero width or height) for an interlaced one.
  #[must_use]
  pub fn decompressed_size(&self) -> usize {
    if self.is_interlaced {
      crate::interlace::reduced_image_dimensions(self.width, self.height)
        .into_iter()
        .map(|(w, h)| if w == 0 || h == 0 { 0 } else { self.bytes_per_filterline(w) * h as usize })
        .sum()
    } else {
      self.bytes_per_filterline(self.width) * self.height as usize
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ihdr_bytes(w: u32, h: u32, depth: u8, color: u8, interlace: u8) -> [u8; 13] {
    let mut out = [0_u8; 13];
    out[0..4].copy_from_slice(&w.to_be_bytes());
    out[4..8].copy_from_slice(&h.to_be_bytes());
    out[8] = depth;
    out[9] = color;
    out[10] = 0;
    out[11] = 0;
    out[12] = interlace;
    out
  }

  #[test]
  fn rejects_zero_dimensions() {
    let data = ihdr_bytes(0, 10, 8, 2, 0);
    assert_eq!(Ihdr::parse(&data, 17000).unwrap_err(), PngError::WidthOrHeightZero);
  }

  #[test]
  fn rejects_illegal_bit_depth_for_color_type() {
    // RGB requires 8 or 16 bit depth.
    let data = ihdr_bytes(4, 4, 4, 2, 0);
    assert_eq!(Ihdr::parse(&data, 17000).unwrap_err(), PngError::IllegalIHDR);
  }

  #[test]
  fn accepts_minimal_valid_header() {
    let data = ihdr_bytes(1, 1, 8, 0, 0);
    let ihdr = Ihdr::parse(&data, 17000).unwrap();
    assert_eq!(ihdr.color_type, ColorType::Gray);
    assert_eq!(ihdr.bits_per_pixel(), 8);
    assert_eq!(ihdr.bytes_per_filterline(1), 2);
  }

  #[test]
  fn rejects_dimensions_above_cap() {
    let data = ihdr_bytes(20000, 1, 8, 0, 0);
    assert_eq!(Ihdr::parse(&data, 17000).unwrap_err(), PngError::DimensionsTooLarge);
  }
}
