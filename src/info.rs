//! [`ImageInfo`]: the accumulated metadata a decode produces, aside from
//! the pixel data itself.

use crate::{
  Background, Chromaticities, Gamma, Histogram, IccProfile, Ihdr, ImageOffset, ModTime, Palette,
  PhysicalDims, PhysicalScale, PixelCalibration, SignificantBits, SrgbIntent, SuggestedPalette,
  TextChunk, Transparency, UnknownChunk,
};
use alloc::vec::Vec;

/// Everything known about a PNG besides its decoded pixels: the required
/// `IHDR`, and whichever optional ancillary chunks were present.
#[derive(Debug, Clone)]
pub struct ImageInfo {
  pub ihdr: Ihdr,
  pub palette: Option<Palette>,
  pub transparency: Option<Transparency>,
  pub chromaticities: Option<Chromaticities>,
  pub gamma: Option<Gamma>,
  pub icc_profile: Option<IccProfile>,
  pub significant_bits: Option<SignificantBits>,
  pub srgb_intent: Option<SrgbIntent>,
  pub background: Option<Background>,
  pub histogram: Option<Histogram>,
  pub physical_dims: Option<PhysicalDims>,
  pub image_offset: Option<ImageOffset>,
  pub physical_scale: Option<PhysicalScale>,
  pub pixel_calibration: Option<PixelCalibration>,
  pub suggested_palettes: Vec<SuggestedPalette>,
  pub modification_time: Option<ModTime>,
  pub text: Vec<TextChunk>,
  pub unknown_chunks: Vec<UnknownChunk>,
}
impl ImageInfo {
  #[must_use]
  pub fn new(ihdr: Ihdr) -> Self {
    Self {
      ihdr,
      palette: None,
      transparency: None,
      chromaticities: None,
      gamma: None,
      icc_profile: None,
      significant_bits: None,
      srgb_intent: None,
      background: None,
      histogram: None,
      physical_dims: None,
      image_offset: None,
      physical_scale: None,
      pixel_calibration: None,
      suggested_palettes: Vec::new(),
      modification_time: None,
      text: Vec::new(),
      unknown_chunks: Vec::new(),
    }
  }

  /// The effective file gamma to correct for: an explicit `gAMA` chunk, or
  /// `1/2.2` when `sRGB` is present (sRGB implies that gamma even without a
  /// `gAMA` chunk spelling it out), or `None` if neither is present.
  #[must_use]
  pub fn effective_file_gamma(&self) -> Option<f32> {
    if self.srgb_intent.is_some() {
      Some(1.0 / 2.2)
    } else {
      self.gamma.map(Gamma::as_f32)
    }
  }

  /// Records a chunk's contents into this struct. Returns `false` for
  /// chunk kinds that don't belong here (`IHDR`/`IDAT`/`IEND`), which a
  /// caller should have handled separately.
  pub fn absorb(&mut self, chunk: crate::Chunk) -> bool {
    use crate::Chunk as C;
    match chunk {
      C::Palette(p) => self.palette = Some(p),
      C::Transparency(t) => self.transparency = Some(t),
      C::Chromaticities(c) => self.chromaticities = Some(c),
      C::Gamma(g) => self.gamma = Some(g),
      C::IccProfile(p) => self.icc_profile = Some(p),
      C::SignificantBits(s) => self.significant_bits = Some(s),
      C::Srgb(i) => self.srgb_intent = Some(i),
      C::Background(b) => self.background = Some(b),
      C::Histogram(h) => self.histogram = Some(h),
      C::PhysicalDims(p) => self.physical_dims = Some(p),
      C::ImageOffset(o) => self.image_offset = Some(o),
      C::PhysicalScale(s) => self.physical_scale = Some(s),
      C::PixelCalibration(p) => self.pixel_calibration = Some(p),
      C::SuggestedPalette(s) => self.suggested_palettes.push(s),
      C::ModTime(t) => self.modification_time = Some(t),
      C::Text(t) => self.text.push(t),
      C::Unknown(u) => self.unknown_chunks.push(u),
      C::Ihdr(_) | C::ImageData(_) | C::End => return false,
    }
    true
  }
}
