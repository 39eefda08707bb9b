//! Parsed ancillary and critical chunk payloads.
//!
//! Each chunk type gets its own struct (mirroring the wire layout the PNG
//! spec defines for it) and [`Chunk`] unifies them into one tagged value a
//! caller can match on. Text chunks are the one place three wire chunk types
//! ([`TextChunk`]) collapse into a single shape, since `tEXt`/`zTXt`/`iTXt`
//! only differ in compression and language tagging.

mod text;
pub use text::{TextChunk, TextCompression};
use text::canonicalize_keyword;

use crate::{Crc32, InflateOwner, PngError};
use alloc::{string::String, vec::Vec};
use bytemuck::cast_slice;

/// One `PLTE` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Rgb8 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
}

/// `PLTE`: the palette for an indexed-color image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
  pub entries: Vec<Rgb8>,
}
impl Palette {
  pub fn parse(data: &[u8]) -> Result<Self, PngError> {
    if data.is_empty() || data.len() % 3 != 0 || data.len() / 3 > 256 {
      return Err(PngError::IllegalPLTE);
    }
    Ok(Self { entries: cast_slice::<u8, Rgb8>(data).to_vec() })
  }
}

/// `tRNS`: transparency information, shaped to the color type it arrived
/// alongside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transparency {
  /// Grayscale images: one sample value is fully transparent.
  Gray { gray: u16 },
  /// Truecolor images: one RGB triple is fully transparent.
  Rgb { r: u16, g: u16, b: u16 },
  /// Indexed images: one alpha byte per leading palette entry; entries
  /// beyond the end of this vec are fully opaque.
  Palette { alphas: Vec<u8> },
}
impl Transparency {
  pub fn parse(data: &[u8], color_type: crate::ColorType) -> Result<Self, PngError> {
    use crate::ColorType as C;
    match (color_type, data) {
      (C::Gray, [y0, y1]) => Ok(Self::Gray { gray: u16::from_be_bytes([*y0, *y1]) }),
      (C::Rgb, [r0, r1, g0, g1, b0, b1]) => Ok(Self::Rgb {
        r: u16::from_be_bytes([*r0, *r1]),
        g: u16::from_be_bytes([*g0, *g1]),
        b: u16::from_be_bytes([*b0, *b1]),
      }),
      (C::Indexed, alphas) if alphas.len() <= 256 => Ok(Self::Palette { alphas: alphas.to_vec() }),
      _ => Err(PngError::IllegalTRNS),
    }
  }
}

/// `cHRM`: chromaticity coordinates, stored as the spec's fixed-point
/// integers (value * 100,000).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chromaticities {
  pub white_x: u32,
  pub white_y: u32,
  pub red_x: u32,
  pub red_y: u32,
  pub green_x: u32,
  pub green_y: u32,
  pub blue_x: u32,
  pub blue_y: u32,
}
impl Chromaticities {
  pub fn parse(data: &[u8]) -> Result<Self, PngError> {
    if data.len() != 32 {
      return Err(PngError::IllegalCHRM);
    }
    let u32_at = |i: usize| u32::from_be_bytes(data[i..i + 4].try_into().unwrap());
    Ok(Self {
      white_x: u32_at(0),
      white_y: u32_at(4),
      red_x: u32_at(8),
      red_y: u32_at(12),
      green_x: u32_at(16),
      green_y: u32_at(20),
      blue_x: u32_at(24),
      blue_y: u32_at(28),
    })
  }
}

/// `gAMA`: image gamma, as the spec's fixed-point integer (value * 100,000).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gamma(pub u32);
impl Gamma {
  pub fn parse(data: &[u8]) -> Result<Self, PngError> {
    match data {
      [a, b, c, d] => {
        let value = u32::from_be_bytes([*a, *b, *c, *d]);
        if value == 0 || value > 0x7FFF_FFFF {
          return Err(PngError::IllegalGAMA);
        }
        Ok(Self(value))
      }
      _ => Err(PngError::IllegalGAMA),
    }
  }

  /// The gamma value as a float, e.g. `45455` becomes `0.45455`.
  #[must_use]
  pub fn as_f32(self) -> f32 {
    self.0 as f32 / 100_000.0
  }
}

/// `iCCP`: an embedded ICC color profile. The profile bytes are kept
/// verbatim; this crate does not implement color management.
#[derive(Debug, Clone)]
pub struct IccProfile {
  pub name: String,
  pub profile: Vec<u8>,
}
impl IccProfile {
  pub fn parse(data: &[u8], size_cap: usize) -> Result<Self, PngError> {
    let sep = data.iter().position(|&b| b == 0).ok_or(PngError::IllegalICCP)?;
    let name = latin1_to_string(&data[..sep]);
    let rest = &data[sep + 1..];
    let [compression_method, zlib_data @ ..] = rest else {
      return Err(PngError::IllegalICCP);
    };
    if *compression_method != 0 {
      return Err(PngError::IllegalICCP);
    }
    let profile = InflateOwner::two_pass(zlib_data, size_cap).map_err(|_| PngError::IllegalICCP)?;
    Ok(Self { name, profile })
  }
}

/// `sBIT`: how many bits of each stored channel are actually significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignificantBits {
  Gray { gray: u8 },
  GrayAlpha { gray: u8, alpha: u8 },
  Rgb { r: u8, g: u8, b: u8 },
  Rgba { r: u8, g: u8, b: u8, a: u8 },
}
impl SignificantBits {
  /// `bit_depth` is `IHDR`'s own bit depth; for indexed images the cap is
  /// always 8 regardless of the index's storage width, since `PLTE`
  /// entries are always 8 bits per channel.
  pub fn parse(data: &[u8], color_type: crate::ColorType, bit_depth: u8) -> Result<Self, PngError> {
    use crate::ColorType as C;
    let cap = if matches!(color_type, C::Indexed) { 8 } else { bit_depth };
    let parsed = match (color_type, data) {
      (C::Gray, [y]) => Self::Gray { gray: *y },
      (C::GrayAlpha, [y, a]) => Self::GrayAlpha { gray: *y, alpha: *a },
      (C::Rgb | C::Indexed, [r, g, b]) => Self::Rgb { r: *r, g: *g, b: *b },
      (C::Rgba, [r, g, b, a]) => Self::Rgba { r: *r, g: *g, b: *b, a: *a },
      _ => return Err(PngError::IllegalSBIT),
    };
    let in_range = match parsed {
      Self::Gray { gray } => gray <= cap,
      Self::GrayAlpha { gray, alpha } => gray <= cap && alpha <= cap,
      Self::Rgb { r, g, b } => r <= cap && g <= cap && b <= cap,
      Self::Rgba { r, g, b, a } => r <= cap && g <= cap && b <= cap && a <= cap,
    };
    if !in_range {
      return Err(PngError::IllegalSBIT);
    }
    Ok(parsed)
  }
}

/// `sRGB`: declares the image conforms to the sRGB color space, and names a
/// rendering intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SrgbIntent {
  Perceptual = 0,
  RelativeColorimetric = 1,
  Saturation = 2,
  AbsoluteColorimetric = 3,
}
impl SrgbIntent {
  pub fn parse(data: &[u8]) -> Result<Self, PngError> {
    match data {
      [0] => Ok(Self::Perceptual),
      [1] => Ok(Self::RelativeColorimetric),
      [2] => Ok(Self::Saturation),
      [3] => Ok(Self::AbsoluteColorimetric),
      _ => Err(PngError::IllegalSRGB),
    }
  }
}

/// `bKGD`: a suggested background color to composite the image against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
  Gray { gray: u16 },
  Rgb { r: u16, g: u16, b: u16 },
  PaletteIndex { index: u8 },
}
impl Background {
  pub fn parse(data: &[u8], color_type: crate::ColorType) -> Result<Self, PngError> {
    use crate::ColorType as C;
    match (color_type, data) {
      (C::Indexed, [i]) => Ok(Self::PaletteIndex { index: *i }),
      (C::Gray | C::GrayAlpha, [y0, y1]) => Ok(Self::Gray { gray: u16::from_be_bytes([*y0, *y1]) }),
      (C::Rgb | C::Rgba, [r0, r1, g0, g1, b0, b1]) => Ok(Self::Rgb {
        r: u16::from_be_bytes([*r0, *r1]),
        g: u16::from_be_bytes([*g0, *g1]),
        b: u16::from_be_bytes([*b0, *b1]),
      }),
      _ => Err(PngError::IllegalBKGD),
    }
  }
}

/// `hIST`: approximate palette-entry usage counts, one per `PLTE` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
  pub frequencies: Vec<u16>,
}
impl Histogram {
  pub fn parse(data: &[u8]) -> Result<Self, PngError> {
    if data.len() % 2 != 0 {
      return Err(PngError::IllegalHIST);
    }
    Ok(Self { frequencies: data.chunks_exact(2).map(|c| u16::from_be_bytes([c[0], c[1]])).collect() })
  }
}

/// `pHYs`: intended physical pixel dimensions or aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalDims {
  pub pixels_per_unit_x: u32,
  pub pixels_per_unit_y: u32,
  pub unit_is_meters: bool,
}
impl PhysicalDims {
  pub fn parse(data: &[u8]) -> Result<Self, PngError> {
    match data {
      [x0, x1, x2, x3, y0, y1, y2, y3, unit] if *unit <= 1 => Ok(Self {
        pixels_per_unit_x: u32::from_be_bytes([*x0, *x1, *x2, *x3]),
        pixels_per_unit_y: u32::from_be_bytes([*y0, *y1, *y2, *y3]),
        unit_is_meters: *unit == 1,
      }),
      _ => Err(PngError::IllegalPHYS),
    }
  }
}

/// `oFFs`: the image's intended position relative to another, in pixels or
/// micrometers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageOffset {
  pub x: i32,
  pub y: i32,
  pub unit_is_micrometers: bool,
}
impl ImageOffset {
  pub fn parse(data: &[u8]) -> Result<Self, PngError> {
    match data {
      [x0, x1, x2, x3, y0, y1, y2, y3, unit] if *unit <= 1 => Ok(Self {
        x: i32::from_be_bytes([*x0, *x1, *x2, *x3]),
        y: i32::from_be_bytes([*y0, *y1, *y2, *y3]),
        unit_is_micrometers: *unit == 1,
      }),
      _ => Err(PngError::IllegalOFFS),
    }
  }
}

/// `sCAL`: the physical size of a pixel, as ASCII decimal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalScale {
  pub unit_is_meters: bool,
  pub width: String,
  pub height: String,
}
impl PhysicalScale {
  pub fn parse(data: &[u8]) -> Result<Self, PngError> {
    let [unit, rest @ ..] = data else { return Err(PngError::IllegalSCAL) };
    let unit_is_meters = match unit {
      1 => true,
      2 => false,
      _ => return Err(PngError::IllegalSCAL),
    };
    let mut it = rest.splitn(2, |&b| b == 0);
    let width = it.next().ok_or(PngError::IllegalSCAL)?;
    let height = it.next().ok_or(PngError::IllegalSCAL)?;
    if width.is_empty() || height.is_empty() {
      return Err(PngError::IllegalSCAL);
    }
    Ok(Self {
      unit_is_meters,
      width: latin1_to_string(width),
      height: latin1_to_string(height),
    })
  }
}

/// `pCAL`: maps stored sample values to calibrated physical values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelCalibration {
  pub calibration_name: String,
  pub original_zero: i32,
  pub original_max: i32,
  pub equation_kind: u8,
  pub unit_name: String,
  pub parameters: Vec<String>,
}
impl PixelCalibration {
  pub fn parse(data: &[u8]) -> Result<Self, PngError> {
    let mut it = data.splitn(2, |&b| b == 0);
    let calibration_name = latin1_to_string(it.next().ok_or(PngError::IllegalPCAL)?);
    let rest = it.next().ok_or(PngError::IllegalPCAL)?;
    let [z0, z1, z2, z3, m0, m1, m2, m3, equation_kind, param_count, rest @ ..] = rest else {
      return Err(PngError::IllegalPCAL);
    };
    let original_zero = i32::from_be_bytes([*z0, *z1, *z2, *z3]);
    let original_max = i32::from_be_bytes([*m0, *m1, *m2, *m3]);
    let mut fields = rest.splitn(*param_count as usize + 1, |&b| b == 0);
    let unit_name = latin1_to_string(fields.next().ok_or(PngError::IllegalPCAL)?);
    let parameters: Vec<String> = fields.map(latin1_to_string).collect();
    if parameters.len() != *param_count as usize {
      return Err(PngError::IllegalPCAL);
    }
    Ok(Self { calibration_name, original_zero, original_max, equation_kind: *equation_kind, unit_name, parameters })
  }
}

/// `sPLT`: a suggested reduced palette, at 8 or 16 bits per channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestedPaletteEntry {
  pub r: u16,
  pub g: u16,
  pub b: u16,
  pub a: u16,
  pub frequency: u16,
}
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestedPalette {
  pub name: String,
  pub sample_depth: u8,
  pub entries: Vec<SuggestedPaletteEntry>,
}
impl SuggestedPalette {
  pub fn parse(data: &[u8]) -> Result<Self, PngError> {
    let sep = data.iter().position(|&b| b == 0).ok_or(PngError::IllegalSPLT)?;
    let name = latin1_to_string(&data[..sep]);
    let rest = &data[sep + 1..];
    let [sample_depth, entry_bytes @ ..] = rest else { return Err(PngError::IllegalSPLT) };
    let entries = match sample_depth {
      8 => entry_bytes
        .chunks_exact(6)
        .map(|e| SuggestedPaletteEntry {
          r: e[0] as u16,
          g: e[1] as u16,
          b: e[2] as u16,
          a: e[3] as u16,
          frequency: u16::from_be_bytes([e[4], e[5]]),
        })
        .collect(),
      16 => entry_bytes
        .chunks_exact(10)
        .map(|e| SuggestedPaletteEntry {
          r: u16::from_be_bytes([e[0], e[1]]),
          g: u16::from_be_bytes([e[2], e[3]]),
          b: u16::from_be_bytes([e[4], e[5]]),
          a: u16::from_be_bytes([e[6], e[7]]),
          frequency: u16::from_be_bytes([e[8], e[9]]),
        })
        .collect(),
      _ => return Err(PngError::IllegalSPLT),
    };
    Ok(Self { name, sample_depth: *sample_depth, entries })
  }
}

/// `tIME`: the image's last-modification time, UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModTime {
  pub year: u16,
  pub month: u8,
  pub day: u8,
  pub hour: u8,
  pub minute: u8,
  pub second: u8,
}
impl ModTime {
  pub fn parse(data: &[u8]) -> Result<Self, PngError> {
    match data {
      [y0, y1, month, day, hour, minute, second]
        if (1..=12).contains(month)
          && (1..=31).contains(day)
          && *hour <= 23
          && *minute <= 59
          && *second <= 60 =>
      {
        Ok(Self {
          year: u16::from_be_bytes([*y0, *y1]),
          month: *month,
          day: *day,
          hour: *hour,
          minute: *minute,
          second: *second,
        })
      }
      _ => Err(PngError::IllegalTIME),
    }
  }
}

/// A chunk type this crate doesn't give a dedicated payload to, kept
/// verbatim so a host can inspect or re-serialize it.
#[derive(Debug, Clone)]
pub struct UnknownChunk {
  pub name: [u8; 4],
  pub data: Vec<u8>,
}

/// A single parsed chunk.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum Chunk {
  Ihdr(crate::Ihdr),
  Palette(Palette),
  ImageData(Vec<u8>),
  End,
  Transparency(Transparency),
  Chromaticities(Chromaticities),
  Gamma(Gamma),
  IccProfile(IccProfile),
  SignificantBits(SignificantBits),
  Srgb(SrgbIntent),
  Text(TextChunk),
  Background(Background),
  Histogram(Histogram),
  PhysicalDims(PhysicalDims),
  ImageOffset(ImageOffset),
  PhysicalScale(PhysicalScale),
  PixelCalibration(PixelCalibration),
  SuggestedPalette(SuggestedPalette),
  ModTime(ModTime),
  Unknown(UnknownChunk),
}

fn latin1_to_string(bytes: &[u8]) -> String {
  bytes.iter().map(|&b| b as char).collect()
}

fn decompress_text(zlib_data: &[u8], size_cap: usize) -> Result<String, PngError> {
  let bytes = InflateOwner::two_pass(zlib_data, size_cap).map_err(|_| PngError::IllegalText)?;
  Ok(latin1_to_string(&bytes))
}

impl Chunk {
  /// Parses one chunk's payload. `crc` is verified first when `verify_crc`
  /// is set; chunk-ordering and color-type-dependent validation (`tRNS`
  /// needing the `IHDR` color type, `hIST`/transparency needing the
  /// palette length) is the state machine's job, not this function's.
  pub fn parse(
    raw: &crate::RawChunk<'_>, color_type: Option<crate::ColorType>, bit_depth: Option<u8>,
    iccp_size_cap: usize, text_size_cap: usize,
  ) -> Result<Self, PngError> {
    let data = raw.data;
    Ok(match raw.name.as_bytes() {
      b"IHDR" => Chunk::Ihdr(crate::Ihdr::parse(data, u32::MAX)?),
      b"PLTE" => Chunk::Palette(Palette::parse(data)?),
      b"IDAT" => Chunk::ImageData(data.to_vec()),
      b"IEND" => Chunk::End,
      b"tRNS" => {
        let color_type = color_type.ok_or(PngError::ChunkOutOfOrder)?;
        Chunk::Transparency(Transparency::parse(data, color_type)?)
      }
      b"cHRM" => Chunk::Chromaticities(Chromaticities::parse(data)?),
      b"gAMA" => Chunk::Gamma(Gamma::parse(data)?),
      b"iCCP" => Chunk::IccProfile(IccProfile::parse(data, iccp_size_cap)?),
      b"sBIT" => {
        let color_type = color_type.ok_or(PngError::ChunkOutOfOrder)?;
        let bit_depth = bit_depth.ok_or(PngError::ChunkOutOfOrder)?;
        Chunk::SignificantBits(SignificantBits::parse(data, color_type, bit_depth)?)
      }
      b"sRGB" => Chunk::Srgb(SrgbIntent::parse(data)?),
      b"tEXt" => {
        let mut it = data.splitn(2, |&b| b == 0);
        let keyword = latin1_to_string(it.next().ok_or(PngError::IllegalText)?);
        let keyword = canonicalize_keyword(&keyword).ok_or(PngError::IllegalText)?;
        let text = latin1_to_string(it.next().ok_or(PngError::IllegalText)?);
        Chunk::Text(TextChunk {
          keyword,
          language_tag: String::new(),
          translated_keyword: String::new(),
          text,
          compression: TextCompression::None,
        })
      }
      b"zTXt" => {
        let mut it = data.splitn(2, |&b| b == 0);
        let keyword = latin1_to_string(it.next().ok_or(PngError::IllegalText)?);
        let keyword = canonicalize_keyword(&keyword).ok_or(PngError::IllegalText)?;
        let rest = it.next().ok_or(PngError::IllegalText)?;
        let [compression_method, zlib_data @ ..] = rest else {
          return Err(PngError::IllegalText);
        };
        if *compression_method != 0 {
          return Err(PngError::IllegalText);
        }
        let text = decompress_text(zlib_data, text_size_cap)?;
        Chunk::Text(TextChunk {
          keyword,
          language_tag: String::new(),
          translated_keyword: String::new(),
          text,
          compression: TextCompression::Zlib,
        })
      }
      b"iTXt" => {
        let mut it = data.splitn(4, |&b| b == 0);
        let keyword = latin1_to_string(it.next().ok_or(PngError::IllegalText)?);
        let keyword = canonicalize_keyword(&keyword).ok_or(PngError::IllegalText)?;
        let flag_method = it.next().ok_or(PngError::IllegalText)?;
        let language_tag = core::str::from_utf8(it.next().ok_or(PngError::IllegalText)?)
          .map_err(|_| PngError::IllegalText)?
          .into();
        let rest = it.next().ok_or(PngError::IllegalText)?;
        let mut rest_it = rest.splitn(2, |&b| b == 0);
        let translated_keyword = core::str::from_utf8(rest_it.next().ok_or(PngError::IllegalText)?)
          .map_err(|_| PngError::IllegalText)?
          .into();
        let text_bytes = rest_it.next().ok_or(PngError::IllegalText)?;
        let (text, compression) = match flag_method {
          [0, 0] => (core::str::from_utf8(text_bytes).map_err(|_| PngError::IllegalText)?.into(), TextCompression::None),
          [1, 0] => (decompress_text(text_bytes, text_size_cap)?, TextCompression::Zlib),
          _ => return Err(PngError::IllegalText),
        };
        Chunk::Text(TextChunk { keyword, language_tag, translated_keyword, text, compression })
      }
      b"bKGD" => {
        let color_type = color_type.ok_or(PngError::ChunkOutOfOrder)?;
        Chunk::Background(Background::parse(data, color_type)?)
      }
      b"hIST" => Chunk::Histogram(Histogram::parse(data)?),
      b"pHYs" => Chunk::PhysicalDims(PhysicalDims::parse(data)?),
      b"oFFs" => Chunk::ImageOffset(ImageOffset::parse(data)?),
      b"sCAL" => Chunk::PhysicalScale(PhysicalScale::parse(data)?),
      b"pCAL" => Chunk::PixelCalibration(PixelCalibration::parse(data)?),
      b"sPLT" => Chunk::SuggestedPalette(SuggestedPalette::parse(data)?),
      b"tIME" => Chunk::ModTime(ModTime::parse(data)?),
      name => Chunk::Unknown(UnknownChunk { name: *name, data: data.to_vec() }),
    })
  }
}

/// Verifies a raw chunk's CRC-32 trailer, for callers that want to do this
/// independent of [`Chunk::parse`] (e.g. to reject before allocating).
#[must_use]
pub fn verify_crc(raw: &crate::RawChunk<'_>) -> bool {
  Crc32::of_chunk(raw.name.as_bytes(), raw.data) == raw.declared_crc
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn gamma_rejects_zero() {
    assert_eq!(Gamma::parse(&0_u32.to_be_bytes()), Err(PngError::IllegalGAMA));
  }

  #[test]
  fn gamma_rejects_above_signed_max() {
    assert_eq!(Gamma::parse(&0x8000_0000_u32.to_be_bytes()), Err(PngError::IllegalGAMA));
  }

  #[test]
  fn gamma_accepts_typical_value() {
    assert!(Gamma::parse(&45455_u32.to_be_bytes()).is_ok());
  }

  #[test]
  fn sbit_rejects_value_above_bit_depth() {
    assert_eq!(SignificantBits::parse(&[6], crate::ColorType::Gray, 4), Err(PngError::IllegalSBIT));
  }

  #[test]
  fn sbit_accepts_value_at_bit_depth() {
    assert_eq!(
      SignificantBits::parse(&[4], crate::ColorType::Gray, 4),
      Ok(SignificantBits::Gray { gray: 4 })
    );
  }

  #[test]
  fn sbit_caps_indexed_at_eight_regardless_of_index_depth() {
    assert_eq!(
      SignificantBits::parse(&[8, 8, 8], crate::ColorType::Indexed, 4),
      Ok(SignificantBits::Rgb { r: 8, g: 8, b: 8 })
    );
    assert_eq!(
      SignificantBits::parse(&[9, 8, 8], crate::ColorType::Indexed, 4),
      Err(PngError::IllegalSBIT)
    );
  }
}
