//! [`Decoder`]: the top-level driver that wires the chunk state machine,
//! inflate, row-filter reversal, Adam7 reassembly, and the transform
//! pipeline together into a pull API a host iterates over to get decoded
//! scanlines.

use crate::{
  chunks::Rgb8, transform::TransformPipeline, Background, Chunk, ChunkState, ColorType,
  DecoderConfig, DecoderFlags, GammaTables, Ihdr, ImageInfo, InflateOwner, PngError, RawChunkIter,
  Severity, Transparency, ADAM7_PASSES,
};
use alloc::{vec, vec::Vec};

/// One decoded, fully transformed scanline.
#[derive(Debug, Clone)]
pub struct DecodedRow {
  pub y: u32,
  pub channel_count: usize,
  /// Widened samples (`u16`), `channel_count` per pixel, `width` pixels.
  pub samples: Vec<u16>,
  /// Samples packed down to [`crate::TransformConfig::pack_to_bits`] bits
  /// per sample, bit order optionally reversed by
  /// [`crate::TransformConfig::pack_swap`]. `None` unless `pack_to_bits` is
  /// set; computed from `samples` at the row level, after every pixel's
  /// gone through the per-pixel transform pipeline.
  pub packed_bits: Option<Vec<u8>>,
}

/// A non-fatal problem encountered while decoding, recorded rather than
/// raised, per [`DecoderConfig::strict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Warning {
  pub error: PngError,
}

/// Decodes a complete PNG byte slice into [`ImageInfo`] plus a sequence of
/// [`DecodedRow`]s.
///
/// This crate doesn't do its own I/O: the host hands over the full PNG
/// byte slice up front (chunk-incremental feeding is a host-side concern
/// layered on top, per the design notes this crate follows for keeping the
/// core state machine push-free). [`Decoder::rows`] is the pull surface:
/// rows are produced eagerly during [`Decoder::new`] (an interlaced image's
/// last pass can touch any earlier row, so there's no way to yield rows
/// strictly in arrival order without buffering the image anyway) but
/// handed out one at a time by the iterator returned from `rows`.
pub struct Decoder {
  pub info: ImageInfo,
  pub warnings: Vec<Warning>,
  rows: Vec<DecodedRow>,
}
impl Decoder {
  /// Decodes a complete PNG byte slice.
  pub fn new(png: &[u8], config: &DecoderConfig, transform: &crate::TransformConfig) -> Result<Self, PngError> {
    let mut chunk_iter = RawChunkIter::new(png)?;
    let mut state = ChunkState::new();
    let mut flags = DecoderFlags::empty();
    let mut warnings = Vec::new();

    let mut ihdr: Option<Ihdr> = None;
    let mut info: Option<ImageInfo> = None;
    let mut idat_spans: Vec<&[u8]> = Vec::new();

    macro_rules! report {
      ($err:expr) => {{
        let err = $err;
        let severity = err.default_severity();
        if config.strict || severity == Severity::Fatal {
          return Err(err);
        } else {
          warnings.push(Warning { error: err });
        }
      }};
    }

    loop {
      let Some(raw) = chunk_iter.next() else {
        return Err(PngError::NoIDATChunks);
      };
      let raw = raw?;

      let crc_action = if raw.name.is_critical() { config.chunk_crc_policy.critical } else { config.chunk_crc_policy.ancillary };
      if !raw.crc_is_valid() {
        match crc_action {
          crate::CrcAction::Ignore => continue,
          crate::CrcAction::Warn => report!(PngError::CrcMismatch),
          crate::CrcAction::Reject => return Err(PngError::CrcMismatch),
        }
      }

      let color_type = ihdr.map(|h| h.color_type);
      state.advance(raw.name, color_type, &mut flags).map_err(PngError::from)?;

      if raw.name == b"IHDR" {
        let parsed = Ihdr::parse(raw.data, config.max_dimension)?;
        info = Some(ImageInfo::new(parsed));
        ihdr = Some(parsed);
        continue;
      }
      if raw.name == b"IDAT" {
        idat_spans.push(raw.data);
        continue;
      }
      if raw.name == b"IEND" {
        break;
      }
      if !idat_spans.is_empty() {
        // First non-IDAT chunk after a run of IDATs: nothing else to do
        // here, the state machine already flagged contiguity violations.
      }

      let is_recognized = is_recognized_chunk_name(raw.name.as_bytes());
      if !is_recognized {
        match config.unknown_chunk_policy.decide(raw.name.as_bytes(), raw.name.is_critical()) {
          crate::UnknownChunkDecision::Fatal => return Err(PngError::UnknownCriticalChunk),
          crate::UnknownChunkDecision::Discard => continue,
          crate::UnknownChunkDecision::Keep => {}
        }
      }

      let bit_depth = ihdr.map(|h| h.bit_depth);
      match Chunk::parse(&raw, color_type, bit_depth, config.two_pass_inflate_cap, config.two_pass_inflate_cap) {
        Ok(chunk) => {
          if let Some(info) = info.as_mut() {
            info.absorb(chunk);
          }
        }
        Err(e) => {
          if raw.name.is_critical() {
            return Err(e);
          }
          report!(e);
        }
      }
    }

    let ihdr = ihdr.ok_or(PngError::FirstChunkNotIHDR)?;
    let mut info = info.ok_or(PngError::FirstChunkNotIHDR)?;
    if idat_spans.is_empty() {
      return Err(PngError::NoIDATChunks);
    }
    if matches!(ihdr.color_type, ColorType::Indexed) && info.palette.is_none() {
      return Err(PngError::MissingPalette);
    }

    let mut raw_pixels = vec![0_u8; ihdr.decompressed_size()];
    InflateOwner::streamed(&mut raw_pixels, idat_spans.into_iter()).map_err(|_| PngError::InflateFailed)?;

    let gamma_tables = transform.apply_gamma.map(|screen_gamma| {
      let file_gamma = info.effective_file_gamma().unwrap_or(1.0);
      GammaTables::build(file_gamma, screen_gamma)
    });

    let mut rows = unfilter_and_assemble(
      &ihdr, &info, &raw_pixels, transform, gamma_tables.as_ref(), config.interlace_reassembly, &mut warnings,
    )?;

    if let Some(bit_depth) = transform.pack_to_bits {
      for row in &mut rows {
        let samples: Vec<u8> = row.samples.iter().map(|&s| s as u8).collect();
        let mut packed = crate::transform::pack_to_bit_depth(bit_depth, &samples);
        if transform.pack_swap {
          for byte in &mut packed {
            *byte = crate::transform::scale::swap_packed_bit_order(*byte);
          }
        }
        row.packed_bits = Some(packed);
      }
    }

    Ok(Self { info, warnings, rows })
  }

  /// Consumes the decoder, returning the decoded rows in top-to-bottom
  /// image order.
  #[must_use]
  pub fn into_rows(self) -> Vec<DecodedRow> {
    self.rows
  }

  /// Iterates the decoded rows in top-to-bottom image order without
  /// consuming the decoder.
  pub fn rows(&self) -> impl Iterator<Item = &DecodedRow> {
    self.rows.iter()
  }
}

#[allow(clippy::too_many_arguments)]
fn unfilter_and_assemble(
  ihdr: &Ihdr, info: &ImageInfo, raw: &[u8], transform: &crate::TransformConfig,
  gamma_tables: Option<&GammaTables>, interlace_reassembly: crate::InterlaceReassembly,
  warnings: &mut Vec<Warning>,
) -> Result<Vec<DecodedRow>, PngError> {
  let out_channel_count = output_channel_count(ihdr, transform);
  let mut rows: Vec<DecodedRow> = (0..ihdr.height)
    .map(|y| DecodedRow {
      y,
      channel_count: out_channel_count,
      samples: vec![0_u16; ihdr.width as usize * out_channel_count],
      packed_bits: None,
    })
    .collect();

  let pipeline = TransformPipeline::new(transform, gamma_tables, ihdr.bit_depth == 16);
  let stride = ihdr.filter_stride();
  let passes: &[crate::interlace::Adam7Pass] = if ihdr.is_interlaced { &ADAM7_PASSES } else { &[crate::interlace::Adam7Pass { x_start: 0, y_start: 0, x_step: 1, y_step: 1 }] };

  let mut cursor = raw;
  for pass in passes {
    let (pass_width, pass_height) = if ihdr.is_interlaced {
      pass.reduced_dimensions(ihdr.width, ihdr.height)
    } else {
      (ihdr.width, ihdr.height)
    };
    if pass_width == 0 || pass_height == 0 {
      continue;
    }
    let line_len = ihdr.bytes_per_filterline(pass_width);
    let mut prev = vec![0_u8; line_len - 1];
    for reduced_y in 0..pass_height {
      if cursor.len() < line_len {
        return Err(PngError::ShortData);
      }
      let (line, rest) = cursor.split_at(line_len);
      cursor = rest;
      let filter = crate::FilterType::try_from(line[0])?;
      let mut cur = line[1..].to_vec();
      crate::filter::unfilter_row(filter, &mut cur, &prev, stride);

      let samples = expand_row_samples(ihdr, &cur, pass_width);
      for (reduced_x, pixel) in samples.chunks(ihdr.color_type.channel_count() as usize).enumerate() {
        match interlace_reassembly {
          crate::InterlaceReassembly::Sparkle => {
            let (full_x, full_y) = pass.to_full_pos(reduced_x as u32, reduced_y);
            if full_x >= ihdr.width || full_y >= ihdr.height {
              continue;
            }
            write_pixel(ihdr, info, &pipeline, pixel, full_x, full_y, &mut rows, out_channel_count, warnings);
          }
          crate::InterlaceReassembly::Block => {
            let (x0, y0, x1, y1) = if ihdr.is_interlaced {
              pass.block_rect(reduced_x as u32, reduced_y, ihdr.width, ihdr.height)
            } else {
              let (x, y) = pass.to_full_pos(reduced_x as u32, reduced_y);
              (x, y, x + 1, y + 1)
            };
            for full_y in y0..y1 {
              for full_x in x0..x1 {
                write_pixel(ihdr, info, &pipeline, pixel, full_x, full_y, &mut rows, out_channel_count, warnings);
              }
            }
          }
        }
      }
      prev = cur;
    }
  }
  Ok(rows)
}

const RECOGNIZED_CHUNK_NAMES: [[u8; 4]; 18] = [
  *b"PLTE", *b"tRNS", *b"cHRM", *b"gAMA", *b"iCCP", *b"sBIT", *b"sRGB", *b"tEXt", *b"zTXt",
  *b"iTXt", *b"bKGD", *b"hIST", *b"pHYs", *b"oFFs", *b"sCAL", *b"pCAL", *b"sPLT", *b"tIME",
];

fn is_recognized_chunk_name(name: [u8; 4]) -> bool {
  RECOGNIZED_CHUNK_NAMES.contains(&name)
}

fn expand_row_samples(ihdr: &Ihdr, unfiltered: &[u8], width: u32) -> Vec<u16> {
  match ihdr.bit_depth {
    1 | 2 | 4 if matches!(ihdr.color_type, ColorType::Gray | ColorType::Indexed) => {
      crate::transform::expand::expand_packed_samples(ihdr.bit_depth, width, unfiltered)
        .into_iter()
        .map(u16::from)
        .collect()
    }
    8 => unfiltered.iter().map(|&b| u16::from(b)).collect(),
    16 => unfiltered.chunks_exact(2).map(|c| u16::from_be_bytes([c[0], c[1]])).collect(),
    _ => unreachable!(),
  }
}

fn output_channel_count(ihdr: &Ihdr, transform: &crate::TransformConfig) -> usize {
  let mut count = match ihdr.color_type {
    ColorType::Gray | ColorType::Indexed => 1,
    ColorType::GrayAlpha => 2,
    ColorType::Rgb => 3,
    ColorType::Rgba => 4,
  };
  if matches!(ihdr.color_type, ColorType::Indexed) && transform.expand {
    count = 3;
  }
  if transform.rgb_to_gray && count >= 3 {
    count -= 2;
  }
  if transform.gray_to_rgb && count <= 2 {
    count += 2;
  }
  let has_alpha_after_expand = matches!(ihdr.color_type, ColorType::GrayAlpha | ColorType::Rgba);
  if matches!(transform.alpha_mode, crate::AlphaMode::CompositeOverBackground | crate::AlphaMode::CompositeOverColor { .. })
    && has_alpha_after_expand
  {
    count -= 1;
  } else if transform.strip_alpha && has_alpha_after_expand {
    count -= 1;
  }
  if transform.filler.is_some() && count == 3 {
    count = 4;
  }
  count
}

#[allow(clippy::too_many_arguments)]
fn write_pixel(
  ihdr: &Ihdr, info: &ImageInfo, pipeline: &TransformPipeline<'_>, source_samples: &[u16], x: u32, y: u32,
  rows: &mut [DecodedRow], out_channel_count: usize, warnings: &mut Vec<Warning>,
) {
  let mut channels = [0_u16; 4];
  let mut channel_count;

  match ihdr.color_type {
    ColorType::Indexed => {
      let index = source_samples[0] as u8;
      let rgb = info.palette.as_ref().and_then(|p| crate::transform::expand::palette_lookup(p, index));
      if rgb.is_none() {
        warnings.push(Warning { error: PngError::PaletteIndexOutOfRange });
      }
      let Rgb8 { r, g, b } = rgb.unwrap_or(Rgb8 { r: 0, g: 0, b: 0 });
      channels[0] = r as u16;
      channels[1] = g as u16;
      channels[2] = b as u16;
      channel_count = 3;
      if let Some(trns) = &info.transparency {
        channels[3] = crate::transform::expand::transparency_alpha(trns, ihdr.color_type, index as u16, None) as u16;
        channel_count = 4;
      }
    }
    ColorType::Gray => {
      let raw_gray = source_samples[0];
      channel_count = 1;
      if let Some(trns @ Transparency::Gray { .. }) = &info.transparency {
        channels[1] =
          crate::transform::expand::transparency_alpha(trns, ihdr.color_type, raw_gray, None) as u16;
        channel_count = 2;
      }
      channels[0] = if pipeline.config.expand && ihdr.bit_depth < 8 {
        u16::from(crate::transform::expand::replicate_to_byte(ihdr.bit_depth, raw_gray as u8))
      } else {
        raw_gray
      };
    }
    ColorType::GrayAlpha => {
      channels[0] = source_samples[0];
      channels[1] = source_samples[1];
      channel_count = 2;
    }
    ColorType::Rgb => {
      channels[0] = source_samples[0];
      channels[1] = source_samples[1];
      channels[2] = source_samples[2];
      channel_count = 3;
      if let Some(Transparency::Rgb { .. }) = &info.transparency {
        channels[3] = crate::transform::expand::transparency_alpha(
          info.transparency.as_ref().unwrap(),
          ihdr.color_type,
          0,
          Some((source_samples[0], source_samples[1], source_samples[2])),
        ) as u16;
        channel_count = 4;
      }
    }
    ColorType::Rgba => {
      channels[..4].copy_from_slice(&source_samples[..4]);
      channel_count = 4;
    }
  }

  let background = info.background.as_ref().map(|bg| match *bg {
    Background::Gray { gray } => [gray, gray, gray],
    Background::Rgb { r, g, b } => [r, g, b],
    Background::PaletteIndex { index } => info
      .palette
      .as_ref()
      .and_then(|p| crate::transform::expand::palette_lookup(p, index))
      .map_or([0, 0, 0], |Rgb8 { r, g, b }| [r as u16, g as u16, b as u16]),
  });

  pipeline.apply_pixel(&mut channels, &mut channel_count, background);

  let row = &mut rows[y as usize];
  let base = x as usize * out_channel_count;
  let n = channel_count.min(out_channel_count);
  row.samples[base..base + n].copy_from_slice(&channels[..n]);
}

/// A warning-observing side channel; when the `trace` feature is on, every
/// recorded [`Warning`] is also emitted through [`crate::trace!`].
pub fn emit_trace(warnings: &[Warning]) {
  for _w in warnings {
    crate::trace!("png warning: {:?}", _w.error);
  }
}
