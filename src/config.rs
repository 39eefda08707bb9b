//! Decoder and transform configuration.
//!
//! Plain builder structs rather than a CLI or file format; a host embeds
//! this crate and constructs these directly.

use crate::chunks::Rgb8;
use alloc::vec::Vec;

/// What to do when a chunk's CRC-32 trailer doesn't match its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrcAction {
  /// Drop the chunk (treating it as if it never appeared) and continue.
  Ignore,
  /// Report the mismatch through the warning channel but still use the
  /// chunk's data.
  Warn,
  /// Treat a CRC mismatch on this chunk as a fatal decode error.
  Reject,
}

/// Per-chunk-class CRC handling: critical chunks default to stricter
/// handling than ancillary ones, since a corrupted `IHDR` or `IDAT`
/// produces a garbage image while a corrupted `tEXt` just loses a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkCrcPolicy {
  pub critical: CrcAction,
  pub ancillary: CrcAction,
}
impl Default for ChunkCrcPolicy {
  fn default() -> Self {
    Self { critical: CrcAction::Reject, ancillary: CrcAction::Warn }
  }
}

/// What a chunk name not covered by [`UnknownChunkPolicy::overrides`] (or
/// covered, naming one of these four behaviors) resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownChunkAction {
  /// Fall through to the ordinary critical/ancillary rule: an unrecognized
  /// critical chunk is fatal, an unrecognized ancillary chunk is discarded
  /// with a warning.
  AsDefault,
  /// Always discard, regardless of criticality (still fatal for a critical
  /// chunk, since discarding one silently would mean decoding an image the
  /// format considers incomplete).
  Never,
  /// Discard an unrecognized critical chunk without treating it as fatal,
  /// keep an unrecognized ancillary chunk.
  IfSafe,
  /// Always keep the raw bytes, exposed through [`crate::Chunk::Unknown`],
  /// even for a critical chunk name.
  Always,
}

/// What [`UnknownChunkPolicy::decide`] resolved a chunk name to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownChunkDecision {
  /// Keep the chunk, exposed through [`crate::Chunk::Unknown`].
  Keep,
  /// Drop the chunk silently (no warning; the policy asked for this).
  Discard,
  /// Reject the whole decode: an unrecognized critical chunk under a
  /// policy that doesn't rescue it.
  Fatal,
}

/// Which unknown chunks to keep, mirroring libpng's
/// `png_set_keep_unknown_chunks`: an explicit list of chunk names plus a
/// fallback for anything not named.
#[derive(Debug, Clone)]
pub struct UnknownChunkPolicy {
  pub default_action: UnknownChunkAction,
  pub overrides: Vec<([u8; 4], UnknownChunkAction)>,
}
impl Default for UnknownChunkPolicy {
  fn default() -> Self {
    Self { default_action: UnknownChunkAction::AsDefault, overrides: Vec::new() }
  }
}
impl UnknownChunkPolicy {
  #[must_use]
  pub fn action_for(&self, name: [u8; 4]) -> UnknownChunkAction {
    self.overrides.iter().find(|(n, _)| *n == name).map_or(self.default_action, |(_, a)| *a)
  }

  /// Resolves a chunk name this crate has no dedicated payload for to a
  /// concrete decision, given whether it's critical (uppercase first
  /// letter). Only `always` (or a host-provided handler layered on top of
  /// this crate) can rescue an unrecognized critical chunk; `as-default`
  /// and `never` both make it fatal, and `if-safe` discards it without
  /// failing the decode.
  #[must_use]
  pub fn decide(&self, name: [u8; 4], is_critical: bool) -> UnknownChunkDecision {
    match (self.action_for(name), is_critical) {
      (UnknownChunkAction::Always, _) => UnknownChunkDecision::Keep,
      (UnknownChunkAction::IfSafe, true) => UnknownChunkDecision::Discard,
      (UnknownChunkAction::IfSafe, false) => UnknownChunkDecision::Keep,
      (UnknownChunkAction::Never | UnknownChunkAction::AsDefault, true) => UnknownChunkDecision::Fatal,
      (UnknownChunkAction::Never | UnknownChunkAction::AsDefault, false) => UnknownChunkDecision::Discard,
    }
  }
}

/// How to resolve a `tRNS`/alpha channel against a `bKGD` background during
/// the composite-over-background transform step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaMode {
  /// Leave the alpha channel (or `tRNS` key) in the output; no compositing.
  Straight,
  /// Composite the image over its `bKGD` background (or a caller-supplied
  /// one), producing an opaque result.
  CompositeOverBackground,
  /// Composite over a caller-supplied solid color regardless of `bKGD`.
  CompositeOverColor { r: u16, g: u16, b: u16 },
}

/// Settings for the optional palette-quantization transform step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizeConfig {
  /// Target palette size. Only meaningful when quantizing a non-palette
  /// image down to indexed color (e.g. via [`crate::transform::quantize::reduce_palette`]
  /// before constructing this config).
  pub max_colors: u16,
  /// Whether to dither when mapping to the reduced palette.
  pub dither: bool,
  /// The reduced palette pixels are snapped to. A caller typically builds
  /// this with [`crate::transform::quantize::reduce_palette`] from the
  /// image's own histogram, or supplies a fixed palette (e.g. a web-safe
  /// cube). Empty disables the quantize pipeline step entirely.
  pub palette: Vec<Rgb8>,
}
impl Default for QuantizeConfig {
  fn default() -> Self {
    Self { max_colors: 256, dither: false, palette: Vec::new() }
  }
}

/// Top-level decoder behavior: limits and chunk-handling policy.
#[derive(Debug, Clone)]
pub struct DecoderConfig {
  /// Width and height above which `IHDR` is rejected outright, guarding
  /// against a PNG claiming an implausible size to force a huge allocation.
  pub max_dimension: u32,
  pub chunk_crc_policy: ChunkCrcPolicy,
  pub unknown_chunk_policy: UnknownChunkPolicy,
  /// Decompressed-size cap for `iCCP` and compressed text chunks.
  pub two_pass_inflate_cap: usize,
  /// When set, every [`crate::PngError::default_severity`] of
  /// [`crate::Severity::Warning`] is promoted to fatal instead of being
  /// recorded and skipped.
  pub strict: bool,
  /// Whether an interlaced image's passes are reassembled sparkle-style
  /// (each pass writes only its own exact pixel positions) or block-style
  /// (each pass additionally replicates across the full rectangle it's
  /// currently the best estimate for). Both converge on the same final
  /// image; this only affects what a host sees if it inspects rows before
  /// every pass has run.
  pub interlace_reassembly: crate::InterlaceReassembly,
}
impl Default for DecoderConfig {
  fn default() -> Self {
    Self {
      max_dimension: 17_000,
      chunk_crc_policy: ChunkCrcPolicy::default(),
      unknown_chunk_policy: UnknownChunkPolicy::default(),
      two_pass_inflate_cap: 8 * 1024 * 1024,
      strict: false,
      interlace_reassembly: crate::InterlaceReassembly::Sparkle,
    }
  }
}

/// Settings for the pixel-transform pipeline (§12's ordered steps). Each
/// field independently enables one step; steps that don't apply to the
/// image's color type/bit depth are no-ops.
#[derive(Debug, Clone)]
pub struct TransformConfig {
  /// Expand palette, `tRNS`, and sub-8-bit grayscale/indexed samples up to
  /// one byte (or u16) per channel.
  pub expand: bool,
  /// Strip the alpha channel entirely (after any compositing step runs).
  pub strip_alpha: bool,
  /// Convert RGB to grayscale (luminance-weighted) or grayscale to RGB.
  pub rgb_to_gray: bool,
  pub gray_to_rgb: bool,
  pub alpha_mode: AlphaMode,
  /// Apply gamma correction using the image's `gAMA`/`sRGB` chunk (or an
  /// assumed file gamma) and the caller's assumed screen gamma.
  pub apply_gamma: Option<f32>,
  /// Scale 16-bit samples down to 8-bit by keeping the high byte (the
  /// naive truncating scale). Mutually exclusive with `scale_16` in
  /// practice; if both are set, `scale_16` takes priority.
  pub strip_16: bool,
  /// Scale 16-bit samples down to 8-bit with libpng's accurate rounding
  /// (`(v * 255 + 32895) / 65536`) instead of `strip_16`'s truncation.
  pub scale_16: bool,
  pub scale_8_to_16: bool,
  pub quantize: Option<QuantizeConfig>,
  /// Swap byte order within 16-bit samples (PNG is always big-endian on the
  /// wire; a little-endian host may want this flipped).
  pub swap_endian_16: bool,
  /// Swap RGB(A) channel order to BGR(A).
  pub bgr_order: bool,
  /// Move the alpha channel from the end to the front of each pixel.
  pub alpha_first: bool,
  /// Insert a constant filler channel (e.g. RGB -> RGBX).
  pub filler: Option<(u16, bool)>,
  /// Invert grayscale sample values (for 1-bit masks where 0 means "set").
  pub invert_gray: bool,
  /// Invert the alpha channel's sense (0 = opaque instead of 0 = transparent).
  pub invert_alpha: bool,
  /// Right-shift each channel down to its `sBIT`-declared significant-bit
  /// count (R, G, B, A order; unused trailing entries for grayscale don't
  /// matter). `None` leaves samples at their expanded width.
  pub shift: Option<[u8; 4]>,
  /// Pack multiple sub-byte output samples per byte instead of expanding
  /// each to its own byte (the reverse of `expand` for output, not input).
  /// Applied at the row level after every pixel's gone through
  /// [`crate::transform::TransformPipeline::apply_pixel`], since packing
  /// needs several pixels' worth of samples per output byte.
  pub pack_to_bits: Option<u8>,
  /// Reverse the bit order within packed-bits output bytes.
  pub pack_swap: bool,
  /// A host-provided callback run dead last, after every other configured
  /// step, seeing exactly the channel layout a caller pulling rows back out
  /// of the decoder would see.
  pub user_transform: Option<fn(&mut [u16; 4], &mut usize)>,
}
impl Default for TransformConfig {
  fn default() -> Self {
    Self {
      expand: true,
      strip_alpha: false,
      rgb_to_gray: false,
      gray_to_rgb: false,
      alpha_mode: AlphaMode::Straight,
      apply_gamma: None,
      strip_16: false,
      scale_16: false,
      scale_8_to_16: false,
      quantize: None,
      swap_endian_16: false,
      bgr_order: false,
      alpha_first: false,
      filler: None,
      invert_gray: false,
      invert_alpha: false,
      shift: None,
      pack_to_bits: None,
      pack_swap: false,
      user_transform: None,
    }
  }
}
