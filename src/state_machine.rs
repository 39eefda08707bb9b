//! The chunk-ordering state machine.
//!
//! PNG's chunk order rules aren't optional: `PLTE` must precede the first
//! `IDAT`, `IDAT` chunks must be contiguous, `IHDR` must be first and
//! `IEND` last. This is modeled as an explicit state machine (one enum
//! variant per stage of the stream) rather than a pile of booleans checked
//! ad hoc at each chunk, so a new ordering rule is one match arm instead of
//! a new flag threaded through every call site.

use crate::{ChunkName, DecoderFlags, PngError};

/// Where a decode is within the chunk stream's required ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkState {
  ExpectIhdr,
  BeforePlte,
  InIdat,
  AfterIdat,
  Done,
}

/// A chunk-ordering violation. Distinct from [`PngError`] because this
/// crate separates "the chunk's own data is malformed" from "the chunk
/// appeared somewhere the stream grammar forbids" — the first often gets a
/// skip-and-continue leniency, the second almost never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateMachineError {
  FirstChunkNotIhdr,
  SecondIhdr,
  PaletteAfterIdat,
  PaletteNotAllowedForColorType,
  TransparencyBeforePlteForIndexed,
  TransparencyAfterIdat,
  IdatNotContiguous,
  NoIdat,
  ChunkAfterIend,
  DuplicateSingletonChunk,
  ColorSpaceChunkAfterPlte,
}
impl From<StateMachineError> for PngError {
  fn from(e: StateMachineError) -> Self {
    match e {
      StateMachineError::NoIdat => PngError::NoIDATChunks,
      StateMachineError::IdatNotContiguous => PngError::IDATNotContiguous,
      _ => PngError::ChunkOutOfOrder,
    }
  }
}

impl ChunkState {
  #[must_use]
  pub const fn new() -> Self {
    Self::ExpectIhdr
  }

  /// Advances the state machine past one chunk, checking it against the
  /// ordering rules. `color_type` must be `Some` once `IHDR` has been seen.
  pub fn advance(
    &mut self, name: ChunkName, color_type: Option<crate::ColorType>, flags: &mut DecoderFlags,
  ) -> Result<(), StateMachineError> {
    use crate::ColorType as C;
    if *self == Self::Done {
      return Err(StateMachineError::ChunkAfterIend);
    }
    if name == b"IHDR" {
      if *self != Self::ExpectIhdr {
        return Err(StateMachineError::SecondIhdr);
      }
      flags.insert(DecoderFlags::SAW_IHDR);
      *self = Self::BeforePlte;
      return Ok(());
    }
    if *self == Self::ExpectIhdr {
      return Err(StateMachineError::FirstChunkNotIhdr);
    }
    if name == b"IEND" {
      if *self != Self::AfterIdat && *self != Self::InIdat {
        return Err(StateMachineError::NoIdat);
      }
      flags.insert(DecoderFlags::SAW_IEND);
      *self = Self::Done;
      return Ok(());
    }
    if name == b"PLTE" {
      if *self != Self::BeforePlte {
        return Err(StateMachineError::PaletteAfterIdat);
      }
      if matches!(color_type, Some(C::Gray | C::GrayAlpha)) {
        return Err(StateMachineError::PaletteNotAllowedForColorType);
      }
      if flags.contains(DecoderFlags::SAW_PLTE) {
        return Err(StateMachineError::DuplicateSingletonChunk);
      }
      flags.insert(DecoderFlags::SAW_PLTE);
      return Ok(());
    }
    if name == b"tRNS" {
      if matches!(color_type, Some(C::Indexed)) && !flags.contains(DecoderFlags::SAW_PLTE) {
        return Err(StateMachineError::TransparencyBeforePlteForIndexed);
      }
      if *self != Self::BeforePlte {
        return Err(StateMachineError::TransparencyAfterIdat);
      }
      if flags.contains(DecoderFlags::SAW_TRNS) {
        return Err(StateMachineError::DuplicateSingletonChunk);
      }
      flags.insert(DecoderFlags::SAW_TRNS);
      return Ok(());
    }
    if is_color_space_chunk(name) && flags.contains(DecoderFlags::SAW_PLTE) {
      return Err(StateMachineError::ColorSpaceChunkAfterPlte);
    }
    if let Some(singleton_flag) = singleton_ancillary_flag(name) {
      if flags.contains(singleton_flag) {
        return Err(StateMachineError::DuplicateSingletonChunk);
      }
      flags.insert(singleton_flag);
    }
    if name == b"IDAT" {
      match *self {
        Self::BeforePlte | Self::InIdat => {
          flags.insert(DecoderFlags::SAW_IDAT);
          *self = Self::InIdat;
        }
        Self::AfterIdat => return Err(StateMachineError::IdatNotContiguous),
        Self::ExpectIhdr | Self::Done => unreachable!(),
      }
      return Ok(());
    }
    // Any other ancillary chunk: ends a run of IDAT chunks if one was open,
    // but doesn't otherwise constrain ordering beyond "before IEND".
    if *self == Self::InIdat {
      *self = Self::AfterIdat;
    }
    Ok(())
  }
}
impl Default for ChunkState {
  fn default() -> Self {
    Self::new()
  }
}

/// True for the chunks that describe how to interpret `PLTE`'s entries
/// (palette-relative color space or significant-bits info); these must all
/// precede `PLTE` when it's present, since a decoder applying them after
/// the palette's already been read would be correcting colors it already
/// handed out.
fn is_color_space_chunk(name: ChunkName) -> bool {
  matches!(name.as_bytes(), *b"cHRM" | *b"gAMA" | *b"iCCP" | *b"sBIT" | *b"sRGB")
}

/// The [`DecoderFlags`] bit guarding a chunk type that PNG allows at most
/// once per stream, for the ancillary chunks this crate tracks. `None` for
/// anything not subject to a one-per-stream rule (or not tracked at all,
/// e.g. `sPLT`/`tEXt`/`zTXt`/`iTXt`, which may legitimately repeat).
fn singleton_ancillary_flag(name: ChunkName) -> Option<DecoderFlags> {
  match name.as_bytes() {
    b"gAMA" => Some(DecoderFlags::SAW_GAMA),
    b"sRGB" => Some(DecoderFlags::SAW_SRGB),
    b"iCCP" => Some(DecoderFlags::SAW_ICCP),
    b"bKGD" => Some(DecoderFlags::SAW_BKGD),
    b"hIST" => Some(DecoderFlags::SAW_HIST),
    b"cHRM" => Some(DecoderFlags::SAW_CHRM),
    b"sBIT" => Some(DecoderFlags::SAW_SBIT),
    b"pHYs" => Some(DecoderFlags::SAW_PHYS),
    b"tIME" => Some(DecoderFlags::SAW_TIME),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ColorType;

  fn name(s: &[u8; 4]) -> ChunkName {
    ChunkName(*s)
  }

  #[test]
  fn accepts_minimal_valid_order() {
    let mut state = ChunkState::new();
    let mut flags = DecoderFlags::empty();
    state.advance(name(b"IHDR"), None, &mut flags).unwrap();
    state.advance(name(b"IDAT"), Some(ColorType::Gray), &mut flags).unwrap();
    state.advance(name(b"IEND"), Some(ColorType::Gray), &mut flags).unwrap();
    assert_eq!(state, ChunkState::Done);
  }

  #[test]
  fn rejects_non_ihdr_first_chunk() {
    let mut state = ChunkState::new();
    let mut flags = DecoderFlags::empty();
    assert_eq!(
      state.advance(name(b"IDAT"), None, &mut flags),
      Err(StateMachineError::FirstChunkNotIhdr)
    );
  }

  #[test]
  fn rejects_plte_after_idat() {
    let mut state = ChunkState::new();
    let mut flags = DecoderFlags::empty();
    state.advance(name(b"IHDR"), None, &mut flags).unwrap();
    state.advance(name(b"IDAT"), Some(ColorType::Indexed), &mut flags).unwrap();
    assert_eq!(
      state.advance(name(b"PLTE"), Some(ColorType::Indexed), &mut flags),
      Err(StateMachineError::PaletteAfterIdat)
    );
  }

  #[test]
  fn rejects_non_contiguous_idat() {
    let mut state = ChunkState::new();
    let mut flags = DecoderFlags::empty();
    state.advance(name(b"IHDR"), None, &mut flags).unwrap();
    state.advance(name(b"IDAT"), Some(ColorType::Gray), &mut flags).unwrap();
    state.advance(name(b"tEXt"), Some(ColorType::Gray), &mut flags).unwrap();
    assert_eq!(
      state.advance(name(b"IDAT"), Some(ColorType::Gray), &mut flags),
      Err(StateMachineError::IdatNotContiguous)
    );
  }

  #[test]
  fn rejects_palette_color_type_mismatch() {
    let mut state = ChunkState::new();
    let mut flags = DecoderFlags::empty();
    state.advance(name(b"IHDR"), None, &mut flags).unwrap();
    assert_eq!(
      state.advance(name(b"PLTE"), Some(ColorType::Gray), &mut flags),
      Err(StateMachineError::PaletteNotAllowedForColorType)
    );
  }

  #[test]
  fn rejects_gama_after_plte() {
    let mut state = ChunkState::new();
    let mut flags = DecoderFlags::empty();
    state.advance(name(b"IHDR"), None, &mut flags).unwrap();
    state.advance(name(b"PLTE"), Some(ColorType::Indexed), &mut flags).unwrap();
    assert_eq!(
      state.advance(name(b"gAMA"), Some(ColorType::Indexed), &mut flags),
      Err(StateMachineError::ColorSpaceChunkAfterPlte)
    );
  }

  #[test]
  fn accepts_gama_before_plte() {
    let mut state = ChunkState::new();
    let mut flags = DecoderFlags::empty();
    state.advance(name(b"IHDR"), None, &mut flags).unwrap();
    state.advance(name(b"gAMA"), Some(ColorType::Indexed), &mut flags).unwrap();
    state.advance(name(b"PLTE"), Some(ColorType::Indexed), &mut flags).unwrap();
  }

  #[test]
  fn rejects_chunk_after_iend() {
    let mut state = ChunkState::new();
    let mut flags = DecoderFlags::empty();
    state.advance(name(b"IHDR"), None, &mut flags).unwrap();
    state.advance(name(b"IDAT"), Some(ColorType::Gray), &mut flags).unwrap();
    state.advance(name(b"IEND"), Some(ColorType::Gray), &mut flags).unwrap();
    assert_eq!(
      state.advance(name(b"tEXt"), Some(ColorType::Gray), &mut flags),
      Err(StateMachineError::ChunkAfterIend)
    );
  }
}
