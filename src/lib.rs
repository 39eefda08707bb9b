#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

//! `pngcore`: the chunk-stream, zlib/IDAT, row-filter, Adam7, and
//! pixel-transform core of a PNG decoder.
//!
//! This crate does not own I/O. The host hands it a complete PNG byte
//! slice (or feeds chunk bytes incrementally through [`Decoder`]) and pulls
//! decoded scanlines back out one at a time. See [`Decoder`] for the
//! top-level driver.
//!
//! ## Non-goals
//!
//! No encoder, no GUI, no ICC color management beyond recording the
//! profile bytes, no MNG/JNG/APNG.

extern crate alloc;

#[cfg(feature = "trace")]
extern crate std;

/// Emits a trace line when the `trace` feature is enabled; a no-op otherwise.
#[macro_export]
macro_rules! trace {
  ($($arg:tt)*) => {
    #[cfg(feature = "trace")] {
      ::std::print!("{file}:{line}> ", file = file!(), line = line!());
      ::std::println!($($arg)*);
    }
  }
}

mod crc32;
pub use crc32::Crc32;

mod raw_chunk;
pub use raw_chunk::*;

mod ihdr;
pub use ihdr::*;

pub mod chunks;
pub use chunks::*;

mod inflate;
pub use inflate::{InflateError, InflateOwner};

pub mod filter;
pub use filter::FilterType;

mod interlace;
pub use interlace::{InterlaceReassembly, ADAM7_PASSES};

mod gamma;
pub use gamma::GammaTables;

pub mod config;
pub use config::{
  AlphaMode, ChunkCrcPolicy, CrcAction, DecoderConfig, QuantizeConfig, TransformConfig,
  UnknownChunkAction, UnknownChunkDecision, UnknownChunkPolicy,
};

mod info;
pub use info::ImageInfo;

mod state;
pub use state::{DecoderFlags, RowBuffers};

pub mod transform;

mod state_machine;
pub use state_machine::{ChunkState, StateMachineError};

mod decoder;
pub use decoder::{DecodedRow, Decoder};

mod error;
pub use error::{PngError, Severity};

pub type PngResult<T> = Result<T, PngError>;

#[cfg(test)]
mod tests;
