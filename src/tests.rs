//! End-to-end scenarios that exercise several modules together: a full
//! byte stream in, a [`crate::Decoder`] out. Per-module unit tests already
//! cover individual algorithms in isolation; these cover the wiring.

use crate::{
  ChunkCrcPolicy, CrcAction, Crc32, DecoderConfig, PngError, TransformConfig,
};
use alloc::{vec, vec::Vec};

fn adler32(data: &[u8]) -> u32 {
  let mut a: u32 = 1;
  let mut b: u32 = 0;
  for &byte in data {
    a = (a + byte as u32) % 65521;
    b = (b + a) % 65521;
  }
  (b << 16) | a
}

/// Wraps `data` in a zlib stream using an uncompressed ("stored") DEFLATE
/// block, so tests don't need a real compressor to build fixtures.
fn zlib_store(data: &[u8]) -> Vec<u8> {
  let mut out = vec![0x78, 0x01];
  // Stored block, final: BFINAL=1, BTYPE=00, then byte-aligned LEN/NLEN.
  out.push(0x01);
  let len = data.len() as u16;
  out.extend_from_slice(&len.to_le_bytes());
  out.extend_from_slice(&(!len).to_le_bytes());
  out.extend_from_slice(data);
  out.extend_from_slice(&adler32(data).to_be_bytes());
  out
}

fn chunk(name: &[u8; 4], data: &[u8]) -> Vec<u8> {
  let mut out = Vec::with_capacity(12 + data.len());
  out.extend_from_slice(&(data.len() as u32).to_be_bytes());
  out.extend_from_slice(name);
  out.extend_from_slice(data);
  out.extend_from_slice(&Crc32::of_chunk(*name, data).to_be_bytes());
  out
}

fn ihdr_data(width: u32, height: u32, bit_depth: u8, color_type: u8, interlace: u8) -> [u8; 13] {
  let mut out = [0_u8; 13];
  out[0..4].copy_from_slice(&width.to_be_bytes());
  out[4..8].copy_from_slice(&height.to_be_bytes());
  out[8] = bit_depth;
  out[9] = color_type;
  out[12] = interlace;
  out
}

fn minimal_png(width: u32, height: u32, color_type: u8, filtered_rows: &[u8]) -> Vec<u8> {
  let mut bytes = crate::PNG_SIGNATURE.to_vec();
  bytes.extend(chunk(b"IHDR", &ihdr_data(width, height, 8, color_type, 0)));
  bytes.extend(chunk(b"IDAT", &zlib_store(filtered_rows)));
  bytes.extend(chunk(b"IEND", &[]));
  bytes
}

#[test]
fn decodes_one_by_one_gray_pixel() {
  // One scanline: filter byte None (0), one gray sample.
  let png = minimal_png(1, 1, 0, &[0, 200]);
  let decoder =
    crate::Decoder::new(&png, &DecoderConfig::default(), &TransformConfig::default()).unwrap();
  let rows = decoder.into_rows();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].samples[0], 200);
}

#[test]
fn decodes_two_by_one_rgb_row_with_sub_filter() {
  // Sub filter (1): first pixel as-is, second pixel accumulates from the first.
  let filtered = [1, 10, 20, 30, 5, 5, 5];
  let png = minimal_png(2, 1, 2, &filtered);
  let decoder =
    crate::Decoder::new(&png, &DecoderConfig::default(), &TransformConfig::default()).unwrap();
  let rows = decoder.into_rows();
  assert_eq!(rows[0].samples[0..3], [10, 20, 30]);
  assert_eq!(rows[0].samples[3..6], [15, 25, 35]);
}

#[test]
fn rejects_stream_with_no_idat() {
  let mut bytes = crate::PNG_SIGNATURE.to_vec();
  bytes.extend(chunk(b"IHDR", &ihdr_data(1, 1, 8, 0, 0)));
  bytes.extend(chunk(b"IEND", &[]));
  let err =
    crate::Decoder::new(&bytes, &DecoderConfig::default(), &TransformConfig::default()).unwrap_err();
  assert_eq!(err, PngError::NoIDATChunks);
}

#[test]
fn rejects_indexed_image_without_palette() {
  let png = minimal_png(1, 1, 3, &[0, 0]);
  let err =
    crate::Decoder::new(&png, &DecoderConfig::default(), &TransformConfig::default()).unwrap_err();
  assert_eq!(err, PngError::MissingPalette);
}

#[test]
fn crc_mismatch_on_ancillary_chunk_is_a_warning_by_default() {
  let mut bytes = crate::PNG_SIGNATURE.to_vec();
  bytes.extend(chunk(b"IHDR", &ihdr_data(1, 1, 8, 0, 0)));
  // tEXt chunk with a deliberately wrong CRC trailer.
  let mut bad_text = Vec::new();
  bad_text.extend_from_slice(&5_u32.to_be_bytes());
  bad_text.extend_from_slice(b"tEXt");
  bad_text.extend_from_slice(b"k\0v");
  bad_text.extend_from_slice(&0xDEAD_BEEF_u32.to_be_bytes());
  bytes.extend(bad_text);
  bytes.extend(chunk(b"IDAT", &zlib_store(&[0, 100])));
  bytes.extend(chunk(b"IEND", &[]));

  let decoder =
    crate::Decoder::new(&bytes, &DecoderConfig::default(), &TransformConfig::default()).unwrap();
  assert!(decoder.warnings.iter().any(|w| w.error == PngError::CrcMismatch));
}

#[test]
fn crc_mismatch_on_ancillary_chunk_is_fatal_under_reject_policy() {
  let mut bytes = crate::PNG_SIGNATURE.to_vec();
  bytes.extend(chunk(b"IHDR", &ihdr_data(1, 1, 8, 0, 0)));
  let mut bad_text = Vec::new();
  bad_text.extend_from_slice(&5_u32.to_be_bytes());
  bad_text.extend_from_slice(b"tEXt");
  bad_text.extend_from_slice(b"k\0v");
  bad_text.extend_from_slice(&0xDEAD_BEEF_u32.to_be_bytes());
  bytes.extend(bad_text);
  bytes.extend(chunk(b"IDAT", &zlib_store(&[0, 100])));
  bytes.extend(chunk(b"IEND", &[]));

  let config = DecoderConfig {
    chunk_crc_policy: ChunkCrcPolicy { critical: CrcAction::Reject, ancillary: CrcAction::Reject },
    ..DecoderConfig::default()
  };
  let err = crate::Decoder::new(&bytes, &config, &TransformConfig::default()).unwrap_err();
  assert_eq!(err, PngError::CrcMismatch);
}

#[test]
fn gray_tiny_image_round_trips_through_adam7_interlacing() {
  // A 2x2 interlaced image only populates Adam7 passes 1, 6, and 7 (every
  // other pass's starting offset already falls outside a 2x2 image).
  let pass1_row = [0_u8, 11]; // reduced image 1x1, maps to full (0, 0)
  let pass6_row = [0_u8, 99]; // reduced image 1x1, maps to full (1, 0)
  let pass7_row = [0_u8, 22, 33]; // reduced image 2x1, maps to full (0, 1) and (1, 1)
  let mut idat_plain = Vec::new();
  idat_plain.extend_from_slice(&pass1_row);
  idat_plain.extend_from_slice(&pass6_row);
  idat_plain.extend_from_slice(&pass7_row);

  let mut bytes = crate::PNG_SIGNATURE.to_vec();
  bytes.extend(chunk(b"IHDR", &ihdr_data(2, 2, 8, 0, 1)));
  bytes.extend(chunk(b"IDAT", &zlib_store(&idat_plain)));
  bytes.extend(chunk(b"IEND", &[]));

  let decoder =
    crate::Decoder::new(&bytes, &DecoderConfig::default(), &TransformConfig::default()).unwrap();
  let rows = decoder.into_rows();
  assert_eq!(rows[0].samples[0], 11);
  assert_eq!(rows[0].samples[1], 99);
  assert_eq!(rows[1].samples[0], 22);
  assert_eq!(rows[1].samples[1], 33);
}
