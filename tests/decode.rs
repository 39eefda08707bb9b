//! Integration-level smoke test: decoding through the public API from
//! outside the crate, the way a host application would.

use pngcore::{DecoderConfig, TransformConfig};

fn adler32(data: &[u8]) -> u32 {
  let mut a: u32 = 1;
  let mut b: u32 = 0;
  for &byte in data {
    a = (a + byte as u32) % 65521;
    b = (b + a) % 65521;
  }
  (b << 16) | a
}

fn zlib_store(data: &[u8]) -> Vec<u8> {
  let mut out = vec![0x78, 0x01];
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
  out.extend_from_slice(&pngcore::Crc32::of_chunk(*name, data).to_be_bytes());
  out
}

#[test]
fn decodes_a_two_by_two_rgba_image_through_the_public_api() {
  let mut ihdr = [0_u8; 13];
  ihdr[0..4].copy_from_slice(&2_u32.to_be_bytes());
  ihdr[4..8].copy_from_slice(&2_u32.to_be_bytes());
  ihdr[8] = 8; // bit depth
  ihdr[9] = 6; // RGBA

  // Two scanlines, filter type None, 4 bytes per pixel.
  let row0 = [0_u8, 255, 0, 0, 255, 0, 255, 0, 255];
  let row1 = [0_u8, 0, 0, 255, 255, 10, 10, 10, 10];
  let mut plain = Vec::new();
  plain.extend_from_slice(&row0);
  plain.extend_from_slice(&row1);

  let mut bytes = pngcore::PNG_SIGNATURE.to_vec();
  bytes.extend(chunk(b"IHDR", &ihdr));
  bytes.extend(chunk(b"IDAT", &zlib_store(&plain)));
  bytes.extend(chunk(b"IEND", &[]));

  let decoder =
    pngcore::Decoder::new(&bytes, &DecoderConfig::default(), &TransformConfig::default()).unwrap();
  assert_eq!(decoder.info.ihdr.width, 2);
  assert_eq!(decoder.info.ihdr.height, 2);
  let rows = decoder.into_rows();
  assert_eq!(rows.len(), 2);
  assert_eq!(&rows[0].samples[0..4], &[255, 0, 0, 255]);
  assert_eq!(&rows[0].samples[4..8], &[0, 255, 0, 255]);
  assert_eq!(&rows[1].samples[0..4], &[0, 0, 255, 255]);
  assert_eq!(&rows[1].samples[4..8], &[10, 10, 10, 10]);
}

#[test]
fn rejects_bytes_without_the_png_signature() {
  let err = pngcore::Decoder::new(b"not a png", &DecoderConfig::default(), &TransformConfig::default())
    .unwrap_err();
  assert_eq!(err, pngcore::PngError::NotAPngFile);
}
