//! The compression frame that wraps the tag codec's byte stream.
//!
//! Decompression and recompression are delegated entirely to `flate2`
//! rather than hand-rolled, which sidesteps the framing bugs a byte-exact
//! reimplementation would have had to either reproduce or patch around
//! (an unskipped gzip FEXTRA field, and a gzip trailer ISIZE written at
//! native pointer width instead of a fixed 4 bytes).

use std::io::{Read, Write};

use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::ZlibEncoder;
use flate2::{Compression, GzBuilder};
use log::trace;

use crate::error::Result;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const ZLIB_MAGIC: u8 = 0x78;

/// Selects which compression framing, if any, wraps the tag stream.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompressionMode {
    /// Sniff the input's magic bytes on read; resolves to [`CompressionMode::Gzip`]
    /// when used for writing, since there is nothing to sniff.
    #[default]
    Auto,
    Gzip,
    Zlib,
    Raw,
}

impl CompressionMode {
    fn detect(bytes: &[u8]) -> CompressionMode {
        if bytes.len() >= 2 && bytes[0..2] == GZIP_MAGIC {
            CompressionMode::Gzip
        } else if !bytes.is_empty() && bytes[0] == ZLIB_MAGIC {
            CompressionMode::Zlib
        } else {
            CompressionMode::Raw
        }
    }
}

/// Reads all of `input`, applying the decompression implied by `mode`
/// (sniffing the first bytes when `mode` is [`CompressionMode::Auto`]).
pub(crate) fn decompress(input: &[u8], mode: CompressionMode) -> Result<Vec<u8>> {
    let resolved = match mode {
        CompressionMode::Auto => CompressionMode::detect(input),
        other => other,
    };
    trace!("decompressing {} bytes as {:?}", input.len(), resolved);

    let mut out = Vec::new();
    match resolved {
        CompressionMode::Gzip => {
            GzDecoder::new(input).read_to_end(&mut out)?;
        }
        CompressionMode::Zlib => {
            ZlibDecoder::new(input).read_to_end(&mut out)?;
        }
        CompressionMode::Raw | CompressionMode::Auto => {
            out.extend_from_slice(input);
        }
    }
    Ok(out)
}

/// Compresses `payload` per `mode`. `Auto` resolves to gzip, matching the
/// original's own default when asked to write without an explicit scheme.
pub(crate) fn compress(payload: &[u8], mode: CompressionMode) -> Result<Vec<u8>> {
    let resolved = if mode == CompressionMode::Auto {
        CompressionMode::Gzip
    } else {
        mode
    };
    trace!("compressing {} bytes as {:?}", payload.len(), resolved);

    let mut out = Vec::new();
    match resolved {
        CompressionMode::Gzip => {
            // A fixed mtime keeps output deterministic across runs.
            let mut encoder = GzBuilder::new().mtime(0).write(&mut out, Compression::best());
            encoder.write_all(payload)?;
            encoder.finish()?;
        }
        CompressionMode::Zlib => {
            let mut encoder = ZlibEncoder::new(&mut out, Compression::best());
            encoder.write_all(payload)?;
            encoder.finish()?;
        }
        CompressionMode::Raw | CompressionMode::Auto => {
            out.extend_from_slice(payload);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gzip_round_trips_under_auto_detection() {
        let payload = b"hello nbt world".repeat(8);
        let compressed = compress(&payload, CompressionMode::Gzip).unwrap();
        assert_eq!(&compressed[0..2], &GZIP_MAGIC);

        let out = decompress(&compressed, CompressionMode::Auto).unwrap();
        assert_eq!(out, payload);
    }

    #[test]
    fn zlib_round_trips_under_auto_detection() {
        let payload = b"hello nbt world".repeat(8);
        let compressed = compress(&payload, CompressionMode::Zlib).unwrap();
        assert_eq!(compressed[0], ZLIB_MAGIC);

        let out = decompress(&compressed, CompressionMode::Auto).unwrap();
        assert_eq!(out, payload);
    }

    #[test]
    fn raw_mode_is_a_passthrough() {
        let payload = b"uncompressed".to_vec();
        let compressed = compress(&payload, CompressionMode::Raw).unwrap();
        assert_eq!(compressed, payload);
        let out = decompress(&compressed, CompressionMode::Raw).unwrap();
        assert_eq!(out, payload);
    }

    #[test]
    fn auto_mode_resolves_to_gzip_on_write() {
        let payload = b"auto picks gzip".to_vec();
        let compressed = compress(&payload, CompressionMode::Auto).unwrap();
        assert_eq!(&compressed[0..2], &GZIP_MAGIC);
    }

    #[test]
    fn scenario_s6_truncated_gzip_stream_errors_instead_of_panicking() {
        // Real gzip header bytes with no deflate payload or trailer at all.
        let truncated = [0x1f, 0x8b, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff];
        let result = decompress(&truncated, CompressionMode::Auto);
        assert!(result.is_err());
    }
}
