//! Reader/writer for the Named Binary Tag (NBT) format used by
//! block-world game saves: a compact, self-describing binary tree format
//! of named, typed tags, optionally gzip- or zlib-framed.

mod codec;
mod compress;
mod kind;
mod reader;
mod tag;
mod writer;

pub mod error;

pub use compress::CompressionMode;
pub use error::{Error, Result};
pub use kind::TagType;
pub use tag::{Tag, TagValue};

use std::io::{self, Read};

/// Reads a tag tree from `reader`, applying `mode`'s decompression
/// (sniffing magic bytes first when `mode` is [`CompressionMode::Auto`]).
/// The root tag's type is not constrained; use [`read_compound_root`] when
/// the caller requires a Compound root.
pub fn from_reader<R: Read>(mut reader: R, mode: CompressionMode) -> Result<Tag> {
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;
    from_slice(&raw, mode)
}

/// Reads a tag tree from an already-materialized buffer.
pub fn from_slice(bytes: &[u8], mode: CompressionMode) -> Result<Tag> {
    let decompressed = compress::decompress(bytes, mode)?;
    codec::parse_root(&decompressed)
}

/// Like [`from_slice`], but rejects any root tag that isn't a Compound,
/// matching the shape real game-save files always use.
pub fn read_compound_root(bytes: &[u8], mode: CompressionMode) -> Result<Tag> {
    let tag = from_slice(bytes, mode)?;
    match tag.value {
        TagValue::Compound(_) => Ok(tag),
        _ => Err(Error::ExpectedCompoundRoot(tag.tag_type())),
    }
}

/// Serializes `tag` and applies `mode`'s compression. `Auto` resolves to
/// gzip, since there's nothing to sniff when writing.
pub fn to_writer<W: io::Write>(mut writer: W, tag: &Tag, mode: CompressionMode) -> Result<()> {
    let bytes = to_bytes(tag, mode)?;
    writer.write_all(&bytes)?;
    Ok(())
}

/// Serializes `tag` and applies `mode`'s compression, returning the bytes
/// directly rather than writing them to a sink.
pub fn to_bytes(tag: &Tag, mode: CompressionMode) -> Result<Vec<u8>> {
    let raw = codec::write_root(tag)?;
    compress::compress(&raw, mode)
}
