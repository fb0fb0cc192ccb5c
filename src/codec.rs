//! The recursive tag codec: turns a decompressed byte buffer into a `Tag`
//! tree and back again.

use crate::error::{Error, Result};
use crate::kind::TagType;
use crate::reader::Reader;
use crate::tag::{Tag, TagValue};
use crate::writer::Writer;

/// Parses one tag, optionally preceded by its type byte and name, from
/// `reader`. List elements call this with `parse_header = false` and an
/// `element_type` supplied by the enclosing list instead.
pub(crate) fn parse_tag(
    reader: &mut Reader<'_>,
    parse_header: bool,
    element_type: Option<TagType>,
) -> Result<Option<Tag>> {
    let tag_type = if parse_header {
        let byte = reader.get_byte()?;
        let tag_type = TagType::from_byte(byte).ok_or(Error::InvalidTagType(byte))?;
        if tag_type == TagType::End {
            return Ok(None);
        }
        tag_type
    } else {
        element_type.expect("list elements must supply their element type")
    };

    let name = if parse_header {
        let len = reader.get_short_length()?;
        Some(reader.get_bytes(len)?)
    } else {
        None
    };

    let value = parse_payload(reader, tag_type)?;
    Ok(Some(match name {
        Some(name) => Tag::named(name, value),
        None => Tag::unnamed(value),
    }))
}

fn parse_payload(reader: &mut Reader<'_>, tag_type: TagType) -> Result<TagValue> {
    Ok(match tag_type {
        // End only ever denotes a Compound terminator or an empty list's
        // placeholder element type; a nonempty list declaring End as its
        // element type has no payload shape to parse and is malformed.
        TagType::End => return Err(Error::InvalidTagType(TagType::End.header_byte())),
        TagType::Byte => TagValue::Byte(reader.get_i8()?),
        TagType::Short => TagValue::Short(reader.get_i16()?),
        TagType::Int => TagValue::Int(reader.get_i32()?),
        TagType::Long => TagValue::Long(reader.get_i64()?),
        TagType::Float => TagValue::Float(reader.get_f32()?),
        TagType::Double => TagValue::Double(reader.get_f64()?),
        TagType::ByteArray => {
            let len = reader.get_length()?;
            TagValue::ByteArray(reader.get_bytes(len)?)
        }
        TagType::String => {
            let len = reader.get_short_length()?;
            TagValue::String(reader.get_bytes(len)?)
        }
        TagType::List => {
            let element_byte = reader.get_byte()?;
            let element_type =
                TagType::from_byte(element_byte).ok_or(Error::InvalidTagType(element_byte))?;
            // A non-positive count is an empty list regardless of the
            // element type byte, which is still consumed above.
            let len = reader.get_list_length()?;
            let mut children = Vec::with_capacity(len.min(4096));
            for _ in 0..len {
                let child = parse_payload(reader, element_type)?;
                children.push(child);
            }
            TagValue::List(element_type, children)
        }
        TagType::Compound => {
            let mut children = Vec::new();
            loop {
                match parse_tag(reader, true, None)? {
                    Some(child) => children.push(child),
                    None => break,
                }
            }
            TagValue::Compound(children)
        }
        TagType::IntArray => {
            let len = reader.get_length()?;
            let mut values = Vec::with_capacity(len.min(4096));
            for _ in 0..len {
                values.push(reader.get_i32()?);
            }
            TagValue::IntArray(values)
        }
        TagType::LongArray => {
            let len = reader.get_length()?;
            let mut values = Vec::with_capacity(len.min(4096));
            for _ in 0..len {
                values.push(reader.get_i64()?);
            }
            TagValue::LongArray(values)
        }
    })
}

/// Writes one tag, optionally preceded by its type byte and name, to
/// `writer`. Mirrors `parse_tag`: list elements pass `write_header = false`
/// since their type byte is written once by the enclosing list.
pub(crate) fn write_tag(writer: &mut Writer, tag: &Tag, write_header: bool) -> Result<()> {
    if write_header {
        writer.put_byte(tag.tag_type().header_byte())?;
        writer.put_short_bytes(tag.name().unwrap_or(&[]))?;
    }
    write_payload(writer, &tag.value)
}

fn write_payload(writer: &mut Writer, value: &TagValue) -> Result<()> {
    match value {
        TagValue::Byte(n) => writer.put_i8(*n),
        TagValue::Short(n) => writer.put_i16(*n),
        TagValue::Int(n) => writer.put_i32(*n),
        TagValue::Long(n) => writer.put_i64(*n),
        TagValue::Float(n) => writer.put_f32(*n),
        TagValue::Double(n) => writer.put_f64(*n),
        TagValue::ByteArray(bytes) => {
            writer.put_i32(bytes.len() as i32)?;
            writer.put_bytes(bytes)
        }
        TagValue::String(bytes) => writer.put_short_bytes(bytes),
        TagValue::List(element_type, children) => {
            writer.put_byte(element_type.header_byte())?;
            writer.put_i32(children.len() as i32)?;
            for child in children {
                write_payload(writer, child)?;
            }
            Ok(())
        }
        TagValue::Compound(children) => {
            for child in children {
                write_tag(writer, child, true)?;
            }
            writer.put_byte(TagType::End.header_byte())
        }
        TagValue::IntArray(values) => {
            writer.put_i32(values.len() as i32)?;
            for v in values {
                writer.put_i32(*v)?;
            }
            Ok(())
        }
        TagValue::LongArray(values) => {
            writer.put_i32(values.len() as i32)?;
            for v in values {
                writer.put_i64(*v)?;
            }
            Ok(())
        }
    }
}

/// Parses a root tag from an already-decompressed buffer. The codec itself
/// does not enforce that the root is a Compound; use
/// [`crate::read_compound_root`] when that guarantee is required.
pub(crate) fn parse_root(buffer: &[u8]) -> Result<Tag> {
    let mut reader = Reader::new(buffer);
    parse_tag(&mut reader, true, None)?.ok_or(Error::TruncatedStream)
}

pub(crate) fn write_root(tag: &Tag) -> Result<Vec<u8>> {
    let mut writer = Writer::new();
    write_tag(&mut writer, tag, true)?;
    Ok(writer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::TagValue;

    #[test]
    fn round_trips_a_compound_with_mixed_children() {
        let mut root = Tag::named("root", TagValue::empty_compound());
        root.compound_append(Tag::named("health", TagValue::Short(20)))
            .unwrap();
        root.compound_append(Tag::named("name", TagValue::String(b"Steve".to_vec())))
            .unwrap();

        let mut inventory = Tag::named("inventory", TagValue::empty_list(TagType::Int));
        inventory.list_append(TagValue::Int(1)).unwrap();
        inventory.list_append(TagValue::Int(2)).unwrap();
        root.compound_append(inventory).unwrap();

        let bytes = write_root(&root).unwrap();
        let parsed = parse_root(&bytes).unwrap();
        assert_eq!(parsed, root);
    }

    #[test]
    fn rejects_unknown_tag_type_byte() {
        let bytes = [99u8, 0, 0];
        let err = parse_root(&bytes).unwrap_err();
        assert!(matches!(err, Error::InvalidTagType(99)));
    }

    #[test]
    fn rejects_negative_array_length() {
        // Byte = 7 (ByteArray), empty name, length -1.
        let bytes = [7u8, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF];
        let err = parse_root(&bytes).unwrap_err();
        assert!(matches!(err, Error::MalformedLength(-1)));
    }

    #[test]
    fn empty_compound_round_trips() {
        let root = Tag::unnamed(TagValue::empty_compound());
        let bytes = write_root(&root).unwrap();
        let parsed = parse_root(&bytes).unwrap();
        assert_eq!(parsed, root);
    }

    #[test]
    fn list_with_negative_count_parses_as_empty() {
        // List = 9, empty name, element type Byte = 1, count -1.
        let bytes = [9u8, 0, 0, 1, 0xFF, 0xFF, 0xFF, 0xFF];
        let parsed = parse_root(&bytes).unwrap();
        assert_eq!(parsed.value, TagValue::List(TagType::Byte, vec![]));
    }

    #[test]
    fn list_declaring_end_as_element_type_with_children_is_an_error() {
        // List = 9, empty name, element type End = 0, count 1.
        let bytes = [9u8, 0, 0, 0, 0, 0, 0, 1];
        let err = parse_root(&bytes).unwrap_err();
        assert!(matches!(err, Error::InvalidTagType(0)));
    }

    #[test]
    fn byte_array_length_past_end_of_buffer_is_rejected_without_allocating() {
        // ByteArray = 7, empty name, declared length 0x7FFFFFFF, no payload bytes.
        let bytes = [7u8, 0, 0, 0x7F, 0xFF, 0xFF, 0xFF];
        let err = parse_root(&bytes).unwrap_err();
        assert!(matches!(err, Error::MalformedLength(len) if len == 0x7FFFFFFF));
    }

    #[test]
    fn scenario_s2_builds_and_round_trips_literal_bigtest_values() {
        let mut root = Tag::named("Level", TagValue::empty_compound());
        root.compound_append(Tag::named("longTest", TagValue::Long(9223372036854775807)))
            .unwrap();
        root.compound_append(Tag::named("shortTest", TagValue::Short(32767)))
            .unwrap();
        let string = "HELLO WORLD THIS IS A TEST STRING \u{00C5}\u{00C4}\u{00D6}!";
        assert_eq!(string.as_bytes().len(), 41);
        root.compound_append(Tag::named(
            "stringTest",
            TagValue::String(string.as_bytes().to_vec()),
        ))
        .unwrap();

        let bytes = write_root(&root).unwrap();
        let parsed = parse_root(&bytes).unwrap();
        assert_eq!(
            parsed.compound_get(b"longTest").unwrap().value,
            TagValue::Long(9223372036854775807)
        );
        assert_eq!(
            parsed.compound_get(b"shortTest").unwrap().value,
            TagValue::Short(32767)
        );
        assert_eq!(
            parsed.compound_get(b"stringTest").unwrap().value,
            TagValue::String(string.as_bytes().to_vec())
        );
    }

    #[test]
    fn scenario_s3_empty_named_compound_is_byte_exact() {
        let root = Tag::named("", TagValue::empty_compound());
        let bytes = write_root(&root).unwrap();
        assert_eq!(bytes, vec![0x0A, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn scenario_s4_nested_compound_is_byte_exact() {
        let mut root = Tag::named("a", TagValue::empty_compound());
        root.compound_append(Tag::named("b", TagValue::Int(1)))
            .unwrap();

        let bytes = write_root(&root).unwrap();
        #[rustfmt::skip]
        let expected = vec![
            0x0A, 0x00, 0x01, b'a',
            0x03, 0x00, 0x01, b'b', 0x00, 0x00, 0x00, 0x01,
            0x00,
        ];
        assert_eq!(bytes, expected);
        assert_eq!(parse_root(&bytes).unwrap(), root);
    }

    #[test]
    fn scenario_s5_invalid_type_code_yields_no_tag() {
        let bytes = [99u8, 0, 0];
        let err = parse_root(&bytes).unwrap_err();
        assert!(matches!(err, Error::InvalidTagType(99)));
    }

    #[test]
    fn property5_big_endian_invariance() {
        let mut writer = Writer::new();
        write_payload(&mut writer, &TagValue::Int(0x01020304)).unwrap();
        assert_eq!(writer.into_inner(), vec![0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn property6_compound_terminator_is_a_single_end_byte() {
        let root = Tag::unnamed(TagValue::empty_compound());
        let bytes = write_root(&root).unwrap();
        assert_eq!(*bytes.last().unwrap(), TagType::End.header_byte());
    }

    #[test]
    fn property7_empty_list_emits_type_byte_then_zero_count() {
        let mut writer = Writer::new();
        write_payload(&mut writer, &TagValue::empty_list(TagType::Short)).unwrap();
        assert_eq!(
            writer.into_inner(),
            vec![TagType::Short.header_byte(), 0x00, 0x00, 0x00, 0x00]
        );
    }
}
