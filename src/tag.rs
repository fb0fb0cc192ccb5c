use crate::error::{Error, Result};
use crate::kind::TagType;

/// A single node in an NBT tree: an optional name plus a typed payload.
///
/// The root tag and every List element are unnamed; every other tag
/// carries a name, which is an arbitrary byte string rather than a
/// guaranteed-UTF-8 `String` — the codec round-trips it byte-for-byte
/// and only decodes it lossily for display.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tag {
    pub(crate) name: Option<Vec<u8>>,
    pub value: TagValue,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TagValue {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<u8>),
    String(Vec<u8>),
    /// A homogeneous list: the declared element type plus its elements.
    /// The element type is fixed at construction and is not re-checked
    /// on every append, matching the permissive original behavior.
    List(TagType, Vec<TagValue>),
    /// An ordered sequence of named children, NOT a map: duplicate names
    /// are retained and lookup returns the first match, same as the
    /// original linked-list-backed implementation.
    Compound(Vec<Tag>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Tag {
    pub fn named(name: impl Into<Vec<u8>>, value: TagValue) -> Self {
        Self {
            name: Some(name.into()),
            value,
        }
    }

    pub fn unnamed(value: TagValue) -> Self {
        Self { name: None, value }
    }

    pub fn name(&self) -> Option<&[u8]> {
        self.name.as_deref()
    }

    /// A lossy UTF-8 view of the name, for display and debugging only.
    pub fn name_lossy(&self) -> Option<std::borrow::Cow<'_, str>> {
        self.name.as_deref().map(String::from_utf8_lossy)
    }

    pub fn set_name(&mut self, name: impl Into<Vec<u8>>) {
        self.name = Some(name.into());
    }

    pub fn clear_name(&mut self) {
        self.name = None;
    }

    pub fn tag_type(&self) -> TagType {
        self.value.tag_type()
    }

    /// Appends `value` to this tag if it is a List, erroring otherwise.
    pub fn list_append(&mut self, value: TagValue) -> Result<()> {
        self.value.list_append(value)
    }

    /// Appends `child` to this tag if it is a Compound, erroring otherwise.
    pub fn compound_append(&mut self, child: Tag) -> Result<()> {
        self.value.compound_append(child)
    }

    /// Looks up the first direct child of this Compound with an exactly
    /// matching name. Unlike a naive prefix scan, the full length is
    /// compared, so `"foo"` never matches a child named `"foobar"`.
    pub fn compound_get(&self, name: &[u8]) -> Option<&Tag> {
        self.value.compound_get(name)
    }

    pub fn compound_get_mut(&mut self, name: &[u8]) -> Option<&mut Tag> {
        self.value.compound_get_mut(name)
    }

    pub fn list_get(&self, index: usize) -> Option<&TagValue> {
        self.value.list_get(index)
    }
}

impl TagValue {
    pub fn tag_type(&self) -> TagType {
        match self {
            TagValue::Byte(_) => TagType::Byte,
            TagValue::Short(_) => TagType::Short,
            TagValue::Int(_) => TagType::Int,
            TagValue::Long(_) => TagType::Long,
            TagValue::Float(_) => TagType::Float,
            TagValue::Double(_) => TagType::Double,
            TagValue::ByteArray(_) => TagType::ByteArray,
            TagValue::String(_) => TagType::String,
            TagValue::List(_, _) => TagType::List,
            TagValue::Compound(_) => TagType::Compound,
            TagValue::IntArray(_) => TagType::IntArray,
            TagValue::LongArray(_) => TagType::LongArray,
        }
    }

    pub fn empty_list(element_type: TagType) -> Self {
        TagValue::List(element_type, Vec::new())
    }

    pub fn empty_compound() -> Self {
        TagValue::Compound(Vec::new())
    }

    pub fn list_append(&mut self, value: TagValue) -> Result<()> {
        match self {
            TagValue::List(_, children) => {
                children.push(value);
                Ok(())
            }
            _ => Err(Error::NotAList),
        }
    }

    pub fn compound_append(&mut self, child: Tag) -> Result<()> {
        match self {
            TagValue::Compound(children) => {
                children.push(child);
                Ok(())
            }
            _ => Err(Error::NotACompound),
        }
    }

    pub fn compound_get(&self, name: &[u8]) -> Option<&Tag> {
        match self {
            TagValue::Compound(children) => {
                children.iter().find(|child| child.name() == Some(name))
            }
            _ => None,
        }
    }

    pub fn compound_get_mut(&mut self, name: &[u8]) -> Option<&mut Tag> {
        match self {
            TagValue::Compound(children) => {
                children.iter_mut().find(|child| child.name() == Some(name))
            }
            _ => None,
        }
    }

    pub fn list_get(&self, index: usize) -> Option<&TagValue> {
        match self {
            TagValue::List(_, children) => children.get(index),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&[Tag]> {
        match self {
            TagValue::Compound(children) => Some(children),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<(TagType, &[TagValue])> {
        match self {
            TagValue::List(element_type, children) => Some((*element_type, children)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compound_get_requires_exact_name_match() {
        let mut root = Tag::unnamed(TagValue::empty_compound());
        root.compound_append(Tag::named("foo", TagValue::Byte(1)))
            .unwrap();
        root.compound_append(Tag::named("foobar", TagValue::Byte(2)))
            .unwrap();

        let found = root.compound_get(b"foo").unwrap();
        assert_eq!(found.value, TagValue::Byte(1));
    }

    #[test]
    fn compound_retains_duplicate_names_in_order() {
        let mut root = Tag::unnamed(TagValue::empty_compound());
        root.compound_append(Tag::named("x", TagValue::Int(1)))
            .unwrap();
        root.compound_append(Tag::named("x", TagValue::Int(2)))
            .unwrap();

        let children = root.value.as_compound().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(root.compound_get(b"x").unwrap().value, TagValue::Int(1));
    }

    #[test]
    fn list_append_rejects_non_list_tags() {
        let mut leaf = Tag::unnamed(TagValue::Int(5));
        assert!(matches!(
            leaf.list_append(TagValue::Int(1)),
            Err(Error::NotAList)
        ));
    }

    #[test]
    fn compound_append_rejects_non_compound_tags() {
        let mut leaf = Tag::unnamed(TagValue::Int(5));
        assert!(matches!(
            leaf.compound_append(Tag::unnamed(TagValue::Int(1))),
            Err(Error::NotACompound)
        ));
    }
}
