//! Ordered records of named fields, nested records, and fixed sequences.

use std::io::{Read, Write};

use bitstream::{ByteReader, ByteWriter};
use indexmap::IndexMap;

use crate::error::{SchemaError, SchemaResult};
use crate::field::{Field, FieldValue};
use crate::version::FormatVersion;

/// One entry of a record: a leaf field, a nested record, or a fixed-length
/// sequence of nodes.
///
/// The set of node shapes is closed, so every element the codec meets is
/// one it knows how to read and write.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Node {
    Field(Field),
    Record(Record),
    Seq(Vec<Node>),
}

impl Node {
    /// Decodes this node in place.
    pub fn read<R: Read>(
        &mut self,
        reader: &mut ByteReader<R>,
        version: FormatVersion,
    ) -> SchemaResult<()> {
        match self {
            Self::Field(field) => field.read(reader, version),
            Self::Record(record) => record.read(reader, version, &[]),
            Self::Seq(items) => items.iter_mut().try_for_each(|item| item.read(reader, version)),
        }
    }

    /// Encodes this node.
    pub fn write<W: Write>(
        &self,
        writer: &mut ByteWriter<W>,
        version: FormatVersion,
    ) -> SchemaResult<()> {
        match self {
            Self::Field(field) => field.write(writer, version),
            Self::Record(record) => record.write(writer, version),
            Self::Seq(items) => items.iter().try_for_each(|item| item.write(writer, version)),
        }
    }

    /// Encoded size in bytes at `version`.
    #[must_use]
    pub fn encoded_len(&self, version: FormatVersion) -> usize {
        match self {
            Self::Field(field) => field.encoded_len(version),
            Self::Record(record) => record.encoded_len(version),
            Self::Seq(items) => items.iter().map(|item| item.encoded_len(version)).sum(),
        }
    }

    #[must_use]
    pub const fn as_field(&self) -> Option<&Field> {
        match self {
            Self::Field(field) => Some(field),
            _ => None,
        }
    }

    pub fn as_field_mut(&mut self) -> Option<&mut Field> {
        match self {
            Self::Field(field) => Some(field),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_seq(&self) -> Option<&[Node]> {
        match self {
            Self::Seq(items) => Some(items),
            _ => None,
        }
    }

    fn child(&self, segment: &str) -> Option<&Self> {
        match self {
            Self::Record(record) => record.get(segment),
            Self::Seq(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            Self::Field(_) => None,
        }
    }

    fn child_mut(&mut self, segment: &str) -> Option<&mut Self> {
        match self {
            Self::Record(record) => record.get_mut(segment),
            Self::Seq(items) => segment
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get_mut(i)),
            Self::Field(_) => None,
        }
    }
}

impl From<Field> for Node {
    fn from(field: Field) -> Self {
        Self::Field(field)
    }
}

impl From<Record> for Node {
    fn from(record: Record) -> Self {
        Self::Record(record)
    }
}

/// An ordered collection of named nodes.
///
/// Declaration order is wire order. Cloning a record copies every nested
/// record and sequence, so a clone never shares mutable state with its
/// source.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Record {
    fields: IndexMap<String, Node>,
}

impl Record {
    /// Starts building a record.
    #[must_use]
    pub fn builder() -> RecordBuilder {
        RecordBuilder::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.fields.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.fields.get_mut(name)
    }

    /// Returns the top-level leaf field called `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.get(name).and_then(Node::as_field)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.get_mut(name).and_then(Node::as_field_mut)
    }

    /// Replaces the value of the top-level leaf field called `name`.
    pub fn set(&mut self, name: &str, value: FieldValue) -> SchemaResult<()> {
        self.field_mut(name)
            .ok_or_else(|| SchemaError::UnknownField {
                name: name.to_string(),
            })?
            .set(value)
    }

    /// Looks up a node by dotted path. Sequence elements are addressed by
    /// index, e.g. `"game_info_block.player_data.0.stock_start_count"`.
    #[must_use]
    pub fn path(&self, path: &str) -> Option<&Node> {
        let mut segments = path.split('.');
        let first = self.get(segments.next()?)?;
        segments.try_fold(first, |node, segment| node.child(segment))
    }

    pub fn path_mut(&mut self, path: &str) -> Option<&mut Node> {
        let mut segments = path.split('.');
        let first = self.get_mut(segments.next()?)?;
        segments.try_fold(first, |node, segment| node.child_mut(segment))
    }

    /// Looks up a leaf field by dotted path.
    #[must_use]
    pub fn path_field(&self, path: &str) -> Option<&Field> {
        self.path(path).and_then(Node::as_field)
    }

    /// Replaces the value of the leaf field at `path`.
    pub fn set_path(&mut self, path: &str, value: FieldValue) -> SchemaResult<()> {
        self.path_mut(path)
            .and_then(Node::as_field_mut)
            .ok_or_else(|| SchemaError::UnknownField {
                name: path.to_string(),
            })?
            .set(value)
    }

    /// Iterates over top-level entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.fields.iter().map(|(name, node)| (name.as_str(), node))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Decodes every top-level entry in declaration order.
    ///
    /// Entries named in `ignored` are skipped entirely and consume no
    /// bytes. The ignore list applies only at this level; nested records
    /// are always read in full.
    pub fn read<R: Read>(
        &mut self,
        reader: &mut ByteReader<R>,
        version: FormatVersion,
        ignored: &[&str],
    ) -> SchemaResult<()> {
        for (name, node) in &mut self.fields {
            if ignored.contains(&name.as_str()) {
                continue;
            }
            node.read(reader, version)?;
        }
        Ok(())
    }

    /// Encodes every entry in declaration order.
    pub fn write<W: Write>(
        &self,
        writer: &mut ByteWriter<W>,
        version: FormatVersion,
    ) -> SchemaResult<()> {
        self.fields
            .values()
            .try_for_each(|node| node.write(writer, version))
    }

    /// Encoded size in bytes at `version`.
    #[must_use]
    pub fn encoded_len(&self, version: FormatVersion) -> usize {
        self.fields
            .values()
            .map(|node| node.encoded_len(version))
            .sum()
    }
}

/// Builder for [`Record`] that keeps declaration order.
#[derive(Debug, Default)]
pub struct RecordBuilder {
    fields: IndexMap<String, Node>,
}

impl RecordBuilder {
    /// Appends a leaf field.
    #[must_use]
    pub fn field(self, name: impl Into<String>, field: Field) -> Self {
        self.node(name, Node::Field(field))
    }

    /// Appends a nested record.
    #[must_use]
    pub fn record(self, name: impl Into<String>, record: Record) -> Self {
        self.node(name, Node::Record(record))
    }

    /// Appends a sequence of `count` copies of `item`.
    #[must_use]
    pub fn seq(self, name: impl Into<String>, item: impl Into<Node>, count: usize) -> Self {
        let item = item.into();
        self.node(name, Node::Seq(vec![item; count]))
    }

    /// Appends an arbitrary node. A repeated name replaces the earlier
    /// node but keeps its position.
    #[must_use]
    pub fn node(mut self, name: impl Into<String>, node: Node) -> Self {
        self.fields.insert(name.into(), node);
        self
    }

    #[must_use]
    pub fn build(self) -> Record {
        Record {
            fields: self.fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> Record {
        Record::builder()
            .field("a", Field::u8(0))
            .field("b", Field::u16(0))
            .build()
    }

    #[test]
    fn builder_keeps_declaration_order() {
        let record = Record::builder()
            .field("z", Field::u8(1))
            .field("a", Field::u8(2))
            .field("m", Field::u8(3))
            .build();
        let names: Vec<&str> = record.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["z", "a", "m"]);
    }

    #[test]
    fn repeated_name_replaces_in_place() {
        let record = Record::builder()
            .field("a", Field::u8(1))
            .field("b", Field::u8(2))
            .field("a", Field::u16(3))
            .build();
        assert_eq!(record.len(), 2);
        assert_eq!(record.iter().next().map(|(n, _)| n), Some("a"));
        assert_eq!(record.field("a").and_then(Field::as_u16), Some(3));
    }

    #[test]
    fn nested_read_write() {
        let mut record = Record::builder()
            .field("head", Field::u8(0))
            .record("inner", pair())
            .seq("items", Field::i8(0), 3)
            .build();
        let bytes = [0x01, 0x02, 0x03, 0x04, 0xFF, 0xFE, 0xFD];

        let mut reader = ByteReader::new(&bytes[..]);
        record.read(&mut reader, FormatVersion::ZERO, &[]).unwrap();
        assert_eq!(reader.position(), 7);
        assert_eq!(record.path_field("inner.b").and_then(Field::as_u16), Some(0x0304));
        assert_eq!(record.path_field("items.2").and_then(Field::as_i8), Some(-3));

        let mut writer = ByteWriter::new(Vec::new());
        record.write(&mut writer, FormatVersion::ZERO).unwrap();
        assert_eq!(writer.into_inner(), bytes);
        assert_eq!(record.encoded_len(FormatVersion::ZERO), 7);
    }

    #[test]
    fn ignored_names_consume_nothing() {
        let mut record = Record::builder()
            .field("command_byte", Field::u8(0x37))
            .field("frame_number", Field::i32(0))
            .build();
        let mut reader = ByteReader::new(&[0x00u8, 0x00, 0x00, 0x05][..]);
        record
            .read(&mut reader, FormatVersion::ZERO, &["command_byte"])
            .unwrap();
        assert_eq!(reader.position(), 4);
        assert_eq!(record.field("command_byte").and_then(Field::as_u8), Some(0x37));
        assert_eq!(record.field("frame_number").and_then(Field::as_i32), Some(5));
    }

    #[test]
    fn ignore_list_is_top_level_only() {
        let mut record = Record::builder()
            .field("a", Field::u8(0))
            .record("inner", pair())
            .build();
        let mut reader = ByteReader::new(&[0x09u8, 0x01, 0x00, 0x02][..]);
        record
            .read(&mut reader, FormatVersion::ZERO, &["b"])
            .unwrap();
        assert_eq!(reader.position(), 4);
        assert_eq!(record.path_field("inner.b").and_then(Field::as_u16), Some(2));
    }

    #[test]
    fn clones_are_independent() {
        let template = Record::builder()
            .record("inner", pair())
            .seq("list", pair(), 2)
            .build();
        let mut copy = template.clone();
        copy.set_path("inner.a", FieldValue::U8(9)).unwrap();
        copy.set_path("list.1.b", FieldValue::U16(7)).unwrap();

        assert_eq!(template.path_field("inner.a").and_then(Field::as_u8), Some(0));
        assert_eq!(template.path_field("list.1.b").and_then(Field::as_u16), Some(0));
        assert_eq!(copy.path_field("list.0.b").and_then(Field::as_u16), Some(0));
    }

    #[test]
    fn unknown_paths() {
        let mut record = pair();
        assert!(record.path("missing").is_none());
        assert!(record.path("a.b").is_none());
        assert!(record.path("").is_none());
        let err = record.set("nope", FieldValue::U8(1)).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownField { name } if name == "nope"));
        assert!(record.set_path("a.0", FieldValue::U8(1)).is_err());
    }

    #[test]
    fn set_checks_kind() {
        let mut record = pair();
        let err = record.set("a", FieldValue::U16(1)).unwrap_err();
        assert!(matches!(err, SchemaError::TypeMismatch { .. }));
    }

    #[test]
    fn gated_fields_shrink_encoded_len() {
        let record = Record::builder()
            .field("old", Field::u32(0))
            .field("new", Field::u32(0).since(FormatVersion::new(2, 0, 0)))
            .build();
        assert_eq!(record.encoded_len(FormatVersion::new(1, 9, 9)), 4);
        assert_eq!(record.encoded_len(FormatVersion::new(2, 0, 0)), 8);
    }
}
