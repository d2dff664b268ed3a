//! Field descriptors: typed leaf values with a wire layout and a version gate.

use std::io::{Read, Write};

use bitstream::{pack_flags, unpack_flags, ByteReader, ByteWriter};

use crate::error::{SchemaError, SchemaResult};
use crate::version::FormatVersion;

/// Width of a bit-flag vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum FlagWidth {
    W8,
    W16,
    W32,
}

impl FlagWidth {
    /// Number of flags (and bits on the wire).
    #[must_use]
    pub const fn bits(self) -> usize {
        match self {
            Self::W8 => 8,
            Self::W16 => 16,
            Self::W32 => 32,
        }
    }
}

/// The wire layout of a field (representation only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum FieldKind {
    U8,
    U16,
    U32,
    I8,
    I16,
    I32,
    F32,

    /// Fixed-length boolean vector backed by one unsigned integer.
    Flags(FlagWidth),

    /// Fixed-length raw byte array.
    Bytes { len: usize },

    /// Fixed-length single-byte text. `terminated` forces the last written
    /// byte to zero.
    Text { len: usize, terminated: bool },

    /// Fixed-length array of 16-bit code units, kept undecoded.
    WideText { len: usize },
}

impl FieldKind {
    /// Returns the encoded size in bytes.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::Flags(width) => width.bits() / 8,
            Self::Bytes { len } | Self::Text { len, .. } => len,
            Self::WideText { len } => len * 2,
        }
    }

    /// Short name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::F32 => "f32",
            Self::Flags(_) => "flags",
            Self::Bytes { .. } => "bytes",
            Self::Text { .. } => "text",
            Self::WideText { .. } => "wide text",
        }
    }

    /// The zero value for this kind.
    #[must_use]
    pub fn default_value(self) -> FieldValue {
        match self {
            Self::U8 => FieldValue::U8(0),
            Self::U16 => FieldValue::U16(0),
            Self::U32 => FieldValue::U32(0),
            Self::I8 => FieldValue::I8(0),
            Self::I16 => FieldValue::I16(0),
            Self::I32 => FieldValue::I32(0),
            Self::F32 => FieldValue::F32(0.0),
            Self::Flags(width) => FieldValue::Flags(vec![false; width.bits()]),
            Self::Bytes { len } => FieldValue::Bytes(vec![0; len]),
            Self::Text { .. } => FieldValue::Text(String::new()),
            Self::WideText { len } => FieldValue::WideText(vec![0; len]),
        }
    }
}

/// A field value in decoded form.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum FieldValue {
    U8(u8),
    U16(u16),
    U32(u32),
    I8(i8),
    I16(i16),
    I32(i32),
    F32(f32),
    Flags(Vec<bool>),
    Bytes(Vec<u8>),
    Text(String),
    WideText(Vec<u16>),
}

impl FieldValue {
    /// Short name used in diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::F32(_) => "f32",
            Self::Flags(_) => "flags",
            Self::Bytes(_) => "bytes",
            Self::Text(_) => "text",
            Self::WideText(_) => "wide text",
        }
    }

    /// Returns `true` if this value can be held by a field of `kind`.
    #[must_use]
    pub const fn matches(&self, kind: FieldKind) -> bool {
        matches!(
            (self, kind),
            (Self::U8(_), FieldKind::U8)
                | (Self::U16(_), FieldKind::U16)
                | (Self::U32(_), FieldKind::U32)
                | (Self::I8(_), FieldKind::I8)
                | (Self::I16(_), FieldKind::I16)
                | (Self::I32(_), FieldKind::I32)
                | (Self::F32(_), FieldKind::F32)
                | (Self::Flags(_), FieldKind::Flags(_))
                | (Self::Bytes(_), FieldKind::Bytes { .. })
                | (Self::Text(_), FieldKind::Text { .. })
                | (Self::WideText(_), FieldKind::WideText { .. })
        )
    }
}

/// A typed leaf value plus its wire layout and minimum format version.
///
/// The value always matches the declared kind, and a flag vector always
/// holds exactly as many flags as its width. Reads and writes against a
/// stream version older than `since` are no-ops.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "FieldRepr")
)]
pub struct Field {
    kind: FieldKind,
    value: FieldValue,
    since: FormatVersion,
}

impl Field {
    /// Creates a field after validating that `value` fits `kind`.
    pub fn new(kind: FieldKind, value: FieldValue, since: FormatVersion) -> SchemaResult<Self> {
        check_value(kind, &value)?;
        Ok(Self { kind, value, since })
    }

    /// Creates a field of `kind` holding its zero value.
    #[must_use]
    pub fn zeroed(kind: FieldKind) -> Self {
        Self {
            kind,
            value: kind.default_value(),
            since: FormatVersion::ZERO,
        }
    }

    #[must_use]
    pub const fn u8(value: u8) -> Self {
        Self::scalar(FieldKind::U8, FieldValue::U8(value))
    }

    #[must_use]
    pub const fn u16(value: u16) -> Self {
        Self::scalar(FieldKind::U16, FieldValue::U16(value))
    }

    #[must_use]
    pub const fn u32(value: u32) -> Self {
        Self::scalar(FieldKind::U32, FieldValue::U32(value))
    }

    #[must_use]
    pub const fn i8(value: i8) -> Self {
        Self::scalar(FieldKind::I8, FieldValue::I8(value))
    }

    #[must_use]
    pub const fn i16(value: i16) -> Self {
        Self::scalar(FieldKind::I16, FieldValue::I16(value))
    }

    #[must_use]
    pub const fn i32(value: i32) -> Self {
        Self::scalar(FieldKind::I32, FieldValue::I32(value))
    }

    #[must_use]
    pub const fn f32(value: f32) -> Self {
        Self::scalar(FieldKind::F32, FieldValue::F32(value))
    }

    /// An 8-flag vector, all clear.
    #[must_use]
    pub fn flags8() -> Self {
        Self::zeroed(FieldKind::Flags(FlagWidth::W8))
    }

    /// A 16-flag vector, all clear.
    #[must_use]
    pub fn flags16() -> Self {
        Self::zeroed(FieldKind::Flags(FlagWidth::W16))
    }

    /// A 32-flag vector, all clear.
    #[must_use]
    pub fn flags32() -> Self {
        Self::zeroed(FieldKind::Flags(FlagWidth::W32))
    }

    /// A zero-filled byte array of `len` bytes.
    #[must_use]
    pub fn bytes(len: usize) -> Self {
        Self::zeroed(FieldKind::Bytes { len })
    }

    /// Empty single-byte text of `len` bytes on the wire.
    #[must_use]
    pub fn text(len: usize) -> Self {
        Self::zeroed(FieldKind::Text {
            len,
            terminated: false,
        })
    }

    /// Like [`text`](Self::text), but the last written byte is always zero.
    #[must_use]
    pub fn terminated_text(len: usize) -> Self {
        Self::zeroed(FieldKind::Text {
            len,
            terminated: true,
        })
    }

    /// Zeroed 16-bit code units, `len` units on the wire.
    #[must_use]
    pub fn wide_text(len: usize) -> Self {
        Self::zeroed(FieldKind::WideText { len })
    }

    /// Sets the minimum format version at which this field is present.
    #[must_use]
    pub const fn since(mut self, version: FormatVersion) -> Self {
        self.since = version;
        self
    }

    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    #[must_use]
    pub const fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Minimum format version at which this field is on the wire.
    #[must_use]
    pub const fn min_version(&self) -> FormatVersion {
        self.since
    }

    /// Replaces the value, rejecting values that do not fit the kind.
    pub fn set(&mut self, value: FieldValue) -> SchemaResult<()> {
        check_value(self.kind, &value)?;
        self.value = value;
        Ok(())
    }

    /// Returns `true` if this field is on the wire at `version`.
    #[must_use]
    pub fn is_active(&self, version: FormatVersion) -> bool {
        version.is_at_least(self.since)
    }

    /// Encoded size in bytes at `version`.
    #[must_use]
    pub fn encoded_len(&self, version: FormatVersion) -> usize {
        if self.is_active(version) {
            self.kind.width()
        } else {
            0
        }
    }

    /// Decodes this field's value from `reader`.
    ///
    /// Consumes nothing and leaves the value untouched when `version` is
    /// older than the field's minimum version.
    pub fn read<R: Read>(
        &mut self,
        reader: &mut ByteReader<R>,
        version: FormatVersion,
    ) -> SchemaResult<()> {
        if !self.is_active(version) {
            return Ok(());
        }
        self.value = match self.kind {
            FieldKind::U8 => FieldValue::U8(reader.read_u8()?),
            FieldKind::U16 => FieldValue::U16(reader.read_u16()?),
            FieldKind::U32 => FieldValue::U32(reader.read_u32()?),
            FieldKind::I8 => FieldValue::I8(reader.read_i8()?),
            FieldKind::I16 => FieldValue::I16(reader.read_i16()?),
            FieldKind::I32 => FieldValue::I32(reader.read_i32()?),
            FieldKind::F32 => FieldValue::F32(reader.read_f32()?),
            FieldKind::Flags(width) => {
                let word = match width {
                    FlagWidth::W8 => u32::from(reader.read_u8()?),
                    FlagWidth::W16 => u32::from(reader.read_u16()?),
                    FlagWidth::W32 => reader.read_u32()?,
                };
                let flags = unpack_flags(word, width.bits())?;
                check_flag_len(width, flags.len())?;
                FieldValue::Flags(flags)
            }
            FieldKind::Bytes { len } => FieldValue::Bytes(reader.read_bytes(len)?),
            FieldKind::Text { len, .. } => FieldValue::Text(
                reader
                    .read_bytes(len)?
                    .into_iter()
                    .map(char::from)
                    .collect(),
            ),
            FieldKind::WideText { len } => FieldValue::WideText(reader.read_u16_units(len)?),
        };
        Ok(())
    }

    /// Encodes this field's value to `writer`.
    ///
    /// Arrays and text shorter than the declared length are zero-padded and
    /// longer ones are truncated. Emits nothing when `version` is older than
    /// the field's minimum version.
    pub fn write<W: Write>(
        &self,
        writer: &mut ByteWriter<W>,
        version: FormatVersion,
    ) -> SchemaResult<()> {
        if !self.is_active(version) {
            return Ok(());
        }
        match (self.kind, &self.value) {
            (FieldKind::U8, FieldValue::U8(v)) => writer.write_u8(*v)?,
            (FieldKind::U16, FieldValue::U16(v)) => writer.write_u16(*v)?,
            (FieldKind::U32, FieldValue::U32(v)) => writer.write_u32(*v)?,
            (FieldKind::I8, FieldValue::I8(v)) => writer.write_i8(*v)?,
            (FieldKind::I16, FieldValue::I16(v)) => writer.write_i16(*v)?,
            (FieldKind::I32, FieldValue::I32(v)) => writer.write_i32(*v)?,
            (FieldKind::F32, FieldValue::F32(v)) => writer.write_f32(*v)?,
            (FieldKind::Flags(width), FieldValue::Flags(flags)) => {
                check_flag_len(width, flags.len())?;
                let word = pack_flags(flags)?;
                match width {
                    FlagWidth::W8 => writer.write_u8(word as u8)?,
                    FlagWidth::W16 => writer.write_u16(word as u16)?,
                    FlagWidth::W32 => writer.write_u32(word)?,
                }
            }
            (FieldKind::Bytes { len }, FieldValue::Bytes(bytes)) => {
                writer.write_bytes(&fit(bytes, len))?;
            }
            (FieldKind::Text { len, terminated }, FieldValue::Text(text)) => {
                let mut raw = fit(&text_bytes(text, len)?, len);
                if terminated {
                    if let Some(last) = raw.last_mut() {
                        *last = 0;
                    }
                }
                writer.write_bytes(&raw)?;
            }
            (FieldKind::WideText { len }, FieldValue::WideText(units)) => {
                writer.write_u16_units(&fit(units, len))?;
            }
            (kind, value) => {
                return Err(SchemaError::TypeMismatch {
                    expected: kind.name(),
                    found: value.type_name(),
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub const fn as_u8(&self) -> Option<u8> {
        match self.value {
            FieldValue::U8(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_u16(&self) -> Option<u16> {
        match self.value {
            FieldValue::U16(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_u32(&self) -> Option<u32> {
        match self.value {
            FieldValue::U32(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_i8(&self) -> Option<i8> {
        match self.value {
            FieldValue::I8(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_i16(&self) -> Option<i16> {
        match self.value {
            FieldValue::I16(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_i32(&self) -> Option<i32> {
        match self.value {
            FieldValue::I32(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_f32(&self) -> Option<f32> {
        match self.value {
            FieldValue::F32(v) => Some(v),
            _ => None,
        }
    }

    /// Any integer kind, widened.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self.value {
            FieldValue::U8(v) => Some(v as i64),
            FieldValue::U16(v) => Some(v as i64),
            FieldValue::U32(v) => Some(v as i64),
            FieldValue::I8(v) => Some(v as i64),
            FieldValue::I16(v) => Some(v as i64),
            FieldValue::I32(v) => Some(v as i64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_flags(&self) -> Option<&[bool]> {
        match &self.value {
            FieldValue::Flags(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &self.value {
            FieldValue::Bytes(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            FieldValue::Text(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_wide_text(&self) -> Option<&[u16]> {
        match &self.value {
            FieldValue::WideText(v) => Some(v),
            _ => None,
        }
    }

    const fn scalar(kind: FieldKind, value: FieldValue) -> Self {
        Self {
            kind,
            value,
            since: FormatVersion::ZERO,
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct FieldRepr {
    kind: FieldKind,
    value: Option<FieldValue>,
    #[serde(default)]
    since: FormatVersion,
}

#[cfg(feature = "serde")]
impl TryFrom<FieldRepr> for Field {
    type Error = SchemaError;

    fn try_from(repr: FieldRepr) -> Result<Self, Self::Error> {
        let value = repr.value.unwrap_or_else(|| repr.kind.default_value());
        Self::new(repr.kind, value, repr.since)
    }
}

fn check_value(kind: FieldKind, value: &FieldValue) -> SchemaResult<()> {
    if !value.matches(kind) {
        return Err(SchemaError::TypeMismatch {
            expected: kind.name(),
            found: value.type_name(),
        });
    }
    if let (FieldKind::Flags(width), FieldValue::Flags(flags)) = (kind, value) {
        check_flag_len(width, flags.len())?;
    }
    Ok(())
}

fn check_flag_len(width: FlagWidth, actual: usize) -> SchemaResult<()> {
    if actual != width.bits() {
        return Err(SchemaError::BitFlagLength {
            expected: width.bits(),
            actual,
        });
    }
    Ok(())
}

/// Characters past `len` are dropped before the range check.
fn text_bytes(text: &str, len: usize) -> SchemaResult<Vec<u8>> {
    text.chars()
        .take(len)
        .map(|ch| u8::try_from(ch).map_err(|_| SchemaError::TextOutOfRange { ch }))
        .collect()
}

/// Zero-pads or truncates to exactly `len` elements.
fn fit<T: Copy + Default>(values: &[T], len: usize) -> Vec<T> {
    let mut out: Vec<T> = values.iter().copied().take(len).collect();
    out.resize(len, T::default());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const LATEST: FormatVersion = FormatVersion::new(10_000, 0, 0);

    fn read(field: &mut Field, bytes: &[u8]) -> u64 {
        let mut reader = ByteReader::new(bytes);
        field.read(&mut reader, LATEST).unwrap();
        reader.position()
    }

    fn write(field: &Field) -> Vec<u8> {
        let mut writer = ByteWriter::new(Vec::new());
        field.write(&mut writer, LATEST).unwrap();
        writer.into_inner()
    }

    #[test]
    fn kind_widths() {
        assert_eq!(FieldKind::U8.width(), 1);
        assert_eq!(FieldKind::I16.width(), 2);
        assert_eq!(FieldKind::F32.width(), 4);
        assert_eq!(FieldKind::Flags(FlagWidth::W16).width(), 2);
        assert_eq!(FieldKind::Bytes { len: 7 }.width(), 7);
        assert_eq!(FieldKind::WideText { len: 8 }.width(), 16);
    }

    #[test]
    fn new_rejects_mismatched_value() {
        let err = Field::new(FieldKind::U8, FieldValue::F32(1.0), FormatVersion::ZERO).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::TypeMismatch {
                expected: "u8",
                found: "f32"
            }
        ));
    }

    #[test]
    fn new_rejects_wrong_flag_count() {
        let err = Field::new(
            FieldKind::Flags(FlagWidth::W8),
            FieldValue::Flags(vec![true; 7]),
            FormatVersion::ZERO,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::BitFlagLength {
                expected: 8,
                actual: 7
            }
        ));
    }

    #[test]
    fn set_validates() {
        let mut field = Field::flags16();
        assert!(field.set(FieldValue::Flags(vec![false; 16])).is_ok());
        assert!(field.set(FieldValue::Flags(vec![false; 8])).is_err());
        assert!(field.set(FieldValue::U16(3)).is_err());
        assert_eq!(field.as_flags().map(<[bool]>::len), Some(16));
    }

    #[test]
    fn u32_reads_big_endian() {
        let mut field = Field::u32(0);
        assert_eq!(read(&mut field, &[0xFE, 0x73, 0xFF, 0xFF]), 4);
        assert_eq!(field.as_u32(), Some(4_269_015_039));
    }

    #[test]
    fn signed_reads_twos_complement() {
        let mut field = Field::i16(0);
        read(&mut field, &[0xFF, 0xFE]);
        assert_eq!(field.as_i16(), Some(-2));
        assert_eq!(write(&field), vec![0xFF, 0xFE]);
    }

    #[test]
    fn version_gate_skips_read_and_write() {
        let mut field = Field::u8(0).since(FormatVersion::new(10, 0, 0));
        let mut reader = ByteReader::new(&[0xFFu8][..]);
        field
            .read(&mut reader, FormatVersion::new(0, 0, 1))
            .unwrap();
        assert_eq!(field.as_u8(), Some(0));
        assert_eq!(reader.position(), 0);

        field.set(FieldValue::U8(200)).unwrap();
        let mut writer = ByteWriter::new(Vec::new());
        field
            .write(&mut writer, FormatVersion::new(0, 0, 1))
            .unwrap();
        assert!(writer.into_inner().is_empty());
        assert_eq!(field.encoded_len(FormatVersion::new(0, 0, 1)), 0);
        assert_eq!(field.encoded_len(FormatVersion::new(10, 0, 0)), 1);
    }

    #[test]
    fn flags_expand_msb_first() {
        let mut field = Field::flags8();
        read(&mut field, &[0xAA]);
        assert_eq!(
            field.as_flags().unwrap(),
            &[true, false, true, false, true, false, true, false]
        );

        field
            .set(FieldValue::Flags(vec![
                false, true, false, true, false, true, false, true,
            ]))
            .unwrap();
        assert_eq!(write(&field), vec![0x55]);
    }

    #[test]
    fn flags32_roundtrip() {
        let mut field = Field::flags32();
        read(&mut field, &[0x80, 0x00, 0x01, 0x01]);
        let flags = field.as_flags().unwrap();
        assert!(flags[0]);
        assert!(flags[23]);
        assert!(flags[31]);
        assert_eq!(flags.iter().filter(|&&f| f).count(), 3);
        assert_eq!(write(&field), vec![0x80, 0x00, 0x01, 0x01]);
    }

    #[test]
    fn bytes_read_exact_length() {
        let mut field = Field::bytes(2);
        assert_eq!(read(&mut field, &[0xFF, 0xFF, 0xFF, 0xFF]), 2);
        assert_eq!(field.as_bytes(), Some(&[0xFF, 0xFF][..]));
    }

    #[test]
    fn bytes_write_pads_and_truncates() {
        let mut field = Field::bytes(6);
        field
            .set(FieldValue::Bytes(vec![0xFF, 0, 0xFF, 0]))
            .unwrap();
        assert_eq!(write(&field), vec![0xFF, 0, 0xFF, 0, 0, 0]);

        field.set(FieldValue::Bytes(Vec::new())).unwrap();
        assert_eq!(write(&field), vec![0; 6]);

        let mut short = Field::bytes(2);
        short.set(FieldValue::Bytes(vec![1, 2, 3, 4])).unwrap();
        assert_eq!(write(&short), vec![1, 2]);
    }

    #[test]
    fn text_maps_bytes_to_chars() {
        let mut field = Field::text(4);
        read(&mut field, b"ABCD");
        assert_eq!(field.as_text(), Some("ABCD"));
    }

    #[test]
    fn text_write_pads_and_truncates() {
        let mut field = Field::text(5);
        field.set(FieldValue::Text("hello".into())).unwrap();
        assert_eq!(write(&field), b"hello");

        field.set(FieldValue::Text(String::new())).unwrap();
        assert_eq!(write(&field), vec![0; 5]);

        field.set(FieldValue::Text("hello world".into())).unwrap();
        assert_eq!(write(&field), b"hello");
    }

    #[test]
    fn terminated_text_forces_trailing_zero() {
        let mut field = Field::terminated_text(5);
        field.set(FieldValue::Text("hello".into())).unwrap();
        assert_eq!(write(&field), b"hell\0");

        let mut empty = Field::terminated_text(0);
        empty.set(FieldValue::Text("x".into())).unwrap();
        assert!(write(&empty).is_empty());
    }

    #[test]
    fn text_rejects_multibyte_chars() {
        let mut field = Field::text(4);
        field.set(FieldValue::Text("a\u{3042}".into())).unwrap();
        let mut writer = ByteWriter::new(Vec::new());
        let err = field.write(&mut writer, LATEST).unwrap_err();
        assert!(matches!(err, SchemaError::TextOutOfRange { ch: '\u{3042}' }));
    }

    #[test]
    fn truncated_chars_are_not_range_checked() {
        let mut field = Field::text(4);
        field
            .set(FieldValue::Text("abcd\u{3042}".into()))
            .unwrap();
        assert_eq!(write(&field), b"abcd");

        let mut terminated = Field::terminated_text(3);
        terminated
            .set(FieldValue::Text("ab\u{3042}".into()))
            .unwrap();
        let mut writer = ByteWriter::new(Vec::new());
        let err = terminated.write(&mut writer, LATEST).unwrap_err();
        assert!(matches!(err, SchemaError::TextOutOfRange { ch: '\u{3042}' }));
    }

    #[test]
    fn high_bytes_survive_text_roundtrip() {
        let mut field = Field::text(3);
        read(&mut field, &[0x81, 0x94, 0x00]);
        assert_eq!(write(&field), vec![0x81, 0x94, 0x00]);
    }

    #[test]
    fn wide_text_is_opaque_units() {
        let mut field = Field::wide_text(3);
        read(&mut field, &[0xDE, 0xAD, 0xBE, 0xEF, 0xFF, 0xFF]);
        assert_eq!(field.as_wide_text(), Some(&[57005, 48879, 65535][..]));

        field
            .set(FieldValue::WideText(vec![47789, 61453]))
            .unwrap();
        assert_eq!(write(&field), vec![0xBA, 0xAD, 0xF0, 0x0D, 0x00, 0x00]);
    }

    #[test]
    fn short_read_leaves_value_unchanged() {
        let mut field = Field::u32(7);
        let mut reader = ByteReader::new(&[0x01u8, 0x02][..]);
        let err = field.read(&mut reader, LATEST).unwrap_err();
        assert!(matches!(err, SchemaError::Stream(e) if e.is_short_read()));
        assert_eq!(field.as_u32(), Some(7));
    }

    #[test]
    fn as_int_widens_every_integer() {
        assert_eq!(Field::u32(u32::MAX).as_int(), Some(i64::from(u32::MAX)));
        assert_eq!(Field::i8(-5).as_int(), Some(-5));
        assert_eq!(Field::f32(1.0).as_int(), None);
    }
}
