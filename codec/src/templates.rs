//! Default-populated record templates, one per record kind.

use indexmap::IndexMap;
use schema::{FormatVersion, Record};
use wire::{PayloadEntry, PayloadSizes};

use crate::error::{CodecError, CodecResult};
use crate::records::RecordKind;

/// The read targets the decoder clones for every record.
///
/// A set of templates is always complete: every [`RecordKind`] has one.
/// Templates are never mutated by decoding; each record decodes into a
/// fresh clone.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(
        try_from = "IndexMap<RecordKind, Record>",
        into = "IndexMap<RecordKind, Record>"
    )
)]
pub struct Templates {
    records: IndexMap<RecordKind, Record>,
}

impl Default for Templates {
    /// The built-in schemas.
    fn default() -> Self {
        Self {
            records: RecordKind::ALL
                .into_iter()
                .map(|kind| (kind, kind.schema()))
                .collect(),
        }
    }
}

impl Templates {
    /// Builds templates from exactly one record per kind.
    pub fn from_records(
        records: impl IntoIterator<Item = (RecordKind, Record)>,
    ) -> CodecResult<Self> {
        let records: IndexMap<RecordKind, Record> = records.into_iter().collect();
        if let Some(kind) = RecordKind::ALL
            .into_iter()
            .find(|kind| !records.contains_key(kind))
        {
            return Err(CodecError::MissingTemplate { kind });
        }
        Ok(Self { records })
    }

    /// Replaces the template for one kind.
    #[must_use]
    pub fn with_template(mut self, kind: RecordKind, record: Record) -> Self {
        self.records.insert(kind, record);
        self
    }

    /// Returns the template for `kind`.
    pub fn get(&self, kind: RecordKind) -> CodecResult<&Record> {
        self.records
            .get(&kind)
            .ok_or(CodecError::MissingTemplate { kind })
    }

    /// Returns a fresh copy of the template for `kind`.
    pub fn instantiate(&self, kind: RecordKind) -> CodecResult<Record> {
        self.get(kind).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RecordKind, &Record)> {
        self.records.iter().map(|(kind, record)| (*kind, record))
    }

    /// The payload size table these templates encode to at `version`.
    ///
    /// `gecko_list_len` adds an entry for a single-shot patch payload.
    pub fn payload_sizes(
        &self,
        version: FormatVersion,
        gecko_list_len: Option<u16>,
    ) -> CodecResult<PayloadSizes> {
        let mut entries = Vec::with_capacity(RecordKind::ALL.len() + 1);
        for kind in RecordKind::ALL {
            let len = self.get(kind)?.encoded_len(version).saturating_sub(1);
            let size = u16::try_from(len).map_err(|_| CodecError::PayloadSizeMismatch {
                command: kind.command().byte(),
                expected: usize::from(u16::MAX),
                actual: len,
                offset: 0,
            })?;
            entries.push(PayloadEntry::new(kind.command().byte(), size));
        }
        if let Some(len) = gecko_list_len {
            entries.push(PayloadEntry::new(wire::Command::GeckoList.byte(), len));
        }
        entries.sort_by_key(|entry| entry.command);
        Ok(PayloadSizes::from_entries(entries)?)
    }
}

impl TryFrom<IndexMap<RecordKind, Record>> for Templates {
    type Error = CodecError;

    fn try_from(records: IndexMap<RecordKind, Record>) -> Result<Self, Self::Error> {
        Self::from_records(records)
    }
}

impl From<Templates> for IndexMap<RecordKind, Record> {
    fn from(templates: Templates) -> Self {
        templates.records
    }
}
