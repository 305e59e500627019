//! Typed cross-entity references and their wire codec.
//!
//! A reference field on the wire is a resource-locator-style path,
//! `/apps/<app-id>/records/<record-id>`. Inside the program references are
//! carried as [`RecordRef`] values; the string form only exists at the store
//! boundary. Anything unparsable decodes to "no reference" instead of an
//! error, so a dangling or corrupted field degrades to a missing lookup.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::{EntityKind, RecordId};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordRef {
    pub kind: EntityKind,
    pub record_id: RecordId,
}

impl RecordRef {
    pub fn new(kind: EntityKind, record_id: impl Into<String>) -> Self {
        Self {
            kind,
            record_id: RecordId::new(record_id),
        }
    }

    /// Wire encoding. Deterministic and injective per entity kind: the app id
    /// segment pins the kind, the trailing segment pins the record.
    pub fn to_reference(&self) -> String {
        format!("/apps/{}/records/{}", self.kind.app_id(), self.record_id)
    }

    /// Decode a wire reference. Returns `None` for anything that is not a
    /// well-formed reference to a known collection; never panics.
    pub fn parse(reference: &str) -> Option<Self> {
        let rest = reference.trim().strip_prefix("/apps/")?;
        let (app_id, rest) = rest.split_once("/records/")?;
        let kind = EntityKind::from_app_id(app_id)?;
        if rest.is_empty() || rest.contains('/') {
            return None;
        }
        Some(Self::new(kind, rest))
    }
}

impl Serialize for RecordRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_reference())
    }
}

impl<'de> Deserialize<'de> for RecordRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        RecordRef::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("malformed record reference '{raw}'")))
    }
}

/// Lenient deserializer for optional reference fields: absent, null, or
/// unparsable values all become `None`. Use with
/// `#[serde(default, deserialize_with = "reference::lenient")]`.
pub fn lenient<'de, D>(deserializer: D) -> Result<Option<RecordRef>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(RecordRef::parse))
}
