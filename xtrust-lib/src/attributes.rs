//! Immutable attribute tables.
//!
//! Signed and unsigned attribute sets arrive as OID-keyed collections of
//! opaque DER values. The table is built once from decoded bytes and
//! never mutated afterward, so lookups are safe to share across
//! concurrent validation tasks.

use std::collections::BTreeMap;

/// An immutable mapping from attribute OID (dotted form) to its raw
/// DER-encoded value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeTable {
    entries: BTreeMap<String, Vec<u8>>,
}

impl AttributeTable {
    /// Build a table from (OID, value) pairs.
    ///
    /// A duplicate OID keeps the last value, matching the replace
    /// semantics of the attribute containers this models.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<u8>)>,
    {
        AttributeTable {
            entries: entries.into_iter().collect(),
        }
    }

    /// Raw value of the attribute with the given OID, if present.
    pub fn get(&self, attr_oid: &str) -> Option<&[u8]> {
        self.entries.get(attr_oid).map(Vec::as_slice)
    }

    /// Iterate over (OID, value) entries in OID order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no attributes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the given table, or an empty one when absent. Lets callers
    /// iterate without special-casing a missing attribute set.
    pub fn empty_if_absent(table: Option<AttributeTable>) -> AttributeTable {
        table.unwrap_or_default()
    }
}
