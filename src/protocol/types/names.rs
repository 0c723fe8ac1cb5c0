//! Offset-keyed table of identifier strings.
//!
//! Column descriptors refer to table, schema and column names by the byte
//! offset of the name inside the name block that follows the descriptors.
//! Each distinct name is sent once; many descriptors may share an offset.

use std::collections::BTreeMap;

/// Identifier strings keyed by their offset in the name block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable {
    names: BTreeMap<u32, Option<String>>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an offset whose name is still to be read.
    pub fn add_offset(&mut self, offset: u32) {
        self.names.entry(offset).or_insert(None);
    }

    /// Registered offsets in ascending order.
    pub fn offsets(&self) -> impl Iterator<Item = u32> + '_ {
        self.names.keys().copied()
    }

    /// Store the resolved name for `offset`.
    pub fn set_name(&mut self, offset: u32, name: String) {
        self.names.insert(offset, Some(name));
    }

    /// Name stored at `offset`.
    ///
    /// Unknown and unresolved offsets yield an empty name.
    pub fn name(&self, offset: u32) -> &str {
        self.names
            .get(&offset)
            .and_then(|name| name.as_deref())
            .unwrap_or("")
    }

    pub fn is_resolved(&self, offset: u32) -> bool {
        matches!(self.names.get(&offset), Some(Some(_)))
    }

    /// Number of distinct offsets.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_are_sorted_and_deduplicated() {
        let mut names = NameTable::new();
        for offset in [16, 0, 8, 0, 16] {
            names.add_offset(offset);
        }

        assert_eq!(names.offsets().collect::<Vec<_>>(), vec![0, 8, 16]);
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_unresolved_offset_is_empty() {
        let mut names = NameTable::new();
        names.add_offset(4);

        assert_eq!(names.name(4), "");
        assert!(!names.is_resolved(4));
        assert_eq!(names.name(99), "");

        names.set_name(4, "T1".to_string());
        assert_eq!(names.name(4), "T1");
        assert!(names.is_resolved(4));
    }

    #[test]
    fn test_add_offset_keeps_resolved_name() {
        let mut names = NameTable::new();
        names.set_name(0, "SCHEMA".to_string());
        names.add_offset(0);
        assert_eq!(names.name(0), "SCHEMA");
    }
}
