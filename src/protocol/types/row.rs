//! Decoded result rows.

use std::sync::Arc;

use crate::error::{Error, Result};

use super::field::{Field, FieldSet};
use super::value::HdbValue;

/// Values of one row, in column order.
///
/// All rows of a result share one [`FieldSet`], so column lookups by name
/// resolve against the metadata decoded for that result.
#[derive(Debug, Clone)]
pub struct Row {
    values: Vec<HdbValue>,
    field_set: Arc<FieldSet>,
}

impl Row {
    pub fn new(values: Vec<HdbValue>, field_set: Arc<FieldSet>) -> Self {
        Self { values, field_set }
    }

    pub fn get(&self, index: usize) -> Option<&HdbValue> {
        self.values.get(index)
    }

    /// Like [`get`](Self::get), but an out-of-range index is an error.
    pub fn try_get(&self, index: usize) -> Result<&HdbValue> {
        self.values.get(index).ok_or(Error::ColumnIndexOutOfBounds {
            index,
            count: self.values.len(),
        })
    }

    /// Value of the column whose display name matches `name`, ignoring case.
    pub fn get_by_name(&self, name: &str) -> Option<&HdbValue> {
        self.get(self.field_set.find_by_name(name)?)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[HdbValue] {
        &self.values
    }

    pub fn into_values(self) -> Vec<HdbValue> {
        self.values
    }

    pub fn field_set(&self) -> &Arc<FieldSet> {
        &self.field_set
    }

    /// Column views paired with this row's values.
    pub fn columns(&self) -> impl Iterator<Item = (Field<'_>, &HdbValue)> {
        self.field_set.iter().zip(self.values.iter())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HdbValue> {
        self.values.iter()
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a HdbValue;
    type IntoIter = std::slice::Iter<'a, HdbValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
