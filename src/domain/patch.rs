//! Tri-state field for partial updates.
//!
//! A JSON body distinguishes three cases for a nullable field: the key is
//! missing (leave it alone), the key is `null` (clear it), or the key has a
//! value (set it). `Option<T>` alone collapses the first two.

use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldPatch<T> {
    /// Key not present in the request
    #[default]
    Absent,
    /// Key present with `null`
    Clear,
    /// Key present with a value
    Set(T),
}

impl<T> FieldPatch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldPatch::Absent)
    }
}

impl<T> From<Option<T>> for FieldPatch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => FieldPatch::Set(v),
            None => FieldPatch::Clear,
        }
    }
}

// Only reached when the key exists; missing keys fall back to
// `#[serde(default)]` and stay `Absent`.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldPatch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(FieldPatch::from)
    }
}
