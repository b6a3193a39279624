// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Attribute descriptors and the dense per-codepoint arrays built from them.

use std::collections::HashMap;

use crate::apperr;

/// Number of codepoints in the Unicode codespace, `U+0000` to `U+10FFFF`.
pub const CODEPOINT_COUNT: usize = 0x110000;

/// Index into an [`AttributeArray`]'s value table. `0` is always the default.
pub type ValueId = u16;

pub const DEFAULT_VALUE_ID: ValueId = 0;

/// A classification axis, such as East_Asian_Width, and the value
/// every codepoint has unless a source record says otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub default: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self { name: name.into(), default: default.into() }
    }

    /// Loaded from `EastAsianWidth.txt`. Unlisted codepoints are Neutral.
    pub fn east_asian_width() -> Self {
        Self::new("east_asian_width", "N")
    }

    /// Loaded from `emoji-data.txt`.
    pub fn emoji() -> Self {
        Self::new("emoji", "N")
    }

    /// Loaded from `GraphemeBreakProperty.txt`.
    pub fn grapheme_cluster_break() -> Self {
        Self::new("grapheme_cluster_break", "Other")
    }
}

/// One value per codepoint for a single attribute.
///
/// Values are interned: `values` holds ids into `names`, and `names[0]` is the
/// attribute's default. Since interning is a bijection, "holds the default"
/// is the same as `id == DEFAULT_VALUE_ID`, whether the default got there by
/// falling through or by an explicit record.
pub struct AttributeArray {
    attribute: Attribute,
    names: Vec<String>,
    ids: HashMap<String, ValueId>,
    values: Box<[ValueId]>,
}

impl AttributeArray {
    pub fn new(attribute: Attribute) -> Self {
        let names = vec![attribute.default.clone()];
        let ids = HashMap::from([(attribute.default.clone(), DEFAULT_VALUE_ID)]);
        let values = vec![DEFAULT_VALUE_ID; CODEPOINT_COUNT].into_boxed_slice();
        Self { attribute, names, ids, values }
    }

    pub fn attribute(&self) -> &Attribute {
        &self.attribute
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The distinct values seen so far, indexed by [`ValueId`].
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn ids(&self) -> &[ValueId] {
        &self.values
    }

    pub fn get(&self, cp: usize) -> &str {
        &self.names[self.values[cp] as usize]
    }

    /// Returns the id for `name`, adding it to the value table if necessary.
    pub fn intern(&mut self, name: &str) -> apperr::Result<ValueId> {
        if let Some(&id) = self.ids.get(name) {
            return Ok(id);
        }
        let id = ValueId::try_from(self.names.len()).map_err(|_| {
            apperr::Error::TooManyValues { attribute: self.attribute.name.clone() }
        })?;
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        Ok(id)
    }

    /// Assigns `id` to every codepoint in `range` that still holds the default.
    /// Earlier assignments win over later ones.
    pub fn assign_unset(&mut self, range: std::ops::RangeInclusive<usize>, id: ValueId) {
        for v in &mut self.values[range] {
            if *v == DEFAULT_VALUE_ID {
                *v = id;
            }
        }
    }
}
