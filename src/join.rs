// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::attribute::{Attribute, AttributeArray, CODEPOINT_COUNT, ValueId};

/// The per-codepoint tuple of all attributes, stored flat with a stride of
/// [`JoinedArray::width`] ids per codepoint.
pub struct JoinedArray {
    attributes: Vec<Attribute>,
    names: Vec<Vec<String>>,
    tuples: Box<[ValueId]>,
}

/// Zips `arrays` so that tuple `cp` holds `arrays[0][cp], arrays[1][cp], ...`.
///
/// # Panics
///
/// If `arrays` is empty or the arrays don't all cover the full codespace.
pub fn join(arrays: &[AttributeArray]) -> JoinedArray {
    assert!(!arrays.is_empty(), "need at least one attribute to join");
    for array in arrays {
        assert_eq!(
            array.len(),
            CODEPOINT_COUNT,
            "attribute {} has the wrong length",
            array.attribute().name
        );
    }

    let width = arrays.len();
    let mut tuples = vec![0 as ValueId; CODEPOINT_COUNT * width].into_boxed_slice();
    for (column, array) in arrays.iter().enumerate() {
        for (tuple, &id) in tuples.chunks_exact_mut(width).zip(array.ids()) {
            tuple[column] = id;
        }
    }

    JoinedArray {
        attributes: arrays.iter().map(|a| a.attribute().clone()).collect(),
        names: arrays.iter().map(|a| a.names().to_vec()).collect(),
        tuples,
    }
}

impl JoinedArray {
    /// Number of codepoints, always [`CODEPOINT_COUNT`].
    pub fn len(&self) -> usize {
        self.tuples.len() / self.width()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// Number of attributes per tuple.
    pub fn width(&self) -> usize {
        self.attributes.len()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn tuple(&self, cp: usize) -> &[ValueId] {
        let width = self.width();
        &self.tuples[cp * width..(cp + 1) * width]
    }

    pub fn tuples(&self) -> std::slice::ChunksExact<'_, ValueId> {
        self.tuples.chunks_exact(self.width())
    }

    /// Resolves an id of the `column`th attribute back to its name.
    pub fn name(&self, column: usize, id: ValueId) -> &str {
        &self.names[column][id as usize]
    }

    pub fn values(&self, cp: usize) -> impl Iterator<Item = &str> {
        self.tuple(cp).iter().enumerate().map(|(column, &id)| self.name(column, id))
    }
}
