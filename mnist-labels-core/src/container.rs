//! Containers that hold a decoded label sequence.
//!
//! The decoder is generic over [`LabelContainer`], so callers pick the
//! representation at compile time: [`LabelArray`] is the fixed-width
//! unsigned-byte container, `Vec<u8>` is the plain growable array.

use std::collections::BTreeMap;
use std::slice;

/// A type that can be built from the raw label bytes of an IDX file.
///
/// Implementations must keep the bytes in file order.
///
/// # Examples
/// ```
/// use mnist_labels_core::{LabelArray, LabelContainer};
///
/// let array = LabelArray::from_labels(vec![5, 0, 9, 1]);
/// let plain = Vec::<u8>::from_labels(vec![5, 0, 9, 1]);
/// assert_eq!(array.as_slice(), plain.as_slice());
/// ```
pub trait LabelContainer: Sized {
    /// Wraps the decoded label bytes.
    fn from_labels(labels: Vec<u8>) -> Self;
}

impl LabelContainer for Vec<u8> {
    fn from_labels(labels: Vec<u8>) -> Self {
        labels
    }
}

/// Fixed-width, immutable container of unsigned-byte labels.
///
/// # Examples
/// ```
/// use mnist_labels_core::{LabelArray, LabelContainer};
///
/// let labels = LabelArray::from_labels(vec![3, 1, 3]);
/// assert_eq!(labels.len(), 3);
/// assert_eq!(labels.get(1), Some(1));
/// assert_eq!(labels.class_counts().get(&3), Some(&2));
/// ```
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct LabelArray {
    labels: Box<[u8]>,
}

impl LabelArray {
    /// Number of labels held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns `true` when the file declared zero labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns the label at `index`, if present.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<u8> {
        self.labels.get(index).copied()
    }

    /// Iterates over the labels in file order.
    pub fn iter(&self) -> slice::Iter<'_, u8> {
        self.labels.iter()
    }

    /// Borrows the labels as a byte slice.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.labels
    }

    /// Counts how often each label value occurs.
    #[must_use]
    pub fn class_counts(&self) -> BTreeMap<u8, usize> {
        class_counts(&self.labels)
    }
}

impl LabelContainer for LabelArray {
    fn from_labels(labels: Vec<u8>) -> Self {
        Self {
            labels: labels.into_boxed_slice(),
        }
    }
}

impl AsRef<[u8]> for LabelArray {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl<'a> IntoIterator for &'a LabelArray {
    type Item = &'a u8;
    type IntoIter = slice::Iter<'a, u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<LabelArray> for Vec<u8> {
    fn from(array: LabelArray) -> Self {
        array.labels.into_vec()
    }
}

/// Counts how often each label value occurs in `labels`.
///
/// # Examples
/// ```
/// use mnist_labels_core::class_counts;
///
/// let counts = class_counts(&[1, 1, 7]);
/// assert_eq!(counts.get(&1), Some(&2));
/// assert_eq!(counts.get(&7), Some(&1));
/// assert_eq!(counts.get(&0), None);
/// ```
#[must_use]
pub fn class_counts(labels: &[u8]) -> BTreeMap<u8, usize> {
    labels.iter().fold(BTreeMap::new(), |mut counts, label| {
        *counts.entry(*label).or_insert(0) += 1;
        counts
    })
}
