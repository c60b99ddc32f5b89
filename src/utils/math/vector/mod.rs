pub mod math;

use std::fmt::{self, Debug};

use num::Num;
use serde::Serialize;

/// ZeroSpVec is a sparse vector where zero is the implicit element.
/// It keeps `indices` and `values` side by side:
/// indices hold the logical position of each stored element,
/// values hold the element itself.
///
/// Indices are guaranteed to be strictly ascending, which lets two vectors
/// be compared with a single merge walk.
#[derive(Clone, PartialEq, Serialize)]
pub struct ZeroSpVec<N>
where
    N: Num + Copy,
{
    indices: Vec<usize>,
    values: Vec<N>,
    len: usize,
}

impl<N> ZeroSpVec<N>
where
    N: Num + Copy,
{
    /// Empty vector of logical length `len`.
    #[inline]
    pub fn new(len: usize) -> Self {
        ZeroSpVec {
            indices: Vec::new(),
            values: Vec::new(),
            len,
        }
    }

    /// Build from `(index, value)` pairs in any order.
    ///
    /// Zero values are dropped, duplicate indices are summed and indices
    /// past `len` grow the logical length.
    pub fn from_pairs(len: usize, mut pairs: Vec<(usize, N)>) -> Self {
        pairs.sort_by_key(|(idx, _)| *idx);
        let mut vec = ZeroSpVec::new(len);
        vec.indices.reserve(pairs.len());
        vec.values.reserve(pairs.len());
        for (idx, val) in pairs {
            match vec.indices.last() {
                Some(&last) if last == idx => {
                    if let Some(slot) = vec.values.last_mut() {
                        *slot = *slot + val;
                    }
                }
                _ => {
                    vec.indices.push(idx);
                    vec.values.push(val);
                }
            }
            vec.len = vec.len.max(idx + 1);
        }
        vec.prune_zeros();
        vec
    }

    fn prune_zeros(&mut self) {
        let mut write = 0;
        for read in 0..self.values.len() {
            if !self.values[read].is_zero() {
                self.indices[write] = self.indices[read];
                self.values[write] = self.values[read];
                write += 1;
            }
        }
        self.indices.truncate(write);
        self.values.truncate(write);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True when no element is stored.
    #[inline]
    pub fn is_zero_vector(&self) -> bool {
        self.values.is_empty()
    }

    /// Stored `(index, value)` pairs in ascending index order.
    #[inline]
    pub fn raw_iter(&self) -> impl Iterator<Item = (usize, N)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

}

impl<N: Num + Copy + Debug> Debug for ZeroSpVec<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZeroSpVec")
            .field("len", &self.len)
            .field("entries", &self.raw_iter().collect::<Vec<_>>())
            .finish()
    }
}
