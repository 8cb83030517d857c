use crate::Error;

/// Storage for values associated with unordered pairs of particle types.
///
/// Only one value is stored for the pairs `(a, b)` and `(b, a)`, so the
/// table is symmetric by construction. Values are stored in the upper
/// triangle of a `types_count x types_count` matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct TypePairTable<T> {
    types_count: usize,
    values: Vec<T>,
}

impl<T: Clone> TypePairTable<T> {
    /// Create a new table for `types_count` types, with all entries set to
    /// `value`
    pub fn new(types_count: usize, value: T) -> TypePairTable<T> {
        TypePairTable {
            types_count: types_count,
            values: vec![value; types_count * (types_count + 1) / 2],
        }
    }
}

impl<T> TypePairTable<T> {
    /// Get the number of types in this table
    pub fn types_count(&self) -> usize {
        self.types_count
    }

    /// Get the linear index of the pair `(a, b)`, checking that both types
    /// are valid
    pub fn index(&self, a: usize, b: usize) -> Result<usize, Error> {
        crate::check_type(a, self.types_count)?;
        crate::check_type(b, self.types_count)?;
        Ok(self.index_unchecked(a, b))
    }

    /// Get the linear index of the pair `(a, b)`, for already validated types
    #[inline]
    pub(crate) fn index_unchecked(&self, a: usize, b: usize) -> usize {
        debug_assert!(a < self.types_count && b < self.types_count);
        let (i, j) = if a <= b { (a, b) } else { (b, a) };
        j + i * self.types_count - i * (i + 1) / 2
    }

    /// Get the value for the pair `(a, b)`
    pub fn get(&self, a: usize, b: usize) -> Result<&T, Error> {
        let index = self.index(a, b)?;
        Ok(&self.values[index])
    }

    /// Set the value for the pair `(a, b)`, which is the same as the value for
    /// the pair `(b, a)`
    pub fn set(&mut self, a: usize, b: usize, value: T) -> Result<(), Error> {
        let index = self.index(a, b)?;
        self.values[index] = value;
        Ok(())
    }

    /// Get the value at a linear index obtained from `index_unchecked`
    #[inline]
    pub(crate) fn by_index(&self, index: usize) -> &T {
        &self.values[index]
    }

    /// Iterate over all the `(a, b, value)` entries with `a <= b`
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        (0..self.types_count).flat_map(move |a| {
            (a..self.types_count).map(move |b| (a, b, &self.values[self.index_unchecked(a, b)]))
        })
    }
}
