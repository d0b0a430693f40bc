//! Type-safe indexing for interned resources.  Each category of resource (colors, paths, etc.)
//! gets its own index type, which is an opaque new-type over integers.  Additionally, each
//! category gets its own replacement for [`Vec`], which can only be indexed by its corresponding
//! index type.

use std::{
    fmt::{Debug, Formatter},
    marker::PhantomData,
    ops::Index,
};

/// A new-type over [`Vec`] which will only accept indices of an opaque index type
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct TypedVec<Idx, T> {
    inner: Vec<T>,
    _phantom_data: PhantomData<Idx>,
}

impl<Idx, T> TypedVec<Idx, T> {
    /// Creates a new, empty type-safe collection
    pub fn new() -> Self {
        Self {
            inner: Vec::new(),
            _phantom_data: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Gets the index of the next element to be [`push`](Self::push)ed to this collection.
    pub fn next_idx(&self) -> Idx
    where
        Idx: IdxType,
    {
        Idx::from_idx(self.inner.len())
    }

    /// Adds a new element to this collection, returning its opaque index
    pub fn push(&mut self, t: T) -> Idx
    where
        Idx: IdxType,
    {
        let idx = self.next_idx();
        self.inner.push(t);
        idx
    }

    pub fn get(&self, idx: Idx) -> Option<&T>
    where
        Idx: IdxType,
    {
        self.inner.get(idx.to_idx())
    }
}

impl<IdxT: IdxType, T> Index<IdxT> for TypedVec<IdxT, T> {
    type Output = T;

    fn index(&self, index: IdxT) -> &Self::Output {
        self.get(index).unwrap()
    }
}

///////////////////////////
// MACRO/TRAIT MACHINERY //
///////////////////////////

macro_rules! idx_impl {
    ($idx_name: ident) => {
        /// An opaque index into one category of interned resources
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $idx_name {
            idx: usize,
        }

        impl IdxType for $idx_name {
            fn from_idx(idx: usize) -> Self {
                Self { idx }
            }

            fn to_idx(self) -> usize {
                self.idx
            }
        }

        impl Debug for $idx_name {
            fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($idx_name), self.idx)
            }
        }
    };
}

idx_impl!(ColorIdx); // Interned colors
idx_impl!(PathIdx); // Interned paths
idx_impl!(TransformIdx); // Interned affine transforms
idx_impl!(GradientIdx); // Interned gradients (and their location arrays)
idx_impl!(PatternIdx); // Interned patterns (and their draw callbacks)
idx_impl!(ImageIdx); // Interned images

/// A common trait implemented by all custom index types
pub trait IdxType {
    fn from_idx(idx: usize) -> Self;

    fn to_idx(self) -> usize;
}
