//! Traits which, typically, may be imported without concern: `use stackarg::prelude::*`.
use std::collections::{BTreeSet, HashSet, VecDeque};

/// Behaviour for multiple (0 to many) items T to be collected together.
// Needs to be imported in order to implement a custom `Collectable`.
pub trait Collectable<T> {
    /// Add a value to this `Collectable`.
    fn add(&mut self, item: T);
}

/// Behaviour for a value that may be incremented by a `Counter`.
pub trait Countable {
    /// Produce the value one greater than this one.
    /// Saturates at the maximum of the type.
    fn increment(&self) -> Self;
}

impl<T> Collectable<T> for Vec<T> {
    fn add(&mut self, item: T) {
        self.push(item);
    }
}

impl<T> Collectable<T> for VecDeque<T> {
    fn add(&mut self, item: T) {
        self.push_back(item);
    }
}

impl<T: Eq + std::hash::Hash> Collectable<T> for HashSet<T> {
    fn add(&mut self, item: T) {
        self.insert(item);
    }
}

impl<T: Ord> Collectable<T> for BTreeSet<T> {
    fn add(&mut self, item: T) {
        self.insert(item);
    }
}

macro_rules! countable {
    ($($t:ty),*) => {
        $(
            impl Countable for $t {
                fn increment(&self) -> Self {
                    self.saturating_add(1)
                }
            }
        )*
    };
}

countable!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
