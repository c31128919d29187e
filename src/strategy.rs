//! Capability traits that make the trie generic over its key representation.
//!
//! A trie never stores full keys. It needs three strategies to work with them:
//!
//! - [`FragmentSequence`] splits a full key into fragments for descent.
//! - [`Comparator`] orders sibling fragments.
//! - [`Concatenator`] rebuilds a full key from fragments during iteration.
//!
//! [`TransparentComparator`] is optional and enables heterogeneous lookups
//! against the reconstructed key.

use std::cmp::Ordering;
use std::marker::PhantomData;

// =============================================================================
// Fragment sequences
// =============================================================================

/// A full key that can be decomposed into fragments of type `K`, in order.
pub trait FragmentSequence<K> {
    fn fragments(&self) -> impl Iterator<Item = K> + '_;
}

impl FragmentSequence<char> for str {
    fn fragments(&self) -> impl Iterator<Item = char> + '_ {
        self.chars()
    }
}

impl FragmentSequence<char> for String {
    fn fragments(&self) -> impl Iterator<Item = char> + '_ {
        self.chars()
    }
}

impl<T: Clone> FragmentSequence<T> for [T] {
    fn fragments(&self) -> impl Iterator<Item = T> + '_ {
        self.iter().cloned()
    }
}

impl<T: Clone> FragmentSequence<T> for Vec<T> {
    fn fragments(&self) -> impl Iterator<Item = T> + '_ {
        self.iter().cloned()
    }
}

impl<T: Clone, const N: usize> FragmentSequence<T> for [T; N] {
    fn fragments(&self) -> impl Iterator<Item = T> + '_ {
        self.iter().cloned()
    }
}

impl<K, Q: FragmentSequence<K> + ?Sized> FragmentSequence<K> for &Q {
    fn fragments(&self) -> impl Iterator<Item = K> + '_ {
        (**self).fragments()
    }
}

// =============================================================================
// Fragment ordering
// =============================================================================

/// Orders two fragments. Siblings in the tree are kept sorted by this order,
/// which in turn defines the lexicographic order of full keys.
pub trait Comparator<K: ?Sized> {
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering;
}

/// The fragment type's own [`Ord`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Natural;

impl<K: Ord + ?Sized> Comparator<K> for Natural {
    #[inline]
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering {
        lhs.cmp(rhs)
    }
}

/// Reverses another comparator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Reverse<C>(pub C);

impl<K: ?Sized, C: Comparator<K>> Comparator<K> for Reverse<C> {
    #[inline]
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering {
        self.0.compare(rhs, lhs)
    }
}

/// Adapts a closure into a [`Comparator`].
#[derive(Clone, Copy)]
pub struct FnComparator<F>(pub F);

impl<K: ?Sized, F: Fn(&K, &K) -> Ordering> Comparator<K> for FnComparator<F> {
    #[inline]
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering {
        (self.0)(lhs, rhs)
    }
}

/// Compares a reconstructed full key against a probe of another type.
///
/// Orderings through this trait need not agree with the fragment order, nor be
/// injective (ordering strings by length is a valid implementation), so lookups
/// using it scan in iteration order and report the first match.
pub trait TransparentComparator<Key: ?Sized, Q: ?Sized> {
    /// How `key` orders relative to `probe`.
    fn compare_key(&self, key: &Key, probe: &Q) -> Ordering;
}

// =============================================================================
// Key concatenation
// =============================================================================

/// Builds a full key one fragment at a time, root to leaf.
pub trait Concatenator<K> {
    type Key;

    /// The key before any fragment has been appended.
    fn empty(&self) -> Self::Key;

    fn concat(&self, key: &mut Self::Key, fragment: &K);
}

/// `char` fragments into a [`String`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StringConcat;

impl Concatenator<char> for StringConcat {
    type Key = String;

    #[inline]
    fn empty(&self) -> String {
        String::new()
    }

    #[inline]
    fn concat(&self, key: &mut String, fragment: &char) {
        key.push(*fragment);
    }
}

/// Any cloneable fragment into a [`Vec`].
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct VecConcat<T>(PhantomData<fn() -> T>);

impl<T> VecConcat<T> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for VecConcat<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for VecConcat<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for VecConcat<T> {}

impl<T: Clone> Concatenator<T> for VecConcat<T> {
    type Key = Vec<T>;

    #[inline]
    fn empty(&self) -> Vec<T> {
        Vec::new()
    }

    #[inline]
    fn concat(&self, key: &mut Vec<T>, fragment: &T) {
        key.push(fragment.clone());
    }
}

/// Adapts a closure `Fn(&mut Key, &K)` into a [`Concatenator`]. The empty key
/// is `Key::default()`.
pub struct FnConcat<F, Key> {
    f: F,
    _key: PhantomData<fn() -> Key>,
}

impl<F, Key> FnConcat<F, Key> {
    pub const fn new(f: F) -> Self {
        Self {
            f,
            _key: PhantomData,
        }
    }
}

impl<F: Clone, Key> Clone for FnConcat<F, Key> {
    fn clone(&self) -> Self {
        Self::new(self.f.clone())
    }
}

impl<K, Key: Default, F: Fn(&mut Key, &K)> Concatenator<K> for FnConcat<F, Key> {
    type Key = Key;

    #[inline]
    fn empty(&self) -> Key {
        Key::default()
    }

    #[inline]
    fn concat(&self, key: &mut Key, fragment: &K) {
        (self.f)(key, fragment)
    }
}

/// Shorthand for [`FnConcat::new`] that lets the closure's signature pick `Key`.
pub fn concat_fn<K, Key, F>(f: F) -> FnConcat<F, Key>
where
    F: Fn(&mut Key, &K),
{
    FnConcat::new(f)
}
