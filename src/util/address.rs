//! `Ref` represents an offset into the heap's single arena. Unlike MMTk's `Address`,
//! which models an absolute virtual address, `Ref` is relative to the arena that produced
//! it and is meaningless outside that arena. It is designed to be zero-overhead and to do
//! address arithmetic in a mostly safe way while keeping dereferencing operations behind
//! the `Arena`'s own encapsulated accessors.

use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Size of a region of bytes.
pub type ByteSize = usize;

/// A reference to the payload of a chunk, expressed as a byte offset from the arena base.
///
/// `Ref` values are only meaningful relative to the `Arena` that produced them; comparing
/// or combining `Ref`s from different arenas is a logic error the type system does not
/// prevent (there is, by construction, only ever one arena per `Heap`).
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct Ref(u64);

impl Ref {
    /// The reference to the very first byte of the arena (Eden's base).
    pub const ZERO: Ref = Ref(0);

    /// Constructs a `Ref` from a raw arena offset.
    pub(crate) const fn from_offset(offset: usize) -> Ref {
        Ref(offset as u64)
    }

    /// Returns the raw arena offset this reference points at.
    pub fn offset(self) -> usize {
        self.0 as usize
    }
}

impl Add<ByteSize> for Ref {
    type Output = Ref;
    fn add(self, rhs: ByteSize) -> Ref {
        Ref(self.0 + rhs as u64)
    }
}

impl AddAssign<ByteSize> for Ref {
    fn add_assign(&mut self, rhs: ByteSize) {
        self.0 += rhs as u64;
    }
}

impl Sub<ByteSize> for Ref {
    type Output = Ref;
    fn sub(self, rhs: ByteSize) -> Ref {
        Ref(self.0 - rhs as u64)
    }
}

impl SubAssign<ByteSize> for Ref {
    fn sub_assign(&mut self, rhs: ByteSize) {
        self.0 -= rhs as u64;
    }
}

/// `Ref` - `Ref` (the first reference must be at or above the second).
impl Sub<Ref> for Ref {
    type Output = ByteSize;
    fn sub(self, rhs: Ref) -> ByteSize {
        debug_assert!(
            self.0 >= rhs.0,
            "for (a - b), a({}) needs to be >= b({})",
            self,
            rhs
        );
        (self.0 - rhs.0) as usize
    }
}

impl fmt::Debug for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ref(+0x{:x})", self.0)
    }
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+0x{:x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_round_trips() {
        let base = Ref::from_offset(16);
        let next = base + 8usize;
        assert_eq!(next.offset(), 24);
        assert_eq!(next - base, 8);
    }

    #[test]
    fn zero_is_the_arena_base() {
        assert_eq!(Ref::ZERO.offset(), 0);
    }
}
