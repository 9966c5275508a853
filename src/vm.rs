//! The capability boundary between this crate's core and its embedder, mirroring the role
//! MMTk's `vm::Scanning`/`vm::SlotVisitor` traits play for a `VMBinding`: the core knows
//! nothing about user object shapes, and instead asks the host to enumerate an object's
//! outgoing references.

use crate::heap::arena::Arena;
use crate::util::Ref;

/// A reference-visitor, invoked once per intra-heap reference field of a live object.
///
/// The core supplies this capability to itself: the mark engine and the reference-rewrite
/// pass are the only implementors. Hosts never implement `SlotVisitor` directly — they
/// only call `visit_slot` (indirectly, through `Scanning::scan_object`) for each of an
/// object's non-nil reference fields.
pub trait SlotVisitor {
    /// `slot` is the address, inside some live object's payload, of a field holding a
    /// `Ref` to another live object. `arena` grants access to read (and, during
    /// reference-rewrite, to overwrite) the raw bytes at that address.
    fn visit_slot(&mut self, arena: &mut Arena, slot: Ref);
}

/// The host-supplied capability: given a live object, invoke `slot_visitor` once for each
/// of its non-nil intra-heap reference fields.
///
/// # Contract
///
/// For every intra-heap reference field of the object at `object` that is non-nil,
/// `scan_object` must invoke `slot_visitor.visit_slot(arena, slot)` exactly once, where
/// `slot` is the address of that field. Nil fields must not be visited. Implementations
/// must be deterministic and side-effect-free beyond those invocations: `scan_object` is
/// called once per live object during the mark phase, and again (with a different
/// `SlotVisitor`) during every reference-rewrite pass, so it must report the same set of
/// slots both times.
pub trait Scanning {
    fn scan_object(&self, arena: &mut Arena, object: Ref, slot_visitor: &mut dyn SlotVisitor);
}
