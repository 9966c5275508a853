//! The mark phase: a depth-first traversal from the root that sets every reachable
//! chunk's mark bit. Converted from the source's natural recursive formulation into an
//! explicit work stack (see the "recursion" design note), so native stack depth stays
//! O(1) regardless of the reachable object graph's chain length.

use log::trace;

use crate::heap::arena::Arena;
use crate::heap::chunk;
use crate::heap::Heap;
use crate::util::Ref;
use crate::vm::{Scanning, SlotVisitor};

/// A `SlotVisitor` that pushes every visited child reference onto a shared work stack,
/// without itself deciding whether to recurse — the caller's `while let Some(...)` loop
/// does that, keeping the traversal iterative.
struct MarkCollector<'a> {
    stack: &'a mut Vec<Ref>,
}

impl SlotVisitor for MarkCollector<'_> {
    fn visit_slot(&mut self, arena: &mut Arena, slot: Ref) {
        let child = chunk::read_ref_slot(arena, slot);
        self.stack.push(child);
    }
}

impl<S: Scanning> Heap<S> {
    /// Runs the mark phase from the root. After this call, exactly the chunks reachable
    /// from the root carry `mark = 1`; everything else is unmarked.
    pub(crate) fn mark_from_root(&mut self) {
        trace!("mark phase: starting from root {}", self.root);
        let mut stack = vec![self.root];
        while let Some(object) = stack.pop() {
            if chunk::is_marked(&self.arena, object) {
                continue;
            }
            chunk::set_mark(&mut self.arena, object);
            let mut collector = MarkCollector { stack: &mut stack };
            self.scanning
                .scan_object(&mut self.arena, object, &mut collector);
        }
    }

    /// Clears every chunk's mark bit across the whole heap, regardless of current state.
    /// Used both to restore the quiescent-state invariant at the end of a collection
    /// phase and, critically, to give the reference-rewrite traversal (`rewrite.rs`) a
    /// clean slate to use the mark bit as its own revisit guard — see SPEC_FULL.md's
    /// Open Questions entry on "rewrite traversal revisit-guard reuse" for why a blanket
    /// clear is required for correctness, not just tidiness.
    pub(crate) fn clear_all_marks(&mut self) {
        use crate::heap::region::RegionId;
        for &id in RegionId::ALL.iter() {
            let region = *self.regions.get(id);
            let mut cur = region.base;
            let end = region.frontier();
            while cur < end {
                let size = chunk::size(&self.arena, chunk::payload_of(cur));
                chunk::clear_mark(&mut self.arena, chunk::payload_of(cur));
                cur += size;
            }
        }
    }
}
