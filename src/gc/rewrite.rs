//! The reference-rewriting pass, shared between minor collection's step 6 and major
//! collection's step 3 (and, by the same token, the Eden-confined fallback's own
//! mini mark-compact cycle). Traverses from the root, following whatever chunk a slot
//! currently points at; if that chunk has moved (`forward` is set), the slot is rewritten
//! to the forwarded address and traversal continues from there instead.

use log::trace;

use crate::heap::arena::Arena;
use crate::heap::chunk;
use crate::heap::Heap;
use crate::util::Ref;
use crate::vm::{Scanning, SlotVisitor};

struct RewriteCollector<'a> {
    stack: &'a mut Vec<Ref>,
}

impl SlotVisitor for RewriteCollector<'_> {
    fn visit_slot(&mut self, arena: &mut Arena, slot: Ref) {
        let child = chunk::read_ref_slot(arena, slot);
        let resolved = match chunk::forward(arena, child) {
            Some(new_addr) => {
                chunk::write_ref_slot(arena, slot, new_addr);
                new_addr
            }
            None => child,
        };
        self.stack.push(resolved);
    }
}

impl<S: Scanning> Heap<S> {
    /// Rewrites every reference slot reachable from the root whose target has moved this
    /// cycle, then restores the quiescent mark-bit state.
    ///
    /// The mark bit is reused here purely as this traversal's own revisit guard, which is
    /// only sound if every chunk starts out unmarked: destination chunks already have
    /// `mark = 0` from the copy step, but pre-existing Tenured/Permanent objects untouched
    /// by this cycle would otherwise still carry `mark = 1` left over from the mark phase,
    /// causing their own outgoing slots to be skipped. `clear_all_marks` before the
    /// traversal (and again after, to restore the quiescent-state invariant) closes that
    /// gap — see SPEC_FULL.md's Open Questions.
    pub(crate) fn rewrite_references(&mut self) {
        trace!("reference-rewrite pass: starting from root {}", self.root);
        self.clear_all_marks();

        if let Some(new_root) = chunk::forward(&self.arena, self.root) {
            self.root = new_root;
        }

        let mut stack = vec![self.root];
        while let Some(object) = stack.pop() {
            if chunk::is_marked(&self.arena, object) {
                continue;
            }
            chunk::set_mark(&mut self.arena, object);
            let mut collector = RewriteCollector { stack: &mut stack };
            self.scanning
                .scan_object(&mut self.arena, object, &mut collector);
        }

        self.clear_all_marks();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::region::RegionId;
    use crate::options::HeapConfig;
    use crate::util::constants::HEADER_SIZE;
    use crate::vm::test_support::*;

    fn test_config() -> HeapConfig {
        HeapConfig {
            eden_max: 1024,
            survivor_max: 512,
            tenured_max: 2048,
            perm_max: 2560,
            age_cycles: 2,
            gc_delay: 3,
        }
    }

    #[test]
    fn rewrite_follows_forward_to_new_location() {
        let mut heap = Heap::init(test_config(), NodeScanning, Ref::ZERO).unwrap();

        let a_size = node_payload_size(0) + HEADER_SIZE;
        let a = chunk::payload_of(Ref::ZERO);
        chunk::init_header(&mut heap.arena, a, a_size, 0);
        write_node(&mut heap.arena, a, 42, &[]);

        let b_size = node_payload_size(1) + HEADER_SIZE;
        let b = chunk::payload_of(Ref::ZERO + a_size);
        chunk::init_header(&mut heap.arena, b, b_size, 0);
        write_node(&mut heap.arena, b, 7, &[a]);

        heap.regions.get_mut(RegionId::Eden).used = a_size + b_size;
        heap.set_root(b);

        // Simulate evacuation of `a` to a new location without actually moving `b`.
        let a_new = chunk::payload_of(Ref::ZERO + a_size + b_size);
        chunk::init_header(&mut heap.arena, a_new, a_size, 1);
        write_node(&mut heap.arena, a_new, 42, &[]);
        chunk::set_forward(&mut heap.arena, a, a_new);

        heap.rewrite_references();

        assert_eq!(read_ref(&heap.arena, heap.root(), 0), a_new);
        assert_eq!(read_data(&heap.arena, a_new), 42);
        assert!(!chunk::is_marked(&heap.arena, heap.root()));
        assert!(!chunk::is_marked(&heap.arena, a_new));
    }
}
