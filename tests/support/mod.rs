//! Shared test binding for the integration suite: a `Scanning` implementation for a
//! `{ u32 data; u32 count; Ref[count] }` node, matching `SPEC_FULL.md`'s linked-list
//! scenario, plus small helpers to read/write node contents through the public API.

use genheap::heap::arena::Arena;
use genheap::heap::chunk;
use genheap::{Ref, Scanning, SlotVisitor};

pub const NODE_HEADER_BYTES: usize = 8;

pub fn node_payload_size(ref_count: usize) -> usize {
    NODE_HEADER_BYTES + ref_count * 8
}

pub fn write_node(heap: &mut genheap::Heap<NodeScanning>, payload: Ref, data: u32, refs: &[Ref]) {
    let arena = heap.arena_mut();
    arena.write_bytes(payload.offset(), &data.to_ne_bytes());
    arena.write_bytes(payload.offset() + 4, &(refs.len() as u32).to_ne_bytes());
    for (i, r) in refs.iter().enumerate() {
        chunk::write_ref_slot(arena, payload + (NODE_HEADER_BYTES + i * 8), *r);
    }
}

pub fn read_data(arena: &Arena, payload: Ref) -> u32 {
    u32::from_ne_bytes(arena.read_bytes(payload.offset(), 4).try_into().unwrap())
}

pub fn read_count(arena: &Arena, payload: Ref) -> u32 {
    u32::from_ne_bytes(
        arena
            .read_bytes(payload.offset() + 4, 4)
            .try_into()
            .unwrap(),
    )
}

pub fn read_ref(arena: &Arena, payload: Ref, index: usize) -> Ref {
    chunk::read_ref_slot(arena, payload + (NODE_HEADER_BYTES + index * 8))
}

/// Overwrites one of `payload`'s existing reference slots in place. Used by the random
/// stress test to mutate a long-lived root node's children across allocations, the same
/// way a real mutator would drop its hold on one subgraph and reach for another.
pub fn set_ref(heap: &mut genheap::Heap<NodeScanning>, payload: Ref, index: usize, value: Ref) {
    chunk::write_ref_slot(heap.arena_mut(), payload + (NODE_HEADER_BYTES + index * 8), value);
}

pub struct NodeScanning;

impl Scanning for NodeScanning {
    fn scan_object(&self, arena: &mut Arena, object: Ref, slot_visitor: &mut dyn SlotVisitor) {
        let count = read_count(arena, object) as usize;
        for i in 0..count {
            slot_visitor.visit_slot(arena, object + (NODE_HEADER_BYTES + i * 8));
        }
    }
}
