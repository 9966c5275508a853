//! Chunk header accessors: every object in the heap is a fixed header followed by
//! `size - HEADER_SIZE` opaque payload bytes. All access goes through these free functions
//! rather than a native struct overlay (see the "header + flexible-sized payload" design
//! note), keeping the unsafe surface confined to `Arena`'s own raw-pointer accessors.

use crate::heap::arena::Arena;
use crate::util::constants::{HEADER_SIZE, OFFSET_AGE, OFFSET_FORWARD, OFFSET_MARK, OFFSET_SIZE};
use crate::util::Ref;

/// The address of the header belonging to the chunk whose payload is `payload`.
pub fn header_of(payload: Ref) -> Ref {
    payload - HEADER_SIZE
}

/// The address of the payload belonging to the chunk whose header is at `header`.
pub fn payload_of(header: Ref) -> Ref {
    header + HEADER_SIZE
}

pub fn is_marked(arena: &Arena, payload: Ref) -> bool {
    arena.read_u8(header_of(payload).offset() + OFFSET_MARK) != 0
}

pub fn set_mark(arena: &mut Arena, payload: Ref) {
    arena.write_u8(header_of(payload).offset() + OFFSET_MARK, 1);
}

pub fn clear_mark(arena: &mut Arena, payload: Ref) {
    arena.write_u8(header_of(payload).offset() + OFFSET_MARK, 0);
}

pub fn age(arena: &Arena, payload: Ref) -> u8 {
    arena.read_u8(header_of(payload).offset() + OFFSET_AGE)
}

pub fn set_age(arena: &mut Arena, payload: Ref, value: u8) {
    arena.write_u8(header_of(payload).offset() + OFFSET_AGE, value);
}

/// Increments `age` by one, saturating at 255 (per the source's saturating-counter rule).
pub fn bump_age(arena: &mut Arena, payload: Ref) {
    let next = age(arena, payload).saturating_add(1);
    set_age(arena, payload, next);
}

pub fn size(arena: &Arena, payload: Ref) -> usize {
    arena.read_u64(header_of(payload).offset() + OFFSET_SIZE) as usize
}

pub fn set_size(arena: &mut Arena, payload: Ref, value: usize) {
    arena.write_u64(header_of(payload).offset() + OFFSET_SIZE, value as u64);
}

/// Reads the `forward` field. The on-wire encoding stores `target_offset + 1`, reserving
/// raw `0` exclusively for "unset" even when the real target is the literal arena base
/// (reachable only through the Eden-confined mark-compact fallback, since Eden is the
/// first region) — see SPEC_FULL.md's Open Questions for why a plain zero-sentinel is
/// ambiguous there.
pub fn forward(arena: &Arena, payload: Ref) -> Option<Ref> {
    let raw = arena.read_u64(header_of(payload).offset() + OFFSET_FORWARD);
    if raw == 0 {
        None
    } else {
        Some(Ref::from_offset((raw - 1) as usize))
    }
}

pub fn set_forward(arena: &mut Arena, payload: Ref, target: Ref) {
    arena.write_u64(
        header_of(payload).offset() + OFFSET_FORWARD,
        target.offset() as u64 + 1,
    );
}

pub fn clear_forward(arena: &mut Arena, payload: Ref) {
    arena.write_u64(header_of(payload).offset() + OFFSET_FORWARD, 0);
}

/// Initializes a freshly allocated chunk's header: zero mark/forward, given age, given size.
pub fn init_header(arena: &mut Arena, payload: Ref, total_size: usize, initial_age: u8) {
    clear_mark(arena, payload);
    clear_forward(arena, payload);
    set_age(arena, payload, initial_age);
    set_size(arena, payload, total_size);
}

/// Reads a `Ref`-valued slot (an intra-heap reference field inside some object's payload).
pub fn read_ref_slot(arena: &Arena, slot: Ref) -> Ref {
    Ref::from_offset(arena.read_u64(slot.offset()) as usize)
}

/// Writes a `Ref`-valued slot.
pub fn write_ref_slot(arena: &mut Arena, slot: Ref, value: Ref) {
    arena.write_u64(slot.offset(), value.offset() as u64);
}
