//! Randomized stress test over many allocation/mutation cycles, seeded for reproducibility
//! (mirroring the teacher's own `rand`/`rand_chacha` dev-dependency split: deterministic
//! pseudo-random inputs, never `thread_rng`, so a failure is reproducible from the seed
//! alone). Exercises the allocator across minor and major collections simultaneously and
//! checks the invariants from `SPEC_FULL.md` §8 after every allocation, plus reachability
//! preservation for a root whose children are repeatedly replaced.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use genheap::{Heap, HeapConfig, RegionId};

mod support;
use support::{node_payload_size, read_data, read_ref, set_ref, write_node, NodeScanning};

const ROOT_SLOTS: usize = 8;
const ITERATIONS: u32 = 2000;

fn stress_config() -> HeapConfig {
    HeapConfig {
        eden_max: 2048,
        survivor_max: 1024,
        tenured_max: 4096,
        perm_max: 4096,
        age_cycles: 2,
        gc_delay: 4,
    }
}

/// Asserts the region-level invariants that must hold after every `alloc` call, per
/// `SPEC_FULL.md` §8: no region over capacity, and region useds sum to the heap total.
fn assert_region_invariants(heap: &Heap<NodeScanning>) {
    let mut sum = 0usize;
    for &id in &[
        RegionId::Eden,
        RegionId::SurvivorA,
        RegionId::SurvivorB,
        RegionId::Tenured,
        RegionId::Permanent,
    ] {
        let used = heap.region_used(id);
        let cap = heap.region_capacity(id);
        assert!(used <= cap, "{:?} used {} exceeds capacity {}", id, used, cap);
        sum += used;
    }
    assert_eq!(sum, heap.total_used());
}

#[test]
fn random_mutation_preserves_reachable_children_across_collections() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xC0FF_EE42);
    let mut heap = Heap::init(stress_config(), NodeScanning, genheap::Ref::ZERO).unwrap();

    // Seed the root with real (never-nil) children before any collection can run, so the
    // mark/scan traversal never has to dereference an uninitialized slot.
    let mut init_leaves = Vec::with_capacity(ROOT_SLOTS);
    for _ in 0..ROOT_SLOTS {
        let leaf = heap.alloc(node_payload_size(0)).expect("setup alloc");
        write_node(&mut heap, leaf, 0, &[]);
        init_leaves.push(leaf);
    }
    let root = heap
        .alloc(node_payload_size(ROOT_SLOTS))
        .expect("root alloc");
    write_node(&mut heap, root, 0, &init_leaves);
    heap.set_root(root);

    let mut expected = [0u32; ROOT_SLOTS];

    for i in 0..ITERATIONS {
        // Occasionally allocate an unreachable large object to exercise the direct-to-
        // Tenured fast path and build gc_pressure toward a major collection.
        if i % 47 == 0 {
            let garbage = heap.alloc(600).expect("large filler alloc should not OOM");
            write_node(&mut heap, garbage, 0xDEAD, &[]);
        } else if i % 5 == 0 {
            let garbage = heap.alloc(node_payload_size(0)).expect("filler alloc should not OOM");
            write_node(&mut heap, garbage, 0xBEEF, &[]);
        }

        let data = rng.random_range(1..=u32::MAX);
        let leaf = heap
            .alloc(node_payload_size(0))
            .expect("reachable alloc should not OOM");
        write_node(&mut heap, leaf, data, &[]);

        let slot = rng.random_range(0..ROOT_SLOTS);
        let current_root = heap.root();
        set_ref(&mut heap, current_root, slot, leaf);
        expected[slot] = data;

        assert_region_invariants(&heap);
    }

    let final_root = heap.root();
    for (slot, &data) in expected.iter().enumerate() {
        let child = read_ref(heap.arena(), final_root, slot);
        assert_eq!(
            read_data(heap.arena(), child),
            data,
            "slot {} should still resolve to its last-written value after relocation",
            slot
        );
    }
}
