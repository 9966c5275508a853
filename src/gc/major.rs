//! Major collection: mark-compact over a set of regions, implemented once and reused for
//! both the real major collector (`regions = [Tenured, Permanent]`) and the minor
//! collector's Eden-confined overflow fallback (`regions = [Eden]`) — see
//! SPEC_FULL.md §4.6.

use log::debug;

use crate::heap::chunk;
use crate::heap::region::RegionId;
use crate::heap::Heap;
use crate::vm::Scanning;

impl<S: Scanning> Heap<S> {
    /// Runs a full major collection: mark-compact of Tenured and Permanent. Eden and the
    /// Survivor regions are untouched (they may still hold live objects, whose outgoing
    /// references into Tenured/Permanent are rewritten all the same, since the rewrite
    /// pass is heap-wide regardless of which regions are physically compacted).
    pub(crate) fn major_collect(&mut self) {
        debug!("major collection: starting");
        self.mark_compact_regions(&[RegionId::Tenured, RegionId::Permanent]);
        debug!(
            "major collection: done, tenured_used={} perm_used={}",
            self.region_used(RegionId::Tenured),
            self.region_used(RegionId::Permanent)
        );
    }

    /// Mark-compacts exactly the given regions: mark (heap-wide, for correct
    /// reachability), address-assignment confined to `regions`, reference-rewrite
    /// (heap-wide), then physical compaction confined to `regions`.
    pub(crate) fn mark_compact_regions(&mut self, regions: &[RegionId]) {
        self.mark_from_root();

        for &id in regions {
            self.assign_compacted_addresses(id);
        }

        self.rewrite_references();

        for &id in regions {
            self.compact_region(id);
        }
    }

    /// Iterates `id`'s chunks in address order; for each marked (live) chunk, assigns it
    /// a new offset at the region's running compacted frontier and records it in
    /// `forward`. Unmarked (dead) chunks are skipped entirely — discarded by omission.
    fn assign_compacted_addresses(&mut self, id: RegionId) {
        let region = *self.regions.get(id);
        let mut cur = region.base;
        let end = region.frontier();
        let mut frontier = region.base;

        while cur < end {
            let payload = chunk::payload_of(cur);
            let size = chunk::size(&self.arena, payload);
            if chunk::is_marked(&self.arena, payload) {
                chunk::set_forward(&mut self.arena, payload, chunk::payload_of(frontier));
                frontier += size;
            }
            cur += size;
        }
    }

    /// Physically copies every live chunk of `id` to its `forward` offset (already
    /// rewritten-from by `rewrite_references`) and updates the region's used-size to the
    /// compacted frontier. Chunks are visited in ascending address order and always move
    /// to an offset at or below their current one, so `Arena::copy_within`'s `memmove`
    /// semantics handle the overlap safely.
    fn compact_region(&mut self, id: RegionId) {
        let region = *self.regions.get(id);
        let mut cur = region.base;
        let end = region.frontier();
        let mut new_used = 0usize;

        while cur < end {
            let payload = chunk::payload_of(cur);
            let size = chunk::size(&self.arena, payload);
            if let Some(new_payload) = chunk::forward(&self.arena, payload) {
                let src_header = cur;
                let dst_header = chunk::header_of(new_payload);
                self.arena
                    .copy_within(src_header.offset(), dst_header.offset(), size);
                chunk::clear_mark(&mut self.arena, new_payload);
                chunk::clear_forward(&mut self.arena, new_payload);
                new_used = new_used.max(dst_header.offset() - region.base.offset() + size);
            }
            cur += size;
        }

        self.regions.get_mut(id).used = new_used;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::HeapConfig;
    use crate::util::constants::HEADER_SIZE;
    use crate::util::Ref;
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
    fn compacts_tenured_dropping_dead_chunks() {
        let mut heap = Heap::init(test_config(), NodeScanning, Ref::ZERO).unwrap();
        let tenured_base = heap.regions.get(RegionId::Tenured).base;

        let dead_size = node_payload_size(0) + HEADER_SIZE;
        let dead = chunk::payload_of(tenured_base);
        chunk::init_header(&mut heap.arena, dead, dead_size, 3);
        write_node(&mut heap.arena, dead, 999, &[]);

        let live_size = node_payload_size(0) + HEADER_SIZE;
        let live = chunk::payload_of(tenured_base + dead_size);
        chunk::init_header(&mut heap.arena, live, live_size, 3);
        write_node(&mut heap.arena, live, 123, &[]);

        heap.regions.get_mut(RegionId::Tenured).used = dead_size + live_size;
        heap.set_root(live);

        heap.major_collect();

        assert_eq!(heap.region_used(RegionId::Tenured), live_size);
        let new_live = chunk::payload_of(tenured_base);
        assert_eq!(heap.root(), new_live);
        assert_eq!(read_data(&heap.arena, new_live), 123);
    }
}
