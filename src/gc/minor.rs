//! Minor collection: evacuates the young generation (Survivor-From, then Eden) to the
//! inactive Survivor or Tenured, per SPEC_FULL.md §4.5.

use log::{debug, trace, warn};

use crate::heap::chunk;
use crate::heap::region::RegionId;
use crate::heap::Heap;
use crate::vm::Scanning;

impl<S: Scanning> Heap<S> {
    /// Runs a minor collection. Always leaves Eden's used-size at 0, except in the
    /// pathological corner documented in SPEC_FULL.md's Open Questions, where the
    /// Eden-confined overflow fallback still cannot place every survivor in Survivor/
    /// Tenured — there, Eden retains its (now compacted) survivors rather than losing them.
    pub(crate) fn minor_collect(&mut self) {
        debug!("minor collection: starting");
        self.mark_from_root();

        self.evacuate_survivor_from();
        self.flip_survivor();
        self.evacuate_eden();

        self.rewrite_references();

        let eden_used = self.regions.get(RegionId::Eden).used;
        let total = self.regions.total_used();
        debug!(
            "minor collection: done, eden_used={} survivor_used={} tenured_used={} total_used={}",
            eden_used,
            self.region_used(self.active_survivor()),
            self.region_used(RegionId::Tenured),
            total
        );
    }

    /// Step 2: evacuate Survivor-From's live chunks, promoting age-eligible ones to
    /// Tenured when there is room, otherwise copying them to Survivor-To.
    fn evacuate_survivor_from(&mut self) {
        let from_id = self.survivor_from_id();
        let to_id = self.survivor_to_id();
        let region = *self.regions.get(from_id);
        let mut cur = region.base;
        let end = region.frontier();
        let mut survivor_to_used = 0usize;

        while cur < end {
            let src_payload = chunk::payload_of(cur);
            let size = chunk::size(&self.arena, src_payload);

            if !chunk::is_marked(&self.arena, src_payload) {
                cur += size;
                continue;
            }

            let age = chunk::age(&self.arena, src_payload);
            let tenured_fits = self.regions.get(RegionId::Tenured).fits(size);

            if age >= self.age_cycles && tenured_fits {
                let dst = self.bump_alloc_raw(RegionId::Tenured, size);
                self.evacuate_chunk(src_payload, dst, size, None);
            } else {
                if age >= self.age_cycles {
                    // Age-eligible but Tenured has no room: stay young, but record the
                    // pressure signal (a boolean widened to 0/1, per the source).
                    self.gc_pressure += 1;
                }
                debug_assert!(
                    survivor_to_used + size < self.regions.get(to_id).capacity,
                    "Survivor-To cannot overflow: its capacity equals Survivor-From's and \
                     only a subset of Survivor-From's live bytes land there"
                );
                let dst_header = self.regions.get(to_id).base + survivor_to_used;
                survivor_to_used += size;
                self.evacuate_chunk(src_payload, chunk::payload_of(dst_header), size, None);
            }

            cur += size;
        }

        self.regions.get_mut(to_id).used = survivor_to_used;
        // Every live chunk that started this pass in Survivor-From has now been copied
        // either to Tenured or to Survivor-To; Survivor-From itself is fully drained (the
        // §8 Flip law), and every chunk below `end` that was an evacuation source carries
        // a `forward` that must not remain reachable-by-iteration once this call returns.
        self.regions.get_mut(from_id).used = 0;
    }

    fn flip_survivor(&mut self) {
        self.survivor_active = 1 - self.survivor_active;
    }

    /// Step 5: evacuate Eden's live chunks, preferring the (newly active) Survivor, then
    /// Tenured, then falling back to an in-place confined mark-compact of Eden itself.
    fn evacuate_eden(&mut self) {
        let mut fallback_used = false;
        let mut cur = self.regions.get(RegionId::Eden).base;

        loop {
            let region = *self.regions.get(RegionId::Eden);
            let end = region.frontier();
            if cur >= end {
                break;
            }

            let src_payload = chunk::payload_of(cur);
            let size = chunk::size(&self.arena, src_payload);

            if !chunk::is_marked(&self.arena, src_payload) {
                cur += size;
                continue;
            }

            let survivor_id = self.active_survivor();
            if self.regions.get(survivor_id).fits(size) {
                let dst = self.bump_alloc_raw(survivor_id, size);
                self.evacuate_chunk(src_payload, dst, size, Some(1));
                cur += size;
                continue;
            }

            if self.regions.get(RegionId::Tenured).fits(size) {
                let dst = self.bump_alloc_raw(RegionId::Tenured, size);
                self.evacuate_chunk(src_payload, dst, size, Some(1));
                cur += size;
                continue;
            }

            if fallback_used {
                // Already attempted the one-shot in-place compaction and some survivors
                // still do not fit anywhere: leave them resident in Eden rather than
                // silently dropping reachable data (see SPEC_FULL.md's Open Questions on
                // the Eden-fallback double-overflow corner). Stop trying to evacuate
                // further; whatever remains from `cur` onward stays in Eden as-is.
                warn!(
                    "minor collection: Eden overflow persists after compaction; \
                     leaving remaining survivors resident in Eden"
                );
                break;
            }

            trace!("minor collection: Eden overflow, running in-place compaction fallback");
            self.rewrite_references();
            self.mark_compact_regions(&[RegionId::Eden]);
            // `mark_compact_regions` ends its own `rewrite_references` pass with a
            // heap-wide `clear_all_marks`, so every chunk it just compacted into Eden
            // (all of them live — dead ones were dropped by the compaction itself) now
            // reads as unmarked. The loop below restarts from Eden's base and uses the
            // mark bit to decide what is live; without re-marking first, it would read
            // every compacted survivor as garbage and skip it, then zero Eden's used-size
            // on exit, discarding reachable data this very fallback exists to preserve.
            // Re-mark from the (already-rewritten) root to restore the invariant the
            // rest of this loop depends on.
            self.mark_from_root();
            self.gc_pressure += self.gc_delay;
            fallback_used = true;
            // Restart from the compacted region's base; the fallback has already
            // discarded dead chunks and renumbered the survivors.
            cur = self.regions.get(RegionId::Eden).base;
        }

        let base = self.regions.get(RegionId::Eden).base;
        let frontier = self.regions.get(RegionId::Eden).frontier();
        if cur >= frontier {
            // Every live chunk was evacuated out of Eden; it is empty again.
            self.regions.get_mut(RegionId::Eden).used = 0;
        } else {
            // Chunks from `cur` to `frontier` could not be placed anywhere and remain
            // resident. Slide them down to the region's base, recording each one's
            // `forward` so the upcoming rewrite pass fixes up every slot that still
            // points at its old offset.
            let mut src = cur;
            let mut dst = base;
            while src < frontier {
                let src_payload = chunk::payload_of(src);
                let size = chunk::size(&self.arena, src_payload);
                let dst_payload = chunk::payload_of(dst);
                self.arena
                    .copy_within(src.offset(), dst.offset(), size);
                chunk::clear_forward(&mut self.arena, dst_payload);
                chunk::set_forward(&mut self.arena, src_payload, dst_payload);
                src += size;
                dst += size;
            }
            self.regions.get_mut(RegionId::Eden).used = dst.offset() - base.offset();
        }
    }

    /// Bumps `id`'s region cursor by `size` and returns the payload address of the newly
    /// reserved chunk, without touching header or payload bytes.
    fn bump_alloc_raw(&mut self, id: RegionId, size: usize) -> crate::util::Ref {
        let region = self.regions.get_mut(id);
        let header = region.base + region.used;
        region.used += size;
        chunk::payload_of(header)
    }

    /// Copies a chunk's bytes to `dst`, applies the age transition (`None` increments age
    /// with saturation, the rule for every Survivor-From eviction regardless of
    /// destination; `Some(n)` sets the destination's age to exactly `n`, the rule for
    /// Eden evacuations), clears the destination's mark, and records the source's forward
    /// pointer.
    fn evacuate_chunk(
        &mut self,
        src: crate::util::Ref,
        dst: crate::util::Ref,
        size: usize,
        set_age_to: Option<u8>,
    ) {
        let src_header = chunk::header_of(src);
        let dst_header = chunk::header_of(dst);
        self.arena
            .copy_within(src_header.offset(), dst_header.offset(), size);
        match set_age_to {
            Some(a) => chunk::set_age(&mut self.arena, dst, a),
            None => chunk::bump_age(&mut self.arena, dst),
        }
        chunk::clear_mark(&mut self.arena, dst);
        chunk::clear_forward(&mut self.arena, dst);
        chunk::set_forward(&mut self.arena, src, dst);
    }
}
