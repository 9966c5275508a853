//! The allocator: the sole entry point that ever triggers collection. Routes a request by
//! size and space availability per SPEC_FULL.md §4.3/§4.7.

use log::trace;

use crate::heap::chunk;
use crate::heap::region::RegionId;
use crate::heap::Heap;
use crate::util::constants::HEADER_SIZE;
use crate::util::Ref;
use crate::vm::Scanning;

impl<S: Scanning> Heap<S> {
    /// Allocates `size` payload bytes, returning a reference to a zeroed chunk, or `None`
    /// if no allocation path succeeds even after running both collectors.
    pub fn alloc(&mut self, size: usize) -> Option<Ref> {
        let n = size + HEADER_SIZE;

        if self.is_large(n) {
            if let Some(r) = self.try_alloc_in(RegionId::Tenured, n) {
                trace!("alloc: large object ({} bytes) placed directly in Tenured", n);
                return Some(r);
            }
        }

        if let Some(r) = self.try_alloc_in(RegionId::Eden, n) {
            return Some(r);
        }

        let mut major_done_this_call = false;
        if self.gc_pressure >= self.gc_delay {
            trace!("alloc: gc_pressure {} >= gc_delay {}, running major collection", self.gc_pressure, self.gc_delay);
            self.major_collect();
            self.gc_pressure = 0;
            major_done_this_call = true;
        }

        trace!("alloc: running minor collection");
        self.minor_collect();

        if let Some(r) = self.try_alloc_in(RegionId::Eden, n) {
            return Some(r);
        }

        if !major_done_this_call {
            trace!("alloc: still no fit after minor collection, running major collection");
            self.major_collect();
        }

        match self.try_alloc_in(RegionId::Tenured, n) {
            Some(r) => Some(r),
            None => {
                trace!("alloc: no path succeeded for {} bytes, returning None", n);
                None
            }
        }
    }

    /// A chunk is "large" if it would use up at least half of Eden's or Survivor's
    /// capacity, making the young generation's copy collector a poor fit for it.
    fn is_large(&self, n: usize) -> bool {
        n >= self.regions.get(RegionId::Eden).capacity / 2
            || n >= self.regions.get(RegionId::SurvivorA).capacity / 2
    }

    /// Attempts a bump allocation of `n` total bytes in `id`. On success, initializes the
    /// chunk's header (age 0, mark/forward clear) and zeroes its payload before returning.
    fn try_alloc_in(&mut self, id: RegionId, n: usize) -> Option<Ref> {
        let region = self.regions.get(id);
        if !region.fits(n) {
            return None;
        }
        let header = region.frontier();
        self.regions.get_mut(id).used += n;

        let payload = chunk::payload_of(header);
        chunk::init_header(&mut self.arena, payload, n, 0);
        self.arena.zero(payload.offset(), n - HEADER_SIZE);
        Some(payload)
    }
}
