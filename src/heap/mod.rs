pub mod arena;
pub mod chunk;
pub mod region;

use log::{debug, trace};

use crate::error::GcError;
use crate::options::HeapConfig;
use crate::util::Ref;
use crate::vm::Scanning;

use arena::Arena;
use region::{RegionId, Regions};

/// The generational heap: arena, region bookkeeping, collection policy state, and the
/// host-supplied `Scanning` capability, all owned together as a single value (see the
/// "global mutable state" design note — there is no process-wide heap singleton).
pub struct Heap<S: Scanning> {
    pub(crate) arena: Arena,
    pub(crate) regions: Regions,
    /// Index (0 or 1) of the currently active Survivor region: `SurvivorA` if 0, else
    /// `SurvivorB`. The active region is the "from" space at the next minor collection.
    pub(crate) survivor_active: u8,
    pub(crate) age_cycles: u8,
    pub(crate) gc_delay: u32,
    pub(crate) gc_pressure: u32,
    pub(crate) root: Ref,
    pub(crate) scanning: S,
}

impl<S: Scanning> Heap<S> {
    /// Carves a fresh arena into the five fixed regions and returns a quiescent heap
    /// whose sole live object is `root` (the embedder must have already written that
    /// object's payload before handing its reference in here — `Heap::init` performs no
    /// allocation itself).
    pub fn init(config: HeapConfig, scanning: S, root: Ref) -> Result<Self, GcError> {
        config.validate()?;
        let arena = Arena::new(config.total_arena_size())?;
        let regions = Regions::layout(
            config.eden_max,
            config.survivor_max,
            config.tenured_max,
            config.perm_max,
        );
        debug!(
            "heap initialized: eden={} survivor={} tenured={} perm={} age_cycles={} gc_delay={}",
            config.eden_max,
            config.survivor_max,
            config.tenured_max,
            config.perm_max,
            config.age_cycles,
            config.gc_delay
        );
        Ok(Heap {
            arena,
            regions,
            survivor_active: 0,
            age_cycles: config.age_cycles,
            gc_delay: config.gc_delay,
            gc_pressure: 0,
            root,
            scanning,
        })
    }

    /// Consumes the heap, releasing the arena. Provided for parity with the spec's
    /// explicit `heap_destroy` operation; dropping the `Heap` normally has the same effect.
    pub fn destroy(self) {
        trace!("heap destroyed");
    }

    pub fn root(&self) -> Ref {
        self.root
    }

    pub fn set_root(&mut self, root: Ref) {
        self.root = root;
    }

    pub fn gc_pressure(&self) -> u32 {
        self.gc_pressure
    }

    pub(crate) fn survivor_from_id(&self) -> RegionId {
        if self.survivor_active == 0 {
            RegionId::SurvivorA
        } else {
            RegionId::SurvivorB
        }
    }

    pub(crate) fn survivor_to_id(&self) -> RegionId {
        if self.survivor_active == 0 {
            RegionId::SurvivorB
        } else {
            RegionId::SurvivorA
        }
    }

    /// Read-only inspection helpers (ambient, for tests/embedders; see SPEC_FULL.md §4.8).
    pub fn region_used(&self, id: RegionId) -> usize {
        self.regions.get(id).used
    }

    pub fn region_capacity(&self, id: RegionId) -> usize {
        self.regions.get(id).capacity
    }

    pub fn total_used(&self) -> usize {
        self.regions.total_used()
    }

    pub fn active_survivor(&self) -> RegionId {
        self.survivor_from_id()
    }

    /// Which region currently contains `r`, if any. Diagnostic only, as with the rest of
    /// this inspection surface (SPEC_FULL.md §4.8); never called by `alloc`.
    pub fn region_of(&self, r: Ref) -> Option<RegionId> {
        self.regions.containing(r)
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Mutable access to the arena, for an embedder to write an object's payload bytes
    /// immediately after `Heap::alloc` returns its reference. The collector itself never
    /// needs this from outside `heap`/`gc`; it is part of the public surface solely
    /// because payload contents are opaque bytes this crate does not know how to write.
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }
}
