//! Error taxonomy for the heap's fatal (init-time) conditions.
//!
//! `OutOfMemory` is deliberately *not* surfaced through `Result`: `Heap::alloc`'s output is
//! "a reference, or nil" (see `SPEC_FULL.md` §6), so recoverable allocation failure is
//! expressed as `Option::None`. Internal invariant violations (a collector bug, not a
//! runtime condition per §7) are reported via `assert!`/`debug_assert!`, not this enum.

/// Fatal errors reported by `Heap::init`.
#[derive(Debug, thiserror::Error)]
pub enum GcError {
    /// A region capacity was zero, or otherwise violated a configuration precondition.
    #[error("invalid heap configuration: {0}")]
    InvalidConfig(&'static str),

    /// The underlying arena allocation failed.
    #[error("failed to allocate the heap arena")]
    ResourceExhausted,

    /// Conceptual tag for the "no allocation path succeeded" condition. `Heap::alloc`
    /// reports this as `None` rather than constructing this variant; it exists so the
    /// three error kinds in `SPEC_FULL.md` §7 have a single named home in the type system
    /// for documentation and logging purposes.
    #[error("heap exhausted: no allocation path succeeded after minor and major collection")]
    OutOfMemory,
}
