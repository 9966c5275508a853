//! Heap configuration, mirroring the teacher's `util::options` split between a plain
//! struct of values and an explicit `validate` step invoked once at construction time.
//! There is no environment/command-line parsing surface here (see `SPEC_FULL.md` §6 Non-goal
//! boundary): the core takes its configuration as plain Rust values from its embedder.

use crate::error::GcError;

/// Heap shape and collection-policy configuration, supplied once to `Heap::init`.
#[derive(Debug, Clone, Copy)]
pub struct HeapConfig {
    /// Capacity of the Eden region, in bytes.
    pub eden_max: usize,
    /// Capacity of each of the two Survivor regions (they are equal-sized), in bytes.
    pub survivor_max: usize,
    /// Capacity of the Tenured region, in bytes.
    pub tenured_max: usize,
    /// Capacity of the Permanent region, in bytes.
    pub perm_max: usize,
    /// Number of minor-collection survivals before an object is promotion-eligible.
    pub age_cycles: u8,
    /// Number of "pressure units" tolerated before a major collection is forced.
    pub gc_delay: u32,
}

impl HeapConfig {
    /// Total arena size implied by this configuration: `eden + 2*survivor + tenured + perm`.
    pub fn total_arena_size(&self) -> usize {
        self.eden_max
            .saturating_add(2 * self.survivor_max)
            .saturating_add(self.tenured_max)
            .saturating_add(self.perm_max)
    }

    /// Validates the configuration, returning `InvalidConfig` for the first violation found.
    pub fn validate(&self) -> Result<(), GcError> {
        if self.eden_max == 0 {
            return Err(GcError::InvalidConfig("eden_max must be positive"));
        }
        if self.survivor_max == 0 {
            return Err(GcError::InvalidConfig("survivor_max must be positive"));
        }
        if self.tenured_max == 0 {
            return Err(GcError::InvalidConfig("tenured_max must be positive"));
        }
        if self.perm_max == 0 {
            return Err(GcError::InvalidConfig("perm_max must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> HeapConfig {
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
    fn accepts_positive_capacities() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn rejects_zero_capacity() {
        let mut cfg = valid_config();
        cfg.eden_max = 0;
        assert!(matches!(cfg.validate(), Err(GcError::InvalidConfig(_))));
    }

    #[test]
    fn total_arena_size_sums_regions() {
        let cfg = valid_config();
        assert_eq!(cfg.total_arena_size(), 1024 + 2 * 512 + 2048 + 2560);
    }
}
