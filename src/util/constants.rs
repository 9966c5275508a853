//! Size and layout constants, in the spirit of the teacher's `util::constants`: small,
//! explicit, named quantities rather than magic numbers scattered through the collector.

/// Bytes making up one kibibyte, used only by tests/doc examples for readable configs.
#[allow(dead_code)]
pub const BYTES_IN_KBYTE: usize = 1 << 10;

/// Number of bytes in the fixed chunk header: `mark`(1) + `age`(1) + 6 bytes padding
/// (kept for readability when a chunk is dumped, not required for correctness since every
/// field is accessed through explicit offset get/set helpers rather than a native struct
/// overlay) + `size`(8, u64) + `forward`(8, u64).
pub const HEADER_SIZE: usize = 24;

const _: () = {
    static_assertions::const_assert_eq!(HEADER_SIZE, 2 + 6 + 8 + 8);
};

/// Byte offset of the `mark` field within a chunk header.
pub(crate) const OFFSET_MARK: usize = 0;
/// Byte offset of the `age` field within a chunk header.
pub(crate) const OFFSET_AGE: usize = 1;
/// Byte offset of the `size` field within a chunk header.
pub(crate) const OFFSET_SIZE: usize = 8;
/// Byte offset of the `forward` field within a chunk header.
pub(crate) const OFFSET_FORWARD: usize = 16;
