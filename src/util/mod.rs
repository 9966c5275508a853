pub mod address;
pub mod constants;

pub use address::{ByteSize, Ref};
