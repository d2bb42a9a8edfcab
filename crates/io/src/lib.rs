/// # IO Crate.
///
/// Byte-addressable access to the file being edited. Nothing here maps or
/// buffers the whole file: every access is a positioned read or write.
pub mod errors;
pub mod store;
