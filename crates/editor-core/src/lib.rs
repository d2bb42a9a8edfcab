//! # Editor Core.
//!
//! The out-of-core edit engine: pending edits live in an [`overlay`] on top
//! of the file, a fixed-size [`viewport`] shows file bytes merged with those
//! edits, [`selection`] tracks the marked region and [`search`] scans the
//! file in cancellable blocks.
pub mod enums;
pub mod errors;
pub mod hex;
pub mod overlay;
pub mod search;
pub mod selection;
pub mod viewport;
