//! # Formats Module
//!
//! Byte-level encodings of a [`crate::Network`]. File I/O lives in the app
//! layer; everything here is a pure transformation.

mod persistence;

pub use persistence::*;
