//! # Engine Primitives
//!
//! Hardcoded runtime constants for the stream order engine.
//!
//! These primitives are compiled into the binary and are immutable at runtime.
//! Callers may tighten the recursion limit through `EngineSettings`, never
//! bypass the snapshot limits.

/// Default maximum recursion depth for the recursive engines.
///
/// - Each level of recursion walks one arc further upstream.
/// - Deeper networks fail with `RecursionLimitExceeded` instead of
///   overflowing the call stack. The iterative engine has no such bound.
/// - Sized for a 2 MB thread stack (the std default for spawned threads)
///   in unoptimized builds. Raise it only on threads with larger stacks.
pub const MAX_RECURSION_DEPTH: usize = 1024;

/// Magic bytes for the binary network snapshot header.
///
/// - File Header = Magic Bytes ("STRM") + Version (u8) before payload.
pub const MAGIC_BYTES: &[u8; 4] = b"STRM";

/// Current snapshot format version.
///
/// Increment this when making breaking changes to the snapshot format.
pub const FORMAT_VERSION: u8 = 1;

/// Maximum number of arcs accepted from an external source.
///
/// Applies to snapshot decoding and to JSON network input in the app layer.
pub const MAX_ARC_COUNT: usize = 10_000_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_bytes_correct() {
        assert_eq!(MAGIC_BYTES, b"STRM");
    }

    #[test]
    fn recursion_depth_is_bounded() {
        assert!(MAX_RECURSION_DEPTH > 0);
        assert!(MAX_RECURSION_DEPTH < MAX_ARC_COUNT);
    }
}
