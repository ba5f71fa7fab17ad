//! # Core Type Definitions
//!
//! This module contains all core types for the stream order engine:
//! - Arc and node identifiers (`ArcId`, `NodeId`)
//! - Order values (`StreamOrder`)
//! - Arc records (`StreamArc`)
//! - Error types (`StreamOrderError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` for deterministic ordering in `BTreeMap`/`BTreeSet`
//! - Use saturating arithmetic for order sums to prevent overflow

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// ARC & NODE IDENTIFIERS
// =============================================================================

/// Stable identity of an arc within a [`crate::Network`].
///
/// Assigned at construction and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArcId(pub u64);

impl ArcId {
    /// Position of this arc in the network arena.
    ///
    /// Fails with `ArcNotFound` when the index does not fit in `usize`, so
    /// a wide id can never alias a low slot on 32-bit targets.
    pub fn slot(self) -> Result<usize, StreamOrderError> {
        usize::try_from(self.0).map_err(|_| StreamOrderError::ArcNotFound(self))
    }
}

/// Identifier of a node (a point where one or more arcs meet).
///
/// Nodes are not stored as records; they only exist as keys of the
/// [`crate::AdjacencyIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

// =============================================================================
// STREAM ORDER
// =============================================================================

/// A resolved stream order value.
///
/// Strahler orders and Shreve magnitudes share this representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StreamOrder(pub u64);

impl StreamOrder {
    /// Order of an arc with no upstream tributaries.
    pub const HEADWATER: Self = Self(1);

    /// Create a new order with the given value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Add two orders using saturating arithmetic.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Increment by one (Strahler tie promotion).
    #[must_use]
    pub const fn promote(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Get the raw order value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for StreamOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// ARC
// =============================================================================

/// A directed river segment.
///
/// Flow runs from `upstream_node` to `downstream_node`. Only `order` is
/// mutable during a traversal; it goes from `None` to a resolved value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamArc {
    /// Stable identity within the network.
    pub index: ArcId,
    /// Node the water enters this arc from.
    pub upstream_node: NodeId,
    /// Node the water leaves this arc at.
    pub downstream_node: NodeId,
    /// Resolved order, `None` until computed.
    #[serde(default)]
    pub order: Option<StreamOrder>,
}

impl StreamArc {
    /// Create a new arc with an unset order.
    #[must_use]
    pub const fn new(index: ArcId, upstream_node: NodeId, downstream_node: NodeId) -> Self {
        Self {
            index,
            upstream_node,
            downstream_node,
            order: None,
        }
    }

    /// Check whether the arc touches `node` at either end.
    #[must_use]
    pub fn is_incident(&self, node: NodeId) -> bool {
        self.upstream_node == node || self.downstream_node == node
    }

    /// Check whether water in this arc flows into `node`.
    #[must_use]
    pub fn flows_into(&self, node: NodeId) -> bool {
        self.downstream_node == node
    }

    /// The endpoint that is not `node`.
    ///
    /// Returns `None` if the arc is not incident at `node`. For a loop arc
    /// (both endpoints equal) the far node is `node` itself.
    #[must_use]
    pub fn far_node(&self, node: NodeId) -> Option<NodeId> {
        if self.upstream_node == node {
            Some(self.downstream_node)
        } else if self.downstream_node == node {
            Some(self.upstream_node)
        } else {
            None
        }
    }

    /// Check if the arc starts and ends at the same node.
    #[must_use]
    pub fn is_loop(&self) -> bool {
        self.upstream_node == self.downstream_node
    }

    /// Check if the order has been resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.order.is_some()
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while building networks or computing orders.
///
/// - No silent failures
/// - Use `Result<T, StreamOrderError>` for fallible operations
/// - The engine never panics on malformed input; it fails fast instead
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamOrderError {
    /// The network or adjacency index violates a structural precondition.
    #[error("Invalid topology: {0}")]
    InvalidTopology(String),

    /// The requested arc is not part of the network.
    #[error("Arc not found: {0:?}")]
    ArcNotFound(ArcId),

    /// The requested node is absent from the adjacency index.
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// The upstream structure loops back onto an arc still awaiting its
    /// tributaries.
    #[error("Cycle detected at arc {0:?}")]
    CycleDetected(ArcId),

    /// A recursive engine went deeper than its configured limit.
    #[error("Recursion limit exceeded: depth {0}")]
    RecursionLimitExceeded(usize),

    /// The traversal drained without resolving the sink arc.
    #[error("Traversal failed to resolve arc {0:?}")]
    TraversalFailed(ArcId),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_order_saturating_add() {
        let order = StreamOrder::new(u64::MAX);
        assert_eq!(order.saturating_add(StreamOrder::new(5)).value(), u64::MAX);
        assert_eq!(order.promote().value(), u64::MAX);
    }

    #[test]
    fn headwater_is_one() {
        assert_eq!(StreamOrder::HEADWATER.value(), 1);
    }

    #[test]
    fn far_node_returns_opposite_endpoint() {
        let arc = StreamArc::new(ArcId(0), NodeId(1), NodeId(2));
        assert_eq!(arc.far_node(NodeId(1)), Some(NodeId(2)));
        assert_eq!(arc.far_node(NodeId(2)), Some(NodeId(1)));
        assert_eq!(arc.far_node(NodeId(3)), None);
    }

    #[test]
    fn flows_into_follows_direction() {
        let arc = StreamArc::new(ArcId(0), NodeId(1), NodeId(2));
        assert!(arc.flows_into(NodeId(2)));
        assert!(!arc.flows_into(NodeId(1)));
        assert!(arc.is_incident(NodeId(1)));
        assert!(!arc.is_incident(NodeId(9)));
    }

    #[test]
    fn slot_matches_index_when_it_fits() {
        assert_eq!(ArcId(0).slot(), Ok(0));
        assert_eq!(ArcId(41).slot(), Ok(41));
    }

    #[cfg(target_pointer_width = "32")]
    #[test]
    fn slot_rejects_index_wider_than_usize() {
        let wide = ArcId(1 << 32);
        assert_eq!(wide.slot(), Err(StreamOrderError::ArcNotFound(wide)));
    }

    #[test]
    fn new_arc_is_unresolved() {
        let arc = StreamArc::new(ArcId(3), NodeId(1), NodeId(2));
        assert!(!arc.is_resolved());
    }
}
