//! # streamorder-core
//!
//! The deterministic stream order engine.
//!
//! This crate labels every arc of a river network with a stream order, the
//! usual proxy for the hydrological importance of a segment. It provides:
//! - A network arena of arc records (`Network`)
//! - A node → incident-arc index (`AdjacencyIndex`)
//! - Strahler ordering (recursive)
//! - Shreve magnitude (recursive and iterative)
//!
//! ## Usage
//!
//! ```
//! use streamorder_core::{AdjacencyIndex, Network, NodeId, StreamOrder};
//! use streamorder_core::engine::{OrderEngine, ShreveIterative};
//!
//! let mut network = Network::new();
//! network.add_arc(NodeId(1), NodeId(3));
//! network.add_arc(NodeId(2), NodeId(3));
//! let sink = network.add_arc(NodeId(3), NodeId(4));
//! let adjacency = AdjacencyIndex::from_network(&network);
//!
//! let order = ShreveIterative::default()
//!     .compute(&mut network, &adjacency, sink, NodeId(3))
//!     .expect("acyclic network");
//! assert_eq!(order, StreamOrder::new(2));
//! ```
//!
//! ## Architectural Constraints
//!
//! - No async, no I/O, no logging: callers own files and diagnostics
//! - `BTreeMap`/`BTreeSet` only, so every traversal is reproducible
//! - Malformed input is reported through `StreamOrderError`, never a panic

// =============================================================================
// MODULES
// =============================================================================

pub mod adjacency;
pub mod engine;
pub mod formats;
pub mod metrics;
pub mod network;
pub mod primitives;
pub mod report;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{ArcId, NodeId, StreamArc, StreamOrder, StreamOrderError};

// =============================================================================
// RE-EXPORTS: Network Model
// =============================================================================

pub use adjacency::AdjacencyIndex;
pub use network::{Network, SerializableNetwork};

// =============================================================================
// RE-EXPORTS: Engines
// =============================================================================

pub use engine::{
    ConfluenceRule, EngineKind, EngineSettings, IterativeOutcome, OrderEngine, Shreve,
    ShreveIterative, Strahler, TraversalStats, shreve_order, shreve_order_iterative,
    strahler_order,
};
pub use metrics::NetworkMetrics;
pub use report::{ArcOrderEntry, OrderReport};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{PersistenceHeader, is_snapshot, network_from_bytes, network_to_bytes};
