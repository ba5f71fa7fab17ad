//! # Network
//!
//! Arena of arc records addressed by [`ArcId`].
//!
//! The network is the only mutable state an engine touches, and only
//! through [`Network::set_order`]. Topology is fixed once built.

use crate::{ArcId, NodeId, StreamArc, StreamOrder, StreamOrderError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// NETWORK
// =============================================================================

/// Ordered collection of arcs, indexed by their `ArcId`.
///
/// Invariant: `arcs[i].index == ArcId(i)` for every slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Network {
    arcs: Vec<StreamArc>,
}

impl Network {
    /// Create a new empty network.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an arc and return its freshly assigned index.
    pub fn add_arc(&mut self, upstream_node: NodeId, downstream_node: NodeId) -> ArcId {
        let index = ArcId(self.arcs.len() as u64);
        self.arcs
            .push(StreamArc::new(index, upstream_node, downstream_node));
        index
    }

    /// Build a network from externally constructed arc records.
    ///
    /// Records may arrive in any order but their indices must cover
    /// `0..n` exactly once. Orders already present are kept.
    pub fn from_arcs(mut arcs: Vec<StreamArc>) -> Result<Self, StreamOrderError> {
        arcs.sort_by_key(|arc| arc.index);
        for (slot, arc) in arcs.iter().enumerate() {
            if arc.index.slot().ok() != Some(slot) {
                return Err(StreamOrderError::InvalidTopology(format!(
                    "arc indices must be contiguous from 0: expected {}, found {}",
                    slot, arc.index.0
                )));
            }
        }
        Ok(Self { arcs })
    }

    /// Look up an arc by index.
    pub fn arc(&self, id: ArcId) -> Result<&StreamArc, StreamOrderError> {
        self.arcs
            .get(id.slot()?)
            .ok_or(StreamOrderError::ArcNotFound(id))
    }

    /// Check if the network holds an arc with this index.
    #[must_use]
    pub fn contains_arc(&self, id: ArcId) -> bool {
        id.slot().is_ok_and(|slot| slot < self.arcs.len())
    }

    /// All arcs in index order.
    pub fn arcs(&self) -> impl Iterator<Item = &StreamArc> {
        self.arcs.iter()
    }

    /// Number of arcs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Check if the network has no arcs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Resolved order of an arc, if any.
    pub fn order_of(&self, id: ArcId) -> Result<Option<StreamOrder>, StreamOrderError> {
        Ok(self.arc(id)?.order)
    }

    /// Write the resolved order of an arc.
    pub fn set_order(&mut self, id: ArcId, order: StreamOrder) -> Result<(), StreamOrderError> {
        let arc = self
            .arcs
            .get_mut(id.slot()?)
            .ok_or(StreamOrderError::ArcNotFound(id))?;
        arc.order = Some(order);
        Ok(())
    }

    /// Clear every resolved order, keeping topology intact.
    pub fn reset_orders(&mut self) {
        for arc in &mut self.arcs {
            arc.order = None;
        }
    }

    /// Number of arcs with a resolved order.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.arcs.iter().filter(|arc| arc.is_resolved()).count()
    }

    /// Snapshot of every resolved order.
    #[must_use]
    pub fn orders(&self) -> BTreeMap<ArcId, StreamOrder> {
        self.arcs
            .iter()
            .filter_map(|arc| arc.order.map(|order| (arc.index, order)))
            .collect()
    }
}

// =============================================================================
// SERIALIZATION SUPPORT
// =============================================================================

/// Serializable representation of a network for JSON input and snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableNetwork {
    pub arcs: Vec<StreamArc>,
}

impl From<&Network> for SerializableNetwork {
    fn from(network: &Network) -> Self {
        Self {
            arcs: network.arcs.clone(),
        }
    }
}

impl TryFrom<SerializableNetwork> for Network {
    type Error = StreamOrderError;

    fn try_from(sn: SerializableNetwork) -> Result<Self, Self::Error> {
        Network::from_arcs(sn.arcs)
    }
}

// =============================================================================
// TESTS
// =============================================================================
