//! # Node Adjacency Index
//!
//! Read-only mapping from node id to the arcs incident at that node.
//!
//! The index is built once per traversal request and never mutated while an
//! engine runs. Every arc is registered under exactly its two endpoints.

use crate::{ArcId, Network, NodeId, StreamOrderError};
use std::collections::{BTreeMap, BTreeSet};

/// Node id → incident arc indices.
///
/// Uses `BTreeMap` so node iteration is deterministic. Arc lists keep their
/// insertion order, which fixes the order tributaries are visited in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacencyIndex {
    incident: BTreeMap<NodeId, Vec<ArcId>>,
}

impl AdjacencyIndex {
    /// Create a new empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from a network, registering every arc under both
    /// endpoints. A loop arc is registered once.
    #[must_use]
    pub fn from_network(network: &Network) -> Self {
        let mut index = Self::new();
        for arc in network.arcs() {
            index.insert(arc.upstream_node, arc.index);
            if arc.downstream_node != arc.upstream_node {
                index.insert(arc.downstream_node, arc.index);
            }
        }
        index
    }

    /// Register `arc` as incident at `node`.
    pub fn insert(&mut self, node: NodeId, arc: ArcId) {
        self.incident.entry(node).or_default().push(arc);
    }

    /// Arcs incident at `node`.
    pub fn incident(&self, node: NodeId) -> Result<&[ArcId], StreamOrderError> {
        self.incident
            .get(&node)
            .map(Vec::as_slice)
            .ok_or(StreamOrderError::NodeNotFound(node))
    }

    /// Check if the node is present in the index.
    #[must_use]
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.incident.contains_key(&node)
    }

    /// Number of incident arcs, 0 for unknown nodes.
    #[must_use]
    pub fn degree(&self, node: NodeId) -> usize {
        self.incident.get(&node).map_or(0, Vec::len)
    }

    /// Number of indexed nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.incident.len()
    }

    /// All indexed nodes in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.incident.keys().copied()
    }

    /// Tributaries of `arc` at `at_node`, each paired with the node the
    /// traversal continues from.
    ///
    /// A tributary is any other arc incident at `at_node` whose water flows
    /// into `at_node`. Arcs leaving the node are never walked, so the
    /// traversal cannot turn back downstream. An empty result means
    /// `at_node` is a headwater for this traversal.
    ///
    /// A loop arc at `at_node` (including `arc` itself) feeds its own node
    /// and fails with `CycleDetected`.
    pub fn tributaries(
        &self,
        network: &Network,
        arc: ArcId,
        at_node: NodeId,
    ) -> Result<Vec<(ArcId, NodeId)>, StreamOrderError> {
        let mut tributaries = Vec::new();
        for &candidate in self.incident(at_node)? {
            let record = network.arc(candidate)?;
            if record.is_loop() && record.flows_into(at_node) {
                return Err(StreamOrderError::CycleDetected(candidate));
            }
            if candidate == arc || !record.flows_into(at_node) {
                continue;
            }
            let next = record.far_node(at_node).ok_or_else(|| {
                StreamOrderError::InvalidTopology(format!(
                    "arc {} is indexed at node {} but does not touch it",
                    candidate.0, at_node.0
                ))
            })?;
            tributaries.push((candidate, next));
        }
        Ok(tributaries)
    }

    /// Check the traversal preconditions for a sink before any work starts.
    ///
    /// The sink arc must exist, `at_node` must be indexed, the arc must be
    /// registered there, and `at_node` must be the arc's upstream end.
    pub fn check_sink(
        &self,
        network: &Network,
        sink: ArcId,
        at_node: NodeId,
    ) -> Result<(), StreamOrderError> {
        let record = network.arc(sink)?;
        if !self.contains_node(at_node) {
            return Err(StreamOrderError::NodeNotFound(at_node));
        }
        let incident = self.incident(at_node)?;

        if !record.is_incident(at_node) || !incident.contains(&sink) {
            return Err(StreamOrderError::InvalidTopology(format!(
                "sink arc {} is not incident at node {}",
                sink.0, at_node.0
            )));
        }
        if record.upstream_node != at_node {
            return Err(StreamOrderError::InvalidTopology(format!(
                "node {} is not the upstream end of sink arc {}",
                at_node.0, sink.0
            )));
        }
        Ok(())
    }

    /// Verify that every arc appears under exactly its two endpoints and
    /// that no arc starts and ends at the same node.
    pub fn validate(&self, network: &Network) -> Result<(), StreamOrderError> {
        if let Some(record) = network.arcs().find(|arc| arc.is_loop()) {
            return Err(StreamOrderError::InvalidTopology(format!(
                "arc {} starts and ends at node {}",
                record.index.0, record.upstream_node.0
            )));
        }

        let mut seen: BTreeMap<ArcId, BTreeSet<NodeId>> = BTreeMap::new();

        for (&node, arcs) in &self.incident {
            for &arc in arcs {
                if !network.contains_arc(arc) {
                    return Err(StreamOrderError::InvalidTopology(format!(
                        "node {} lists unknown arc {}",
                        node.0, arc.0
                    )));
                }
                if !network.arc(arc)?.is_incident(node) {
                    return Err(StreamOrderError::InvalidTopology(format!(
                        "node {} lists arc {} which does not touch it",
                        node.0, arc.0
                    )));
                }
                if !seen.entry(arc).or_default().insert(node) {
                    return Err(StreamOrderError::InvalidTopology(format!(
                        "arc {} is listed twice at node {}",
                        arc.0, node.0
                    )));
                }
            }
        }

        for record in network.arcs() {
            let nodes = seen.get(&record.index);
            for endpoint in [record.upstream_node, record.downstream_node] {
                if !nodes.is_some_and(|n| n.contains(&endpoint)) {
                    return Err(StreamOrderError::InvalidTopology(format!(
                        "arc {} is missing from node {}",
                        record.index.0, endpoint.0
                    )));
                }
            }
        }

        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
