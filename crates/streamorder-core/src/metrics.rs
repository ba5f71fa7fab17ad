//! # Network Metrics
//!
//! Structural and order statistics for a network, derived from the arc
//! records and the adjacency index. Node classes are computed, never stored.

use crate::{AdjacencyIndex, Network};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metrics extracted from a network and its adjacency index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkMetrics {
    /// Total number of arcs.
    pub arc_count: usize,
    /// Total number of indexed nodes.
    pub node_count: usize,
    /// Nodes with no inflowing arc.
    pub headwater_count: usize,
    /// Nodes where two or more arcs flow in.
    pub confluence_count: usize,
    /// Nodes with no outflowing arc.
    pub outlet_count: usize,
    /// Arcs with a resolved order.
    pub resolved_count: usize,
    /// Highest resolved order, if any arc is resolved.
    pub max_order: Option<u64>,
    /// Resolved order value → number of arcs.
    pub order_histogram: BTreeMap<u64, usize>,
}

impl NetworkMetrics {
    /// Compute metrics from a network and its index.
    ///
    /// Arcs listed in the index but missing from the network are ignored;
    /// run [`AdjacencyIndex::validate`] first when that matters.
    #[must_use]
    pub fn from_parts(network: &Network, adjacency: &AdjacencyIndex) -> Self {
        let mut headwater_count = 0;
        let mut confluence_count = 0;
        let mut outlet_count = 0;

        for node in adjacency.nodes() {
            let mut inflow = 0usize;
            let mut outflow = 0usize;
            for &arc in adjacency.incident(node).unwrap_or_default() {
                let Ok(record) = network.arc(arc) else {
                    continue;
                };
                if record.flows_into(node) {
                    inflow = inflow.saturating_add(1);
                }
                if record.upstream_node == node {
                    outflow = outflow.saturating_add(1);
                }
            }

            if inflow == 0 {
                headwater_count += 1;
            }
            if inflow >= 2 {
                confluence_count += 1;
            }
            if outflow == 0 {
                outlet_count += 1;
            }
        }

        let mut order_histogram = BTreeMap::new();
        for order in network.arcs().filter_map(|arc| arc.order) {
            *order_histogram.entry(order.value()).or_insert(0usize) += 1;
        }

        Self {
            arc_count: network.len(),
            node_count: adjacency.node_count(),
            headwater_count,
            confluence_count,
            outlet_count,
            resolved_count: network.resolved_count(),
            max_order: order_histogram.keys().next_back().copied(),
            order_histogram,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
