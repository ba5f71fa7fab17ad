//! # Order Report
//!
//! Serializable summary of one order computation: which engine ran, from
//! which sink, and the order of every arc afterwards. Arcs outside the
//! sink's drainage basin are reported with a `null` order.

use crate::engine::TraversalStats;
use crate::{ArcId, Network, NodeId, StreamOrder};
use serde::{Deserialize, Serialize};

/// A single arc in a report, sorted by index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArcOrderEntry {
    pub index: u64,
    pub upstream_node: u64,
    pub downstream_node: u64,
    pub order: Option<u64>,
}

/// Result of running an engine against a sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReport {
    pub engine: String,
    pub sink: u64,
    pub sink_node: u64,
    pub sink_order: u64,
    pub resolved: usize,
    pub arcs: Vec<ArcOrderEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<TraversalStats>,
}

impl OrderReport {
    /// Build a report from a network after an engine has run.
    #[must_use]
    pub fn from_network(
        engine: &str,
        network: &Network,
        sink: ArcId,
        sink_node: NodeId,
        sink_order: StreamOrder,
    ) -> Self {
        let arcs = network
            .arcs()
            .map(|arc| ArcOrderEntry {
                index: arc.index.0,
                upstream_node: arc.upstream_node.0,
                downstream_node: arc.downstream_node.0,
                order: arc.order.map(StreamOrder::value),
            })
            .collect();

        Self {
            engine: engine.to_string(),
            sink: sink.0,
            sink_node: sink_node.0,
            sink_order: sink_order.value(),
            resolved: network.resolved_count(),
            arcs,
            stats: None,
        }
    }

    /// Attach iterative traversal counters.
    #[must_use]
    pub fn with_stats(mut self, stats: TraversalStats) -> Self {
        self.stats = Some(stats);
        self
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AdjacencyIndex;
    use crate::engine::ShreveIterative;

    #[test]
    fn report_lists_every_arc() {
        let mut network = Network::new();
        network.add_arc(NodeId(1), NodeId(3));
        network.add_arc(NodeId(2), NodeId(3));
        let sink = network.add_arc(NodeId(3), NodeId(4));
        // Disconnected arc outside the basin.
        network.add_arc(NodeId(8), NodeId(9));
        let adjacency = AdjacencyIndex::from_network(&network);

        let outcome = ShreveIterative::default()
            .run(&mut network, &adjacency, sink, NodeId(3))
            .expect("run");
        let report = OrderReport::from_network(
            "shreve-iterative",
            &network,
            sink,
            NodeId(3),
            outcome.sink_order,
        )
        .with_stats(outcome.stats);

        assert_eq!(report.sink_order, 2);
        assert_eq!(report.resolved, 3);
        assert_eq!(report.arcs.len(), 4);
        assert_eq!(report.arcs[3].order, None);
        assert_eq!(report.stats.map(|s| s.resolved), Some(3));
    }

    #[test]
    fn report_serializes_to_json_shape() {
        let mut network = Network::new();
        let sink = network.add_arc(NodeId(1), NodeId(2));
        network.set_order(sink, StreamOrder::HEADWATER).expect("set");

        let report =
            OrderReport::from_network("strahler", &network, sink, NodeId(1), StreamOrder::HEADWATER);
        let json = serde_json::to_string(&report).expect("json");

        assert!(json.contains("\"engine\":\"strahler\""));
        assert!(json.contains("\"sink_order\":1"));
        assert!(!json.contains("\"stats\""));
    }
}
