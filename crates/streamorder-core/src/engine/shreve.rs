//! # Shreve Engine (recursive)
//!
//! Additive stream magnitude computed by plain recursion. Suitable for small
//! networks and as the reference the iterative engine is checked against.

use super::{ConfluenceRule, OrderEngine, shreve_combine};
use crate::primitives::MAX_RECURSION_DEPTH;
use crate::{AdjacencyIndex, ArcId, Network, NodeId, StreamOrder, StreamOrderError};

/// Recursive Shreve engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shreve {
    max_depth: usize,
    rule: ConfluenceRule,
}

impl Default for Shreve {
    fn default() -> Self {
        Self::new(MAX_RECURSION_DEPTH, ConfluenceRule::default())
    }
}

impl Shreve {
    /// Create an engine with the given recursion bound and combine rule.
    #[must_use]
    pub const fn new(max_depth: usize, rule: ConfluenceRule) -> Self {
        Self { max_depth, rule }
    }

    /// The combine rule in use.
    #[must_use]
    pub const fn rule(&self) -> ConfluenceRule {
        self.rule
    }

    fn resolve(
        &self,
        network: &mut Network,
        adjacency: &AdjacencyIndex,
        arc: ArcId,
        at_node: NodeId,
        depth: usize,
    ) -> Result<StreamOrder, StreamOrderError> {
        if depth > self.max_depth {
            return Err(StreamOrderError::RecursionLimitExceeded(self.max_depth));
        }

        let tributaries = adjacency.tributaries(network, arc, at_node)?;
        let mut upstream = Vec::with_capacity(tributaries.len());
        for (tributary, next) in tributaries {
            upstream.push(self.resolve(
                network,
                adjacency,
                tributary,
                next,
                depth.saturating_add(1),
            )?);
        }

        // No tributaries: shreve_combine yields the headwater order.
        let order = shreve_combine(&upstream, self.rule);
        network.set_order(arc, order)?;
        Ok(order)
    }
}

impl OrderEngine for Shreve {
    fn name(&self) -> &'static str {
        "shreve"
    }

    fn compute(
        &self,
        network: &mut Network,
        adjacency: &AdjacencyIndex,
        sink: ArcId,
        at_node: NodeId,
    ) -> Result<StreamOrder, StreamOrderError> {
        adjacency.check_sink(network, sink, at_node)?;
        self.resolve(network, adjacency, sink, at_node, 0)
    }
}

// =============================================================================
// TESTS
// =============================================================================
