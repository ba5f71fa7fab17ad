//! # Strahler Engine
//!
//! Recursive Strahler ordering: headwaters are order 1, and an arc's order
//! rises only where two or more tributaries share the highest upstream order.

use super::{OrderEngine, strahler_combine};
use crate::primitives::MAX_RECURSION_DEPTH;
use crate::{AdjacencyIndex, ArcId, Network, NodeId, StreamOrder, StreamOrderError};

/// Recursive Strahler engine.
///
/// Recursion depth equals the longest upstream path from the sink; paths
/// longer than `max_depth` fail with `RecursionLimitExceeded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strahler {
    max_depth: usize,
}

impl Default for Strahler {
    fn default() -> Self {
        Self::new(MAX_RECURSION_DEPTH)
    }
}

impl Strahler {
    /// Create an engine with the given recursion bound.
    #[must_use]
    pub const fn new(max_depth: usize) -> Self {
        Self { max_depth }
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
        let order = if tributaries.is_empty() {
            StreamOrder::HEADWATER
        } else {
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
            strahler_combine(&upstream)
        };

        network.set_order(arc, order)?;
        Ok(order)
    }
}

impl OrderEngine for Strahler {
    fn name(&self) -> &'static str {
        "strahler"
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
